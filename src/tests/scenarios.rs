use crate::{
    session::{Observation, ObservationKind, State},
    tests::parse_all,
};

#[test]
fn gga_with_satellites_fixes_immediately() {
    let session = parse_all(&["t=0.100,,$GPGGA,000000,,,,,1,08"]);

    assert_eq!(
        session.observations(),
        &[Observation {
            timestamp: 0.100,
            kind: ObservationKind::InView,
            count: 8,
        }]
    );
    assert_eq!(session.ttff(), Some(0.0));
    assert_eq!(session.state(), State::FixAcquired { ttff: 0.0 });
}

#[test]
fn gga_empty_satellite_count() {
    let session = parse_all(&["t=0.100,,$GPGGA,000000,,,,,0,,,,,,,,"]);

    assert_eq!(session.observations().len(), 1);
    assert_eq!(session.observations()[0].count, 0);
    assert_eq!(session.observations()[0].kind, ObservationKind::InView);
    assert!(!session.has_fix());
    assert!(session.ttff().is_none());
}

#[test]
fn unknown_sentence_is_ignored() {
    let session = parse_all(&[
        "t=0.000,,$XXXXX,1,2,3",
        "t=1.000,,$GPGGA,000001,,,,,1,04",
    ]);

    assert_eq!(session.records(), 1);
    assert_eq!(session.rejected(), 0);
    assert_eq!(session.observations().len(), 1);
    // capture started with the unknown sentence
    assert_eq!(session.ttff(), Some(1.0));
}

#[test]
fn gsa_tracked_counts_increase() {
    let session = parse_all(&[
        "t=1.000,,$GPGSA,A,1,01,02,03,,,,,,,,,,,,",
        "t=2.000,,$GPGSA,A,1,01,02,03,04,05,,,,,,,,,,",
    ]);

    let counts = session
        .observations()
        .iter()
        .map(|obs| (obs.kind, obs.count))
        .collect::<Vec<_>>();

    assert_eq!(
        counts,
        vec![(ObservationKind::Tracked, 3), (ObservationKind::Tracked, 5)]
    );
    assert!(!session.has_fix());
}

#[test]
fn gsa_tracked_counts_equal() {
    let session = parse_all(&[
        "t=1.000,,$GPGSA,A,1,01,02,03,,,,,,,,,,,,",
        "t=2.000,,$GPGSA,A,1,07,08,09,,,,,,,,,,,,",
    ]);

    assert_eq!(session.observations().len(), 1);
    assert_eq!(session.observations()[0].timestamp, 1.0);
}

#[test]
fn gsa_3d_fix() {
    let session = parse_all(&[
        "t=10.000,,$GPRMC,000010,V,,,,,,,,,,N",
        "t=11.000,,$GNGSA,A,1,,,,,,,,,,,,,,,",
        "t=42.500,,$GNGSA,A,3,01,02,03,04,,,,,,,,,2.1,1.2,1.7",
        "t=43.000,,$GNGSA,A,1,,,,,,,,,,,,,,,",
    ]);

    assert_eq!(session.ttff(), Some(32.5));
    assert_eq!(session.capture_start(), Some(10.0));
    assert_eq!(session.records(), 4);
}

#[test]
fn cold_start_log() {
    let session = parse_all(&[
        "t=0.000,,$GPRMC,,V,,,,,,,,,N*53",
        "t=0.000,,$GPGGA,,,,,,0,00,99.99,,,,,,*48",
        "t=0.000,,$GPGSA,A,1,,,,,,,,,,,,,99.99,99.99,99.99*30",
        "t=1.000,,$GPRMC,,V,,,,,,,,,N*53",
        "t=1.000,,$GPGGA,,,,,,0,00,99.99,,,,,,*48",
        "t=1.000,,$GPGSA,A,1,,,,,,,,,,,,,99.99,99.99,99.99*30",
        "corrupted line",
        "t=2.000,,$GPGSV,1,1,03,05,,,23,13,,,28,15,,,25*7C",
        "t=27.000,,$GPRMC,092751.000,A,5321.6802,N,00630.3371,W,0.06,31.66,280511,,,A*45",
        "t=27.000,,$GPGGA,092751.000,5321.6802,N,00630.3371,W,1,04,3.45,62.2,M,55.2,M,,*7F",
        "t=27.000,,$GPGSA,A,3,05,13,15,21,,,,,,,,,3.60,3.45,1.03*0C",
        "t=28.000,,$GPGGA,092752.000,5321.6802,N,00630.3371,W,1,05,2.10,62.2,M,55.2,M,,*7B",
        "t=28.000,,$GPGSA,A,3,05,13,15,21,25,,,,,,,,2.50,2.10,1.03*0C",
    ]);

    assert_eq!(session.rejected(), 1);
    assert_eq!(session.records(), 11);
    assert_eq!(session.ttff(), Some(27.0));

    let series = session
        .observations()
        .iter()
        .map(|obs| (obs.timestamp, obs.kind.to_string(), obs.count))
        .collect::<Vec<_>>();

    assert_eq!(
        series,
        vec![
            (0.0, "in_view".to_string(), 0),
            (0.0, "tracked".to_string(), 0),
            (1.0, "in_view".to_string(), 0),
            (1.0, "tracked".to_string(), 0),
            (27.0, "in_view".to_string(), 4),
            (27.0, "tracked".to_string(), 4),
            (28.0, "in_view".to_string(), 5),
            (28.0, "tracked".to_string(), 5),
        ]
    );
}
