#![doc(
    html_logo_url = "https://raw.githubusercontent.com/nav-solutions/.github/master/logos/logo2.jpg"
)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * NMEA-TTFF is part of the nav-solutions framework.
 * Authors: Guillaume W. Bres <guillaume.bressaix@gmail.com> et al,
 * (cf. https://github.com/nav-solutions/nmea-ttff/graphs/contributors)
 * This framework is shipped under Mozilla Public V2 license.
 *
 * Documentation: https://github.com/nav-solutions/nmea-ttff
 */

use env_logger::{Builder, Target};

use log::{error, info, warn};

use thiserror::Error;

use tokio::{
    signal,
    sync::{mpsc, watch},
};

use hifitime::prelude::{Duration, Epoch, TimeScale};

mod cli;
mod collecter;
mod config;
mod device;
mod nmea;
mod report;
mod runtime;
mod session;
mod utils;

#[cfg(test)]
mod tests;

use crate::{
    cli::Cli,
    collecter::{Collecter, fd::FileDescriptor},
    config::Settings,
    device::Device,
    report::Report,
    runtime::Runtime,
    session::Session,
    utils::{to_parity, to_stop_bits},
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Config(#[from] config::Error),
    #[error("serial port error: {0}")]
    SerialPort(#[from] serialport::Error),
    #[error("failed to determine system time: {0}")]
    SystemTime(#[from] hifitime::HifitimeError),
    #[error("collecter failure: {0}")]
    Collecter(#[from] tokio::task::JoinError),
    #[error("invalid command line: requires either serial port or at least, one input file")]
    NoInput,
}

/// Input interface: files are replayed one after the other ('-' being stdin),
/// otherwise we listen to the serial port.
fn open_device(cli: &Cli, settings: &Settings) -> Result<Device, Error> {
    let user_files = cli.filepaths();

    if let Some((first, others)) = user_files.split_first() {
        let mut device = if first.as_str() == "-" {
            Device::from_reader(std::io::stdin())
        } else {
            Device::open_file(first)?
        };

        for path in others {
            if path.as_str() == "-" {
                device.stack_reader(std::io::stdin());
            } else {
                device.stack_file(path)?;
            }
        }

        return Ok(device);
    }

    let port = settings.uart.serial_port.as_ref().ok_or(Error::NoInput)?;

    let device = Device::open_serial_port(
        port,
        settings.uart.baudrate,
        to_parity(&settings.uart.parity)?,
        to_stop_bits(settings.uart.stopbit)?,
    )?;

    Ok(device)
}

/// Hands results over to the user
fn publish(session: &Session, output: Option<&String>) -> Result<(), Error> {
    if session.is_empty() {
        warn!("no data available");
    } else {
        info!(
            "{} sentences parsed, {} rejected lines, {} satellite samples",
            session.records(),
            session.rejected(),
            session.observations().len()
        );

        match session.ttff() {
            Some(ttff) => info!(
                "Time To First Fix (TTFF): {:.3} seconds ({})",
                ttff,
                Duration::from_seconds(ttff)
            ),
            None => warn!("no fix acquired"),
        }
    }

    if let Some(path) = output {
        Report::new(session).to_file(path)?;
        info!("results generated: \"{}\"", path);
    }

    Ok(())
}

#[tokio::main]
pub async fn main() -> Result<(), Error> {
    let mut builder = Builder::from_default_env();

    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    // init
    let mut buffer = [0; 4096];

    let cfg_precision = Duration::from_seconds(1.0);

    let t_utc = Epoch::now()?.to_time_scale(TimeScale::UTC);

    // cli
    let cli = Cli::new();
    let settings = cli.settings()?;

    // parsing session
    let session = Session::new(&settings.log_file)?;

    let mut device = open_device(&cli, &settings)?;
    let live = !device.interface.is_read_only();

    // sentences channel
    let (tx, rx) = mpsc::channel::<String>(128);

    let mut collecter = Collecter::new(session, rx);

    if live {
        if let Some(period) = cli.summary_period() {
            collecter = collecter.with_summary_period(period);
        }

        if let Some(path) = cli.record_path() {
            let fd = FileDescriptor::new(cli.gzip(), path)?;
            collecter = collecter.with_recorder(fd);
            info!("recording to \"{}\"", path);
        }
    }

    let collecter = tokio::spawn(collecter.run());

    // graceful exit
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(_) => {
                let _ = shutdown_tx.send(true);
            },
            Err(e) => error!("signal handling error: {}", e),
        }
    });

    // main task
    let mut rtm = Runtime::new(t_utc, settings.log_file.clone());
    let mut lines = Vec::<String>::with_capacity(64);

    info!("{} - application deployed", t_utc.round(cfg_precision));

    loop {
        if *shutdown_rx.borrow() {
            info!(
                "{} - interrupted, shutting down",
                rtm.utc_time().round(cfg_precision)
            );
            break;
        }

        if let Err(e) = device.consume_all_cb(&mut buffer, |line| lines.push(line.to_string())) {
            error!("{} - I/O error: {}", rtm.utc_time().round(cfg_precision), e);
        }

        if live && !lines.is_empty() {
            match Epoch::now() {
                Ok(now) => rtm.new_epoch(now),
                Err(e) => error!("failed to determine system time: {}", e),
            }
        }

        for line in lines.drain(..) {
            let line = if live { rtm.stamp(&line) } else { line };

            if tx.send(line).await.is_err() {
                break;
            }
        }

        if tx.is_closed() {
            error!("collecter stopped unexpectedly");
            break;
        }

        if device.is_exhausted() {
            info!(
                "{} - consumed all content",
                rtm.utc_time().round(cfg_precision)
            );
            break;
        }
    }

    // closing the channel terminates the collection
    drop(tx);

    let session = collecter.await?;

    publish(&session, cli.output_path())
}
