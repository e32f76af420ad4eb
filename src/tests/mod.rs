mod scenarios;

use crate::{config::LogFormat, session::Session};

/// Runs all lines through a fresh [Session] with default log format.
pub(crate) fn parse_all(lines: &[&str]) -> Session {
    let mut session = Session::new(&LogFormat::default()).unwrap();
    for line in lines {
        session.parse_line(line);
    }
    session
}
