use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command, value_parser};

use crate::config::{Error as ConfigError, Settings};

use std::time::Duration;

pub struct Cli {
    /// Arguments passed by user
    matches: ArgMatches,
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: Self::command().get_matches(),
        }
    }

    fn command() -> Command {
        Command::new("nmea-ttff")
            .author("Guillaume W. Bres, <guillaume.bressaix@gmail.com>")
            .version(env!("CARGO_PKG_VERSION"))
            .about("NMEA satellite tracking and Time To First Fix analyzer")
            .color(ColorChoice::Always)
            .arg_required_else_help(true)
            .next_help_heading("Configuration")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILENAME")
                    .action(ArgAction::Set)
                    .help("Load settings from a JSON file. Command line options have precedence.
Example: { \"log_file\": { \"timestamp_prefix\": \"t=\", \"field_separator\": \",\", \"nmea_type_prefix\": \"$\" },
\"uart\": { \"serial_port\": \"/dev/ttyUSB0\", \"baudrate\": 9600, \"parity\": \"N\", \"stopbit\": 1 } }")
            )
            .next_help_heading("Serial port (Live mode, GNSS receiver)")
            .arg(
                Arg::new("port")
                    .short('p')
                    .long("port")
                    .value_name("PORT")
                    .conflicts_with("file")
                    .help("Define serial port. Example /dev/ttyUSB0 on Linux")
            )
            .arg(
                Arg::new("baudrate")
                    .short('b')
                    .long("baud")
                    .required(false)
                    .value_name("Baudrate (u32)")
                    .value_parser(value_parser!(u32))
                    .help("Define serial port baud rate. By default we use 9600"),
            )
            .arg(
                Arg::new("parity")
                    .long("parity")
                    .required(false)
                    .value_parser(["N", "E", "O"])
                    .help("Define serial port parity. By default we use N (none)"),
            )
            .arg(
                Arg::new("stop-bits")
                    .long("stop-bits")
                    .required(false)
                    .value_parser(value_parser!(u8).range(1..=2))
                    .help("Define serial port stop bits. By default we use 1"),
            )
            .arg(
                Arg::new("record")
                    .short('r')
                    .long("record")
                    .value_name("FILENAME")
                    .action(ArgAction::Set)
                    .conflicts_with("file")
                    .help("Record timestamped sentences, for later replay with --file.
Gzip compressed when terminated with '.gz' or when --gzip is used.")
            )
            .arg(
                Arg::new("gzip")
                    .long("gzip")
                    .action(ArgAction::SetTrue)
                    .requires("record")
                    .help("Gzip compress the recording."),
            )
            .arg(
                Arg::new("summary")
                    .long("summary")
                    .value_name("SECONDS")
                    .value_parser(value_parser!(u64))
                    .help("Progress report period in live mode. Default is 10s, 0 disables it."),
            )
            .next_help_heading("File interface (Offline mode)")
            .arg(
                Arg::new("file")
                    .long("file")
                    .short('f')
                    .value_name("FILENAME")
                    .action(ArgAction::Append)
                    .help("Load a single log file. Use as many as needed.
Each file descriptor is consumed one after the other, load them in chronological order.
Gzip file are supported but they must be terminated with '.gz'. Use '-' for stdin.")
            )
            .next_help_heading("Log format")
            .arg(
                Arg::new("timestamp-prefix")
                    .long("timestamp-prefix")
                    .value_name("MARKER")
                    .help("Marker preceding the timestamp. Default is \"t=\""),
            )
            .arg(
                Arg::new("separator")
                    .long("separator")
                    .value_name("SEPARATOR")
                    .help("Field separator. Default is \",\""),
            )
            .arg(
                Arg::new("type-prefix")
                    .long("type-prefix")
                    .value_name("PREFIX")
                    .help("Character preceding the sentence identifier. Default is \"$\""),
            )
            .next_help_heading("Output")
            .arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_name("FILENAME")
                    .help("Write the satellite time series and TTFF as JSON, for plotting.
Gzip compressed when terminated with '.gz'."),
            )
    }

    /// Returns User serial port specification
    pub fn serial_port(&self) -> Option<&String> {
        self.matches.get_one::<String>("port")
    }

    /// Input file paths
    pub fn filepaths(&self) -> Vec<&String> {
        if let Some(fp) = self.matches.get_many::<String>("file") {
            fp.collect()
        } else {
            Vec::new()
        }
    }

    /// Returns User baud rate specification
    pub fn baud_rate(&self) -> Option<u32> {
        self.matches.get_one::<u32>("baudrate").copied()
    }

    pub fn record_path(&self) -> Option<&String> {
        self.matches.get_one::<String>("record")
    }

    /// True if recording should be gzip compressed
    pub fn gzip(&self) -> bool {
        self.matches.get_flag("gzip")
            || self
                .record_path()
                .is_some_and(|path| path.ends_with(".gz"))
    }

    pub fn output_path(&self) -> Option<&String> {
        self.matches.get_one::<String>("output")
    }

    /// Progress report period, None when disabled
    pub fn summary_period(&self) -> Option<Duration> {
        match self.matches.get_one::<u64>("summary").copied() {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(10)),
        }
    }

    /// Obtain [Settings], from configuration file if any,
    /// then overwritten with command line options.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = match self.matches.get_one::<String>("config") {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };

        if let Some(port) = self.serial_port() {
            settings.uart.serial_port = Some(port.to_string());
        }
        if let Some(baud) = self.baud_rate() {
            settings.uart.baudrate = baud;
        }
        if let Some(parity) = self.matches.get_one::<String>("parity") {
            settings.uart.parity = parity.to_string();
        }
        if let Some(stop_bits) = self.matches.get_one::<u8>("stop-bits") {
            settings.uart.stopbit = *stop_bits;
        }
        if let Some(prefix) = self.matches.get_one::<String>("timestamp-prefix") {
            settings.log_file.timestamp_prefix = prefix.to_string();
        }
        if let Some(separator) = self.matches.get_one::<String>("separator") {
            settings.log_file.field_separator = separator.to_string();
        }
        if let Some(prefix) = self.matches.get_one::<String>("type-prefix") {
            settings.log_file.nmea_type_prefix = prefix.to_string();
        }

        settings.log_file.validate()?;
        Ok(settings)
    }
}
