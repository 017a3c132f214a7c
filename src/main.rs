use clap::{value_parser, Arg, Command};
use log::{error, info};
use simplelog::{
    format_description, ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;
use std::process::exit;
use std::time::Duration;

use run_turret_controller::application;
use run_turret_controller::constants::{DEFAULT_CONFIG_FILE, DEFAULT_LOG_FILE};

fn main() {
    // Parse the command line arguments
    let matches = Command::new("turret control system")
        .about("Thermal-tracking turret control system.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file")
                .default_value(DEFAULT_CONFIG_FILE),
        )
        .arg(
            Arg::new("duration")
                .short('d')
                .long("duration")
                .help("Maximum running time in second. Default is 0, which means no limit.")
                .default_value("0")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("log-level")
                .help("Log level: 0 (Off), 1 (Error), 2 (Warn), 3 (Info), 4 (Debug), 5 (Trace)")
                .default_value("3")
                .value_parser(value_parser!(u32)),
        )
        .get_matches();

    let config_file = matches
        .get_one::<String>("config")
        .map_or(DEFAULT_CONFIG_FILE, |config| config.as_str());

    let limit = get_limit(matches.get_one::<u64>("duration"));

    // Check the log filter
    let log_filter = get_log_filter(matches.get_one::<u32>("level"));

    // Initiate the logger
    initiate_logger(log_filter, DEFAULT_LOG_FILE);
    info!("Log level: {log_filter}.");

    // Run the application
    if let Err(run_error) = application::run(Path::new(config_file), limit) {
        error!("Turret control system fails: {run_error}.");
        exit(1);
    }
}

/// Get the limit of the running time.
///
/// # Arguments
/// * `duration` - Duration in second. 0 means no limit.
///
/// # Returns
/// Limit of the running time.
fn get_limit(duration: Option<&u64>) -> Option<Duration> {
    match duration {
        Some(&seconds) if seconds > 0 => Some(Duration::from_secs(seconds)),
        _ => None,
    }
}

/// Get the log filter.
///
/// # Arguments
/// * `log_level` - Log level.
///
/// # Returns
/// Log filter.
fn get_log_filter(log_level: Option<&u32>) -> LevelFilter {
    match log_level {
        Some(level) => match level {
            0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            5 => LevelFilter::Trace,
            _ => LevelFilter::Info,
        },
        None => LevelFilter::Info,
    }
}

/// Initiate the logger.
///
/// # Arguments
/// * `level` - Log level.
/// * `filepath` - Log file path.
fn initiate_logger(level: LevelFilter, filepath: &str) {
    let config = ConfigBuilder::new()
        .set_time_format_custom(format_description!(
            "[year]/[month]/[day] [hour]:[minute]:[second].[subsecond]"
        ))
        .build();

    // Log to the terminal
    let logger_terminal = TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    // Log to the file
    match File::create(filepath) {
        Ok(file) => {
            let logger_file = WriteLogger::new(level, config, file);
            let _ = CombinedLogger::init(vec![logger_terminal, logger_file]);
        }
        Err(file_error) => {
            eprintln!("Failed to create the log file: {file_error}.");
            let _ = CombinedLogger::init(vec![logger_terminal]);
        }
    }
}
