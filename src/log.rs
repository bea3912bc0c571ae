use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Maps the number of `-v` flags given on the command line to a log level.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs a logger on stderr whose lines are `td` comments (`c <LEVEL> - ...`).
pub fn build_pace_logger(level: LevelFilter) {
    let mut builder = Builder::from_default_env();
    builder
        .format(|buf, record| writeln!(buf, "c {} - {}", record.level(), record.args()))
        .filter(None, level)
        .target(env_logger::Target::Stderr)
        .init();
}
