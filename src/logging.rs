use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Installs the terminal logger. Everything goes to stderr: stdout belongs to the
/// option error message and to whatever the managed code prints.
pub fn init(level: LevelFilter) {
    let logger_config = ConfigBuilder::new()
        .set_time_offset_to_local()
        .unwrap_or_else(|config_builder| config_builder)
        .set_time_format_rfc3339()
        .build();

    if TermLogger::init(level, logger_config, TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        eprintln!("WARNING: a logger was already installed; launcher messages go to it instead.");
    }
}
