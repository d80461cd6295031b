mod config;
mod error;
mod host;
mod launcher;
mod logging;
mod mono;
mod options;

use std::env;
use std::io;
use std::process::ExitCode;

use log::error;

use crate::config::Settings;
use crate::mono::MonoRuntime;

fn main() -> ExitCode {
    let settings = Settings::from_env();
    logging::init(settings.log_level);

    let result = launcher::run(env::args_os(), || MonoRuntime::load(&settings.mono_runtime));
    let err = match result {
        Ok(()) => return ExitCode::SUCCESS,
        Err(err) => err,
    };

    if let Err(io_err) = err.report(&mut io::stdout().lock()) {
        error!("could not write to stdout: {}", io_err);
    }
    ExitCode::from(err.exit_status())
}
