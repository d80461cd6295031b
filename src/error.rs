use std::ffi::NulError;
use std::io::{self, Write};

use log::error;
use thiserror::Error;

/// Command line could not be parsed. Displayed to the user as-is.
#[derive(Debug, Error)]
#[error("Invalid option: {message}")]
pub struct OptionParseError {
    message: String,
    #[source]
    source: clap::Error,
}

impl OptionParseError {
    pub fn new(source: clap::Error) -> OptionParseError {
        // clap renders "error: <message>", then usage hints on later lines.
        let rendered = source.render().to_string();
        let first_line = rendered.lines().next().unwrap_or_default().trim();
        let message = match first_line.strip_prefix("error: ").unwrap_or(first_line) {
            "" => source.kind().to_string(),
            line => line.to_owned(),
        };
        OptionParseError { message, source }
    }

    pub fn kind(&self) -> clap::error::ErrorKind {
        self.source.kind()
    }

    /// `--help` surfaces as a parse error; it is not a failure.
    pub fn is_help(&self) -> bool {
        self.kind() == clap::error::ErrorKind::DisplayHelp
    }

    /// clap's own rendering, which is the usage text for `--help`.
    pub fn usage(&self) -> String {
        self.source.render().to_string()
    }
}

/// Failures reported by the hosting environment.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("could not open runtime library {path}: {source}")]
    LibraryLoad { path: String, source: io::Error },
    #[error("runtime library does not export {symbol}: {source}")]
    MissingSymbol { symbol: &'static str, source: io::Error },
    #[error("string passed to the runtime contains a NUL byte")]
    InteriorNul(#[from] NulError),
    #[error("runtime refused to create domain for {0}")]
    DomainInit(String),
    #[error("could not load assembly {0}")]
    AssemblyLoad(String),
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Options(#[from] OptionParseError),
    #[error(transparent)]
    Host(#[from] HostError),
}

impl LaunchError {
    pub fn exit_status(&self) -> u8 {
        match self {
            LaunchError::Options(e) if e.is_help() => 0,
            LaunchError::Options(_) => 1,
            LaunchError::Host(_) => 2,
        }
    }

    /// Option problems go to `out` for the user; hosting failures go to the log.
    pub fn report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            LaunchError::Options(e) if e.is_help() => write!(out, "{}", e.usage()),
            LaunchError::Options(e) => writeln!(out, "{}", e),
            LaunchError::Host(e) => {
                error!("{}", e);
                Ok(())
            }
        }
    }
}
