use std::ffi::OsString;

use clap::Parser;

use crate::error::OptionParseError;

pub const DEFAULT_MONO_LIB: &str = "Mono\\lib";
pub const DEFAULT_MONO_ETC: &str = "Mono\\etc";

/// Options for mono
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "fquake3", disable_version_flag = true, args_override_self = true)]
pub struct LaunchOptions {
    /// Mono lib directory path
    #[arg(long = "mono-lib", value_name = "PATH", default_value = DEFAULT_MONO_LIB)]
    pub lib_path: String,

    /// Mono etc directory path
    #[arg(long = "mono-etc", value_name = "PATH", default_value = DEFAULT_MONO_ETC)]
    pub etc_path: String,

    /// Arguments passed through to the entry module
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

impl LaunchOptions {
    /// Parses a full argument vector, program name first.
    pub fn parse_from_args<I, T>(args: I) -> Result<LaunchOptions, OptionParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        LaunchOptions::try_parse_from(args).map_err(OptionParseError::new)
    }
}
