use std::env;
use std::str::FromStr;

use log::LevelFilter;

pub const MONO_RUNTIME_VAR: &str = "FQUAKE3_MONO_RUNTIME";
pub const LOG_LEVEL_VAR: &str = "FQUAKE3_LOG";

#[cfg(target_os = "windows")]
pub const DEFAULT_MONO_RUNTIME: &str = "mono-2.0-sgen.dll";
#[cfg(target_os = "macos")]
pub const DEFAULT_MONO_RUNTIME: &str = "libmonosgen-2.0.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const DEFAULT_MONO_RUNTIME: &str = "libmonosgen-2.0.so";

/// Settings taken from the environment rather than the command line, so they
/// never collide with arguments meant for the entry module.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mono_runtime: String,
    pub log_level: LevelFilter,
}

impl Settings {
    pub fn from_env() -> Settings {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let mono_runtime = lookup(MONO_RUNTIME_VAR)
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_MONO_RUNTIME.to_owned());
        let log_level = lookup(LOG_LEVEL_VAR)
            .and_then(|level| LevelFilter::from_str(level.trim()).ok())
            .unwrap_or(LevelFilter::Warn);
        Settings { mono_runtime, log_level }
    }
}
