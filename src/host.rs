use crate::error::HostError;

/// An embeddable managed runtime that has not been initialized yet.
///
/// Creating a domain consumes the runtime: most embedding APIs only allow the
/// JIT to be brought up once per process.
pub trait Runtime {
    type Domain: Domain;

    fn create_domain(self, lib_path: &str, etc_path: &str, entry_name: &str) -> Result<Self::Domain, HostError>;
}

/// An initialized hosting context. Dropping it releases the context.
pub trait Domain {
    fn load_assembly(&self, name: &str) -> Result<(), HostError>;

    /// Runs the entry point of `entry_name` to completion and returns its exit code.
    fn execute(&self, entry_name: &str, args: &[String]) -> Result<i32, HostError>;
}
