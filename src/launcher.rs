use std::ffi::OsString;

use log::{error, info, warn};

use crate::error::{HostError, LaunchError};
use crate::host::{Domain, Runtime};
use crate::options::LaunchOptions;

pub const ENTRY_MODULE: &str = "Launcher.exe";

/// Loaded in this order before the entry module runs; each depends on the ones before it.
pub const ASSEMBLIES: [&str; 5] = [
    "FSharp.Core.dll",
    "FQuake3.Utils.dll",
    "Engine.dll",
    "Engine.Renderer.dll",
    // temporary, until the client game is loaded by the engine itself
    "CGame.dll",
];

/// Brings up a domain, loads the engine assemblies and runs the entry module.
///
/// Only a failure to create the domain is returned. Load and execution failures
/// are logged and the launch carries on, so the domain is always released once
/// it exists.
pub fn launch<R: Runtime>(runtime: R, options: LaunchOptions) -> Result<(), HostError> {
    let domain = runtime.create_domain(&options.lib_path, &options.etc_path, ENTRY_MODULE)?;

    for &assembly in ASSEMBLIES.iter() {
        if let Err(e) = domain.load_assembly(assembly) {
            warn!("{}", e);
        }
    }

    match domain.execute(ENTRY_MODULE, &options.args) {
        Ok(code) => info!("{} exited with code {}", ENTRY_MODULE, code),
        Err(e) => error!("{}", e),
    }

    drop(domain);
    drop(options);
    Ok(())
}

/// Parses `argv` and, only if that succeeds, opens the runtime and launches.
pub fn run<I, T, R, F>(argv: I, open_runtime: F) -> Result<(), LaunchError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    R: Runtime,
    F: FnOnce() -> Result<R, HostError>,
{
    let options = LaunchOptions::parse_from_args(argv)?;
    let runtime = open_runtime()?;
    launch(runtime, options)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(String, String, String),
        Load(String),
        Execute(String, Vec<String>),
        Release,
    }

    type Calls = Rc<RefCell<Vec<Call>>>;

    struct RecordingRuntime {
        calls: Calls,
        fail_create: bool,
        fail_load: Option<&'static str>,
        fail_execute: bool,
    }

    struct RecordingDomain {
        calls: Calls,
        fail_load: Option<&'static str>,
        fail_execute: bool,
    }

    impl Runtime for RecordingRuntime {
        type Domain = RecordingDomain;

        fn create_domain(self, lib_path: &str, etc_path: &str, entry_name: &str) -> Result<RecordingDomain, HostError> {
            self.calls.borrow_mut().push(Call::Create(lib_path.into(), etc_path.into(), entry_name.into()));
            if self.fail_create {
                return Err(HostError::DomainInit(entry_name.into()));
            }
            Ok(RecordingDomain { calls: self.calls, fail_load: self.fail_load, fail_execute: self.fail_execute })
        }
    }

    impl Domain for RecordingDomain {
        fn load_assembly(&self, name: &str) -> Result<(), HostError> {
            self.calls.borrow_mut().push(Call::Load(name.into()));
            if self.fail_load == Some(name) {
                return Err(HostError::AssemblyLoad(name.into()));
            }
            Ok(())
        }

        fn execute(&self, entry_name: &str, args: &[String]) -> Result<i32, HostError> {
            self.calls.borrow_mut().push(Call::Execute(entry_name.into(), args.to_vec()));
            if self.fail_execute {
                return Err(HostError::AssemblyLoad(entry_name.into()));
            }
            Ok(0)
        }
    }

    impl Drop for RecordingDomain {
        fn drop(&mut self) {
            self.calls.borrow_mut().push(Call::Release);
        }
    }

    fn runtime() -> (RecordingRuntime, Calls) {
        let calls = Calls::default();
        let runtime = RecordingRuntime {
            calls: calls.clone(),
            fail_create: false,
            fail_load: None,
            fail_execute: false,
        };
        (runtime, calls)
    }

    fn options(args: &[&str]) -> LaunchOptions {
        let mut argv = vec!["fquake3"];
        argv.extend_from_slice(args);
        LaunchOptions::parse_from_args(argv).unwrap()
    }

    fn loads(calls: &[Call]) -> Vec<String> {
        calls
            .iter()
            .filter_map(|call| match call {
                Call::Load(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    fn releases(calls: &[Call]) -> usize {
        calls.iter().filter(|&call| *call == Call::Release).count()
    }

    #[test]
    fn runs_full_sequence_in_order() {
        let (runtime, calls) = runtime();
        launch(runtime, options(&["--mono-lib", "Custom\\lib", "--mono-etc", "Custom\\etc", "foo", "bar"])).unwrap();

        let calls = calls.borrow();
        assert_eq!(
            *calls,
            vec![
                Call::Create("Custom\\lib".into(), "Custom\\etc".into(), "Launcher.exe".into()),
                Call::Load("FSharp.Core.dll".into()),
                Call::Load("FQuake3.Utils.dll".into()),
                Call::Load("Engine.dll".into()),
                Call::Load("Engine.Renderer.dll".into()),
                Call::Load("CGame.dll".into()),
                Call::Execute("Launcher.exe".into(), vec!["foo".into(), "bar".into()]),
                Call::Release,
            ]
        );
    }

    #[test]
    fn default_paths_reach_the_domain() {
        let (runtime, calls) = runtime();
        launch(runtime, options(&[])).unwrap();
        assert_eq!(calls.borrow()[0], Call::Create("Mono\\lib".into(), "Mono\\etc".into(), "Launcher.exe".into()));
    }

    #[test]
    fn failed_load_does_not_stop_the_launch() {
        let (mut runtime, calls) = runtime();
        runtime.fail_load = Some("Engine.dll");
        launch(runtime, options(&[])).unwrap();

        let calls = calls.borrow();
        assert_eq!(loads(&calls), ASSEMBLIES.iter().map(|name| name.to_string()).collect::<Vec<_>>());
        assert!(calls.iter().any(|call| matches!(call, Call::Execute(..))));
        assert_eq!(releases(&calls), 1);
    }

    #[test]
    fn failed_execute_still_releases_once() {
        let (mut runtime, calls) = runtime();
        runtime.fail_execute = true;
        assert!(launch(runtime, options(&["foo"])).is_ok());

        let calls = calls.borrow();
        assert!(calls.contains(&Call::Execute("Launcher.exe".into(), vec!["foo".into()])));
        assert_eq!(releases(&calls), 1);
        assert_eq!(calls.last(), Some(&Call::Release));
    }

    #[test]
    fn parse_failure_never_opens_the_runtime() {
        let (runtime, calls) = runtime();
        let mut opened = false;
        let err = run(vec!["fquake3", "--bogus"], || {
            opened = true;
            Ok(runtime)
        })
        .unwrap_err();

        assert_eq!(err.exit_status(), 1);
        assert!(err.to_string().contains("Invalid option"));
        assert!(!opened);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn run_passes_arguments_through() {
        let (runtime, calls) = runtime();
        run(vec!["fquake3", "--mono-etc=etc", "+set", "fs_game", "baseq3"], || Ok(runtime)).unwrap();

        let calls = calls.borrow();
        assert_eq!(calls[0], Call::Create("Mono\\lib".into(), "etc".into(), "Launcher.exe".into()));
        assert!(calls.contains(&Call::Execute(
            "Launcher.exe".into(),
            vec!["+set".into(), "fs_game".into(), "baseq3".into()]
        )));
        assert_eq!(releases(&calls), 1);
    }

    #[test]
    fn failed_create_releases_nothing() {
        let (mut runtime, calls) = runtime();
        runtime.fail_create = true;
        let err = launch(runtime, options(&[])).unwrap_err();

        assert!(matches!(err, HostError::DomainInit(_)));
        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(releases(&calls), 0);
    }
}
