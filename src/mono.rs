extern crate libloading as lib;

use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_void};
use std::ptr;
use std::vec::Vec;

use log::{debug, error};

use crate::error::HostError;
use crate::host::{Domain, Runtime};

type MonoSetDirs = unsafe extern "C" fn(*const c_char, *const c_char);
type MonoConfigParse = unsafe extern "C" fn(*const c_char);
type MonoJitInit = unsafe extern "C" fn(*const c_char) -> *mut c_void;
type MonoDomainAssemblyOpen = unsafe extern "C" fn(*mut c_void, *const c_char) -> *mut c_void;
type MonoJitExec = unsafe extern "C" fn(*mut c_void, *mut c_void, c_int, *mut *mut c_char) -> c_int;
type MonoJitCleanup = unsafe extern "C" fn(*mut c_void);

const EXPORTS: [&str; 6] = [
    "mono_set_dirs",
    "mono_config_parse",
    "mono_jit_init",
    "mono_domain_assembly_open",
    "mono_jit_exec",
    "mono_jit_cleanup",
];

fn symbol<'lib, T>(library: &'lib lib::Library, name: &'static str) -> Result<lib::Symbol<'lib, T>, HostError> {
    unsafe { library.get(name.as_bytes()) }.map_err(|source| HostError::MissingSymbol { symbol: name, source })
}

/// The Mono shared library, opened but not yet initialized.
#[derive(Debug)]
pub struct MonoRuntime {
    library: lib::Library,
}

impl MonoRuntime {
    pub fn load(library_path: &str) -> Result<MonoRuntime, HostError> {
        let library = lib::Library::new(library_path).map_err(|source| HostError::LibraryLoad {
            path: library_path.to_owned(),
            source,
        })?;
        // Resolve every entry point now so a broken install fails before the JIT starts.
        for &name in EXPORTS.iter() {
            symbol::<*mut c_void>(&library, name)?;
        }
        debug!("opened Mono runtime from {}", library_path);
        Ok(MonoRuntime { library })
    }
}

impl Runtime for MonoRuntime {
    type Domain = MonoDomain;

    fn create_domain(self, lib_path: &str, etc_path: &str, entry_name: &str) -> Result<MonoDomain, HostError> {
        let lib_path_ptr = CString::new(lib_path)?;
        let etc_path_ptr = CString::new(etc_path)?;
        let entry_name_ptr = CString::new(entry_name)?;
        let domain = {
            let set_dirs: lib::Symbol<MonoSetDirs> = symbol(&self.library, "mono_set_dirs")?;
            let config_parse: lib::Symbol<MonoConfigParse> = symbol(&self.library, "mono_config_parse")?;
            let jit_init: lib::Symbol<MonoJitInit> = symbol(&self.library, "mono_jit_init")?;
            unsafe {
                set_dirs(lib_path_ptr.as_ptr(), etc_path_ptr.as_ptr());
                config_parse(ptr::null());
                jit_init(entry_name_ptr.as_ptr())
            }
        };
        if domain.is_null() {
            Err(HostError::DomainInit(entry_name.to_owned()))
        } else {
            debug!("initialized domain {} (lib: {}, etc: {})", entry_name, lib_path, etc_path);
            Ok(MonoDomain { library: self.library, domain })
        }
    }
}

#[derive(Debug)]
pub struct MonoDomain {
    library: lib::Library,
    domain: *mut c_void,
}

impl MonoDomain {
    fn open_assembly(&self, name: &str) -> Result<*mut c_void, HostError> {
        let name_ptr = CString::new(name)?;
        let assembly_open: lib::Symbol<MonoDomainAssemblyOpen> = symbol(&self.library, "mono_domain_assembly_open")?;
        let assembly = unsafe { assembly_open(self.domain, name_ptr.as_ptr()) };
        if assembly.is_null() {
            Err(HostError::AssemblyLoad(name.to_owned()))
        } else {
            Ok(assembly)
        }
    }
}

impl Domain for MonoDomain {
    fn load_assembly(&self, name: &str) -> Result<(), HostError> {
        self.open_assembly(name)?;
        debug!("loaded assembly {}", name);
        Ok(())
    }

    fn execute(&self, entry_name: &str, args: &[String]) -> Result<i32, HostError> {
        let assembly = self.open_assembly(entry_name)?;
        let jit_exec: lib::Symbol<MonoJitExec> = symbol(&self.library, "mono_jit_exec")?;

        // The embedding API expects the assembly itself in argv[0].
        let mut c_args = Vec::with_capacity(args.len() + 1);
        c_args.push(CString::new(entry_name)?);
        for arg in args.iter() {
            c_args.push(CString::new(arg.as_str())?);
        }
        let mut argv: Vec<*mut c_char> = c_args.iter().map(|arg| arg.as_ptr() as *mut c_char).collect();

        debug!("executing {} with {} argument(s)", entry_name, args.len());
        let result = unsafe { jit_exec(self.domain, assembly, argv.len() as c_int, argv.as_mut_ptr()) };
        Ok(result)
    }
}

impl Drop for MonoDomain {
    fn drop(&mut self) {
        // Drop can't report failure, and the symbol was already resolved in MonoRuntime::load.
        match symbol::<MonoJitCleanup>(&self.library, "mono_jit_cleanup") {
            Ok(cleanup) => unsafe { cleanup(self.domain) },
            Err(e) => error!("could not release domain: {}", e),
        }
    }
}
