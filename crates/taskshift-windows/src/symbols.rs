//! Private symbol lookup through DbgHelp.
//!
//! `TrayUI::_SetStuckMonitor` is not exported. Its address is found by
//! loading the public PDB of the module (downloaded from the symbol
//! server into a local cache on first use) and matching the undecorated
//! name of every candidate against the accepted signatures.

use std::env;
use std::ffi::c_void;
use std::slice;

use taskshift_core::ActivationError;
use windows::Win32::Foundation::{HANDLE, HMODULE};
use windows::Win32::System::Diagnostics::Debug::{
    SYMBOL_INFOW, SYMOPT_DEFERRED_LOADS, SYMOPT_FAIL_CRITICAL_ERRORS, SYMOPT_NO_PROMPTS,
    SymCleanup, SymEnumSymbolsW, SymInitializeW, SymLoadModuleExW, SymSetOptions,
    SYM_LOAD_FLAGS, UnDecorateSymbolNameW,
};
use windows::Win32::System::LibraryLoader::{GetModuleFileNameW, GetModuleHandleW, LoadLibraryW};
use windows::Win32::System::Threading::GetCurrentProcess;
use windows::core::{BOOL, HSTRING, PCWSTR};

/// Undecoration flags: full declaration without `__ptr64` qualifiers.
const UNDNAME_COMPLETE: u32 = 0x0000;
const UNDNAME_NO_PTR64: u32 = 0x20000;

const MAX_NAME: usize = 1024;

/// Public Microsoft symbol server.
const SYMBOL_SERVER: &str = "https://msdl.microsoft.com/download/symbols";

/// Search path used when none is configured: the public server behind a
/// cache in the temp directory.
pub fn default_search_path() -> String {
    let cache = env::temp_dir().join("taskshift-symbols");
    format!("srv*{}*{SYMBOL_SERVER}", cache.display())
}

/// Resolves the address of a private function of `module`.
///
/// `mask` narrows the DbgHelp enumeration; a candidate matches when its
/// undecorated name equals one of `signatures`, ignoring whitespace.
pub fn resolve(
    module: &str,
    mask: &str,
    signatures: &[&str],
    search_path: &str,
) -> Result<usize, ActivationError> {
    let handle = load_module(module)?;
    let image = module_path(handle).ok_or_else(|| ActivationError::ModuleLoad(module.into()))?;
    let base = handle.0 as u64;

    let search_path = if search_path.is_empty() {
        default_search_path()
    } else {
        search_path.to_string()
    };
    let session = SymbolSession::open(&search_path)?;
    session.load_module(&image, base)?;

    let mut search = Search {
        signatures,
        found: None,
    };
    let mask = HSTRING::from(mask);
    // SAFETY: the callback only runs during this call and `search` outlives it.
    let enumerated = unsafe {
        SymEnumSymbolsW(
            session.process,
            base,
            &mask,
            Some(enum_symbol_callback),
            Some(&mut search as *mut Search as *const c_void),
        )
    };

    // Stopping the enumeration early may surface as an error.
    if let Some(address) = search.found {
        return Ok(address);
    }
    enumerated.map_err(|e| ActivationError::SymbolNotFound(format!("{mask}: {e}")))?;
    Err(ActivationError::SymbolNotFound(signatures.join(" | ")))
}

/// Whether an undecorated symbol name is one of the accepted signatures.
pub fn signature_matches(undecorated: &str, signatures: &[&str]) -> bool {
    let name = strip_whitespace(undecorated);
    signatures.iter().any(|s| strip_whitespace(s) == name)
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn load_module(module: &str) -> Result<HMODULE, ActivationError> {
    let name = HSTRING::from(module);
    // SAFETY: both calls only read the module name.
    unsafe { GetModuleHandleW(&name).or_else(|_| LoadLibraryW(&name)) }
        .map_err(|e| ActivationError::ModuleLoad(format!("{module}: {e}")))
}

fn module_path(module: HMODULE) -> Option<String> {
    let mut buf = [0u16; 260];
    // SAFETY: the buffer length is passed implicitly through the slice.
    let len = unsafe { GetModuleFileNameW(Some(module), &mut buf) } as usize;
    (len > 0).then(|| String::from_utf16_lossy(&buf[..len]))
}

/// An initialized DbgHelp session, cleaned up on drop.
struct SymbolSession {
    process: HANDLE,
}

impl SymbolSession {
    fn open(search_path: &str) -> Result<Self, ActivationError> {
        // SAFETY: GetCurrentProcess returns a pseudo handle; SymInitializeW
        // copies the search path.
        unsafe {
            let process = GetCurrentProcess();
            SymSetOptions(SYMOPT_DEFERRED_LOADS | SYMOPT_FAIL_CRITICAL_ERRORS | SYMOPT_NO_PROMPTS);
            SymInitializeW(process, &HSTRING::from(search_path), false)
                .map_err(|e| ActivationError::SymbolNotFound(format!("SymInitializeW: {e}")))?;
            Ok(Self { process })
        }
    }

    fn load_module(&self, image: &str, base: u64) -> Result<(), ActivationError> {
        // SAFETY: the image path is copied by DbgHelp.
        let loaded = unsafe {
            SymLoadModuleExW(
                self.process,
                None,
                &HSTRING::from(image),
                PCWSTR::null(),
                base,
                0,
                None,
                SYM_LOAD_FLAGS(0),
            )
        };
        if loaded == 0 {
            return Err(ActivationError::SymbolNotFound(format!(
                "no symbols for {image}"
            )));
        }
        Ok(())
    }
}

impl Drop for SymbolSession {
    fn drop(&mut self) {
        // SAFETY: the session was initialized for this handle.
        let _ = unsafe { SymCleanup(self.process) };
    }
}

struct Search<'a> {
    signatures: &'a [&'a str],
    found: Option<usize>,
}

unsafe extern "system" fn enum_symbol_callback(
    info: *const SYMBOL_INFOW,
    _size: u32,
    context: *const c_void,
) -> BOOL {
    // SAFETY: DbgHelp passes a valid SYMBOL_INFOW whose name is NameLen
    // characters long; context is the Search from resolve().
    let (info, search) = unsafe { (&*info, &mut *(context as *mut Search)) };
    let decorated = unsafe { slice::from_raw_parts(info.Name.as_ptr(), info.NameLen as usize) };

    let mut decorated_z = decorated.to_vec();
    decorated_z.push(0);
    let mut out = [0u16; MAX_NAME];
    // SAFETY: the input is NUL-terminated and the output length comes from the slice.
    let len = unsafe {
        UnDecorateSymbolNameW(
            PCWSTR(decorated_z.as_ptr()),
            &mut out,
            UNDNAME_COMPLETE | UNDNAME_NO_PTR64,
        )
    } as usize;
    if len == 0 {
        return BOOL(1);
    }

    let undecorated = String::from_utf16_lossy(&out[..len]);
    if signature_matches(&undecorated, search.signatures) {
        search.found = Some(info.Address as usize);
        return BOOL(0); // stop enumerating
    }
    BOOL(1)
}
