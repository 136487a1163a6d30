//! The unsafe boundary: detours over the host's two monitor call paths.
//!
//! Detoured functions are plain C callbacks with no context argument, so
//! the engine state and the trampolines are reached through statics in
//! this module and nowhere else. Everything the hooks decide comes from
//! [`MonitorPolicy`] on the shared [`EngineState`].
//!
//! Detours are disabled on uninstall but never freed, and the published
//! state is never released: a host thread may still be running inside a
//! hook or a trampoline when uninstall returns.

use std::ffi::c_void;
use std::mem;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use retour::GenericDetour;
use taskshift_core::{ActivationError, EngineState, Interceptor, MonitorPolicy, Point};
use taskshift_core::config::SymbolsConfig;
use windows::Win32::Foundation::POINT;
use windows::Win32::Graphics::Gdi::{
    HMONITOR, MONITOR_DEFAULTTONEAREST, MONITOR_FROM_FLAGS, MonitorFromPoint,
};
use windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};
use windows::core::{HRESULT, s, w};

use crate::{monitor, symbols};

type MonitorFromPointFn = unsafe extern "system" fn(POINT, MONITOR_FROM_FLAGS) -> HMONITOR;
type SetStuckMonitorFn = unsafe extern "system" fn(*mut c_void, HMONITOR) -> HRESULT;

/// Module that implements the taskbar.
pub const TASKBAR_MODULE: &str = "taskbar.dll";

/// DbgHelp mask narrowing the enumeration to `TrayUI::_SetStuckMonitor`.
const SET_STUCK_MONITOR_MASK: &str = "*_SetStuckMonitor@TrayUI*";

/// Accepted undecorated signatures. Windows builds differ in return type.
pub const SET_STUCK_MONITOR_SIGNATURES: &[&str] = &[
    "public: long __cdecl TrayUI::_SetStuckMonitor(struct HMONITOR__ *)",
    "public: void __cdecl TrayUI::_SetStuckMonitor(struct HMONITOR__ *)",
];

static STATE: AtomicPtr<EngineState> = AtomicPtr::new(ptr::null_mut());
static MONITOR_FROM_POINT_ORIGINAL: AtomicUsize = AtomicUsize::new(0);
static SET_STUCK_MONITOR_ORIGINAL: AtomicUsize = AtomicUsize::new(0);
static DETOURS: Mutex<Option<Detours>> = Mutex::new(None);

struct Detours {
    monitor_from_point: GenericDetour<MonitorFromPointFn>,
    set_stuck_monitor: GenericDetour<SetStuckMonitorFn>,
    enabled: bool,
}

/// Installs the interception points over `MonitorFromPoint` (user32) and
/// `TrayUI::_SetStuckMonitor` (taskbar.dll).
#[derive(Debug, Clone, Default)]
pub struct TaskbarHooks {
    search_path: String,
}

impl TaskbarHooks {
    pub fn new(config: &SymbolsConfig) -> Self {
        Self {
            search_path: config.search_path.clone(),
        }
    }
}

impl Interceptor for TaskbarHooks {
    fn install(&mut self, state: &Arc<EngineState>) -> Result<(), ActivationError> {
        let mut slot = DETOURS
            .lock()
            .map_err(|_| ActivationError::Hook("detour registry poisoned".into()))?;

        if slot.as_ref().is_some_and(|d| d.enabled) {
            return Err(ActivationError::AlreadyActive);
        }

        // Published before enabling so an active hook always finds a state.
        // A previously published state is intentionally left allocated.
        STATE.store(Arc::into_raw(state.clone()) as *mut EngineState, Ordering::Release);

        let detours = match slot.take() {
            Some(existing) => existing,
            None => create_detours(&self.search_path)?,
        };
        let detours = slot.insert(detours);

        // SAFETY: both targets were resolved from the loaded modules and the
        // detours have matching signatures.
        unsafe {
            detours.monitor_from_point.enable().map_err(hook_error)?;
            if let Err(e) = detours.set_stuck_monitor.enable() {
                let _ = detours.monitor_from_point.disable();
                return Err(hook_error(e));
            }
        }
        detours.enabled = true;

        taskshift_core::log_info!("taskbar hooks installed");
        Ok(())
    }

    fn uninstall(&mut self) {
        let Ok(mut slot) = DETOURS.lock() else {
            return;
        };
        let Some(detours) = slot.as_mut().filter(|d| d.enabled) else {
            return;
        };

        // SAFETY: disabling restores the original prologues; trampolines stay valid.
        unsafe {
            if let Err(e) = detours.set_stuck_monitor.disable() {
                taskshift_core::log_error!("could not remove _SetStuckMonitor hook: {e}");
            }
            if let Err(e) = detours.monitor_from_point.disable() {
                taskshift_core::log_error!("could not remove MonitorFromPoint hook: {e}");
            }
        }
        detours.enabled = false;
        taskshift_core::log_info!("taskbar hooks removed");
    }
}

fn create_detours(search_path: &str) -> Result<Detours, ActivationError> {
    let monitor_from_point_target = user32_monitor_from_point()?;
    let set_stuck_monitor_target = symbols::resolve(
        TASKBAR_MODULE,
        SET_STUCK_MONITOR_MASK,
        SET_STUCK_MONITOR_SIGNATURES,
        search_path,
    )?;
    taskshift_core::log_info!("resolved TrayUI::_SetStuckMonitor at 0x{set_stuck_monitor_target:X}");

    // SAFETY: the addresses point at functions with exactly these
    // signatures (an export of user32 and a symbol matched by its full
    // undecorated signature).
    unsafe {
        let monitor_from_point_target: MonitorFromPointFn = mem::transmute(monitor_from_point_target);
        let set_stuck_monitor_target: SetStuckMonitorFn = mem::transmute(set_stuck_monitor_target);

        let monitor_from_point = GenericDetour::<MonitorFromPointFn>::new(
            monitor_from_point_target,
            monitor_from_point_hook,
        )
        .map_err(hook_error)?;
        let set_stuck_monitor = GenericDetour::<SetStuckMonitorFn>::new(
            set_stuck_monitor_target,
            set_stuck_monitor_hook,
        )
        .map_err(hook_error)?;

        MONITOR_FROM_POINT_ORIGINAL.store(
            monitor_from_point.trampoline() as *const () as usize,
            Ordering::Release,
        );
        SET_STUCK_MONITOR_ORIGINAL.store(
            set_stuck_monitor.trampoline() as *const () as usize,
            Ordering::Release,
        );

        Ok(Detours {
            monitor_from_point,
            set_stuck_monitor,
            enabled: false,
        })
    }
}

/// Address of the real `MonitorFromPoint` export.
///
/// The `windows` crate's `MonitorFromPoint` is a Rust wrapper; the detour
/// must target the export itself.
fn user32_monitor_from_point() -> Result<usize, ActivationError> {
    // SAFETY: user32 is always loaded in a GUI process; both calls only read.
    unsafe {
        let module = GetModuleHandleW(w!("user32.dll"))
            .map_err(|e| ActivationError::ModuleLoad(format!("user32.dll: {e}")))?;
        let export = GetProcAddress(module, s!("MonitorFromPoint"))
            .ok_or_else(|| ActivationError::SymbolNotFound("user32!MonitorFromPoint".into()))?;
        Ok(export as usize)
    }
}

fn hook_error(e: retour::Error) -> ActivationError {
    ActivationError::Hook(e.to_string())
}

fn state() -> Option<&'static EngineState> {
    // SAFETY: a published state is never released, see the module docs.
    unsafe { STATE.load(Ordering::Acquire).as_ref() }
}

/// Calls the real `MonitorFromPoint`, skipping the detour when installed.
pub fn monitor_from_point_unhooked(point: POINT, flags: MONITOR_FROM_FLAGS) -> HMONITOR {
    let original = MONITOR_FROM_POINT_ORIGINAL.load(Ordering::Acquire);
    if original == 0 {
        // SAFETY: MonitorFromPoint has no preconditions.
        return unsafe { MonitorFromPoint(point, flags) };
    }
    // SAFETY: the trampoline was created for this exact signature and is never freed.
    unsafe {
        let original: MonitorFromPointFn = mem::transmute(original);
        original(point, flags)
    }
}

unsafe extern "system" fn monitor_from_point_hook(
    point: POINT,
    flags: MONITOR_FROM_FLAGS,
) -> HMONITOR {
    if let Some(state) = state()
        && let Some(monitor) = state.monitor_at(Point::new(point.x, point.y))
    {
        return monitor::hmonitor(Some(monitor));
    }
    monitor_from_point_unhooked(point, flags)
}

unsafe extern "system" fn set_stuck_monitor_hook(this: *mut c_void, requested: HMONITOR) -> HRESULT {
    let nearest_to_origin =
        || monitor::monitor_id(monitor_from_point_unhooked(POINT::default(), MONITOR_DEFAULTTONEAREST));
    let requested = monitor::monitor_id(requested);
    let chosen = match state() {
        Some(state) => state.stuck_monitor(requested, &nearest_to_origin),
        None => requested.or_else(nearest_to_origin),
    };

    // SAFETY: the hook is only reachable while its detour exists, and the
    // trampoline address was stored before the detour was enabled.
    unsafe {
        let original: SetStuckMonitorFn =
            mem::transmute(SET_STUCK_MONITOR_ORIGINAL.load(Ordering::Acquire));
        original(this, monitor::hmonitor(chosen))
    }
}
