use std::mem;

use taskshift_core::{MonitorId, MonitorInfo, Point, Rect, WindowResult};
use windows::Win32::Foundation::{LPARAM, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITOR_DEFAULTTONEAREST,
    MONITOR_DEFAULTTOPRIMARY, MONITORINFO, MONITORINFOEXW, MONITORINFOF_PRIMARY,
};
use windows::core::BOOL;

use crate::hooks;

/// Enumerates all displays in system enumeration order.
pub fn enumerate_monitors() -> WindowResult<Vec<MonitorInfo>> {
    let mut handles: Vec<HMONITOR> = Vec::new();

    // SAFETY: EnumDisplayMonitors calls our callback synchronously for each
    // display. The Vec outlives the call, so the pointer in LPARAM is valid.
    let ok = unsafe {
        EnumDisplayMonitors(
            None,
            None,
            Some(enum_monitor_callback),
            LPARAM(&mut handles as *mut _ as isize),
        )
    };
    if !ok.as_bool() {
        return Err("EnumDisplayMonitors failed".into());
    }

    Ok(handles.into_iter().filter_map(monitor_info).collect())
}

unsafe extern "system" fn enum_monitor_callback(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    // SAFETY: lparam is the Vec<HMONITOR> pointer from enumerate_monitors().
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<HMONITOR>) };
    handles.push(hmonitor);
    BOOL(1) // TRUE, continue enumerating
}

/// Queries bounds, flags and device name of a display.
pub fn monitor_info(hmonitor: HMONITOR) -> Option<MonitorInfo> {
    let id = monitor_id(hmonitor)?;
    let mut info = MONITORINFOEXW::default();
    info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;

    // SAFETY: cbSize announces the extended struct, so GetMonitorInfoW may
    // also fill szDevice. The pointer covers the whole MONITORINFOEXW.
    let ok = unsafe { GetMonitorInfoW(hmonitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO) };
    if !ok.as_bool() {
        return None;
    }

    let device_len = info
        .szDevice
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(info.szDevice.len());

    Some(MonitorInfo {
        id,
        rect: rect(info.monitorInfo.rcMonitor),
        work_area: rect(info.monitorInfo.rcWork),
        is_primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
        device: String::from_utf16_lossy(&info.szDevice[..device_len]),
    })
}

/// The display containing the origin, bypassing any installed detour.
pub fn primary_monitor() -> Option<MonitorId> {
    monitor_id(hooks::monitor_from_point_unhooked(
        POINT::default(),
        MONITOR_DEFAULTTOPRIMARY,
    ))
}

/// The display nearest to `point`, bypassing any installed detour.
pub fn nearest_monitor(point: Point) -> Option<MonitorId> {
    monitor_id(hooks::monitor_from_point_unhooked(
        POINT {
            x: point.x,
            y: point.y,
        },
        MONITOR_DEFAULTTONEAREST,
    ))
}

pub fn monitor_id(hmonitor: HMONITOR) -> Option<MonitorId> {
    MonitorId::from_raw(hmonitor.0 as usize)
}

/// Converts back to a handle. `None` becomes a null handle.
pub fn hmonitor(id: Option<MonitorId>) -> HMONITOR {
    HMONITOR(id.map_or(0, MonitorId::as_raw) as *mut _)
}

pub fn rect(rc: RECT) -> Rect {
    Rect::from_edges(rc.left, rc.top, rc.right, rc.bottom)
}
