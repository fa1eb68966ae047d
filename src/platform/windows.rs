//! Win32 window system
//!
//! Uses EnumWindows for z-ordered enumeration, SetWindowPos for placement and
//! z-order, and the monitor/HiDpi APIs for work area and scale.
//!
//! EnumWindows reports top-level windows from the top of the z-order down,
//! which is the ordering the snapshot tie-break relies on.

#![cfg(target_os = "windows")]

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, MonitorFromWindow, MONITORINFO, MONITOR_DEFAULTTONEAREST,
};
use windows::Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI};
use windows::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VK_LBUTTON};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClassNameW, GetCursorPos, GetForegroundWindow, GetWindowLongPtrW,
    GetWindowRect, GetWindowTextLengthW, GetWindowTextW, IsWindowVisible, SetWindowPos,
    GWL_HWNDPARENT, HWND_NOTOPMOST, HWND_TOP, HWND_TOPMOST, SET_WINDOW_POS_FLAGS,
    SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER,
};

use super::traits::{HostSignals, PlatformError, PlatformResult, WindowSystem};
use super::types::{InsertAfter, RawWindow, WindowHandle, ZOrderFlags};
use crate::screen::{Point, Rect};

/// Native window system backed by user32
pub struct Win32WindowSystem;

impl Win32WindowSystem {
    pub fn new() -> Self {
        Self
    }

    /// Find the first top-level window whose title matches exactly
    pub fn find_window_by_title(&self, title: &str) -> Option<WindowHandle> {
        let mut handles: Vec<HWND> = Vec::new();
        unsafe {
            if EnumWindows(
                Some(collect_handles),
                LPARAM(&mut handles as *mut Vec<HWND> as isize),
            )
            .is_err()
            {
                return None;
            }
        }

        handles
            .into_iter()
            .find(|hwnd| window_title(*hwnd).as_deref() == Some(title))
            .map(|hwnd| WindowHandle(hwnd.0))
    }

    fn cursor_position() -> Option<Point> {
        let mut pt = POINT::default();
        unsafe { GetCursorPos(&mut pt).ok()? };
        Some(Point::new(pt.x, pt.y))
    }
}

impl Default for Win32WindowSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0)
}

fn from_rect(rect: RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

fn platform_err(e: windows::core::Error) -> PlatformError {
    PlatformError::Platform(e.message().to_string())
}

fn window_title(hwnd: HWND) -> Option<String> {
    unsafe {
        let len = GetWindowTextLengthW(hwnd);
        if len <= 0 {
            return None;
        }
        let mut buf = vec![0u16; len as usize + 1];
        let copied = GetWindowTextW(hwnd, &mut buf);
        if copied <= 0 {
            return None;
        }
        Some(String::from_utf16_lossy(&buf[..copied as usize]))
    }
}

unsafe extern "system" fn collect_handles(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let handles = &mut *(lparam.0 as *mut Vec<HWND>);
    handles.push(hwnd);
    BOOL(1)
}

unsafe extern "system" fn collect_raw_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let windows = &mut *(lparam.0 as *mut Vec<RawWindow>);

    let mut rect = RECT::default();
    if GetWindowRect(hwnd, &mut rect).is_err() {
        // Window vanished mid-enumeration
        return BOOL(1);
    }

    let mut class_buf = [0u16; 256];
    let class_len = GetClassNameW(hwnd, &mut class_buf);
    let class_name = if class_len > 0 {
        String::from_utf16_lossy(&class_buf[..class_len as usize])
    } else {
        String::new()
    };

    windows.push(RawWindow {
        handle: WindowHandle(hwnd.0),
        rect: from_rect(rect),
        visible: IsWindowVisible(hwnd).as_bool(),
        // GWL_HWNDPARENT yields the owner for top-level windows; owned
        // windows (dialogs, tool palettes) are excluded along with children
        has_parent: GetWindowLongPtrW(hwnd, GWL_HWNDPARENT) != 0,
        title_len: GetWindowTextLengthW(hwnd).max(0) as usize,
        class_name,
    });

    BOOL(1)
}

impl WindowSystem for Win32WindowSystem {
    fn enumerate_top_level_windows(&self) -> PlatformResult<Vec<RawWindow>> {
        let mut windows: Vec<RawWindow> = Vec::new();
        unsafe {
            EnumWindows(
                Some(collect_raw_window),
                LPARAM(&mut windows as *mut Vec<RawWindow> as isize),
            )
            .map_err(platform_err)?;
        }
        Ok(windows)
    }

    fn window_rect(&self, handle: WindowHandle) -> PlatformResult<Rect> {
        let mut rect = RECT::default();
        unsafe {
            GetWindowRect(hwnd(handle), &mut rect).map_err(platform_err)?;
        }
        Ok(from_rect(rect))
    }

    fn move_window(
        &mut self,
        handle: WindowHandle,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> PlatformResult<()> {
        unsafe {
            SetWindowPos(
                hwnd(handle),
                HWND::default(),
                x,
                y,
                width,
                height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
            .map_err(platform_err)
        }
    }

    fn set_window_z_order(
        &mut self,
        handle: WindowHandle,
        insert_after: InsertAfter,
        flags: ZOrderFlags,
    ) -> PlatformResult<()> {
        let after = match insert_after {
            InsertAfter::Top => HWND_TOP,
            InsertAfter::Topmost => HWND_TOPMOST,
            InsertAfter::NoTopmost => HWND_NOTOPMOST,
            InsertAfter::Window(w) => hwnd(w),
        };

        let mut swp = SET_WINDOW_POS_FLAGS(0);
        if flags.no_move {
            swp |= SWP_NOMOVE;
        }
        if flags.no_size {
            swp |= SWP_NOSIZE;
        }
        if flags.no_activate {
            swp |= SWP_NOACTIVATE;
        }

        unsafe { SetWindowPos(hwnd(handle), after, 0, 0, 0, 0, swp).map_err(platform_err) }
    }

    fn monitor_info(&self, handle: WindowHandle) -> PlatformResult<(Rect, Rect)> {
        unsafe {
            let monitor = MonitorFromWindow(hwnd(handle), MONITOR_DEFAULTTONEAREST);
            if monitor.0 == 0 {
                return Err(PlatformError::NoMonitor(handle));
            }
            let mut info = MONITORINFO {
                cbSize: std::mem::size_of::<MONITORINFO>() as u32,
                ..Default::default()
            };
            if !GetMonitorInfoW(monitor, &mut info).as_bool() {
                return Err(PlatformError::NoMonitor(handle));
            }
            Ok((from_rect(info.rcMonitor), from_rect(info.rcWork)))
        }
    }

    fn dpi_for_monitor(&self, handle: WindowHandle) -> PlatformResult<(u32, u32)> {
        unsafe {
            let monitor = MonitorFromWindow(hwnd(handle), MONITOR_DEFAULTTONEAREST);
            if monitor.0 == 0 {
                return Err(PlatformError::NoMonitor(handle));
            }
            let mut dpi_x = 0u32;
            let mut dpi_y = 0u32;
            GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y)
                .map_err(platform_err)?;
            Ok((dpi_x, dpi_y))
        }
    }

    fn window_above(&self, handle: WindowHandle) -> PlatformResult<Option<WindowHandle>> {
        // Walk the same z-ordered enumeration the snapshot uses
        let mut handles: Vec<HWND> = Vec::new();
        unsafe {
            EnumWindows(
                Some(collect_handles),
                LPARAM(&mut handles as *mut Vec<HWND> as isize),
            )
            .map_err(platform_err)?;
        }
        let idx = handles
            .iter()
            .position(|h| h.0 == handle.0)
            .ok_or(PlatformError::WindowNotFound(handle))?;
        Ok(idx.checked_sub(1).map(|above| WindowHandle(handles[above].0)))
    }
}

impl HostSignals for Win32WindowSystem {
    fn is_dragging(&self, avatar: WindowHandle) -> bool {
        let button_down = unsafe { GetAsyncKeyState(VK_LBUTTON.0 as i32) } as u16 & 0x8000 != 0;
        if !button_down {
            return false;
        }
        match (Self::cursor_position(), self.window_rect(avatar)) {
            (Some(cursor), Ok(rect)) => rect.contains(cursor),
            _ => false,
        }
    }

    fn is_focused(&self, avatar: WindowHandle) -> bool {
        unsafe { GetForegroundWindow().0 == avatar.0 }
    }
}
