//! Platform module - native window primitives
//!
//! This module provides abstractions for:
//! - Enumerating top-level windows in z-order
//! - Moving windows and changing their z-order
//! - Querying monitor geometry and DPI
//! - Reading host signals (drag, focus) for the avatar window

mod fake;
mod traits;
mod types;

#[cfg(target_os = "windows")]
mod windows;

pub use fake::{FakeMonitor, FakeWindow, FakeWindowSystem, ZOrderCall};
pub use traits::*;
pub use types::*;

#[cfg(target_os = "windows")]
pub use windows::Win32WindowSystem;

use crate::screen::Rect;

/// Window system for platforms without a native backend.
///
/// Every query fails with [`PlatformError::NotSupported`], which the engine
/// treats as "no data this tick".
#[derive(Debug, Default)]
pub struct UnsupportedWindowSystem;

impl WindowSystem for UnsupportedWindowSystem {
    fn enumerate_top_level_windows(&self) -> PlatformResult<Vec<RawWindow>> {
        Err(PlatformError::NotSupported)
    }

    fn window_rect(&self, _handle: WindowHandle) -> PlatformResult<Rect> {
        Err(PlatformError::NotSupported)
    }

    fn move_window(
        &mut self,
        _handle: WindowHandle,
        _x: i32,
        _y: i32,
        _width: i32,
        _height: i32,
    ) -> PlatformResult<()> {
        Err(PlatformError::NotSupported)
    }

    fn set_window_z_order(
        &mut self,
        _handle: WindowHandle,
        _insert_after: InsertAfter,
        _flags: ZOrderFlags,
    ) -> PlatformResult<()> {
        Err(PlatformError::NotSupported)
    }

    fn monitor_info(&self, _handle: WindowHandle) -> PlatformResult<(Rect, Rect)> {
        Err(PlatformError::NotSupported)
    }

    fn dpi_for_monitor(&self, _handle: WindowHandle) -> PlatformResult<(u32, u32)> {
        Err(PlatformError::NotSupported)
    }

    fn window_above(&self, _handle: WindowHandle) -> PlatformResult<Option<WindowHandle>> {
        Err(PlatformError::NotSupported)
    }
}

/// Get the current platform name
pub fn platform_name() -> &'static str {
    #[cfg(target_os = "macos")]
    return "macOS";

    #[cfg(target_os = "linux")]
    return "Linux";

    #[cfg(target_os = "windows")]
    return "Windows";

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    return "Unknown";
}

/// Whether a native window backend exists for this platform
pub fn has_native_backend() -> bool {
    cfg!(target_os = "windows")
}
