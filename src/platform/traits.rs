//! Window system trait definitions
//!
//! Defines the native primitives the docking engine consumes. Every backend
//! (Win32, the in-memory fake) implements these.

use thiserror::Error;

use super::types::{InsertAfter, RawWindow, WindowHandle, ZOrderFlags};
use crate::screen::Rect;

/// Errors that can occur during window system operations
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Window not found: {0}")]
    WindowNotFound(WindowHandle),

    #[error("No monitor for window {0}")]
    NoMonitor(WindowHandle),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Not supported on this platform")]
    NotSupported,
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Native window primitives, called synchronously from the engine tick
pub trait WindowSystem {
    /// Enumerate all top-level windows, front-most first
    fn enumerate_top_level_windows(&self) -> PlatformResult<Vec<RawWindow>>;

    /// Outer rect of a window in screen pixels
    fn window_rect(&self, handle: WindowHandle) -> PlatformResult<Rect>;

    /// Move and size a window without activating it
    fn move_window(
        &mut self,
        handle: WindowHandle,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> PlatformResult<()>;

    /// Change a window's position in the z-order
    fn set_window_z_order(
        &mut self,
        handle: WindowHandle,
        insert_after: InsertAfter,
        flags: ZOrderFlags,
    ) -> PlatformResult<()>;

    /// Bounds and work area of the monitor a window is on
    fn monitor_info(&self, handle: WindowHandle) -> PlatformResult<(Rect, Rect)>;

    /// Effective (x, y) DPI of the monitor a window is on
    fn dpi_for_monitor(&self, handle: WindowHandle) -> PlatformResult<(u32, u32)>;

    /// The window directly above `handle` in the z-order, if any
    fn window_above(&self, handle: WindowHandle) -> PlatformResult<Option<WindowHandle>>;
}

/// Host-side signals the engine needs each tick but does not derive itself
pub trait HostSignals {
    /// Whether the user is currently dragging the avatar window
    fn is_dragging(&self, avatar: WindowHandle) -> bool;

    /// Whether the avatar window currently has focus
    fn is_focused(&self, avatar: WindowHandle) -> bool;
}
