//! Window system value types
//!
//! Platform-independent representation of native windows and z-order requests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::screen::Rect;

/// Opaque identifier of a top-level window. Never owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub isize);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A window as reported by raw enumeration, before any filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWindow {
    pub handle: WindowHandle,
    pub rect: Rect,
    pub visible: bool,
    pub has_parent: bool,
    /// Length of the title text in UTF-16 units
    pub title_len: usize,
    pub class_name: String,
}

/// Where to slot a window in the z-order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAfter {
    /// Top of the non-topmost band
    Top,
    /// Into the always-on-top band
    Topmost,
    /// Out of the always-on-top band
    NoTopmost,
    /// Directly below the given window
    Window(WindowHandle),
}

/// Flags for z-order changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZOrderFlags {
    pub no_move: bool,
    pub no_size: bool,
    pub no_activate: bool,
}

impl ZOrderFlags {
    /// Reorder only: keep position and size, never steal focus
    pub const REORDER_ONLY: ZOrderFlags = ZOrderFlags {
        no_move: true,
        no_size: true,
        no_activate: true,
    };
}
