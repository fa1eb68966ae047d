//! Docking state
//!
//! The binding to a target window only exists inside the docked variants, so
//! a `Free` or searching avatar can never hold a stale target.

use serde::Serialize;

use crate::platform::WindowHandle;
use crate::screen::Rect;

/// Attachment of the avatar to one target window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DockBinding {
    pub target: WindowHandle,
    /// Avatar left minus target left; free to change while dragging
    pub dx: i32,
    /// Target top minus avatar top; fixed at commit
    pub dy: i32,
    /// Extra vertical shift applied while following
    pub vertical_trim: i32,
}

impl DockBinding {
    /// Capture the offsets between the avatar and the target at commit time
    pub fn commit(target: WindowHandle, avatar: &Rect, target_rect: &Rect, vertical_trim: i32) -> Self {
        Self {
            target,
            dx: avatar.left - target_rect.left,
            dy: target_rect.top - avatar.top,
            vertical_trim,
        }
    }
}

/// Phase of the docking state machine, without binding data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DockPhase {
    Free,
    SearchingWhileDragging,
    DockedFollowing,
    DockedWhileDragging,
}

/// State of the docking state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DockState {
    /// Floating independently, always on top
    #[default]
    Free,
    /// User is dragging; looking for a title bar under the snap zone
    SearchingWhileDragging,
    /// Attached and tracking the target's movement
    DockedFollowing(DockBinding),
    /// Attached while the user slides the avatar along the title bar
    DockedWhileDragging(DockBinding),
}

impl DockState {
    pub fn phase(&self) -> DockPhase {
        match self {
            DockState::Free => DockPhase::Free,
            DockState::SearchingWhileDragging => DockPhase::SearchingWhileDragging,
            DockState::DockedFollowing(_) => DockPhase::DockedFollowing,
            DockState::DockedWhileDragging(_) => DockPhase::DockedWhileDragging,
        }
    }

    pub fn binding(&self) -> Option<&DockBinding> {
        match self {
            DockState::DockedFollowing(b) | DockState::DockedWhileDragging(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_docked(&self) -> bool {
        self.binding().is_some()
    }
}
