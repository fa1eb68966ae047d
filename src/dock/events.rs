//! Engine output types
//!
//! What the engine hands back to the host after each tick: pose flags for the
//! animation layer, transition events, and optional debug geometry.

use serde::Serialize;

use super::state::DockPhase;
use crate::platform::WindowHandle;
use crate::screen::{Rect, WorldRect};

/// Why a binding was torn down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseReason {
    /// Target closed, hidden, minimized or shrunk below the filter size
    TargetLost,
    /// User dragged the avatar off the title bar
    DraggedAway,
    /// Host asked for a release
    Requested,
}

/// State transitions worth telling the host about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    Docked {
        target: WindowHandle,
    },
    Released {
        target: WindowHandle,
        reason: ReleaseReason,
    },
    SittingChanged {
        sitting: bool,
    },
}

/// Flags consumed by the animation layer to pick a pose
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoseFlags {
    pub is_docked: bool,
    pub is_sitting: bool,
}

/// Geometry for debug overlays, read-only
#[derive(Debug, Clone, Serialize)]
pub struct DebugGeometry {
    /// Snap zone in screen pixels
    pub snap_zone: Rect,
    pub snap_zone_world: Option<WorldRect>,
    /// Candidate rects in world space, front-most first
    pub candidates_world: Vec<WorldRect>,
    pub target_world: Option<WorldRect>,
    pub taskbar_world: Option<WorldRect>,
}

/// Outcome of one tick
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub phase: DockPhase,
    pub target: Option<WindowHandle>,
    pub pose: PoseFlags,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EngineEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugGeometry>,
}

impl TickReport {
    pub fn is_docked(&self) -> bool {
        self.pose.is_docked
    }

    pub fn is_sitting(&self) -> bool {
        self.pose.is_sitting
    }
}
