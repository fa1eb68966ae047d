//! Dock module - the docking state machine
//!
//! This module provides:
//! - Filtered, front-to-back window snapshots
//! - Dock state and the binding to a target window
//! - Follow and slide placement of the avatar
//! - Z-order control relative to the target
//! - The per-tick engine and its report

mod engine;
mod events;
mod follow;
mod snapshot;
mod state;
mod zorder;

pub use engine::{find_dock_target, DockingEngine, SearchOutcome, TickInput};
pub use events::{DebugGeometry, EngineEvent, PoseFlags, ReleaseReason, TickReport};
pub use follow::{follow_position, move_avatar, slide_position};
pub use snapshot::{SnapshotProvider, WindowSnapshot, WindowSnapshotEntry};
pub use state::{DockBinding, DockPhase, DockState};
pub use zorder::{ZOrderController, ZOrderMode};
