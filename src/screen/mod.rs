//! Screen geometry module
//!
//! Handles:
//! - Screen-space rectangles and points
//! - Monitor bounds, work area, DPI and taskbar resolution
//! - Screen to engine coordinate mapping
//! - Snap zone placement
//! - Taskbar proximity detection

mod geometry;
mod mapper;
pub mod monitor;
mod snap_zone;
mod taskbar;

pub use geometry::{Offset, Point, Rect, ScreenEdge, Size};
pub use mapper::{CoordinateMapper, WorldPoint, WorldRect};
pub use monitor::Taskbar;
pub use snap_zone::compute_snap_zone;
pub use taskbar::{TaskbarDetectResult, TaskbarDetector, TaskbarDetectorConfig};
