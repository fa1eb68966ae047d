//! Monitor and DPI resolution
//!
//! Resolves the monitor under a window and derives the taskbar rectangle as
//! the one-sided difference between monitor bounds and work area.

use serde::Serialize;

use super::geometry::{Rect, ScreenEdge};
use crate::platform::{WindowHandle, WindowSystem};

/// DPI that maps to a scale factor of 1.0
pub const BASELINE_DPI: u32 = 96;

/// The taskbar of one monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Taskbar {
    pub edge: ScreenEdge,
    pub rect: Rect,
}

/// Bounding rect of the monitor under `handle`, or the zero rect
pub fn monitor_bounds<W: WindowSystem + ?Sized>(ws: &W, handle: WindowHandle) -> Rect {
    match ws.monitor_info(handle) {
        Ok((bounds, _)) => bounds,
        Err(e) => {
            tracing::debug!("monitor bounds unavailable for {}: {}", handle, e);
            Rect::zero()
        }
    }
}

/// Usable work area of the monitor under `handle`, or the zero rect
pub fn monitor_work_area<W: WindowSystem + ?Sized>(ws: &W, handle: WindowHandle) -> Rect {
    match ws.monitor_info(handle) {
        Ok((_, work)) => work,
        Err(e) => {
            tracing::debug!("monitor work area unavailable for {}: {}", handle, e);
            Rect::zero()
        }
    }
}

/// Scale factor of the monitor under `handle` (1.0 = 96 DPI)
pub fn dpi_scale<W: WindowSystem + ?Sized>(ws: &W, handle: WindowHandle) -> f32 {
    match ws.dpi_for_monitor(handle) {
        Ok((dpi_x, _)) if dpi_x > 0 => dpi_x as f32 / BASELINE_DPI as f32,
        Ok(_) => 1.0,
        Err(e) => {
            tracing::debug!("dpi unavailable for {}: {}", handle, e);
            1.0
        }
    }
}

/// Taskbar of the monitor under `handle`, if one can be detected
pub fn taskbar<W: WindowSystem + ?Sized>(ws: &W, handle: WindowHandle) -> Option<Taskbar> {
    let (bounds, work) = ws.monitor_info(handle).ok()?;
    taskbar_between(bounds, work)
}

/// Find the edge where the work area shrank relative to the monitor bounds
pub fn taskbar_between(bounds: Rect, work: Rect) -> Option<Taskbar> {
    if bounds.is_empty() || work.is_empty() {
        return None;
    }

    let (edge, rect) = if work.bottom < bounds.bottom {
        (
            ScreenEdge::Bottom,
            Rect::new(bounds.left, work.bottom, bounds.right, bounds.bottom),
        )
    } else if work.top > bounds.top {
        (
            ScreenEdge::Top,
            Rect::new(bounds.left, bounds.top, bounds.right, work.top),
        )
    } else if work.left > bounds.left {
        (
            ScreenEdge::Left,
            Rect::new(bounds.left, bounds.top, work.left, bounds.bottom),
        )
    } else if work.right < bounds.right {
        (
            ScreenEdge::Right,
            Rect::new(work.right, bounds.top, bounds.right, bounds.bottom),
        )
    } else {
        // Auto-hidden or absent
        return None;
    };

    Some(Taskbar { edge, rect })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{FakeMonitor, FakeWindow, FakeWindowSystem};

    const BOUNDS: Rect = Rect::new(0, 0, 1920, 1080);

    #[test]
    fn test_bottom_taskbar() {
        let taskbar = taskbar_between(BOUNDS, Rect::new(0, 0, 1920, 1040)).unwrap();
        assert_eq!(taskbar.edge, ScreenEdge::Bottom);
        assert_eq!(taskbar.rect, Rect::new(0, 1040, 1920, 1080));
    }

    #[test]
    fn test_side_and_top_taskbars() {
        let left = taskbar_between(BOUNDS, Rect::new(60, 0, 1920, 1080)).unwrap();
        assert_eq!(left.edge, ScreenEdge::Left);
        assert_eq!(left.rect, Rect::new(0, 0, 60, 1080));

        let right = taskbar_between(BOUNDS, Rect::new(0, 0, 1860, 1080)).unwrap();
        assert_eq!(right.rect, Rect::new(1860, 0, 1920, 1080));

        let top = taskbar_between(BOUNDS, Rect::new(0, 48, 1920, 1080)).unwrap();
        assert_eq!(top.edge, ScreenEdge::Top);
        assert_eq!(top.rect, Rect::new(0, 0, 1920, 48));
    }

    #[test]
    fn test_no_taskbar_when_nothing_shrank() {
        assert!(taskbar_between(BOUNDS, BOUNDS).is_none());
        assert!(taskbar_between(Rect::zero(), Rect::zero()).is_none());
    }

    #[test]
    fn test_failures_yield_zero_rect_and_unit_scale() {
        let mut ws = FakeWindowSystem::new();
        ws.add_window(FakeWindow::new(1, "avatar", Rect::new(0, 0, 300, 400)));
        // No monitors registered
        assert_eq!(monitor_bounds(&ws, WindowHandle(1)), Rect::zero());
        assert_eq!(monitor_work_area(&ws, WindowHandle(1)), Rect::zero());
        assert_eq!(dpi_scale(&ws, WindowHandle(1)), 1.0);
        assert!(taskbar(&ws, WindowHandle(1)).is_none());
    }

    #[test]
    fn test_dpi_scale_from_monitor() {
        let mut ws = FakeWindowSystem::new();
        ws.add_window(FakeWindow::new(1, "avatar", Rect::new(0, 0, 300, 400)));
        ws.add_monitor(FakeMonitor {
            bounds: BOUNDS,
            work_area: BOUNDS,
            dpi: 144,
        });
        assert!((dpi_scale(&ws, WindowHandle(1)) - 1.5).abs() < f32::EPSILON);
    }
}
