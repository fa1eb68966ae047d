//! In-memory window system
//!
//! A synthetic desktop with deterministic z-order, monitors and DPI. Drives
//! the unit tests and the `simulate` command.

use super::traits::{HostSignals, PlatformError, PlatformResult, WindowSystem};
use super::types::{InsertAfter, RawWindow, WindowHandle, ZOrderFlags};
use crate::screen::Rect;

/// A window on the fake desktop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeWindow {
    pub handle: WindowHandle,
    pub rect: Rect,
    pub visible: bool,
    pub parent: Option<WindowHandle>,
    pub title: String,
    pub class_name: String,
    pub topmost: bool,
}

impl FakeWindow {
    /// A visible, parentless application window
    pub fn new(handle: isize, title: &str, rect: Rect) -> Self {
        Self {
            handle: WindowHandle(handle),
            rect,
            visible: true,
            parent: None,
            title: title.to_string(),
            class_name: "FakeAppWindow".to_string(),
            topmost: false,
        }
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = class_name.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_parent(mut self, parent: isize) -> Self {
        self.parent = Some(WindowHandle(parent));
        self
    }

    pub fn topmost(mut self) -> Self {
        self.topmost = true;
        self
    }

    fn to_raw(&self) -> RawWindow {
        RawWindow {
            handle: self.handle,
            rect: self.rect,
            visible: self.visible,
            has_parent: self.parent.is_some(),
            title_len: self.title.encode_utf16().count(),
            class_name: self.class_name.clone(),
        }
    }
}

/// A monitor on the fake desktop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeMonitor {
    pub bounds: Rect,
    pub work_area: Rect,
    pub dpi: u32,
}

impl FakeMonitor {
    /// A 96 DPI monitor with a bottom taskbar `taskbar_height` pixels tall
    pub fn with_bottom_taskbar(bounds: Rect, taskbar_height: i32) -> Self {
        Self {
            bounds,
            work_area: Rect::new(
                bounds.left,
                bounds.top,
                bounds.right,
                bounds.bottom - taskbar_height,
            ),
            dpi: 96,
        }
    }
}

/// A recorded z-order request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZOrderCall {
    pub handle: WindowHandle,
    pub insert_after: InsertAfter,
    pub flags: ZOrderFlags,
}

/// In-memory desktop implementing [`WindowSystem`] and [`HostSignals`]
#[derive(Debug, Clone, Default)]
pub struct FakeWindowSystem {
    /// Front-most first
    windows: Vec<FakeWindow>,
    monitors: Vec<FakeMonitor>,
    /// Make enumeration fail, simulating a transient OS error
    pub fail_enumeration: bool,
    pub dragging: bool,
    pub focused: bool,
    z_order_calls: Vec<ZOrderCall>,
    move_calls: usize,
}

impl FakeWindowSystem {
    pub fn new() -> Self {
        Self {
            focused: true,
            ..Default::default()
        }
    }

    /// Push a window to the back of the z-order
    pub fn add_window(&mut self, window: FakeWindow) {
        if window.topmost {
            let idx = self.topmost_band_len();
            self.windows.insert(idx, window);
        } else {
            self.windows.push(window);
        }
    }

    pub fn add_monitor(&mut self, monitor: FakeMonitor) {
        self.monitors.push(monitor);
    }

    pub fn remove_window(&mut self, handle: WindowHandle) -> Option<FakeWindow> {
        let idx = self.index_of(handle)?;
        Some(self.windows.remove(idx))
    }

    pub fn window(&self, handle: WindowHandle) -> Option<&FakeWindow> {
        self.windows.iter().find(|w| w.handle == handle)
    }

    pub fn window_mut(&mut self, handle: WindowHandle) -> Option<&mut FakeWindow> {
        self.windows.iter_mut().find(|w| w.handle == handle)
    }

    /// Move a window's top-left corner, keeping its size
    pub fn set_position(&mut self, handle: WindowHandle, x: i32, y: i32) -> bool {
        match self.window_mut(handle) {
            Some(w) => {
                w.rect = w.rect.moved_to(crate::screen::Point::new(x, y));
                true
            }
            None => false,
        }
    }

    /// Bring a window to the top of its band, as if the user clicked it
    pub fn raise(&mut self, handle: WindowHandle) -> bool {
        let Some(idx) = self.index_of(handle) else {
            return false;
        };
        let window = self.windows.remove(idx);
        let dest = if window.topmost {
            0
        } else {
            self.topmost_band_len()
        };
        self.windows.insert(dest, window);
        true
    }

    /// Handles front-most first
    pub fn z_order(&self) -> Vec<WindowHandle> {
        self.windows.iter().map(|w| w.handle).collect()
    }

    pub fn is_topmost(&self, handle: WindowHandle) -> bool {
        self.window(handle).map(|w| w.topmost).unwrap_or(false)
    }

    pub fn z_order_calls(&self) -> &[ZOrderCall] {
        &self.z_order_calls
    }

    pub fn move_calls(&self) -> usize {
        self.move_calls
    }

    fn index_of(&self, handle: WindowHandle) -> Option<usize> {
        self.windows.iter().position(|w| w.handle == handle)
    }

    fn topmost_band_len(&self) -> usize {
        self.windows.iter().take_while(|w| w.topmost).count()
    }

    fn monitor_for(&self, handle: WindowHandle) -> PlatformResult<&FakeMonitor> {
        let window = self
            .window(handle)
            .ok_or(PlatformError::WindowNotFound(handle))?;
        let center = window.rect.center();
        self.monitors
            .iter()
            .find(|m| m.bounds.contains(center))
            .or_else(|| self.monitors.first())
            .ok_or(PlatformError::NoMonitor(handle))
    }
}

impl WindowSystem for FakeWindowSystem {
    fn enumerate_top_level_windows(&self) -> PlatformResult<Vec<RawWindow>> {
        if self.fail_enumeration {
            return Err(PlatformError::Platform("enumeration failed".to_string()));
        }
        Ok(self.windows.iter().map(FakeWindow::to_raw).collect())
    }

    fn window_rect(&self, handle: WindowHandle) -> PlatformResult<Rect> {
        self.window(handle)
            .map(|w| w.rect)
            .ok_or(PlatformError::WindowNotFound(handle))
    }

    fn move_window(
        &mut self,
        handle: WindowHandle,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> PlatformResult<()> {
        let window = self
            .window_mut(handle)
            .ok_or(PlatformError::WindowNotFound(handle))?;
        window.rect = Rect::from_xywh(x, y, width, height);
        self.move_calls += 1;
        Ok(())
    }

    fn set_window_z_order(
        &mut self,
        handle: WindowHandle,
        insert_after: InsertAfter,
        flags: ZOrderFlags,
    ) -> PlatformResult<()> {
        let idx = self
            .index_of(handle)
            .ok_or(PlatformError::WindowNotFound(handle))?;
        self.z_order_calls.push(ZOrderCall {
            handle,
            insert_after,
            flags,
        });

        let mut window = self.windows.remove(idx);
        let dest = match insert_after {
            InsertAfter::Topmost => {
                window.topmost = true;
                0
            }
            // No effect on a window that is already outside the topmost band
            InsertAfter::NoTopmost if !window.topmost => idx,
            InsertAfter::NoTopmost => {
                window.topmost = false;
                self.topmost_band_len()
            }
            InsertAfter::Top => {
                if window.topmost {
                    0
                } else {
                    self.topmost_band_len()
                }
            }
            InsertAfter::Window(after) => match self.index_of(after) {
                Some(after_idx) => {
                    window.topmost = self.windows[after_idx].topmost;
                    after_idx + 1
                }
                None => {
                    self.windows.insert(idx, window);
                    return Err(PlatformError::WindowNotFound(after));
                }
            },
        };
        self.windows.insert(dest, window);
        Ok(())
    }

    fn monitor_info(&self, handle: WindowHandle) -> PlatformResult<(Rect, Rect)> {
        let monitor = self.monitor_for(handle)?;
        Ok((monitor.bounds, monitor.work_area))
    }

    fn dpi_for_monitor(&self, handle: WindowHandle) -> PlatformResult<(u32, u32)> {
        let monitor = self.monitor_for(handle)?;
        Ok((monitor.dpi, monitor.dpi))
    }

    fn window_above(&self, handle: WindowHandle) -> PlatformResult<Option<WindowHandle>> {
        let idx = self
            .index_of(handle)
            .ok_or(PlatformError::WindowNotFound(handle))?;
        Ok(idx.checked_sub(1).map(|above| self.windows[above].handle))
    }
}

impl HostSignals for FakeWindowSystem {
    fn is_dragging(&self, _avatar: WindowHandle) -> bool {
        self.dragging
    }

    fn is_focused(&self, _avatar: WindowHandle) -> bool {
        self.focused
    }
}
