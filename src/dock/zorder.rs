//! Z-order controller
//!
//! Keeps the avatar in the topmost band while free, and slotted directly above
//! its target while docked. All requests are reorder-only with no activation.

use crate::platform::{InsertAfter, PlatformResult, WindowHandle, WindowSystem, ZOrderFlags};

/// Last z-order placement requested for the avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrderMode {
    Topmost,
    Normal,
    AboveTarget(WindowHandle),
}

#[derive(Debug)]
pub struct ZOrderController {
    avatar: WindowHandle,
    mode: Option<ZOrderMode>,
}

impl ZOrderController {
    pub fn new(avatar: WindowHandle) -> Self {
        Self { avatar, mode: None }
    }

    pub fn mode(&self) -> Option<ZOrderMode> {
        self.mode
    }

    /// Enter or leave the always-on-top band
    pub fn set_topmost<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &mut W,
        topmost: bool,
    ) -> PlatformResult<()> {
        let wanted = if topmost {
            ZOrderMode::Topmost
        } else {
            ZOrderMode::Normal
        };
        if self.mode == Some(wanted) {
            return Ok(());
        }

        let insert_after = if topmost {
            InsertAfter::Topmost
        } else {
            InsertAfter::NoTopmost
        };
        ws.set_window_z_order(self.avatar, insert_after, ZOrderFlags::REORDER_ONLY)?;
        self.mode = Some(wanted);
        Ok(())
    }

    /// Slot the avatar directly above `target`, leaving the target untouched.
    ///
    /// Safe to call every tick: nothing is sent when the avatar already sits
    /// right above the target.
    pub fn set_order_above_target<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &mut W,
        target: WindowHandle,
    ) -> PlatformResult<()> {
        if matches!(self.mode, Some(ZOrderMode::Topmost) | None) {
            self.set_topmost(ws, false)?;
        }

        let above = ws.window_above(target)?;
        if above == Some(self.avatar) {
            self.mode = Some(ZOrderMode::AboveTarget(target));
            return Ok(());
        }

        let insert_after = match above {
            Some(window) => InsertAfter::Window(window),
            None => InsertAfter::Top,
        };
        ws.set_window_z_order(self.avatar, insert_after, ZOrderFlags::REORDER_ONLY)?;
        self.mode = Some(ZOrderMode::AboveTarget(target));
        Ok(())
    }
}
