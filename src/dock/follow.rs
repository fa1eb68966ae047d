//! Follow/offset controller
//!
//! Places the avatar relative to the live target rect using the stored
//! binding offsets.

use super::state::DockBinding;
use crate::platform::{PlatformResult, WindowHandle, WindowSystem};
use crate::screen::{Point, Rect};

/// Avatar top-left while the user slides along the title bar
pub fn slide_position(binding: &DockBinding, target: &Rect) -> Point {
    Point::new(target.left + binding.dx, target.top - binding.dy)
}

/// Avatar top-left while following, including the vertical trim
pub fn follow_position(binding: &DockBinding, target: &Rect) -> Point {
    let base = slide_position(binding, target);
    Point::new(base.x, base.y + binding.vertical_trim)
}

/// Move the avatar's top-left to `position`, keeping its size.
///
/// Returns `false` when the avatar was already there and nothing was sent.
pub fn move_avatar<W: WindowSystem + ?Sized>(
    ws: &mut W,
    avatar: WindowHandle,
    current: &Rect,
    position: Point,
) -> PlatformResult<bool> {
    if current.top_left() == position {
        return Ok(false);
    }
    ws.move_window(
        avatar,
        position.x,
        position.y,
        current.width(),
        current.height(),
    )?;
    Ok(true)
}
