//! Snap zone geometry
//!
//! The hot zone hangs off the bottom-center of the avatar window. Candidate
//! title bars are hit-tested against it every tick.

use super::geometry::{Offset, Rect, Size};

/// Compute the snap zone for an avatar window.
///
/// The zone's horizontal center sits at the avatar's center plus `offset.x`,
/// its top edge at the avatar's bottom plus `offset.y`.
pub fn compute_snap_zone(avatar: &Rect, offset: Offset, size: Size) -> Rect {
    let center_x = avatar.left + avatar.width() / 2 + offset.x;
    let top = avatar.bottom + offset.y;
    Rect::from_xywh(center_x - size.width / 2, top, size.width, size.height)
}
