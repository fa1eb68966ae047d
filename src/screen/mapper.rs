//! Screen to engine coordinate mapping
//!
//! Engine world space is centered on the avatar viewport with +Y up. One world
//! unit spans `pixels_per_unit * dpi_scale * desktop_scale` screen pixels.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect, Size};

/// A point in engine world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: WorldPoint) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// An axis-aligned rectangle in engine world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldRect {
    pub min: WorldPoint,
    pub max: WorldPoint,
}

impl WorldRect {
    pub fn closest_point(&self, p: WorldPoint) -> WorldPoint {
        WorldPoint::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Distance from `p` to the nearest point of the rect, zero inside
    pub fn distance_to(&self, p: WorldPoint) -> f32 {
        p.distance(self.closest_point(p))
    }
}

/// Converts between screen pixels and engine world units for one avatar
/// window. Rebuilt each tick from the window's live geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    origin: Point,
    viewport: Size,
    pixels_per_unit: f32,
}

impl CoordinateMapper {
    /// Returns `None` when the viewport or scale is degenerate
    pub fn new(
        window: Rect,
        pixels_per_unit: f32,
        dpi_scale: f32,
        desktop_scale: f32,
    ) -> Option<Self> {
        let scale = pixels_per_unit * dpi_scale * desktop_scale;
        if window.is_empty() || !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        Some(Self {
            origin: window.top_left(),
            viewport: window.size(),
            pixels_per_unit: scale,
        })
    }

    /// Effective screen pixels per world unit
    pub fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    fn viewport_center(&self) -> (f32, f32) {
        (
            self.origin.x as f32 + self.viewport.width as f32 / 2.0,
            self.origin.y as f32 + self.viewport.height as f32 / 2.0,
        )
    }

    pub fn screen_to_engine(&self, pixel: Point) -> WorldPoint {
        let (cx, cy) = self.viewport_center();
        WorldPoint::new(
            (pixel.x as f32 - cx) / self.pixels_per_unit,
            (cy - pixel.y as f32) / self.pixels_per_unit,
        )
    }

    pub fn engine_to_screen(&self, world: WorldPoint) -> Point {
        let (cx, cy) = self.viewport_center();
        Point::new(
            (cx + world.x * self.pixels_per_unit).round() as i32,
            (cy - world.y * self.pixels_per_unit).round() as i32,
        )
    }

    pub fn rect_to_engine(&self, rect: Rect) -> WorldRect {
        WorldRect {
            min: self.screen_to_engine(Point::new(rect.left, rect.bottom)),
            max: self.screen_to_engine(Point::new(rect.right, rect.top)),
        }
    }
}
