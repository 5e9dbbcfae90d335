//! Screen-space projection and drag rectangles.

use glam::{Mat4, Vec2, Vec3};

/// Normalized screen rectangle with top-left origin and non-negative size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    /// Build a normalized rectangle from two opposite corners.
    ///
    /// Raw drag deltas may be negative; the result always satisfies
    /// `min <= max` componentwise.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Check if a point lies inside the rectangle (inclusive edges).
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Project a world-space point to screen coordinates.
///
/// `viewport_size` is in pixels; the result uses a top-left origin.
/// Returns `None` for points at or behind the camera plane.
pub fn project_to_screen(view_proj: &Mat4, viewport_size: Vec2, world: Vec3) -> Option<Vec2> {
    let clip = *view_proj * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }

    let ndc = clip.truncate() / clip.w;
    let x = (ndc.x * 0.5 + 0.5) * viewport_size.x;
    let y = (1.0 - (ndc.y * 0.5 + 0.5)) * viewport_size.y;
    Some(Vec2::new(x, y))
}
