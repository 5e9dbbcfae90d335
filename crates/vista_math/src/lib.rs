//! # vista_math - Editor Geometry Utilities
//!
//! Geometry primitives for interactive viewport editing: bounding volumes,
//! view-frustum containment, screen-space projection, and pivot-relative
//! rotation composition. Built on [`glam`] for the vector/matrix layer.

pub mod bounds;
pub mod frustum;
pub mod pivot;
pub mod project;

pub use bounds::{Aabb, BoundingSphere};
pub use frustum::{Frustum, Plane};
pub use pivot::{rotate_about_pivot, rotate_in_place, PIVOT_EPSILON};
pub use project::{project_to_screen, ScreenRect};

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    pub const EPSILON: f32 = 1e-6;
}

pub mod prelude {
    pub use crate::bounds::{Aabb, BoundingSphere};
    pub use crate::frustum::{Frustum, Plane};
    pub use crate::pivot::{rotate_about_pivot, rotate_in_place};
    pub use crate::project::{project_to_screen, ScreenRect};
    pub use glam::{Mat4, Quat, Vec2, Vec3};
}
