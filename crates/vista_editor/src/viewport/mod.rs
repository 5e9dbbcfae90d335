//! Viewport interaction: camera, transform gizmo, and the controller that
//! binds input to both.

pub mod camera;
pub mod controller;
pub mod gizmo;

pub use camera::ViewportCamera;
pub use controller::ViewportController;
pub use gizmo::{PivotMode, TransformDelta, TransformGizmo, SCALE_LIMIT};
