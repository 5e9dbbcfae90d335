//! Viewport camera: view/projection matrices, frustum, screen projection.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use vista_math::{project_to_screen, BoundingSphere, Frustum};

/// Perspective viewport camera.
#[derive(Clone, Debug)]
pub struct ViewportCamera {
    pub position: Vec3,
    /// Rotation around world Y (radians)
    pub yaw: f32,
    /// Rotation around local X (radians), clamped near +-pi/2
    pub pitch: f32,

    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport size in pixels
    pub viewport_size: Vec2,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 5.0),
            yaw: 0.0,
            pitch: -0.3,
            fov_y: std::f32::consts::FRAC_PI_3,
            near: 0.1,
            far: 10_000.0,
            viewport_size: Vec2::new(1280.0, 720.0),
        }
    }
}

impl ViewportCamera {
    /// Camera orientation (yaw then pitch, no roll).
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// View direction.
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.orientation() * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.orientation() * Vec3::Y
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport_size.y > 0.0 {
            self.viewport_size.x / self.viewport_size.y
        } else {
            1.0
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        self.viewport_size = size;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Current view frustum.
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection())
    }

    /// Project a world point to viewport pixels. `None` behind the camera.
    pub fn project_to_screen(&self, world: Vec3) -> Option<Vec2> {
        project_to_screen(&self.view_projection(), self.viewport_size, world)
    }

    /// Point the camera at a target from the current direction, at `distance`.
    pub fn center_on(&mut self, target: Vec3, distance: f32) {
        self.position = target - self.forward() * distance;
    }

    /// Distance that frames a sphere with the given margin factor.
    pub fn framing_distance(&self, sphere: &BoundingSphere, margin: f32) -> f32 {
        let half_fov = (self.fov_y * 0.5).max(0.01);
        (sphere.radius.max(0.01) * margin) / half_fov.sin()
    }
}
