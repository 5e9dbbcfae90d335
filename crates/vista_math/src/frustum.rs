//! View-frustum culling.
//!
//! The rubber-band selector only needs a conservative "wholly outside"
//! verdict, so the containment test is the p-vertex check.

use glam::{Mat4, Vec3};

use crate::bounds::Aabb;

/// Plane in 3D space (ax + by + cz + d = 0).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Plane normal (unit vector)
    pub normal: Vec3,
    /// Distance from origin along normal
    pub d: f32,
}

impl Plane {
    /// Create a new plane from normal and distance.
    ///
    /// The normal will be normalized automatically.
    #[inline]
    pub fn new(normal: Vec3, d: f32) -> Self {
        let len = normal.length();
        if len > 1e-10 {
            Self {
                normal: normal / len,
                d: d / len,
            }
        } else {
            Self {
                normal: Vec3::Y,
                d: 0.0,
            }
        }
    }

    /// Create a plane from a point on the plane and its normal.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// Signed distance from a point to the plane.
    ///
    /// Positive = in front (same side as normal).
    #[inline]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            d: 0.0,
        }
    }
}

/// View frustum as six inward-facing planes
/// (left, right, bottom, top, near, far).
#[derive(Clone, Debug)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb/Hartmann method on the combined matrix.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array();

        let left = Plane::new(
            Vec3::new(m[3] + m[0], m[7] + m[4], m[11] + m[8]),
            m[15] + m[12],
        );
        let right = Plane::new(
            Vec3::new(m[3] - m[0], m[7] - m[4], m[11] - m[8]),
            m[15] - m[12],
        );
        let bottom = Plane::new(
            Vec3::new(m[3] + m[1], m[7] + m[5], m[11] + m[9]),
            m[15] + m[13],
        );
        let top = Plane::new(
            Vec3::new(m[3] - m[1], m[7] - m[5], m[11] - m[9]),
            m[15] - m[13],
        );
        // 0..1 clip depth (glam's perspective_rh), so the near plane is the
        // z row alone, not row3 + row2.
        let near = Plane::new(Vec3::new(m[2], m[6], m[10]), m[14]);
        let far = Plane::new(
            Vec3::new(m[3] - m[2], m[7] - m[6], m[11] - m[10]),
            m[15] - m[14],
        );

        Self {
            planes: [left, right, bottom, top, near, far],
        }
    }

    /// Test if an AABB is wholly outside the frustum.
    ///
    /// Conservative: returns false for boxes that intersect the boundary.
    pub fn is_outside(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            // Corner most aligned with the plane normal (p-vertex)
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            if plane.distance_to_point(p) < 0.0 {
                return true;
            }
        }
        false
    }

    /// Test if a point is inside the frustum.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_frustum() -> Frustum {
        // Axis-aligned box volume: |x| < 10, |y| < 10, 0.1 < z < 100
        Frustum {
            planes: [
                Plane::from_point_normal(Vec3::new(-10.0, 0.0, 0.0), Vec3::X),
                Plane::from_point_normal(Vec3::new(10.0, 0.0, 0.0), Vec3::NEG_X),
                Plane::from_point_normal(Vec3::new(0.0, -10.0, 0.0), Vec3::Y),
                Plane::from_point_normal(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y),
                Plane::from_point_normal(Vec3::new(0.0, 0.0, 0.1), Vec3::Z),
                Plane::from_point_normal(Vec3::new(0.0, 0.0, 100.0), Vec3::NEG_Z),
            ],
        }
    }

    #[test]
    fn test_plane_distance() {
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Z);
        assert!((plane.distance_to_point(Vec3::new(0.0, 0.0, 5.0)) - 5.0).abs() < 1e-6);
        assert!((plane.distance_to_point(Vec3::new(0.0, 0.0, -3.0)) + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_aabb_inside_not_outside() {
        let frustum = box_frustum();
        let inside = Aabb::new(Vec3::new(-1.0, -1.0, 1.0), Vec3::new(1.0, 1.0, 2.0));
        assert!(!frustum.is_outside(&inside));
    }

    #[test]
    fn test_aabb_behind_near_plane_is_outside() {
        let frustum = box_frustum();
        let behind = Aabb::new(Vec3::new(-1.0, -1.0, -100.0), Vec3::new(1.0, 1.0, -99.0));
        assert!(frustum.is_outside(&behind));
    }

    #[test]
    fn test_aabb_straddling_boundary_not_outside() {
        let frustum = box_frustum();
        let straddle = Aabb::new(Vec3::new(9.0, -1.0, 1.0), Vec3::new(11.0, 1.0, 2.0));
        assert!(!frustum.is_outside(&straddle));
    }

    #[test]
    fn test_from_view_projection() {
        let vp = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0)
            * Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let frustum = Frustum::from_view_projection(&vp);

        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -10.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 10.0)));
        assert!(frustum.is_outside(&Aabb::from_center_half_extents(
            Vec3::new(0.0, 0.0, 200.0),
            Vec3::ONE,
        )));
    }

    #[test]
    fn test_near_plane_culls_sliver_before_it() {
        // Ahead of the eye but short of the near plane (0.1) is outside.
        let vp = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0)
            * Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let frustum = Frustum::from_view_projection(&vp);

        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -0.05)));
        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -0.15)));
        assert!(frustum.is_outside(&Aabb::from_center_half_extents(
            Vec3::new(0.0, 0.0, -0.05),
            Vec3::splat(0.01),
        )));
    }
}
