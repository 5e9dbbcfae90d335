//! Pivot-relative rotation composition for transform gizmos.
//!
//! Two paths: rotating a node about its own origin (the delta expressed in
//! the node's local frame, so the visual rotation stays anchored at the node)
//! and orbiting a node around a shared pivot point.

use glam::{Mat4, Quat, Vec3};

/// Offsets shorter than this are treated as a zero pivot offset.
pub const PIVOT_EPSILON: f32 = 1e-6;

/// Rotate a node in place, anchored at its own origin.
///
/// The delta is re-expressed in the node's local frame before composition:
/// `orientation * (orientation⁻¹ * delta * orientation)`.
pub fn rotate_in_place(orientation: Quat, delta: Quat) -> Quat {
    let local = orientation.inverse() * delta * orientation;
    (orientation * local).normalize()
}

/// Orbit a node around a pivot point.
///
/// Composes the node's rotation with a translation to the pivot offset, the
/// rotation delta, and the translation back, then extracts the new
/// orientation and the translation contribution. The returned translation is
/// the node's updated world translation (the orbit displacement applied).
///
/// Falls back to [`rotate_in_place`] when the offset is within
/// [`PIVOT_EPSILON`] of zero.
pub fn rotate_about_pivot(
    orientation: Quat,
    translation: Vec3,
    pivot: Vec3,
    delta: Quat,
) -> (Quat, Vec3) {
    let offset = translation - pivot;
    if offset.length_squared() < PIVOT_EPSILON * PIVOT_EPSILON {
        return (rotate_in_place(orientation, delta), translation);
    }

    // Node rotation, then step out to the pivot offset, rotate, step back.
    // Column-vector composition, so the first-applied factor is rightmost.
    let world = Mat4::from_translation(-offset)
        * Mat4::from_quat(delta)
        * Mat4::from_translation(offset)
        * Mat4::from_quat(orientation);

    let (_, rotation, orbit) = world.to_scale_rotation_translation();
    (rotation.normalize(), translation + orbit)
}
