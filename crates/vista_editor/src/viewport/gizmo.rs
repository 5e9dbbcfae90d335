//! Transform gizmo: applies translation/rotation/scale deltas to the
//! selection with configurable pivot semantics.
//!
//! The gizmo is a protocol, not a renderer: the host converts drag input into
//! a [`TransformDelta`] per tick and the gizmo writes updated transforms back
//! into the scene. Drag manipulation and the discrete rotate shortcut share
//! the same per-node path.

use glam::{Quat, Vec3};
use vista_math::{rotate_about_pivot, rotate_in_place, PIVOT_EPSILON};

use crate::core::{SceneEdit, SceneQuery, Selection};

/// Componentwise bound on node scale, preventing numeric blow-up from
/// unbounded scale drags.
pub const SCALE_LIMIT: f32 = 1e8;

/// The point rotations and scales are applied about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PivotMode {
    /// Each node rotates about its own origin
    #[default]
    ObjectCenter,
    /// Nodes orbit the shared selection anchor
    SelectionCenter,
}

/// Transform change for one input tick.
///
/// Scale is additive, matching drag-handle semantics.
#[derive(Clone, Copy, Debug)]
pub struct TransformDelta {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ZERO,
        }
    }
}

impl TransformDelta {
    pub fn translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    pub fn scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }
}

/// Stateful transform manipulator.
#[derive(Clone, Debug, Default)]
pub struct TransformGizmo {
    pub pivot_mode: PivotMode,
    transforming: bool,
    /// Pivot snapshot; only meaningful while `transforming`
    anchor: Vec3,
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_transforming(&self) -> bool {
        self.transforming
    }

    /// Anchor captured at gesture start. `None` outside a gesture.
    pub fn anchor(&self) -> Option<Vec3> {
        self.transforming.then_some(self.anchor)
    }

    /// Current gizmo position derived from the selection:
    /// the first selected node (ObjectCenter) or the mean of all selected
    /// translations (SelectionCenter). `None` for an empty selection.
    pub fn position(&self, scene: &dyn SceneQuery, selection: &Selection) -> Option<Vec3> {
        match self.pivot_mode {
            PivotMode::ObjectCenter => selection
                .first()
                .and_then(|id| scene.node(id))
                .map(|n| n.transform.translation),
            PivotMode::SelectionCenter => {
                let mut sum = Vec3::ZERO;
                let mut count = 0;
                for &id in selection.items() {
                    if let Some(node) = scene.node(id) {
                        sum += node.transform.translation;
                        count += 1;
                    }
                }
                (count > 0).then(|| sum / count as f32)
            }
        }
    }

    /// Snapshot the anchor and start a manipulation gesture.
    ///
    /// Silent no-op (returns false) if a gesture is already running or the
    /// selection resolves to no position.
    pub fn begin_transform(&mut self, scene: &dyn SceneQuery, selection: &Selection) -> bool {
        if self.transforming {
            return false;
        }
        let Some(position) = self.position(scene, selection) else {
            return false;
        };
        self.anchor = position;
        self.transforming = true;
        true
    }

    /// End the current gesture, discarding the anchor.
    pub fn end_transform(&mut self) {
        self.transforming = false;
    }

    /// Apply one tick's delta to every selected node.
    ///
    /// Called sequentially from the input update; not reentrant. Nodes that
    /// vanished mid-gesture are skipped without aborting the rest; locked
    /// nodes are skipped only while the scene is simulating.
    pub fn apply_delta(
        &self,
        scene: &mut dyn SceneEdit,
        selection: &Selection,
        delta: &TransformDelta,
        simulating: bool,
    ) {
        if !self.transforming || selection.is_empty() {
            return;
        }

        for &id in selection.items() {
            let Some(node) = scene.node_mut(id) else {
                log::debug!("Skipping destroyed node {} mid-gesture", id);
                continue;
            };
            if simulating && !node.transformable {
                continue;
            }

            let transform = &mut node.transform;
            let pivot_offset = transform.translation - self.anchor;

            if self.pivot_mode == PivotMode::ObjectCenter
                || pivot_offset.length_squared() < PIVOT_EPSILON * PIVOT_EPSILON
            {
                transform.orientation = rotate_in_place(transform.orientation, delta.rotation);
            } else {
                let (orientation, translation) = rotate_about_pivot(
                    transform.orientation,
                    transform.translation,
                    self.anchor,
                    delta.rotation,
                );
                transform.orientation = orientation;
                transform.translation = translation;
            }

            transform.scale = (transform.scale + delta.scale)
                .clamp(Vec3::splat(-SCALE_LIMIT), Vec3::splat(SCALE_LIMIT));

            // Translation is pivot-independent
            transform.translation += delta.translation;
        }
    }

    /// Discrete keyboard rotation about world +Y.
    ///
    /// `modifier` halves and negates the step. Wrapped in begin/end so the
    /// per-node path is identical to drag manipulation.
    pub fn rotate_step(
        &mut self,
        scene: &mut dyn SceneEdit,
        selection: &Selection,
        step_degrees: f32,
        modifier: bool,
        simulating: bool,
    ) {
        let degrees = if modifier { -step_degrees * 0.5 } else { step_degrees };
        let delta = TransformDelta::rotation(Quat::from_rotation_y(degrees.to_radians()));

        let started = self.begin_transform(scene, selection);
        self.apply_delta(scene, selection, &delta, simulating);
        if started {
            self.end_transform();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NodeId, SceneNode, SceneNodes};

    fn scene_with(positions: &[Vec3]) -> (SceneNodes, Selection) {
        let mut scene = SceneNodes::new();
        let mut selection = Selection::new();
        for (i, &p) in positions.iter().enumerate() {
            let id = scene.spawn(SceneNode::new(NodeId(0), format!("n{}", i)).with_translation(p));
            selection.add(id);
        }
        (scene, selection)
    }

    #[test]
    fn test_begin_is_noop_while_transforming() {
        let (scene, selection) = scene_with(&[Vec3::ZERO, Vec3::X]);
        let mut gizmo = TransformGizmo::new();

        assert!(gizmo.begin_transform(&scene, &selection));
        let anchor = gizmo.anchor().unwrap();
        assert!(!gizmo.begin_transform(&scene, &selection));
        assert_eq!(gizmo.anchor(), Some(anchor));
    }

    #[test]
    fn test_anchor_invalid_outside_gesture() {
        let (scene, selection) = scene_with(&[Vec3::X]);
        let mut gizmo = TransformGizmo::new();
        assert_eq!(gizmo.anchor(), None);
        gizmo.begin_transform(&scene, &selection);
        assert!(gizmo.anchor().is_some());
        gizmo.end_transform();
        assert_eq!(gizmo.anchor(), None);
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let mut scene = SceneNodes::new();
        let selection = Selection::new();
        let mut gizmo = TransformGizmo::new();
        assert!(!gizmo.begin_transform(&scene, &selection));
        // Must not panic or mutate anything
        gizmo.apply_delta(&mut scene, &selection, &TransformDelta::default(), false);
    }

    #[test]
    fn test_zero_pivot_offset_keeps_translation() {
        let (mut scene, selection) = scene_with(&[Vec3::new(2.0, 0.0, 1.0)]);
        let mut gizmo = TransformGizmo {
            pivot_mode: PivotMode::SelectionCenter,
            ..Default::default()
        };
        gizmo.begin_transform(&scene, &selection);

        let delta = TransformDelta::rotation(Quat::from_rotation_y(0.5));
        gizmo.apply_delta(&mut scene, &selection, &delta, false);

        let node = scene.node(selection.first().unwrap()).unwrap();
        assert!((node.transform.translation - Vec3::new(2.0, 0.0, 1.0)).length() < 1e-5);

        // Must match the object-center result for the same delta
        let (mut scene2, selection2) = scene_with(&[Vec3::new(2.0, 0.0, 1.0)]);
        let mut gizmo2 = TransformGizmo::new();
        gizmo2.begin_transform(&scene2, &selection2);
        gizmo2.apply_delta(&mut scene2, &selection2, &delta, false);
        let node2 = scene2.node(selection2.first().unwrap()).unwrap();
        assert!(node.transform.orientation.dot(node2.transform.orientation).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_selection_center_orbits_offset_node() {
        // Two nodes at +-X; selection center is the origin. Rotating 90
        // degrees about Y orbits them onto the Z axis.
        let (mut scene, selection) = scene_with(&[Vec3::X, Vec3::NEG_X]);
        let mut gizmo = TransformGizmo {
            pivot_mode: PivotMode::SelectionCenter,
            ..Default::default()
        };
        gizmo.begin_transform(&scene, &selection);
        assert!((gizmo.anchor().unwrap() - Vec3::ZERO).length() < 1e-6);

        let delta = TransformDelta::rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        gizmo.apply_delta(&mut scene, &selection, &delta, false);

        let a = scene.node(selection.items()[0]).unwrap().transform.translation;
        let b = scene.node(selection.items()[1]).unwrap().transform.translation;
        assert!((a - Vec3::NEG_Z).length() < 1e-5);
        assert!((b - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_four_quarter_rotations_equal_half_turn() {
        let (mut scene, selection) = scene_with(&[Vec3::new(3.0, 0.0, 0.0)]);
        let mut gizmo = TransformGizmo::new();
        gizmo.begin_transform(&scene, &selection);

        let delta = TransformDelta::rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4));
        for _ in 0..4 {
            gizmo.apply_delta(&mut scene, &selection, &delta, false);
        }
        gizmo.end_transform();

        let orientation = scene.node(selection.first().unwrap()).unwrap().transform.orientation;
        let expected = Quat::from_rotation_y(std::f32::consts::PI);
        assert!(orientation.dot(expected).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_scale_clamps_to_limit() {
        let (mut scene, selection) = scene_with(&[Vec3::ZERO]);
        let mut gizmo = TransformGizmo::new();
        gizmo.begin_transform(&scene, &selection);

        gizmo.apply_delta(
            &mut scene,
            &selection,
            &TransformDelta::scale(Vec3::splat(1e9)),
            false,
        );

        let scale = scene.node(selection.first().unwrap()).unwrap().transform.scale;
        assert_eq!(scale, Vec3::splat(SCALE_LIMIT));
    }

    #[test]
    fn test_locked_node_skipped_only_while_simulating() {
        let (mut scene, selection) = scene_with(&[Vec3::ZERO]);
        let id = selection.first().unwrap();
        scene.node_mut(id).unwrap().transformable = false;

        let mut gizmo = TransformGizmo::new();
        gizmo.begin_transform(&scene, &selection);
        let delta = TransformDelta::translation(Vec3::X);

        gizmo.apply_delta(&mut scene, &selection, &delta, true);
        assert_eq!(scene.node(id).unwrap().transform.translation, Vec3::ZERO);

        gizmo.apply_delta(&mut scene, &selection, &delta, false);
        assert_eq!(scene.node(id).unwrap().transform.translation, Vec3::X);
    }

    #[test]
    fn test_destroyed_node_does_not_abort_rest() {
        let (mut scene, selection) = scene_with(&[Vec3::ZERO, Vec3::X]);
        let mut gizmo = TransformGizmo::new();
        gizmo.begin_transform(&scene, &selection);

        scene.remove(selection.items()[0]);
        gizmo.apply_delta(
            &mut scene,
            &selection,
            &TransformDelta::translation(Vec3::Y),
            false,
        );

        let survivor = scene.node(selection.items()[1]).unwrap();
        assert_eq!(survivor.transform.translation, Vec3::X + Vec3::Y);
    }

    #[test]
    fn test_rotate_step_with_modifier() {
        let (mut scene, selection) = scene_with(&[Vec3::ZERO]);
        let mut gizmo = TransformGizmo::new();

        gizmo.rotate_step(&mut scene, &selection, 90.0, true, false);
        assert!(!gizmo.is_transforming());

        let orientation = scene.node(selection.first().unwrap()).unwrap().transform.orientation;
        let expected = Quat::from_rotation_y((-45.0f32).to_radians());
        assert!(orientation.dot(expected).abs() > 1.0 - 1e-5);
    }
}
