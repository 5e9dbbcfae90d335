//! Viewport controller.
//!
//! Binds per-tick input to the gizmo, the rubber-band selector, camera focus,
//! and the render composition. All of it runs on the update thread; render
//! hooks are forwarded to [`RenderComposition`] by the frame scheduler after
//! the input update, so overlays always see this tick's final state.

use log::debug;
use vista_math::BoundingSphere;

use crate::core::{EditorPreferences, NodeId, SceneEdit, SceneQuery, Selection};
use crate::input::InputFrame;
use crate::render::{
    FrameTargets, OverlayInputs, OverlayOp, RenderComposition, RenderContext, ViewFlags,
};
use crate::tools::RubberBandSelector;
use crate::viewport::camera::ViewportCamera;
use crate::viewport::gizmo::{TransformDelta, TransformGizmo};

/// Selection-change callback.
pub type SelectionListener = Box<dyn FnMut(&[NodeId])>;

/// Camera mode that keeps re-centering on the selection each tick.
#[derive(Clone, Copy, Debug)]
struct LockedFocus {
    /// Current framing distance, adjustable by scroll
    distance: f32,
}

/// Orchestrates viewport interaction for one editor window.
pub struct ViewportController {
    pub camera: ViewportCamera,
    selection: Selection,
    gizmo: TransformGizmo,
    rubber_band: RubberBandSelector,
    composition: RenderComposition,
    preferences: EditorPreferences,
    locked_focus: Option<LockedFocus>,
    listeners: Vec<SelectionListener>,
    scene_loaded: bool,
}

impl ViewportController {
    pub fn new(preferences: EditorPreferences) -> Self {
        Self {
            camera: ViewportCamera::default(),
            selection: Selection::new(),
            gizmo: TransformGizmo::new(),
            rubber_band: RubberBandSelector::new(),
            composition: RenderComposition::new(),
            preferences,
            locked_focus: None,
            listeners: Vec::new(),
            scene_loaded: false,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn gizmo(&self) -> &TransformGizmo {
        &self.gizmo
    }

    pub fn gizmo_mut(&mut self) -> &mut TransformGizmo {
        &mut self.gizmo
    }

    pub fn rubber_band(&self) -> &RubberBandSelector {
        &self.rubber_band
    }

    pub fn composition(&self) -> &RenderComposition {
        &self.composition
    }

    pub fn composition_mut(&mut self) -> &mut RenderComposition {
        &mut self.composition
    }

    pub fn preferences(&self) -> &EditorPreferences {
        &self.preferences
    }

    pub fn is_focus_locked(&self) -> bool {
        self.locked_focus.is_some()
    }

    /// Tell the controller whether a scene is open; overlays that draw into
    /// the world are suppressed without one.
    pub fn set_scene_loaded(&mut self, loaded: bool) {
        self.scene_loaded = loaded;
    }

    /// Subscribe to selection changes. Listeners fire in subscription order
    /// at the end of the update tick on which the selection changed.
    pub fn on_selection_changed(&mut self, listener: impl FnMut(&[NodeId]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Merged bounding sphere of the live selection, if any node survives.
    fn selection_sphere(&self, scene: &dyn SceneQuery) -> Option<BoundingSphere> {
        let mut merged: Option<BoundingSphere> = None;
        for id in self.selection.items() {
            let Some(node) = scene.node(*id) else {
                continue;
            };
            let sphere = BoundingSphere::from_aabb(&node.world_bounds());
            merged = Some(match merged {
                Some(m) => m.merge(&sphere),
                None => sphere,
            });
        }
        merged
    }

    fn clamp_focus_distance(&self, distance: f32) -> f32 {
        distance.clamp(
            self.preferences.min_focus_distance,
            self.preferences.max_focus_distance,
        )
    }

    /// One-shot framing: recenter the camera on the selection once, keeping
    /// the current orientation.
    pub fn focus_selection(&mut self, scene: &dyn SceneQuery) {
        if let Some(sphere) = self.selection_sphere(scene) {
            let distance = self.clamp_focus_distance(
                self.camera
                    .framing_distance(&sphere, self.preferences.focus_margin),
            );
            self.camera.center_on(sphere.center, distance);
        }
    }

    /// Engage locked focus on the current selection. No-op while empty.
    pub fn lock_focus(&mut self, scene: &dyn SceneQuery) {
        let Some(sphere) = self.selection_sphere(scene) else {
            return;
        };
        let distance = self.clamp_focus_distance(
            self.camera
                .framing_distance(&sphere, self.preferences.focus_margin),
        );
        self.camera.center_on(sphere.center, distance);
        self.locked_focus = Some(LockedFocus { distance });
        debug!("focus locked at distance {:.2}", distance);
    }

    pub fn unlock_focus(&mut self) {
        self.locked_focus = None;
    }

    /// Forward a continuous gizmo delta from an in-progress drag.
    pub fn apply_gizmo_delta<S: SceneEdit>(
        &mut self,
        scene: &mut S,
        delta: &TransformDelta,
        simulating: bool,
    ) {
        self.gizmo
            .apply_delta(scene, &self.selection, delta, simulating);
    }

    /// Run one input tick.
    ///
    /// Order matters: gizmo capture blocks the rubber band, the discrete
    /// rotate shortcut runs after drag handling, and locked focus is
    /// maintained last so it sees this tick's final selection.
    pub fn update<S: SceneEdit>(&mut self, input: &InputFrame, scene: &mut S, simulating: bool) {
        // A live gizmo drag owns the pointer.
        let pointer_captured = self.gizmo.is_transforming();

        self.rubber_band.update(
            input,
            pointer_captured,
            &self.camera,
            &*scene,
            &mut self.selection,
            self.preferences.drag_threshold_px,
        );

        if input.rotate_step_pressed && input.has_focus && !self.selection.is_empty() {
            self.gizmo.rotate_step(
                &mut *scene,
                &self.selection,
                self.preferences.rotate_step_degrees,
                input.modifiers.ctrl,
                simulating,
            );
        }

        if self.gizmo.is_transforming() && input.primary_released {
            self.gizmo.end_transform();
        }

        self.maintain_locked_focus(input, &*scene);
        self.dispatch_selection_listeners();
    }

    fn maintain_locked_focus(&mut self, input: &InputFrame, scene: &dyn SceneQuery) {
        let Some(mut lock) = self.locked_focus else {
            return;
        };

        if self.selection.is_empty() {
            debug!("focus lock released: selection empty");
            self.locked_focus = None;
            return;
        }
        if input.has_focus && (input.primary_pressed || input.secondary_pressed) {
            debug!("focus lock released: pointer press");
            self.locked_focus = None;
            return;
        }

        if input.has_focus && input.scroll_delta != 0.0 {
            let factor = 1.0 - input.scroll_delta * self.preferences.zoom_sensitivity;
            lock.distance = self.clamp_focus_distance(lock.distance * factor.max(0.01));
        }

        if let Some(sphere) = self.selection_sphere(scene) {
            self.camera.center_on(sphere.center, lock.distance);
        }
        self.locked_focus = Some(lock);
    }

    fn dispatch_selection_listeners(&mut self) {
        if !self.selection.take_dirty() {
            return;
        }
        let items: Vec<NodeId> = self.selection.items().to_vec();
        for listener in &mut self.listeners {
            listener(&items);
        }
    }

    /// Pre-pass hook forwarded by the frame scheduler.
    pub fn frame_begin(&mut self, scene: &dyn SceneQuery) {
        self.composition.frame_begin(scene, &self.selection);
    }

    /// Draw-collection hook forwarded by the frame scheduler.
    pub fn collect_draw_calls(&mut self, ctx: &mut RenderContext) {
        self.composition.collect_draw_calls(ctx);
    }

    /// Post-render hook forwarded by the frame scheduler.
    pub fn post_render(
        &mut self,
        ctx: &RenderContext,
        targets: FrameTargets,
        scene: &dyn SceneQuery,
    ) -> Vec<OverlayOp> {
        let gizmo_position = self
            .gizmo
            .anchor()
            .or_else(|| self.gizmo.position(scene, &self.selection));
        self.composition.post_render(
            ctx,
            targets,
            OverlayInputs {
                scene,
                selection: &self.selection,
                rubber_band_rect: self.rubber_band.active_rect(),
                gizmo_position,
                gizmo_size: self.preferences.gizmo_size,
                scene_loaded: self.scene_loaded,
            },
        )
    }

    /// View flags honoring the sprite preference.
    pub fn view_flags(&self) -> ViewFlags {
        let flags = ViewFlags::default();
        if self.preferences.show_editor_sprites {
            flags
        } else {
            flags.without(ViewFlags::EDITOR_SPRITES)
        }
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(EditorPreferences::default())
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};
    use vista_math::Aabb;

    use super::*;
    use crate::core::{NodeId, SceneNode, SceneNodes};

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn scene_with_unit_box_at(position: Vec3) -> (SceneNodes, NodeId) {
        let mut scene = SceneNodes::new();
        let id = scene.spawn(
            SceneNode::new(NodeId(0), "box")
                .with_translation(position)
                .with_bounds(Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE)),
        );
        (scene, id)
    }

    fn idle_input() -> InputFrame {
        InputFrame::at(Vec2::new(100.0, 100.0))
    }

    #[test]
    fn test_lock_focus_follows_moving_selection() {
        init_logs();
        let (mut scene, id) = scene_with_unit_box_at(Vec3::ZERO);
        let mut controller = ViewportController::default();
        controller.selection_mut().select(id);
        controller.lock_focus(&scene);
        assert!(controller.is_focus_locked());
        let first_pos = controller.camera.position;

        scene.node_mut(id).unwrap().transform.translation = Vec3::new(50.0, 0.0, 0.0);
        controller.update(&idle_input(), &mut scene, false);
        assert!(controller.is_focus_locked());
        let moved = controller.camera.position - first_pos;
        assert!((moved - Vec3::new(50.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_lock_focus_disengages_on_empty_selection() {
        let (mut scene, id) = scene_with_unit_box_at(Vec3::ZERO);
        let mut controller = ViewportController::default();
        controller.selection_mut().select(id);
        controller.lock_focus(&scene);

        controller.selection_mut().clear();
        controller.update(&idle_input(), &mut scene, false);
        assert!(!controller.is_focus_locked());
    }

    #[test]
    fn test_lock_focus_disengages_on_press_with_focus() {
        let (mut scene, id) = scene_with_unit_box_at(Vec3::ZERO);
        let mut controller = ViewportController::default();
        controller.selection_mut().select(id);
        controller.lock_focus(&scene);

        let input = idle_input().with_primary_pressed();
        controller.update(&input, &mut scene, false);
        assert!(!controller.is_focus_locked());
    }

    #[test]
    fn test_lock_focus_survives_press_without_focus() {
        let (mut scene, id) = scene_with_unit_box_at(Vec3::ZERO);
        let mut controller = ViewportController::default();
        controller.selection_mut().select(id);
        controller.lock_focus(&scene);

        let mut input = idle_input().with_primary_pressed();
        input.has_focus = false;
        controller.update(&input, &mut scene, false);
        assert!(controller.is_focus_locked());
    }

    #[test]
    fn test_scroll_adjusts_locked_distance() {
        let (mut scene, id) = scene_with_unit_box_at(Vec3::ZERO);
        let mut controller = ViewportController::default();
        controller.selection_mut().select(id);
        controller.lock_focus(&scene);
        let before = (controller.camera.position - Vec3::ZERO).length();

        let mut input = idle_input();
        input.scroll_delta = 1.0;
        controller.update(&input, &mut scene, false);
        let after = (controller.camera.position - Vec3::ZERO).length();
        assert!(after < before);
    }

    #[test]
    fn test_focus_selection_frames_once() {
        let (mut scene, id) = scene_with_unit_box_at(Vec3::new(10.0, 0.0, 0.0));
        let mut controller = ViewportController::default();
        controller.selection_mut().select(id);
        controller.focus_selection(&scene);
        assert!(!controller.is_focus_locked());

        let pos = controller.camera.position;
        scene.node_mut(id).unwrap().transform.translation = Vec3::new(20.0, 0.0, 0.0);
        controller.update(&idle_input(), &mut scene, false);
        // One-shot framing does not track the node.
        assert_eq!(controller.camera.position, pos);
    }

    #[test]
    fn test_selection_listeners_fire_in_order() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let (mut scene, id) = scene_with_unit_box_at(Vec3::ZERO);
        let mut controller = ViewportController::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = log.clone();
        controller.on_selection_changed(move |items| {
            first.borrow_mut().push(("first", items.len()));
        });
        let second = log.clone();
        controller.on_selection_changed(move |items| {
            second.borrow_mut().push(("second", items.len()));
        });

        controller.selection_mut().select(id);
        controller.update(&idle_input(), &mut scene, false);
        assert_eq!(*log.borrow(), vec![("first", 1), ("second", 1)]);

        // No change, no dispatch.
        log.borrow_mut().clear();
        controller.update(&idle_input(), &mut scene, false);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_release_ends_gizmo_transform() {
        let (mut scene, id) = scene_with_unit_box_at(Vec3::ZERO);
        let mut controller = ViewportController::default();
        controller.selection_mut().select(id);
        controller.selection_mut().take_dirty();

        let selection = controller.selection.items().to_vec();
        let mut snapshot = Selection::new();
        snapshot.set(selection);
        snapshot.take_dirty();
        assert!(controller.gizmo_mut().begin_transform(&scene, &snapshot));
        assert!(controller.gizmo().is_transforming());

        let input = idle_input().with_primary_released();
        controller.update(&input, &mut scene, false);
        assert!(!controller.gizmo().is_transforming());
    }

    #[test]
    fn test_rotate_shortcut_needs_focus_and_selection() {
        let (mut scene, id) = scene_with_unit_box_at(Vec3::ZERO);
        let mut controller = ViewportController::default();

        let mut input = idle_input();
        input.rotate_step_pressed = true;

        // No selection: orientation untouched.
        controller.update(&input, &mut scene, false);
        let untouched = scene.node(id).unwrap().transform.orientation;
        assert!(untouched.angle_between(glam::Quat::IDENTITY) < 1e-6);

        controller.selection_mut().select(id);
        controller.update(&input, &mut scene, false);
        let rotated = scene.node(id).unwrap().transform.orientation;
        let expected = glam::Quat::from_rotation_y(90f32.to_radians());
        assert!(rotated.angle_between(expected) < 1e-4);
    }
}
