//! Rubber-band rectangular multi-selection.
//!
//! Converts a 2D screen drag into a visibility-and-containment test against
//! all scene actors. An actor is hit only when *every* projected corner of
//! its world bounds lies inside the normalized rectangle; full containment
//! (not intersection) keeps large background geometry that merely overlaps
//! the rectangle edge out of the selection.

use glam::Vec2;
use vista_math::ScreenRect;

use crate::core::{NodeId, NodeKind, SceneQuery, Selection, SelectionMode};
use crate::input::InputFrame;
use crate::viewport::camera::ViewportCamera;

/// Drag state machine phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RubberBandPhase {
    /// No drag in progress
    #[default]
    Idle,
    /// Primary button down, pointer travel below the drag threshold
    PendingStart,
    /// Rectangle is live and driving selection
    Active,
}

/// Drag-driven screen-rectangle selector.
#[derive(Clone, Debug, Default)]
pub struct RubberBandSelector {
    phase: RubberBandPhase,
    /// Fixed rectangle origin, set at button press
    origin: Vec2,
    /// Pointer travel accumulated since press
    travel: f32,
    /// Rectangle of the last committed selection pass
    last_committed: Option<ScreenRect>,
    /// Selection snapshot taken when the drag went active
    base_selection: Vec<NodeId>,
}

impl RubberBandSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RubberBandPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == RubberBandPhase::Active
    }

    /// Rectangle to draw this frame, if a drag is live.
    pub fn active_rect(&self) -> Option<ScreenRect> {
        self.last_committed.filter(|_| self.is_active())
    }

    /// Abort any drag without touching the selection.
    pub fn cancel(&mut self) {
        self.phase = RubberBandPhase::Idle;
        self.last_committed = None;
        self.base_selection.clear();
        self.travel = 0.0;
    }

    /// Drive the state machine for one input tick.
    ///
    /// `pointer_captured` is true when another control (gizmo, camera
    /// navigation) owns the pointer; a press is then ignored.
    pub fn update(
        &mut self,
        input: &InputFrame,
        pointer_captured: bool,
        camera: &ViewportCamera,
        scene: &dyn SceneQuery,
        selection: &mut Selection,
        drag_threshold_px: f32,
    ) {
        // Focus loss or pointer leave cancels any gesture outright.
        if self.phase != RubberBandPhase::Idle && (!input.has_focus || !input.pointer_inside) {
            self.cancel();
            return;
        }

        match self.phase {
            RubberBandPhase::Idle => {
                if input.primary_pressed && !pointer_captured && input.pointer_inside {
                    self.phase = RubberBandPhase::PendingStart;
                    self.origin = input.pointer_pos;
                    self.travel = 0.0;
                }
            }
            RubberBandPhase::PendingStart => {
                if !input.primary_down {
                    // Plain click; picking handles it elsewhere
                    self.cancel();
                    return;
                }
                self.travel += input.pointer_delta.length();
                if self.travel > drag_threshold_px {
                    self.phase = RubberBandPhase::Active;
                    self.base_selection = selection.items().to_vec();
                    self.last_committed = None;
                    self.recompute(input, camera, scene, selection);
                }
            }
            RubberBandPhase::Active => {
                if !input.primary_down {
                    self.cancel();
                    return;
                }
                self.recompute(input, camera, scene, selection);
            }
        }
    }

    /// Recompute the rectangle and, when it changed, run a selection pass.
    fn recompute(
        &mut self,
        input: &InputFrame,
        camera: &ViewportCamera,
        scene: &dyn SceneQuery,
        selection: &mut Selection,
    ) {
        let rect = ScreenRect::from_corners(self.origin, input.pointer_pos);
        if self.last_committed == Some(rect) {
            return;
        }

        let hits = self.query_hits(&rect, camera, scene);
        let mode = SelectionMode::from_modifiers(input.modifiers.shift, input.modifiers.ctrl);
        selection.set(Selection::combine(&self.base_selection, &hits, mode));

        self.last_committed = Some(rect);
    }

    /// Actors whose world bounds are fully contained in the rectangle.
    fn query_hits(
        &self,
        rect: &ScreenRect,
        camera: &ViewportCamera,
        scene: &dyn SceneQuery,
    ) -> Vec<NodeId> {
        let frustum = camera.frustum();
        let mut hits = Vec::new();

        for id in scene.enumerate_actors(false) {
            let Some(node) = scene.node(id) else {
                continue;
            };
            if !node.selectable || !node.visible || node.kind == NodeKind::Empty {
                continue;
            }
            // 2D UI is selected through a different path
            if node.kind.is_ui() && node.under_2d_canvas {
                continue;
            }

            let bounds = node.world_bounds();
            if frustum.is_outside(&bounds) {
                continue;
            }

            let contained = bounds.corners().iter().all(|&corner| {
                camera
                    .project_to_screen(corner)
                    .is_some_and(|p| rect.contains(p))
            });
            if contained {
                hits.push(id);
            }
        }

        hits
    }
}
