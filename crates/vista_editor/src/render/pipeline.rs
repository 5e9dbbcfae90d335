//! Per-frame render composition.
//!
//! [`RenderComposition`] owns the overlay stage list, the draw contributors,
//! the debug-draw buffer, and the temporary-target pool. The frame scheduler
//! calls its three hooks in a fixed order each frame: [`frame_begin`] before
//! any pass, [`collect_draw_calls`] once per pass while draw lists are open,
//! and [`post_render`] after the scene image is complete.
//!
//! [`frame_begin`]: RenderComposition::frame_begin
//! [`collect_draw_calls`]: RenderComposition::collect_draw_calls
//! [`post_render`]: RenderComposition::post_render

use glam::Vec3;
use log::{debug, error, warn};
use vista_math::ScreenRect;

use crate::core::{SceneQuery, Selection};
use crate::render::context::{DebugDrawBuffer, PassKind, RenderContext, ViewFlags};
use crate::render::stage::{DrawContributor, OverlayContext, OverlayFrame, OverlayOp, OverlayStage};
use crate::render::stages::{EditorPrimitivesStage, EditorSpritesStage, SelectionOutlineStage};
use crate::render::targets::{RenderTargetPool, TargetId};

/// Default capacity of the temporary-target pool.
const TARGET_POOL_CAPACITY: usize = 4;

const SELECTION_BOX_COLOR: [f32; 4] = [0.96, 0.67, 0.07, 1.0];

/// Scheduler-owned targets handed to the post-render hook.
#[derive(Clone, Copy, Debug)]
pub struct FrameTargets {
    /// The completed camera image
    pub output: TargetId,
    /// Scene depth, when the scheduler exposes it
    pub depth: Option<TargetId>,
}

/// Interactive state sampled for the overlay pass.
pub struct OverlayInputs<'a> {
    pub scene: &'a dyn SceneQuery,
    pub selection: &'a Selection,
    pub rubber_band_rect: Option<ScreenRect>,
    pub gizmo_position: Option<Vec3>,
    pub gizmo_size: f32,
    pub scene_loaded: bool,
}

/// Owner of the editor's per-frame render contributions.
pub struct RenderComposition {
    /// Stage list, kept sorted by order (registration breaks ties)
    stages: Vec<Box<dyn OverlayStage>>,
    contributors: Vec<Box<dyn DrawContributor>>,
    debug: DebugDrawBuffer,
    pool: RenderTargetPool,
    /// Name of the stage currently acting as the selection outline
    outline_name: String,
    /// Stashed default outline stage while an override is installed
    stashed_outline: Option<Box<dyn OverlayStage>>,
}

impl RenderComposition {
    /// Composition with the three built-in overlay stages registered.
    pub fn new() -> Self {
        let mut composition = Self {
            stages: Vec::new(),
            contributors: Vec::new(),
            debug: DebugDrawBuffer::new(),
            pool: RenderTargetPool::with_capacity(TARGET_POOL_CAPACITY),
            outline_name: SelectionOutlineStage::NAME.to_string(),
            stashed_outline: None,
        };
        composition.register_stage(Box::new(EditorPrimitivesStage));
        composition.register_stage(Box::new(EditorSpritesStage));
        composition.register_stage(Box::new(SelectionOutlineStage));
        composition
    }

    /// Registered stage names, in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Register an overlay stage. Stage names must be unique.
    pub fn register_stage(&mut self, stage: Box<dyn OverlayStage>) {
        if self.stages.iter().any(|s| s.name() == stage.name()) {
            debug_assert!(false, "overlay stage '{}' already registered", stage.name());
            warn!(
                "ignoring duplicate overlay stage registration '{}'",
                stage.name()
            );
            return;
        }
        // Insert after all stages with order <= the new stage's, so equal
        // orders keep registration order.
        let pos = self
            .stages
            .partition_point(|s| s.order() <= stage.order());
        debug!("registering overlay stage '{}'", stage.name());
        self.stages.insert(pos, stage);
    }

    /// Remove a stage by name. Returns the stage if it was registered.
    pub fn unregister_stage(&mut self, name: &str) -> Option<Box<dyn OverlayStage>> {
        let pos = self.stages.iter().position(|s| s.name() == name)?;
        Some(self.stages.remove(pos))
    }

    /// Register a main-pass draw contributor.
    pub fn register_contributor(&mut self, contributor: Box<dyn DrawContributor>) {
        self.contributors.push(contributor);
    }

    /// Replace the selection-outline stage for this session.
    ///
    /// At most one override may be installed at a time.
    pub fn set_outline_override(&mut self, stage: Box<dyn OverlayStage>) {
        if self.stashed_outline.is_some() {
            debug_assert!(false, "selection outline is already overridden");
            warn!("ignoring second selection-outline override");
            return;
        }
        let Some(pos) = self
            .stages
            .iter()
            .position(|s| s.name() == self.outline_name)
        else {
            debug_assert!(false, "selection outline stage is missing");
            warn!("selection-outline override ignored: no outline stage registered");
            return;
        };
        debug!("overriding selection outline with '{}'", stage.name());
        self.outline_name = stage.name().to_string();
        let previous = std::mem::replace(&mut self.stages[pos], stage);
        self.stashed_outline = Some(previous);
        self.stages.sort_by_key(|s| s.order());
    }

    /// Restore the default selection-outline stage.
    pub fn clear_outline_override(&mut self) {
        let Some(default) = self.stashed_outline.take() else {
            debug_assert!(false, "selection outline is not overridden");
            warn!("ignoring outline-override clear: nothing installed");
            return;
        };
        let Some(pos) = self
            .stages
            .iter()
            .position(|s| s.name() == self.outline_name)
        else {
            // Override was unregistered out from under us; reinstall the default.
            self.outline_name = default.name().to_string();
            self.register_stage(default);
            return;
        };
        self.outline_name = default.name().to_string();
        self.stages[pos] = default;
        self.stages.sort_by_key(|s| s.order());
    }

    /// Pre-pass hook: rebuild the per-frame debug geometry.
    ///
    /// Selection highlight boxes accumulate here so every later pass and
    /// stage sees the same data.
    pub fn frame_begin(&mut self, scene: &dyn SceneQuery, selection: &Selection) {
        self.debug.clear();
        for id in selection.items() {
            let Some(node) = scene.node(*id) else {
                continue;
            };
            if !node.active {
                continue;
            }
            self.debug
                .add_wire_box(&node.world_bounds(), SELECTION_BOX_COLOR);
        }
    }

    /// Per-pass hook: contribute editor draw calls to an open draw list.
    ///
    /// Depth-only passes take no editor contributions.
    pub fn collect_draw_calls(&mut self, ctx: &mut RenderContext) {
        if ctx.pass_kind == PassKind::DepthOnly {
            return;
        }
        for contributor in &mut self.contributors {
            contributor.contribute(ctx);
        }
        if ctx.view_flags.contains(ViewFlags::DEBUG_DRAW) {
            self.debug.flush_into(&mut ctx.draw_calls);
        }
    }

    /// Post-scene hook: run the overlay stages over the finished image.
    ///
    /// Stages whose guard fails are skipped; a stage error is logged and the
    /// remaining stages still run. View modes without overlay support return
    /// an empty op list.
    pub fn post_render(
        &mut self,
        ctx: &RenderContext,
        targets: FrameTargets,
        inputs: OverlayInputs<'_>,
    ) -> Vec<OverlayOp> {
        let mut ops = Vec::new();
        if !ctx.view_mode.supports_overlays() {
            return ops;
        }

        let Self {
            stages,
            pool,
            debug,
            ..
        } = self;
        let overlay_ctx = OverlayContext {
            scene: inputs.scene,
            selection: inputs.selection,
            rubber_band_rect: inputs.rubber_band_rect,
            gizmo_position: inputs.gizmo_position,
            gizmo_size: inputs.gizmo_size,
            debug_draw: debug,
            view_flags: ctx.view_flags,
            scene_loaded: inputs.scene_loaded,
        };
        let mut frame = OverlayFrame {
            output: targets.output,
            depth: targets.depth,
            view_projection: ctx.view_projection,
            viewport_size: ctx.viewport_size,
            ops: &mut ops,
            pool,
        };
        for stage in stages.iter_mut() {
            if !stage.can_render(&overlay_ctx) {
                continue;
            }
            if let Err(err) = stage.render(&overlay_ctx, &mut frame) {
                error!("overlay stage '{}' failed: {}", stage.name(), err);
            }
        }
        ops
    }
}

impl Default for RenderComposition {
    fn default() -> Self {
        Self::new()
    }
}
