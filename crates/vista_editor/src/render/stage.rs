//! Overlay stage interface.
//!
//! Stages are named, orderable units of overlay rendering registered once at
//! viewport construction. Each exposes a guard evaluated immediately before
//! it runs; a false guard skips the stage with no side effects.

use glam::{Mat4, Vec2, Vec3};
use vista_math::ScreenRect;

use crate::core::{SceneQuery, Selection};
use crate::render::context::{DebugDrawBuffer, LineVertex, ViewFlags};
use crate::render::targets::{RenderTargetPool, TargetId};

/// Errors raised by an overlay stage.
#[derive(Clone, Debug)]
pub enum StageError {
    /// Stage body failed; the frame continues without it
    Render(String),
    /// A required resource was unavailable this frame
    Resource(String),
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageError::Render(msg) => write!(f, "overlay render error: {}", msg),
            StageError::Resource(msg) => write!(f, "overlay resource error: {}", msg),
        }
    }
}

impl std::error::Error for StageError {}

/// Read-only view of the frame's interactive state, shared by all stages.
pub struct OverlayContext<'a> {
    pub scene: &'a dyn SceneQuery,
    pub selection: &'a Selection,
    /// Live rubber-band rectangle, if a drag is in progress
    pub rubber_band_rect: Option<ScreenRect>,
    /// Gizmo anchor/position to draw, if a selection exists
    pub gizmo_position: Option<Vec3>,
    pub gizmo_size: f32,
    pub debug_draw: &'a DebugDrawBuffer,
    pub view_flags: ViewFlags,
    pub scene_loaded: bool,
}

/// Recorded overlay draw operation.
///
/// Rasterization is the renderer's concern; stages record what to draw and
/// where, in execution order.
#[derive(Clone, Debug)]
pub enum OverlayOp {
    /// World-space line list into a target
    Lines {
        target: TargetId,
        vertices: Vec<LineVertex>,
    },
    /// Screen-space rectangle outline (the rubber band)
    Rect {
        target: TargetId,
        min: Vec2,
        max: Vec2,
        color: [f32; 4],
    },
    /// Billboard icon at a world position
    Sprite {
        target: TargetId,
        position: Vec3,
        size: f32,
    },
    /// Selection-outline silhouette of the given nodes
    Outline {
        target: TargetId,
        nodes: Vec<crate::core::NodeId>,
        color: [f32; 4],
    },
    /// Copy one target onto another
    Blit { src: TargetId, dst: TargetId },
}

/// Mutable draw surface for the post-render hook.
pub struct OverlayFrame<'a> {
    /// The camera's rendered image
    pub output: TargetId,
    pub depth: Option<TargetId>,
    pub view_projection: Mat4,
    pub viewport_size: Vec2,
    /// Ordered operations recorded this hook
    pub ops: &'a mut Vec<OverlayOp>,
    /// Temporary-target pool; targets must not outlive the hook
    pub pool: &'a mut RenderTargetPool,
}

/// Contributes draw calls to the main color pass.
///
/// Contributors run during draw-call collection, before the accumulated
/// debug geometry is flushed, so debug lines always land on top.
pub trait DrawContributor {
    fn contribute(&mut self, ctx: &mut crate::render::context::RenderContext);
}

/// A named, orderable unit of overlay rendering.
pub trait OverlayStage {
    /// Unique stage name.
    fn name(&self) -> &str;

    /// Order key; lower runs first. Ties break by registration order.
    fn order(&self) -> i32;

    /// Guard evaluated immediately before the stage executes.
    fn can_render(&self, ctx: &OverlayContext) -> bool;

    /// Record this stage's overlay operations.
    fn render(&mut self, ctx: &OverlayContext, frame: &mut OverlayFrame)
        -> Result<(), StageError>;
}
