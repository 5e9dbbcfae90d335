//! Built-in overlay stages.
//!
//! Three stages ship with the viewport: editor primitives (gizmo axes, the
//! rubber-band rectangle, debug geometry), editor sprites (icons for
//! otherwise-invisible nodes), and the selection outline. All three are
//! replaceable; the outline additionally supports a runtime override.

use glam::Vec3;
use log::warn;

use crate::core::NodeKind;
use crate::render::context::{LineVertex, ViewFlags};
use crate::render::stage::{OverlayContext, OverlayFrame, OverlayOp, OverlayStage, StageError};
use crate::render::targets::TargetDesc;

/// Draw order of the primitives stage.
pub const ORDER_PRIMITIVES: i32 = 0;
/// Draw order of the sprites stage.
pub const ORDER_SPRITES: i32 = 10;
/// Draw order of the selection outline stage.
pub const ORDER_OUTLINE: i32 = 20;

const AXIS_X_COLOR: [f32; 4] = [0.89, 0.20, 0.24, 1.0];
const AXIS_Y_COLOR: [f32; 4] = [0.42, 0.81, 0.16, 1.0];
const AXIS_Z_COLOR: [f32; 4] = [0.16, 0.44, 0.86, 1.0];
const RUBBER_BAND_COLOR: [f32; 4] = [1.0, 0.62, 0.0, 1.0];
const OUTLINE_COLOR: [f32; 4] = [1.0, 0.55, 0.0, 1.0];

/// Gizmo axes, rubber-band rectangle, and accumulated debug geometry.
#[derive(Default)]
pub struct EditorPrimitivesStage;

impl EditorPrimitivesStage {
    pub const NAME: &'static str = "Editor Primitives";

    fn gizmo_axes(origin: Vec3, size: f32) -> Vec<LineVertex> {
        let axis = |dir: Vec3, color: [f32; 4]| {
            [
                LineVertex {
                    position: origin.to_array(),
                    color,
                },
                LineVertex {
                    position: (origin + dir * size).to_array(),
                    color,
                },
            ]
        };
        let mut vertices = Vec::with_capacity(6);
        vertices.extend(axis(Vec3::X, AXIS_X_COLOR));
        vertices.extend(axis(Vec3::Y, AXIS_Y_COLOR));
        vertices.extend(axis(Vec3::Z, AXIS_Z_COLOR));
        vertices
    }
}

impl OverlayStage for EditorPrimitivesStage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn order(&self) -> i32 {
        ORDER_PRIMITIVES
    }

    fn can_render(&self, ctx: &OverlayContext) -> bool {
        ctx.view_flags.contains(ViewFlags::EDITOR_PRIMITIVES) && ctx.scene_loaded
    }

    fn render(
        &mut self,
        ctx: &OverlayContext,
        frame: &mut OverlayFrame,
    ) -> Result<(), StageError> {
        let mut vertices = Vec::new();
        if let Some(origin) = ctx.gizmo_position {
            vertices.extend(Self::gizmo_axes(origin, ctx.gizmo_size));
        }
        if ctx.view_flags.contains(ViewFlags::DEBUG_DRAW) {
            vertices.extend_from_slice(ctx.debug_draw.vertices());
        }
        if !vertices.is_empty() {
            frame.ops.push(OverlayOp::Lines {
                target: frame.output,
                vertices,
            });
        }
        if let Some(rect) = ctx.rubber_band_rect {
            frame.ops.push(OverlayOp::Rect {
                target: frame.output,
                min: rect.min,
                max: rect.max,
                color: RUBBER_BAND_COLOR,
            });
        }
        Ok(())
    }
}

/// Billboard icons for nodes with no renderable geometry of their own.
#[derive(Default)]
pub struct EditorSpritesStage;

impl EditorSpritesStage {
    pub const NAME: &'static str = "Editor Sprites";

    const SPRITE_SIZE: f32 = 0.5;
}

impl OverlayStage for EditorSpritesStage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn order(&self) -> i32 {
        ORDER_SPRITES
    }

    fn can_render(&self, ctx: &OverlayContext) -> bool {
        ctx.view_flags.contains(ViewFlags::EDITOR_SPRITES) && ctx.scene_loaded
    }

    fn render(
        &mut self,
        ctx: &OverlayContext,
        frame: &mut OverlayFrame,
    ) -> Result<(), StageError> {
        for id in ctx.scene.enumerate_actors(false) {
            let Some(node) = ctx.scene.node(id) else {
                continue;
            };
            if node.kind != NodeKind::Empty || !node.visible {
                continue;
            }
            frame.ops.push(OverlayOp::Sprite {
                target: frame.output,
                position: node.transform.translation,
                size: Self::SPRITE_SIZE,
            });
        }
        Ok(())
    }
}

/// Silhouette outline around the current selection.
///
/// Renders through a pooled temporary target so the outline can be
/// composited over the camera image; when the pool is exhausted the stage
/// degrades to skipping the frame rather than failing it.
#[derive(Default)]
pub struct SelectionOutlineStage;

impl SelectionOutlineStage {
    pub const NAME: &'static str = "Selection Outline";
}

impl OverlayStage for SelectionOutlineStage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn order(&self) -> i32 {
        ORDER_OUTLINE
    }

    fn can_render(&self, ctx: &OverlayContext) -> bool {
        ctx.view_flags.contains(ViewFlags::SELECTION_OUTLINE) && !ctx.selection.is_empty()
    }

    fn render(
        &mut self,
        ctx: &OverlayContext,
        frame: &mut OverlayFrame,
    ) -> Result<(), StageError> {
        let desc = TargetDesc::color(
            frame.viewport_size.x.max(1.0) as u32,
            frame.viewport_size.y.max(1.0) as u32,
        );
        let nodes = ctx.selection.items().to_vec();
        let output = frame.output;
        let ops = &mut *frame.ops;
        let recorded = frame.pool.with_temporary(desc, |_pool, temp| {
            ops.push(OverlayOp::Outline {
                target: temp.id,
                nodes,
                color: OUTLINE_COLOR,
            });
            ops.push(OverlayOp::Blit {
                src: temp.id,
                dst: output,
            });
        });
        if recorded.is_none() {
            warn!("selection outline skipped: target pool exhausted");
        }
        Ok(())
    }
}
