//! Editor render contributions: per-frame hooks, overlay stages, and
//! temporary render targets.

pub mod context;
pub mod pipeline;
pub mod stage;
pub mod stages;
pub mod targets;

pub use context::{
    DebugDrawBuffer, DrawCall, LineVertex, PassKind, RenderContext, ViewFlags, ViewMode,
};
pub use pipeline::{FrameTargets, OverlayInputs, RenderComposition};
pub use stage::{DrawContributor, OverlayContext, OverlayFrame, OverlayOp, OverlayStage, StageError};
pub use stages::{EditorPrimitivesStage, EditorSpritesStage, SelectionOutlineStage};
pub use targets::{RenderTarget, RenderTargetPool, TargetDesc, TargetFormat, TargetId};
