//! Vista Scene Editor Core
//!
//! Interactive 3D viewport editing: transform gizmos, rubber-band
//! multi-selection, and the per-frame render composition that layers
//! editor overlays onto the camera's rendered image.
//!
//! ## Features
//!
//! - **Transform Gizmo**: translate/rotate/scale a multi-selection with
//!   object-center or selection-center pivot semantics
//! - **Rubber-Band Selection**: screen-rectangle drag with full-containment
//!   hit testing and modifier-key set algebra
//! - **Render Composition**: ordered overlay stages (primitives, sprites,
//!   selection outline) driven by three frame hooks
//! - **Locked Focus**: camera mode that tracks the selection's merged
//!   bounding sphere every tick
//! - **Preferences**: TOML-backed editor settings
//!
//! ## Architecture
//!
//! ```text
//! InputFrame → ViewportController → Gizmo / RubberBand / Selection
//!                                 → RenderComposition (frame hooks)
//! ```
//!
//! The crate owns no window, device, or GPU resources; the host supplies
//! input snapshots and a scene-graph view ([`core::SceneQuery`]) and
//! consumes recorded draw data.

pub mod core;
pub mod input;
pub mod render;
pub mod tools;
pub mod viewport;

// Re-export commonly used types
pub use core::{
    EditorPreferences, NodeId, NodeKind, NodeTransform, PreferencesError, SceneEdit, SceneNode,
    SceneNodes, SceneQuery, Selection, SelectionMode,
};

pub use input::{InputFrame, Modifiers};

pub use render::{
    DebugDrawBuffer, DrawCall, DrawContributor, FrameTargets, LineVertex, OverlayContext,
    OverlayFrame, OverlayInputs, OverlayOp, OverlayStage, PassKind, RenderComposition,
    RenderContext, RenderTargetPool, StageError, TargetDesc, TargetId, ViewFlags, ViewMode,
};

pub use tools::{RubberBandPhase, RubberBandSelector};

pub use viewport::{
    PivotMode, TransformDelta, TransformGizmo, ViewportCamera, ViewportController, SCALE_LIMIT,
};
