//! Per-frame render context and transient draw data.
//!
//! The context is owned by the frame scheduler; this subsystem borrows it
//! for the duration of a hook call only and must not retain it.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use vista_math::Aabb;

/// Kind of draw pass the context is collecting for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PassKind {
    /// Depth-only prepass; editor contributions are skipped
    DepthOnly,
    #[default]
    Forward,
}

/// Viewport shading mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Lit,
    Unlit,
    Wireframe,
    PhysicsDebug,
}

impl ViewMode {
    /// Whether editor overlays are composited for this mode.
    pub fn supports_overlays(&self) -> bool {
        matches!(self, ViewMode::Lit | ViewMode::Wireframe)
    }
}

/// View feature flags gating individual overlay stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewFlags(pub u32);

impl ViewFlags {
    pub const NONE: Self = Self(0);
    pub const EDITOR_PRIMITIVES: Self = Self(1 << 0);
    pub const EDITOR_SPRITES: Self = Self(1 << 1);
    pub const SELECTION_OUTLINE: Self = Self(1 << 2);
    pub const DEBUG_DRAW: Self = Self(1 << 3);

    pub const ALL: Self = Self(0xF);

    #[inline]
    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self::ALL
    }
}

/// Colored line vertex for debug/overlay geometry.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn new(position: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }
}

/// A draw call contributed to the scheduler's draw list.
#[derive(Clone, Debug)]
pub enum DrawCall {
    /// Line-list geometry in world space
    Lines { vertices: Vec<LineVertex> },
}

/// Transient per-frame buffer of editor debug primitives.
///
/// Cleared at the pre-pass hook, filled by selected nodes, flushed into the
/// context draw list at collection, and drawn again by the primitives
/// overlay stage.
#[derive(Clone, Debug, Default)]
pub struct DebugDrawBuffer {
    vertices: Vec<LineVertex>,
}

impl DebugDrawBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    pub fn add_line(&mut self, from: Vec3, to: Vec3, color: [f32; 4]) {
        self.vertices.push(LineVertex::new(from, color));
        self.vertices.push(LineVertex::new(to, color));
    }

    /// Twelve-edge wireframe of an AABB.
    pub fn add_wire_box(&mut self, aabb: &Aabb, color: [f32; 4]) {
        let c = aabb.corners();
        const EDGES: [(usize, usize); 12] = [
            (0, 1), (2, 3), (4, 5), (6, 7), // along X
            (0, 2), (1, 3), (4, 6), (5, 7), // along Y
            (0, 4), (1, 5), (2, 6), (3, 7), // along Z
        ];
        for (a, b) in EDGES {
            self.add_line(c[a], c[b], color);
        }
    }

    /// Copy the buffer into a draw list as one line-list call.
    ///
    /// The buffer itself stays intact for the overlay stage.
    pub fn flush_into(&self, draw_calls: &mut Vec<DrawCall>) {
        if !self.vertices.is_empty() {
            draw_calls.push(DrawCall::Lines {
                vertices: self.vertices.clone(),
            });
        }
    }
}

/// Per-frame render context, borrowed from the frame scheduler.
#[derive(Debug)]
pub struct RenderContext {
    pub pass_kind: PassKind,
    pub view_mode: ViewMode,
    pub view_flags: ViewFlags,
    pub view_projection: Mat4,
    pub viewport_size: Vec2,
    /// Ordered draw-call list for this pass
    pub draw_calls: Vec<DrawCall>,
}

impl RenderContext {
    pub fn new(pass_kind: PassKind, view_projection: Mat4, viewport_size: Vec2) -> Self {
        Self {
            pass_kind,
            view_mode: ViewMode::default(),
            view_flags: ViewFlags::default(),
            view_projection,
            viewport_size,
            draw_calls: Vec::new(),
        }
    }
}
