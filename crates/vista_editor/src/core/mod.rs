//! Core editor state: scene node handles, selection, preferences.

pub mod node;
pub mod preferences;
pub mod selection;

pub use node::{NodeId, NodeKind, NodeTransform, SceneEdit, SceneNode, SceneNodes, SceneQuery};
pub use preferences::{EditorPreferences, PreferencesError};
pub use selection::{Selection, SelectionMode};
