//! Style nodes: identity, state and the arena they live in.

pub mod declaration;
pub mod state;
pub mod tree;

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a style node. Copy, lightweight (u64).
    pub struct NodeId;
}

pub use declaration::NodeDeclaration;
pub use state::{JunctionSides, RegionFlags, StateFlags};
pub use tree::{StyleNode, StyleTree};
