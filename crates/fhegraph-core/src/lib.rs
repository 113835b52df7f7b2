//! Graph model and selection linkage for the FHE program graph viewer.
//!
//! Two pieces, read bottom-up:
//! - [`render::translate`] projects a [`ProgramGraph`] into the flat
//!   node/edge shape the graph-drawing widget understands.
//! - [`SelectionCoordinator`] owns the viewer's selection state and keeps the
//!   code panel and graph panel consistent with each other.

pub mod edge;
pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod ops;
pub mod render;
pub mod sample;
pub mod selection;

// Re-export commonly used types
pub use edge::{Edge, EdgeRole};
pub use error::CoreError;
pub use graph::{IntegrityWarning, NodeDetail, ProgramGraph};
pub use id::NodeId;
pub use node::ProgramNode;
pub use ops::{Arity, Operation};
pub use render::{translate, RenderEdge, RenderGraph, RenderNode, VisualKind};
pub use selection::{
    LineTable, LineTicket, LineToGraph, SelectionCoordinator, SelectionObserver,
    SelectionSnapshot, SelectionState,
};
