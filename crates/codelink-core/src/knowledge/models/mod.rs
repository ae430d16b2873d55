//! Data models for the code graph.

mod edge;
mod node;
mod stats;

pub use edge::{
    Direction, EdgeSelector, EdgeType, GraphEdge, LinkType, StoredLink, LINKER_SOURCE,
};
pub use node::{CodeNode, NodeKind};
pub use stats::{FileError, GraphStats, IngestReport, LinkReport, ProjectStats};
