//! Storage seam for the code graph.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::error::KnowledgeError;
use super::models::{
    CodeNode, Direction, EdgeSelector, EdgeType, GraphEdge, GraphStats, ProjectStats, StoredLink,
};

/// Merge-semantics graph store.
///
/// Every write is an upsert keyed by a deterministic id, so repeating a call
/// never duplicates data. Implementations must tolerate concurrent use from
/// several ingestion workers.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create tables and indexes. Safe to call on every start.
    async fn initialize_schema(&self) -> Result<(), KnowledgeError>;

    /// Create the project if absent and touch its timestamp.
    async fn upsert_project(&self, name: &str) -> Result<(), KnowledgeError>;

    async fn project_exists(&self, name: &str) -> Result<bool, KnowledgeError>;

    /// Names of all projects, sorted.
    async fn list_projects(&self) -> Result<Vec<String>, KnowledgeError>;

    /// Create the node if absent, else merge the supplied properties.
    ///
    /// A `None` hash leaves the stored hash untouched.
    async fn upsert_node(&self, node: &CodeNode) -> Result<(), KnowledgeError>;

    /// `Project --CONTAINS--> File`.
    async fn link_project(
        &self,
        project: &str,
        file_id: &str,
        props: Map<String, Value>,
    ) -> Result<(), KnowledgeError>;

    /// Merge-create one edge between two code nodes.
    async fn link(
        &self,
        from: &str,
        to: &str,
        edge_type: EdgeType,
        props: Map<String, Value>,
    ) -> Result<(), KnowledgeError> {
        let edge = match edge_type {
            EdgeType::Contains => GraphEdge {
                props,
                ..GraphEdge::contains(from, to, "")
            },
            EdgeType::SemanticLink(link_type) => GraphEdge {
                props,
                ..GraphEdge::semantic(from, to, link_type)
            },
        };
        self.link_batch(std::slice::from_ref(&edge)).await
    }

    /// Merge-create many edges in one round trip.
    async fn link_batch(&self, edges: &[GraphEdge]) -> Result<(), KnowledgeError>;

    async fn get_node(&self, node_id: &str) -> Result<Option<CodeNode>, KnowledgeError>;

    /// Nodes for the given ids, in no particular order. Unknown ids are ignored.
    async fn get_nodes(&self, node_ids: &[String]) -> Result<Vec<CodeNode>, KnowledgeError>;

    /// Every node of a project, ordered by file path, start line, then id.
    async fn nodes_by_project(&self, project: &str) -> Result<Vec<CodeNode>, KnowledgeError>;

    /// Nodes named exactly `name`, or whose id ends in `:<name>`.
    async fn find_nodes_by_name(
        &self,
        name: &str,
        project: &str,
        limit: usize,
    ) -> Result<Vec<CodeNode>, KnowledgeError>;

    /// Nodes whose `symbols_defined` contains `symbol`.
    async fn resolve_symbol(
        &self,
        symbol: &str,
        project: &str,
        limit: usize,
    ) -> Result<Vec<CodeNode>, KnowledgeError>;

    /// Ids one hop away from any of `node_ids` over the selected edges.
    async fn neighbors(
        &self,
        node_ids: &[String],
        selector: EdgeSelector,
        direction: Direction,
    ) -> Result<Vec<String>, KnowledgeError>;

    /// SEMANTIC_LINK edges leaving `node_id`.
    async fn links_from(&self, node_id: &str) -> Result<Vec<StoredLink>, KnowledgeError>;

    async fn stats(&self) -> Result<GraphStats, KnowledgeError>;

    async fn project_stats(&self, project: &str) -> Result<ProjectStats, KnowledgeError>;
}
