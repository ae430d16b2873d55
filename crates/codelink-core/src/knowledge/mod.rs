//! Code graph: structural extraction, semantic linking and traversal.
//!
//! This module builds a queryable index of a codebase with:
//! - **Structural extraction** via tree-sitter (files, classes, functions, ...)
//! - **Incremental ingestion** gated by content hashes
//! - **Semantic links** (CALLS, USES, IMPLEMENTS, OVERRIDES) resolved by name
//! - **Bounded traversal** over those links
//!
//! # Components
//!
//! - [`KnowledgeGraph`] - Main facade wiring the components to one store
//! - [`KnowledgeDb`] - SurrealDB embedded database implementing [`GraphStore`]
//! - [`indexer::GraphIndexer`] - Concurrent per-file ingestion
//! - [`linker::SemanticLinker`] - Whole-project symbol resolution
//! - [`traversal::TraversalEngine`] - Breadth-first relationship queries
//!
//! # Storage
//!
//! Uses SurrealDB embedded with RocksDB persistence. Stores:
//! - **Nodes**: Project, and CodeNode entities of every kind
//! - **Edges**: CONTAINS (structure) and SEMANTIC_LINK (derived) records
//!
//! # Example
//!
//! ```ignore
//! use codelink_core::{Config, KnowledgeGraph};
//!
//! let config = Config::load()?;
//! let kg = KnowledgeGraph::open(&config).await?;
//! kg.initialize().await?;
//! kg.ingest_codebase_default(Path::new("."), "demo").await?;
//! kg.link_project("demo").await?;
//!
//! let callers = kg.traverse("src/db.py:save:12", "called_by", 2).await?;
//! ```

mod db;
mod error;
pub mod hash;
pub mod indexer;
pub mod linker;
pub mod models;
pub mod parser;
mod store;
pub mod traversal;

pub use db::KnowledgeDb;
pub use error::KnowledgeError;
pub use indexer::{GraphIndexer, Indexer, Reconciler};
pub use linker::SemanticLinker;
pub use models::{
    CodeNode, EdgeType, GraphEdge, GraphStats, IngestReport, LinkReport, LinkType, NodeKind,
    ProjectStats, StoredLink,
};
pub use store::GraphStore;
pub use traversal::{Operation, TraversalEngine};

use std::path::Path;
use std::sync::Arc;

use crate::classifier::{HeuristicClassifier, LanguageClassifier};
use crate::config::{Config, IngestionConfig};
use crate::summarizer::{self, Summarizer};

/// The main knowledge graph implementation.
pub struct KnowledgeGraph {
    store: Arc<dyn GraphStore>,
    indexer: GraphIndexer,
    linker: SemanticLinker,
    traversal: TraversalEngine,
}

impl KnowledgeGraph {
    /// Open the on-disk graph described by `config`.
    pub async fn open(config: &Config) -> Result<Self, KnowledgeError> {
        config.validate()?;

        let db = KnowledgeDb::open_with_config(&config.graph).await?;
        let summarizer: Arc<dyn Summarizer> = Arc::from(summarizer::from_config(&config.llm)?);

        Ok(Self::with_components(
            Arc::new(db),
            summarizer,
            Arc::new(HeuristicClassifier::new()),
            config.ingestion.clone(),
        ))
    }

    /// Assemble a graph from explicit collaborators.
    pub fn with_components(
        store: Arc<dyn GraphStore>,
        summarizer: Arc<dyn Summarizer>,
        classifier: Arc<dyn LanguageClassifier>,
        ingestion: IngestionConfig,
    ) -> Self {
        Self {
            indexer: GraphIndexer::new(Arc::clone(&store), summarizer, classifier, ingestion),
            linker: SemanticLinker::new(Arc::clone(&store)),
            traversal: TraversalEngine::new(Arc::clone(&store)),
            store,
        }
    }

    /// Run `reconciler` after every codebase ingestion.
    pub fn with_reconciler(mut self, reconciler: Arc<dyn Reconciler>) -> Self {
        self.indexer = self.indexer.with_reconciler(reconciler);
        self
    }

    /// Initialize the store (create tables, indexes).
    pub async fn initialize(&self) -> Result<(), KnowledgeError> {
        self.store.initialize_schema().await
    }

    /// Ingest a directory tree into `project`.
    pub async fn ingest_codebase(
        &self,
        root: &Path,
        project: &str,
        max_workers: usize,
    ) -> Result<IngestReport, KnowledgeError> {
        self.indexer.ingest_codebase(root, project, max_workers).await
    }

    /// Ingest a directory tree with the configured `ingestion.max_workers`.
    pub async fn ingest_codebase_default(
        &self,
        root: &Path,
        project: &str,
    ) -> Result<IngestReport, KnowledgeError> {
        let workers = self.indexer.default_workers();
        self.indexer.ingest_codebase(root, project, workers).await
    }

    /// Ingest a single file into `project`.
    pub async fn ingest_file(&self, path: &Path, project: &str) -> Result<IngestReport, KnowledgeError> {
        self.indexer.ingest_file(path, project).await
    }

    /// Resolve semantic links for an ingested project.
    pub async fn link_project(&self, project: &str) -> Result<LinkReport, KnowledgeError> {
        if !self.store.project_exists(project).await? {
            return Err(KnowledgeError::ProjectNotFound(project.to_string()));
        }
        self.linker.run(project).await
    }

    /// Nodes reachable from `node_id` by `operation` within `max_depth` hops.
    ///
    /// `operation` is one of `structure`, `calls`, `called_by`, `uses`,
    /// `dependencies`.
    pub async fn traverse(
        &self,
        node_id: &str,
        operation: &str,
        max_depth: usize,
    ) -> Result<Vec<CodeNode>, KnowledgeError> {
        let operation: Operation = operation.parse()?;
        self.traversal.traverse(node_id, operation, max_depth).await
    }

    pub async fn find_nodes_by_name(
        &self,
        name: &str,
        project: &str,
        limit: usize,
    ) -> Result<Vec<CodeNode>, KnowledgeError> {
        self.store.find_nodes_by_name(name, project, limit).await
    }

    pub async fn resolve_symbol(
        &self,
        symbol: &str,
        project: &str,
        limit: usize,
    ) -> Result<Vec<CodeNode>, KnowledgeError> {
        self.store.resolve_symbol(symbol, project, limit).await
    }

    /// Fetch one node by id.
    pub async fn get_node(&self, node_id: &str) -> Result<CodeNode, KnowledgeError> {
        self.store
            .get_node(node_id)
            .await?
            .ok_or_else(|| KnowledgeError::EntityNotFound(node_id.to_string()))
    }

    /// Derived links leaving `node_id`.
    pub async fn links_from(&self, node_id: &str) -> Result<Vec<StoredLink>, KnowledgeError> {
        self.store.links_from(node_id).await
    }

    pub async fn project_stats(&self, project: &str) -> Result<ProjectStats, KnowledgeError> {
        if !self.store.project_exists(project).await? {
            return Err(KnowledgeError::ProjectNotFound(project.to_string()));
        }
        self.store.project_stats(project).await
    }

    pub async fn list_projects(&self) -> Result<Vec<String>, KnowledgeError> {
        self.store.list_projects().await
    }

    pub async fn stats(&self) -> Result<GraphStats, KnowledgeError> {
        self.store.stats().await
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    /// Release the store. Other clones of the store handle stay usable.
    pub fn close(self) {
        tracing::debug!("closing knowledge graph");
        drop(self);
    }
}
