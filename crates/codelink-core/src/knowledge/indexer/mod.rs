//! Ingestion of source trees into the code graph.

mod ingest;

pub use ingest::GraphIndexer;

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;

use super::error::KnowledgeError;
use super::models::IngestReport;

/// Trait for ingesting code into the knowledge graph.
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Ingest every eligible file under `root` into `project`.
    ///
    /// Per-file failures are recorded in the report, not returned.
    async fn ingest_codebase(
        &self,
        root: &Path,
        project: &str,
        max_workers: usize,
    ) -> Result<IngestReport, KnowledgeError>;

    /// Ingest a single file into `project`.
    async fn ingest_file(&self, path: &Path, project: &str) -> Result<IngestReport, KnowledgeError>;
}

/// Called once after an ingestion run with every node id the run observed.
///
/// Implementations decide what to do with stored nodes that were not seen.
#[async_trait]
pub trait Reconciler: Send + Sync {
    async fn reconcile(&self, project: &str, seen: &HashSet<String>) -> Result<(), KnowledgeError>;
}
