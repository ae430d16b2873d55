//! Run reports and graph statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::LinkType;

/// A file that could not be ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileError {
    pub path: String,
    pub message: String,
}

/// Outcome of one `ingest_codebase` run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    /// Files selected by the extension allow-list.
    pub files_discovered: usize,
    /// Files whose entities were processed.
    pub files_ingested: usize,
    /// Files with no extractable entities.
    pub files_skipped: usize,
    /// Entities summarized and written.
    pub nodes_written: usize,
    /// Entities whose hash matched the stored one.
    pub nodes_unchanged: usize,
    pub errors: Vec<FileError>,
}

impl IngestReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Fold one file's counters into the run totals.
    pub(crate) fn absorb(&mut self, other: IngestReport) {
        self.files_ingested += other.files_ingested;
        self.files_skipped += other.files_skipped;
        self.nodes_written += other.nodes_written;
        self.nodes_unchanged += other.nodes_unchanged;
        self.errors.extend(other.errors);
    }
}

/// Outcome of one linker pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkReport {
    pub nodes_scanned: usize,
    /// Distinct normalized names in the symbol index.
    pub symbols_indexed: usize,
    pub links_written: usize,
    pub by_type: BTreeMap<LinkType, usize>,
}

/// Whole-store counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub projects: usize,
    pub files: usize,
    pub code_nodes: usize,
    pub contains_edges: usize,
    pub semantic_links: usize,
}

/// Per-project counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub name: String,
    pub files: usize,
    pub code_nodes: usize,
}
