//! Concurrent, hash-gated ingestion over tree-sitter extraction.

use async_trait::async_trait;
use ignore::WalkBuilder;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::{Indexer, Reconciler};
use crate::classifier::LanguageClassifier;
use crate::config::IngestionConfig;
use crate::knowledge::error::KnowledgeError;
use crate::knowledge::hash::content_hash;
use crate::knowledge::models::{CodeNode, EdgeType, FileError, IngestReport};
use crate::knowledge::parser::ParserRegistry;
use crate::knowledge::store::GraphStore;
use crate::summarizer::Summarizer;

/// What one file contributed to a run.
#[derive(Default)]
struct FileOutcome {
    report: IngestReport,
    seen: Vec<String>,
}

/// Indexer that parses files, summarizes changed entities and writes them
/// to a [`GraphStore`].
///
/// Cloning is cheap; every worker task holds its own clone.
#[derive(Clone)]
pub struct GraphIndexer {
    store: Arc<dyn GraphStore>,
    summarizer: Arc<dyn Summarizer>,
    classifier: Arc<dyn LanguageClassifier>,
    registry: Arc<ParserRegistry>,
    config: IngestionConfig,
    reconciler: Option<Arc<dyn Reconciler>>,
}

impl GraphIndexer {
    /// Create an indexer with the built-in parsers.
    pub fn new(
        store: Arc<dyn GraphStore>,
        summarizer: Arc<dyn Summarizer>,
        classifier: Arc<dyn LanguageClassifier>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            store,
            summarizer,
            classifier,
            registry: Arc::new(ParserRegistry::new()),
            config,
            reconciler: None,
        }
    }

    /// Attach a hook that runs after every `ingest_codebase`.
    pub fn with_reconciler(mut self, reconciler: Arc<dyn Reconciler>) -> Self {
        self.reconciler = Some(reconciler);
        self
    }

    /// Worker count used when the caller does not pass one.
    pub fn default_workers(&self) -> usize {
        self.config.max_workers
    }

    /// Check if file extension is in the allowed list.
    fn should_ingest(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.config.include_extensions.iter().any(|e| e.to_lowercase() == ext)
            })
            .unwrap_or(false)
    }

    /// Eligible files under `root`, sorted by path.
    ///
    /// Only `exclude_dirs`, the extension list and the size cap apply unless
    /// `skip_hidden` or `respect_gitignore` is set.
    fn discover_files(&self, root: &Path) -> Vec<PathBuf> {
        let exclude: HashSet<String> = self.config.exclude_dirs.iter().cloned().collect();

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(self.config.skip_hidden)
            .git_ignore(self.config.respect_gitignore)
            .parents(self.config.respect_gitignore)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                let excluded = entry
                    .file_name()
                    .to_str()
                    .map(|name| exclude.contains(name))
                    .unwrap_or(false);
                entry.depth() == 0 || !(is_dir && excluded)
            })
            .build();

        let mut files = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable path");
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) || !self.should_ingest(path) {
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if size > self.config.max_file_size {
                tracing::debug!(file = %path.display(), size, "file too large, skipping");
                continue;
            }

            files.push(path.to_path_buf());
        }

        files
    }

    /// Run the full per-file pipeline for one file.
    async fn process_file(&self, path: &Path, project: &str) -> Result<FileOutcome, KnowledgeError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| KnowledgeError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let file_path = path.to_string_lossy().into_owned();

        let language = match self.registry.language_for_path(path) {
            Some(language) => language.to_string(),
            None => self.classifier.predict(&content),
        };

        // Parsing is CPU bound, keep it off the async workers
        let registry = Arc::clone(&self.registry);
        let (extraction, content) = {
            let language = language.clone();
            let file_path = file_path.clone();
            tokio::task::spawn_blocking(move || {
                let extraction = registry.extract(&language, &content, &file_path);
                (extraction, content)
            })
            .await?
        };

        let mut outcome = FileOutcome::default();
        if extraction.is_empty() {
            tracing::debug!(file = %file_path, language = %language, "no entities, skipping file");
            outcome.report.files_skipped = 1;
            return Ok(outcome);
        }

        let file_node = CodeNode::file(project, &file_path, &language, &content);
        let file_id = file_node.node_id.clone();
        self.store.upsert_node(&file_node).await?;
        self.store
            .link_project(project, &file_id, reason("project_root"))
            .await?;
        outcome.seen.push(file_id.clone());

        let mut symbols_used = extraction.symbols_used();

        for node in &extraction.nodes {
            outcome.seen.push(node.node_id.clone());

            let hash = content_hash(&node.code);
            if let Some(existing) = self.store.get_node(&node.node_id).await? {
                if existing.node_hash.as_deref() == Some(hash.as_str()) {
                    outcome.report.nodes_unchanged += 1;
                    continue;
                }
            }

            let summary = self
                .summarizer
                .summarize(&node.summary_input(self.config.max_summary_lines))
                .await;

            let code_node = CodeNode {
                node_id: node.node_id.clone(),
                node_kind: node.kind,
                node_name: node.name.clone(),
                language: language.clone(),
                file_path: file_path.clone(),
                project: project.to_string(),
                start_line: node.start_line,
                end_line: node.end_line,
                summary,
                symbols_defined: extraction
                    .defined_symbols
                    .get(&node.node_id)
                    .cloned()
                    .unwrap_or_default(),
                symbols_used: symbols_used.remove(&node.node_id).unwrap_or_default(),
                node_hash: Some(hash),
            };
            self.store.upsert_node(&code_node).await?;

            let (parent, why) = match &node.parent_id {
                Some(parent) => (parent.as_str(), "ast_structure"),
                None => (file_id.as_str(), "file_structure"),
            };
            self.store
                .link(parent, &node.node_id, EdgeType::Contains, reason(why))
                .await?;

            outcome.report.nodes_written += 1;
        }

        tracing::debug!(
            file = %file_path,
            written = outcome.report.nodes_written,
            unchanged = outcome.report.nodes_unchanged,
            "file ingested"
        );
        outcome.report.files_ingested = 1;
        Ok(outcome)
    }
}

fn reason(why: &str) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("reason".to_string(), Value::String(why.to_string()));
    props
}

#[async_trait]
impl Indexer for GraphIndexer {
    async fn ingest_codebase(
        &self,
        root: &Path,
        project: &str,
        max_workers: usize,
    ) -> Result<IngestReport, KnowledgeError> {
        self.store.upsert_project(project).await?;

        let files = self.discover_files(root);
        let mut report = IngestReport {
            files_discovered: files.len(),
            ..Default::default()
        };
        tracing::info!(project = %project, root = %root.display(), files = files.len(), "ingesting codebase");

        let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
        let mut handles = Vec::with_capacity(files.len());

        for path in files {
            let indexer = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let project = project.to_string();
            let task_path = path.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| KnowledgeError::Task(e.to_string()))?;
                indexer.process_file(&task_path, &project).await
            });
            handles.push((path, handle));
        }

        let mut seen = HashSet::new();
        for (path, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(KnowledgeError::from(e)),
            };

            match result {
                Ok(outcome) => {
                    seen.extend(outcome.seen);
                    report.absorb(outcome.report);
                }
                Err(e) => {
                    tracing::error!(file = %path.display(), error = %e, "failed to ingest file");
                    report.errors.push(FileError {
                        path: path.to_string_lossy().into_owned(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if let Some(reconciler) = &self.reconciler {
            reconciler.reconcile(project, &seen).await?;
        }

        tracing::info!(
            project = %project,
            ingested = report.files_ingested,
            skipped = report.files_skipped,
            written = report.nodes_written,
            unchanged = report.nodes_unchanged,
            errors = report.errors.len(),
            "ingestion finished"
        );

        Ok(report)
    }

    async fn ingest_file(&self, path: &Path, project: &str) -> Result<IngestReport, KnowledgeError> {
        self.store.upsert_project(project).await?;
        let outcome = self.process_file(path, project).await?;

        let mut report = IngestReport {
            files_discovered: 1,
            ..Default::default()
        };
        report.absorb(outcome.report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::HeuristicClassifier;
    use crate::summarizer::PlaceholderSummarizer;
    use crate::knowledge::db::KnowledgeDb;
    use std::fs;
    use tempfile::TempDir;

    async fn indexer(config: IngestionConfig) -> GraphIndexer {
        let db = KnowledgeDb::in_memory().await.unwrap();
        db.initialize_schema().await.unwrap();
        GraphIndexer::new(
            Arc::new(db),
            Arc::new(PlaceholderSummarizer),
            Arc::new(HeuristicClassifier::new()),
            config,
        )
    }

    #[tokio::test]
    async fn test_discovery_respects_filters() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("src/b.py"), "def b():\n    pass\n").unwrap();
        fs::write(dir.path().join("src/a.py"), "def a():\n    pass\n").unwrap();
        fs::write(dir.path().join("src/notes.md"), "# notes").unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "function x() {}").unwrap();
        fs::write(dir.path().join(".hidden.py"), "def h():\n    pass\n").unwrap();

        let indexer = indexer(IngestionConfig::default()).await;
        let files = indexer.discover_files(dir.path());

        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["src/a.py", "src/b.py"]);
    }

    #[tokio::test]
    async fn test_hidden_and_ignored_files_when_filters_off() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".github/scripts")).unwrap();
        fs::write(dir.path().join(".github/scripts/release.py"), "def release():\n    pass\n").unwrap();
        fs::write(dir.path().join(".gitignore"), "generated.py\n").unwrap();
        fs::write(dir.path().join("generated.py"), "def gen():\n    pass\n").unwrap();
        fs::write(dir.path().join("main.py"), "def main():\n    pass\n").unwrap();

        let relative = |files: Vec<PathBuf>| -> Vec<String> {
            files
                .iter()
                .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
                .collect()
        };

        let filtered = indexer(IngestionConfig::default()).await;
        assert_eq!(relative(filtered.discover_files(dir.path())), vec!["main.py"]);

        let unfiltered = indexer(IngestionConfig {
            skip_hidden: false,
            respect_gitignore: false,
            ..Default::default()
        })
        .await;
        assert_eq!(
            relative(unfiltered.discover_files(dir.path())),
            vec![".github/scripts/release.py", "generated.py", "main.py"]
        );
    }

    #[tokio::test]
    async fn test_large_files_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("big.py"), "x = 1\n".repeat(100)).unwrap();
        fs::write(dir.path().join("small.py"), "def f():\n    pass\n").unwrap();

        let config = IngestionConfig {
            max_file_size: 64,
            ..Default::default()
        };
        let indexer = indexer(config).await;
        let files = indexer.discover_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("small.py"));
    }

    #[tokio::test]
    async fn test_ingest_file_writes_entities() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc.py");
        fs::write(&path, "class Service:\n    def run(self):\n        return 1\n").unwrap();

        let indexer = indexer(IngestionConfig::default()).await;
        let report = indexer.ingest_file(&path, "demo").await.unwrap();
        assert_eq!(report.files_ingested, 1);
        assert_eq!(report.nodes_written, 2);

        let stats = indexer.store.project_stats("demo").await.unwrap();
        assert_eq!(stats.files, 1);
        assert_eq!(stats.code_nodes, 2);
    }

    #[tokio::test]
    async fn test_empty_module_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("consts.py");
        fs::write(&path, "LIMIT = 10\n").unwrap();

        let indexer = indexer(IngestionConfig::default()).await;
        let report = indexer.ingest_file(&path, "demo").await.unwrap();
        assert_eq!(report.files_skipped, 1);
        assert_eq!(indexer.store.project_stats("demo").await.unwrap().files, 0);
    }
}
