//! SurrealDB embedded database for the code graph.
//!
//! Nodes live in `code_node` keyed by `node_id`. Edges are plain records whose
//! record id is derived from their endpoints, so an UPSERT on the same
//! endpoints merges instead of duplicating:
//!
//! - `contains_edge:[from_table, from_id, to_id]`
//! - `semantic_link:[from_id, to_id, link_type]`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;

use super::error::KnowledgeError;
use super::linker::normalize_symbol;
use super::models::{
    CodeNode, Direction, EdgeSelector, EdgeType, GraphEdge, GraphStats, LinkType, ProjectStats,
    StoredLink,
};
use super::store::GraphStore;
use crate::config::{GraphConfig, DEFAULT_DATABASE, DEFAULT_NAMESPACE};

/// Columns selected whenever a [`CodeNode`] is read back.
const NODE_FIELDS: &str = "node_id, node_kind, node_name, language, file_path, project, \
     start_line, end_line, summary, symbols_defined, symbols_used, node_hash";

/// Database connection for the code graph.
///
/// The handle is cheap to clone and safe to share between tasks.
#[derive(Clone)]
pub struct KnowledgeDb {
    db: Surreal<Db>,
}

#[derive(Debug, Serialize)]
struct ContainsRow {
    from_table: String,
    from_id: String,
    to_id: String,
    props: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct LinkRow {
    from_id: String,
    to_id: String,
    link_type: LinkType,
    confidence: f64,
    source: String,
    created_at: String,
    props: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct CountResult {
    count: i64,
}

impl KnowledgeDb {
    /// Open or create a RocksDB-backed database at the given path.
    pub async fn open(path: &Path) -> Result<Self, KnowledgeError> {
        Self::open_in(path, DEFAULT_NAMESPACE, DEFAULT_DATABASE).await
    }

    /// Open the database described by a [`GraphConfig`], creating its directory.
    pub async fn open_with_config(config: &GraphConfig) -> Result<Self, KnowledgeError> {
        let path = config.db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| KnowledgeError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Self::open_in(&path, &config.namespace, &config.database).await
    }

    async fn open_in(path: &Path, namespace: &str, database: &str) -> Result<Self, KnowledgeError> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns(namespace).use_db(database).await?;
        tracing::debug!(path = %path.display(), "opened graph store");
        Ok(Self { db })
    }

    /// Open a throwaway in-memory database.
    pub async fn in_memory() -> Result<Self, KnowledgeError> {
        let db = Surreal::new::<Mem>(()).await?;
        db.use_ns(DEFAULT_NAMESPACE).use_db(DEFAULT_DATABASE).await?;
        Ok(Self { db })
    }

    async fn count(&self, query: &str, project: Option<&str>) -> Result<usize, KnowledgeError> {
        let mut request = self.db.query(query);
        if let Some(p) = project {
            request = request.bind(("project", p.to_string()));
        }
        let result: Option<CountResult> = request.await?.check()?.take(0)?;
        Ok(result.map(|r| r.count as usize).unwrap_or(0))
    }

    async fn select_nodes(
        &self,
        condition: &str,
        binds: Vec<(&'static str, Value)>,
    ) -> Result<Vec<CodeNode>, KnowledgeError> {
        let query = format!("SELECT {} FROM code_node WHERE {}", NODE_FIELDS, condition);
        let mut request = self.db.query(query);
        for bind in binds {
            request = request.bind(bind);
        }
        let nodes: Vec<CodeNode> = request.await?.check()?.take(0)?;
        Ok(nodes)
    }
}

#[async_trait]
impl GraphStore for KnowledgeDb {
    async fn initialize_schema(&self) -> Result<(), KnowledgeError> {
        // Projects
        self.db
            .query(
                r#"
                DEFINE TABLE IF NOT EXISTS project SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS project_name ON project FIELDS name UNIQUE;
                "#,
            )
            .await?
            .check()?;

        // Code nodes
        self.db
            .query(
                r#"
                DEFINE TABLE IF NOT EXISTS code_node SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS code_node_id ON code_node FIELDS node_id UNIQUE;
                DEFINE INDEX IF NOT EXISTS code_node_name ON code_node FIELDS node_name;
                DEFINE INDEX IF NOT EXISTS code_node_project ON code_node FIELDS project;
                DEFINE INDEX IF NOT EXISTS code_node_symbols ON code_node FIELDS symbols_defined;
                "#,
            )
            .await?
            .check()?;

        // Structural edges
        self.db
            .query(
                r#"
                DEFINE TABLE IF NOT EXISTS contains_edge SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS contains_from ON contains_edge FIELDS from_id;
                DEFINE INDEX IF NOT EXISTS contains_to ON contains_edge FIELDS to_id;
                "#,
            )
            .await?
            .check()?;

        // Derived edges
        self.db
            .query(
                r#"
                DEFINE TABLE IF NOT EXISTS semantic_link SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS semantic_link_from ON semantic_link FIELDS from_id;
                DEFINE INDEX IF NOT EXISTS semantic_link_to ON semantic_link FIELDS to_id;
                DEFINE INDEX IF NOT EXISTS semantic_link_type ON semantic_link FIELDS link_type;
                "#,
            )
            .await?
            .check()?;

        Ok(())
    }

    async fn upsert_project(&self, name: &str) -> Result<(), KnowledgeError> {
        self.db
            .query("UPSERT type::thing('project', $name) MERGE { name: $name, updated_at: $now } RETURN NONE")
            .bind(("name", name.to_string()))
            .bind(("now", chrono::Utc::now().to_rfc3339()))
            .await?
            .check()?;
        Ok(())
    }

    async fn project_exists(&self, name: &str) -> Result<bool, KnowledgeError> {
        let names: Vec<String> = self
            .db
            .query("SELECT VALUE name FROM project WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?
            .check()?
            .take(0)?;
        Ok(!names.is_empty())
    }

    async fn list_projects(&self) -> Result<Vec<String>, KnowledgeError> {
        let mut names: Vec<String> = self
            .db
            .query("SELECT VALUE name FROM project")
            .await?
            .check()?
            .take(0)?;
        names.sort();
        Ok(names)
    }

    async fn upsert_node(&self, node: &CodeNode) -> Result<(), KnowledgeError> {
        self.db
            .query("UPSERT type::thing('code_node', $id) MERGE $data RETURN NONE")
            .bind(("id", node.node_id.clone()))
            .bind(("data", node.clone()))
            .await?
            .check()?;
        Ok(())
    }

    async fn link_project(
        &self,
        project: &str,
        file_id: &str,
        props: Map<String, Value>,
    ) -> Result<(), KnowledgeError> {
        let row = ContainsRow {
            from_table: "project".to_string(),
            from_id: project.to_string(),
            to_id: file_id.to_string(),
            props,
        };
        self.db
            .query("UPSERT type::thing('contains_edge', ['project', $from, $to]) MERGE $data RETURN NONE")
            .bind(("from", project.to_string()))
            .bind(("to", file_id.to_string()))
            .bind(("data", row))
            .await?
            .check()?;
        Ok(())
    }

    async fn link_batch(&self, edges: &[GraphEdge]) -> Result<(), KnowledgeError> {
        if edges.is_empty() {
            return Ok(());
        }

        let created_at = chrono::Utc::now().to_rfc3339();
        let mut contains = Vec::new();
        let mut links = Vec::new();

        for edge in edges {
            match edge.edge_type {
                EdgeType::Contains => contains.push(ContainsRow {
                    from_table: "code_node".to_string(),
                    from_id: edge.from.clone(),
                    to_id: edge.to.clone(),
                    props: edge.props.clone(),
                }),
                EdgeType::SemanticLink(link_type) => links.push(LinkRow {
                    from_id: edge.from.clone(),
                    to_id: edge.to.clone(),
                    link_type,
                    confidence: edge.confidence.unwrap_or_else(|| link_type.confidence()),
                    source: edge.source.clone().unwrap_or_default(),
                    created_at: created_at.clone(),
                    props: edge.props.clone(),
                }),
            }
        }

        self.db
            .query(
                r#"
                FOR $edge IN $contains {
                    UPSERT type::thing('contains_edge', ['code_node', $edge.from_id, $edge.to_id]) MERGE $edge;
                };
                FOR $edge IN $links {
                    UPSERT type::thing('semantic_link', [$edge.from_id, $edge.to_id, $edge.link_type]) MERGE $edge;
                };
                "#,
            )
            .bind(("contains", contains))
            .bind(("links", links))
            .await?
            .check()?;

        Ok(())
    }

    async fn get_node(&self, node_id: &str) -> Result<Option<CodeNode>, KnowledgeError> {
        let mut nodes = self
            .select_nodes(
                "node_id = $id LIMIT 1",
                vec![("id", Value::String(node_id.to_string()))],
            )
            .await?;
        Ok(nodes.pop())
    }

    async fn get_nodes(&self, node_ids: &[String]) -> Result<Vec<CodeNode>, KnowledgeError> {
        if node_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = node_ids.iter().cloned().map(Value::String).collect();
        self.select_nodes("node_id IN $ids", vec![("ids", Value::Array(ids))])
            .await
    }

    async fn nodes_by_project(&self, project: &str) -> Result<Vec<CodeNode>, KnowledgeError> {
        let mut nodes = self
            .select_nodes(
                "project = $project",
                vec![("project", Value::String(project.to_string()))],
            )
            .await?;
        nodes.sort_by(|a, b| {
            (a.file_path.as_str(), a.start_line, a.node_id.as_str())
                .cmp(&(b.file_path.as_str(), b.start_line, b.node_id.as_str()))
        });
        Ok(nodes)
    }

    async fn find_nodes_by_name(
        &self,
        name: &str,
        project: &str,
        limit: usize,
    ) -> Result<Vec<CodeNode>, KnowledgeError> {
        // LIMIT must be a literal, format it directly
        let condition = format!(
            "project = $project AND (node_name = $name OR string::ends_with(node_id, $suffix)) \
             ORDER BY file_path, start_line LIMIT {}",
            limit
        );
        self.select_nodes(
            &condition,
            vec![
                ("project", Value::String(project.to_string())),
                ("name", Value::String(name.to_string())),
                ("suffix", Value::String(format!(":{}", name))),
            ],
        )
        .await
    }

    async fn resolve_symbol(
        &self,
        symbol: &str,
        project: &str,
        limit: usize,
    ) -> Result<Vec<CodeNode>, KnowledgeError> {
        let condition = format!(
            "project = $project AND symbols_defined CONTAINS $symbol \
             ORDER BY file_path, start_line LIMIT {}",
            limit
        );
        self.select_nodes(
            &condition,
            vec![
                ("project", Value::String(project.to_string())),
                ("symbol", Value::String(normalize_symbol(symbol).to_string())),
            ],
        )
        .await
    }

    async fn neighbors(
        &self,
        node_ids: &[String],
        selector: EdgeSelector,
        direction: Direction,
    ) -> Result<Vec<String>, KnowledgeError> {
        if node_ids.is_empty() {
            return Ok(Vec::new());
        }

        let (select, match_on) = match direction {
            Direction::Forward => ("to_id", "from_id"),
            Direction::Reverse => ("from_id", "to_id"),
        };

        let mut ids: Vec<String> = match selector {
            EdgeSelector::Contains => {
                let query = format!(
                    "SELECT VALUE {} FROM contains_edge WHERE from_table = 'code_node' AND {} IN $ids",
                    select, match_on
                );
                self.db
                    .query(query)
                    .bind(("ids", node_ids.to_vec()))
                    .await?
                    .check()?
                    .take(0)?
            }
            EdgeSelector::Links(types) => {
                let query = format!(
                    "SELECT VALUE {} FROM semantic_link WHERE {} IN $ids AND link_type IN $types",
                    select, match_on
                );
                self.db
                    .query(query)
                    .bind(("ids", node_ids.to_vec()))
                    .bind(("types", types.to_vec()))
                    .await?
                    .check()?
                    .take(0)?
            }
        };

        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn links_from(&self, node_id: &str) -> Result<Vec<StoredLink>, KnowledgeError> {
        let mut links: Vec<StoredLink> = self
            .db
            .query(
                "SELECT from_id, to_id, link_type, confidence, source, created_at \
                 FROM semantic_link WHERE from_id = $id",
            )
            .bind(("id", node_id.to_string()))
            .await?
            .check()?
            .take(0)?;
        links.sort_by(|a, b| (a.link_type, &a.to_id).cmp(&(b.link_type, &b.to_id)));
        Ok(links)
    }

    async fn stats(&self) -> Result<GraphStats, KnowledgeError> {
        Ok(GraphStats {
            projects: self.count("SELECT count() FROM project GROUP ALL", None).await?,
            files: self
                .count("SELECT count() FROM code_node WHERE node_kind = 'file' GROUP ALL", None)
                .await?,
            code_nodes: self
                .count("SELECT count() FROM code_node WHERE node_kind != 'file' GROUP ALL", None)
                .await?,
            contains_edges: self.count("SELECT count() FROM contains_edge GROUP ALL", None).await?,
            semantic_links: self.count("SELECT count() FROM semantic_link GROUP ALL", None).await?,
        })
    }

    async fn project_stats(&self, project: &str) -> Result<ProjectStats, KnowledgeError> {
        Ok(ProjectStats {
            name: project.to_string(),
            files: self
                .count(
                    "SELECT count() FROM code_node WHERE project = $project AND node_kind = 'file' GROUP ALL",
                    Some(project),
                )
                .await?,
            code_nodes: self
                .count(
                    "SELECT count() FROM code_node WHERE project = $project AND node_kind != 'file' GROUP ALL",
                    Some(project),
                )
                .await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::models::NodeKind;

    fn function(id_line: u32, name: &str, file: &str) -> CodeNode {
        CodeNode {
            node_id: CodeNode::make_id(file, name, id_line),
            node_kind: NodeKind::Function,
            node_name: name.to_string(),
            language: "python".to_string(),
            file_path: file.to_string(),
            project: "demo".to_string(),
            start_line: id_line,
            end_line: id_line + 1,
            summary: "does things".to_string(),
            symbols_defined: vec![name.to_string()],
            symbols_used: Vec::new(),
            node_hash: Some("h1".to_string()),
        }
    }

    async fn store() -> KnowledgeDb {
        let db = KnowledgeDb::in_memory().await.unwrap();
        db.initialize_schema().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_schema_bootstrap_is_idempotent() {
        let db = store().await;
        db.initialize_schema().await.unwrap();
        assert_eq!(db.stats().await.unwrap(), GraphStats::default());
    }

    #[tokio::test]
    async fn test_upsert_preserves_hash_when_absent() {
        let db = store().await;
        let node = function(1, "foo", "a.py");
        db.upsert_node(&node).await.unwrap();

        let mut update = node.clone();
        update.summary = "new summary".to_string();
        update.node_hash = None;
        db.upsert_node(&update).await.unwrap();

        let stored = db.get_node(&node.node_id).await.unwrap().unwrap();
        assert_eq!(stored.summary, "new summary");
        assert_eq!(stored.node_hash.as_deref(), Some("h1"));
        assert_eq!(db.stats().await.unwrap().code_nodes, 1);
    }

    #[tokio::test]
    async fn test_link_merges_duplicates() {
        let db = store().await;
        db.upsert_node(&function(1, "foo", "a.py")).await.unwrap();
        db.upsert_node(&function(1, "bar", "b.py")).await.unwrap();

        let edge = GraphEdge::semantic("b.py:bar:1", "a.py:foo:1", LinkType::Calls);
        db.link_batch(&[edge.clone(), edge.clone()]).await.unwrap();
        db.link_batch(&[edge]).await.unwrap();

        let links = db.links_from("b.py:bar:1").await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].confidence, 0.6);
        assert_eq!(db.stats().await.unwrap().semantic_links, 1);
    }

    #[tokio::test]
    async fn test_find_by_name_and_suffix() {
        let db = store().await;
        db.upsert_node(&function(3, "foo", "a.py")).await.unwrap();
        db.upsert_node(&function(9, "foobar", "a.py")).await.unwrap();

        let by_name = db.find_nodes_by_name("foo", "demo", 3).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].node_id, "a.py:foo:3");

        let by_suffix = db.find_nodes_by_name("foobar:9", "demo", 3).await.unwrap();
        assert_eq!(by_suffix.len(), 1);

        assert!(db.find_nodes_by_name("foo", "other", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_symbol_normalizes() {
        let db = store().await;
        db.upsert_node(&function(1, "process", "a.py")).await.unwrap();
        let found = db.resolve_symbol("self.process", "demo", 5).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].node_name, "process");
    }

    #[tokio::test]
    async fn test_project_registry() {
        let db = store().await;
        assert!(!db.project_exists("demo").await.unwrap());
        db.upsert_project("demo").await.unwrap();
        db.upsert_project("demo").await.unwrap();
        assert!(db.project_exists("demo").await.unwrap());
        assert_eq!(db.list_projects().await.unwrap(), vec!["demo".to_string()]);
    }
}
