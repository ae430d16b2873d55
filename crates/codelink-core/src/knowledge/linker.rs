//! Semantic linking: turns raw symbol references into typed graph edges.
//!
//! Resolution is purely name based. Every defined symbol of every node in a
//! project is indexed under its normalized name, then each node's used
//! symbols are looked up in that index. When several nodes define the same
//! name, the one declared first (by file path, then line) wins for CALLS and
//! USES; IMPLEMENTS and OVERRIDES link to every match.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::error::KnowledgeError;
use super::models::{CodeNode, EdgeType, GraphEdge, LinkReport, LinkType, NodeKind};
use super::store::GraphStore;

/// Reduce a raw symbol token to the name it is indexed under.
///
/// `self.process`, `Foo.process` and `process` all become `process`.
pub fn normalize_symbol(symbol: &str) -> &str {
    symbol.rsplit('.').next().unwrap_or(symbol).trim()
}

/// Normalized name to defining nodes, in declaration order.
pub struct SymbolIndex<'a> {
    entries: HashMap<&'a str, Vec<&'a CodeNode>>,
}

impl<'a> SymbolIndex<'a> {
    /// Index `nodes`, which must already be in declaration order.
    pub fn build(nodes: &'a [CodeNode]) -> Self {
        let mut entries: HashMap<&'a str, Vec<&'a CodeNode>> = HashMap::new();
        for node in nodes {
            for symbol in &node.symbols_defined {
                let name = normalize_symbol(symbol);
                if !name.is_empty() {
                    entries.entry(name).or_default().push(node);
                }
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidates for a raw symbol token.
    pub fn lookup(&self, symbol: &str) -> &[&'a CodeNode] {
        self.entries
            .get(normalize_symbol(symbol))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Derive every link for a project's nodes.
///
/// Edges are unique by `(from, to, type)`, first occurrence kept, and never
/// point a node at itself.
pub fn resolve_links(nodes: &[CodeNode]) -> Vec<GraphEdge> {
    let index = SymbolIndex::build(nodes);
    resolve_with_index(nodes, &index)
}

fn resolve_with_index(nodes: &[CodeNode], index: &SymbolIndex<'_>) -> Vec<GraphEdge> {
    let mut edges = Vec::new();
    if index.is_empty() {
        return edges;
    }

    // CALLS
    for caller in nodes.iter().filter(|n| n.node_kind.is_callable()) {
        for symbol in &caller.symbols_used {
            let target = index
                .lookup(symbol)
                .iter()
                .find(|c| c.node_kind.is_callable());
            if let Some(target) = target {
                if target.node_id != caller.node_id {
                    edges.push(GraphEdge::semantic(&caller.node_id, &target.node_id, LinkType::Calls));
                }
            }
        }
    }

    // USES
    for user in nodes {
        for symbol in &user.symbols_used {
            let target = index.lookup(symbol).iter().find(|c| c.node_kind.is_usable());
            if let Some(target) = target {
                if target.node_id != user.node_id {
                    edges.push(GraphEdge::semantic(&user.node_id, &target.node_id, LinkType::Uses));
                }
            }
        }
    }

    // IMPLEMENTS
    for class in nodes.iter().filter(|n| n.node_kind == NodeKind::Class) {
        for symbol in &class.symbols_used {
            for target in index.lookup(symbol) {
                if target.node_kind == NodeKind::Interface && target.node_id != class.node_id {
                    edges.push(GraphEdge::semantic(
                        &class.node_id,
                        &target.node_id,
                        LinkType::Implements,
                    ));
                }
            }
        }
    }

    // OVERRIDES
    for method in nodes.iter().filter(|n| n.node_kind == NodeKind::Method) {
        for symbol in &method.symbols_used {
            for target in index.lookup(symbol) {
                if target.node_kind == NodeKind::Method
                    && target.node_name == method.node_name
                    && target.node_id != method.node_id
                {
                    edges.push(GraphEdge::semantic(
                        &method.node_id,
                        &target.node_id,
                        LinkType::Overrides,
                    ));
                }
            }
        }
    }

    dedupe(&edges)
}

fn dedupe(edges: &[GraphEdge]) -> Vec<GraphEdge> {
    let mut seen = HashSet::new();
    edges.iter().filter(|e| seen.insert(e.key())).cloned().collect()
}

/// Whole-project linking pass over a [`GraphStore`].
///
/// Re-running over an unchanged project writes the same edge set again,
/// which the store merges.
pub struct SemanticLinker {
    store: Arc<dyn GraphStore>,
}

impl SemanticLinker {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Link every node of `project`. All edges go to the store in one batch.
    pub async fn run(&self, project: &str) -> Result<LinkReport, KnowledgeError> {
        let nodes = self.store.nodes_by_project(project).await?;
        let index = SymbolIndex::build(&nodes);
        let edges = resolve_with_index(&nodes, &index);

        let mut report = LinkReport {
            nodes_scanned: nodes.len(),
            symbols_indexed: index.len(),
            ..Default::default()
        };

        if edges.is_empty() {
            tracing::info!(project = %project, nodes = nodes.len(), "no links resolved");
            return Ok(report);
        }

        self.store.link_batch(&edges).await?;

        for edge in &edges {
            if let EdgeType::SemanticLink(link_type) = edge.edge_type {
                *report.by_type.entry(link_type).or_default() += 1;
            }
        }
        report.links_written = edges.len();

        tracing::info!(
            project = %project,
            nodes = report.nodes_scanned,
            symbols = report.symbols_indexed,
            links = report.links_written,
            "semantic linking finished"
        );
        Ok(report)
    }
}
