//! Edge types for the code graph.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Provenance tag written on every derived link.
pub const LINKER_SOURCE: &str = "semantic_linker:v1";

/// Type of a derived SEMANTIC_LINK edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkType {
    Calls,
    Uses,
    Implements,
    Overrides,
}

impl LinkType {
    /// Fixed ranking score attached to links of this type.
    pub fn confidence(self) -> f64 {
        match self {
            LinkType::Calls => 0.6,
            LinkType::Uses => 0.5,
            LinkType::Implements => 0.75,
            LinkType::Overrides => 0.8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkType::Calls => "CALLS",
            LinkType::Uses => "USES",
            LinkType::Implements => "IMPLEMENTS",
            LinkType::Overrides => "OVERRIDES",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CALLS" => Ok(LinkType::Calls),
            "USES" => Ok(LinkType::Uses),
            "IMPLEMENTS" => Ok(LinkType::Implements),
            "OVERRIDES" => Ok(LinkType::Overrides),
            other => Err(format!("unknown link type: {}", other)),
        }
    }
}

/// Type of an edge between two code nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeType {
    /// Structural nesting.
    Contains,
    /// Derived relationship.
    SemanticLink(LinkType),
}

/// An edge payload accepted by `GraphStore::link_batch`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub edge_type: EdgeType,
    pub confidence: Option<f64>,
    pub source: Option<String>,
    pub props: Map<String, Value>,
}

impl GraphEdge {
    /// Structural edge with a `reason` property.
    pub fn contains(from: impl Into<String>, to: impl Into<String>, reason: &str) -> Self {
        let mut props = Map::new();
        props.insert("reason".to_string(), Value::String(reason.to_string()));
        Self {
            from: from.into(),
            to: to.into(),
            edge_type: EdgeType::Contains,
            confidence: None,
            source: None,
            props,
        }
    }

    /// Derived link carrying the per-type confidence and linker provenance.
    pub fn semantic(from: impl Into<String>, to: impl Into<String>, link_type: LinkType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            edge_type: EdgeType::SemanticLink(link_type),
            confidence: Some(link_type.confidence()),
            source: Some(LINKER_SOURCE.to_string()),
            props: Map::new(),
        }
    }

    /// Deduplication key.
    pub fn key(&self) -> (&str, &str, EdgeType) {
        (&self.from, &self.to, self.edge_type)
    }
}

/// A SEMANTIC_LINK as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLink {
    pub from_id: String,
    pub to_id: String,
    pub link_type: LinkType,
    pub confidence: f64,
    pub source: String,
    #[serde(default)]
    pub created_at: String,
}

/// Which edges a traversal hop may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSelector {
    Contains,
    Links(&'static [LinkType]),
}

/// Hop direction relative to stored edge orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}
