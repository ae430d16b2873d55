//! Node types for the code graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural category of a [`CodeNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Class,
    Interface,
    Enum,
    Function,
    Method,
    Constructor,
}

impl NodeKind {
    /// Kinds that open a type scope (members nested in them become methods).
    pub fn is_type_like(self) -> bool {
        matches!(self, NodeKind::Class | NodeKind::Interface | NodeKind::Enum)
    }

    /// Kinds that may originate or receive a CALLS link.
    pub fn is_callable(self) -> bool {
        matches!(self, NodeKind::Function | NodeKind::Method)
    }

    /// Kinds a USES link may point at.
    pub fn is_usable(self) -> bool {
        matches!(
            self,
            NodeKind::Class | NodeKind::Interface | NodeKind::Enum | NodeKind::Function | NodeKind::Method
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Class => "class",
            NodeKind::Interface => "interface",
            NodeKind::Enum => "enum",
            NodeKind::Function => "function",
            NodeKind::Method => "method",
            NodeKind::Constructor => "constructor",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural code entity stored in the graph.
///
/// Identity is `node_id`, never the record id assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeNode {
    /// `<file_path>:<name>:<start_line>`, or `<project>:<file_path>` for files.
    pub node_id: String,
    pub node_kind: NodeKind,
    pub node_name: String,
    pub language: String,
    pub file_path: String,
    pub project: String,
    /// 1-based, inclusive.
    pub start_line: u32,
    /// 1-based, inclusive.
    pub end_line: u32,
    #[serde(default)]
    pub summary: String,
    /// Names this entity introduces.
    #[serde(default)]
    pub symbols_defined: Vec<String>,
    /// Raw symbol tokens referenced in the body, unnormalized.
    #[serde(default)]
    pub symbols_used: Vec<String>,
    /// SHA-256 of the full source text. Left untouched on merge when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_hash: Option<String>,
}

impl CodeNode {
    /// Build the identifier of a non-file entity.
    pub fn make_id(file_path: &str, name: &str, start_line: u32) -> String {
        format!("{}:{}:{}", file_path, name, start_line)
    }

    /// Build the identifier of a file entity.
    pub fn file_id(project: &str, file_path: &str) -> String {
        format!("{}:{}", project, file_path)
    }

    /// Create the node representing a whole source file.
    pub fn file(project: &str, file_path: &str, language: &str, content: &str) -> Self {
        let name = std::path::Path::new(file_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(file_path)
            .to_string();
        let lines = content.lines().count().max(1) as u32;

        Self {
            node_id: Self::file_id(project, file_path),
            node_kind: NodeKind::File,
            summary: format!("File {}", name),
            node_name: name,
            language: language.to_string(),
            file_path: file_path.to_string(),
            project: project.to_string(),
            start_line: 1,
            end_line: lines,
            symbols_defined: Vec::new(),
            symbols_used: Vec::new(),
            node_hash: Some(crate::knowledge::hash::content_hash(content)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_format() {
        assert_eq!(CodeNode::make_id("src/a.py", "foo", 3), "src/a.py:foo:3");
        assert_eq!(CodeNode::file_id("demo", "src/a.py"), "demo:src/a.py");
    }

    #[test]
    fn test_file_node() {
        let node = CodeNode::file("demo", "pkg/util.py", "python", "a = 1\nb = 2\n");
        assert_eq!(node.node_kind, NodeKind::File);
        assert_eq!(node.node_name, "util.py");
        assert_eq!(node.summary, "File util.py");
        assert_eq!(node.end_line, 2);
        assert!(node.symbols_defined.is_empty());
        assert!(node.node_hash.is_some());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&NodeKind::Constructor).unwrap();
        assert_eq!(json, "\"constructor\"");
        let kind: NodeKind = serde_json::from_str("\"interface\"").unwrap();
        assert_eq!(kind, NodeKind::Interface);
    }

    #[test]
    fn test_missing_hash_not_serialized() {
        let mut node = CodeNode::file("demo", "a.py", "python", "x = 1");
        node.node_hash = None;
        let value = serde_json::to_value(&node).unwrap();
        assert!(value.get("node_hash").is_none());
    }
}
