//! Extraction result types.

use std::collections::HashMap;

use crate::knowledge::models::NodeKind;

/// Result of extracting one source file.
///
/// Entities appear in pre-order, so a parent always precedes its children.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Structural entities.
    pub nodes: Vec<ExtractedNode>,

    /// Invocation sites, `(owner, callee text, grammar kind)`.
    pub calls: Vec<SymbolRef>,

    /// Identifier and type references outside callee positions.
    pub usages: Vec<SymbolRef>,

    /// Names introduced by each entity, keyed by node id.
    pub defined_symbols: HashMap<String, Vec<String>>,
}

impl Extraction {
    /// True when the file produced no entities.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Raw symbols referenced by each entity: its calls first, then its usages.
    pub fn symbols_used(&self) -> HashMap<String, Vec<String>> {
        let mut used: HashMap<String, Vec<String>> = HashMap::new();
        for reference in self.calls.iter().chain(self.usages.iter()) {
            used.entry(reference.owner_id.clone())
                .or_default()
                .push(reference.symbol.clone());
        }
        used
    }

    pub(super) fn push_node(&mut self, node: ExtractedNode) {
        self.defined_symbols
            .entry(node.node_id.clone())
            .or_default()
            .push(node.name.clone());
        self.nodes.push(node);
    }
}

/// One structural entity found in the parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedNode {
    pub node_id: String,
    pub kind: NodeKind,
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
    /// Enclosing entity, `None` at file scope.
    pub parent_id: Option<String>,
    /// Full source text of the entity.
    pub code: String,
}

impl ExtractedNode {
    /// Source text limited to `max_lines` lines, for the summarizer.
    pub fn summary_input(&self, max_lines: usize) -> String {
        let total = self.code.lines().count();
        if total <= max_lines {
            return self.code.clone();
        }
        let mut text: String = self
            .code
            .lines()
            .take(max_lines)
            .collect::<Vec<_>>()
            .join("\n");
        text.push_str("\n...");
        text
    }
}

/// A raw textual reference owned by an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRef {
    pub owner_id: String,
    pub symbol: String,
    /// Grammar kind of the node the symbol was read from.
    pub provenance: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(code: &str) -> ExtractedNode {
        ExtractedNode {
            node_id: "a.py:f:1".to_string(),
            kind: NodeKind::Function,
            name: "f".to_string(),
            start_line: 1,
            end_line: code.lines().count() as u32,
            parent_id: None,
            code: code.to_string(),
        }
    }

    #[test]
    fn test_summary_input_truncates() {
        let code = (1..=10).map(|i| format!("line{}", i)).collect::<Vec<_>>().join("\n");
        let n = node(&code);
        let trimmed = n.summary_input(3);
        assert_eq!(trimmed, "line1\nline2\nline3\n...");
        assert_eq!(n.summary_input(50), code);
    }

    #[test]
    fn test_symbols_used_orders_calls_first() {
        let mut extraction = Extraction::default();
        extraction.usages.push(SymbolRef {
            owner_id: "x".to_string(),
            symbol: "Config".to_string(),
            provenance: "identifier",
        });
        extraction.calls.push(SymbolRef {
            owner_id: "x".to_string(),
            symbol: "self.load".to_string(),
            provenance: "call",
        });
        let used = extraction.symbols_used();
        assert_eq!(used["x"], vec!["self.load".to_string(), "Config".to_string()]);
    }
}
