//! Per-language tables that drive the generic tree walk.

use tree_sitter::{Language, Node};

use crate::knowledge::models::NodeKind;

/// An invocation node shape.
#[derive(Debug, Clone, Copy)]
pub struct CallShape {
    /// Grammar kind of the invocation node.
    pub kind: &'static str,
    /// Field holding the callee.
    pub callee: &'static str,
    /// Field holding a receiver that is kept as a qualifier (Java `obj.m()`).
    pub qualifier: Option<&'static str>,
}

/// Hook that adjusts or drops a structural match after the table lookup.
pub type RefineFn = fn(&Node, NodeKind) -> Option<NodeKind>;

/// Everything the walker needs to know about one grammar.
pub struct LanguageRules {
    /// Language label, lowercase.
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub grammar: fn() -> Language,
    /// Grammar kind to entity kind.
    pub structural: &'static [(&'static str, NodeKind)],
    pub calls: &'static [CallShape],
    /// Grammar kinds recorded as usages.
    pub usages: &'static [&'static str],
    /// Identifier-shaped kinds accepted as an entity name.
    pub name_kinds: &'static [&'static str],
    /// Method names that denote constructors.
    pub constructor_names: &'static [&'static str],
    pub refine: RefineFn,
}

impl LanguageRules {
    pub fn structural_kind(&self, kind: &str) -> Option<NodeKind> {
        self.structural
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, node_kind)| *node_kind)
    }

    pub fn call_shape(&self, kind: &str) -> Option<&CallShape> {
        self.calls.iter().find(|shape| shape.kind == kind)
    }

    pub fn is_usage(&self, kind: &str) -> bool {
        self.usages.contains(&kind)
    }

    pub fn is_name_kind(&self, kind: &str) -> bool {
        self.name_kinds.contains(&kind)
    }
}

/// Refinement that accepts every table match unchanged.
pub fn keep_kind(_node: &Node, kind: NodeKind) -> Option<NodeKind> {
    Some(kind)
}
