//! Go rules.

use tree_sitter::{Language, Node};

use super::rules::{CallShape, LanguageRules};
use super::treesitter::TreeSitterParser;
use crate::knowledge::models::NodeKind;

pub static GO: LanguageRules = LanguageRules {
    name: "go",
    extensions: &["go"],
    grammar,
    structural: &[
        ("function_declaration", NodeKind::Function),
        ("method_declaration", NodeKind::Method),
        ("type_spec", NodeKind::Class),
    ],
    calls: &[CallShape {
        kind: "call_expression",
        callee: "function",
        qualifier: None,
    }],
    usages: &["identifier", "type_identifier"],
    name_kinds: &["identifier", "type_identifier", "field_identifier"],
    constructor_names: &[],
    refine: refine_type_spec,
};

fn grammar() -> Language {
    tree_sitter_go::LANGUAGE.into()
}

/// `type X interface {}` is an interface, `type X struct {}` a class; aliases
/// and named scalars are not entities.
fn refine_type_spec(node: &Node, kind: NodeKind) -> Option<NodeKind> {
    if node.kind() != "type_spec" {
        return Some(kind);
    }
    match node.child_by_field_name("type").map(|t| t.kind()) {
        Some("interface_type") => Some(NodeKind::Interface),
        Some("struct_type") => Some(NodeKind::Class),
        _ => None,
    }
}

pub fn parser() -> TreeSitterParser {
    TreeSitterParser::new(&GO)
}
