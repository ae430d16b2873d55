//! Python rules.

use tree_sitter::Language;

use super::rules::{keep_kind, CallShape, LanguageRules};
use super::treesitter::TreeSitterParser;
use crate::knowledge::models::NodeKind;

pub static PYTHON: LanguageRules = LanguageRules {
    name: "python",
    extensions: &["py", "pyi"],
    grammar,
    structural: &[
        ("class_definition", NodeKind::Class),
        ("function_definition", NodeKind::Function),
    ],
    calls: &[CallShape {
        kind: "call",
        callee: "function",
        qualifier: None,
    }],
    usages: &["identifier"],
    name_kinds: &["identifier"],
    constructor_names: &["__init__"],
    refine: keep_kind,
};

fn grammar() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

pub fn parser() -> TreeSitterParser {
    TreeSitterParser::new(&PYTHON)
}
