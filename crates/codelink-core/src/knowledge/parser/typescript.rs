//! TypeScript, TSX and JavaScript rules.
//!
//! The three grammars share node kinds; TypeScript adds interfaces, enums,
//! abstract classes and type references.

use tree_sitter::{Language, Node};

use super::rules::{CallShape, LanguageRules};
use super::treesitter::TreeSitterParser;
use crate::knowledge::models::NodeKind;

const SCRIPT_CALLS: &[CallShape] = &[
    CallShape {
        kind: "call_expression",
        callee: "function",
        qualifier: None,
    },
    CallShape {
        kind: "new_expression",
        callee: "constructor",
        qualifier: None,
    },
];

const TS_STRUCTURAL: &[(&str, NodeKind)] = &[
    ("class_declaration", NodeKind::Class),
    ("abstract_class_declaration", NodeKind::Class),
    ("interface_declaration", NodeKind::Interface),
    ("enum_declaration", NodeKind::Enum),
    ("function_declaration", NodeKind::Function),
    ("generator_function_declaration", NodeKind::Function),
    ("method_definition", NodeKind::Method),
    ("method_signature", NodeKind::Method),
    ("abstract_method_signature", NodeKind::Method),
    ("variable_declarator", NodeKind::Function),
];

pub static TYPESCRIPT: LanguageRules = LanguageRules {
    name: "typescript",
    extensions: &["ts", "mts", "cts"],
    grammar: typescript_grammar,
    structural: TS_STRUCTURAL,
    calls: SCRIPT_CALLS,
    usages: &["identifier", "type_identifier"],
    name_kinds: &["identifier", "type_identifier", "property_identifier"],
    constructor_names: &["constructor"],
    refine: refine_declarator,
};

pub static TSX: LanguageRules = LanguageRules {
    name: "tsx",
    extensions: &["tsx"],
    grammar: tsx_grammar,
    structural: TS_STRUCTURAL,
    calls: SCRIPT_CALLS,
    usages: &["identifier", "type_identifier"],
    name_kinds: &["identifier", "type_identifier", "property_identifier"],
    constructor_names: &["constructor"],
    refine: refine_declarator,
};

pub static JAVASCRIPT: LanguageRules = LanguageRules {
    name: "javascript",
    extensions: &["js", "jsx", "mjs", "cjs"],
    grammar: javascript_grammar,
    structural: &[
        ("class_declaration", NodeKind::Class),
        ("function_declaration", NodeKind::Function),
        ("generator_function_declaration", NodeKind::Function),
        ("method_definition", NodeKind::Method),
        ("variable_declarator", NodeKind::Function),
    ],
    calls: SCRIPT_CALLS,
    usages: &["identifier"],
    name_kinds: &["identifier", "property_identifier"],
    constructor_names: &["constructor"],
    refine: refine_declarator,
};

fn typescript_grammar() -> Language {
    tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
}

fn tsx_grammar() -> Language {
    tree_sitter_typescript::LANGUAGE_TSX.into()
}

fn javascript_grammar() -> Language {
    tree_sitter_javascript::LANGUAGE.into()
}

/// `const f = () => ...` is a function; any other declarator is not an entity.
fn refine_declarator(node: &Node, kind: NodeKind) -> Option<NodeKind> {
    if node.kind() != "variable_declarator" {
        return Some(kind);
    }
    match node.child_by_field_name("value").map(|v| v.kind()) {
        Some("arrow_function" | "function_expression" | "function" | "generator_function") => {
            Some(NodeKind::Function)
        }
        _ => None,
    }
}

pub fn typescript() -> TreeSitterParser {
    TreeSitterParser::new(&TYPESCRIPT)
}

pub fn tsx() -> TreeSitterParser {
    TreeSitterParser::new(&TSX)
}

pub fn javascript() -> TreeSitterParser {
    TreeSitterParser::new(&JAVASCRIPT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::parser::traits::Parser;

    const TS_SOURCE: &str = r#"interface Repo {
  save(item: string): void;
}

class MemoryRepo implements Repo {
  constructor(private items: string[]) {}

  save(item: string): void {
    this.items.push(item);
  }
}

export const makeRepo = (): Repo => new MemoryRepo([]);

function main() {
  const repo = makeRepo();
  repo.save("a");
}
"#;

    #[test]
    fn test_typescript_entities() {
        let result = typescript().extract("repo.ts", TS_SOURCE).unwrap();
        let summary: Vec<(&str, NodeKind)> =
            result.nodes.iter().map(|n| (n.name.as_str(), n.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("Repo", NodeKind::Interface),
                ("save", NodeKind::Method),
                ("MemoryRepo", NodeKind::Class),
                ("constructor", NodeKind::Constructor),
                ("save", NodeKind::Method),
                ("makeRepo", NodeKind::Function),
                ("main", NodeKind::Function),
            ]
        );
    }

    #[test]
    fn test_typescript_calls() {
        let result = typescript().extract("repo.ts", TS_SOURCE).unwrap();
        let calls: Vec<(&str, &str)> = result
            .calls
            .iter()
            .map(|c| (c.owner_id.as_str(), c.symbol.as_str()))
            .collect();
        assert!(calls.contains(&("repo.ts:save:8", "this.items.push")));
        assert!(calls.contains(&("repo.ts:makeRepo:13", "MemoryRepo")));
        assert!(calls.contains(&("repo.ts:main:15", "makeRepo")));
        assert!(calls.contains(&("repo.ts:main:15", "repo.save")));
    }

    #[test]
    fn test_implements_clause_is_a_usage() {
        let result = typescript().extract("repo.ts", TS_SOURCE).unwrap();
        assert!(result
            .usages
            .iter()
            .any(|u| u.owner_id == "repo.ts:MemoryRepo:5" && u.symbol == "Repo"));
    }

    #[test]
    fn test_javascript_plain_declarators_are_skipped() {
        let source = "const limit = 10;\nconst double = (x) => x * 2;\nfunction run() { return double(limit); }\n";
        let result = javascript().extract("util.js", source).unwrap();
        let names: Vec<&str> = result.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["double", "run"]);
        assert_eq!(result.calls[0].symbol, "double");
        assert_eq!(result.calls[0].owner_id, "util.js:run:3");
    }

    #[test]
    fn test_deeply_nested_expression() {
        let source = format!("function big() {{ return {}1; }}\nfunction small() {{ big(); }}\n", "1+".repeat(50_000));
        let result = javascript().extract("deep.js", &source).unwrap();
        let names: Vec<&str> = result.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["big", "small"]);
        assert_eq!(result.calls.len(), 1);
        assert_eq!(result.calls[0].owner_id, "deep.js:small:2");
    }

    #[test]
    fn test_tsx_component() {
        let source = "export function App() {\n  return <div>{render()}</div>;\n}\n";
        let result = tsx().extract("App.tsx", source).unwrap();
        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.nodes[0].node_id, "App.tsx:App:1");
        assert_eq!(result.calls[0].symbol, "render");
    }
}
