//! Java rules.

use tree_sitter::Language;

use super::rules::{keep_kind, CallShape, LanguageRules};
use super::treesitter::TreeSitterParser;
use crate::knowledge::models::NodeKind;

pub static JAVA: LanguageRules = LanguageRules {
    name: "java",
    extensions: &["java"],
    grammar,
    structural: &[
        ("class_declaration", NodeKind::Class),
        ("record_declaration", NodeKind::Class),
        ("interface_declaration", NodeKind::Interface),
        ("enum_declaration", NodeKind::Enum),
        ("method_declaration", NodeKind::Method),
        ("constructor_declaration", NodeKind::Constructor),
    ],
    calls: &[
        CallShape {
            kind: "method_invocation",
            callee: "name",
            qualifier: Some("object"),
        },
        CallShape {
            kind: "object_creation_expression",
            callee: "type",
            qualifier: None,
        },
    ],
    usages: &["identifier", "type_identifier"],
    name_kinds: &["identifier"],
    constructor_names: &[],
    refine: keep_kind,
};

fn grammar() -> Language {
    tree_sitter_java::LANGUAGE.into()
}

pub fn parser() -> TreeSitterParser {
    TreeSitterParser::new(&JAVA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::parser::traits::Parser;

    const SOURCE: &str = r#"public class OrderService implements Handler {
    private final Repo repo;

    public OrderService(Repo repo) {
        this.repo = repo;
    }

    public void handle(Order order) {
        repo.save(order);
        Util.log(new Audit(order));
    }
}

interface Handler {
    void handle(Order order);
}
"#;

    #[test]
    fn test_java_entities() {
        let result = parser().extract("OrderService.java", SOURCE).unwrap();
        let summary: Vec<(&str, NodeKind)> =
            result.nodes.iter().map(|n| (n.name.as_str(), n.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("OrderService", NodeKind::Class),
                ("OrderService", NodeKind::Constructor),
                ("handle", NodeKind::Method),
                ("Handler", NodeKind::Interface),
                ("handle", NodeKind::Method),
            ]
        );
        assert_eq!(result.nodes[1].node_id, "OrderService.java:OrderService:4");
        assert_eq!(result.nodes[4].parent_id.as_deref(), Some("OrderService.java:Handler:14"));
    }

    #[test]
    fn test_java_invocations() {
        let result = parser().extract("OrderService.java", SOURCE).unwrap();
        let handle_calls: Vec<&str> = result
            .calls
            .iter()
            .filter(|c| c.owner_id == "OrderService.java:handle:8")
            .map(|c| c.symbol.as_str())
            .collect();
        assert_eq!(handle_calls, vec!["repo.save", "Util.log", "Audit"]);
    }

    #[test]
    fn test_implemented_interface_is_a_usage() {
        let result = parser().extract("OrderService.java", SOURCE).unwrap();
        assert!(result
            .usages
            .iter()
            .any(|u| u.owner_id == "OrderService.java:OrderService:1" && u.symbol == "Handler"));
    }
}
