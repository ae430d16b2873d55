//! C# rules.

use tree_sitter::Language;

use super::rules::{keep_kind, CallShape, LanguageRules};
use super::treesitter::TreeSitterParser;
use crate::knowledge::models::NodeKind;

pub static CSHARP: LanguageRules = LanguageRules {
    name: "csharp",
    extensions: &["cs"],
    grammar,
    structural: &[
        ("class_declaration", NodeKind::Class),
        ("struct_declaration", NodeKind::Class),
        ("record_declaration", NodeKind::Class),
        ("interface_declaration", NodeKind::Interface),
        ("enum_declaration", NodeKind::Enum),
        ("method_declaration", NodeKind::Method),
        ("constructor_declaration", NodeKind::Constructor),
        ("local_function_statement", NodeKind::Function),
    ],
    calls: &[
        CallShape {
            kind: "invocation_expression",
            callee: "function",
            qualifier: None,
        },
        CallShape {
            kind: "object_creation_expression",
            callee: "type",
            qualifier: None,
        },
    ],
    usages: &["identifier"],
    name_kinds: &["identifier"],
    constructor_names: &[],
    refine: keep_kind,
};

fn grammar() -> Language {
    tree_sitter_c_sharp::LANGUAGE.into()
}

pub fn parser() -> TreeSitterParser {
    TreeSitterParser::new(&CSHARP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::parser::traits::Parser;

    const SOURCE: &str = r#"namespace Shop
{
    public interface IRepo
    {
        void Save(string item);
    }

    public class Repo : IRepo
    {
        public Repo() { }

        public void Save(string item)
        {
            Console.WriteLine(item);
            Flush();
        }

        private void Flush() { }
    }
}
"#;

    #[test]
    fn test_csharp_entities() {
        let result = parser().extract("Repo.cs", SOURCE).unwrap();
        let summary: Vec<(&str, NodeKind)> =
            result.nodes.iter().map(|n| (n.name.as_str(), n.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("IRepo", NodeKind::Interface),
                ("Save", NodeKind::Method),
                ("Repo", NodeKind::Class),
                ("Repo", NodeKind::Constructor),
                ("Save", NodeKind::Method),
                ("Flush", NodeKind::Method),
            ]
        );
        assert_eq!(result.nodes[4].parent_id.as_deref(), Some("Repo.cs:Repo:8"));
    }

    #[test]
    fn test_csharp_invocations() {
        let result = parser().extract("Repo.cs", SOURCE).unwrap();
        let calls: Vec<&str> = result
            .calls
            .iter()
            .filter(|c| c.owner_id == "Repo.cs:Save:12")
            .map(|c| c.symbol.as_str())
            .collect();
        assert_eq!(calls, vec!["Console.WriteLine", "Flush"]);
    }
}
