//! Tree-sitter based parser shared by every supported language.

use tree_sitter::{Language, Node, Parser as TSParser, Tree};

use super::extractor::Walker;
use super::result::Extraction;
use super::rules::LanguageRules;
use super::traits::Parser;
use crate::knowledge::error::KnowledgeError;

/// Tree-sitter parser driven by a [`LanguageRules`] table.
pub struct TreeSitterParser {
    rules: &'static LanguageRules,
    language: Language,
}

impl TreeSitterParser {
    pub fn new(rules: &'static LanguageRules) -> Self {
        Self {
            rules,
            language: (rules.grammar)(),
        }
    }

    /// Parse source code into a tree-sitter tree.
    ///
    /// A fresh `tree_sitter::Parser` is created per call.
    pub fn parse_tree(&self, content: &str) -> Result<Tree, String> {
        let mut parser = TSParser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| format!("Failed to set language: {}", e))?;

        parser
            .parse(content, None)
            .ok_or_else(|| "Failed to parse content".to_string())
    }

    /// Get line number (1-based) for a node.
    pub fn node_line(node: &Node) -> u32 {
        node.start_position().row as u32 + 1
    }

    /// Get end line number (1-based) for a node.
    pub fn node_end_line(node: &Node) -> u32 {
        node.end_position().row as u32 + 1
    }
}

impl Parser for TreeSitterParser {
    fn extract(&self, path: &str, content: &str) -> Result<Extraction, KnowledgeError> {
        let tree = self.parse_tree(content).map_err(|message| KnowledgeError::Parse {
            path: path.to_string(),
            message,
        })?;

        if tree.root_node().has_error() {
            tracing::debug!(file = %path, language = self.rules.name, "parse tree contains syntax errors");
        }

        Ok(Walker::new(self.rules, path, content).run(tree.root_node()))
    }

    fn language_name(&self) -> &'static str {
        self.rules.name
    }

    fn supported_extensions(&self) -> &[&'static str] {
        self.rules.extensions
    }
}
