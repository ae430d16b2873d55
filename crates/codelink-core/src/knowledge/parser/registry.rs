//! Parser registry mapping extensions and language labels to parsers.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::result::Extraction;
use super::traits::Parser;
use super::{csharp, go, java, python, typescript};

/// Registry of language parsers.
///
/// Registers every built-in tree-sitter parser on creation.
pub struct ParserRegistry {
    /// Extension to parser mapping.
    by_extension: HashMap<String, Arc<dyn Parser>>,
    /// Language label to parser mapping.
    by_language: HashMap<&'static str, Arc<dyn Parser>>,
}

impl ParserRegistry {
    /// Create a new registry with all built-in parsers.
    pub fn new() -> Self {
        let mut registry = Self {
            by_extension: HashMap::new(),
            by_language: HashMap::new(),
        };

        registry.register(Arc::new(python::parser()));
        registry.register(Arc::new(java::parser()));
        registry.register(Arc::new(typescript::typescript()));
        registry.register(Arc::new(typescript::tsx()));
        registry.register(Arc::new(typescript::javascript()));
        registry.register(Arc::new(go::parser()));
        registry.register(Arc::new(csharp::parser()));

        registry
    }

    /// Register a parser for its language label and extensions.
    pub fn register(&mut self, parser: Arc<dyn Parser>) {
        for ext in parser.supported_extensions() {
            self.by_extension.insert(ext.to_lowercase(), Arc::clone(&parser));
        }
        self.by_language.insert(parser.language_name(), parser);
    }

    /// Language label for a file extension, if one is registered.
    pub fn language_for_extension(&self, extension: &str) -> Option<&'static str> {
        self.by_extension
            .get(&extension.to_lowercase())
            .map(|p| p.language_name())
    }

    /// Language label for a file path, by extension.
    pub fn language_for_path(&self, path: &Path) -> Option<&'static str> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.language_for_extension(ext))
    }

    /// Parser for a language label. Accepts common aliases (`c#`, `js`, `ts`).
    pub fn parser_for_language(&self, language: &str) -> Option<Arc<dyn Parser>> {
        let label = language.trim().to_lowercase();
        let canonical = match label.as_str() {
            "c#" | "cs" | "c-sharp" => "csharp",
            "js" | "jsx" => "javascript",
            "ts" => "typescript",
            "py" => "python",
            "golang" => "go",
            other => other,
        };
        self.by_language.get(canonical).cloned()
    }

    /// Check if any parser can handle the given extension.
    pub fn can_parse(&self, extension: &str) -> bool {
        self.by_extension.contains_key(&extension.to_lowercase())
    }

    /// List all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.by_extension.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Extract entities from `source` written in `language`.
    ///
    /// Unsupported languages and parse failures yield an empty extraction.
    pub fn extract(&self, language: &str, source: &str, file_path: &str) -> Extraction {
        let Some(parser) = self.parser_for_language(language) else {
            tracing::debug!(file = %file_path, language, "no parser for language");
            return Extraction::default();
        };

        match parser.extract(file_path, source) {
            Ok(extraction) => extraction,
            Err(e) => {
                tracing::warn!(file = %file_path, error = %e, "parse failed, skipping file");
                Extraction::default()
            }
        }
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_parsers() {
        let registry = ParserRegistry::new();

        for ext in ["py", "pyi", "java", "ts", "tsx", "js", "jsx", "mjs", "cjs", "go", "cs"] {
            assert!(registry.can_parse(ext), "missing parser for .{}", ext);
        }
        assert!(!registry.can_parse("rs"));
    }

    #[test]
    fn test_language_for_path() {
        let registry = ParserRegistry::new();
        assert_eq!(registry.language_for_path(Path::new("src/main.py")), Some("python"));
        assert_eq!(registry.language_for_path(Path::new("App.TSX")), Some("tsx"));
        assert_eq!(registry.language_for_path(Path::new("Program.cs")), Some("csharp"));
        assert_eq!(registry.language_for_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn test_language_aliases() {
        let registry = ParserRegistry::new();
        assert!(registry.parser_for_language("C#").is_some());
        assert!(registry.parser_for_language("Python").is_some());
        assert!(registry.parser_for_language("cobol").is_none());
    }

    #[test]
    fn test_unsupported_language_is_empty() {
        let registry = ParserRegistry::new();
        let result = registry.extract("cobol", "IDENTIFICATION DIVISION.", "a.cbl");
        assert!(result.is_empty());
    }
}
