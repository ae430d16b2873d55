//! Core parser trait for language-agnostic code extraction.

use super::result::Extraction;
use crate::knowledge::error::KnowledgeError;

/// Language-agnostic parser trait.
///
/// A parser turns one source file into structural entities, call sites and
/// symbol usages. Implementations must hold no per-file state so a single
/// instance can serve every ingestion worker.
pub trait Parser: Send + Sync {
    /// Parse a source file and extract its entities.
    ///
    /// # Arguments
    /// * `path` - File path as it appears in node ids
    /// * `content` - Source code content
    fn extract(&self, path: &str, content: &str) -> Result<Extraction, KnowledgeError>;

    /// Language label, lowercase (e.g. `"python"`).
    fn language_name(&self) -> &'static str;

    /// File extensions this parser handles.
    fn supported_extensions(&self) -> &[&'static str];

    /// Check if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
