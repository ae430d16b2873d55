//! Language-aware structural extraction from tree-sitter parse trees.
//!
//! ## Components
//!
//! - `Parser` trait - Common interface for all language parsers
//! - `TreeSitterParser` - One generic parser driven by per-language `LanguageRules`
//! - `ParserRegistry` - Maps extensions and language labels to parsers
//! - `Extraction` - Entities, call sites and usages of one file
//!
//! ## Supported Languages
//!
//! Python, Java, TypeScript, TSX, JavaScript, Go, C#.

mod csharp;
mod extractor;
mod go;
mod java;
mod python;
mod registry;
mod result;
mod rules;
mod traits;
mod treesitter;
mod typescript;

pub use registry::ParserRegistry;
pub use result::{ExtractedNode, Extraction, SymbolRef};
pub use rules::{CallShape, LanguageRules};
pub use traits::Parser;
pub use treesitter::TreeSitterParser;
