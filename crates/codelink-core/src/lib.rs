pub mod classifier;
pub mod config;
pub mod knowledge;
pub mod llm;
pub mod summarizer;

pub use classifier::{HeuristicClassifier, LanguageClassifier};
pub use config::Config;
pub use knowledge::{KnowledgeError, KnowledgeGraph};
pub use summarizer::Summarizer;
