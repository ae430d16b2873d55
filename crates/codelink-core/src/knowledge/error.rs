//! Knowledge graph error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the knowledge graph.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(String),

    /// File parsing error.
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Traversal asked for an operation it does not know.
    #[error("Invalid traversal operation '{0}' (expected one of: structure, calls, called_by, uses, dependencies)")]
    InvalidOperation(String),

    /// Entity not found.
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Project has never been ingested.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A worker task panicked or was aborted.
    #[error("Ingestion task failed: {0}")]
    Task(String),
}

impl From<std::io::Error> for KnowledgeError {
    fn from(err: std::io::Error) -> Self {
        KnowledgeError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<surrealdb::Error> for KnowledgeError {
    fn from(err: surrealdb::Error) -> Self {
        KnowledgeError::Database(err.to_string())
    }
}

impl From<tokio::task::JoinError> for KnowledgeError {
    fn from(err: tokio::task::JoinError) -> Self {
        KnowledgeError::Task(err.to_string())
    }
}

impl From<crate::config::ConfigError> for KnowledgeError {
    fn from(err: crate::config::ConfigError) -> Self {
        KnowledgeError::Config(err.to_string())
    }
}

impl From<crate::llm::LLMError> for KnowledgeError {
    fn from(err: crate::llm::LLMError) -> Self {
        KnowledgeError::Config(err.to_string())
    }
}
