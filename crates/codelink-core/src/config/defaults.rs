//! Default values for codelink configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Ingestion Defaults
// ============================================================================

/// Files larger than this are not ingested (1 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Number of files processed concurrently.
pub const DEFAULT_MAX_WORKERS: usize = 2;

/// Lines of an entity body handed to the summarizer.
pub const DEFAULT_MAX_SUMMARY_LINES: usize = 120;

/// File extensions selected for ingestion (without leading dot).
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    // Python
    "py", "pyi",
    // Java
    "java",
    // JavaScript/TypeScript
    "js", "jsx", "mjs", "cjs", "ts", "tsx",
    // Go
    "go",
    // C#
    "cs",
];

/// Directories never descended into.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Dependencies
    "node_modules",
    "vendor",
    "venv",
    ".venv",
    "__pycache__",
    ".pytest_cache",
    ".mvn",
    // Build outputs
    "target",
    "build",
    "dist",
    "out",
    "bin",
    "obj",
    // IDE/Editor
    ".idea",
    ".vscode",
    ".vs",
    // Tooling
    "docker",
    ".codelink",
];

// ============================================================================
// LLM Defaults
// ============================================================================

/// Default LLM provider.
pub const DEFAULT_LLM_PROVIDER: &str = "ollama";

/// Default max tokens for LLM responses.
pub const DEFAULT_MAX_TOKENS: u32 = 256;

// OpenAI defaults
/// Default OpenAI API URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

// Ollama defaults
/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";
/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:3b-instruct";

// ============================================================================
// Graph Defaults
// ============================================================================

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = ".codelink";

/// Database directory inside the data directory.
pub const DEFAULT_GRAPH_DIR: &str = "graph.db";

/// SurrealDB namespace.
pub const DEFAULT_NAMESPACE: &str = "codelink";

/// SurrealDB database.
pub const DEFAULT_DATABASE: &str = "graph";

// ============================================================================
// Prompts
// ============================================================================

/// Instruction prepended to an entity body when asking for a summary.
pub const SUMMARY_PROMPT: &str =
    "Summarize the following code in 1-2 sentences. Focus on its purpose and behavior.";

/// Summary stored when the summarizer fails.
pub const SUMMARY_FALLBACK: &str = "Unable to summarize";

/// Reply returned when a chat completion fails.
pub const CHAT_FALLBACK: &str = "Error generating answer, try again later";
