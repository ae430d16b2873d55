use codelink_core::config::{
    IngestionConfig, LLMConfig, DEFAULT_DATA_DIR, DEFAULT_LLM_PROVIDER, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_MAX_SUMMARY_LINES, DEFAULT_MAX_WORKERS, DEFAULT_OLLAMA_MODEL, DEFAULT_OPENAI_MODEL,
};
use codelink_core::Config;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.ingestion.max_file_size, DEFAULT_MAX_FILE_SIZE);
    assert_eq!(config.ingestion.max_workers, DEFAULT_MAX_WORKERS);
    assert_eq!(config.ingestion.max_summary_lines, DEFAULT_MAX_SUMMARY_LINES);
    assert_eq!(config.llm.provider, DEFAULT_LLM_PROVIDER);
    assert_eq!(config.graph.data_dir, DEFAULT_DATA_DIR);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_to_toml() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("[ingestion]"));
    assert!(toml_str.contains("[llm]"));
    assert!(toml_str.contains("[graph]"));
    assert!(!toml_str.contains("api_key"));
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[ingestion]
include_extensions = ["py", "go"]
max_workers = 8

[llm]
provider = "ollama"
model = "llama3"

[graph]
data_dir = ".custom-codelink"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.ingestion.include_extensions, vec!["py", "go"]);
    assert_eq!(config.ingestion.max_workers, 8);
    assert_eq!(config.ingestion.max_summary_lines, DEFAULT_MAX_SUMMARY_LINES);
    assert_eq!(config.llm.model, Some("llama3".to_string()));
    assert_eq!(config.graph.data_dir, ".custom-codelink");
    assert!(config.graph.db_path().starts_with(".custom-codelink"));
}

#[test]
fn test_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("codelink.toml");
    std::fs::write(&path, "[llm]\nprovider = \"none\"\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.llm.provider, "none");
    assert!(config.validate().is_ok());
}

#[test]
fn test_validation_rejects_bad_values() {
    let mut config = Config::default();
    config.llm.provider = "anthropic".to_string();
    assert!(config.validate().is_err());

    let config = Config {
        ingestion: IngestionConfig {
            include_extensions: Vec::new(),
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_model_or_default() {
    let mut config = LLMConfig {
        provider: "ollama".to_string(),
        ..Default::default()
    };
    assert_eq!(config.model_or_default(), DEFAULT_OLLAMA_MODEL);

    config.provider = "openai".to_string();
    assert_eq!(config.model_or_default(), DEFAULT_OPENAI_MODEL);

    config.model = Some("custom-model".to_string());
    assert_eq!(config.model_or_default(), "custom-model");
}

#[test]
fn test_env_overrides_max_workers() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("codelink.toml");
    std::fs::write(&path, "[ingestion]\nmax_workers = 4\n").unwrap();

    std::env::set_var("CODELINK_MAX_WORKERS", "7");
    let config = Config::from_file(&path);
    std::env::remove_var("CODELINK_MAX_WORKERS");

    assert_eq!(config.unwrap().ingestion.max_workers, 7);
}

#[test]
fn test_discovery_filters_default_on() {
    let config: Config = toml::from_str("[ingestion]\nskip_hidden = false\n").unwrap();
    assert!(!config.ingestion.skip_hidden);
    assert!(config.ingestion.respect_gitignore);
}
