use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::paths::AppPaths;

/// Application configuration, loaded from `config.yml` at startup.
///
/// Every section and field has a default, so a missing or partial file
/// still produces a runnable configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ollama: OllamaConfig,
    pub corpus: CorpusConfig,
    pub retrieval: RetrievalConfig,
    pub cleaner: CleanerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    /// Model used to answer questions.
    pub chat_model: String,
    /// Model used to embed FAQ units and queries.
    pub embedding_model: String,
    pub request_timeout_secs: u64,
    /// Sampling temperature override; unset keeps the model's default.
    pub temperature: Option<f64>,
    /// Cap on generated tokens per answer; unset means no cap.
    pub max_tokens: Option<i32>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            chat_model: "qwen3:latest".to_string(),
            embedding_model: "bge-m3".to_string(),
            request_timeout_secs: 120,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl OllamaConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// FAQ corpus file, relative paths resolve against the project root.
    pub path: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: "data/faq.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of FAQ units handed to the prompt per question.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub open_tag: String,
    pub close_tag: String,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            open_tag: "<think>".to_string(),
            close_tag: "</think>".to_string(),
        }
    }
}

impl AppConfig {
    pub fn config_path(paths: &AppPaths) -> PathBuf {
        if let Ok(path) = env::var("PORSA_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        paths.project_root.join("config.yml")
    }

    /// Loads the config file, falling back to defaults when it is absent.
    /// A present but malformed file is an error, not a silent fallback.
    pub fn load(paths: &AppPaths) -> anyhow::Result<Self> {
        let path = Self::config_path(paths);
        if !path.exists() {
            tracing::warn!("No config file at {}; using defaults", path.display());
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("Malformed config at {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.retrieval.top_k >= 1, "retrieval.top_k must be at least 1");
        anyhow::ensure!(
            self.ollama.request_timeout_secs >= 1,
            "ollama.request_timeout_secs must be at least 1"
        );
        anyhow::ensure!(
            !self.ollama.chat_model.trim().is_empty(),
            "ollama.chat_model must not be empty"
        );
        anyhow::ensure!(
            !self.ollama.embedding_model.trim().is_empty(),
            "ollama.embedding_model must not be empty"
        );
        anyhow::ensure!(
            !self.corpus.path.trim().is_empty(),
            "corpus.path must not be empty"
        );
        if let Some(temperature) = self.ollama.temperature {
            anyhow::ensure!(
                temperature.is_finite() && temperature >= 0.0,
                "ollama.temperature must be a non-negative number"
            );
        }
        if let Some(max_tokens) = self.ollama.max_tokens {
            anyhow::ensure!(max_tokens >= 1, "ollama.max_tokens must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retrieval.top_k, 10);
        assert_eq!(config.ollama.chat_model, "qwen3:latest");
        assert_eq!(config.ollama.embedding_model, "bge-m3");
        assert_eq!(config.ollama.temperature, None);
        assert_eq!(config.ollama.max_tokens, None);
        assert_eq!(config.cleaner.open_tag, "<think>");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_sections() {
        let yaml = "retrieval:\n  top_k: 3\nollama:\n  chat_model: llama3\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.ollama.chat_model, "llama3");
        assert_eq!(config.ollama.embedding_model, "bge-m3");
        assert_eq!(config.corpus.path, "data/faq.json");
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_model_name_is_rejected() {
        let mut config = AppConfig::default();
        config.ollama.embedding_model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn sampling_overrides_parse_from_yaml() {
        let yaml = "ollama:\n  temperature: 0.2\n  max_tokens: 64\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.ollama.temperature, Some(0.2));
        assert_eq!(config.ollama.max_tokens, Some(64));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nonsense_sampling_values_are_rejected() {
        let mut config = AppConfig::default();
        config.ollama.temperature = Some(-0.1);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.ollama.max_tokens = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.yml"), "retrieval: [not a map").unwrap();
        let paths = AppPaths {
            project_root: dir.path().to_path_buf(),
            log_dir: dir.path().join("logs"),
        };
        assert!(AppConfig::load(&paths).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths {
            project_root: dir.path().to_path_buf(),
            log_dir: dir.path().join("logs"),
        };
        let config = AppConfig::load(&paths).unwrap();
        assert_eq!(config.retrieval.top_k, 10);
    }
}
