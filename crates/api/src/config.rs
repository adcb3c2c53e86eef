use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "txn_extract.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub store: StoreConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: extract::llm::DEFAULT_ENDPOINT.to_string(),
            model: extract::llm::DEFAULT_MODEL.to_string(),
            request_timeout_secs: extract::llm::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(store::DEFAULT_STORE_PATH),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// Read `path` if it exists, otherwise fall back to defaults. Omitted
    /// sections and fields take their default values.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {:?}", path))
    }
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn build_client(&self) -> Result<extract::ChatClient> {
        extract::ChatClient::new(
            self.endpoint.clone(),
            self.model.clone(),
            self.request_timeout(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(config.llm.endpoint, "http://localhost:1234/v1/chat/completions");
        assert_eq!(config.llm.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.store.path, PathBuf::from("transactions.json"));
        assert_eq!(config.server.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"llm": {"model": "llama3"}, "store": {"path": "out/txns.json"}}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.endpoint, extract::llm::DEFAULT_ENDPOINT);
        assert_eq!(config.store.path, PathBuf::from("out/txns.json"));
        assert_eq!(config.server.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{llm = 1}").unwrap();

        assert!(AppConfig::load(&path).is_err());
    }
}
