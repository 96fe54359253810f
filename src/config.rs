use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Which embedding model backs the category matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// OpenAI-compatible `/embeddings` endpoint (llama.cpp, text-embeddings-inference, ...)
    OpenAi,
    /// Local feature-hashing model, no network required
    Hashing,
}

impl std::str::FromStr for EmbeddingBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "hashing" => Ok(Self::Hashing),
            other => Err(anyhow::anyhow!(
                "EMBEDDING_BACKEND must be 'openai' or 'hashing', got '{}'",
                other
            )),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct Config {
    pub bind_address: String,
    pub database_url: String,
    pub knowledge_base_path: Option<PathBuf>,
    pub embedding_backend: EmbeddingBackend,
    pub embedding_url: String,
    pub embedding_model: String,
    pub embedding_api_key: Option<String>,
    pub embedding_timeout_secs: u64,
    pub embedding_dimensions: usize,
    pub cors_allowed_origins: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::build()
    }

    fn build() -> anyhow::Result<Self> {
        Ok(Config {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "florence.db".to_string()),
            knowledge_base_path: env::var("KNOWLEDGE_BASE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            embedding_backend: env::var("EMBEDDING_BACKEND")
                .unwrap_or_else(|_| "openai".to_string())
                .parse()?,
            embedding_url: env::var("EMBEDDING_URL")
                .unwrap_or_else(|_| "http://localhost:8080/v1".to_string()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "paraphrase-MiniLM-L6-v2".to_string()),
            embedding_api_key: env::var("EMBEDDING_API_KEY").ok(),
            embedding_timeout_secs: env::var("EMBEDDING_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            embedding_dimensions: env::var("EMBEDDING_DIMENSIONS")
                .unwrap_or_else(|_| "384".to_string())
                .parse()
                .unwrap_or(384),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("database_url", &self.database_url)
            .field("knowledge_base_path", &self.knowledge_base_path)
            .field("embedding_backend", &self.embedding_backend)
            .field("embedding_url", &self.embedding_url)
            .field("embedding_model", &self.embedding_model)
            .field(
                "embedding_api_key",
                &self.embedding_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("embedding_timeout_secs", &self.embedding_timeout_secs)
            .field("embedding_dimensions", &self.embedding_dimensions)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".to_string(),
        database_url: ":memory:".to_string(),
        knowledge_base_path: None,
        embedding_backend: EmbeddingBackend::Hashing,
        embedding_url: "test".to_string(),
        embedding_model: "test".to_string(),
        embedding_api_key: None,
        embedding_timeout_secs: 5,
        embedding_dimensions: 384,
        cors_allowed_origins: None,
    }
}
