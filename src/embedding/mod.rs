//! Text embedding backends.
//!
//! The matcher only needs "text in, vector out"; which model produces the
//! vector is decided once at startup by [`build_embedder`].

pub mod client;
pub mod hashing;

pub use client::OpenAiEmbedder;
pub use hashing::HashingEmbedder;

use crate::config::{Config, EmbeddingBackend};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

pub fn build_embedder(config: &Config) -> Arc<dyn Embedder> {
    match config.embedding_backend {
        EmbeddingBackend::OpenAi => Arc::new(OpenAiEmbedder::new(config)),
        EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(config.embedding_dimensions)),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;

    /// Returns fixed vectors for known strings and `fallback` for anything else.
    pub struct StaticEmbedder {
        pub vectors: HashMap<String, Vec<f32>>,
        pub fallback: Vec<f32>,
    }

    impl StaticEmbedder {
        pub fn new(pairs: &[(&str, Vec<f32>)], fallback: Vec<f32>) -> Self {
            Self {
                vectors: pairs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), v.clone()))
                    .collect(),
                fallback,
            }
        }
    }

    #[async_trait]
    impl Embedder for StaticEmbedder {
        fn name(&self) -> &str {
            "static"
        }
        async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(self.vectors.get(text).cloned().unwrap_or_else(|| self.fallback.clone()))
        }
    }

    /// Fails on every call, or only for one specific input when `only` is set.
    pub struct FailingEmbedder {
        pub only: Option<String>,
    }

    #[async_trait]
    impl Embedder for FailingEmbedder {
        fn name(&self) -> &str {
            "failing"
        }
        async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            match &self.only {
                Some(target) if target != text => Ok(vec![1.0, 0.0]),
                _ => Err(anyhow::anyhow!("embedding model unavailable")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_build_embedder_picks_backend() {
        let mut config = test_config();
        assert_eq!(build_embedder(&config).name(), "hashing");

        config.embedding_backend = EmbeddingBackend::OpenAi;
        config.embedding_model = "paraphrase-MiniLM-L6-v2".to_string();
        assert_eq!(build_embedder(&config).name(), "paraphrase-MiniLM-L6-v2");
    }
}
