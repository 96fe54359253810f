pub mod assistant;
pub mod config;
pub mod db;
pub mod embedding;
pub mod http;
pub mod knowledge;
pub mod matcher;
pub mod reply;

use std::sync::Arc;

use tracing::info;

/// Shared state handed to every HTTP handler
pub struct AppState {
    pub config: Arc<config::Config>,
    pub assistant: Arc<assistant::Assistant>,
}

impl AppState {
    pub fn new(
        config: config::Config,
        knowledge: Arc<knowledge::KnowledgeBase>,
        embedder: Arc<dyn embedding::Embedder>,
        db: db::Database,
    ) -> Self {
        let matcher = matcher::CategoryMatcher::new(knowledge, embedder);
        Self {
            config: Arc::new(config),
            assistant: Arc::new(assistant::Assistant::new(matcher, db)),
        }
    }

    /// Loads everything once at startup. Only the database is allowed to fail:
    /// a bad knowledge base file degrades to an empty table.
    pub fn from_config(config: config::Config) -> anyhow::Result<Self> {
        let knowledge = Arc::new(knowledge::KnowledgeBase::load(
            config.knowledge_base_path.as_deref(),
        ));

        let embedder = embedding::build_embedder(&config);
        info!("Embedding model: {}", embedder.name());

        let db = db::Database::new(&config)?;
        db.execute_init()?;
        let logged = db.count_conversations()?;
        match db.recent_conversations(1)?.first() {
            Some(last) => info!("Conversation log: {} exchanges, last at {}", logged, last.timestamp),
            None => info!("Conversation log: empty"),
        }

        Ok(Self::new(config, knowledge, embedder, db))
    }
}
