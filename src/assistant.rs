use crate::db::Database;
use crate::matcher::CategoryMatcher;
use crate::reply::{format_response, APOLOGY_RESPONSE, FALLBACK_RESPONSE};
use tracing::{error, info};

/// Turns a user message into a reply and records the exchange.
pub struct Assistant {
    matcher: CategoryMatcher,
    db: Database,
}

impl Assistant {
    pub fn new(matcher: CategoryMatcher, db: Database) -> Self {
        Self { matcher, db }
    }

    #[cfg(test)]
    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    /// Always returns a non-empty reply. Every call appends exactly one row
    /// to the conversation log, whatever the outcome.
    pub async fn process_message(&self, message: &str) -> String {
        let response = self.respond(message).await;
        self.store_conversation(message, &response).await;
        response
    }

    /// Handles a message that is not text (a number, list, ...). The embedding
    /// model cannot take it, so the reply is the apology; the exchange is
    /// still logged with the message as its JSON text.
    pub async fn process_unsupported(&self, raw: &str) -> String {
        error!("Error processing message: unsupported message value {}", raw);
        let response = APOLOGY_RESPONSE.to_string();
        self.store_conversation(raw, &response).await;
        response
    }

    async fn respond(&self, message: &str) -> String {
        match self.matcher.best_match(message).await {
            Ok(Some(m)) => {
                info!("Matched category '{}' (score {:.3})", m.category.name, m.score);
                format_response(&m.category.name, &m.category.responses)
            }
            Ok(None) => {
                info!("No category above threshold, using fallback response");
                FALLBACK_RESPONSE.to_string()
            }
            Err(e) => {
                error!("Error processing message: {}", e);
                APOLOGY_RESPONSE.to_string()
            }
        }
    }

    async fn store_conversation(&self, message: &str, response: &str) {
        let db = self.db.clone();
        let message = message.to_string();
        let response = response.to_string();

        let result = tokio::task::spawn_blocking(move || db.log_exchange(&message, &response)).await;
        match result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => error!("Error storing conversation: {}", e),
            Err(e) => error!("Error storing conversation: {}", e),
        }
    }
}
