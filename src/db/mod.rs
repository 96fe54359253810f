pub mod schema;

use crate::config::Config;
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRecord {
    pub id: i64,
    pub user_message: String,
    pub assistant_response: String,
    pub timestamp: String,
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(config: &Config) -> Result<Self> {
        let conn = Connection::open(&config.database_url)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database connection mutex poisoned"))
    }

    pub fn execute_init(&self) -> anyhow::Result<()> {
        info!("Database: Initializing schema...");
        let conn = self.lock()?;
        conn.execute_batch(schema::INIT_SQL)?;
        debug!("Database: Schema initialized successfully");
        Ok(())
    }

    /// Appends one exchange to the conversation log and returns its row id.
    pub fn save_conversation(
        &self,
        user_message: &str,
        assistant_response: &str,
        timestamp: NaiveDateTime,
    ) -> anyhow::Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO conversations (user_message, assistant_response, timestamp)
             VALUES (?1, ?2, ?3)",
            (
                user_message,
                assistant_response,
                timestamp.format(schema::TIMESTAMP_FORMAT).to_string(),
            ),
        )?;
        let id = conn.last_insert_rowid();
        debug!("Database: Stored conversation {}", id);
        Ok(id)
    }

    /// Same as [`Database::save_conversation`], stamped with the current local time.
    pub fn log_exchange(&self, user_message: &str, assistant_response: &str) -> anyhow::Result<i64> {
        self.save_conversation(user_message, assistant_response, Local::now().naive_local())
    }

    pub fn count_conversations(&self) -> anyhow::Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Most recent exchanges first.
    pub fn recent_conversations(&self, limit: usize) -> anyhow::Result<Vec<ConversationRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_message, assistant_response, timestamp
             FROM conversations ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            Ok(ConversationRecord {
                id: row.get(0)?,
                user_message: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                assistant_response: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                timestamp: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}
