/// Conversation log. Rows are only ever appended.
pub const INIT_SQL: &str = "
    CREATE TABLE IF NOT EXISTS conversations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_message TEXT,
        assistant_response TEXT,
        timestamp DATETIME
    );
";

/// Format used for the `timestamp` column (ISO-8601, local time, microseconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
