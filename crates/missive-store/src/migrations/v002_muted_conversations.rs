use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS muted_conversations (
    conversation_id TEXT PRIMARY KEY NOT NULL,
    muted_at        TEXT NOT NULL              -- ISO-8601
);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
