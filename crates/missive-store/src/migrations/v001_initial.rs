//! v001 -- Initial schema creation.
//!
//! Creates the `messages` ledger table and the index backing dedup lookups.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Messages (local SMS ledger)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    address   TEXT NOT NULL,               -- sender / recipient address
    body      TEXT NOT NULL,
    date_sent INTEGER NOT NULL,            -- epoch millis, as reported by sender
    date      INTEGER NOT NULL,            -- epoch millis, local
    person    TEXT,                        -- contact reference, if resolved
    type      INTEGER NOT NULL DEFAULT 1,  -- 1 inbox, 2 sent
    read      INTEGER NOT NULL DEFAULT 0,  -- boolean 0/1
    seen      INTEGER NOT NULL DEFAULT 0   -- boolean 0/1
);

CREATE INDEX IF NOT EXISTS idx_messages_dedup
    ON messages(address, body, date_sent);

CREATE INDEX IF NOT EXISTS idx_messages_address_date
    ON messages(address, date DESC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
