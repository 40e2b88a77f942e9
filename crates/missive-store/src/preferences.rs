//! Per-conversation preferences.
//!
//! Only the muted set is persisted. Conversation ids are the sender address
//! for single-party threads.

use std::collections::HashSet;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

impl Database {
    // ------------------------------------------------------------------
    // Mute
    // ------------------------------------------------------------------

    /// Add `conversation_id` to, or remove it from, the muted set.
    pub fn set_conversation_muted(&self, conversation_id: &str, muted: bool) -> Result<()> {
        if muted {
            self.conn().execute(
                "INSERT OR IGNORE INTO muted_conversations (conversation_id, muted_at)
                 VALUES (?1, ?2)",
                params![conversation_id, Utc::now().to_rfc3339()],
            )?;
        } else {
            self.conn().execute(
                "DELETE FROM muted_conversations WHERE conversation_id = ?1",
                params![conversation_id],
            )?;
        }
        tracing::debug!(%conversation_id, muted, "updated mute preference");
        Ok(())
    }

    pub fn is_conversation_muted(&self, conversation_id: &str) -> Result<bool> {
        let found = self
            .conn()
            .query_row(
                "SELECT 1 FROM muted_conversations WHERE conversation_id = ?1",
                params![conversation_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn muted_conversations(&self) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT conversation_id FROM muted_conversations")?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut ids = HashSet::new();
        for row in rows {
            ids.insert(row?);
        }
        Ok(ids)
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Drop a conversation entirely: its messages and its mute flag.
    /// Returns the number of messages removed.
    pub fn forget_conversation(&self, address: &str) -> Result<usize> {
        let tx = self.conn().unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM messages WHERE address = ?1", params![address])?;
        tx.execute(
            "DELETE FROM muted_conversations WHERE conversation_id = ?1",
            params![address],
        )?;
        tx.commit()?;

        tracing::info!(%address, removed, "forgot conversation");
        Ok(removed)
    }
}
