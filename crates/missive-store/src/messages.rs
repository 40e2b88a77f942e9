use rusqlite::{params, OptionalExtension};

use missive_shared::constants::{columns, MESSAGE_BOX_INBOX, MESSAGE_BOX_SENT};
use missive_shared::ProviderRow;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{IncomingMessage, StoredMessageRecord};

const SELECT_COLUMNS: &str =
    "SELECT id, address, body, date_sent, date, person, type, read, seen FROM messages";

impl Database {
    /// Insert an inbound message without any dedup check.
    ///
    /// The inbound write path should go through [`Database::upsert_message`];
    /// this is the raw insert it is built on.
    pub fn insert_message(&self, message: &IncomingMessage) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO messages (address, body, date_sent, date, person, type, read, seen)
             VALUES (?1, ?2, ?3, ?3, ?4, ?5, 0, 0)",
            params![
                message.address,
                message.body,
                message.date_sent,
                message.person_id,
                MESSAGE_BOX_INBOX,
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Record a message the local user sent to `address`.
    pub fn insert_sent_message(&self, address: &str, body: &str, date: i64) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO messages (address, body, date_sent, date, person, type, read, seen)
             VALUES (?1, ?2, ?3, ?3, NULL, ?4, 1, 1)",
            params![address, body, date, MESSAGE_BOX_SENT],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn get_message(&self, id: i64) -> Result<StoredMessageRecord> {
        self.conn()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_record,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Messages exchanged with `address`, newest first.
    pub fn messages_for_address(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<Vec<StoredMessageRecord>> {
        let mut stmt = self.conn().prepare(&format!(
            "{SELECT_COLUMNS}
             WHERE address = ?1
             ORDER BY date DESC, id DESC
             LIMIT ?2"
        ))?;

        let rows = stmt.query_map(params![address, limit], row_to_record)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// The ledger for `address` in provider row form, newest first, ready to
    /// be fed to the record parser.
    pub fn ledger_rows(&self, address: &str, limit: u32) -> Result<Vec<ProviderRow>> {
        Ok(self
            .messages_for_address(address, limit)?
            .iter()
            .map(record_to_provider_row)
            .collect())
    }

    /// Delete every row for a sender. Returns the number of rows removed.
    pub fn remove_messages_for_address(&self, address: &str) -> Result<usize> {
        let affected = self
            .conn()
            .execute("DELETE FROM messages WHERE address = ?1", params![address])?;
        tracing::debug!(%address, removed = affected, "removed messages for address");
        Ok(affected)
    }

    /// Mark every message from `address` as read. Returns the number of rows
    /// that changed.
    pub fn mark_conversation_read(&self, address: &str) -> Result<usize> {
        let affected = self.conn().execute(
            "UPDATE messages SET read = 1 WHERE address = ?1 AND read = 0",
            params![address],
        )?;
        Ok(affected)
    }

    pub fn mark_message_seen(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn()
            .execute("UPDATE messages SET seen = 1 WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Newest inbound messages not yet surfaced to the user.
    pub fn latest_unseen(&self, limit: u32) -> Result<Vec<StoredMessageRecord>> {
        let mut stmt = self.conn().prepare(&format!(
            "{SELECT_COLUMNS}
             WHERE seen = 0 AND type = ?1
             ORDER BY date DESC, id DESC
             LIMIT ?2"
        ))?;

        let rows = stmt.query_map(params![MESSAGE_BOX_INBOX, limit], row_to_record)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// Distinct addresses, most recently active first.
    pub fn addresses(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn().prepare(
            "SELECT address FROM messages
             GROUP BY address
             ORDER BY MAX(date) DESC",
        )?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut addresses = Vec::new();
        for row in rows {
            addresses.push(row?);
        }
        Ok(addresses)
    }

    /// Most recent message for `address`, if any.
    pub fn latest_message(&self, address: &str) -> Result<Option<StoredMessageRecord>> {
        let record = self
            .conn()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE address = ?1 ORDER BY date DESC, id DESC LIMIT 1"),
                params![address],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }
}

pub(crate) fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredMessageRecord> {
    Ok(StoredMessageRecord {
        id: row.get(0)?,
        address: row.get(1)?,
        body: row.get(2)?,
        date_sent: row.get(3)?,
        date: row.get(4)?,
        person_id: row.get(5)?,
        kind: row.get(6)?,
        read: row.get(7)?,
        seen: row.get(8)?,
    })
}

fn record_to_provider_row(record: &StoredMessageRecord) -> ProviderRow {
    ProviderRow::new()
        .with(columns::TRANSPORT_TYPE, "sms")
        .with(columns::ID, record.id)
        .with(columns::ADDRESS, record.address.as_str())
        .with(columns::BODY, record.body.as_str())
        .with(columns::DATE, record.date)
        .with(columns::DATE_SENT, record.date_sent)
        .with(columns::TYPE, record.kind)
        .with(columns::READ, i64::from(record.read))
        .with(columns::SEEN, i64::from(record.seen))
        .with(columns::PERSON, record.person_id.clone())
}
