//! Content-based dedup on the inbound write path.
//!
//! An incoming message is reconciled against the ledger by its
//! [`DedupKey`]:
//!
//! - no match: insert a fresh row
//! - one match: update that row in place
//! - several matches: delete them all and insert one fresh row
//!
//! A lookup that fails at the storage layer aborts the upsert without
//! writing anything.

use rusqlite::{params, Connection};

use missive_shared::StorageLookupError;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{DedupKey, IncomingMessage};

/// Terminal state of one [`upsert`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted { id: i64 },
    Updated { id: i64 },
    /// `removed` duplicate rows were collapsed into the new row `id`.
    Merged { removed: usize, id: i64 },
    /// The dedup lookup failed; nothing was written.
    Aborted,
}

/// Storage operations the dedup state machine needs.
pub trait MessageLedger {
    /// Row ids sharing `key`.
    fn find_duplicates(&self, key: &DedupKey) -> std::result::Result<Vec<i64>, StorageLookupError>;

    fn insert(&self, message: &IncomingMessage) -> Result<i64>;

    /// Overwrite body, date, address and person reference of row `id`.
    fn update(&self, id: i64, message: &IncomingMessage) -> Result<()>;

    /// Delete every row sharing `key`, returning how many went.
    fn delete_duplicates(&self, key: &DedupKey) -> Result<usize>;
}

/// Reconcile `incoming` against `ledger`.
///
/// Lookup failures are contained here: they are logged and reported as
/// [`UpsertOutcome::Aborted`]. Write failures propagate.
pub fn upsert(ledger: &impl MessageLedger, incoming: &IncomingMessage) -> Result<UpsertOutcome> {
    let key = incoming.dedup_key();

    let matches = match ledger.find_duplicates(&key) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(address = %key.address, error = %e, "dedup lookup failed, upsert aborted");
            return Ok(UpsertOutcome::Aborted);
        }
    };

    let outcome = match matches.as_slice() {
        [] => UpsertOutcome::Inserted {
            id: ledger.insert(incoming)?,
        },
        [id] => {
            ledger.update(*id, incoming)?;
            UpsertOutcome::Updated { id: *id }
        }
        duplicates => {
            tracing::debug!(
                address = %key.address,
                date_sent = key.date_sent,
                duplicates = duplicates.len(),
                "collapsing duplicate rows"
            );
            let removed = ledger.delete_duplicates(&key)?;
            UpsertOutcome::Merged {
                removed,
                id: ledger.insert(incoming)?,
            }
        }
    };

    tracing::debug!(address = %key.address, ?outcome, "upsert finished");
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// SQLite ledger
// ---------------------------------------------------------------------------

/// [`MessageLedger`] over the `messages` table of an open connection.
pub struct SqliteLedger<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteLedger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl MessageLedger for SqliteLedger<'_> {
    fn find_duplicates(&self, key: &DedupKey) -> std::result::Result<Vec<i64>, StorageLookupError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id FROM messages
                 WHERE address = ?1 AND body = ?2 AND date_sent = ?3
                 ORDER BY id",
            )
            .map_err(lookup_error)?;

        let rows = stmt
            .query_map(params![key.address, key.body, key.date_sent], |row| {
                row.get::<_, i64>("id")
            })
            .map_err(lookup_error)?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row.map_err(lookup_error)?);
        }
        Ok(ids)
    }

    fn insert(&self, message: &IncomingMessage) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO messages (address, body, date_sent, date, person)
             VALUES (?1, ?2, ?3, ?3, ?4)",
            params![message.address, message.body, message.date_sent, message.person_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, id: i64, message: &IncomingMessage) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE messages SET body = ?1, date = ?2, address = ?3, person = ?4
             WHERE id = ?5",
            params![
                message.body,
                message.date_sent,
                message.address,
                message.person_id,
                id
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn delete_duplicates(&self, key: &DedupKey) -> Result<usize> {
        let affected = self.conn.execute(
            "DELETE FROM messages WHERE address = ?1 AND body = ?2 AND date_sent = ?3",
            params![key.address, key.body, key.date_sent],
        )?;
        Ok(affected)
    }
}

fn lookup_error(e: rusqlite::Error) -> StorageLookupError {
    match e {
        rusqlite::Error::InvalidColumnName(name) => StorageLookupError::MissingColumn(name),
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.starts_with("no such column") => {
            StorageLookupError::MissingColumn(msg)
        }
        other => StorageLookupError::Backend(other.to_string()),
    }
}

impl Database {
    /// Run [`upsert`] against this database inside a single transaction.
    pub fn upsert_message(&self, incoming: &IncomingMessage) -> Result<UpsertOutcome> {
        let tx = self.conn().unchecked_transaction()?;
        let outcome = upsert(&SqliteLedger::new(&tx), incoming)?;
        tx.commit()?;
        Ok(outcome)
    }
}
