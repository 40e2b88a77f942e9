//! Rows persisted in the local ledger.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! straight to a UI or dumped as JSON.

use serde::{Deserialize, Serialize};

use missive_shared::constants::MESSAGE_BOX_SENT;

// ---------------------------------------------------------------------------
// Stored message
// ---------------------------------------------------------------------------

/// A message row in the local ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredMessageRecord {
    pub id: i64,
    pub address: String,
    pub body: String,
    /// Epoch millis reported by the sender; part of the dedup key.
    pub date_sent: i64,
    /// Epoch millis used for ordering.
    pub date: i64,
    /// Contact reference of the sender, if resolved.
    pub person_id: Option<String>,
    /// Provider box value (1 inbox, 2 sent).
    pub kind: i64,
    pub read: bool,
    pub seen: bool,
}

impl StoredMessageRecord {
    pub fn is_sent(&self) -> bool {
        self.kind == MESSAGE_BOX_SENT
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            address: self.address.clone(),
            body: self.body.clone(),
            date_sent: self.date_sent,
        }
    }
}

// ---------------------------------------------------------------------------
// Dedup key
// ---------------------------------------------------------------------------

/// Rows sharing `(address, body, date_sent)` are the same logical message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub address: String,
    pub body: String,
    pub date_sent: i64,
}

// ---------------------------------------------------------------------------
// Incoming message
// ---------------------------------------------------------------------------

/// An inbound message event to reconcile against the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncomingMessage {
    pub address: String,
    pub body: String,
    pub date_sent: i64,
    #[serde(default)]
    pub person_id: Option<String>,
}

impl IncomingMessage {
    pub fn new(address: impl Into<String>, body: impl Into<String>, date_sent: i64) -> Self {
        Self {
            address: address.into(),
            body: body.into(),
            date_sent,
            person_id: None,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            address: self.address.clone(),
            body: self.body.clone(),
            date_sent: self.date_sent,
        }
    }
}
