/// Application name
pub const APP_NAME: &str = "Missive";

/// Default number of messages kept when merging a conversation
pub const DEFAULT_CONVERSATION_LIMIT: usize = 10;

/// Number of participant names shown in a conversation title
pub const MAX_TITLE_NAMES: usize = 3;

/// Separator between participant names in a conversation title
pub const TITLE_DELIMITER: &str = ", ";

/// Default "+K more" suffix; `{count}` is replaced with K
pub const DEFAULT_OVERFLOW_TEMPLATE: &str = " +{count} more";

/// Unread counts above this render as "10+"
pub const MAX_UNREAD_COUNT: usize = 10;

/// Provider box value for a sent message (SMS `type`, MMS `msg_box`)
pub const MESSAGE_BOX_SENT: i64 = 2;

/// Provider box value for a received message
pub const MESSAGE_BOX_INBOX: i64 = 1;

/// Ledger column names
pub mod columns {
    pub const ID: &str = "_id";
    pub const ADDRESS: &str = "address";
    pub const BODY: &str = "body";
    pub const TEXT: &str = "text";
    pub const DATE: &str = "date";
    pub const DATE_SENT: &str = "date_sent";
    pub const TYPE: &str = "type";
    pub const MSG_BOX: &str = "msg_box";
    pub const READ: &str = "read";
    pub const SEEN: &str = "seen";
    pub const PERSON: &str = "person";
    pub const TRANSPORT_TYPE: &str = "transport_type";
}
