//! Record parser: one provider row in, one [`RawMessage`] out.
//!
//! Rows come from two ledgers with slightly different columns:
//!
//! | ledger | text   | direction | date unit |
//! |--------|--------|-----------|-----------|
//! | SMS    | `body` | `type`    | millis    |
//! | MMS    | `text` | `msg_box` | seconds   |
//!
//! Both carry `address` and `read`. The parser reports what it sees; blank
//! text is filtered later by the merge stage.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{columns, MESSAGE_BOX_SENT};
use crate::error::MalformedRecordError;
use crate::types::{Direction, RawMessage, SourceType};

/// A single provider row: column name to cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderRow(Map<String, Value>);

impl ProviderRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column setter.
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.0.insert(column.to_string(), value.into());
        self
    }

    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        self.0.insert(column.to_string(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    fn required(&self, column: &str) -> Result<&Value, MalformedRecordError> {
        self.0
            .get(column)
            .ok_or_else(|| MalformedRecordError::MissingColumn(column.to_string()))
    }

    /// Integer cell; numeric strings are accepted since some providers
    /// report every column as text.
    fn required_i64(&self, column: &str) -> Result<i64, MalformedRecordError> {
        match self.required(column)? {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| MalformedRecordError::invalid(column, "not an integer")),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| MalformedRecordError::invalid(column, format!("not an integer: {s}"))),
            other => Err(MalformedRecordError::invalid(
                column,
                format!("expected integer, got {other}"),
            )),
        }
    }

    fn required_flag(&self, column: &str) -> Result<bool, MalformedRecordError> {
        match self.required(column)? {
            Value::Bool(b) => Ok(*b),
            _ => self.required_i64(column).map(|v| v != 0),
        }
    }

    /// Text cell; null reads as empty text.
    fn required_text(&self, column: &str) -> Result<String, MalformedRecordError> {
        match self.required(column)? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(MalformedRecordError::invalid(
                column,
                format!("expected text, got {other}"),
            )),
        }
    }
}

impl From<Map<String, Value>> for ProviderRow {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Decide which ledger a row belongs to.
///
/// An explicit `transport_type` wins; otherwise a row with `msg_box` and no
/// `type` is MMS.
pub fn source_type(row: &ProviderRow) -> SourceType {
    match row.get(columns::TRANSPORT_TYPE).and_then(Value::as_str) {
        Some(t) if t.eq_ignore_ascii_case("mms") => SourceType::Mms,
        Some(_) => SourceType::Sms,
        None if row.contains(columns::MSG_BOX) && !row.contains(columns::TYPE) => {
            SourceType::Mms
        }
        None => SourceType::Sms,
    }
}

/// Parse one provider row.
pub fn parse_row(row: &ProviderRow) -> Result<RawMessage, MalformedRecordError> {
    let source = source_type(row);

    let (text_column, box_column) = match source {
        SourceType::Sms => (columns::BODY, columns::TYPE),
        SourceType::Mms => (columns::TEXT, columns::MSG_BOX),
    };

    let text = row.required_text(text_column)?;
    let message_box = row.required_i64(box_column)?;
    let date = row.required_i64(columns::DATE)?;
    let read = row.required_flag(columns::READ)?;
    let sender_address = row.required_text(columns::ADDRESS)?;

    let timestamp_millis = match source {
        SourceType::Sms => date,
        SourceType::Mms => date
            .checked_mul(1000)
            .ok_or_else(|| MalformedRecordError::invalid(columns::DATE, "out of range"))?,
    };

    let direction = if message_box == MESSAGE_BOX_SENT {
        Direction::Outbound
    } else {
        Direction::Inbound
    };

    Ok(RawMessage {
        text,
        timestamp_millis,
        direction,
        read,
        sender_address,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sms_row() -> ProviderRow {
        ProviderRow::new()
            .with(columns::ADDRESS, "555")
            .with(columns::BODY, "hi")
            .with(columns::DATE, 10)
            .with(columns::TYPE, 1)
            .with(columns::READ, 0)
    }

    #[test]
    fn test_parse_sms_inbox() {
        let msg = parse_row(&sms_row()).unwrap();
        assert_eq!(msg.text, "hi");
        assert_eq!(msg.timestamp_millis, 10);
        assert_eq!(msg.direction, Direction::Inbound);
        assert!(!msg.read);
        assert_eq!(msg.sender_address, "555");
        assert_eq!(msg.source, SourceType::Sms);
    }

    #[test]
    fn test_parse_sms_sent() {
        let msg = parse_row(&sms_row().with(columns::TYPE, 2)).unwrap();
        assert_eq!(msg.direction, Direction::Outbound);
    }

    #[test]
    fn test_parse_mms_scales_seconds() {
        let row = ProviderRow::new()
            .with(columns::TRANSPORT_TYPE, "mms")
            .with(columns::ADDRESS, "555")
            .with(columns::TEXT, "pic")
            .with(columns::DATE, 7)
            .with(columns::MSG_BOX, 1)
            .with(columns::READ, 1);

        let msg = parse_row(&row).unwrap();
        assert_eq!(msg.source, SourceType::Mms);
        assert_eq!(msg.timestamp_millis, 7000);
        assert!(msg.read);
    }

    #[test]
    fn test_mms_detected_by_msg_box() {
        let row = ProviderRow::new().with(columns::MSG_BOX, 2);
        assert_eq!(source_type(&row), SourceType::Mms);
    }

    #[test]
    fn test_null_text_is_empty() {
        let msg = parse_row(&sms_row().with(columns::BODY, Value::Null)).unwrap();
        assert_eq!(msg.text, "");
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let row = sms_row()
            .with(columns::DATE, "42")
            .with(columns::READ, true);
        let msg = parse_row(&row).unwrap();
        assert_eq!(msg.timestamp_millis, 42);
        assert!(msg.read);
    }

    #[test]
    fn test_missing_column() {
        let mut row = ProviderRow::new()
            .with(columns::BODY, "hi")
            .with(columns::TYPE, 1)
            .with(columns::READ, 0);
        row.set(columns::ADDRESS, "555");

        assert_eq!(
            parse_row(&row),
            Err(MalformedRecordError::MissingColumn(columns::DATE.to_string()))
        );
    }

    #[test]
    fn test_invalid_date() {
        let err = parse_row(&sms_row().with(columns::DATE, "yesterday")).unwrap_err();
        assert!(matches!(err, MalformedRecordError::InvalidValue { .. }));
    }
}
