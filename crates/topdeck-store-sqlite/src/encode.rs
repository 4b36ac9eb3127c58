//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings; event dates and times are ISO 8601; the
//! event size tier round-trips through its strum string form.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use topdeck_core::{Error, Result, event::EventSize};

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::TransactionAborted(format!("corrupt timestamp {s:?}: {e}")))
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::from_str(s)
    .map_err(|e| Error::TransactionAborted(format!("corrupt date {s:?}: {e}")))
}

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::from_str(s)
    .map_err(|e| Error::TransactionAborted(format!("corrupt time {s:?}: {e}")))
}

pub fn encode_size(size: EventSize) -> String {
  size.to_string()
}

pub fn decode_size(s: &str) -> Result<EventSize> {
  EventSize::from_str(s)
    .map_err(|_| Error::TransactionAborted(format!("unknown event size {s:?}")))
}
