//! Native database cells → values the JSON wire encoding can carry.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A cell as decoded from a driver row.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// Wire bytes of a type the driver cannot decode. Never read as text.
    Opaque(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    DateTimeUtc(DateTime<Utc>),
    Decimal(BigDecimal),
    Uuid(uuid::Uuid),
    Json(serde_json::Value),
}

/// A value restricted to null, boolean, integer, float and string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransportValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl From<&str> for TransportValue {
    fn from(s: &str) -> Self {
        TransportValue::Text(s.to_string())
    }
}

/// Convert a native cell. Never fails; bytes and decimals are lossless.
pub fn coerce(value: NativeValue) -> TransportValue {
    match value {
        NativeValue::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => TransportValue::Text(text),
            Err(err) => {
                let bytes = err.into_bytes();
                if let [single] = bytes.as_slice() {
                    TransportValue::Int(i64::from(*single))
                } else {
                    TransportValue::Text(hex::encode(bytes))
                }
            }
        },
        NativeValue::Opaque(bytes) => TransportValue::Text(hex::encode(bytes)),
        NativeValue::Date(d) => TransportValue::Text(d.format("%Y-%m-%d").to_string()),
        NativeValue::Time(t) => TransportValue::Text(t.format("%H:%M:%S%.f").to_string()),
        NativeValue::DateTime(dt) => {
            TransportValue::Text(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }
        NativeValue::DateTimeUtc(dt) => {
            TransportValue::Text(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false))
        }
        NativeValue::Decimal(d) => TransportValue::Text(d.to_string()),
        NativeValue::Null => TransportValue::Null,
        NativeValue::Bool(b) => TransportValue::Bool(b),
        NativeValue::Int(i) => TransportValue::Int(i),
        NativeValue::UInt(u) => TransportValue::UInt(u),
        NativeValue::Float(f) => TransportValue::Float(f),
        NativeValue::Text(s) => TransportValue::Text(s),
        NativeValue::Uuid(u) => TransportValue::Text(u.to_string()),
        NativeValue::Json(v) => match v {
            serde_json::Value::Null => TransportValue::Null,
            serde_json::Value::String(s) => TransportValue::Text(s),
            other => TransportValue::Text(other.to_string()),
        },
    }
}
