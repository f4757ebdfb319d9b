use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::coerce::TransportValue;
use crate::error::ConfigurationError;

/// Named parameter values as they arrive in `queryParams`.
pub type QueryParams = serde_json::Map<String, serde_json::Value>;

/// Database family whose URL conventions apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    #[default]
    Mysql,
    Postgresql,
    Snowflake,
    Bigquery,
    /// Any other identifier; used verbatim as the URL scheme.
    Other(String),
}

impl Dialect {
    pub fn as_str(&self) -> &str {
        match self {
            Dialect::Mysql => "mysql",
            Dialect::Postgresql => "postgresql",
            Dialect::Snowflake => "snowflake",
            Dialect::Bigquery => "bigquery",
            Dialect::Other(name) => name,
        }
    }
}

impl From<&str> for Dialect {
    fn from(value: &str) -> Self {
        match value {
            "mysql" => Dialect::Mysql,
            "postgresql" => Dialect::Postgresql,
            "snowflake" => Dialect::Snowflake,
            "bigquery" => Dialect::Bigquery,
            other => Dialect::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target database as described by the broker's `connectionObject`.
///
/// Every field is optional on the wire; which ones are required depends on
/// the dialect and is checked by [`crate::dialect::resolve`]. Unknown fields
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConnectionDescriptor {
    #[serde(default, deserialize_with = "deserialize_dialect")]
    pub dialect: Dialect,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    #[serde(default, deserialize_with = "deserialize_port")]
    pub port: Option<String>,
    pub database: Option<String>,
    pub schema: Option<String>,
    pub schemas: Option<Vec<String>>,
    pub warehouse: Option<String>,
    pub role: Option<String>,
}

fn deserialize_dialect<'de, D>(deserializer: D) -> Result<Dialect, D::Error>
where
    D: Deserializer<'de>,
{
    let name: Option<String> = Option::deserialize(deserializer)?;
    Ok(name.as_deref().map(Dialect::from).unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortRepr {
    Number(u64),
    Text(String),
}

// Brokers send the port either as a number or as a string.
fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let port: Option<PortRepr> = Option::deserialize(deserializer)?;
    Ok(port.map(|p| match p {
        PortRepr::Number(n) => n.to_string(),
        PortRepr::Text(s) => s,
    }))
}

// Any JSON value is accepted so a badly typed field still gets a reply.
fn deserialize_request_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn deserialize_query<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => default_query(),
        other => other.to_string(),
    })
}

fn default_query() -> String {
    "SELECT 1".to_string()
}

/// A `sql-query` frame from the broker.
///
/// `queryParams` and `connectionObject` are kept as raw JSON so that a
/// mistyped field fails only this request, with a correlated reply, instead
/// of the whole frame.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    #[serde(default, deserialize_with = "deserialize_request_id")]
    pub request_id: String,
    #[serde(default = "default_query", deserialize_with = "deserialize_query")]
    pub query: String,
    #[serde(rename = "queryParams", default)]
    pub query_params: serde_json::Value,
    #[serde(rename = "connectionObject", default)]
    pub connection: serde_json::Value,
}

impl QueryRequest {
    /// Named parameters; absent or `null` means none.
    pub fn params(&self) -> Result<QueryParams, ConfigurationError> {
        match &self.query_params {
            serde_json::Value::Null => Ok(QueryParams::new()),
            serde_json::Value::Object(map) => Ok(map.clone()),
            other => Err(ConfigurationError::InvalidField {
                field: "queryParams",
                reason: format!("expected an object, got {}", json_kind(other)),
            }),
        }
    }

    pub fn descriptor(&self) -> Result<ConnectionDescriptor, ConfigurationError> {
        if self.connection.is_null() {
            return Ok(ConnectionDescriptor::default());
        }
        ConnectionDescriptor::deserialize(&self.connection).map_err(|err| {
            ConfigurationError::InvalidField {
                field: "connectionObject",
                reason: err.to_string(),
            }
        })
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Result of one request, correlated by `request_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub request_id: String,
    pub success: bool,
    pub message: String,
    pub keys: Vec<String>,
    pub rows: Vec<Vec<TransportValue>>,
    pub rowcount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar_result: Option<TransportValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<String>>,
}

impl QueryResponse {
    /// A failed response: no keys, no rows, rowcount `-1`.
    pub fn failure(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            message: message.into(),
            keys: Vec::new(),
            rows: Vec::new(),
            rowcount: -1,
            scalar_result: None,
            tables: None,
        }
    }
}

/// Frames the broker sends once the session is authenticated.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum InboundFrame {
    #[serde(rename = "sql-query")]
    SqlQuery(QueryRequest),
    #[serde(other)]
    Unrecognized,
}

/// Frames this client sends back to the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundFrame {
    #[serde(rename = "sql-query-result")]
    SqlQueryResult(QueryResponse),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The broker's answer to a [`LoginRequest`]. Both fields are read loosely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginReply {
    #[serde(default)]
    pub success: serde_json::Value,
    #[serde(default)]
    pub message: serde_json::Value,
}

impl LoginReply {
    /// Any truthy `success`: `true`, a non-zero number, a non-empty string,
    /// array or object.
    pub fn is_success(&self) -> bool {
        match &self.success {
            serde_json::Value::Null => false,
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            serde_json::Value::String(s) => !s.is_empty(),
            serde_json::Value::Array(a) => !a.is_empty(),
            serde_json::Value::Object(o) => !o.is_empty(),
        }
    }

    /// The server's message as text; empty when absent.
    pub fn reason(&self) -> String {
        match &self.message {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
