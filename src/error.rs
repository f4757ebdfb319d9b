//! Error taxonomy for the tunnel.
//!
//! Per-request failures (`ConfigurationError`, `EngineError`) are folded into a
//! failed `QueryResponse` by the executor. Only `TransportError` ends a session.

/// The connection descriptor cannot produce a connection URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// One or more fields required by the dialect are absent.
    #[error("missing required connection field(s) for {dialect}: {}", fields.join(", "))]
    MissingFields {
        dialect: String,
        fields: Vec<&'static str>,
    },

    /// A request field is present but has the wrong shape.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// The database engine rejected or failed a statement.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// No driver is linked for the resolved URL scheme.
    #[error("no database driver available for dialect '{0}'")]
    UnsupportedDialect(String),

    /// A `:name` placeholder has no bound value.
    #[error("A value is required for bind parameter '{0}'")]
    MissingParameter(String),

    /// A bound value cannot be converted to the type the database expects.
    #[error("Invalid value for bind parameter '{name}' ({type_name}): {reason}")]
    InvalidParameter {
        name: String,
        type_name: String,
        reason: String,
    },

    /// The driver was used before its pool was opened, or after it was closed.
    #[error("database pool is not open")]
    PoolClosed,
}

/// Per-request failure; its text becomes the response message.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Execution(#[from] EngineError),
}

/// Failure of the tunnel connection itself. Fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("connection closed by peer")]
    Closed,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections and failures surfaced by the session commands.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Already connected. Disconnect first if needed.")]
    AlreadyConnected,

    #[error("Not connected")]
    NotConnected,

    #[error("Missing username or password")]
    MissingCredentials,

    #[error("Login failed: {0}")]
    Authentication(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_every_field() {
        let err = ConfigurationError::MissingFields {
            dialect: "postgresql".into(),
            fields: vec!["user", "port"],
        };
        assert_eq!(
            err.to_string(),
            "missing required connection field(s) for postgresql: user, port"
        );
    }

    #[test]
    fn invalid_field_names_the_field() {
        let err = QueryError::from(ConfigurationError::InvalidField {
            field: "connectionObject",
            reason: "invalid type: string \"sales\", expected a sequence".into(),
        });
        assert_eq!(
            err.to_string(),
            "invalid connectionObject: invalid type: string \"sales\", expected a sequence"
        );
    }

    #[test]
    fn pool_closed_is_not_a_url_error() {
        assert_eq!(EngineError::PoolClosed.to_string(), "database pool is not open");
    }

    #[test]
    fn query_error_is_transparent() {
        let err = QueryError::from(EngineError::UnsupportedDialect("snowflake".into()));
        assert_eq!(
            err.to_string(),
            "no database driver available for dialect 'snowflake'"
        );
    }

    #[test]
    fn authentication_display() {
        let err = SessionError::Authentication("bad password".into());
        assert_eq!(err.to_string(), "Login failed: bad password");
    }
}
