//! Connection descriptor → connection URL and engine options, per dialect.

use std::collections::BTreeMap;

use crate::error::ConfigurationError;
use crate::models::{ConnectionDescriptor, Dialect};

/// Session option carrying the PostgreSQL schema search path.
pub const SEARCH_PATH: &str = "search_path";

/// Engine-specific connection options, keyed by option name.
pub type ConnectOptions = BTreeMap<String, String>;

/// Output of [`resolve`]: everything the engine needs to open a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConnection {
    pub dialect: Dialect,
    pub url: String,
    pub options: ConnectOptions,
}

impl ResolvedConnection {
    pub fn search_path(&self) -> Option<&str> {
        self.options.get(SEARCH_PATH).map(String::as_str)
    }

    /// The URL with the password replaced, for logging.
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        match (rest.find(':'), rest.rfind('@')) {
            (Some(colon), Some(at)) if colon < at => {
                format!("{}://{}:***{}", scheme, &rest[..colon], &rest[at..])
            }
            _ => self.url.clone(),
        }
    }

    /// Options rendered as `key=value` pairs, space separated.
    pub fn render_options(&self) -> String {
        self.options
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Fields a server-style dialect needs, in the order they are reported.
struct ServerFields<'a> {
    user: &'a str,
    password: &'a str,
    host: &'a str,
    port: &'a str,
    database: &'a str,
}

fn server_fields(desc: &ConnectionDescriptor) -> Result<ServerFields<'_>, ConfigurationError> {
    let candidates = [
        ("user", desc.user.as_deref()),
        ("password", desc.password.as_deref()),
        ("host", desc.host.as_deref()),
        ("port", desc.port.as_deref()),
        ("database", desc.database.as_deref()),
    ];
    let missing: Vec<&'static str> = candidates
        .iter()
        .filter(|(_, v)| v.is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ConfigurationError::MissingFields {
            dialect: desc.dialect.to_string(),
            fields: missing,
        });
    }
    Ok(ServerFields {
        user: desc.user.as_deref().unwrap_or_default(),
        password: desc.password.as_deref().unwrap_or_default(),
        host: desc.host.as_deref().unwrap_or_default(),
        port: desc.port.as_deref().unwrap_or_default(),
        database: desc.database.as_deref().unwrap_or_default(),
    })
}

fn server_url(scheme: &str, f: &ServerFields<'_>) -> String {
    format!(
        "{}://{}:{}@{}:{}/{}",
        scheme, f.user, f.password, f.host, f.port, f.database
    )
}

/// `schemas` (non-empty) wins over `schema`; the plural form is quoted.
fn postgres_search_path(desc: &ConnectionDescriptor) -> Option<String> {
    match desc.schemas.as_deref() {
        Some(schemas) if !schemas.is_empty() => Some(
            schemas
                .iter()
                .map(|s| format!("\"{s}\""))
                .collect::<Vec<_>>()
                .join(","),
        ),
        _ => desc.schema.clone(),
    }
}

/// Build the connection URL and options for `desc`.
///
/// Fails when a field the dialect requires is absent; a partial URL is never
/// produced.
pub fn resolve(desc: &ConnectionDescriptor) -> Result<ResolvedConnection, ConfigurationError> {
    let mut options = ConnectOptions::new();
    let url = match &desc.dialect {
        Dialect::Mysql => server_url("mysql", &server_fields(desc)?),
        Dialect::Postgresql => {
            let url = server_url("postgresql", &server_fields(desc)?);
            if let Some(path) = postgres_search_path(desc) {
                options.insert(SEARCH_PATH.to_string(), path);
            }
            url
        }
        Dialect::Snowflake => {
            let mut url = server_url("snowflake", &server_fields(desc)?);
            let query: Vec<String> = [
                ("schema", desc.schema.as_deref()),
                ("warehouse", desc.warehouse.as_deref()),
                ("role", desc.role.as_deref()),
            ]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| format!("{k}={v}")))
            .collect();
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query.join("&"));
            }
            url
        }
        // Credentials travel out of band; host duplicates the project id.
        Dialect::Bigquery => {
            let Some(project) = desc.database.as_deref() else {
                return Err(ConfigurationError::MissingFields {
                    dialect: desc.dialect.to_string(),
                    fields: vec!["database"],
                });
            };
            match desc.schema.as_deref() {
                Some(dataset) => format!("bigquery://{project}/{dataset}"),
                None => format!("bigquery://{project}"),
            }
        }
        Dialect::Other(scheme) => server_url(scheme, &server_fields(desc)?),
    };

    Ok(ResolvedConnection {
        dialect: desc.dialect.clone(),
        url,
        options,
    })
}
