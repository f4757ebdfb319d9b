//! Runs one `sql-query` request against its target and builds the response.

use std::sync::Arc;

use tracing::{error, info};

use crate::coerce::{coerce, TransportValue};
use crate::db::{DatabaseEngine, StatementOutcome};
use crate::dialect;
use crate::error::QueryError;
use crate::models::{QueryRequest, QueryResponse};
use crate::notify::{NotificationEvent, Notifier};

/// Query texts answered with the schema's table list as well.
const TABLE_LISTING_QUERIES: &[&str] = &[
    "select 1",
    "show tables",
    "select table_name from information_schema.tables",
];

fn normalize(query: &str) -> String {
    let joined = query.split_whitespace().collect::<Vec<_>>().join(" ");
    joined.trim_end_matches(';').trim_end().to_lowercase()
}

/// Case-insensitive, whitespace-normalized match against the fixed set.
pub fn is_table_listing(query: &str) -> bool {
    let normalized = normalize(query);
    TABLE_LISTING_QUERIES.contains(&normalized.as_str())
}

pub struct QueryExecutor {
    engine: Arc<dyn DatabaseEngine>,
    notifier: Notifier,
}

impl QueryExecutor {
    pub fn new(engine: Arc<dyn DatabaseEngine>, notifier: Notifier) -> Self {
        Self { engine, notifier }
    }

    /// Always returns a response; per-request failures become `success=false`.
    pub async fn execute(&self, request: &QueryRequest) -> QueryResponse {
        self.notifier.notify(NotificationEvent::SqlExecutionInfo {
            message: format!("Executing query: {}", request.query),
            request_id: request.request_id.clone(),
            query: request.query.clone(),
            params: request.params().unwrap_or_default(),
        });

        match self.run(request).await {
            Ok(response) => {
                let verb = if response.keys.is_empty() {
                    "affected"
                } else {
                    "returned"
                };
                info!(request_id = %request.request_id, rowcount = response.rowcount, "query succeeded");
                self.notifier.notify(NotificationEvent::SqlSuccess {
                    message: format!("SQL Success: {} row(s) {}.", response.rowcount, verb),
                });
                response
            }
            Err(err) => {
                let message = err.to_string();
                error!("Query error: request_id={} error={}", request.request_id, message);
                self.notifier.notify(NotificationEvent::SqlError {
                    message: format!("SQL Error: {message}"),
                });
                QueryResponse::failure(&request.request_id, message)
            }
        }
    }

    /// Close every database pool opened on behalf of the broker.
    pub async fn release_connections(&self) {
        self.engine.close_all().await;
    }

    async fn run(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        let target = dialect::resolve(&request.descriptor()?)?;
        let params = request.params()?;
        let outcome = self.engine.execute(&target, &request.query, &params).await?;

        let mut response = QueryResponse {
            request_id: request.request_id.clone(),
            success: true,
            message: "Query executed successfully".to_string(),
            keys: Vec::new(),
            rows: Vec::new(),
            rowcount: -1,
            scalar_result: None,
            tables: None,
        };

        match outcome {
            StatementOutcome::Rows {
                columns,
                rows,
                rowcount,
            } => {
                let rows: Vec<Vec<TransportValue>> = rows
                    .into_iter()
                    .map(|row| row.into_iter().map(coerce).collect())
                    .collect();
                response.rowcount = rowcount
                    .and_then(|n| i64::try_from(n).ok())
                    .unwrap_or(rows.len() as i64);
                if let [row] = rows.as_slice() {
                    if let [value] = row.as_slice() {
                        response.scalar_result = Some(value.clone());
                    }
                }
                response.keys = columns;
                response.rows = rows;
            }
            StatementOutcome::Affected { rowcount } => {
                response.rowcount = rowcount.and_then(|n| i64::try_from(n).ok()).unwrap_or(-1);
            }
        }

        if is_table_listing(&request.query) {
            response.tables = Some(self.engine.list_tables(&target).await?);
        }

        Ok(response)
    }
}
