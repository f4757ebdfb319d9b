use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Executor, MySql, Row, Statement, TypeInfo};

use crate::coerce::NativeValue;
use crate::config::PoolSettings;
use crate::db::params::{rewrite, PlaceholderStyle};
use crate::db::{DatabaseDriver, StatementOutcome};
use crate::dialect::ResolvedConnection;
use crate::error::EngineError;
use crate::models::QueryParams;

pub struct MySqlDriver {
    pool: Option<sqlx::MySqlPool>,
}

impl MySqlDriver {
    pub fn new() -> Self {
        Self { pool: None }
    }

    fn pool(&self) -> Result<&sqlx::MySqlPool, EngineError> {
        self.pool
            .as_ref()
            .ok_or(EngineError::PoolClosed)
    }
}

#[async_trait]
impl DatabaseDriver for MySqlDriver {
    async fn connect(
        &mut self,
        target: &ResolvedConnection,
        settings: &PoolSettings,
    ) -> Result<(), EngineError> {
        let options = MySqlConnectOptions::from_str(&target.url)?;

        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout())
            .connect_with(options)
            .await?;

        self.pool = Some(pool);
        Ok(())
    }

    async fn query(&self, sql: &str, params: &QueryParams) -> Result<StatementOutcome, EngineError> {
        let pool = self.pool()?;
        let stmt = rewrite(sql, params, PlaceholderStyle::Question)?;
        let mut conn = pool.acquire().await?;

        let columns: Vec<String> = (&mut *conn)
            .prepare(&stmt.sql)
            .await?
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut query = sqlx::query(&stmt.sql);
        for value in &stmt.values {
            query = bind_value(query, value);
        }

        if columns.is_empty() {
            let result = query.execute(&mut *conn).await?;
            return Ok(StatementOutcome::Affected {
                rowcount: Some(result.rows_affected()),
            });
        }

        let rows = query
            .fetch_all(&mut *conn)
            .await?
            .iter()
            .map(|row| {
                (0..row.columns().len())
                    .map(|i| map_mysql_value(row, i))
                    .collect()
            })
            .collect();

        Ok(StatementOutcome::Rows {
            columns,
            rows,
            rowcount: None,
        })
    }

    async fn get_tables(&self) -> Result<Vec<String>, EngineError> {
        let pool = self.pool()?;
        let rows = sqlx::query(
            "SELECT CAST(table_name AS CHAR) AS table_name FROM information_schema.tables \
             WHERE table_schema = DATABASE() ORDER BY table_name",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.iter().map(|row| row.get("table_name")).collect())
    }

    async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &serde_json::Value,
) -> Query<'q, MySql, MySqlArguments> {
    use serde_json::Value;
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => query.bind(i),
            (None, Some(u), _) => query.bind(u),
            (None, None, Some(f)) => query.bind(f),
            _ => query.bind(n.to_string()),
        },
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(sqlx::types::Json(other.clone())),
    }
}

fn map_mysql_value(row: &MySqlRow, index: usize) -> NativeValue {
    use sqlx::ValueRef;
    let value_ref = match row.try_get_raw(index) {
        Ok(v) => v,
        Err(_) => return NativeValue::Null,
    };

    if value_ref.is_null() {
        return NativeValue::Null;
    }

    let type_info = value_ref.type_info();
    let type_name = type_info.name();

    let decoded = match type_name {
        "BOOLEAN" => row.try_get(index).ok().map(NativeValue::Bool),
        name if name.ends_with("UNSIGNED") => row.try_get(index).ok().map(NativeValue::UInt),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get(index).ok().map(NativeValue::Int)
        }
        "YEAR" => row.try_get_unchecked(index).ok().map(NativeValue::Int),
        "FLOAT" => row.try_get::<f32, _>(index).ok().map(|v| NativeValue::Float(v.into())),
        "DOUBLE" => row.try_get(index).ok().map(NativeValue::Float),
        "DECIMAL" => row
            .try_get::<bigdecimal::BigDecimal, _>(index)
            .ok()
            .map(NativeValue::Decimal),
        "DATE" => row.try_get::<NaiveDate, _>(index).ok().map(NativeValue::Date),
        "TIME" => row.try_get::<NaiveTime, _>(index).ok().map(NativeValue::Time),
        "DATETIME" => row
            .try_get::<NaiveDateTime, _>(index)
            .ok()
            .map(NativeValue::DateTime),
        "TIMESTAMP" => row
            .try_get::<DateTime<Utc>, _>(index)
            .ok()
            .map(NativeValue::DateTimeUtc),
        "JSON" => row
            .try_get::<serde_json::Value, _>(index)
            .ok()
            .map(NativeValue::Json),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
        | "GEOMETRY" => row.try_get(index).ok().map(NativeValue::Bytes),
        _ => row.try_get::<String, _>(index).ok().map(NativeValue::Text),
    };

    decoded.unwrap_or_else(|| {
        row.try_get_unchecked::<Vec<u8>, _>(index)
            .map(NativeValue::Bytes)
            .unwrap_or(NativeValue::Null)
    })
}
