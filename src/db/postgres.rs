use std::str::FromStr;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use ipnetwork::IpNetwork;
use mac_address::MacAddress;
use serde_json::Value;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::types::{Oid, PgInterval, PgTimeTz};
use sqlx::postgres::{
    PgArgumentBuffer, PgArguments, PgConnectOptions, PgPoolOptions, PgRow, PgTypeInfo, PgTypeKind,
};
use sqlx::query::Query;
use sqlx::{Column, Either, Encode, Executor, Postgres, Row, Statement, Type, TypeInfo};

use crate::coerce::NativeValue;
use crate::config::PoolSettings;
use crate::db::params::{rewrite, PlaceholderStyle};
use crate::db::{DatabaseDriver, StatementOutcome};
use crate::dialect::{ResolvedConnection, SEARCH_PATH};
use crate::error::EngineError;
use crate::models::QueryParams;

pub struct PostgresDriver {
    pool: Option<sqlx::PgPool>,
}

impl PostgresDriver {
    pub fn new() -> Self {
        Self { pool: None }
    }

    fn pool(&self) -> Result<&sqlx::PgPool, EngineError> {
        self.pool
            .as_ref()
            .ok_or(EngineError::PoolClosed)
    }
}

#[async_trait]
impl DatabaseDriver for PostgresDriver {
    async fn connect(
        &mut self,
        target: &ResolvedConnection,
        settings: &PoolSettings,
    ) -> Result<(), EngineError> {
        let mut options = PgConnectOptions::from_str(&target.url)?;
        if let Some(path) = target.search_path() {
            options = options.options([(SEARCH_PATH, path)]);
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout())
            .connect_with(options)
            .await?;

        self.pool = Some(pool);
        Ok(())
    }

    async fn query(&self, sql: &str, params: &QueryParams) -> Result<StatementOutcome, EngineError> {
        let pool = self.pool()?;
        let stmt = rewrite(sql, params, PlaceholderStyle::Dollar)?;
        let mut conn = pool.acquire().await?;

        let prepared = (&mut *conn).prepare(&stmt.sql).await?;
        let columns: Vec<String> = prepared
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let declared: &[PgTypeInfo] = match prepared.parameters() {
            Some(Either::Left(types)) => types,
            _ => &[],
        };

        let mut query = sqlx::query(&stmt.sql);
        for (position, value) in stmt.values.iter().enumerate() {
            let ty = declared.get(position);
            let (type_name, text_encoded) = ty.map(declared_shape).unwrap_or(("", false));
            let param = pg_param(value, type_name, text_encoded).map_err(|reason| {
                EngineError::InvalidParameter {
                    name: stmt.names[position].clone(),
                    type_name: type_name.to_lowercase(),
                    reason,
                }
            })?;
            query = bind_param(query, param, ty);
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
                    .map(|i| map_postgres_value(row, i))
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
        // current_schema() is the first existing entry of the search path.
        let rows = sqlx::query(
            "SELECT table_name::text AS table_name FROM information_schema.tables \
             WHERE table_schema = current_schema() ORDER BY table_name",
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

/// One parameter converted for the type Postgres inferred at its position.
#[derive(Debug, Clone, PartialEq)]
enum PgParam {
    /// NULL or raw text, sent under the inferred type itself.
    Declared(Option<String>),
    Bool(bool),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
    Numeric(BigDecimal),
    Text(String),
    Uuid(uuid::Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Timestamptz(DateTime<Utc>),
    Inet(IpNetwork),
    MacAddr(MacAddress),
    Json(Value),
}

/// Text bytes (or NULL) labelled with a type taken from the prepared
/// statement. Only valid for types whose binary form is their text form.
struct DeclaredText {
    text: Option<String>,
    type_info: PgTypeInfo,
}

impl Type<Postgres> for DeclaredText {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }
}

impl Encode<'_, Postgres> for DeclaredText {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        match &self.text {
            Some(text) => <&str as Encode<Postgres>>::encode(text.as_str(), buf),
            None => Ok(IsNull::Yes),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(self.type_info.clone())
    }
}

const TEXT_TYPES: &[&str] = &["TEXT", "VARCHAR", "BPCHAR", "NAME", "citext"];

/// The type name to convert for, and whether values travel as plain text.
fn declared_shape(ty: &PgTypeInfo) -> (&str, bool) {
    match ty.kind() {
        PgTypeKind::Enum(_) => (ty.name(), true),
        PgTypeKind::Domain(base) => (base.name(), TEXT_TYPES.contains(&base.name())),
        _ => (ty.name(), false),
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_text<T>(value: &Value) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let text = plain_text(value);
    text.trim().parse().map_err(|err| format!("{text:?}: {err}"))
}

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_time(text: &str) -> Result<NaiveTime, String> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text.trim(), fmt).ok())
        .ok_or_else(|| format!("{text:?} is not a time"))
}

fn parse_naive_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn parse_with_offset(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| text.parse::<DateTime<FixedOffset>>())
        .ok()
}

// An offset, if given, is dropped: Postgres does the same for `timestamp`.
fn parse_timestamp(text: &str) -> Result<NaiveDateTime, String> {
    parse_with_offset(text)
        .map(|dt| dt.naive_local())
        .or_else(|| parse_naive_datetime(text))
        .ok_or_else(|| format!("{text:?} is not a timestamp"))
}

// Values without an offset are taken as UTC.
fn parse_timestamptz(text: &str) -> Result<DateTime<Utc>, String> {
    parse_with_offset(text)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| parse_naive_datetime(text).map(|dt| dt.and_utc()))
        .ok_or_else(|| format!("{text:?} is not a timestamp"))
}

/// Bind shape for a value whose parameter type is unknown or has no
/// dedicated conversion.
fn untyped(value: &Value) -> PgParam {
    match value {
        Value::Null => PgParam::Declared(None),
        Value::Bool(b) => PgParam::Bool(*b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => PgParam::Int8(i),
            (None, Some(f)) => PgParam::Float8(f),
            _ => PgParam::Text(n.to_string()),
        },
        Value::String(s) => PgParam::Text(s.clone()),
        other => PgParam::Json(other.clone()),
    }
}

/// Convert a JSON parameter for the type Postgres inferred for it.
///
/// Strings are parsed the way the server would parse a literal of that type,
/// so `WHERE created_at > :since` works with an ISO string.
fn pg_param(value: &Value, type_name: &str, text_encoded: bool) -> Result<PgParam, String> {
    if value.is_null() {
        return Ok(PgParam::Declared(None));
    }
    if text_encoded {
        return Ok(PgParam::Declared(Some(plain_text(value))));
    }

    Ok(match type_name {
        "BOOL" => PgParam::Bool(parse_text(value)?),
        "INT2" => PgParam::Int2(parse_text(value)?),
        "INT4" => PgParam::Int4(parse_text(value)?),
        "INT8" => PgParam::Int8(parse_text(value)?),
        "FLOAT4" => PgParam::Float4(parse_text(value)?),
        "FLOAT8" => PgParam::Float8(parse_text(value)?),
        "NUMERIC" => PgParam::Numeric(parse_text(value)?),
        "UUID" => PgParam::Uuid(parse_text(value)?),
        "DATE" => PgParam::Date(parse_text(value)?),
        "TIME" => PgParam::Time(parse_time(&plain_text(value))?),
        "TIMESTAMP" => PgParam::Timestamp(parse_timestamp(&plain_text(value))?),
        "TIMESTAMPTZ" => PgParam::Timestamptz(parse_timestamptz(&plain_text(value))?),
        "INET" | "CIDR" => PgParam::Inet(parse_text(value)?),
        "MACADDR" => PgParam::MacAddr(parse_text(value)?),
        "JSON" | "JSONB" => PgParam::Json(value.clone()),
        name if TEXT_TYPES.contains(&name) => PgParam::Text(plain_text(value)),
        _ => untyped(value),
    })
}

fn bind_param<'q>(
    query: Query<'q, Postgres, PgArguments>,
    param: PgParam,
    declared: Option<&PgTypeInfo>,
) -> Query<'q, Postgres, PgArguments> {
    match param {
        PgParam::Declared(text) => match declared {
            Some(ty) => query.bind(DeclaredText {
                text,
                type_info: ty.clone(),
            }),
            None => query.bind(text),
        },
        PgParam::Bool(v) => query.bind(v),
        PgParam::Int2(v) => query.bind(v),
        PgParam::Int4(v) => query.bind(v),
        PgParam::Int8(v) => query.bind(v),
        PgParam::Float4(v) => query.bind(v),
        PgParam::Float8(v) => query.bind(v),
        PgParam::Numeric(v) => query.bind(v),
        PgParam::Text(v) => query.bind(v),
        PgParam::Uuid(v) => query.bind(v),
        PgParam::Date(v) => query.bind(v),
        PgParam::Time(v) => query.bind(v),
        PgParam::Timestamp(v) => query.bind(v),
        PgParam::Timestamptz(v) => query.bind(v),
        PgParam::Inet(v) => query.bind(v),
        PgParam::MacAddr(v) => query.bind(v),
        PgParam::Json(v) => query.bind(sqlx::types::Json(v)),
    }
}

/// Postgres text form of an interval, e.g. `1 year 2 mons 3 days 04:05:06.5`.
fn format_interval(interval: &PgInterval) -> String {
    fn unit(n: i64, singular: &str, plural: &str) -> String {
        format!("{n} {}", if n == 1 { singular } else { plural })
    }

    let years = i64::from(interval.months / 12);
    let months = i64::from(interval.months % 12);
    let mut parts = Vec::new();
    if years != 0 {
        parts.push(unit(years, "year", "years"));
    }
    if months != 0 {
        parts.push(unit(months, "mon", "mons"));
    }
    if interval.days != 0 {
        parts.push(unit(interval.days.into(), "day", "days"));
    }

    let micros = interval.microseconds;
    if micros != 0 || parts.is_empty() {
        let sign = if micros < 0 { "-" } else { "" };
        let total = micros.unsigned_abs();
        let (hours, rest) = (total / 3_600_000_000, total % 3_600_000_000);
        let (minutes, rest) = (rest / 60_000_000, rest % 60_000_000);
        let (seconds, fraction) = (rest / 1_000_000, rest % 1_000_000);
        let mut clock = format!("{sign}{hours:02}:{minutes:02}:{seconds:02}");
        if fraction != 0 {
            let digits = format!("{fraction:06}");
            clock.push('.');
            clock.push_str(digits.trim_end_matches('0'));
        }
        parts.push(clock);
    }
    parts.join(" ")
}

/// `inet` prints a host address without its full-length prefix; `cidr` always
/// keeps it.
fn format_network(network: IpNetwork, always_prefix: bool) -> String {
    let full = if network.is_ipv4() { 32 } else { 128 };
    if !always_prefix && network.prefix() == full {
        network.ip().to_string()
    } else {
        network.to_string()
    }
}

/// NaN and the infinities have no `BigDecimal` form; read them off the
/// binary header's sign word.
fn numeric_special(bytes: &[u8]) -> Option<&'static str> {
    match bytes.get(4..6)? {
        [0xC0, 0x00] => Some("NaN"),
        [0xD0, 0x00] => Some("Infinity"),
        [0xF0, 0x00] => Some("-Infinity"),
        _ => None,
    }
}

fn map_postgres_value(row: &PgRow, index: usize) -> NativeValue {
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
        "BOOL" => row.try_get(index).ok().map(NativeValue::Bool),
        "INT2" => row.try_get::<i16, _>(index).ok().map(|v| NativeValue::Int(v.into())),
        "INT4" => row.try_get::<i32, _>(index).ok().map(|v| NativeValue::Int(v.into())),
        "INT8" => row.try_get(index).ok().map(NativeValue::Int),
        "FLOAT4" => row.try_get::<f32, _>(index).ok().map(|v| NativeValue::Float(v.into())),
        "FLOAT8" => row.try_get(index).ok().map(NativeValue::Float),
        "TEXT" | "VARCHAR" | "CHAR" | "NAME" | "BPCHAR" => {
            row.try_get(index).ok().map(NativeValue::Text)
        }
        "BYTEA" => row.try_get(index).ok().map(NativeValue::Bytes),
        "UUID" => row.try_get(index).ok().map(NativeValue::Uuid),
        "TIMESTAMPTZ" => row
            .try_get::<DateTime<Utc>, _>(index)
            .ok()
            .map(NativeValue::DateTimeUtc),
        "TIMESTAMP" => row
            .try_get::<NaiveDateTime, _>(index)
            .ok()
            .map(NativeValue::DateTime),
        "DATE" => row.try_get::<NaiveDate, _>(index).ok().map(NativeValue::Date),
        "TIME" => row.try_get::<NaiveTime, _>(index).ok().map(NativeValue::Time),
        "NUMERIC" => row
            .try_get::<BigDecimal, _>(index)
            .ok()
            .map(NativeValue::Decimal)
            .or_else(|| {
                let special = numeric_special(value_ref.as_bytes().ok()?)?;
                Some(NativeValue::Text(special.to_string()))
            }),
        "OID" => row
            .try_get::<Oid, _>(index)
            .ok()
            .map(|oid| NativeValue::Int(oid.0.into())),
        "INET" | "CIDR" => row
            .try_get::<IpNetwork, _>(index)
            .ok()
            .map(|net| NativeValue::Text(format_network(net, type_name == "CIDR"))),
        "MACADDR" => row
            .try_get::<MacAddress, _>(index)
            .ok()
            .map(|mac| NativeValue::Text(mac.to_string().to_lowercase())),
        "INTERVAL" => row
            .try_get::<PgInterval, _>(index)
            .ok()
            .map(|v| NativeValue::Text(format_interval(&v))),
        "TIMETZ" => row
            .try_get::<PgTimeTz<NaiveTime, FixedOffset>, _>(index)
            .ok()
            .map(|v| NativeValue::Text(format!("{}{}", v.time.format("%H:%M:%S%.f"), v.offset))),
        "MONEY" => {
            // MONEY is a 64-bit count of cents; decode the raw bytes directly.
            value_ref.as_bytes().ok().and_then(|bytes| {
                let cents = i64::from_be_bytes(bytes.try_into().ok()?);
                let amount = BigDecimal::new(cents.into(), 2);
                Some(NativeValue::Decimal(amount))
            })
        }
        "JSON" | "JSONB" => row
            .try_get::<serde_json::Value, _>(index)
            .ok()
            .map(NativeValue::Json),
        "TEXT[]" | "VARCHAR[]" | "CHAR[]" | "NAME[]" => row
            .try_get::<Vec<String>, _>(index)
            .ok()
            .map(|v| NativeValue::Json(serde_json::json!(v))),
        "INT2[]" => row
            .try_get::<Vec<i16>, _>(index)
            .ok()
            .map(|v| NativeValue::Json(serde_json::json!(v))),
        "INT4[]" => row
            .try_get::<Vec<i32>, _>(index)
            .ok()
            .map(|v| NativeValue::Json(serde_json::json!(v))),
        "INT8[]" => row
            .try_get::<Vec<i64>, _>(index)
            .ok()
            .map(|v| NativeValue::Json(serde_json::json!(v))),
        "FLOAT4[]" => row
            .try_get::<Vec<f32>, _>(index)
            .ok()
            .map(|v| NativeValue::Json(serde_json::json!(v))),
        "FLOAT8[]" => row
            .try_get::<Vec<f64>, _>(index)
            .ok()
            .map(|v| NativeValue::Json(serde_json::json!(v))),
        "BOOL[]" => row
            .try_get::<Vec<bool>, _>(index)
            .ok()
            .map(|v| NativeValue::Json(serde_json::json!(v))),
        // Enum values travel as their label text.
        _ if matches!(type_info.kind(), PgTypeKind::Enum(_)) => row
            .try_get_unchecked::<String, _>(index)
            .ok()
            .map(NativeValue::Text),
        _ => row.try_get::<String, _>(index).ok().map(NativeValue::Text),
    };

    decoded.unwrap_or_else(|| match value_ref.as_bytes() {
        Ok(bytes) => NativeValue::Opaque(bytes.to_vec()),
        Err(_) => NativeValue::Null,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn timestamps_bind_as_timestamps() {
        assert_matches!(
            pg_param(&json!("2024-03-01T10:00:00Z"), "TIMESTAMPTZ", false),
            Ok(PgParam::Timestamptz(dt)) if dt.to_rfc3339() == "2024-03-01T10:00:00+00:00"
        );
        assert_matches!(
            pg_param(&json!("2024-03-01 12:00:00+02:00"), "TIMESTAMPTZ", false),
            Ok(PgParam::Timestamptz(dt)) if dt.to_rfc3339() == "2024-03-01T10:00:00+00:00"
        );
        assert_matches!(
            pg_param(&json!("2024-03-01"), "TIMESTAMP", false),
            Ok(PgParam::Timestamp(dt)) if dt.to_string() == "2024-03-01 00:00:00"
        );
        assert_matches!(
            pg_param(&json!("2024-02-29"), "DATE", false),
            Ok(PgParam::Date(d)) if d == NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_matches!(
            pg_param(&json!("13:45"), "TIME", false),
            Ok(PgParam::Time(t)) if t == NaiveTime::from_hms_opt(13, 45, 0).unwrap()
        );
    }

    #[test]
    fn strings_parse_into_numeric_and_uuid() {
        assert_eq!(
            pg_param(&json!("12.50"), "NUMERIC", false),
            Ok(PgParam::Numeric(BigDecimal::from_str("12.50").unwrap()))
        );
        assert_eq!(
            pg_param(&json!(3), "NUMERIC", false),
            Ok(PgParam::Numeric(BigDecimal::from(3)))
        );
        assert_eq!(
            pg_param(&json!("67e55044-10b1-426f-9247-bb680e5fe0c8"), "UUID", false),
            Ok(PgParam::Uuid(
                uuid::Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
            ))
        );
        assert_eq!(pg_param(&json!("42"), "INT4", false), Ok(PgParam::Int4(42)));
        assert_eq!(pg_param(&json!(7), "INT2", false), Ok(PgParam::Int2(7)));
        assert_eq!(pg_param(&json!(true), "BOOL", false), Ok(PgParam::Bool(true)));
    }

    #[test]
    fn network_strings_parse() {
        assert_matches!(
            pg_param(&json!("10.0.0.1"), "INET", false),
            Ok(PgParam::Inet(net)) if net.prefix() == 32
        );
        assert_matches!(
            pg_param(&json!("08:00:2b:01:02:03"), "MACADDR", false),
            Ok(PgParam::MacAddr(_))
        );
    }

    #[test]
    fn unparseable_values_are_rejected() {
        assert_matches!(pg_param(&json!("yesterday-ish"), "TIMESTAMPTZ", false), Err(msg) if msg.contains("yesterday-ish"));
        assert!(pg_param(&json!(70000), "INT2", false).is_err());
        assert!(pg_param(&json!("abc"), "UUID", false).is_err());
    }

    #[test]
    fn nulls_and_enums_use_the_declared_type() {
        assert_eq!(pg_param(&Value::Null, "INT4", false), Ok(PgParam::Declared(None)));
        assert_eq!(
            pg_param(&json!("happy"), "mood", true),
            Ok(PgParam::Declared(Some("happy".into())))
        );
    }

    #[test]
    fn text_and_unknown_types() {
        assert_eq!(pg_param(&json!(5), "TEXT", false), Ok(PgParam::Text("5".into())));
        assert_eq!(pg_param(&json!("x"), "VARCHAR", false), Ok(PgParam::Text("x".into())));
        assert_eq!(pg_param(&json!(5), "", false), Ok(PgParam::Int8(5)));
        assert_eq!(pg_param(&json!(1.5), "", false), Ok(PgParam::Float8(1.5)));
        assert_eq!(
            pg_param(&json!({"a": 1}), "JSONB", false),
            Ok(PgParam::Json(json!({"a": 1})))
        );
    }

    #[test]
    fn interval_text_form() {
        let iv = |months, days, microseconds| PgInterval {
            months,
            days,
            microseconds,
        };
        assert_eq!(format_interval(&iv(14, 3, 14_706_500_000)), "1 year 2 mons 3 days 04:05:06.5");
        assert_eq!(format_interval(&iv(0, 1, 0)), "1 day");
        assert_eq!(format_interval(&iv(0, 0, 0)), "00:00:00");
        assert_eq!(format_interval(&iv(0, -2, -90_000_000)), "-2 days -00:01:30");
    }

    #[test]
    fn network_text_form() {
        let host: IpNetwork = "10.0.0.1/32".parse().unwrap();
        let net: IpNetwork = "10.0.0.0/8".parse().unwrap();
        assert_eq!(format_network(host, false), "10.0.0.1");
        assert_eq!(format_network(host, true), "10.0.0.1/32");
        assert_eq!(format_network(net, false), "10.0.0.0/8");
    }

    #[test]
    fn numeric_specials_from_header() {
        assert_eq!(numeric_special(&[0, 0, 0, 0, 0xC0, 0, 0, 0]), Some("NaN"));
        assert_eq!(numeric_special(&[0, 0, 0, 0, 0xF0, 0, 0, 0]), Some("-Infinity"));
        assert_eq!(numeric_special(&[0, 1, 0, 0, 0, 0, 0, 2, 0, 5]), None);
    }
}
