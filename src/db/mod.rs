pub(crate) mod models;
pub(crate) mod schema;

use std::time::Duration;

use serde::de::DeserializeOwned;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, ConnectOptions, PgPool, Row as _, SqlitePool, TypeInfo, ValueRef};
use thiserror::Error;

use crate::core::config::Settings;

/// Backend-neutral row shape: column name to JSON value.
pub(crate) type Row = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Error)]
pub(crate) enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("failed to decode row: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub(crate) enum SqlParam {
    Int(i64),
    Text(String),
    Null,
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<Option<String>> for SqlParam {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => SqlParam::Text(text),
            None => SqlParam::Null,
        }
    }
}

impl From<Option<&str>> for SqlParam {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(text) => SqlParam::Text(text.to_string()),
            None => SqlParam::Null,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RunResult {
    pub(crate) inserted_id: Option<i64>,
    pub(crate) rows_affected: u64,
}

/// Thin abstraction over the embedded SQLite file and a hosted PostgreSQL
/// server. Callers write SQL once with `?` placeholders; the PostgreSQL
/// side rewrites them to `$1..$n`.
#[derive(Clone)]
pub(crate) enum Database {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

impl Database {
    pub(crate) async fn connect(settings: &Settings) -> Result<Self, DbError> {
        let url = settings.database().url.as_str();
        if settings.database().is_postgres() {
            connect_postgres(url).await
        } else {
            connect_sqlite(url).await
        }
    }

    pub(crate) fn backend_name(&self) -> &'static str {
        match self {
            Database::Sqlite(_) => "sqlite",
            Database::Postgres(_) => "postgres",
        }
    }

    /// Execute a statement. For `INSERT` statements the id assigned by the
    /// backend is reported in `inserted_id`.
    pub(crate) async fn run(&self, sql: &str, params: Vec<SqlParam>) -> Result<RunResult, DbError> {
        match self {
            Database::Sqlite(pool) => {
                let mut query = sqlx::query(sql);
                for param in &params {
                    query = bind_sqlite(query, param);
                }
                let result = query.execute(pool).await?;
                let inserted_id =
                    if is_insert(sql) { Some(result.last_insert_rowid()) } else { None };
                Ok(RunResult { inserted_id, rows_affected: result.rows_affected() })
            }
            Database::Postgres(pool) => {
                let rewritten = rewrite_placeholders(sql);
                if is_insert(sql) {
                    let with_returning = format!("{rewritten} RETURNING id");
                    let mut query = sqlx::query(&with_returning);
                    for param in &params {
                        query = bind_postgres(query, param);
                    }
                    let row = query.fetch_one(pool).await?;
                    let id: i64 = row.try_get("id")?;
                    Ok(RunResult { inserted_id: Some(id), rows_affected: 1 })
                } else {
                    let mut query = sqlx::query(&rewritten);
                    for param in &params {
                        query = bind_postgres(query, param);
                    }
                    let result = query.execute(pool).await?;
                    Ok(RunResult { inserted_id: None, rows_affected: result.rows_affected() })
                }
            }
        }
    }

    pub(crate) async fn get(
        &self,
        sql: &str,
        params: Vec<SqlParam>,
    ) -> Result<Option<Row>, DbError> {
        match self {
            Database::Sqlite(pool) => {
                let mut query = sqlx::query(sql);
                for param in &params {
                    query = bind_sqlite(query, param);
                }
                let row = query.fetch_optional(pool).await?;
                row.map(|row| sqlite_row_to_json(&row)).transpose()
            }
            Database::Postgres(pool) => {
                let rewritten = rewrite_placeholders(sql);
                let mut query = sqlx::query(&rewritten);
                for param in &params {
                    query = bind_postgres(query, param);
                }
                let row = query.fetch_optional(pool).await?;
                row.map(|row| postgres_row_to_json(&row)).transpose()
            }
        }
    }

    pub(crate) async fn all(&self, sql: &str, params: Vec<SqlParam>) -> Result<Vec<Row>, DbError> {
        match self {
            Database::Sqlite(pool) => {
                let mut query = sqlx::query(sql);
                for param in &params {
                    query = bind_sqlite(query, param);
                }
                let rows = query.fetch_all(pool).await?;
                rows.iter().map(sqlite_row_to_json).collect()
            }
            Database::Postgres(pool) => {
                let rewritten = rewrite_placeholders(sql);
                let mut query = sqlx::query(&rewritten);
                for param in &params {
                    query = bind_postgres(query, param);
                }
                let rows = query.fetch_all(pool).await?;
                rows.iter().map(postgres_row_to_json).collect()
            }
        }
    }
}

pub(crate) fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, DbError> {
    serde_json::from_value(serde_json::Value::Object(row)).map_err(DbError::from)
}

pub(crate) fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, DbError> {
    rows.into_iter().map(from_row).collect()
}

async fn connect_postgres(url: &str) -> Result<Database, DbError> {
    let mut connect_options: PgConnectOptions = url.parse()?;
    connect_options =
        connect_options.application_name("manhaj").log_statements(tracing::log::LevelFilter::Off);

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    Ok(Database::Postgres(pool))
}

pub(crate) async fn connect_sqlite(url: &str) -> Result<Database, DbError> {
    let mut connect_options: SqliteConnectOptions = url.parse()?;
    // Cascading deletes rely on FK enforcement, which SQLite disables per
    // connection by default.
    connect_options = connect_options
        .create_if_missing(true)
        .foreign_keys(true)
        .log_statements(tracing::log::LevelFilter::Off);

    // An in-memory database exists per connection, so it must be pinned to
    // a single pooled connection that never expires.
    let in_memory = url.contains(":memory:") || url.contains("mode=memory");
    let mut pool_options = SqlitePoolOptions::new();
    if in_memory {
        pool_options =
            pool_options.max_connections(1).idle_timeout(None).max_lifetime(None);
    } else {
        pool_options = pool_options.max_connections(5);
    }

    let pool = pool_options.connect_with(connect_options).await?;
    Ok(Database::Sqlite(pool))
}

fn is_insert(sql: &str) -> bool {
    sql.trim_start()
        .split_whitespace()
        .next()
        .map(|word| word.eq_ignore_ascii_case("insert"))
        .unwrap_or(false)
}

/// Rewrite `?` placeholders to PostgreSQL's `$1..$n`, leaving anything
/// inside single-quoted string literals untouched.
fn rewrite_placeholders(sql: &str) -> String {
    let mut rewritten = String::with_capacity(sql.len() + 8);
    let mut index = 0;
    let mut in_string = false;

    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_string = !in_string;
                rewritten.push(ch);
            }
            '?' if !in_string => {
                index += 1;
                rewritten.push('$');
                rewritten.push_str(&index.to_string());
            }
            _ => rewritten.push(ch),
        }
    }

    rewritten
}

fn bind_sqlite<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    param: &SqlParam,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    match param {
        SqlParam::Int(value) => query.bind(*value),
        SqlParam::Text(value) => query.bind(value.clone()),
        SqlParam::Null => query.bind(Option::<String>::None),
    }
}

fn bind_postgres<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    param: &SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    match param {
        SqlParam::Int(value) => query.bind(*value),
        SqlParam::Text(value) => query.bind(value.clone()),
        SqlParam::Null => query.bind(Option::<String>::None),
    }
}

fn sqlite_row_to_json(row: &SqliteRow) -> Result<Row, DbError> {
    let mut object = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(index)?;
        let value = if raw.is_null() {
            serde_json::Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" => serde_json::Value::from(row.try_get::<i64, _>(index)?),
                "REAL" => serde_json::Value::from(row.try_get::<f64, _>(index)?),
                _ => serde_json::Value::from(row.try_get::<String, _>(index)?),
            }
        };
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

fn postgres_row_to_json(row: &PgRow) -> Result<Row, DbError> {
    let mut object = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(index)?;
        let value = if raw.is_null() {
            serde_json::Value::Null
        } else {
            match raw.type_info().name() {
                "INT2" => serde_json::Value::from(i64::from(row.try_get::<i16, _>(index)?)),
                "INT4" => serde_json::Value::from(i64::from(row.try_get::<i32, _>(index)?)),
                "INT8" => serde_json::Value::from(row.try_get::<i64, _>(index)?),
                "FLOAT4" => serde_json::Value::from(f64::from(row.try_get::<f32, _>(index)?)),
                "FLOAT8" => serde_json::Value::from(row.try_get::<f64, _>(index)?),
                "BOOL" => serde_json::Value::from(row.try_get::<bool, _>(index)?),
                _ => serde_json::Value::from(row.try_get::<String, _>(index)?),
            }
        };
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}
