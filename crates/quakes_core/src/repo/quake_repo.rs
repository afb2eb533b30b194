//! Quake repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/upsert/query/delete over canonical `quakes` storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Quake::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::quake::{Quake, QuakeId, QuakeLocation, QuakeValidationError};
use crate::search::query::{QuakeQuery, SortKey, SortOrder};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const QUAKE_SELECT_SQL: &str = "SELECT
    code,
    magnitude,
    time_ms,
    location_name,
    longitude,
    latitude
FROM quakes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for quake persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(QuakeValidationError),
    Db(DbError),
    NotFound(QuakeId),
    Duplicate(QuakeId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "quake not found: {id}"),
            Self::Duplicate(id) => write!(f, "quake already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted quake data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Duplicate(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<QuakeValidationError> for RepoError {
    fn from(value: QuakeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Earliest and latest quake time currently stored.
pub type TimeRange = (DateTime<Utc>, DateTime<Utc>);

/// Record-store interface consumed by services and the app.
pub trait QuakeRepository {
    fn create_quake(&self, quake: &Quake) -> RepoResult<QuakeId>;
    /// Inserts or replaces the row for `quake.code`.
    fn upsert_quake(&self, quake: &Quake) -> RepoResult<()>;
    fn get_quake(&self, id: &QuakeId) -> RepoResult<Option<Quake>>;
    fn list_quakes(&self, query: &QuakeQuery) -> RepoResult<Vec<Quake>>;
    fn delete_quake(&self, id: &QuakeId) -> RepoResult<()>;
    fn count_quakes(&self) -> RepoResult<u64>;
    fn time_range(&self) -> RepoResult<Option<TimeRange>>;
}

/// SQLite-backed quake repository.
pub struct SqliteQuakeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuakeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl QuakeRepository for SqliteQuakeRepository<'_> {
    fn create_quake(&self, quake: &Quake) -> RepoResult<QuakeId> {
        quake.validate()?;

        let result = self.conn.execute(
            "INSERT INTO quakes (
                code,
                magnitude,
                time_ms,
                location_name,
                longitude,
                latitude
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                quake.code.as_str(),
                quake.magnitude,
                quake.time.timestamp_millis(),
                quake.location.name.as_str(),
                quake.location.longitude,
                quake.location.latitude,
            ],
        );

        match result {
            Ok(_) => Ok(quake.code.clone()),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Duplicate(quake.code.clone())),
            Err(err) => Err(err.into()),
        }
    }

    fn upsert_quake(&self, quake: &Quake) -> RepoResult<()> {
        quake.validate()?;

        self.conn.execute(
            "INSERT INTO quakes (
                code,
                magnitude,
                time_ms,
                location_name,
                longitude,
                latitude
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(code) DO UPDATE SET
                magnitude = excluded.magnitude,
                time_ms = excluded.time_ms,
                location_name = excluded.location_name,
                longitude = excluded.longitude,
                latitude = excluded.latitude;",
            params![
                quake.code.as_str(),
                quake.magnitude,
                quake.time.timestamp_millis(),
                quake.location.name.as_str(),
                quake.location.longitude,
                quake.location.latitude,
            ],
        )?;

        Ok(())
    }

    fn get_quake(&self, id: &QuakeId) -> RepoResult<Option<Quake>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUAKE_SELECT_SQL} WHERE code = ?1;"))?;

        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_quake_row(row)?));
        }

        Ok(None)
    }

    fn list_quakes(&self, query: &QuakeQuery) -> RepoResult<Vec<Quake>> {
        let mut sql = format!("{QUAKE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        // instr() avoids LIKE wildcard escaping; fold_case() is registered at open.
        if let Some(text) = query.normalized_search_text() {
            sql.push_str(" AND instr(fold_case(location_name), ?) > 0");
            bind_values.push(Value::Text(text.to_lowercase()));
        }

        if let Some((start, end)) = query.date_window() {
            sql.push_str(" AND time_ms >= ? AND time_ms < ?");
            bind_values.push(Value::Integer(start.timestamp_millis()));
            bind_values.push(Value::Integer(end.timestamp_millis()));
        }

        let column = sort_column(query.sort_key);
        let direction = sort_direction(query.sort_order);
        sql.push_str(&format!(
            " ORDER BY {column} {direction}, code {direction}"
        ));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut quakes = Vec::new();

        while let Some(row) = rows.next()? {
            quakes.push(parse_quake_row(row)?);
        }

        Ok(quakes)
    }

    fn delete_quake(&self, id: &QuakeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM quakes WHERE code = ?1;", [id.as_str()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.clone()));
        }

        Ok(())
    }

    fn count_quakes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quakes;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }

    fn time_range(&self) -> RepoResult<Option<TimeRange>> {
        let bounds: (Option<i64>, Option<i64>) = self.conn.query_row(
            "SELECT MIN(time_ms), MAX(time_ms) FROM quakes;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        match bounds {
            (Some(min), Some(max)) => Ok(Some((millis_to_time(min)?, millis_to_time(max)?))),
            _ => Ok(None),
        }
    }
}

fn parse_quake_row(row: &Row<'_>) -> RepoResult<Quake> {
    let code: String = row.get("code")?;
    let time_ms: i64 = row.get("time_ms")?;

    let quake = Quake {
        code: QuakeId::new(code),
        magnitude: row.get("magnitude")?,
        time: millis_to_time(time_ms)?,
        location: QuakeLocation {
            name: row.get("location_name")?,
            longitude: row.get("longitude")?,
            latitude: row.get("latitude")?,
        },
    };
    quake.validate()?;
    Ok(quake)
}

fn millis_to_time(value: i64) -> RepoResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(value).single().ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in quakes.time_ms"))
    })
}

fn sort_column(key: SortKey) -> &'static str {
    match key {
        SortKey::Time => "time_ms",
        SortKey::Magnitude => "magnitude",
    }
}

fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Ascending => "ASC",
        SortOrder::Descending => "DESC",
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
