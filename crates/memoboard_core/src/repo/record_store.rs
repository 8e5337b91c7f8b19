//! Generic keyed record storage over SQLite.
//!
//! # Responsibility
//! - Provide list/create/update/delete over five independent collections
//!   of JSON record documents.
//! - Own identity generation and creation timestamps.
//! - Hold the two scalar settings alongside the collections.
//!
//! # Invariants
//! - `list_all` returns records newest-first by `created_date`; records
//!   without one sort as if dated at the Unix epoch, ties break by stored
//!   order.
//! - `update` is a shallow field-level merge, never a full replace, and
//!   the envelope (`id`, `created_date`) is never rewritten by a patch.
//! - `delete` is idempotent; deleting a missing id succeeds.

use crate::db::DbError;
use crate::db::migrations::latest_version;
use crate::model::block::ValidationError;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Envelope field generated at creation and stable afterwards.
pub const FIELD_ID: &str = "id";
/// Envelope field set once at creation and never mutated.
pub const FIELD_CREATED_DATE: &str = "created_date";

/// Sort key stand-in for records that never carried a `created_date`.
const EPOCH_TIMESTAMP: &str = "1970-01-01T00:00:00.000Z";

/// JSON document shape shared by every stored record.
pub type RecordData = Map<String, Value>;

pub type RepoResult<T> = Result<T, RepoError>;

/// One of the five independent record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    LaundryLoads,
    Spendings,
    Notes,
    Reminders,
    CustomBlocks,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::LaundryLoads,
        Collection::Spendings,
        Collection::Notes,
        Collection::Reminders,
        Collection::CustomBlocks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LaundryLoads => "laundry_loads",
            Self::Spendings => "spendings",
            Self::Notes => "notes",
            Self::Reminders => "reminders",
            Self::CustomBlocks => "custom_blocks",
        }
    }

    /// Key this collection used in the legacy flat export.
    pub fn legacy_key(self) -> &'static str {
        match self {
            Self::LaundryLoads => "laundryLoads",
            Self::Spendings => "spendings",
            Self::Notes => "notes",
            Self::Reminders => "reminders",
            Self::CustomBlocks => "customBlocks",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    NotFound { collection: Collection, id: String },
    Validation(ValidationError),
    Storage(DbError),
    InvalidData(String),
    UninitializedConnection { expected_version: u32, actual_version: u32 },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn { table: &'static str, column: &'static str },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { collection, id } => {
                write!(f, "record not found in `{collection}`: {id}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} has not reached expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

/// Keyed storage contract for record documents and scalar settings.
pub trait RecordStore {
    /// Returns every record in the collection, newest first.
    fn list_all(&self, collection: Collection) -> RepoResult<Vec<RecordData>>;
    /// Returns one record by id.
    fn get(&self, collection: Collection, id: &str) -> RepoResult<Option<RecordData>>;
    /// Generates the envelope, merges caller fields, persists and returns
    /// the stored document. Caller-supplied `id`/`created_date` win, which
    /// import paths rely on.
    fn create(&self, collection: Collection, fields: RecordData) -> RepoResult<RecordData>;
    /// Shallow-merges `partial` into the stored record and returns the
    /// result. Fails `NotFound` when the id is absent.
    fn update(&self, collection: Collection, id: &str, partial: RecordData)
        -> RepoResult<RecordData>;
    /// Removes one record; removing a missing id is not an error.
    fn delete(&self, collection: Collection, id: &str) -> RepoResult<()>;
    /// Reads one scalar setting.
    fn setting(&self, key: &str) -> RepoResult<Option<String>>;
    /// Writes one scalar setting, replacing any previous value.
    fn set_setting(&self, key: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed record store owning its connection.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Raw put preserving the document as-is, including its envelope.
    ///
    /// Only the legacy import uses this; normal creation goes through
    /// [`RecordStore::create`].
    pub fn import_record(&self, collection: Collection, doc: &RecordData) -> RepoResult<()> {
        let id = doc
            .get(FIELD_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| RepoError::InvalidData("record import requires a string `id`".into()))?;
        let created_date = doc.get(FIELD_CREATED_DATE).and_then(Value::as_str);
        let data = encode_document(doc)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO records (collection, id, created_date, data)
             VALUES (?1, ?2, ?3, ?4);",
            params![collection.as_str(), id, created_date, data],
        )?;
        Ok(())
    }
}

impl RecordStore for SqliteRecordStore {
    fn list_all(&self, collection: Collection) -> RepoResult<Vec<RecordData>> {
        let mut stmt = self.conn.prepare(
            "SELECT data FROM records
             WHERE collection = ?1
             ORDER BY COALESCE(created_date, ?2) DESC, rowid ASC;",
        )?;
        let mut rows = stmt.query(params![collection.as_str(), EPOCH_TIMESTAMP])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let raw: String = row.get(0)?;
            records.push(decode_document(collection, &raw)?);
        }
        Ok(records)
    }

    fn get(&self, collection: Collection, id: &str) -> RepoResult<Option<RecordData>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM records WHERE collection = ?1 AND id = ?2;",
                params![collection.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => Ok(Some(decode_document(collection, &raw)?)),
            None => Ok(None),
        }
    }

    fn create(&self, collection: Collection, fields: RecordData) -> RepoResult<RecordData> {
        let mut doc = RecordData::new();
        doc.insert(
            FIELD_ID.to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );
        doc.insert(
            FIELD_CREATED_DATE.to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        for (key, value) in fields {
            doc.insert(key, value);
        }

        let id = doc
            .get(FIELD_ID)
            .and_then(Value::as_str)
            .ok_or_else(|| RepoError::InvalidData("caller supplied a non-string `id`".into()))?
            .to_string();
        let created_date = doc
            .get(FIELD_CREATED_DATE)
            .and_then(Value::as_str)
            .map(str::to_string);
        let data = encode_document(&doc)?;

        self.conn.execute(
            "INSERT INTO records (collection, id, created_date, data)
             VALUES (?1, ?2, ?3, ?4);",
            params![collection.as_str(), id, created_date, data],
        )?;
        Ok(doc)
    }

    fn update(
        &self,
        collection: Collection,
        id: &str,
        partial: RecordData,
    ) -> RepoResult<RecordData> {
        let mut doc = self.get(collection, id)?.ok_or_else(|| RepoError::NotFound {
            collection,
            id: id.to_string(),
        })?;

        for (key, value) in partial {
            if key == FIELD_ID || key == FIELD_CREATED_DATE {
                continue;
            }
            doc.insert(key, value);
        }

        let data = encode_document(&doc)?;
        let changed = self.conn.execute(
            "UPDATE records SET data = ?1 WHERE collection = ?2 AND id = ?3;",
            params![data, collection.as_str(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                collection,
                id: id.to_string(),
            });
        }

        Ok(doc)
    }

    fn delete(&self, collection: Collection, id: &str) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM records WHERE collection = ?1 AND id = ?2;",
            params![collection.as_str(), id],
        )?;
        Ok(())
    }

    fn setting(&self, key: &str) -> RepoResult<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_setting(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2);",
            params![key, value],
        )?;
        Ok(())
    }
}

fn encode_document(doc: &RecordData) -> RepoResult<String> {
    serde_json::to_string(doc)
        .map_err(|err| RepoError::InvalidData(format!("record failed to serialize: {err}")))
}

fn decode_document(collection: Collection, raw: &str) -> RepoResult<RecordData> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RepoError::InvalidData(format!(
            "record in `{collection}` is not a JSON object"
        ))),
        Err(err) => Err(RepoError::InvalidData(format!(
            "record in `{collection}` failed to parse: {err}"
        ))),
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["records", "settings"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["collection", "id", "created_date", "data"] {
        if !table_has_column(conn, "records", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "records",
                column,
            });
        }
    }

    for column in ["key", "value"] {
        if !table_has_column(conn, "settings", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "settings",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
