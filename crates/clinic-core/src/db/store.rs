//! Collection load/save operations.

use std::fmt;

use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Database, DbResult};

/// The named collections kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Patients,
    Appointments,
    MedicalRecords,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Patients,
        Collection::Appointments,
        Collection::MedicalRecords,
    ];

    /// Storage key for this collection.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Patients => "patients",
            Collection::Appointments => "appointments",
            Collection::MedicalRecords => "medicalRecords",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Database {
    /// Load the raw stored value for a collection.
    pub fn load_raw(&self, collection: Collection) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?",
                [collection.key()],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Overwrite the raw stored value for a collection.
    pub fn save_raw(&self, collection: Collection, value: &str) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![collection.key(), value],
        )?;
        Ok(())
    }

    /// Remove a collection entirely.
    pub fn remove(&self, collection: Collection) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?", [collection.key()])?;
        Ok(rows_affected > 0)
    }

    /// Load a collection's records in stored order.
    ///
    /// Absent data, or data that is not a JSON array, yields an empty list.
    /// Entries that do not decode as `T` are skipped individually. Only
    /// SQLite failures are returned as errors.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> DbResult<Vec<T>> {
        let Some(raw) = self.load_raw(collection)? else {
            return Ok(Vec::new());
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    %collection,
                    error = %e,
                    "stored collection is malformed, treating it as empty"
                );
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value(entry) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    %collection,
                    index,
                    error = %e,
                    "skipping malformed stored record"
                ),
            }
        }
        Ok(records)
    }

    /// Overwrite a collection with the given records.
    pub fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> DbResult<()> {
        let json = serde_json::to_string(records)?;
        self.save_raw(collection, &json)?;
        tracing::debug!(%collection, count = records.len(), "saved collection");
        Ok(())
    }
}
