//! Versioned record storage.
//!
//! Every resource is stored as a JSON body under `(kind, id)` with a version
//! counter. Writes that depend on what was read go through
//! [`Store::compare_and_swap`] or an atomic [`Batch`], so two requests racing
//! on the same record cannot both win.

pub mod memory;
pub mod postgres;
pub mod records;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared_types::AppError;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A storable resource.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Partition name, e.g. `"case"`.
    const KIND: &'static str;

    fn id(&self) -> Uuid;

    /// `(key_name, value)` pairs that must be unique within this kind.
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// A record together with the version it was read at.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    pub version: i64,
    pub record: T,
}

/// Untyped row as the backends see it.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub version: i64,
    pub body: Value,
}

/// One write inside a [`Batch`].
#[derive(Debug, Clone)]
pub enum Write {
    Insert {
        kind: &'static str,
        id: Uuid,
        body: Value,
        keys: Vec<(&'static str, String)>,
    },
    Replace {
        kind: &'static str,
        id: Uuid,
        expected_version: i64,
        body: Value,
        keys: Vec<(&'static str, String)>,
    },
}

/// Writes applied all-or-nothing by [`Store::commit`].
#[derive(Debug, Default)]
pub struct Batch {
    writes: Vec<Write>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Record>(&mut self, record: &T) -> Result<&mut Self, AppError> {
        self.writes.push(Write::Insert {
            kind: T::KIND,
            id: record.id(),
            body: encode(record)?,
            keys: record.unique_keys(),
        });
        Ok(self)
    }

    pub fn replace<T: Record>(&mut self, current: &Stored<T>, next: &T) -> Result<&mut Self, AppError> {
        self.writes.push(Write::Replace {
            kind: T::KIND,
            id: next.id(),
            expected_version: current.version,
            body: encode(next)?,
            keys: next.unique_keys(),
        });
        Ok(self)
    }

    pub fn into_writes(self) -> Vec<Write> {
        self.writes
    }
}

/// Reads retried by [`Store::modify`] before giving up.
pub const MAX_CAS_ATTEMPTS: u32 = 3;

/// Decision returned to [`Store::modify`].
#[derive(Debug)]
pub enum Step<T, R> {
    /// Replace the record with `T` and return `R`.
    Write(T, R),
    /// Leave the record as it is.
    Keep(R),
}

/// Conflict raised when a unique key is already claimed.
pub fn key_conflict(key_name: &str) -> AppError {
    match key_name {
        "email" => AppError::conflict("An account with this email already exists"),
        "license_number" => {
            AppError::conflict("A lawyer with this license number is already registered")
        }
        _ => AppError::conflict("A record with this value already exists"),
    }
}

fn encode<T: Serialize>(record: &T) -> Result<Value, AppError> {
    serde_json::to_value(record).map_err(|e| {
        tracing::error!(error = %e, "Failed to encode record");
        AppError::internal("Failed to encode record")
    })
}

fn decode<T: Record>(raw: RawRecord) -> Result<Stored<T>, AppError> {
    let record = serde_json::from_value(raw.body).map_err(|e| {
        tracing::error!(kind = T::KIND, error = %e, "Stored record does not decode");
        AppError::upstream()
    })?;
    Ok(Stored {
        version: raw.version,
        record,
    })
}

/// Backing store selected at startup.
#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Postgres(PgStore),
}

impl Store {
    pub fn memory() -> Self {
        Store::Memory(MemoryStore::default())
    }

    pub async fn insert<T: Record>(&self, record: &T) -> Result<(), AppError> {
        let body = encode(record)?;
        let keys = record.unique_keys();
        match self {
            Store::Memory(m) => m.insert(T::KIND, record.id(), body, &keys),
            Store::Postgres(p) => p.insert(T::KIND, record.id(), body, &keys).await,
        }
    }

    pub async fn get<T: Record>(&self, id: Uuid) -> Result<Option<Stored<T>>, AppError> {
        let raw = match self {
            Store::Memory(m) => m.get(T::KIND, id),
            Store::Postgres(p) => p.get(T::KIND, id).await?,
        };
        raw.map(decode).transpose()
    }

    /// All records of a kind, oldest first.
    pub async fn list<T: Record>(&self) -> Result<Vec<Stored<T>>, AppError> {
        let rows = match self {
            Store::Memory(m) => m.list(T::KIND),
            Store::Postgres(p) => p.list(T::KIND).await?,
        };
        rows.into_iter().map(decode).collect()
    }

    /// Convenience: the records of [`Store::list`] without versions.
    pub async fn list_records<T: Record>(&self) -> Result<Vec<T>, AppError> {
        Ok(self.list::<T>().await?.into_iter().map(|s| s.record).collect())
    }

    pub async fn find_by_key<T: Record>(
        &self,
        key_name: &str,
        value: &str,
    ) -> Result<Option<Stored<T>>, AppError> {
        let raw = match self {
            Store::Memory(m) => m.find_by_key(T::KIND, key_name, value),
            Store::Postgres(p) => p.find_by_key(T::KIND, key_name, value).await?,
        };
        raw.map(decode).transpose()
    }

    /// Replace `current` with `next` only if nobody wrote in between.
    /// Returns `false` when the version moved on.
    pub async fn compare_and_swap<T: Record>(&self, current: &Stored<T>, next: &T) -> Result<bool, AppError> {
        let body = encode(next)?;
        let keys = next.unique_keys();
        match self {
            Store::Memory(m) => m.compare_and_swap(T::KIND, next.id(), current.version, body, &keys),
            Store::Postgres(p) => {
                p.compare_and_swap(T::KIND, next.id(), current.version, body, &keys)
                    .await
            }
        }
    }

    pub async fn delete<T: Record>(&self, id: Uuid) -> Result<Option<T>, AppError> {
        let body = match self {
            Store::Memory(m) => m.delete(T::KIND, id),
            Store::Postgres(p) => p.delete(T::KIND, id).await?,
        };
        body.map(|body| decode::<T>(RawRecord { version: 0, body }).map(|s| s.record))
            .transpose()
    }

    /// Apply every write or none. Returns `false` if any replace lost its race.
    pub async fn commit(&self, batch: Batch) -> Result<bool, AppError> {
        let writes = batch.into_writes();
        match self {
            Store::Memory(m) => m.commit(writes),
            Store::Postgres(p) => p.commit(writes).await,
        }
    }

    /// Load `id`, let `apply` decide on the fresh copy, and write the result
    /// with [`Store::compare_and_swap`]. A lost race re-reads and re-decides,
    /// so `apply` always judges the state it is about to replace.
    pub async fn modify<T, R, F>(&self, id: Uuid, missing: fn() -> AppError, mut apply: F) -> Result<R, AppError>
    where
        T: Record,
        F: FnMut(&T) -> Result<Step<T, R>, AppError>,
    {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let current = self.get::<T>(id).await?.ok_or_else(missing)?;
            match apply(&current.record)? {
                Step::Keep(out) => return Ok(out),
                Step::Write(next, out) => {
                    if self.compare_and_swap(&current, &next).await? {
                        return Ok(out);
                    }
                    tracing::debug!(kind = T::KIND, %id, attempt, "Version moved, retrying");
                }
            }
        }
        tracing::warn!(kind = T::KIND, %id, "Gave up after repeated write conflicts");
        Err(AppError::conflict(
            "The record was modified by another request. Please retry.",
        ))
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        match self {
            Store::Memory(_) => Ok(()),
            Store::Postgres(p) => p.ping().await,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Postgres(_) => "postgres",
        }
    }
}
