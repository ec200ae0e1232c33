use serde_json::Value;
use shared_types::AppError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::{key_conflict, RawRecord, Write};

/// In-process store used for local development and tests.
///
/// A single mutex guards all tables, so compare-and-swap and batches are
/// atomic exactly as they are inside a Postgres transaction.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Default)]
struct Tables {
    seq: u64,
    rows: HashMap<(&'static str, Uuid), Row>,
    keys: HashMap<(&'static str, String, String), Uuid>,
}

struct Row {
    seq: u64,
    version: i64,
    body: Value,
}

impl Tables {
    fn check_keys(&self, kind: &'static str, id: Uuid, keys: &[(&'static str, String)]) -> Result<(), AppError> {
        for (name, value) in keys {
            if let Some(owner) = self.keys.get(&(kind, name.to_string(), value.clone())) {
                if *owner != id {
                    return Err(key_conflict(name));
                }
            }
        }
        Ok(())
    }

    fn claim_keys(&mut self, kind: &'static str, id: Uuid, keys: &[(&'static str, String)]) {
        self.keys.retain(|(k, _, _), owner| !(*k == kind && *owner == id));
        for (name, value) in keys {
            self.keys.insert((kind, name.to_string(), value.clone()), id);
        }
    }

    fn version_matches(&self, kind: &'static str, id: Uuid, expected: i64) -> bool {
        self.rows
            .get(&(kind, id))
            .map(|row| row.version == expected)
            .unwrap_or(false)
    }

    fn insert_row(&mut self, kind: &'static str, id: Uuid, body: Value, keys: &[(&'static str, String)]) {
        self.seq += 1;
        let seq = self.seq;
        self.rows.insert((kind, id), Row { seq, version: 1, body });
        self.claim_keys(kind, id, keys);
    }

    fn replace_row(&mut self, kind: &'static str, id: Uuid, body: Value, keys: &[(&'static str, String)]) {
        if let Some(row) = self.rows.get_mut(&(kind, id)) {
            row.version += 1;
            row.body = body;
        }
        self.claim_keys(kind, id, keys);
    }
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A poisoned lock only means another test thread panicked mid-write.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert(
        &self,
        kind: &'static str,
        id: Uuid,
        body: Value,
        keys: &[(&'static str, String)],
    ) -> Result<(), AppError> {
        let mut t = self.tables();
        if t.rows.contains_key(&(kind, id)) {
            return Err(AppError::conflict("Record already exists"));
        }
        t.check_keys(kind, id, keys)?;
        t.insert_row(kind, id, body, keys);
        Ok(())
    }

    pub fn get(&self, kind: &'static str, id: Uuid) -> Option<RawRecord> {
        self.tables().rows.get(&(kind, id)).map(|row| RawRecord {
            version: row.version,
            body: row.body.clone(),
        })
    }

    pub fn list(&self, kind: &'static str) -> Vec<RawRecord> {
        let t = self.tables();
        let mut rows: Vec<&Row> = t
            .rows
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, row)| row)
            .collect();
        rows.sort_by_key(|row| row.seq);
        let out = rows
            .into_iter()
            .map(|row| RawRecord {
                version: row.version,
                body: row.body.clone(),
            })
            .collect();
        out
    }

    pub fn find_by_key(&self, kind: &'static str, key_name: &str, value: &str) -> Option<RawRecord> {
        let t = self.tables();
        let id = *t.keys.get(&(kind, key_name.to_string(), value.to_string()))?;
        let found = t.rows.get(&(kind, id)).map(|row| RawRecord {
            version: row.version,
            body: row.body.clone(),
        });
        found
    }

    pub fn compare_and_swap(
        &self,
        kind: &'static str,
        id: Uuid,
        expected_version: i64,
        body: Value,
        keys: &[(&'static str, String)],
    ) -> Result<bool, AppError> {
        let mut t = self.tables();
        if !t.version_matches(kind, id, expected_version) {
            return Ok(false);
        }
        t.check_keys(kind, id, keys)?;
        t.replace_row(kind, id, body, keys);
        Ok(true)
    }

    pub fn delete(&self, kind: &'static str, id: Uuid) -> Option<Value> {
        let mut t = self.tables();
        let row = t.rows.remove(&(kind, id))?;
        t.keys.retain(|(k, _, _), owner| !(*k == kind && *owner == id));
        Some(row.body)
    }

    pub fn commit(&self, writes: Vec<Write>) -> Result<bool, AppError> {
        let mut t = self.tables();

        // Validate everything before touching any table. Keys and ids claimed
        // by earlier writes of the batch count as taken.
        let mut inserted: HashSet<(&'static str, Uuid)> = HashSet::new();
        let mut claimed: HashMap<(&'static str, &'static str, &str), Uuid> = HashMap::new();
        for write in &writes {
            let (kind, id, keys) = match write {
                Write::Insert { kind, id, keys, .. } => {
                    if t.rows.contains_key(&(*kind, *id)) || !inserted.insert((*kind, *id)) {
                        return Err(AppError::conflict("Record already exists"));
                    }
                    (*kind, *id, keys)
                }
                Write::Replace {
                    kind,
                    id,
                    expected_version,
                    keys,
                    ..
                } => {
                    if !t.version_matches(*kind, *id, *expected_version) {
                        return Ok(false);
                    }
                    (*kind, *id, keys)
                }
            };
            t.check_keys(kind, id, keys)?;
            for (name, value) in keys {
                match claimed.insert((kind, *name, value.as_str()), id) {
                    Some(owner) if owner != id => return Err(key_conflict(name)),
                    _ => {}
                }
            }
        }

        for write in writes {
            match write {
                Write::Insert { kind, id, body, keys } => t.insert_row(kind, id, body, &keys),
                Write::Replace {
                    kind, id, body, keys, ..
                } => t.replace_row(kind, id, body, &keys),
            }
        }
        Ok(true)
    }
}
