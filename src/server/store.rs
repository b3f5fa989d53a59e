//! User persistence with an atomic best-score update.
//!
//! `record_score` does its read-compare-write under one lock, so two
//! submissions from the same user (two tabs, say) cannot lose an update.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

use crate::server::types::{NewUser, ScoreResponse, UserId, UserRecord, normalize_email};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no user with id {0}")]
    UnknownUser(UserId),
    #[error("email {0} is already registered")]
    DuplicateEmail(String),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot format: {0}")]
    Format(#[from] serde_json::Error),
}

pub trait UserStore: Send + Sync {
    fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError>;
    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
    fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;
    fn best_score(&self, id: UserId) -> Result<u64, StoreError>;
    /// Keep `max(stored, score)`; the response echoes both either way.
    fn record_score(&self, id: UserId, score: u64) -> Result<ScoreResponse, StoreError>;
}

#[derive(Serialize, Deserialize, Default)]
struct Snapshot {
    next_id: u64,
    users: Vec<UserRecord>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    users: BTreeMap<UserId, UserRecord>,
    by_email: HashMap<String, UserId>,
}

impl Inner {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut inner = Inner {
            next_id: snapshot.next_id,
            ..Default::default()
        };
        for user in snapshot.users {
            inner.next_id = inner.next_id.max(user.id.0 + 1);
            inner.by_email.insert(normalize_email(&user.email), user.id);
            inner.users.insert(user.id, user);
        }
        inner
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            next_id: self.next_id,
            users: self.users.values().cloned().collect(),
        }
    }
}

/// In-process store, optionally mirrored to a JSON file after each change.
pub struct MemoryStore {
    inner: Mutex<Inner>,
    snapshot_path: Option<PathBuf>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Default::default()
            }),
            snapshot_path: None,
        }
    }

    /// Load from `path` if it exists, and write back to it on every change.
    pub fn with_snapshot(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let inner = if path.exists() {
            let data = fs::read_to_string(&path)?;
            Inner::from_snapshot(serde_json::from_str(&data)?)
        } else {
            Inner {
                next_id: 1,
                ..Default::default()
            }
        };
        tracing::info!(path = %path.display(), users = inner.users.len(), "loaded user store");
        Ok(Self {
            inner: Mutex::new(inner),
            snapshot_path: Some(path),
        })
    }

    pub fn user_count(&self) -> usize {
        self.lock().map(|inner| inner.users.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }

    // Called with the lock held so snapshots are written in mutation order
    fn persist(&self, inner: &Inner) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        write_snapshot(path, &inner.to_snapshot())
    }
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl UserStore for MemoryStore {
    fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut inner = self.lock()?;
        let key = normalize_email(&user.email);
        if inner.by_email.contains_key(&key) {
            return Err(StoreError::DuplicateEmail(key));
        }

        let id = UserId(inner.next_id);
        inner.next_id += 1;
        let record = UserRecord {
            id,
            name: user.name,
            email: key.clone(),
            password_hash: user.password_hash,
            best_score: 0,
        };
        inner.by_email.insert(key.clone(), id);
        inner.users.insert(id, record.clone());
        if let Err(err) = self.persist(&inner) {
            inner.users.remove(&id);
            inner.by_email.remove(&key);
            inner.next_id = id.0;
            return Err(err);
        }
        Ok(record)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .by_email
            .get(&normalize_email(email))
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    fn best_score(&self, id: UserId) -> Result<u64, StoreError> {
        self.lock()?
            .users
            .get(&id)
            .map(|u| u.best_score)
            .ok_or(StoreError::UnknownUser(id))
    }

    fn record_score(&self, id: UserId, score: u64) -> Result<ScoreResponse, StoreError> {
        let mut inner = self.lock()?;
        let user = inner.users.get_mut(&id).ok_or(StoreError::UnknownUser(id))?;
        let previous = user.best_score;
        if score <= previous {
            return Ok(ScoreResponse {
                current_score: score,
                best_score: previous,
            });
        }

        user.best_score = score;
        // roll back so memory never holds a best the file does not
        if let Err(err) = self.persist(&inner) {
            if let Some(user) = inner.users.get_mut(&id) {
                user.best_score = previous;
            }
            return Err(err);
        }
        Ok(ScoreResponse {
            current_score: score,
            best_score: score,
        })
    }
}
