use std::{
    collections::BTreeMap,
    ffi::OsString,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, instrument, warn};

use crate::{AppError, CounterName};

/// What `load` does when the document exists but can't be read or parsed.
/// A missing document is always an empty mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LoadPolicy {
    /// Log a warning and start over from an empty mapping.
    #[default]
    Reset,
    /// Fail the request and leave the document untouched.
    Strict,
}

/// The whole persisted mapping of counter name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counters(BTreeMap<String, u64>);

impl Counters {
    /// Adds one to `name` (absent counts as 0) and returns the new value.
    pub fn bump(&mut self, name: &CounterName) -> Result<u64, AppError> {
        let counter = self.0.entry(name.to_string()).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| AppError::Overflow(name.to_string()))?;
        Ok(*counter)
    }
}

impl Deref for Counters {
    type Target = BTreeMap<String, u64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// File-backed counter store. Every increment re-reads and rewrites the
/// whole document; nothing is cached between calls.
#[derive(Debug)]
pub struct CounterStore {
    path: PathBuf,
    policy: LoadPolicy,
    // serializes load-bump-save so concurrent increments can't lose updates
    lock: Mutex<()>,
}

impl CounterStore {
    pub fn new(path: impl Into<PathBuf>, policy: LoadPolicy) -> Self {
        CounterStore {
            path: path.into(),
            policy,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Reads the full mapping. Not synchronized with other callers.
    pub async fn load(&self) -> Result<Counters, AppError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Counters::default()),
            Err(e) => return self.recover(e.to_string()),
        };
        match serde_json::from_str::<Counters>(&data) {
            Ok(counters) => Ok(counters),
            Err(e) => self.recover(e.to_string()),
        }
    }

    fn recover(&self, reason: String) -> Result<Counters, AppError> {
        match self.policy {
            LoadPolicy::Reset => {
                warn!("error loading counters from {}: {}", self.path.display(), reason);
                Ok(Counters::default())
            }
            LoadPolicy::Strict => Err(AppError::Load {
                path: self.path.display().to_string(),
                reason,
            }),
        }
    }

    /// Replaces the document with `counters`: write a sibling temp file,
    /// sync it, then rename it over the document. Not synchronized with
    /// other callers.
    pub async fn save(&self, counters: &Counters) -> Result<(), AppError> {
        let body = serde_json::to_string_pretty(counters)?;
        let tmp = self.tmp_path();
        if let Err(e) = write_synced(&tmp, body.as_bytes()).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Adds one to `name` and persists the result, returning the new value.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn increment(&self, name: &CounterName) -> Result<u64, AppError> {
        let _guard = self.lock.lock().await;
        let mut counters = self.load().await?;
        let value = counters.bump(name)?;
        self.save(&counters).await?;
        debug!(value, "counter incremented");
        Ok(value)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    Ok(())
}
