// src/core/store.rs

use crate::core::models::Report;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Persistence failures. Unlike probe errors these are fatal to the request:
/// a caller must never believe a scan was stored when it was not.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access report storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Boundary for report persistence. `save` assigns and returns an opaque
/// identifier; `load` returns `Ok(None)` for identifiers it does not know.
pub trait ReportStore {
    fn save(&self, report: &Report) -> Result<String, StoreError>;
    fn load(&self, id: &str) -> Result<Option<Report>, StoreError>;
}

/// Opaque identifier derived from the target and the current time. No
/// database sequence exists here, so collisions are avoided by the
/// nanosecond clock component.
fn next_id(target: &str) -> String {
    let mut hasher = DefaultHasher::new();
    target.hash(&mut hasher);
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Stores each report as `<id>.json` in a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Places reports under the application data directory, next to the logs.
    pub fn at_default_location() -> Self {
        Self::new(crate::logging::get_data_dir().join("reports"))
    }
}

impl ReportStore for JsonFileStore {
    fn save(&self, report: &Report) -> Result<String, StoreError> {
        fs::create_dir_all(&self.dir)?;
        let id = next_id(&report.target);

        let mut persisted = report.clone();
        persisted.id = Some(id.clone());

        let path = self.dir.join(format!("{}.json", id));
        fs::write(&path, serde_json::to_vec_pretty(&persisted)?)?;
        info!(id, path = %path.display(), "Report persisted.");
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<Option<Report>, StoreError> {
        // Identifiers are hex strings; anything else cannot name a report and
        // must not be allowed to traverse the filesystem.
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            warn!(id, "Rejected malformed report identifier.");
            return Ok(None);
        }

        let path = self.dir.join(format!("{}.json", id));
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(id, "Report loaded from disk.");
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store used by tests and embedders that do not want disk I/O.
#[derive(Default)]
pub struct MemoryStore {
    reports: Mutex<HashMap<String, Report>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportStore for MemoryStore {
    fn save(&self, report: &Report) -> Result<String, StoreError> {
        let id = next_id(&report.target);
        let mut persisted = report.clone();
        persisted.id = Some(id.clone());
        self.reports
            .lock()
            .expect("report store mutex poisoned")
            .insert(id.clone(), persisted);
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<Option<Report>, StoreError> {
        Ok(self
            .reports
            .lock()
            .expect("report store mutex poisoned")
            .get(id)
            .cloned())
    }
}
