//! Bookkeeping for generated images and uploads that live between requests.
//!
//! A generated image starts out as in-memory PNG bytes keyed by a random id.
//! The first download writes it to `<dir>/<id>.png` and the record flips to
//! that path. Records go away on explicit removal or on `purge`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::QrResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

#[derive(Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    entries: Mutex<HashMap<String, Artifact>>,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> QrResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, entries: Mutex::new(HashMap::new()) })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Artifact>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries().contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Artifact> {
        self.entries().get(id).cloned()
    }

    /// Keeps `bytes` in memory and returns the new id.
    pub fn insert_bytes(&self, bytes: Vec<u8>) -> String {
        let id = Uuid::new_v4().to_string();
        debug!(%id, len = bytes.len(), "artifact stored in memory");
        self.entries().insert(id.clone(), Artifact::Bytes(bytes));
        id
    }

    /// Tracks a file that is already on disk under `key`.
    pub fn insert_path(&self, key: impl Into<String>, path: impl Into<PathBuf>) {
        let key = key.into();
        let path = path.into();
        debug!(%key, path = %path.display(), "artifact tracked on disk");
        self.entries().insert(key, Artifact::Path(path));
    }

    /// Path of the artifact on disk, writing it out on first use. The file is
    /// written without holding the lock.
    pub fn persist(&self, id: &str) -> QrResult<Option<PathBuf>> {
        let bytes = match self.entries().get(id) {
            None => return Ok(None),
            Some(Artifact::Path(path)) => return Ok(path.exists().then(|| path.clone())),
            Some(Artifact::Bytes(bytes)) => bytes.clone(),
        };

        let path = self.dir.join(format!("{id}.png"));
        fs::write(&path, &bytes)?;

        let mut entries = self.entries();
        match entries.get_mut(id) {
            Some(artifact) => {
                if matches!(artifact, Artifact::Bytes(_)) {
                    info!(%id, path = %path.display(), "artifact persisted");
                    *artifact = Artifact::Path(path.clone());
                }
                Ok(Some(path))
            }
            None => {
                // Removed while the file was being written.
                drop(entries);
                remove_file(&path);
                Ok(None)
            }
        }
    }

    /// Contents of the artifact whether it is in memory or on disk.
    pub fn bytes(&self, id: &str) -> QrResult<Option<Vec<u8>>> {
        match self.get(id) {
            None => Ok(None),
            Some(Artifact::Bytes(bytes)) => Ok(Some(bytes)),
            Some(Artifact::Path(path)) if path.exists() => Ok(Some(fs::read(path)?)),
            Some(Artifact::Path(_)) => Ok(None),
        }
    }

    /// Drops the record and its file. Unknown ids are ignored.
    pub fn remove(&self, id: &str) -> bool {
        let Some(artifact) = self.entries().remove(id) else {
            return false;
        };
        if let Artifact::Path(path) = artifact {
            remove_file(&path);
        }
        debug!(%id, "artifact removed");
        true
    }

    /// Deletes every tracked file and forgets all records.
    pub fn purge(&self) -> usize {
        let drained: Vec<Artifact> = self.entries().drain().map(|(_, a)| a).collect();
        let count = drained.len();
        for artifact in drained {
            if let Artifact::Path(path) = artifact {
                remove_file(&path);
            }
        }
        info!(count, "artifact store purged");
        count
    }

    /// Deletes untracked `<uuid>.png` files left in the directory by an
    /// earlier run that never reached `purge`.
    pub fn sweep_orphans(&self) -> usize {
        let tracked: Vec<PathBuf> = self
            .entries()
            .values()
            .filter_map(|a| match a {
                Artifact::Path(p) => Some(p.clone()),
                Artifact::Bytes(_) => None,
            })
            .collect();

        let mut removed = 0;
        for entry in WalkDir::new(&self.dir).max_depth(1).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || tracked.iter().any(|t| t == path) {
                continue;
            }
            let is_artifact = path.extension().is_some_and(|ext| ext == "png")
                && path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|s| Uuid::parse_str(s).is_ok());
            if is_artifact {
                remove_file(path);
                removed += 1;
            }
        }
        if removed > 0 {
            info!(removed, dir = %self.dir.display(), "stale artifacts swept");
        }
        removed
    }
}

fn remove_file(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove artifact");
        }
    }
}
