//! In-memory [`RemoteStore`] with failure injection, for tests.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use diskmirror_core::types::{FileName, RemoteFileEntry};
use serde_json::json;

use crate::error::{io_err, RemoteError};
use crate::store::{upload_name, RemoteStore};

/// A call observed by a [`MemoryStore`], in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    EnsureFolder,
    List,
    Upload { name: String, overwrite: bool },
    Delete { name: String, permanently: bool },
}

#[derive(Debug, Default)]
struct State {
    folder_exists: bool,
    objects: BTreeMap<String, Vec<u8>>,
    trash: BTreeMap<String, Vec<u8>>,
    failing_lists: usize,
    failing_uploads: HashSet<String>,
    failing_deletes: HashSet<String>,
    calls: Vec<StoreCall>,
}

/// Remote folder held in a map. Uploads read the real local file.
#[derive(Debug)]
pub struct MemoryStore {
    folder: String,
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            state: Mutex::new(State::default()),
        }
    }

    /// Store preloaded with empty objects named `names`.
    pub fn with_objects<'a>(folder: impl Into<String>, names: impl IntoIterator<Item = &'a str>) -> Self {
        let store = Self::new(folder);
        {
            let mut state = store.lock();
            state.folder_exists = true;
            for name in names {
                state.objects.insert(name.to_string(), Vec::new());
            }
        }
        store
    }

    pub fn insert(&self, name: &str, contents: &[u8]) {
        self.lock().objects.insert(name.to_string(), contents.to_vec());
    }

    /// Sorted names currently in the folder.
    pub fn names(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(name).cloned()
    }

    /// Sorted names moved to trash by non-permanent deletes.
    pub fn trash_names(&self) -> Vec<String> {
        self.lock().trash.keys().cloned().collect()
    }

    pub fn folder_exists(&self) -> bool {
        self.lock().folder_exists
    }

    /// Make the next `count` calls to `list` fail with HTTP 503.
    pub fn fail_next_lists(&self, count: usize) {
        self.lock().failing_lists = count;
    }

    pub fn fail_uploads_of(&self, name: &str) {
        self.lock().failing_uploads.insert(name.to_string());
    }

    pub fn fail_deletes_of(&self, name: &str) {
        self.lock().failing_deletes.insert(name.to_string());
    }

    /// Stop injecting failures; the store behaves normally again.
    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.failing_lists = 0;
        state.failing_uploads.clear();
        state.failing_deletes.clear();
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Return and forget the calls recorded so far.
    pub fn take_calls(&self) -> Vec<StoreCall> {
        std::mem::take(&mut self.lock().calls)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn unavailable() -> RemoteError {
    RemoteError::Http {
        status: 503,
        body: "injected failure".to_string(),
    }
}

impl RemoteStore for MemoryStore {
    fn folder(&self) -> &str {
        &self.folder
    }

    fn ensure_folder(&self) -> Result<(), RemoteError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::EnsureFolder);
        state.folder_exists = true;
        Ok(())
    }

    fn list(&self) -> Result<Vec<RemoteFileEntry>, RemoteError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::List);
        if state.failing_lists > 0 {
            state.failing_lists -= 1;
            return Err(unavailable());
        }
        Ok(state
            .objects
            .iter()
            .map(|(name, bytes)| RemoteFileEntry {
                name: FileName::from(name.as_str()),
                metadata: json!({ "type": "file", "size": bytes.len() }),
            })
            .collect())
    }

    fn upload(&self, local_path: &Path, overwrite: bool) -> Result<(), RemoteError> {
        let name = upload_name(local_path)?.0;
        let mut state = self.lock();
        state.calls.push(StoreCall::Upload {
            name: name.clone(),
            overwrite,
        });
        if state.failing_uploads.contains(&name) {
            return Err(unavailable());
        }
        if !overwrite && state.objects.contains_key(&name) {
            return Err(RemoteError::Http {
                status: 409,
                body: format!("{name} already exists"),
            });
        }
        let bytes = std::fs::read(local_path).map_err(|e| io_err(local_path, e))?;
        state.objects.insert(name, bytes);
        Ok(())
    }

    fn delete(&self, name: &FileName, permanently: bool) -> Result<(), RemoteError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::Delete {
            name: name.0.clone(),
            permanently,
        });
        if state.failing_deletes.contains(&name.0) {
            return Err(unavailable());
        }
        match state.objects.remove(&name.0) {
            Some(bytes) => {
                if !permanently {
                    state.trash.insert(name.0.clone(), bytes);
                }
                Ok(())
            }
            None => Err(RemoteError::Http {
                status: 404,
                body: format!("{name} not found"),
            }),
        }
    }
}
