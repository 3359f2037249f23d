//! Saved requests, grouped by name and persisted as one json document.
//!
//! The whole store is read at [`RequestRepository::load`] and rewritten after
//! every mutation. There is no locking: two processes working on the same
//! file race and the last writer wins.

use std::collections::BTreeSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::{JurlError, Result};
use crate::http_request::Request;

pub const STORE_VERSION: u32 = 1;

/// Name of the bucket holding requests saved without a group.
pub const UNGROUPED: &str = "";

type Groups = IndexMap<String, Vec<Request>>;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    groups: Groups,
}

#[derive(Debug, Deserialize)]
struct VersionHeader {
    version: u32,
}

#[derive(Debug)]
pub struct RequestRepository {
    path: PathBuf,
    saved_requests: Groups,
}

impl RequestRepository {
    pub fn new(path: impl Into<PathBuf>) -> RequestRepository {
        RequestRepository {
            path: path.into(),
            saved_requests: Groups::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory state with the file content. A missing file is
    /// an empty store.
    pub fn load(&mut self) -> Result<()> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved requests yet");
                self.saved_requests = Groups::new();
                return Ok(());
            }
            Err(e) => return Err(JurlError::io("failed to load requests", &self.path, e)),
        };

        let header: VersionHeader =
            serde_json::from_str(&content).map_err(|e| JurlError::CorruptStore(e.to_string()))?;
        if header.version != STORE_VERSION {
            return Err(JurlError::CorruptStore(format!(
                "unsupported store version {}, expected {}",
                header.version, STORE_VERSION
            )));
        }
        let document: StoreDocument =
            serde_json::from_str(&content).map_err(|e| JurlError::CorruptStore(e.to_string()))?;
        debug!(path = %self.path.display(), groups = document.groups.len(), "loaded saved requests");
        self.saved_requests = document.groups;
        Ok(())
    }

    pub fn create_group(&mut self, name: &str) -> Result<()> {
        if self.saved_requests.contains_key(name) {
            return Err(JurlError::AlreadyExists(format!(
                "group name \"{}\" already exists",
                name
            )));
        }
        self.saved_requests.insert(name.to_string(), Vec::new());
        self.flush()
    }

    /// Appends to the group, creating it when unseen. Name collisions are
    /// not checked here, see [`RequestRepository::contains_request`].
    pub fn save(&mut self, group: &str, request: Request) -> Result<()> {
        self.saved_requests
            .entry(group.to_string())
            .or_default()
            .push(request);
        self.flush()
    }

    pub fn contains_request(&self, group: &str, name: &str) -> bool {
        self.group_requests(group).iter().any(|r| r.name == name)
    }

    /// Every group name in creation order, without the ungrouped bucket.
    pub fn all_group_names(&self) -> Vec<String> {
        self.saved_requests
            .keys()
            .filter(|name| name.as_str() != UNGROUPED)
            .cloned()
            .collect()
    }

    pub fn group_requests(&self, group: &str) -> &[Request] {
        self.saved_requests
            .get(group)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolves zero-based ordinals in ascending order. Every ordinal is
    /// checked before anything is returned.
    pub fn requests(&self, group: &str, ordinals: &BTreeSet<usize>) -> Result<Vec<Request>> {
        let requests = self.saved_requests.get(group);
        ordinals
            .iter()
            .map(|&idx| {
                requests
                    .and_then(|list| list.get(idx))
                    .cloned()
                    .ok_or_else(|| JurlError::NotFound(format!("invalid request number {}", idx + 1)))
            })
            .collect()
    }

    fn flush(&self) -> Result<()> {
        let document = StoreDocument {
            version: STORE_VERSION,
            groups: self.saved_requests.clone(),
        };
        let content = serde_json::to_string_pretty(&document)
            .map_err(|e| JurlError::CorruptStore(format!("failed to serialise requests: {}", e)))?;

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| JurlError::io("failed to create store directory", parent, e))?;

        let mut temp =
            NamedTempFile::new_in(parent).map_err(|e| JurlError::io("failed to save requests", parent, e))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| JurlError::io("failed to save requests", temp.path(), e))?;
        temp.persist(&self.path)
            .map_err(|e| JurlError::io("failed to save requests", &self.path, e.error))?;
        debug!(path = %self.path.display(), "saved requests flushed");
        Ok(())
    }
}
