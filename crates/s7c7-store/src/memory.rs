//! In-memory implementation of the RemoteStore trait.
//!
//! This is primarily for testing. It has the same semantics as the GitHub
//! store, records every call, and can be scripted to answer probes or reject
//! writes.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::traits::RemoteStore;

/// A call made against a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Exists(String),
    Create(String),
}

/// A forced answer for the next `exists` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedProbe {
    Present,
    Absent,
    TransportFailure,
}

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via Mutex.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Files indexed by path.
    files: BTreeMap<String, Vec<u8>>,

    /// Every call, in order.
    calls: Vec<StoreCall>,

    /// Forced probe answers, consumed before consulting `files`.
    probes: VecDeque<ScriptedProbe>,

    /// Status and body returned for every create, when set.
    reject: Option<(u16, String)>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed a file without recording a call.
    pub fn insert(&self, path: &str, content: &[u8]) {
        self.lock().files.insert(path.to_string(), content.to_vec());
    }

    /// Read a stored file.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().files.get(path).cloned()
    }

    /// All stored paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.lock().files.keys().cloned().collect()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Paths passed to `create`, in order.
    pub fn created(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::Create(path) => Some(path.clone()),
                StoreCall::Exists(_) => None,
            })
            .collect()
    }

    /// Paths passed to `exists`, in order.
    pub fn probed(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::Exists(path) => Some(path.clone()),
                StoreCall::Create(_) => None,
            })
            .collect()
    }

    /// Queue forced answers for upcoming `exists` calls.
    pub fn script_probes(&self, probes: impl IntoIterator<Item = ScriptedProbe>) {
        self.lock().probes.extend(probes);
    }

    /// Make every subsequent `create` fail with `status` and `body`.
    pub fn reject_creates(&self, status: u16, body: &str) {
        self.lock().reject = Some((status, body.to_string()));
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn exists(&self, path: &str) -> Result<bool> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Exists(path.to_string()));

        match inner.probes.pop_front() {
            Some(ScriptedProbe::Present) => Ok(true),
            Some(ScriptedProbe::Absent) => Ok(false),
            Some(ScriptedProbe::TransportFailure) => Err(StoreError::Transport {
                path: path.to_string(),
                message: "scripted transport failure".into(),
            }),
            None => Ok(inner.files.contains_key(path)),
        }
    }

    async fn create(&self, path: &str, content: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Create(path.to_string()));

        if let Some((status, body)) = &inner.reject {
            return Err(StoreError::Rejected {
                path: path.to_string(),
                status: *status,
                body: body.clone(),
            });
        }

        // The contents API refuses to create over an existing file.
        if inner.files.contains_key(path) {
            return Err(StoreError::Rejected {
                path: path.to_string(),
                status: 422,
                body: r#"{"message":"Invalid request.\n\n\"sha\" wasn't supplied."}"#.into(),
            });
        }

        inner.files.insert(path.to_string(), content.to_vec());
        Ok(())
    }
}
