//! In-memory option store with change notification.
//!
//! `MemoryStore` keeps every scope behind one `RwLock` and maintains an
//! incrementing version counter. Subscribers receive a [`StoreWatcher`] that
//! can `await` the next change, which is how the server knows when to write
//! a new snapshot to disk.

use super::{OptionStore, StoreError};
use async_trait::async_trait;
use loginguard_sdk::config::{Scope, SiteId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, watch};

/// Every stored option, grouped by scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub network: BTreeMap<String, Value>,
    #[serde(default)]
    pub sites: BTreeMap<SiteId, BTreeMap<String, Value>>,
}

impl StoreSnapshot {
    fn scope(&self, scope: Scope) -> Option<&BTreeMap<String, Value>> {
        match scope {
            Scope::Network => Some(&self.network),
            Scope::Site(id) => self.sites.get(&id),
        }
    }

    fn scope_mut(&mut self, scope: Scope) -> &mut BTreeMap<String, Value> {
        match scope {
            Scope::Network => &mut self.network,
            Scope::Site(id) => self.sites.entry(id).or_default(),
        }
    }
}

/// A shared, versioned option store.
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

struct MemoryStoreInner {
    data: RwLock<StoreSnapshot>,
    version: AtomicU64,
    version_tx: watch::Sender<u64>,
}

/// Receives notifications when a [`MemoryStore`] is written.
pub struct StoreWatcher {
    version_rx: watch::Receiver<u64>,
}

// -- MemoryStore --------------------------------------------------------

impl MemoryStore {
    pub fn new() -> Self {
        Self::from_snapshot(StoreSnapshot::default())
    }

    /// Start from previously persisted contents.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let (version_tx, _) = watch::channel(0u64);
        Self {
            inner: Arc::new(MemoryStoreInner {
                data: RwLock::new(snapshot),
                version: AtomicU64::new(0),
                version_tx,
            }),
        }
    }

    /// Copy of the whole store.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.inner.data.read().await.clone()
    }

    /// Number of writes applied so far.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Relaxed)
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> StoreWatcher {
        StoreWatcher {
            version_rx: self.inner.version_tx.subscribe(),
        }
    }

    fn bump(&self) {
        let new_version = self.inner.version.fetch_add(1, Ordering::Relaxed) + 1;
        let _ = self.inner.version_tx.send(new_version);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl OptionStore for MemoryStore {
    async fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>, StoreError> {
        let data = self.inner.data.read().await;
        Ok(data.scope(scope).and_then(|options| options.get(key)).cloned())
    }

    async fn set(&self, scope: Scope, key: &str, value: Value) -> Result<(), StoreError> {
        let mut data = self.inner.data.write().await;
        data.scope_mut(scope).insert(key.to_owned(), value);
        // Release the write lock before notifying so watchers can read.
        drop(data);
        self.bump();
        Ok(())
    }

    async fn delete(&self, scope: Scope, key: &str) -> Result<(), StoreError> {
        let mut data = self.inner.data.write().await;
        let removed = match scope {
            Scope::Network => data.network.remove(key).is_some(),
            Scope::Site(id) => {
                let removed = data
                    .sites
                    .get_mut(&id)
                    .is_some_and(|options| options.remove(key).is_some());
                if data.sites.get(&id).is_some_and(BTreeMap::is_empty) {
                    data.sites.remove(&id);
                }
                removed
            }
        };
        drop(data);
        if removed {
            self.bump();
        }
        Ok(())
    }
}

// -- StoreWatcher -------------------------------------------------------

impl StoreWatcher {
    /// Wait until the store is written again.
    ///
    /// Returns `Err` once the [`MemoryStore`] has been dropped.
    pub async fn changed(&mut self) -> Result<u64, watch::error::RecvError> {
        self.version_rx.changed().await?;
        Ok(*self.version_rx.borrow_and_update())
    }
}
