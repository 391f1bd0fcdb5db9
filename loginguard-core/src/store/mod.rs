//! Two-level option storage.
//!
//! The guard only needs `get`/`set`/`delete` on a `(scope, key)` pair. Hosts
//! that already own a settings database implement [`OptionStore`] over it;
//! the server uses [`MemoryStore`] and persists its snapshots with
//! [`file::write_snapshot`].

pub mod file;
mod memory;

pub use memory::{MemoryStore, StoreSnapshot, StoreWatcher};

use async_trait::async_trait;
use loginguard_sdk::config::Scope;
use serde_json::Value;
use thiserror::Error;

/// Key under which the guard keeps its settings object at each scope.
pub const SETTINGS_OPTION: &str = "multisite_recaptcha";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("failed to read or write snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode or decode snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scoped key/value storage read by the resolver and written by the
/// settings pages.
#[async_trait]
pub trait OptionStore: Send + Sync {
    async fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, scope: Scope, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove a key. Removing a missing key is not an error.
    async fn delete(&self, scope: Scope, key: &str) -> Result<(), StoreError>;

    /// `get`, falling back to `default` when the key is missing.
    async fn get_or(&self, scope: Scope, key: &str, default: Value) -> Result<Value, StoreError> {
        Ok(self.get(scope, key).await?.unwrap_or(default))
    }
}
