//! JSON snapshot files for [`MemoryStore`](super::MemoryStore).

use super::{StoreError, StoreSnapshot};
use std::path::Path;

/// Read a snapshot file. A missing file is an empty store.
pub async fn load_snapshot(path: &Path) -> Result<StoreSnapshot, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreSnapshot::default()),
        Err(e) => Err(e.into()),
    }
}

/// Write a snapshot atomically: temp file first, then rename over the target.
pub async fn write_snapshot(path: &Path, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, json).await?;
    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}
