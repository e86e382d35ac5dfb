//! Durable snapshot slot
//!
//! The authoritative copy of the database is a byte snapshot kept under a
//! fixed key in simple key-value storage: one JSON file holding the
//! envelope `{"data":[...]}`, where `data` is the byte-array image of the
//! database in the engine's native serialized form. Nothing outside the
//! store reads or writes this slot.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Wire form of the snapshot: an array of unsigned byte values, decodable
/// back into the engine's load routine.
#[derive(Serialize, Deserialize)]
struct SnapshotEnvelope {
    data: Vec<u8>,
}

/// One fixed key of durable key-value storage.
#[derive(Clone)]
pub struct SnapshotSlot {
    path: PathBuf,
}

impl SnapshotSlot {
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", key)),
        }
    }

    /// Read the stored snapshot bytes. `None` if the slot was never
    /// written; decode failures propagate so the caller can decide how to
    /// recover.
    pub async fn load(&self) -> Result<Option<Vec<u8>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).await?;
        let envelope: SnapshotEnvelope = serde_json::from_str(&raw)?;

        Ok(Some(envelope.data))
    }

    /// Write the snapshot bytes atomically (temp file, then rename).
    pub async fn save(&self, bytes: &[u8]) -> Result<()> {
        let raw = serde_json::to_string(&SnapshotEnvelope {
            data: bytes.to_vec(),
        })?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, raw).await?;
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!("Saved snapshot: {} bytes", bytes.len());

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let slot = SnapshotSlot::new(temp.path(), "app-database");

        let bytes = vec![0u8, 1, 127, 255, 64];
        slot.save(&bytes).await.unwrap();

        let loaded = slot.load().await.unwrap();
        assert_eq!(loaded, Some(bytes));
    }

    #[tokio::test]
    async fn test_load_missing_slot_is_none() {
        let temp = TempDir::new().unwrap();
        let slot = SnapshotSlot::new(temp.path(), "app-database");

        assert!(slot.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_slot_is_an_error() {
        let temp = TempDir::new().unwrap();
        let slot = SnapshotSlot::new(temp.path(), "app-database");

        std::fs::write(slot.path(), "not json at all").unwrap();

        assert!(slot.load().await.is_err());
    }

    #[tokio::test]
    async fn test_envelope_is_a_byte_array_under_data() {
        let temp = TempDir::new().unwrap();
        let slot = SnapshotSlot::new(temp.path(), "app-database");

        slot.save(&[7, 8, 9]).await.unwrap();

        let raw = std::fs::read_to_string(slot.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["data"], serde_json::json!([7, 8, 9]));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let temp = TempDir::new().unwrap();
        let slot = SnapshotSlot::new(temp.path(), "app-database");

        slot.save(&[1, 2, 3]).await.unwrap();
        slot.save(&[4, 5]).await.unwrap();

        assert_eq!(slot.load().await.unwrap(), Some(vec![4, 5]));
    }
}
