//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult, decode_board, encode_board};
use crate::elements::DrawingElement;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Boards are kept in their serialized form, so a load goes through the same
/// JSON boundary as a real store.
#[derive(Default)]
pub struct MemoryStorage {
    boards: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON stored for `owner_id`.
    pub fn raw(&self, owner_id: &str) -> Option<String> {
        self.boards.read().ok()?.get(owner_id).cloned()
    }

    /// Store raw JSON for `owner_id`, bypassing encoding.
    pub fn insert_raw(&self, owner_id: &str, json: impl Into<String>) -> StorageResult<()> {
        let mut boards = self
            .boards
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        boards.insert(owner_id.to_string(), json.into());
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn save(&self, owner_id: &str, elements: &[DrawingElement]) -> BoxFuture<'_, StorageResult<()>> {
        let owner_id = owner_id.to_string();
        let encoded = encode_board(elements);
        Box::pin(async move { self.insert_raw(&owner_id, encoded?) })
    }

    fn load(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<Vec<DrawingElement>>> {
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            let json = {
                let boards = self
                    .boards
                    .read()
                    .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
                boards
                    .get(&owner_id)
                    .cloned()
                    .ok_or_else(|| StorageError::NotFound(owner_id.clone()))?
            };
            decode_board(&json)
        })
    }

    fn delete(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            let mut boards = self
                .boards
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            boards.remove(&owner_id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let boards = self
                .boards
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(boards.keys().cloned().collect())
        })
    }

    fn exists(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            let boards = self
                .boards
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(boards.contains_key(&owner_id))
        })
    }
}
