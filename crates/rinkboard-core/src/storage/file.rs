//! Boards as JSON files on disk (native only).

use super::{BoxFuture, Storage, StorageError, StorageResult, decode_board, encode_board};
use crate::elements::DrawingElement;
use std::fs;
use std::path::{Path, PathBuf};

/// Keeps each board as `<owner_id>.json` under one directory.
pub struct FileStorage {
    /// Base directory for board files.
    base_path: PathBuf,
}

impl FileStorage {
    /// Store boards under `base_path`, creating it if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Store boards under the platform's local data directory.
    ///
    /// On Linux: `~/.local/share/rinkboard/boards/`
    /// On Windows: `%LOCALAPPDATA%\rinkboard\boards\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("No local data directory on this platform".to_string()))?;

        Self::new(base.join("rinkboard").join("boards"))
    }

    /// File path for an owner id. Characters unsafe in file names become `_`.
    fn board_path(&self, owner_id: &str) -> PathBuf {
        let safe_id: String = owner_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, owner_id: &str, elements: &[DrawingElement]) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(owner_id);
        let encoded = encode_board(elements);

        Box::pin(async move {
            let json = encoded?;
            // Write beside the board, then swap it in.
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", tmp.display(), e))
            })?;
            fs::rename(&tmp, &path).map_err(|e| {
                StorageError::Io(format!("Failed to replace {}: {}", path.display(), e))
            })
        })
    }

    fn load(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<Vec<DrawingElement>>> {
        let path = self.board_path(owner_id);
        let owner_id = owner_id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(owner_id));
            }

            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;

            decode_board(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(owner_id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let ids = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
                .collect();
            Ok(ids)
        })
    }

    fn exists(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.board_path(owner_id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
