//! Ties a board owner to a storage backend and saves after gestures.

use crate::canvas::{Canvas, CanvasError};
use crate::elements::{DrawingElement, ElementCollection};
use crate::input::Instant;
use crate::storage::{Storage, StorageError, StorageResult};
use std::collections::HashSet;
use std::sync::Arc;

/// Load/save plumbing for one board.
///
/// Saving never happens mid-gesture: [`SaveSession::save_if_dirty`] waits
/// until the controller reports the gesture has ended.
pub struct SaveSession<S: Storage> {
    storage: Arc<S>,
    owner_id: String,
    last_save: Option<Instant>,
}

impl<S: Storage> SaveSession<S> {
    pub fn new(storage: Arc<S>, owner_id: impl Into<String>) -> Self {
        Self {
            storage,
            owner_id: owner_id.into(),
            last_save: None,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// When the board was last written successfully.
    pub fn last_save(&self) -> Option<Instant> {
        self.last_save
    }

    /// Load the board. A board that was never saved loads as empty.
    ///
    /// Elements that break collection invariants (short arrows, repeated
    /// ids) are dropped with a warning instead of failing the load.
    pub async fn load(&mut self) -> StorageResult<ElementCollection> {
        let elements = match self.storage.load(&self.owner_id).await {
            Ok(elements) => elements,
            Err(StorageError::NotFound(_)) => {
                log::info!("No saved board for {}, starting empty", self.owner_id);
                return Ok(ElementCollection::new());
            }
            Err(err) => {
                log::warn!("Failed to load board for {}: {err}", self.owner_id);
                return Err(err);
            }
        };

        let total = elements.len();
        let collection = sanitize(elements);
        log::info!(
            "Loaded board for {}: {} element(s), {} dropped",
            self.owner_id,
            collection.len(),
            total - collection.len()
        );
        Ok(collection)
    }

    /// Load the board straight into a controller.
    pub async fn load_into(&mut self, canvas: &mut Canvas) -> Result<(), CanvasError> {
        let elements = self.load().await?;
        canvas.load_elements(elements);
        Ok(())
    }

    /// Write the controller's elements unconditionally.
    pub async fn save(&mut self, canvas: &Canvas) -> StorageResult<()> {
        let elements = canvas.elements_for_persistence();
        self.storage.save(&self.owner_id, &elements).await?;
        self.last_save = Some(Instant::now());
        log::info!("Saved board for {}: {} element(s)", self.owner_id, elements.len());
        Ok(())
    }

    /// Save if the controller has unsaved changes and no gesture is running.
    ///
    /// Returns whether a save happened. On failure the controller stays dirty
    /// so the next call retries; its elements are left untouched.
    pub async fn save_if_dirty(&mut self, canvas: &mut Canvas) -> Result<bool, CanvasError> {
        if canvas.is_gesture_active() || !canvas.take_dirty() {
            return Ok(false);
        }
        match self.save(canvas).await {
            Ok(()) => Ok(true),
            Err(err) => {
                canvas.mark_dirty();
                log::warn!("Failed to save board for {}: {err}", self.owner_id);
                Err(err.into())
            }
        }
    }

    /// Remove the stored board.
    pub async fn delete(&self) -> StorageResult<()> {
        self.storage.delete(&self.owner_id).await
    }
}

/// Drop elements that violate collection invariants and pull the rest back
/// into normalized space.
fn sanitize(elements: Vec<DrawingElement>) -> ElementCollection {
    let mut seen = HashSet::new();
    elements
        .into_iter()
        .filter(|element| {
            if let Err(err) = element.validate() {
                log::warn!("Dropping stored element {}: {err}", element.id());
                return false;
            }
            if !seen.insert(element.id()) {
                log::warn!("Dropping stored element with repeated id {}", element.id());
                return false;
            }
            true
        })
        .map(|element| {
            let clamped = element.clamped();
            if clamped != element {
                log::warn!("Clamping stored element {} into the rink", element.id());
            }
            clamped.for_persistence()
        })
        .collect()
}

/// Create a platform-appropriate storage backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::FileStorage>> {
    Ok(Arc::new(crate::storage::FileStorage::default_location()?))
}

/// Convenience type alias for platform-specific storage.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = crate::storage::FileStorage;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::storage::{BoxFuture, MemoryStorage, block_on};
    use kurbo::Point;

    /// Backend whose writes always fail.
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn save(&self, _: &str, _: &[DrawingElement]) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Io("read-only".to_string())) })
        }

        fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Vec<DrawingElement>>> {
            let id = id.to_string();
            Box::pin(async move { Err(StorageError::NotFound(id)) })
        }

        fn delete(&self, _: &str) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
            Box::pin(async { Ok(vec![]) })
        }

        fn exists(&self, _: &str) -> BoxFuture<'_, StorageResult<bool>> {
            Box::pin(async { Ok(false) })
        }
    }

    fn canvas_with_marker() -> Canvas {
        let mut canvas = Canvas::new();
        canvas.set_tool("defense").unwrap();
        canvas.pointer_down(Point::new(100.0, 100.0), Modifiers::NONE);
        canvas.pointer_up(Point::new(100.0, 100.0));
        canvas
    }

    #[test]
    fn test_missing_board_loads_empty() {
        let mut session = SaveSession::new(Arc::new(MemoryStorage::new()), "team-7");
        let loaded = block_on(session.load()).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load_is_equal() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = SaveSession::new(storage.clone(), "team-7");
        let mut canvas = canvas_with_marker();

        assert!(block_on(session.save_if_dirty(&mut canvas)).unwrap());
        assert!(session.last_save().is_some());
        assert!(!canvas.is_dirty());

        let loaded = block_on(session.load()).unwrap();
        assert_eq!(&loaded, canvas.elements());
    }

    #[test]
    fn test_clean_canvas_is_not_saved() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = SaveSession::new(storage.clone(), "team-7");
        let mut canvas = Canvas::new();
        assert!(!block_on(session.save_if_dirty(&mut canvas)).unwrap());
        assert!(storage.raw("team-7").is_none());
    }

    #[test]
    fn test_no_save_mid_gesture() {
        let mut session = SaveSession::new(Arc::new(MemoryStorage::new()), "team-7");
        let mut canvas = canvas_with_marker();
        canvas.set_tool("pass").unwrap();
        canvas.pointer_down(Point::new(300.0, 300.0), Modifiers::NONE);

        assert!(!block_on(session.save_if_dirty(&mut canvas)).unwrap());
        assert!(canvas.is_dirty());
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let mut session = SaveSession::new(Arc::new(ReadOnlyStorage), "team-7");
        let mut canvas = canvas_with_marker();
        let before = canvas.elements().clone();

        let err = block_on(session.save_if_dirty(&mut canvas)).unwrap_err();
        assert!(matches!(err, CanvasError::Persistence(StorageError::Io(_))));
        assert!(canvas.is_dirty());
        assert_eq!(canvas.elements(), &before);
        assert!(session.last_save().is_none());
    }

    #[test]
    fn test_load_drops_invalid_elements() {
        let storage = Arc::new(MemoryStorage::new());
        let json = r##"[
            {"type":"arrow","id":"8d7a3b52-6a0e-4b4c-9d1e-3f1c2b5a6e70","kind":"pass",
             "startPoint":{"x":0.1,"y":0.1},"path":[{"x":0.1,"y":0.1}],
             "endPoint":{"x":0.1,"y":0.1},"color":"#000000"},
            {"type":"text","id":"1b4e28ba-2fa1-41d2-883f-0016d3cca427","position":{"x":0.5,"y":0.5},
             "label":"Hi","fontSize":18.0,"color":"#000000","isEditing":true},
            {"type":"text","id":"1b4e28ba-2fa1-41d2-883f-0016d3cca427","position":{"x":0.2,"y":0.2},
             "label":"Dup","fontSize":18.0,"color":"#000000"}
        ]"##;
        storage.insert_raw("team-7", json).unwrap();

        let mut session = SaveSession::new(storage, "team-7");
        let loaded = block_on(session.load()).unwrap();
        assert_eq!(loaded.len(), 1);
        let label = loaded.as_slice()[0].as_text().unwrap();
        assert_eq!(label.label, "Hi");
        assert!(!label.is_editing);
    }

    #[test]
    fn test_load_clamps_out_of_range_geometry() {
        let storage = Arc::new(MemoryStorage::new());
        let json = r##"[
            {"type":"marker","id":"0f8fad5b-d9cb-469f-a165-70867728950e","kind":"puck",
             "position":{"x":1.5,"y":-0.25},"color":"#000000","radius":6.0},
            {"type":"arrow","id":"7c9e6679-7425-40de-944b-e07fc1f90ae7","kind":"shoot",
             "startPoint":{"x":0.9,"y":0.9},"path":[{"x":-0.5,"y":0.5},{"x":0.4,"y":2.0}],
             "endPoint":{"x":0.1,"y":0.1},"color":"#000000"}
        ]"##;
        storage.insert_raw("team-7", json).unwrap();

        let mut session = SaveSession::new(storage, "team-7");
        let loaded = block_on(session.load()).unwrap();
        assert_eq!(loaded.len(), 2);

        let marker = loaded.as_slice()[0].as_marker().unwrap();
        assert_eq!(marker.position, Point::new(1.0, 0.0));

        let arrow = loaded.as_slice()[1].as_arrow().unwrap();
        assert_eq!(arrow.path, vec![Point::new(0.0, 0.5), Point::new(0.4, 1.0)]);
        assert_eq!(arrow.start_point, Point::new(0.0, 0.5));
        assert_eq!(arrow.end_point, Point::new(0.4, 1.0));
    }

    #[test]
    fn test_load_into_canvas() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = SaveSession::new(storage, "team-7");
        let mut source = canvas_with_marker();
        block_on(session.save_if_dirty(&mut source)).unwrap();

        let mut canvas = Canvas::new();
        block_on(session.load_into(&mut canvas)).unwrap();
        assert_eq!(canvas.elements(), source.elements());
        assert!(!canvas.can_undo());
    }
}
