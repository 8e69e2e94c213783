//! Storage abstraction for board persistence.
//!
//! A board is stored under an opaque owner id as an ordered JSON array of
//! tagged elements. The core never interprets the owner id.

mod memory;
mod session;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;
pub use session::SaveSession;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
#[cfg(not(target_arch = "wasm32"))]
pub use session::{PlatformStorage, create_default_storage};

use crate::elements::DrawingElement;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for board storage backends.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save the elements of a board.
    fn save(&self, owner_id: &str, elements: &[DrawingElement]) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the elements of a board.
    fn load(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<Vec<DrawingElement>>>;

    /// Delete a board.
    fn delete(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored owner ids.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a board exists.
    fn exists(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for board storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Save the elements of a board.
    fn save(&self, owner_id: &str, elements: &[DrawingElement]) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the elements of a board.
    fn load(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<Vec<DrawingElement>>>;

    /// Delete a board.
    fn delete(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored owner ids.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a board exists.
    fn exists(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Serialize elements for storage. `isEditing` is always written as `false`.
pub fn encode_board(elements: &[DrawingElement]) -> StorageResult<String> {
    let persisted: Vec<DrawingElement> = elements.iter().map(DrawingElement::for_persistence).collect();
    serde_json::to_string(&persisted).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Parse a stored board.
pub fn decode_board(json: &str) -> StorageResult<Vec<DrawingElement>> {
    serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Simple blocking executor for tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Arrow, ArrowKind, Marker, MarkerKind, RinkColor, TextLabel};
    use kurbo::Point;

    #[test]
    fn test_encode_clears_editing_flag() {
        let mut label = TextLabel::new(Point::new(0.3, 0.3), "PK unit", 16.0, RinkColor::black());
        label.is_editing = true;
        let json = encode_board(&[label.into()]).unwrap();
        let decoded = decode_board(&json).unwrap();
        assert!(!decoded[0].is_editing());
    }

    #[test]
    fn test_encode_decode_keeps_order() {
        let arrow = Arrow::new(ArrowKind::Movement, Point::new(0.1, 0.1), RinkColor::black())
            .append_point(Point::new(0.2, 0.4))
            .finalize()
            .unwrap();
        let marker = Marker::new(MarkerKind::Goalie, Point::new(0.95, 0.5), RinkColor::black());
        let elements: Vec<DrawingElement> = vec![arrow.into(), marker.into()];
        let decoded = decode_board(&encode_board(&elements).unwrap()).unwrap();
        assert_eq!(decoded, elements);
    }

    #[test]
    fn test_decode_garbage_is_serialization_error() {
        assert!(matches!(
            decode_board("{not json"),
            Err(StorageError::Serialization(_))
        ));
    }
}
