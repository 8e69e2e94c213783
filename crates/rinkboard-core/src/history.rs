//! Snapshot-based undo/redo.

use std::collections::VecDeque;

use crate::elements::ElementCollection;

/// Default number of undo steps kept.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Undo/redo stacks of whole-collection snapshots.
///
/// Snapshots are `ElementCollection` clones, so recording is a reference-count
/// bump and no later mutation of the live collection can reach into history.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<ElementCollection>,
    future: Vec<ElementCollection>,
    limit: usize,
    displaced: Option<Displaced>,
}

/// What the latest `record` pushed out, kept until the next step so that
/// `discard_last` can undo the record exactly.
#[derive(Debug, Clone)]
struct Displaced {
    evicted: Option<ElementCollection>,
    future: Vec<ElementCollection>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl History {
    /// Create a history keeping at most `limit` undo steps (minimum 1).
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: limit.max(1),
            displaced: None,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Remember `present` before it gets mutated. Clears the redo stack.
    pub fn record(&mut self, present: &ElementCollection) {
        self.past.push_back(present.clone());
        let future = std::mem::take(&mut self.future);
        let evicted = if self.past.len() > self.limit {
            self.past.pop_front()
        } else {
            None
        };
        self.displaced = Some(Displaced { evicted, future });
        log::debug!("History record: {} undo step(s)", self.past.len());
    }

    /// Step back. Returns the collection to restore, or `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self, present: &ElementCollection) -> Option<ElementCollection> {
        let previous = self.past.pop_back()?;
        self.displaced = None;
        self.future.push(present.clone());
        if self.future.len() > self.limit {
            self.future.remove(0);
        }
        log::debug!(
            "History undo: {} undo / {} redo step(s)",
            self.past.len(),
            self.future.len()
        );
        Some(previous)
    }

    /// Step forward after an undo.
    pub fn redo(&mut self, present: &ElementCollection) -> Option<ElementCollection> {
        let next = self.future.pop()?;
        self.displaced = None;
        self.past.push_back(present.clone());
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        log::debug!(
            "History redo: {} undo / {} redo step(s)",
            self.past.len(),
            self.future.len()
        );
        Some(next)
    }

    /// Drop the most recent record when the mutation it guarded never
    /// happened. Right after a `record` this also brings back the snapshot
    /// it evicted and the redo stack it cleared.
    pub fn discard_last(&mut self) -> Option<ElementCollection> {
        let dropped = self.past.pop_back()?;
        if let Some(displaced) = self.displaced.take() {
            if let Some(evicted) = displaced.evicted {
                self.past.push_front(evicted);
            }
            self.future = displaced.future;
        }
        log::debug!(
            "History discard: {} undo / {} redo step(s)",
            self.past.len(),
            self.future.len()
        );
        Some(dropped)
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.displaced = None;
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}
