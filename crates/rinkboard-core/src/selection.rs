//! Set of selected element ids.

use crate::elements::{ElementCollection, ElementId};

/// Selected element ids in selection order, without duplicates.
///
/// Kept a subset of the live collection: call [`SelectionSet::retain_existing`]
/// after every collection replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<ElementId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.ids.iter().copied()
    }

    /// Select only `id`.
    pub fn replace(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add `id` if not already selected.
    pub fn add(&mut self, id: ElementId) {
        if !self.contains(id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: ElementId) {
        self.ids.retain(|selected| *selected != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the selection with `ids`, dropping duplicates.
    pub fn set_all(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    /// Drop ids that no longer exist. Returns how many were pruned.
    pub fn retain_existing(&mut self, elements: &ElementCollection) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| elements.contains(*id));
        before - self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{DrawingElement, Marker, MarkerKind, RinkColor};
    use kurbo::Point;
    use uuid::Uuid;

    #[test]
    fn test_replace_and_add() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut selection = SelectionSet::new();
        selection.replace(a);
        selection.add(b);
        selection.add(b);
        assert_eq!(selection.ids(), &[a, b]);

        selection.replace(b);
        assert_eq!(selection.ids(), &[b]);
    }

    #[test]
    fn test_set_all_dedupes() {
        let a = Uuid::new_v4();
        let mut selection = SelectionSet::new();
        selection.set_all([a, a, a]);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_retain_existing_prunes_stale_ids() {
        let marker = Marker::new(MarkerKind::Puck, Point::new(0.5, 0.5), RinkColor::black());
        let kept = marker.id();
        let collection: ElementCollection = vec![DrawingElement::Marker(marker)].into();

        let mut selection = SelectionSet::new();
        selection.set_all([kept, Uuid::new_v4()]);
        assert_eq!(selection.retain_existing(&collection), 1);
        assert_eq!(selection.ids(), &[kept]);

        assert_eq!(selection.retain_existing(&ElementCollection::new()), 1);
        assert!(selection.is_empty());
    }
}
