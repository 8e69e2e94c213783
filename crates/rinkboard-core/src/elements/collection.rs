use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{DrawingElement, ElementId};

/// Immutable, ordered sequence of elements. Order is z-order: later elements
/// are drawn on top.
///
/// Every mutating operation returns a new collection, so cloning for a history
/// snapshot only bumps a reference count.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementCollection {
    elements: Arc<[DrawingElement]>,
}

impl Default for ElementCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementCollection {
    pub fn new() -> Self {
        Self {
            elements: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawingElement> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[DrawingElement] {
        &self.elements
    }

    pub fn get(&self, id: ElementId) -> Option<&DrawingElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Element ids in z-order.
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id()).collect()
    }

    /// Whether both collections share the same backing storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.elements, &other.elements)
    }

    /// New collection with `element` on top.
    pub fn with_pushed(&self, element: DrawingElement) -> Self {
        self.with_extended(std::iter::once(element))
    }

    /// New collection with `elements` appended on top, in order.
    pub fn with_extended(&self, elements: impl IntoIterator<Item = DrawingElement>) -> Self {
        self.elements
            .iter()
            .cloned()
            .chain(elements)
            .collect::<Vec<_>>()
            .into()
    }

    /// New collection without the given ids.
    pub fn without(&self, ids: &[ElementId]) -> Self {
        self.elements
            .iter()
            .filter(|e| !ids.contains(&e.id()))
            .cloned()
            .collect::<Vec<_>>()
            .into()
    }

    /// New collection with the element matching `element.id()` replaced in
    /// place. Unknown ids leave the collection unchanged.
    pub fn with_replaced(&self, element: DrawingElement) -> Self {
        let id = element.id();
        if !self.contains(id) {
            return self.clone();
        }
        self.map(|e| if e.id() == id { element.clone() } else { e.clone() })
    }

    /// New collection with `f` applied to every element.
    pub fn map(&self, f: impl FnMut(&DrawingElement) -> DrawingElement) -> Self {
        self.elements.iter().map(f).collect::<Vec<_>>().into()
    }

    /// Id of the text label currently being edited, if any.
    pub fn editing_id(&self) -> Option<ElementId> {
        self.elements.iter().find(|e| e.is_editing()).map(|e| e.id())
    }

    /// New collection with every `isEditing` flag cleared.
    ///
    /// Returns a cheap clone when nothing is being edited.
    pub fn without_editing(&self) -> Self {
        if self.editing_id().is_none() {
            return self.clone();
        }
        self.map(DrawingElement::for_persistence)
    }

    /// Elements as they should be written to the store.
    pub fn to_persisted(&self) -> Vec<DrawingElement> {
        self.elements.iter().map(DrawingElement::for_persistence).collect()
    }
}

impl From<Vec<DrawingElement>> for ElementCollection {
    fn from(elements: Vec<DrawingElement>) -> Self {
        Self {
            elements: Arc::from(elements),
        }
    }
}

impl FromIterator<DrawingElement> for ElementCollection {
    fn from_iter<I: IntoIterator<Item = DrawingElement>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl<'a> IntoIterator for &'a ElementCollection {
    type Item = &'a DrawingElement;
    type IntoIter = std::slice::Iter<'a, DrawingElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for ElementCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.elements.iter())
    }
}

impl<'de> Deserialize<'de> for ElementCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<DrawingElement>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Marker, MarkerKind, RinkColor, TextLabel};
    use kurbo::Point;

    fn marker(x: f64) -> DrawingElement {
        Marker::new(MarkerKind::Offense, Point::new(x, 0.5), RinkColor::black()).into()
    }

    #[test]
    fn test_mutations_leave_original_untouched() {
        let base = ElementCollection::new().with_pushed(marker(0.1));
        let grown = base.with_pushed(marker(0.2));
        assert_eq!(base.len(), 1);
        assert_eq!(grown.len(), 2);

        let removed = grown.without(&[base.ids()[0]]);
        assert_eq!(removed.len(), 1);
        assert_eq!(grown.len(), 2);
    }

    #[test]
    fn test_clone_shares_storage() {
        let base = ElementCollection::new().with_pushed(marker(0.1));
        let snapshot = base.clone();
        assert!(snapshot.ptr_eq(&base));
    }

    #[test]
    fn test_with_replaced_keeps_order() {
        let a = marker(0.1);
        let b = marker(0.2);
        let c = marker(0.3);
        let collection: ElementCollection = vec![a.clone(), b.clone(), c.clone()].into();

        let mut moved = b.as_marker().unwrap().clone();
        moved.position = Point::new(0.9, 0.9);
        let replaced = collection.with_replaced(moved.clone().into());

        assert_eq!(replaced.ids(), collection.ids());
        assert_eq!(replaced.get(b.id()), Some(&DrawingElement::Marker(moved)));
    }

    #[test]
    fn test_with_replaced_unknown_id_is_noop() {
        let collection: ElementCollection = vec![marker(0.1)].into();
        let replaced = collection.with_replaced(marker(0.4));
        assert_eq!(replaced, collection);
    }

    #[test]
    fn test_without_editing_and_persistence() {
        let mut label = TextLabel::new(Point::new(0.5, 0.5), "Text", 18.0, RinkColor::black());
        label.is_editing = true;
        let collection: ElementCollection = vec![marker(0.1), label.into()].into();
        assert!(collection.editing_id().is_some());
        assert!(collection.without_editing().editing_id().is_none());
        assert!(collection.to_persisted().iter().all(|e| !e.is_editing()));
    }

    #[test]
    fn test_serializes_as_json_array() {
        let collection: ElementCollection = vec![marker(0.1), marker(0.2)].into();
        let json = serde_json::to_string(&collection).unwrap();
        assert!(json.starts_with('['));
        let back: ElementCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, collection);
    }
}
