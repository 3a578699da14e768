//! Document: the authoritative ordered element store.

use crate::elements::{Element, ElementId, ElementStyle};
use crate::history::Snapshot;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visual offset applied to duplicated elements.
pub const DUPLICATE_OFFSET: f64 = 10.0;

/// Sparse update for an element. Only present fields are applied.
///
/// No field is validated: out-of-range values (negative sizes and the
/// like) are stored as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementPatch {
    /// New left edge of the bounding box, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New top edge of the bounding box, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New width, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New height, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New rotation in radians, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// New paint-order index, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// New visibility flag, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// New lock flag, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// New text content (sticky notes and text elements), if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Replacement style, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ElementStyle>,
}

/// A document containing all elements of one editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// All elements, in insertion order.
    pub elements: Vec<Element>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            elements: Vec::new(),
        }
    }

    /// Add an element. An element with z-index 0 (unassigned) receives the
    /// next topmost index. Returns the element's id.
    pub fn add(&mut self, mut element: Element) -> ElementId {
        if element.z_index() == 0 {
            element.set_z_index(self.next_z_index());
        }
        let id = element.id();
        self.elements.push(element);
        id
    }

    /// Apply a sparse update to an element. Returns false if no element
    /// with the given id exists.
    pub fn apply_patch(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.elements.iter_mut().find(|e| e.id() == id) else {
            return false;
        };

        if patch.x.is_some() || patch.y.is_some() {
            let bounds = element.bounds();
            let dx = patch.x.map_or(0.0, |x| x - bounds.x0);
            let dy = patch.y.map_or(0.0, |y| y - bounds.y0);
            element.translate(Vec2::new(dx, dy));
        }
        if patch.width.is_some() || patch.height.is_some() {
            let bounds = element.bounds();
            let width = patch.width.unwrap_or(bounds.width());
            let height = patch.height.unwrap_or(bounds.height());
            element.set_size(width, height);
        }
        if let Some(rotation) = patch.rotation {
            element.set_rotation(rotation);
        }
        if let Some(z) = patch.z_index {
            element.set_z_index(z);
        }
        if let Some(visible) = patch.visible {
            element.set_visible(visible);
        }
        if let Some(locked) = patch.locked {
            element.set_locked(locked);
        }
        if let Some(ref text) = patch.text {
            match element {
                Element::Sticky(note) => note.text = text.clone(),
                Element::Text(tb) => tb.content = text.clone(),
                _ => {}
            }
        }
        if let Some(ref style) = patch.style {
            *element.style_mut() = style.clone();
        }
        true
    }

    /// Remove an element, returning it if it was present.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let pos = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(pos))
    }

    /// Remove several elements. Returns how many were removed.
    pub fn remove_many(&mut self, ids: &[ElementId]) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| !ids.contains(&e.id()));
        before - self.elements.len()
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Get an element by id.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Get a mutable reference to an element by id.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// Elements in paint order (back to front): sorted by `(z_index, id)`.
    pub fn elements_ordered(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        ordered.sort_by(|a, b| a.z_index().cmp(&b.z_index()).then_with(|| a.id().cmp(&b.id())));
        ordered
    }

    /// Highest paint-order index in use (0 when empty).
    pub fn max_z_index(&self) -> i64 {
        self.elements.iter().map(Element::z_index).max().unwrap_or(0)
    }

    /// The paint-order index a newly created element should receive.
    pub fn next_z_index(&self) -> i64 {
        self.max_z_index() + 1
    }

    /// Move an element one step toward the front by swapping paint-order
    /// indices with its upper neighbor. Returns false if already at the
    /// front.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.swap_with_neighbor(id, true)
    }

    /// Move an element one step toward the back. Returns false if already
    /// at the back.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.swap_with_neighbor(id, false)
    }

    fn swap_with_neighbor(&mut self, id: ElementId, forward: bool) -> bool {
        let ordered: Vec<ElementId> = self.elements_ordered().iter().map(|e| e.id()).collect();
        let Some(pos) = ordered.iter().position(|&eid| eid == id) else {
            return false;
        };
        let neighbor_pos = if forward {
            if pos + 1 >= ordered.len() {
                return false;
            }
            pos + 1
        } else {
            if pos == 0 {
                return false;
            }
            pos - 1
        };
        let neighbor_id = ordered[neighbor_pos];

        let z_a = self.get(id).map(Element::z_index);
        let z_b = self.get(neighbor_id).map(Element::z_index);
        if let (Some(z_a), Some(z_b)) = (z_a, z_b) {
            if let Some(e) = self.get_mut(id) {
                e.set_z_index(z_b);
            }
            if let Some(e) = self.get_mut(neighbor_id) {
                e.set_z_index(z_a);
            }
            true
        } else {
            false
        }
    }

    /// Deep-clone the given elements with fresh ids, offset by
    /// [`DUPLICATE_OFFSET`], assigned fresh topmost paint-order indices.
    /// Returns the new ids in paint order.
    pub fn duplicate(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut clones: Vec<Element> = self
            .elements_ordered()
            .into_iter()
            .filter(|e| ids.contains(&e.id()))
            .cloned()
            .collect();

        let mut next_z = self.next_z_index();
        let mut new_ids = Vec::with_capacity(clones.len());
        for clone in &mut clones {
            clone.regenerate_id();
            clone.translate(Vec2::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET));
            clone.set_z_index(next_z);
            next_z += 1;
            new_ids.push(clone.id());
        }
        self.elements.extend(clones);
        new_ids
    }

    /// Find visible elements at a point, front to back (selection priority).
    pub fn elements_at_point(&self, point: Point, tolerance: f64) -> Vec<ElementId> {
        self.elements_ordered()
            .into_iter()
            .rev()
            .filter(|e| e.visible() && e.hit_test(point, tolerance))
            .map(|e| e.id())
            .collect()
    }

    /// Find visible elements whose bounds intersect a rectangle.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.elements_ordered()
            .into_iter()
            .filter(|e| e.visible() && rect.intersect(e.bounds()).area() > 0.0)
            .map(|e| e.id())
            .collect()
    }

    /// Get the bounding box of all elements.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for element in &self.elements {
            let bounds = element.bounds();
            result = Some(match result {
                Some(r) => r.union(bounds),
                None => bounds,
            });
        }
        result
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Capture a history snapshot of the element sequence.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.elements)
    }

    /// Replace the element sequence from a history snapshot.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.elements = snapshot.elements.clone();
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementTrait, Shape};

    fn rect_at(x: f64, y: f64) -> Element {
        Element::Shape(Shape::rectangle(Point::new(x, y), 100.0, 100.0))
    }

    #[test]
    fn test_add_assigns_z_index() {
        let mut doc = Document::new();
        let a = doc.add(rect_at(0.0, 0.0));
        let b = doc.add(rect_at(10.0, 10.0));
        assert_eq!(doc.get(a).unwrap().z_index(), 1);
        assert_eq!(doc.get(b).unwrap().z_index(), 2);
    }

    #[test]
    fn test_add_keeps_explicit_z_index() {
        let mut doc = Document::new();
        let mut el = rect_at(0.0, 0.0);
        el.set_z_index(7);
        let id = doc.add(el);
        assert_eq!(doc.get(id).unwrap().z_index(), 7);
        assert_eq!(doc.next_z_index(), 8);
    }

    #[test]
    fn test_remove() {
        let mut doc = Document::new();
        let id = doc.add(rect_at(0.0, 0.0));
        assert!(doc.remove(id).is_some());
        assert!(doc.is_empty());
        assert!(doc.remove(id).is_none());
    }

    #[test]
    fn test_patch_moves_and_resizes() {
        let mut doc = Document::new();
        let id = doc.add(rect_at(0.0, 0.0));
        let patch = ElementPatch {
            x: Some(50.0),
            y: Some(60.0),
            width: Some(30.0),
            ..ElementPatch::default()
        };
        assert!(doc.apply_patch(id, &patch));
        let bounds = doc.get(id).unwrap().bounds();
        assert!((bounds.x0 - 50.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 60.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_patch_missing_id() {
        let mut doc = Document::new();
        assert!(!doc.apply_patch(Uuid::new_v4(), &ElementPatch::default()));
    }

    #[test]
    fn test_patch_accepts_negative_size() {
        // Permissive by design: no bounds checking on patches
        let mut doc = Document::new();
        let id = doc.add(rect_at(0.0, 0.0));
        let patch = ElementPatch {
            width: Some(-40.0),
            ..ElementPatch::default()
        };
        assert!(doc.apply_patch(id, &patch));
        match doc.get(id).unwrap() {
            Element::Shape(s) => assert!((s.width + 40.0).abs() < f64::EPSILON),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_reorder_swaps_neighbors() {
        let mut doc = Document::new();
        let a = doc.add(rect_at(0.0, 0.0));
        let b = doc.add(rect_at(10.0, 10.0));

        assert!(doc.bring_forward(a));
        let ordered: Vec<ElementId> = doc.elements_ordered().iter().map(|e| e.id()).collect();
        assert_eq!(ordered, vec![b, a]);

        // Boundary no-ops
        assert!(!doc.bring_forward(a));
        assert!(!doc.send_backward(b));
    }

    #[test]
    fn test_duplicate_offsets_and_restacks() {
        let mut doc = Document::new();
        let a = doc.add(rect_at(0.0, 0.0));
        let b = doc.add(rect_at(10.0, 10.0));

        let clones = doc.duplicate(&[a, b]);
        assert_eq!(clones.len(), 2);
        assert_eq!(doc.len(), 4);

        let max_original_z = doc.get(b).unwrap().z_index();
        for (original, clone) in [(a, clones[0]), (b, clones[1])] {
            assert_ne!(original, clone);
            let ob = doc.get(original).unwrap().bounds();
            let cb = doc.get(clone).unwrap().bounds();
            assert!((cb.x0 - ob.x0 - DUPLICATE_OFFSET).abs() < f64::EPSILON);
            assert!((cb.y0 - ob.y0 - DUPLICATE_OFFSET).abs() < f64::EPSILON);
            assert!(doc.get(clone).unwrap().z_index() > max_original_z);
        }
    }

    #[test]
    fn test_elements_at_point_front_first() {
        let mut doc = Document::new();
        let mut bottom = Shape::rectangle(Point::new(0.0, 0.0), 100.0, 100.0);
        bottom.style.fill_color = Some(crate::elements::SerializableColor::white());
        let mut top = Shape::rectangle(Point::new(50.0, 50.0), 100.0, 100.0);
        top.style.fill_color = Some(crate::elements::SerializableColor::white());
        let bottom_id = bottom.id();
        let top_id = top.id();
        doc.add(Element::Shape(bottom));
        doc.add(Element::Shape(top));

        let hits = doc.elements_at_point(Point::new(75.0, 75.0), 0.0);
        assert_eq!(hits, vec![top_id, bottom_id]);

        let hits = doc.elements_at_point(Point::new(25.0, 25.0), 0.0);
        assert_eq!(hits, vec![bottom_id]);
    }

    #[test]
    fn test_hidden_elements_not_hit() {
        let mut doc = Document::new();
        let mut el = rect_at(0.0, 0.0);
        el.style_mut().fill_color = Some(crate::elements::SerializableColor::white());
        let id = doc.add(el);
        assert!(!doc.elements_at_point(Point::new(50.0, 50.0), 0.0).is_empty());

        doc.get_mut(id).unwrap().set_visible(false);
        assert!(doc.elements_at_point(Point::new(50.0, 50.0), 0.0).is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let mut doc = Document::new();
        doc.add(rect_at(5.0, 5.0));
        let json = doc.to_json().unwrap();
        let restored = Document::from_json(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.id, doc.id);
    }
}
