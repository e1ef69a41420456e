//! Hit-testing and selection
//!
//! The store owns the selection; this layer turns pointer presses into store
//! updates, remembers the selected element so change notifications can carry
//! the previous one after it is gone, and reports which id to highlight.
//! Hover is local to this layer and never reaches the store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geometry::Point;
use super::scene::SceneManager;
use crate::errors::DiagramResult;
use crate::model::{BeamModel, Element, ElementRef};
use crate::store::ModelStore;

/// Result of a successful hit-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub element: ElementRef,
    /// Engineering position under the pointer, clamped onto the beam (m)
    pub position: f64,
}

/// Selection moved from `previous` to `current`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionChange {
    pub previous: Option<Element>,
    pub current: Option<Element>,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionLayer {
    current: Option<Element>,
    hover: Option<Uuid>,
}

impl SelectionLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&Element> {
        self.current.as_ref()
    }

    /// Id drawn with the highlight style
    pub fn highlight_id(&self) -> Option<Uuid> {
        self.current.as_ref().map(Element::id)
    }

    /// Id drawn with the hover style
    pub fn hover_id(&self) -> Option<Uuid> {
        self.hover
    }

    /// Element whose temporary dimension line is shown: selected, else hovered
    pub fn dimension_focus(&self) -> Option<Uuid> {
        self.highlight_id().or(self.hover)
    }

    /// Track the element under the pointer. Returns whether the hover changed.
    pub fn on_pointer_move(&mut self, scene: &SceneManager, point: Point) -> bool {
        let hover = self.hit_test(scene, point).map(|hit| hit.element.id());
        if hover == self.hover {
            return false;
        }
        tracing::trace!(?hover, "hover changed");
        self.hover = hover;
        true
    }

    /// Pointer left the drawing area
    pub fn clear_hover(&mut self) -> bool {
        self.hover.take().is_some()
    }

    /// Topmost glyph under `point`, if any
    pub fn hit_test(&self, scene: &SceneManager, point: Point) -> Option<Hit> {
        let mapper = scene.mapper()?;
        let tolerance = scene.style().hit_tolerance;
        let glyph = scene
            .topmost_first()
            .find(|glyph| glyph.bounds().is_some_and(|b| b.inflate(tolerance).contains(point)))?;

        let position = mapper.to_screen_position(point.x).clamp(0.0, mapper.beam_length());
        Some(Hit {
            element: glyph.element,
            position,
        })
    }

    /// Select whatever is under `point`, or clear the selection on a miss.
    ///
    /// Returns `None` when the selection did not change.
    pub fn on_pointer_down(
        &mut self,
        scene: &SceneManager,
        point: Point,
        store: &mut ModelStore,
    ) -> DiagramResult<Option<SelectionChange>> {
        let target = self.hit_test(scene, point).map(|hit| hit.element);
        if target == store.selected_element() && target == self.current.as_ref().map(Element::element_ref) {
            return Ok(None);
        }

        store.set_selected_element(target)?;
        let current = target.and_then(|r| store.element(r));
        tracing::debug!(selected = ?current.as_ref().map(Element::id), "selection changed");
        Ok(Some(self.replace(current)))
    }

    /// Align with the store and the rendered model.
    ///
    /// A selection pointing at an element the model no longer contains is
    /// cleared in the store as well.
    pub fn reconcile(&mut self, model: Option<&BeamModel>, store: &mut ModelStore) -> Option<SelectionChange> {
        let selected = store.selected_element();
        let current = selected
            .filter(|r| model.is_some_and(|m| m.contains(r.id())))
            .and_then(|r| store.element(r));
        if self.hover.is_some_and(|id| !model.is_some_and(|m| m.contains(id))) {
            self.hover = None;
        }
        if selected.is_some() && current.is_none() {
            tracing::debug!("clearing stale selection");
            if let Err(e) = store.set_selected_element(None) {
                tracing::warn!(error = %e, "failed to clear selection");
            }
        }

        if current == self.current {
            return None;
        }
        Some(self.replace(current))
    }

    /// Delete the selected element through the store.
    ///
    /// Returns the removed element, or `None` when nothing was selected.
    pub fn request_delete(&mut self, store: &mut ModelStore) -> DiagramResult<Option<Element>> {
        let Some(selected) = store.selected_element() else {
            return Ok(None);
        };
        let removed = store.remove_element(selected)?;
        self.current = None;
        tracing::debug!(id = %removed.id(), "element deleted");
        Ok(Some(removed))
    }

    fn replace(&mut self, current: Option<Element>) -> SelectionChange {
        let previous = std::mem::replace(&mut self.current, current.clone());
        SelectionChange { previous, current }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::{LoadKind, SupportKind};
    use crate::render::mapper::Viewport;

    fn setup() -> (ModelStore, SceneManager) {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = SceneManager::default();
        scene.resize(Viewport::new(800.0, 300.0), Duration::ZERO);
        scene.apply(store.active_beam().as_ref(), Duration::ZERO);
        (store, scene)
    }

    fn load_of(store: &ModelStore, kind: LoadKind) -> Uuid {
        store.active_beam().unwrap().beam.loads.iter().find(|l| l.kind == kind).unwrap().id
    }

    #[test]
    fn test_topmost_glyph_wins() {
        let (store, scene) = setup();
        let layer = SelectionLayer::new();

        // The point load at x=10 m overlaps the distributed band
        let hit = layer.hit_test(&scene, Point::new(400.0, 100.0)).unwrap();
        assert_eq!(hit.element, ElementRef::Load(load_of(&store, LoadKind::Point)));
        assert!((hit.position - 10.0).abs() < 1e-9);

        let hit = layer.hit_test(&scene, Point::new(300.0, 100.0)).unwrap();
        assert_eq!(hit.element, ElementRef::Load(load_of(&store, LoadKind::Distributed)));
    }

    #[test]
    fn test_support_hit_and_miss() {
        let (store, scene) = setup();
        let layer = SelectionLayer::new();
        let pin = store.active_beam().unwrap().beam.supports[0].clone();
        assert_eq!(pin.kind, SupportKind::Pin);

        let hit = layer.hit_test(&scene, Point::new(50.0, 160.0)).unwrap();
        assert_eq!(hit.element, ElementRef::Support(pin.id));
        assert!(layer.hit_test(&scene, Point::new(10.0, 280.0)).is_none());
    }

    #[test]
    fn test_pointer_down_selects_then_miss_clears() {
        let (mut store, scene) = setup();
        let mut layer = SelectionLayer::new();
        let point = load_of(&store, LoadKind::Point);

        let change = layer
            .on_pointer_down(&scene, Point::new(400.0, 100.0), &mut store)
            .unwrap()
            .unwrap();
        assert!(change.previous.is_none());
        assert_eq!(change.current.as_ref().map(Element::id), Some(point));
        assert_eq!(store.selected_element(), Some(ElementRef::Load(point)));
        assert_eq!(layer.highlight_id(), Some(point));

        // Same element again: no change
        assert!(layer
            .on_pointer_down(&scene, Point::new(401.0, 90.0), &mut store)
            .unwrap()
            .is_none());

        let change = layer
            .on_pointer_down(&scene, Point::new(10.0, 280.0), &mut store)
            .unwrap()
            .unwrap();
        assert_eq!(change.previous.map(|e| e.id()), Some(point));
        assert!(change.current.is_none());
        assert_eq!(store.selected_element(), None);
        assert_eq!(layer.highlight_id(), None);
    }

    #[test]
    fn test_removed_element_clears_highlight() {
        let (mut store, mut scene) = setup();
        let mut layer = SelectionLayer::new();
        layer.on_pointer_down(&scene, Point::new(400.0, 100.0), &mut store).unwrap();
        let point = load_of(&store, LoadKind::Point);

        store.remove_load(point).unwrap();
        scene.apply(store.active_beam().as_ref(), Duration::from_millis(10));
        let change = layer.reconcile(scene.model(), &mut store).unwrap();

        assert_eq!(change.previous.map(|e| e.id()), Some(point));
        assert!(layer.highlight_id().is_none());
        assert!(store.selected_element().is_none());
        assert!(scene.entry(point).is_none());
    }

    #[test]
    fn test_request_delete() {
        let (mut store, scene) = setup();
        let mut layer = SelectionLayer::new();
        assert!(layer.request_delete(&mut store).unwrap().is_none());

        layer.on_pointer_down(&scene, Point::new(300.0, 100.0), &mut store).unwrap();
        let removed = layer.request_delete(&mut store).unwrap().unwrap();
        assert!(matches!(removed, Element::Load(ref l) if l.kind == LoadKind::Distributed));
        assert!(store.selected_element().is_none());
        assert_eq!(store.active_beam().unwrap().beam.loads.len(), 1);
    }

    #[test]
    fn test_hover_tracks_pointer_and_yields_to_selection() {
        let (mut store, scene) = setup();
        let mut layer = SelectionLayer::new();
        let point = load_of(&store, LoadKind::Point);
        let udl = load_of(&store, LoadKind::Distributed);

        assert!(layer.on_pointer_move(&scene, Point::new(400.0, 100.0)));
        assert_eq!(layer.hover_id(), Some(point));
        assert_eq!(layer.dimension_focus(), Some(point));
        assert!(!layer.on_pointer_move(&scene, Point::new(401.0, 95.0)));
        // Hovering never selects
        assert!(store.selected_element().is_none());

        layer.on_pointer_down(&scene, Point::new(300.0, 100.0), &mut store).unwrap();
        assert_eq!(layer.dimension_focus(), Some(udl));

        assert!(layer.on_pointer_move(&scene, Point::new(10.0, 280.0)));
        assert_eq!(layer.hover_id(), None);
        assert!(!layer.clear_hover());
    }

    #[test]
    fn test_removed_element_clears_hover() {
        let (mut store, mut scene) = setup();
        let mut layer = SelectionLayer::new();
        let point = load_of(&store, LoadKind::Point);
        layer.on_pointer_move(&scene, Point::new(400.0, 100.0));

        store.remove_load(point).unwrap();
        scene.apply(store.active_beam().as_ref(), Duration::from_millis(10));
        layer.reconcile(scene.model(), &mut store);
        assert_eq!(layer.hover_id(), None);
    }
}
