//! # Scene Manager
//!
//! The retained scene: one [`SceneEntry`] per support/load id, kept in an
//! id-keyed table plus a draw order. Each update cycle diffs a model
//! snapshot against that table:
//!
//! 1. new ids get a glyph immediately (no transition)
//! 2. surviving ids are rebuilt when they, their kind-group or the layout
//!    changed; changed geometry eases in from what is currently displayed
//! 3. vanished ids are dropped and their gradient retired
//!
//! After every cycle the entry set matches the model's element ids exactly,
//! and the live gradients are exactly those owned by entries.
//!
//! The grid is a separate layer rebuilt only on resize or visibility toggle.
//! Dimension lines are rebuilt at the end of every applied cycle.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dimension::DimensionLayer;
use super::geometry::{GradientId, Paint, Primitive};
use super::glyph::{Glyph, GlyphFactory};
use super::gradient::{GradientDef, GradientRegistry};
use super::grid::GridLayer;
use super::mapper::{CoordinateMapper, Viewport};
use super::scaling::ScalingEngine;
use super::transition::Transition;
use crate::model::{BeamModel, Element, LoadKind};
use crate::store::ModelSnapshot;
use crate::style::StylePolicy;

// ============================================================================
// Entries, Reports, Frames
// ============================================================================

/// Rendered record of one model element
#[derive(Debug, Clone)]
pub struct SceneEntry {
    /// Clamped element the current target was built from
    element: Element,
    /// Settled geometry
    target: Glyph,
    transition: Option<Transition>,
}

impl SceneEntry {
    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn target(&self) -> &Glyph {
        &self.target
    }

    /// Geometry on screen at `now`
    pub fn displayed(&self, now: Duration) -> Glyph {
        match &self.transition {
            Some(transition) => transition.sample(now),
            None => self.target.clone(),
        }
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.transition.as_ref().is_some_and(|t| !t.is_finished(now))
    }
}

/// What one update cycle did
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateReport {
    /// Snapshot version applied, if any
    pub version: Option<u64>,
    pub created: Vec<Uuid>,
    pub updated: Vec<Uuid>,
    pub removed: Vec<Uuid>,
    /// The cycle was skipped (same version or no viewport)
    pub skipped: bool,
}

impl UpdateReport {
    fn skipped(version: Option<u64>) -> Self {
        Self {
            version,
            skipped: true,
            ..Self::default()
        }
    }

    /// Nothing was created, updated or removed
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Everything a front-end needs to draw one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFrame {
    pub viewport: Option<Viewport>,
    pub grid: Vec<Primitive>,
    /// The beam line, absent while no model is shown
    pub beam: Option<Primitive>,
    /// Glyphs in draw order (later ones on top)
    pub glyphs: Vec<Glyph>,
    /// Dimension lines, including the one for the focused element
    #[serde(default)]
    pub dimensions: Vec<Primitive>,
    /// Live gradient resources referenced by glyph paints
    pub gradients: Vec<GradientDef>,
}

// ============================================================================
// Scene Manager
// ============================================================================

#[derive(Debug, Clone)]
pub struct SceneManager {
    style: StylePolicy,
    viewport: Option<Viewport>,
    /// Latest snapshot received, applied or not
    snapshot: Option<ModelSnapshot>,
    /// (beam id, version) of the last applied snapshot
    applied: Option<(Uuid, u64)>,
    /// Clamped model currently rendered
    model: Option<BeamModel>,
    mapper: Option<CoordinateMapper>,
    scaling: ScalingEngine,
    entries: HashMap<Uuid, SceneEntry>,
    order: Vec<Uuid>,
    gradients: GradientRegistry,
    grid: GridLayer,
    dimensions: DimensionLayer,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new(StylePolicy::default())
    }
}

impl SceneManager {
    pub fn new(style: StylePolicy) -> Self {
        Self {
            scaling: ScalingEngine::empty(style.max_height),
            dimensions: DimensionLayer::new(style.dimensions.visible),
            style,
            viewport: None,
            snapshot: None,
            applied: None,
            model: None,
            mapper: None,
            entries: HashMap::new(),
            order: Vec::new(),
            gradients: GradientRegistry::new(),
            grid: GridLayer::new(true),
        }
    }

    pub fn style(&self) -> &StylePolicy {
        &self.style
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Mapper for the current viewport and beam, if both exist
    pub fn mapper(&self) -> Option<&CoordinateMapper> {
        self.mapper.as_ref()
    }

    /// Clamped model currently on screen
    pub fn model(&self) -> Option<&BeamModel> {
        self.model.as_ref()
    }

    pub fn entry(&self, id: Uuid) -> Option<&SceneEntry> {
        self.entries.get(&id)
    }

    /// Entry ids in draw order
    pub fn entry_ids(&self) -> &[Uuid] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn gradient_count(&self) -> usize {
        self.gradients.live_count()
    }

    pub fn grid(&self) -> &GridLayer {
        &self.grid
    }

    pub fn dimensions(&self) -> &DimensionLayer {
        &self.dimensions
    }

    /// Settled glyphs, topmost first
    pub fn topmost_first(&self) -> impl Iterator<Item = &Glyph> + '_ {
        self.order.iter().rev().filter_map(|id| self.entries.get(id)).map(|e| &e.target)
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.entries.values().any(|e| e.is_animating(now))
    }

    // ------------------------------------------------------------------------
    // Update cycle
    // ------------------------------------------------------------------------

    /// Apply a model snapshot (or its absence) at time `now`
    pub fn apply(&mut self, snapshot: Option<&ModelSnapshot>, now: Duration) -> UpdateReport {
        let Some(snapshot) = snapshot else {
            return self.clear();
        };

        let key = (snapshot.beam.id, snapshot.version);
        if self.applied == Some(key) {
            tracing::trace!(version = snapshot.version, "snapshot already applied");
            return UpdateReport::skipped(Some(snapshot.version));
        }
        self.snapshot = Some(snapshot.clone());

        if self.viewport.is_none() {
            tracing::warn!(version = snapshot.version, "no viewport yet; skipping scene update");
            return UpdateReport::skipped(Some(snapshot.version));
        }

        self.applied = Some(key);
        let report = self.rebuild(now, true);
        tracing::debug!(
            version = snapshot.version,
            created = report.created.len(),
            updated = report.updated.len(),
            removed = report.removed.len(),
            "scene updated"
        );
        report
    }

    /// Set the viewport. Rebuilds the grid and snaps all geometry to the new
    /// layout (no transition).
    ///
    /// A viewport with a non-finite or non-positive side is ignored.
    pub fn resize(&mut self, viewport: Viewport, now: Duration) -> UpdateReport {
        if !viewport.is_valid() {
            tracing::warn!(width = viewport.width, height = viewport.height, "ignoring invalid viewport");
            return UpdateReport::skipped(self.applied.map(|(_, v)| v));
        }
        if self.viewport == Some(viewport) {
            return UpdateReport::skipped(self.applied.map(|(_, v)| v));
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = Some(viewport);
        self.grid.rebuild(self.viewport, &self.style);

        match &self.snapshot {
            Some(snapshot) => {
                self.applied = Some((snapshot.beam.id, snapshot.version));
                self.rebuild(now, false)
            }
            None => UpdateReport::default(),
        }
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.grid.set_visible(visible, self.viewport, &self.style);
    }

    pub fn set_dimensions_visible(&mut self, visible: bool) {
        let layout = self.model.as_ref().zip(self.mapper.as_ref());
        self.dimensions.set_visible(visible, layout, &self.style);
    }

    /// Drop transitions that have run their course
    pub fn settle(&mut self, now: Duration) {
        for entry in self.entries.values_mut() {
            if entry.transition.as_ref().is_some_and(|t| t.is_finished(now)) {
                entry.transition = None;
            }
        }
    }

    /// Remove every entry and forget the model
    fn clear(&mut self) -> UpdateReport {
        let removed: Vec<Uuid> = self.order.drain(..).collect();
        for (_, entry) in self.entries.drain() {
            if let Some(id) = entry.target.gradient {
                self.gradients.retire(id);
            }
        }
        self.snapshot = None;
        self.applied = None;
        self.model = None;
        self.mapper = None;
        self.scaling = ScalingEngine::empty(self.style.max_height);
        self.dimensions.rebuild(None, &self.style);
        if !removed.is_empty() {
            tracing::debug!(removed = removed.len(), "scene cleared");
        }
        UpdateReport {
            removed,
            ..UpdateReport::default()
        }
    }

    /// Diff the stored snapshot against the entry table
    fn rebuild(&mut self, now: Duration, animate: bool) -> UpdateReport {
        let (Some(snapshot), Some(viewport)) = (&self.snapshot, self.viewport) else {
            return UpdateReport::default();
        };
        let version = snapshot.version;
        let model = snapshot.beam.clamped();
        if model != *snapshot.beam {
            tracing::warn!(beam = %model.id, "model positions clamped onto the beam");
        }

        self.settle(now);

        let mapper = CoordinateMapper::new(viewport, model.length, &self.style);
        let scaling = ScalingEngine::new(&model.loads, self.style.max_height);
        let layout_changed = self.mapper != Some(mapper);

        let mut dirty_kinds: HashSet<LoadKind> = scaling.changed_groups(&self.scaling).into_iter().collect();
        let elements: Vec<Element> = model
            .supports
            .iter()
            .cloned()
            .map(Element::Support)
            .chain(model.loads.iter().cloned().map(Element::Load))
            .collect();
        let live: HashSet<Uuid> = elements.iter().map(Element::id).collect();

        // Any created, edited or removed load dirties its whole kind-group
        for element in &elements {
            let previous = self.entries.get(&element.id()).map(|e| &e.element);
            if previous == Some(element) {
                continue;
            }
            if let Element::Load(load) = element {
                dirty_kinds.insert(load.kind);
            }
            if let Some(Element::Load(old)) = previous {
                dirty_kinds.insert(old.kind);
            }
        }
        for (id, entry) in &self.entries {
            if let (false, Element::Load(old)) = (live.contains(id), &entry.element) {
                dirty_kinds.insert(old.kind);
            }
        }

        let mut report = UpdateReport {
            version: Some(version),
            ..UpdateReport::default()
        };

        // Vanished ids
        let gone: Vec<Uuid> = self.order.iter().copied().filter(|id| !live.contains(id)).collect();
        for id in gone {
            if let Some(entry) = self.entries.remove(&id) {
                if let Some(gradient) = entry.target.gradient {
                    self.gradients.retire(gradient);
                }
                tracing::trace!(%id, "entry removed");
                report.removed.push(id);
            }
        }

        let duration = self.style.transition_duration();
        let factory = GlyphFactory::new(&mapper, &scaling, &self.style);
        for element in &elements {
            let id = element.id();
            if !self.entries.contains_key(&id) {
                let target = factory.build(element, &mut self.gradients);
                tracing::trace!(%id, kind = ?target.kind, "entry created");
                self.entries.insert(
                    id,
                    SceneEntry {
                        element: element.clone(),
                        target,
                        transition: None,
                    },
                );
                report.created.push(id);
                continue;
            }
            let Some(entry) = self.entries.get_mut(&id) else {
                continue;
            };

            let group_dirty = match element {
                Element::Load(load) => dirty_kinds.contains(&load.kind),
                Element::Support(_) => false,
            };
            if !layout_changed && !group_dirty && entry.element == *element {
                continue;
            }

            let target = factory.build(element, &mut self.gradients);
            entry.element = element.clone();
            if same_geometry(&entry.target, &target) {
                if let Some(fresh) = target.gradient {
                    self.gradients.retire(fresh);
                }
                continue;
            }

            if let Some(old) = entry.target.gradient {
                self.gradients.retire(old);
            }
            entry.transition = if animate && !duration.is_zero() {
                Some(Transition::new(entry.displayed(now), target.clone(), now, duration))
            } else {
                None
            };
            entry.target = target;
            tracing::trace!(%id, animate, "entry updated");
            report.updated.push(id);
        }

        self.order = draw_order(&elements);
        self.dimensions.rebuild(Some((&model, &mapper)), &self.style);
        self.model = Some(model);
        self.mapper = Some(mapper);
        self.scaling = scaling;
        report
    }

    // ------------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------------

    /// Interpolated frame at `now`.
    ///
    /// `highlight` is drawn in the highlight color and `hover` in the hover
    /// color; the highlight wins when both name the same element. The
    /// temporary dimension line follows `highlight`, else `hover`.
    pub fn frame(&self, now: Duration, highlight: Option<Uuid>, hover: Option<Uuid>) -> SceneFrame {
        let beam = match (&self.mapper, &self.model) {
            (Some(mapper), Some(_)) => {
                Some(GlyphFactory::new(mapper, &self.scaling, &self.style).beam_line())
            }
            _ => None,
        };
        let glyphs = self
            .order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|entry| (id, entry)))
            .map(|(id, entry)| {
                let glyph = entry.displayed(now);
                if highlight == Some(*id) {
                    glyph.highlighted(self.style.highlight_color)
                } else if hover == Some(*id) {
                    glyph.highlighted(self.style.hover_color)
                } else {
                    glyph
                }
            })
            .collect();

        let mut dimensions = self.dimensions.lines().to_vec();
        let focus = highlight
            .or(hover)
            .and_then(|id| Some((self.model.as_ref()?, self.mapper.as_ref()?, id)));
        if let Some((model, mapper, id)) = focus {
            if let Some(element) = model.element(id) {
                dimensions.extend(self.dimensions.temporary(model, mapper, &element, &self.style));
            }
        }

        SceneFrame {
            viewport: self.viewport,
            grid: self.grid.lines().to_vec(),
            beam,
            glyphs,
            dimensions,
            gradients: self.gradients.defs(),
        }
    }
}

/// Supports, then distributed loads, moments and point loads on top
fn draw_order(elements: &[Element]) -> Vec<Uuid> {
    let layer = |element: &Element| match element {
        Element::Support(_) => 0,
        Element::Load(load) => match load.kind {
            LoadKind::Distributed => 1,
            LoadKind::Moment => 2,
            LoadKind::Point => 3,
        },
    };
    let mut ordered: Vec<&Element> = elements.iter().collect();
    ordered.sort_by_key(|e| layer(e));
    ordered.into_iter().map(Element::id).collect()
}

/// Equal apart from which gradient resource the paints point at
fn same_geometry(a: &Glyph, b: &Glyph) -> bool {
    fn normalized(primitive: &Primitive) -> Primitive {
        let mut p = primitive.clone();
        match &mut p {
            Primitive::Polygon { fill, .. } | Primitive::Rect { fill, .. } | Primitive::Circle { fill, .. } => {
                if let Paint::Gradient(_) = fill {
                    *fill = Paint::Gradient(GradientId(0));
                }
            }
            _ => {}
        }
        p
    }

    a.kind == b.kind
        && a.primitives.len() == b.primitives.len()
        && a.primitives.iter().zip(&b.primitives).all(|(x, y)| normalized(x) == normalized(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementRef, Load, Support, SupportKind};
    use crate::render::glyph::GlyphKind;
    use crate::store::ModelStore;

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 300.0,
    };

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn scene() -> SceneManager {
        let mut scene = SceneManager::default();
        scene.resize(VIEW, Duration::ZERO);
        scene
    }

    fn sync(scene: &mut SceneManager, store: &ModelStore, now: Duration) -> UpdateReport {
        scene.apply(store.active_beam().as_ref(), now)
    }

    fn ids(scene: &SceneManager) -> HashSet<Uuid> {
        scene.entry_ids().iter().copied().collect()
    }

    fn model_ids(store: &ModelStore) -> HashSet<Uuid> {
        store.active_beam().unwrap().beam.element_ids().collect()
    }

    /// Distance from a point load's arrow tip to the far end of its shaft
    fn shaft_height(scene: &SceneManager, id: Uuid) -> f64 {
        let primitives = &scene.entry(id).unwrap().target().primitives;
        match (&primitives[0], &primitives[1]) {
            (Primitive::Line { to, .. }, Primitive::Polygon { points, .. }) => (points[0].y - to.y).abs(),
            other => panic!("not a point load: {:?}", other),
        }
    }

    #[test]
    fn test_sample_model_creates_one_entry_per_element() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();

        let report = sync(&mut scene, &store, Duration::ZERO);
        assert_eq!(report.created.len(), 4);
        assert_eq!(ids(&scene), model_ids(&store));
        assert_eq!(scene.gradient_count(), 1);

        let frame = scene.frame(Duration::ZERO, None, None);
        assert!(frame.beam.is_some());
        assert_eq!(frame.glyphs.len(), 4);
        assert_eq!(frame.gradients.len(), 1);
        assert!(!frame.grid.is_empty());
    }

    #[test]
    fn test_same_version_is_skipped() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);

        let again = sync(&mut scene, &store, ms(10));
        assert!(again.skipped);
        assert!(again.is_empty());
    }

    #[test]
    fn test_missing_viewport_defers_update() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = SceneManager::default();

        let report = sync(&mut scene, &store, Duration::ZERO);
        assert!(report.skipped);
        assert!(scene.is_empty());

        let report = scene.resize(VIEW, Duration::ZERO);
        assert_eq!(report.created.len(), 4);
        assert_eq!(ids(&scene), model_ids(&store));
    }

    #[test]
    fn test_adding_larger_load_rescales_group() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::new("C", 20.0)).unwrap();
        let a = Load::point(-5.0, 4.0);
        let b = Load::point(-2.0, 8.0);
        store.add_load(a.clone()).unwrap();
        store.add_load(b.clone()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);

        assert!((shaft_height(&scene, a.id) - 60.0).abs() < 1e-9);
        assert!((shaft_height(&scene, b.id) - 24.0).abs() < 1e-9);

        let c = Load::point(-10.0, 12.0);
        store.add_load(c.clone()).unwrap();
        let report = sync(&mut scene, &store, ms(1000));

        assert_eq!(report.created, vec![c.id]);
        let updated: HashSet<Uuid> = report.updated.iter().copied().collect();
        assert_eq!(updated, HashSet::from([a.id, b.id]));
        assert!((shaft_height(&scene, c.id) - 60.0).abs() < 1e-9);
        assert!((shaft_height(&scene, a.id) - 30.0).abs() < 1e-9);
        assert!((shaft_height(&scene, b.id) - 12.0).abs() < 1e-9);
        assert!(scene.is_animating(ms(1100)));
        assert!(!scene.is_animating(ms(1300)));
    }

    #[test]
    fn test_editing_one_load_leaves_other_kinds_alone() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);

        let beam = store.active_beam().unwrap().beam;
        let point = beam.loads.iter().find(|l| l.kind == LoadKind::Point).unwrap().clone();
        let gradients_before = scene.gradient_count();
        store.update_load(point.clone().with_magnitude(-7.0)).unwrap();
        let report = sync(&mut scene, &store, ms(500));

        assert_eq!(report.updated, vec![point.id]);
        assert!(report.created.is_empty() && report.removed.is_empty());
        assert_eq!(scene.gradient_count(), gradients_before);
    }

    #[test]
    fn test_transition_supersedes_mid_flight() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::new("T", 20.0)).unwrap();
        let big = Load::point(-10.0, 4.0);
        let small = Load::point(-5.0, 8.0);
        store.add_load(big.clone()).unwrap();
        store.add_load(small.clone()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);

        // small: 30 px -> 60 px once big is halved
        store.update_load(big.clone().with_magnitude(-2.5)).unwrap();
        sync(&mut scene, &store, ms(1000));
        let mid = scene.entry(small.id).unwrap().displayed(ms(1150));

        store.update_load(big.clone().with_magnitude(-20.0)).unwrap();
        sync(&mut scene, &store, ms(1150));
        let restarted = scene.entry(small.id).unwrap().displayed(ms(1150));
        assert_eq!(mid.primitives, restarted.primitives);
        assert!((shaft_height(&scene, small.id) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_removal_is_idempotent() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);

        let beam = store.active_beam().unwrap().beam;
        let udl = beam.loads.iter().find(|l| l.kind == LoadKind::Distributed).unwrap().id;
        store.remove_load(udl).unwrap();
        let first = sync(&mut scene, &store, ms(100));
        assert_eq!(first.removed, vec![udl]);
        assert_eq!(scene.gradient_count(), 0);

        // A second removal fails at the store and leaves the scene untouched
        assert!(store.remove_load(udl).is_err());
        let again = sync(&mut scene, &store, ms(200));
        assert!(again.removed.is_empty());
        assert_eq!(ids(&scene), model_ids(&store));
    }

    #[test]
    fn test_add_then_remove_restores_other_entries() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);

        let before: HashMap<Uuid, Glyph> = scene
            .entry_ids()
            .iter()
            .map(|id| (*id, scene.entry(*id).unwrap().target().clone()))
            .collect();

        let larger = [
            Load::point(-50.0, 3.0),
            Load::distributed(-20.0, 2.0, 4.0),
            Load::moment(-30.0, 12.0),
        ];
        let mut now = 0;
        for load in larger {
            now += 1000;
            store.add_load(load.clone()).unwrap();
            sync(&mut scene, &store, ms(now));
            now += 1000;
            store.remove_load(load.id).unwrap();
            sync(&mut scene, &store, ms(now));
            scene.settle(ms(now + 1000));

            assert_eq!(ids(&scene), before.keys().copied().collect::<HashSet<_>>());
            for (id, glyph) in &before {
                let after = scene.entry(*id).unwrap().target();
                assert!(
                    same_geometry(glyph, after),
                    "{:?} changed after adding and removing a {:?} load",
                    glyph.kind,
                    load.kind
                );
            }
            assert!(!scene.is_animating(ms(now + 1000)));
        }
        assert_eq!(scene.gradient_count(), 1);
    }

    #[test]
    fn test_invalid_viewport_is_ignored() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);
        let grid_lines = scene.grid().lines().len();

        for viewport in [
            Viewport::new(f64::INFINITY, 300.0),
            Viewport::new(800.0, f64::NAN),
            Viewport::new(0.0, 300.0),
        ] {
            let report = scene.resize(viewport, ms(10));
            assert!(report.skipped);
            assert_eq!(scene.viewport(), Some(VIEW));
            assert_eq!(scene.grid().lines().len(), grid_lines);
        }
        assert_eq!(ids(&scene), model_ids(&store));
    }

    #[test]
    fn test_tiny_grid_size_does_not_exhaust_memory() {
        let style = StylePolicy {
            grid_size: 1e-7,
            ..StylePolicy::default()
        };
        let mut scene = SceneManager::new(style);
        scene.resize(VIEW, Duration::ZERO);
        assert!(scene.grid().lines().is_empty());
    }

    #[test]
    fn test_dimensions_follow_edits_and_focus() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);
        let labels = |primitives: &[Primitive]| -> Vec<String> {
            primitives
                .iter()
                .filter_map(|p| match p {
                    Primitive::Text { content, .. } => Some(content.clone()),
                    _ => None,
                })
                .collect()
        };

        let frame = scene.frame(Duration::ZERO, None, None);
        assert_eq!(labels(&frame.dimensions).len(), 5);

        let beam = store.active_beam().unwrap().beam;
        let point = beam.loads.iter().find(|l| l.kind == LoadKind::Point).unwrap().clone();
        let focused = scene.frame(Duration::ZERO, None, Some(point.id));
        assert_eq!(labels(&focused.dimensions).len(), 7);

        store
            .update_load(Load {
                position: 4.0,
                ..point.clone()
            })
            .unwrap();
        sync(&mut scene, &store, ms(100));
        let frame = scene.frame(ms(100), Some(point.id), None);
        let labels = labels(&frame.dimensions);
        assert!(labels.contains(&"4.00 m".to_string()));
        assert!(labels.contains(&"16.00 m".to_string()));

        scene.set_dimensions_visible(false);
        assert!(scene.frame(ms(100), Some(point.id), None).dimensions.is_empty());
    }

    #[test]
    fn test_hover_color_yields_to_highlight() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);

        let pin = store.active_beam().unwrap().beam.supports[0].id;
        let target = scene.entry(pin).unwrap().target().clone();
        let glyph_of = |frame: &SceneFrame| frame.glyphs.iter().find(|g| g.element == ElementRef::Support(pin)).cloned();

        let hovered = scene.frame(Duration::ZERO, None, Some(pin));
        assert_eq!(glyph_of(&hovered), Some(target.highlighted(scene.style().hover_color)));

        let both = scene.frame(Duration::ZERO, Some(pin), Some(pin));
        assert_eq!(glyph_of(&both), Some(target.highlighted(scene.style().highlight_color)));
    }

    #[test]
    fn test_entries_track_model_through_random_edits() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::new("R", 12.0)).unwrap();
        let mut scene = scene();
        let mut live_loads: Vec<Uuid> = Vec::new();

        for step in 0..40u64 {
            match step % 5 {
                0 | 1 => {
                    let load = if step % 2 == 0 {
                        Load::distributed(-(step as f64 + 1.0), 1.0, 3.0)
                    } else {
                        Load::point(step as f64 - 20.0, (step % 12) as f64)
                    };
                    live_loads.push(load.id);
                    store.add_load(load).unwrap();
                }
                2 => {
                    store.add_support(Support::new(SupportKind::Roller, (step % 12) as f64)).unwrap();
                }
                3 if !live_loads.is_empty() => {
                    let id = live_loads.remove(0);
                    store.remove_load(id).unwrap();
                }
                _ => {
                    if let Some(id) = live_loads.last() {
                        let load = store.active_beam().unwrap().beam.load(*id).unwrap().clone();
                        store.update_load(load.with_magnitude(-(step as f64))).unwrap();
                    }
                }
            }
            sync(&mut scene, &store, ms(step * 50));

            assert_eq!(ids(&scene), model_ids(&store));
            let beam = store.active_beam().unwrap().beam;
            let distributed = beam.loads.iter().filter(|l| l.kind == LoadKind::Distributed).count();
            assert_eq!(scene.gradient_count(), distributed, "gradients leaked at step {}", step);
        }
    }

    #[test]
    fn test_resize_snaps_without_transition() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);

        let report = scene.resize(Viewport::new(1000.0, 300.0), ms(10));
        assert_eq!(report.updated.len(), 4);
        assert!(!scene.is_animating(ms(10)));
        assert_eq!(scene.mapper().unwrap().beam_end_x(), 950.0);
        assert_eq!(scene.gradient_count(), 1);
    }

    #[test]
    fn test_none_snapshot_clears_scene() {
        let mut store = ModelStore::new();
        let id = store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);

        store.remove_beam(id).unwrap();
        let report = sync(&mut scene, &store, ms(10));
        assert_eq!(report.removed.len(), 4);
        assert!(scene.is_empty());
        assert_eq!(scene.gradient_count(), 0);
        assert!(scene.frame(ms(10), None, None).beam.is_none());
    }

    #[test]
    fn test_highlight_applies_to_one_glyph() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);

        let pin = store.active_beam().unwrap().beam.supports[0].id;
        let frame = scene.frame(Duration::ZERO, Some(pin), None);
        let highlight = scene.style().highlight_color;
        let glyph = frame.glyphs.iter().find(|g| g.element == ElementRef::Support(pin)).unwrap();
        assert_eq!(glyph, &scene.entry(pin).unwrap().target().highlighted(highlight));
    }

    #[test]
    fn test_draw_order_puts_point_loads_on_top() {
        let mut store = ModelStore::new();
        store.add_beam(BeamModel::sample()).unwrap();
        let mut scene = scene();
        sync(&mut scene, &store, Duration::ZERO);

        let frame = scene.frame(Duration::ZERO, None, None);
        let kinds: Vec<_> = frame.glyphs.iter().map(|g| g.kind).collect();
        assert!(matches!(kinds[0], GlyphKind::Support(_)));
        assert!(matches!(kinds[1], GlyphKind::Support(_)));
        assert_eq!(kinds[2], GlyphKind::Load(LoadKind::Distributed));
        assert_eq!(kinds[3], GlyphKind::Load(LoadKind::Point));
    }
}
