//! # Beamline GUI Application
//!
//! Interactive beam diagram editor built on Iced. The [`ModelStore`] owns the
//! beams; every mutation is followed by one [`Diagram::sync`] so the canvas,
//! the selection highlight and the property fields stay in step.
//!
//! Usage: `beam_gui [MODEL.json] [STYLE.json]`. Without a model the sample
//! beam is loaded.

mod ui;

use std::path::Path;
use std::time::{Duration, Instant};

use iced::widget::{column, container, row, rule};
use iced::{Element, Length, Size, Subscription, Task};
use uuid::Uuid;

use beam_core::model::{BeamModel, Element as ModelElement, ElementRef, Load, LoadKind, Support, SupportKind};
use beam_core::render::{Diagram, Point, SceneFrame, SyncReport, Viewport};
use beam_core::store::ModelStore;
use beam_core::style::StylePolicy;
use beam_core::DiagramResult;

const SIDEBAR_WIDTH: f32 = 220.0;

#[derive(Debug, Clone)]
pub enum Message {
    /// Animation tick while transitions are running
    Tick,
    // Canvas
    CanvasResized(Size),
    CanvasPressed(iced::Point),
    CursorMoved(iced::Point),
    CursorLeft,
    // Toolbar
    AddSupport(SupportKind),
    AddLoad(LoadKind),
    DeleteSelected,
    ToggleGrid,
    ToggleDimensions,
    // Beams
    NewBeam,
    SelectBeam(Uuid),
    // Properties
    BeamLengthChanged(String),
    ApplyBeamLength,
    PositionChanged(String),
    MagnitudeChanged(String),
    ExtentChanged(String),
    ApplyEdits,
}

pub struct App {
    pub store: ModelStore,
    pub diagram: Diagram,
    /// Last frame handed to the canvas
    frame: SceneFrame,
    /// Origin of the diagram clock
    started: Instant,
    status: String,
    /// Snapped engineering position under the pointer
    pointer_position: Option<f64>,

    // Edit buffers (text field contents)
    pub beam_length_input: String,
    pub position_input: String,
    pub magnitude_input: String,
    pub extent_input: String,
}

impl App {
    fn new() -> Self {
        let mut args = std::env::args().skip(1);
        let model_path = args.next();
        let style_path = args.next();

        let mut status = String::from("Ready");
        let style = match style_path {
            Some(path) => StylePolicy::from_json_file(Path::new(&path)).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default style");
                status = format!("Style not loaded: {}", e);
                StylePolicy::default()
            }),
            None => StylePolicy::default(),
        };
        let beam = match model_path {
            Some(path) => BeamModel::from_json_file(Path::new(&path)).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to sample beam");
                status = format!("Model not loaded: {}", e);
                BeamModel::sample()
            }),
            None => BeamModel::sample(),
        };

        let mut store = ModelStore::new();
        if let Err(e) = store.add_beam(beam) {
            tracing::error!(error = %e, "failed to add beam");
            status = format!("Error: {}", e);
        }

        let mut app = Self {
            store,
            diagram: Diagram::new(style),
            frame: SceneFrame::default(),
            started: Instant::now(),
            status,
            pointer_position: None,
            beam_length_input: String::new(),
            position_input: String::new(),
            magnitude_input: String::new(),
            extent_input: String::new(),
        };
        app.sync();
        app.load_beam_fields();
        app
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    /// One update cycle: store snapshot into the scene, then refresh the frame
    fn sync(&mut self) -> SyncReport {
        let now = self.now();
        let report = self.diagram.sync(&mut self.store, now);
        if report.selection.is_some() {
            self.load_selection_fields();
        }
        self.frame = self.diagram.frame(now);
        report
    }

    fn refresh_frame(&mut self) {
        let now = self.now();
        self.frame = self.diagram.frame(now);
    }

    /// Run a store mutation, then sync; errors land in the status bar
    fn mutate(&mut self, description: &str, f: impl FnOnce(&mut ModelStore) -> DiagramResult<()>) {
        match f(&mut self.store) {
            Ok(()) => {
                self.status = description.to_string();
                self.sync();
            }
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "{} failed", description);
                self.status = format!("Error: {}", e);
            }
        }
    }

    fn load_beam_fields(&mut self) {
        self.beam_length_input = self
            .store
            .active_beam()
            .map(|s| format!("{}", s.beam.length))
            .unwrap_or_default();
    }

    fn load_selection_fields(&mut self) {
        match self.diagram.selection().selected() {
            Some(ModelElement::Support(support)) => {
                self.position_input = format!("{}", support.position);
                self.magnitude_input.clear();
                self.extent_input.clear();
            }
            Some(ModelElement::Load(load)) => {
                self.position_input = format!("{}", load.position);
                self.magnitude_input = format!("{}", load.magnitude);
                self.extent_input = load.extent.map(|e| format!("{}", e)).unwrap_or_default();
            }
            None => {
                self.position_input.clear();
                self.magnitude_input.clear();
                self.extent_input.clear();
            }
        }
    }

    /// Where a new element goes: under the pointer, or mid-span
    fn placement(&self) -> Option<(f64, f64)> {
        let snapshot = self.store.active_beam()?;
        let length = snapshot.beam.length;
        Some((self.pointer_position.unwrap_or(length / 2.0), length))
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                let now = self.now();
                self.diagram.settle(now);
                self.frame = self.diagram.frame(now);
            }

            Message::CanvasResized(size) => {
                let now = self.now();
                self.diagram
                    .resize(Viewport::new(f64::from(size.width), f64::from(size.height)), now);
                self.refresh_frame();
            }
            Message::CanvasPressed(position) => {
                let point = Point::new(f64::from(position.x), f64::from(position.y));
                match self.diagram.on_pointer_down(point, &mut self.store) {
                    Ok(Some(change)) => {
                        self.status = match &change.current {
                            Some(element) => format!("Selected {}", element.describe()),
                            None => "Selection cleared".to_string(),
                        };
                        self.load_selection_fields();
                        self.refresh_frame();
                    }
                    Ok(None) => {}
                    Err(e) => self.status = format!("Error: {}", e),
                }
            }
            Message::CursorMoved(position) => {
                let point = Point::new(f64::from(position.x), f64::from(position.y));
                let increment = self.diagram.style().snap_increment;
                self.pointer_position = self.diagram.position_at(point).and_then(|x| {
                    self.diagram.scene().mapper().map(|m| m.snap(x, increment))
                });
                if self.diagram.on_pointer_move(Some(point)) {
                    self.refresh_frame();
                }
            }
            Message::CursorLeft => {
                self.pointer_position = None;
                if self.diagram.on_pointer_move(None) {
                    self.refresh_frame();
                }
            }

            Message::AddSupport(kind) => {
                if let Some((position, _)) = self.placement() {
                    let support = Support::new(kind, position);
                    let id = support.id;
                    self.mutate(&format!("Added {} support", kind.display_name()), |store| {
                        store.add_support(support)?;
                        store.set_selected_element(Some(ElementRef::Support(id)))
                    });
                }
            }
            Message::AddLoad(kind) => {
                if let Some((position, length)) = self.placement() {
                    let load = match kind {
                        LoadKind::Point => Load::point(-10.0, position),
                        LoadKind::Moment => Load::moment(-10.0, position),
                        LoadKind::Distributed => {
                            let extent = length / 4.0;
                            Load::distributed(-5.0, position.min(length - extent).max(0.0), extent)
                        }
                    };
                    let id = load.id;
                    self.mutate(&format!("Added {} load", kind.display_name()), |store| {
                        store.add_load(load)?;
                        store.set_selected_element(Some(ElementRef::Load(id)))
                    });
                }
            }
            Message::DeleteSelected => match self.diagram.request_delete(&mut self.store) {
                Ok(Some(removed)) => {
                    self.status = format!("Deleted {}", removed.describe());
                    self.sync();
                    self.load_selection_fields();
                }
                Ok(None) => {}
                Err(e) => self.status = format!("Error: {}", e),
            },
            Message::ToggleGrid => {
                let visible = !self.diagram.grid_visible();
                self.diagram.set_grid_visible(visible);
                self.refresh_frame();
            }
            Message::ToggleDimensions => {
                let visible = !self.diagram.dimensions_visible();
                self.diagram.set_dimensions_visible(visible);
                self.refresh_frame();
            }

            Message::NewBeam => {
                let label = format!("B-{}", self.store.beams().count() + 1);
                let beam = BeamModel::new(label.clone(), 10.0)
                    .with_support(Support::new(SupportKind::Pin, 0.0))
                    .with_support(Support::new(SupportKind::Roller, 10.0));
                self.mutate(&format!("Created {}", label), |store| store.add_beam(beam).map(|_| ()));
                self.load_beam_fields();
            }
            Message::SelectBeam(id) => {
                self.pointer_position = None;
                self.mutate("Switched beam", |store| store.set_active_beam(id));
                self.load_beam_fields();
            }

            Message::BeamLengthChanged(value) => self.beam_length_input = value,
            Message::ApplyBeamLength => match self.beam_length_input.trim().parse::<f64>() {
                Ok(length) => self.mutate("Beam length updated", |store| store.set_beam_length(length)),
                Err(_) => self.status = format!("Invalid length: '{}'", self.beam_length_input),
            },
            Message::PositionChanged(value) => self.position_input = value,
            Message::MagnitudeChanged(value) => self.magnitude_input = value,
            Message::ExtentChanged(value) => self.extent_input = value,
            Message::ApplyEdits => self.apply_edits(),
        }
        Task::none()
    }

    fn apply_edits(&mut self) {
        let Some(selected) = self.diagram.selection().selected().cloned() else {
            return;
        };
        let Some(position) = parse_field("Position", &self.position_input, &mut self.status) else {
            return;
        };

        match selected {
            ModelElement::Support(support) => {
                let support = Support { position, ..support };
                self.mutate("Support updated", |store| store.update_support(support));
            }
            ModelElement::Load(load) => {
                let Some(magnitude) = parse_field("Value", &self.magnitude_input, &mut self.status) else {
                    return;
                };
                let extent = if load.kind.requires_extent() {
                    match parse_field("Extent", &self.extent_input, &mut self.status) {
                        Some(extent) => Some(extent),
                        None => return,
                    }
                } else {
                    None
                };
                let load = Load {
                    position,
                    magnitude,
                    extent,
                    ..load
                };
                self.mutate("Load updated", |store| store.update_load(load));
            }
        }
        self.load_selection_fields();
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.diagram.is_animating(self.now()) {
            iced::time::every(Duration::from_millis(16)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let beam_label = self
            .store
            .active_beam()
            .map(|s| s.beam.label.clone())
            .unwrap_or_default();
        let highlight = self
            .diagram
            .selection()
            .highlight_id()
            .map(|id| (id, self.diagram.style().highlight_color));
        let hover = self
            .diagram
            .selection()
            .hover_id()
            .map(|id| (id, self.diagram.style().hover_color));

        let body = row![
            ui::beams_panel::view_beams_panel(&self.store, SIDEBAR_WIDTH),
            rule::vertical(1),
            container(ui::beam_canvas::view_canvas(&self.frame, highlight, hover))
                .width(Length::Fill)
                .height(Length::Fill),
            rule::vertical(1),
            ui::properties_panel::view_properties_panel(self, SIDEBAR_WIDTH),
        ]
        .spacing(10)
        .height(Length::Fill);

        column![
            ui::toolbar::view_header(beam_label),
            ui::toolbar::view_toolbar(
                self.diagram.grid_visible(),
                self.diagram.dimensions_visible(),
                self.diagram.selection().selected().is_some(),
            ),
            rule::horizontal(1),
            body,
            rule::horizontal(1),
            ui::status_bar::view_status_bar(
                self.pointer_position,
                self.diagram.style().units.length(),
                self.store.version(),
                &self.status,
            ),
        ]
        .spacing(6)
        .padding(15)
        .into()
    }
}

/// Parse a numeric text field, reporting failures in the status line
fn parse_field(name: &str, value: &str, status: &mut String) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            *status = format!("Invalid {}: '{}'", name.to_lowercase(), value);
            None
        }
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    iced::application(App::new, App::update, App::view)
        .subscription(App::subscription)
        .title("Beamline - Beam Diagram Editor")
        .window_size(Size::new(1280.0, 720.0))
        .run()
}
