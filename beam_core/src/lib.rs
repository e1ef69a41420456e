//! # beam_core - Beam Diagram Engine
//!
//! `beam_core` turns a simple beam model (supports, point loads, distributed
//! loads, applied moments) into a scaled, annotated 2D retained vector scene,
//! keeps that scene consistent as the model changes, and maps pointer input
//! back onto model elements.
//!
//! ## Design Philosophy
//!
//! - **Snapshot-driven**: the renderer only ever reads immutable, versioned
//!   model snapshots published by the [`store::ModelStore`]
//! - **Renderer-agnostic**: the scene is plain data (lines, polygons, text,
//!   gradient paints); front-ends translate it to their drawing API
//! - **JSON-First**: models, styles and frames implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use beam_core::model::BeamModel;
//! use beam_core::render::{Diagram, Viewport};
//! use beam_core::store::ModelStore;
//!
//! let mut store = ModelStore::new();
//! store.add_beam(BeamModel::sample()).unwrap();
//!
//! let mut diagram = Diagram::default();
//! diagram.resize(Viewport::new(800.0, 300.0), Duration::ZERO);
//! let cycle = diagram.sync(&mut store, Duration::ZERO);
//! assert_eq!(cycle.scene.created.len(), 4);
//!
//! let frame = diagram.frame(Duration::ZERO);
//! assert_eq!(frame.glyphs.len(), 4);
//! ```
//!
//! ## Modules
//!
//! - [`model`] - Beam, support and load types
//! - [`store`] - Model store publishing versioned snapshots
//! - [`render`] - Coordinate mapping, scaling, glyphs, dimension lines, scene
//!   and selection
//! - [`style`] - Style policy and unit labels (configuration)
//! - [`errors`] - Structured error types

pub mod errors;
pub mod model;
pub mod render;
pub mod store;
pub mod style;

// Re-export commonly used types at crate root for convenience
pub use errors::{DiagramError, DiagramResult};
pub use model::{BeamModel, Element, ElementRef, Load, LoadKind, Support, SupportKind};
pub use render::{Diagram, SceneFrame, Viewport};
pub use store::{ModelSnapshot, ModelStore};
pub use style::{DimensionStyle, StylePolicy, UnitSystem};
