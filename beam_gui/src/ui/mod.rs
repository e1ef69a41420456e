//! UI module for the Beamline GUI
//!
//! # Panel Structure
//! - `toolbar` - Add supports/loads, delete, grid toggle
//! - `beams_panel` - Left sidebar: beams of the session
//! - `beam_canvas` - Center: the retained beam scene
//! - `properties_panel` - Right: beam length and the selected element's fields
//! - `status_bar` - Bottom: pointer position, model version, status messages

pub mod beam_canvas;
pub mod beams_panel;
pub mod properties_panel;
pub mod status_bar;
pub mod toolbar;
