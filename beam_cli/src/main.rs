//! # Beamline CLI
//!
//! Headless front-end for the beam diagram engine. Loads a model (or the
//! sample beam), lays it out for a viewport and prints JSON:
//!
//! - `render` - the settled scene frame
//! - `hit --x --y` - what sits under a screen point
//! - `check` - validation summary of the model
//!
//! The rendered frame includes dimension lines unless `--no-dimensions` is
//! given.
//!
//! Errors are printed as text on stderr followed by their JSON form, so
//! scripts can branch on `error_code`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use beam_core::render::{Diagram, Point, Viewport};
use beam_core::{BeamModel, DiagramError, DiagramResult, ModelStore, StylePolicy};

/// Render beam diagrams to JSON scenes
#[derive(Parser, Debug)]
#[command(name = "beam_cli")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Beam model JSON; the sample beam is used when omitted
    #[arg(short, long, global = true)]
    model: Option<PathBuf>,

    /// Style policy JSON (partial policies are filled with defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Viewport width (px)
    #[arg(long, global = true, default_value_t = 800.0)]
    width: f64,

    /// Viewport height (px)
    #[arg(long, global = true, default_value_t = 300.0)]
    height: f64,

    /// Hide the background grid
    #[arg(long, global = true)]
    no_grid: bool,

    /// Hide the dimension lines
    #[arg(long, global = true)]
    no_dimensions: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the scene frame as JSON
    Render {
        /// Compact output instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },
    /// Hit-test a screen point and print the result as JSON
    Hit {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },
    /// Validate the model and print a summary
    Check,
}

fn load_model(path: Option<&Path>) -> DiagramResult<BeamModel> {
    match path {
        Some(path) => BeamModel::from_json_file(path),
        None => Ok(BeamModel::sample()),
    }
}

fn load_style(path: Option<&Path>) -> DiagramResult<StylePolicy> {
    match path {
        Some(path) => StylePolicy::from_json_file(path),
        None => Ok(StylePolicy::default()),
    }
}

/// Store plus a diagram already synced to the requested viewport
fn prepare(cli: &Cli) -> DiagramResult<(ModelStore, Diagram)> {
    let viewport = Viewport::new(cli.width, cli.height);
    if !viewport.is_valid() {
        return Err(DiagramError::invalid_input(
            "viewport",
            format!("{}x{}", cli.width, cli.height),
            "Viewport dimensions must be finite and positive",
        ));
    }
    let beam = load_model(cli.model.as_deref())?;
    let style = load_style(cli.config.as_deref())?;

    let mut store = ModelStore::new();
    store.add_beam(beam)?;
    let mut diagram = Diagram::new(style);
    diagram.set_grid_visible(!cli.no_grid);
    diagram.set_dimensions_visible(!cli.no_dimensions);
    diagram.resize(viewport, Duration::ZERO);
    let cycle = diagram.sync(&mut store, Duration::ZERO);
    tracing::debug!(created = cycle.scene.created.len(), "scene built");
    Ok((store, diagram))
}

fn run(cli: &Cli) -> DiagramResult<String> {
    let (store, diagram) = prepare(cli)?;

    match &cli.command {
        Commands::Render { compact } => {
            let frame = diagram.frame(Duration::ZERO);
            if *compact {
                Ok(serde_json::to_string(&frame)?)
            } else {
                Ok(serde_json::to_string_pretty(&frame)?)
            }
        }
        Commands::Hit { x, y } => {
            let hit = diagram.hit_test(Point::new(*x, *y));
            let element = hit.and_then(|h| store.element(h.element));
            let value = serde_json::json!({
                "hit": hit,
                "element": element,
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
        Commands::Check => {
            let snapshot = store.active_beam().ok_or(DiagramError::NoActiveBeam)?;
            let beam = &snapshot.beam;
            let value = serde_json::json!({
                "label": beam.label,
                "length": beam.length,
                "supports": beam.supports.len(),
                "loads": beam.loads.len(),
                "elements": beam.element_ids().map(|id| beam.element(id).map(|e| e.describe())).collect::<Vec<_>>(),
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            let json = serde_json::json!({
                "error_code": e.error_code(),
                "error": e,
            });
            if let Ok(json) = serde_json::to_string_pretty(&json) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
