//! Carto CLI
//!
//! Loads a JSON scene, runs one render pass over every sublayer into a
//! display list and prints the result.

mod scene;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use carto_common::warning::clear_warnings;
use carto_render::{DisplayList, DrawCommand, FixedZoom, RenderPass};
use clap::Parser;
use owo_colors::{OwoColorize, Style};

/// Carto: run the symbolizer over a scene and print the draw calls
#[derive(Parser, Debug)]
#[command(name = "carto")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the display list of a scene
    carto demos/scene.json

    # Override the scene zoom
    carto --zoom 12 demos/scene.json

    # Machine-readable output
    carto --json demos/scene.json
"#)]
struct Cli {
    /// Path to the scene file
    #[arg(value_name = "SCENE")]
    scene: PathBuf,

    /// Zoom level to render at instead of the scene's
    #[arg(long)]
    zoom: Option<f64>,

    /// Print the display list as JSON
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.scene)
        .with_context(|| format!("reading {}", cli.scene.display()))?;
    let scene = scene::parse(&text).with_context(|| format!("parsing {}", cli.scene.display()))?;
    let zoom = cli.zoom.unwrap_or(scene.zoom);

    clear_warnings();
    let mut loaded = scene.load()?;
    let map = FixedZoom(zoom);
    let mut list = DisplayList::new();
    let mut failures = Vec::new();
    for sublayer in &mut loaded.sublayers {
        let mut pass = RenderPass::new(&loaded.layer, &map, &mut list);
        if let Err(err) = sublayer.redraw(&mut pass) {
            failures.push(format!("{}: {err}", sublayer.id().unwrap_or_default()));
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        Printer { color: !cli.no_color }.print(&list, zoom);
    }

    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("{}", Printer { color: !cli.no_color }.paint(failure, Style::new().red()));
        }
        bail!("{} sublayer(s) failed to render", failures.len());
    }
    Ok(())
}

/// Human-readable display list output
struct Printer {
    color: bool,
}

impl Printer {
    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn print(&self, list: &DisplayList, zoom: f64) {
        println!(
            "{}",
            self.paint(
                &format!("=== Display List (zoom {zoom}, {} commands) ===", list.len()),
                Style::new().bold()
            )
        );

        for command in list.commands() {
            match command {
                DrawCommand::BindSurfaces { handles } => {
                    let line = format!(
                        "bind context={} hit={}",
                        handles.context.0, handles.hit_context.0
                    );
                    println!("{}", self.paint(&line, Style::new().dimmed()));
                }
                DrawCommand::DrawFeature {
                    feature_id,
                    kind,
                    highlighted,
                    layer_index,
                    style,
                    ..
                } => {
                    let order = layer_index.map_or_else(|| "-".to_string(), |i| i.to_string());
                    let mut header = format!("draw #{feature_id} {kind} order={order}");
                    if *highlighted {
                        header.push_str(" [highlight]");
                    }
                    let header_style = if *highlighted {
                        Style::new().yellow().bold()
                    } else {
                        Style::new().green()
                    };
                    println!("{}", self.paint(&header, header_style));
                    for (property, value) in style.iter() {
                        println!("  {}: {value}", self.paint(property.as_ref(), Style::new().cyan()));
                    }
                }
            }
        }
    }
}
