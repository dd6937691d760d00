//! `ranch map` — render the schematic block map as an SVG document.

use anyhow::{Context, Result, bail};
use clap::Args;
use ranchero_core::error::ErrorCode;
use ranchero_core::map::{MapViewState, build_scene};
use ranchero_core::store::RanchStore;
use ranchero_core::svg::render_map;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Write the SVG here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Draw the background grid.
    #[arg(long)]
    pub grid: bool,

    /// Hide block name and area labels.
    #[arg(long)]
    pub no_labels: bool,

    /// Render this block as selected.
    #[arg(short, long)]
    pub select: Option<String>,

    /// Viewport padding in map units.
    #[arg(long)]
    pub padding: Option<f64>,
}

pub fn run_map(args: &MapArgs, store: &RanchStore, default_padding: f64) -> Result<()> {
    let mut state = MapViewState::with_selection(args.select.clone());
    state.show_grid = args.grid;
    state.show_labels = !args.no_labels;

    if let Some(selected) = &args.select {
        if store.block(selected).is_none() {
            bail!("unknown block '{selected}'; run `ranch blocks` to list ids");
        }
    }

    let padding = args.padding.unwrap_or(default_padding);
    let Some(scene) = build_scene(store.blocks(), &state, padding) else {
        bail!(
            "{} ({}): the fixture set has no blocks",
            ErrorCode::EmptyMap.message(),
            ErrorCode::EmptyMap
        );
    };
    let svg = render_map(&scene);

    match &args.output {
        Some(path) => {
            std::fs::write(path, &svg)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = svg.len(), "map written");
        }
        None => print!("{svg}"),
    }
    Ok(())
}
