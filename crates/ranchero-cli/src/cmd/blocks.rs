//! `ranch blocks` — list blocks with filtering and sorting.

use crate::format;
use crate::output::{OutputMode, Renderable, pretty_kv, pretty_rule, render_list};
use anyhow::{Result, bail};
use clap::Args;
use ranchero_core::model::Block;
use ranchero_core::store::{BlockFilter, BlockSort, RanchStore, sort_blocks};
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Args, Debug)]
pub struct BlocksArgs {
    /// Filter by status: active, resting, replanting, maintenance.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Free-text search over name, variety, and soil type.
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// Sort order: name, area, planted, status.
    #[arg(long, default_value = "name")]
    pub sort: String,
}

pub(crate) struct BlockRow<'a>(pub &'a Block);

impl Renderable for BlockRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let block = self.0;
        writeln!(w, "{}  [{}]  {}", block.name, block.status, block.id)?;
        pretty_kv(w, "Crop", block.crop_type.to_string())?;
        pretty_kv(w, "Area", format::acres(block.area))?;
        pretty_kv(
            w,
            "Irrigation",
            format::title_case(&block.irrigation_type.to_string()),
        )?;
        pretty_kv(w, "Planted", format::date(block.planting_date))?;
        if let Some(trees) = block.metadata.trees {
            pretty_kv(w, "Trees", trees.to_string())?;
        }
        pretty_rule(w)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        write!(
            w,
            "{}",
            serde_json::to_string(self.0).map_err(io::Error::other)?
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let block = self.0;
        writeln!(
            w,
            "{}\t{}\t{}\t{:.1}\t{}\t{}",
            block.id, block.name, block.status, block.area, block.crop_type, block.irrigation_type,
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["id", "name", "status", "acres", "crop", "irrigation"]
    }
}

fn parse_sort(name: &str) -> Result<BlockSort> {
    Ok(match name {
        "name" => BlockSort::Name,
        "area" => BlockSort::Area,
        "planted" => BlockSort::Planted,
        "status" => BlockSort::Status,
        other => bail!("unknown sort '{other}' (expected name, area, planted, or status)"),
    })
}

pub fn run_blocks(args: &BlocksArgs, store: &RanchStore, output: OutputMode) -> Result<()> {
    let filter = BlockFilter {
        status: args
            .status
            .as_deref()
            .map(FromStr::from_str)
            .transpose()?,
        search: args.search.clone().unwrap_or_default(),
    };

    let mut blocks = filter.apply(store.blocks());
    sort_blocks(&mut blocks, parse_sort(&args.sort)?);

    let rows: Vec<BlockRow<'_>> = blocks.into_iter().map(BlockRow).collect();
    render_list(&rows, output)?;
    Ok(())
}
