//! `ranch show <block-id>` — one block's dashboard: details, metadata, and
//! its recent tickets.
//!
//! An unknown block id is not an error: the command degrades to the block
//! list, the same redirect the full dashboard performs, and exits 0.

use crate::cmd::blocks::BlockRow;
use crate::cmd::tickets::TicketRow;
use crate::format;
use crate::output::{OutputMode, Renderable, pretty_kv, pretty_section, render_item, render_list};
use anyhow::Result;
use clap::Args;
use ranchero_core::model::{Block, Ticket};
use ranchero_core::store::RanchStore;
use std::io::{self, Write};
use tracing::debug;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Block id, e.g. `rde-block-1`.
    pub block_id: String,

    /// Maximum tickets to include.
    #[arg(short = 'n', long, default_value = "5")]
    pub limit: usize,
}

struct BlockDetail<'a> {
    ranch_name: &'a str,
    block: &'a Block,
    tickets: Vec<&'a Ticket>,
    active_tickets: usize,
}

impl Renderable for BlockDetail<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let block = self.block;
        pretty_section(w, &format!("{} — {}", block.name, self.ranch_name))?;
        pretty_kv(w, "Status", format::title_case(&block.status.to_string()))?;
        pretty_kv(w, "Area", format::acres(block.area))?;
        pretty_kv(w, "Crop", block.crop_type.to_string())?;
        pretty_kv(
            w,
            "Irrigation",
            format::title_case(&block.irrigation_type.to_string()),
        )?;
        pretty_kv(w, "Soil", &block.soil_type)?;
        pretty_kv(w, "Planted", format::date(block.planting_date))?;
        if let Some(last) = block.last_harvest {
            pretty_kv(w, "Last harvest", format::date(last))?;
        }
        if let Some(trees) = block.metadata.trees {
            pretty_kv(w, "Trees", trees.to_string())?;
        }
        if let Some(variety) = &block.metadata.variety {
            pretty_kv(w, "Variety", variety)?;
        }
        if let Some(rootstock) = &block.metadata.rootstock {
            pretty_kv(w, "Rootstock", rootstock)?;
        }
        if let Some(spacing) = &block.metadata.spacing {
            pretty_kv(w, "Spacing", spacing)?;
        }
        if let Some(notes) = &block.metadata.notes {
            pretty_kv(w, "Notes", notes)?;
        }
        pretty_kv(w, "Active tasks", self.active_tickets.to_string())?;

        if !self.tickets.is_empty() {
            writeln!(w)?;
            pretty_section(w, "Recent tickets")?;
            for ticket in &self.tickets {
                TicketRow(ticket).render_human(w)?;
            }
        }
        Ok(())
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        let value = serde_json::json!({
            "block": self.block,
            "activeTickets": self.active_tickets,
            "recentTickets": self.tickets,
        });
        write!(w, "{value}")
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        BlockRow(self.block).render_table(w)?;
        for ticket in &self.tickets {
            TicketRow(ticket).render_table(w)?;
        }
        Ok(())
    }
}

pub fn run_show(args: &ShowArgs, store: &RanchStore, output: OutputMode) -> Result<()> {
    let Some(block) = store.block(&args.block_id) else {
        // Redirect, not an error: same recovery as the dashboard route.
        debug!(block_id = %args.block_id, "unknown block; redirecting to the block list");
        let rows: Vec<BlockRow<'_>> = store.blocks().iter().map(BlockRow).collect();
        render_list(&rows, output)?;
        return Ok(());
    };

    let mut tickets = store.tickets_for_block(&block.id);
    let active_tickets = tickets.iter().filter(|t| t.status.is_active()).count();
    tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    tickets.truncate(args.limit);

    let detail = BlockDetail {
        ranch_name: &store.ranch().name,
        block,
        tickets,
        active_tickets,
    };
    render_item(&detail, output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ShowArgs;

    #[test]
    fn args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ShowArgs,
        }
        let w = Wrapper::parse_from(["test", "rde-block-1"]);
        assert_eq!(w.args.block_id, "rde-block-1");
        assert_eq!(w.args.limit, 5);
    }
}
