//! `ranch overview` — headline stats for the active ranch.

use crate::output::{OutputMode, Renderable, pretty_kv, pretty_section, render_item};
use anyhow::Result;
use chrono::Utc;
use ranchero_core::store::{DashboardStats, RanchStore};
use std::io::{self, Write};

struct OverviewReport {
    ranch_name: String,
    stats: DashboardStats,
}

impl Renderable for OverviewReport {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        pretty_section(w, &format!("{} — overview", self.ranch_name))?;
        pretty_kv(w, "Blocks", self.stats.total_blocks.to_string())?;
        pretty_kv(w, "Total area", crate::format::acres(self.stats.total_acres))?;
        pretty_kv(w, "Active tasks", self.stats.active_tickets.to_string())?;
        pretty_kv(
            w,
            "Done (month)",
            self.stats.completed_this_month.to_string(),
        )?;
        pretty_kv(w, "Due in 7d", self.stats.upcoming_tasks.to_string())
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        let value = serde_json::json!({
            "ranch": self.ranch_name,
            "stats": self.stats,
        });
        write!(w, "{value}")
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{:.1}\t{}\t{}\t{}",
            self.ranch_name,
            self.stats.total_blocks,
            self.stats.total_acres,
            self.stats.active_tickets,
            self.stats.completed_this_month,
            self.stats.upcoming_tasks,
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ranch", "blocks", "acres", "active", "done_month", "due_7d"]
    }
}

pub fn run_overview(store: &RanchStore, output: OutputMode) -> Result<()> {
    let report = OverviewReport {
        ranch_name: store.ranch().name.clone(),
        stats: store.stats(Utc::now()),
    };
    render_item(&report, output)?;
    Ok(())
}
