//! `ranch tickets` — list tickets with filtering, sorting, and the
//! per-status count header.

use crate::format;
use crate::output::{OutputMode, Renderable, pretty_kv, pretty_rule, render_list};
use anyhow::{Result, bail};
use clap::Args;
use ranchero_core::model::Ticket;
use ranchero_core::store::{
    RanchStore, TicketFilter, TicketSort, sort_tickets, ticket_status_counts,
};
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Args, Debug)]
pub struct TicketsArgs {
    /// Filter by status: open, in_progress, pending_review, completed,
    /// cancelled, on_hold.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Filter by type (irrigation, pruning, harvest, ...).
    #[arg(short = 't', long = "type")]
    pub ticket_type: Option<String>,

    /// Filter by priority: low, medium, high, urgent.
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Filter by block id.
    #[arg(short, long)]
    pub block: Option<String>,

    /// Filter by assignee.
    #[arg(long)]
    pub assignee: Option<String>,

    /// Free-text search over title, description, and tags.
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// Sort order: updated, due, priority, title.
    #[arg(long, default_value = "updated")]
    pub sort: String,

    /// Skip the status count header.
    #[arg(long)]
    pub no_counts: bool,
}

pub(crate) struct TicketRow<'a>(pub &'a Ticket);

impl Renderable for TicketRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let ticket = self.0;
        writeln!(
            w,
            "{}  [{}/{}]  {}",
            ticket.title, ticket.status, ticket.priority, ticket.id
        )?;
        pretty_kv(w, "Type", ticket.ticket_type.to_string())?;
        if let Some(block_id) = &ticket.block_id {
            pretty_kv(w, "Block", block_id)?;
        }
        if let Some(assignee) = &ticket.assigned_to {
            pretty_kv(w, "Assigned", assignee)?;
        }
        if let Some(due) = ticket.due_date {
            pretty_kv(w, "Due", format::datetime(due))?;
        }
        if let Some(est) = ticket.estimated_hours {
            pretty_kv(w, "Estimate", format::hours(est))?;
        }
        if !ticket.tags.is_empty() {
            pretty_kv(w, "Tags", ticket.tags.join(", "))?;
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
        let ticket = self.0;
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            ticket.id,
            ticket.status,
            ticket.priority,
            ticket.ticket_type,
            ticket.block_id.as_deref().unwrap_or("-"),
            ticket.title,
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["id", "status", "priority", "type", "block", "title"]
    }
}

fn parse_sort(name: &str) -> Result<TicketSort> {
    Ok(match name {
        "updated" => TicketSort::Updated,
        "due" => TicketSort::DueDate,
        "priority" => TicketSort::Priority,
        "title" => TicketSort::Title,
        other => bail!("unknown sort '{other}' (expected updated, due, priority, or title)"),
    })
}

pub fn run_tickets(args: &TicketsArgs, store: &RanchStore, output: OutputMode) -> Result<()> {
    let filter = TicketFilter {
        status: args
            .status
            .as_deref()
            .map(FromStr::from_str)
            .transpose()?,
        ticket_type: args
            .ticket_type
            .as_deref()
            .map(FromStr::from_str)
            .transpose()?,
        priority: args
            .priority
            .as_deref()
            .map(FromStr::from_str)
            .transpose()?,
        block_id: args.block.clone(),
        assigned_to: args.assignee.clone(),
        search: args.search.clone().unwrap_or_default(),
    };

    let mut tickets = filter.apply(store.tickets());
    sort_tickets(&mut tickets, parse_sort(&args.sort)?);

    if !args.no_counts && output.is_pretty() {
        let counts = ticket_status_counts(store.tickets());
        println!(
            "{} of {} tasks — open {}, in progress {}, review {}, done {}, cancelled {}, on hold {}",
            tickets.len(),
            counts.total,
            counts.open,
            counts.in_progress,
            counts.pending_review,
            counts.completed,
            counts.cancelled,
            counts.on_hold,
        );
        println!();
    }

    let rows: Vec<TicketRow<'_>> = tickets.into_iter().map(TicketRow).collect();
    render_list(&rows, output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{TicketsArgs, parse_sort};
    use ranchero_core::store::TicketSort;

    #[test]
    fn args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: TicketsArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.status.is_none());
        assert!(w.args.ticket_type.is_none());
        assert_eq!(w.args.sort, "updated");
        assert!(!w.args.no_counts);
    }

    #[test]
    fn type_flag_uses_long_name() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: TicketsArgs,
        }
        let w = Wrapper::parse_from(["test", "--type", "irrigation"]);
        assert_eq!(w.args.ticket_type.as_deref(), Some("irrigation"));
    }

    #[test]
    fn sort_names_parse() {
        assert_eq!(parse_sort("due").expect("known"), TicketSort::DueDate);
        assert!(parse_sort("age").is_err());
    }
}
