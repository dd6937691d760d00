//! `ranch create` — create a new ticket with field-level validation.

use crate::cmd::tickets::TicketRow;
use crate::output::{OutputMode, Renderable, render_item};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Args;
use ranchero_core::store::{RanchStore, TicketDraft};
use ranchero_core::write::TicketSink;
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Title of the new ticket.
    #[arg(short, long)]
    pub title: String,

    /// What needs to be done.
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Ticket type (irrigation, pruning, harvest, ...).
    #[arg(short = 'k', long = "type", default_value = "maintenance")]
    pub ticket_type: String,

    /// Priority: low, medium, high, urgent.
    #[arg(short, long, default_value = "medium")]
    pub priority: String,

    /// Attach to a block (omit for a ranch-wide ticket).
    #[arg(short, long)]
    pub block: Option<String>,

    /// Assignee.
    #[arg(long)]
    pub assign: Option<String>,

    /// Estimated hours.
    #[arg(long, default_value = "")]
    pub hours: String,

    /// Due date, `YYYY-MM-DD`.
    #[arg(long)]
    pub due: Option<NaiveDate>,

    /// Tags (comma-separated).
    #[arg(long, default_value = "")]
    pub tags: String,
}

struct Created<'a>(TicketRow<'a>);

impl Renderable for Created<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "Created:")?;
        self.0.render_human(w)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        self.0.render_json(w)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        self.0.render_table(w)
    }
}

pub fn run_create(
    args: &CreateArgs,
    store: &mut RanchStore,
    sink: &dyn TicketSink,
    operator: &str,
    output: OutputMode,
) -> Result<()> {
    if let Some(block_id) = &args.block {
        if store.block(block_id).is_none() {
            bail!("unknown block '{block_id}'; run `ranch blocks` to list ids");
        }
    }

    let draft = TicketDraft {
        title: args.title.clone(),
        description: args.description.clone(),
        ticket_type: FromStr::from_str(&args.ticket_type)?,
        priority: FromStr::from_str(&args.priority)?,
        block_id: args.block.clone(),
        assigned_to: args.assign.clone(),
        estimated_hours: args.hours.clone(),
        due_date: args.due,
        tags: args.tags.clone(),
    };

    match sink.create_ticket(store, &draft, operator) {
        Ok(ticket) => {
            render_item(&Created(TicketRow(&ticket)), output)?;
            Ok(())
        }
        Err(e) => bail!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::CreateArgs;

    #[test]
    fn args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: CreateArgs,
        }
        let w = Wrapper::parse_from(["test", "--title", "Check drip line"]);
        assert_eq!(w.args.title, "Check drip line");
        assert_eq!(w.args.ticket_type, "maintenance");
        assert_eq!(w.args.priority, "medium");
        assert!(w.args.block.is_none());
        assert!(w.args.due.is_none());
    }

    #[test]
    fn due_date_parses() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: CreateArgs,
        }
        let w = Wrapper::parse_from(["test", "--title", "t", "--due", "2024-06-14"]);
        assert!(w.args.due.is_some());

        let bad = Wrapper::try_parse_from(["test", "--title", "t", "--due", "someday"]);
        assert!(bad.is_err());
    }
}
