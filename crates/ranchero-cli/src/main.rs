#![forbid(unsafe_code)]

mod cmd;
mod format;
mod operator;
mod output;
mod tui;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use ranchero_core::config::{load_project_config, load_user_config};
use ranchero_core::fixtures;
use ranchero_core::write::{DelayedSink, DirectSink};
use std::env;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ranchero: farm-management dashboard for blocks and tickets",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format (pretty, text, json).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Operator identity for created_by stamps (skips env resolution).
    #[arg(long = "as", global = true, value_name = "OPERATOR")]
    operator: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }

    fn operator_flag(&self) -> Option<&str> {
        self.operator.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Ranch overview stats",
        after_help = "EXAMPLES:\n    # Headline numbers for the ranch\n    ranch overview\n\n    # Machine-readable output\n    ranch overview --json"
    )]
    Overview,

    #[command(
        next_help_heading = "Read",
        about = "List blocks",
        long_about = "List land blocks with optional filters and sort order.",
        after_help = "EXAMPLES:\n    # All blocks, largest first\n    ranch blocks --sort area\n\n    # Blocks under maintenance\n    ranch blocks --status maintenance\n\n    # Machine-readable output\n    ranch blocks --json"
    )]
    Blocks(cmd::blocks::BlocksArgs),

    #[command(
        next_help_heading = "Read",
        about = "List tickets",
        long_about = "List work tickets with optional filters and sort order.",
        after_help = "EXAMPLES:\n    # Open irrigation work\n    ranch tickets --status open --type irrigation\n\n    # Everything due soonest first\n    ranch tickets --sort due\n\n    # Machine-readable output\n    ranch tickets --json"
    )]
    Tickets(cmd::tickets::TicketsArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one block",
        long_about = "Show a block's details and recent tickets. An unknown id \
                      falls back to the block list.",
        after_help = "EXAMPLES:\n    # Block dashboard\n    ranch show rde-block-1\n\n    # Machine-readable output\n    ranch show rde-block-1 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Write",
        about = "Create a ticket",
        long_about = "Create a new work ticket. Title and description are \
                      required; estimated hours must be numeric.",
        after_help = "EXAMPLES:\n    # Ticket against a block\n    ranch create --title \"Check drip line\" --description \"Leak near valve 3\" --type irrigation --block rde-block-1\n\n    # Ranch-wide ticket\n    ranch create --title \"Grade access road\" --description \"Washboard by the gate\""
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Map",
        about = "Render the block map as SVG",
        after_help = "EXAMPLES:\n    # SVG to stdout\n    ranch map\n\n    # With grid, to a file\n    ranch map --grid -o ranch.svg"
    )]
    Map(cmd::map::MapArgs),

    #[command(
        next_help_heading = "Interactive",
        about = "Open the interactive dashboard",
        long_about = "Full-screen dashboard: overview, block list, ticket \
                      list, and the schematic map with mouse hover/select."
    )]
    Ui,

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Bash completions\n    ranch completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RANCH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "ranchero=debug,info"
        } else {
            "ranchero=info,warn"
        })
    });

    let format = env::var("RANCH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    // Logs go to stderr: stdout belongs to command output (SVG, JSON).
    let registry = tracing_subscriber::registry().with(filter);
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;
    let project_config = load_project_config(&project_root)?;
    let user_config = load_user_config().unwrap_or_default();
    let output = cli.output_mode();

    let mut store = fixtures::load_default()?;

    match cli.command {
        Commands::Overview => cmd::overview::run_overview(&store, output),
        Commands::Blocks(ref args) => cmd::blocks::run_blocks(args, &store, output),
        Commands::Tickets(ref args) => cmd::tickets::run_tickets(args, &store, output),
        Commands::Show(ref args) => cmd::show::run_show(args, &store, output),
        Commands::Create(ref args) => {
            let operator = operator::require_operator(
                cli.operator_flag(),
                user_config.operator.as_deref(),
            )?;
            let sink = DelayedSink::new(
                DirectSink,
                Duration::from_millis(project_config.write.simulated_latency_ms),
            );
            cmd::create::run_create(args, &mut store, &sink, &operator, output)
        }
        Commands::Map(ref args) => cmd::map::run_map(args, &store, project_config.map.padding),
        Commands::Ui => {
            let operator = operator::resolve_operator(
                cli.operator_flag(),
                user_config.operator.as_deref(),
            )
            .unwrap_or_else(|| "dashboard".to_string());
            tui::run_dashboard(store, &project_config, operator)
        }
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["ranch", "--json", "blocks"]);
        assert!(cli.json);
    }

    #[test]
    fn format_flag_parses_before_and_after_subcommand() {
        let cli = Cli::parse_from(["ranch", "--format", "text", "tickets"]);
        assert!(matches!(cli.format, Some(OutputMode::Text)));

        let cli = Cli::parse_from(["ranch", "tickets", "--format", "json"]);
        assert!(matches!(cli.format, Some(OutputMode::Json)));
    }

    #[test]
    fn operator_flag_parsed() {
        let cli = Cli::parse_from(["ranch", "--as", "manager-001", "create", "--title", "t"]);
        assert_eq!(cli.operator_flag(), Some("manager-001"));
    }

    #[test]
    fn all_subcommands_parse() {
        let subcommands = [
            vec!["ranch", "overview"],
            vec!["ranch", "blocks"],
            vec!["ranch", "blocks", "--status", "active", "--sort", "area"],
            vec!["ranch", "tickets"],
            vec!["ranch", "tickets", "--type", "irrigation", "--priority", "high"],
            vec!["ranch", "show", "rde-block-1"],
            vec!["ranch", "create", "--title", "x", "--description", "y"],
            vec!["ranch", "map"],
            vec!["ranch", "map", "--grid", "--no-labels"],
            vec!["ranch", "ui"],
            vec!["ranch", "completions", "bash"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?} — error: {:?}",
                args,
                result.err()
            );
        }
    }

    #[test]
    fn read_only_commands_work_without_operator() {
        let cli = Cli::parse_from(["ranch", "blocks"]);
        assert!(cli.operator_flag().is_none());

        let cli = Cli::parse_from(["ranch", "show", "rde-block-1"]);
        assert!(cli.operator_flag().is_none());
    }
}
