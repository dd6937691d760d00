//! Command handlers for the `ranch` binary, one module per subcommand.

pub mod blocks;
pub mod completions;
pub mod create;
pub mod map;
pub mod overview;
pub mod show;
pub mod tickets;
