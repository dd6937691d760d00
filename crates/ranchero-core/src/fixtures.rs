//! Bundled fixture data and its loader.
//!
//! The dashboard ships with one ranch's data baked into the binary. The
//! loader parses the JSON once at startup, re-derives each block's center
//! and bounding box from its polygon, and hands an owned [`RanchStore`] to
//! the page layer. Fixture geometry that disagrees with its polygon is a
//! data bug: it is logged and repaired, never trusted.

use crate::error::CoreError;
use crate::model::{Block, Ranch, Ticket};
use crate::store::RanchStore;
use tracing::warn;

pub const RANCH_JSON: &str = include_str!("../data/ranch.json");
pub const BLOCKS_JSON: &str = include_str!("../data/blocks.json");
pub const TICKETS_JSON: &str = include_str!("../data/tickets.json");

/// Load the bundled Rancho Don Enrique fixtures.
pub fn load_default() -> Result<RanchStore, CoreError> {
    load(RANCH_JSON, BLOCKS_JSON, TICKETS_JSON)
}

/// Parse fixture JSON into a store, reconciling block geometry.
pub fn load(ranch_json: &str, blocks_json: &str, tickets_json: &str) -> Result<RanchStore, CoreError> {
    let ranch: Ranch = serde_json::from_str(ranch_json)?;
    let mut blocks: Vec<Block> = serde_json::from_str(blocks_json)?;
    let tickets: Vec<Ticket> = serde_json::from_str(tickets_json)?;

    for block in &mut blocks {
        if !block.has_valid_polygon() {
            warn!(
                block_id = %block.id,
                points = block.coordinates.points.len(),
                "block polygon has fewer than 3 points; it will render degenerate"
            );
        }
        if !block.reconcile_geometry() {
            warn!(
                block_id = %block.id,
                "fixture center/bounding box disagree with polygon; derived values win"
            );
        }
    }

    Ok(RanchStore::new(ranch, blocks, tickets))
}
