//! ranchero-core: data model, geometry, and view logic for the ranch
//! dashboard.
//!
//! Data flows one way: fixtures → [`store::RanchStore`] → list/map views →
//! [`svg`] output. Interaction flows back up through [`map::MapViewState`]
//! transitions. Nothing here persists or talks to a network; the
//! [`write::TicketSink`] and [`auth::AuthProvider`] traits mark where a
//! backend would attach.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::CoreError`] in the library, `anyhow` at
//!   binary edges.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod auth;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod geometry;
pub mod map;
pub mod model;
pub mod store;
pub mod svg;
pub mod theme;
pub mod write;
