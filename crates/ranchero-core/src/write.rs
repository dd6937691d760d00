//! Ticket write collaborators.
//!
//! Creation goes through the [`TicketSink`] trait so the latency profile is
//! swappable without touching view logic. [`DirectSink`] applies the write
//! immediately; [`DelayedSink`] stands in for a future network backend by
//! sleeping first. Failures are logged to the operator console only — the
//! views clear their in-progress indicator and show no retry affordance.

use crate::error::CoreError;
use crate::model::Ticket;
use crate::store::{RanchStore, TicketDraft};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, error};

/// The write-operation boundary for ticket creation.
pub trait TicketSink {
    /// Create a ticket from `draft`, attributed to `created_by`.
    fn create_ticket(
        &self,
        store: &mut RanchStore,
        draft: &TicketDraft,
        created_by: &str,
    ) -> Result<Ticket, CoreError>;
}

/// Applies writes immediately against the in-memory store.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectSink;

impl TicketSink for DirectSink {
    fn create_ticket(
        &self,
        store: &mut RanchStore,
        draft: &TicketDraft,
        created_by: &str,
    ) -> Result<Ticket, CoreError> {
        store
            .create_ticket(draft, created_by, Utc::now())
            .inspect(|t| debug!(ticket_id = %t.id, "ticket created"))
            .inspect_err(|e| error!("ticket creation failed: {e}"))
    }
}

/// Wraps another sink with a simulated write latency.
#[derive(Debug, Clone)]
pub struct DelayedSink<S> {
    inner: S,
    latency: Duration,
}

impl<S: TicketSink> DelayedSink<S> {
    #[must_use]
    pub const fn new(inner: S, latency: Duration) -> Self {
        Self { inner, latency }
    }
}

impl<S: TicketSink> TicketSink for DelayedSink<S> {
    fn create_ticket(
        &self,
        store: &mut RanchStore,
        draft: &TicketDraft,
        created_by: &str,
    ) -> Result<Ticket, CoreError> {
        if !self.latency.is_zero() {
            debug!(latency_ms = self.latency.as_millis() as u64, "simulating write latency");
            std::thread::sleep(self.latency);
        }
        self.inner.create_ticket(store, draft, created_by)
    }
}

#[cfg(test)]
mod tests {
    use super::{DelayedSink, DirectSink, TicketSink};
    use crate::model::block::sample_block;
    use crate::model::{BlockStatus, Ranch, TicketStatus};
    use crate::store::{RanchStore, TicketDraft};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn store() -> RanchStore {
        RanchStore::new(
            Ranch {
                id: "ranch-don-enrique".to_string(),
                name: "Rancho Don Enrique".to_string(),
                slug: "rancho-don-enrique".to_string(),
                total_area: 87.4,
                established_date: NaiveDate::from_ymd_opt(1998, 9, 12).expect("date"),
                description: None,
                is_active: true,
            },
            vec![sample_block("b1", BlockStatus::Active)],
            vec![],
        )
    }

    fn valid_draft() -> TicketDraft {
        TicketDraft {
            title: "Check drip line".to_string(),
            description: "Leak near valve 3".to_string(),
            block_id: Some("b1".to_string()),
            ..TicketDraft::default()
        }
    }

    #[test]
    fn direct_sink_applies_the_write() {
        let mut store = store();
        let ticket = DirectSink
            .create_ticket(&mut store, &valid_draft(), "manager-001")
            .expect("valid draft");
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(store.tickets().len(), 1);
    }

    #[test]
    fn direct_sink_surfaces_validation_failure_without_writing() {
        let mut store = store();
        let result = DirectSink.create_ticket(&mut store, &TicketDraft::default(), "manager-001");
        assert!(result.is_err());
        assert!(store.tickets().is_empty());
    }

    #[test]
    fn delayed_sink_delegates_after_the_pause() {
        let mut store = store();
        let sink = DelayedSink::new(DirectSink, Duration::from_millis(1));
        let ticket = sink
            .create_ticket(&mut store, &valid_draft(), "manager-001")
            .expect("valid draft");
        assert_eq!(store.tickets()[0].id, ticket.id);
    }
}
