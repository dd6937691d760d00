//! In-memory store over the fixture data, plus the query surface the views
//! consume: filtering, sorting, status counts, dashboard stats, and ticket
//! creation with field-level validation.
//!
//! The store owns the collections; views receive them by reference and
//! never mutate. All mutation goes through store methods that replace or
//! extend the owned collections.

use crate::error::CoreError;
use crate::model::{
    Block, BlockStatus, Ranch, Ticket, TicketPriority, TicketStatus, TicketType,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::fmt;

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Filter criteria applied to the block list.
#[derive(Debug, Clone, Default)]
pub struct BlockFilter {
    pub status: Option<BlockStatus>,
    /// Free-text search over name, variety, and soil type.
    pub search: String,
}

impl BlockFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.search.is_empty()
    }

    /// Returns true if the block satisfies all active criteria.
    #[must_use]
    pub fn matches(&self, block: &Block) -> bool {
        if let Some(status) = self.status {
            if block.status != status {
                return false;
            }
        }
        if !self.search.is_empty() {
            let q = self.search.to_ascii_lowercase();
            let variety = block.metadata.variety.as_deref().unwrap_or_default();
            if !block.name.to_ascii_lowercase().contains(&q)
                && !variety.to_ascii_lowercase().contains(&q)
                && !block.soil_type.to_ascii_lowercase().contains(&q)
            {
                return false;
            }
        }
        true
    }

    /// Apply this filter, returning matching blocks in input order.
    #[must_use]
    pub fn apply<'a>(&self, blocks: &'a [Block]) -> Vec<&'a Block> {
        blocks.iter().filter(|b| self.matches(b)).collect()
    }
}

/// Filter criteria applied to the ticket list.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub ticket_type: Option<TicketType>,
    pub priority: Option<TicketPriority>,
    pub block_id: Option<String>,
    pub assigned_to: Option<String>,
    /// Free-text search over title, description, and tags.
    pub search: String,
}

impl TicketFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.ticket_type.is_none()
            && self.priority.is_none()
            && self.block_id.is_none()
            && self.assigned_to.is_none()
            && self.search.is_empty()
    }

    /// Returns true if the ticket satisfies all active criteria.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(status) = self.status {
            if ticket.status != status {
                return false;
            }
        }
        if let Some(ticket_type) = self.ticket_type {
            if ticket.ticket_type != ticket_type {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if ticket.priority != priority {
                return false;
            }
        }
        if let Some(ref block_id) = self.block_id {
            if ticket.block_id.as_deref() != Some(block_id.as_str()) {
                return false;
            }
        }
        if let Some(ref assignee) = self.assigned_to {
            if ticket.assigned_to.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }
        if !self.search.is_empty() {
            let q = self.search.to_ascii_lowercase();
            if !ticket.title.to_ascii_lowercase().contains(&q)
                && !ticket.description.to_ascii_lowercase().contains(&q)
                && !ticket.tags.iter().any(|t| t.to_ascii_lowercase().contains(&q))
            {
                return false;
            }
        }
        true
    }

    /// Apply this filter, returning matching tickets in input order.
    #[must_use]
    pub fn apply<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        tickets.iter().filter(|t| self.matches(t)).collect()
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sort field for the block list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockSort {
    #[default]
    Name,
    /// Largest area first.
    Area,
    /// Oldest planting first.
    Planted,
    Status,
}

impl BlockSort {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Area => "area",
            Self::Planted => "planted",
            Self::Status => "status",
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Name => Self::Area,
            Self::Area => Self::Planted,
            Self::Planted => Self::Status,
            Self::Status => Self::Name,
        }
    }
}

/// Sort blocks by the given field. Ties fall back to id for stability.
pub fn sort_blocks(blocks: &mut [&Block], sort: BlockSort) {
    blocks.sort_by(|a, b| {
        match sort {
            BlockSort::Name => a.name.cmp(&b.name),
            BlockSort::Area => b
                .area
                .partial_cmp(&a.area)
                .unwrap_or(std::cmp::Ordering::Equal),
            BlockSort::Planted => a.planting_date.cmp(&b.planting_date),
            BlockSort::Status => a.status.to_string().cmp(&b.status.to_string()),
        }
        .then_with(|| a.id.cmp(&b.id))
    });
}

/// Sort field for the ticket list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicketSort {
    /// Most recently updated first.
    #[default]
    Updated,
    /// Soonest due first; tickets without a due date sort last.
    DueDate,
    /// Urgent first.
    Priority,
    Title,
}

impl TicketSort {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::DueDate => "due",
            Self::Priority => "priority",
            Self::Title => "title",
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Updated => Self::DueDate,
            Self::DueDate => Self::Priority,
            Self::Priority => Self::Title,
            Self::Title => Self::Updated,
        }
    }
}

/// Sort tickets by the given field. Ties fall back to id for stability.
pub fn sort_tickets(tickets: &mut [&Ticket], sort: TicketSort) {
    tickets.sort_by(|a, b| {
        match sort {
            TicketSort::Updated => b.updated_at.cmp(&a.updated_at),
            TicketSort::DueDate => {
                let far_future = DateTime::<Utc>::MAX_UTC;
                a.due_date
                    .unwrap_or(far_future)
                    .cmp(&b.due_date.unwrap_or(far_future))
            }
            TicketSort::Priority => a
                .priority
                .rank()
                .cmp(&b.priority.rank())
                .then_with(|| b.updated_at.cmp(&a.updated_at)),
            TicketSort::Title => a.title.cmp(&b.title),
        }
        .then_with(|| a.id.cmp(&b.id))
    });
}

// ---------------------------------------------------------------------------
// Counts and stats
// ---------------------------------------------------------------------------

/// Per-status ticket counts for the list header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TicketStatusCounts {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub pending_review: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub on_hold: usize,
}

#[must_use]
pub fn ticket_status_counts(tickets: &[Ticket]) -> TicketStatusCounts {
    let mut counts = TicketStatusCounts {
        total: tickets.len(),
        ..TicketStatusCounts::default()
    };
    for ticket in tickets {
        match ticket.status {
            TicketStatus::Open => counts.open += 1,
            TicketStatus::InProgress => counts.in_progress += 1,
            TicketStatus::PendingReview => counts.pending_review += 1,
            TicketStatus::Completed => counts.completed += 1,
            TicketStatus::Cancelled => counts.cancelled += 1,
            TicketStatus::OnHold => counts.on_hold += 1,
        }
    }
    counts
}

/// Headline numbers for the overview page.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DashboardStats {
    pub ranch_id: String,
    pub total_blocks: usize,
    pub total_acres: f64,
    /// Open or in-progress tickets.
    pub active_tickets: usize,
    pub completed_this_month: usize,
    /// Tickets due within the next seven days.
    pub upcoming_tasks: usize,
}

#[must_use]
pub fn dashboard_stats(
    ranch_id: &str,
    blocks: &[Block],
    tickets: &[Ticket],
    now: DateTime<Utc>,
) -> DashboardStats {
    let week_out = now + Duration::days(7);
    DashboardStats {
        ranch_id: ranch_id.to_string(),
        total_blocks: blocks.len(),
        total_acres: blocks.iter().map(|b| b.area).sum(),
        active_tickets: tickets
            .iter()
            .filter(|t| matches!(t.status, TicketStatus::Open | TicketStatus::InProgress))
            .count(),
        completed_this_month: tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Completed)
            .filter(|t| {
                t.completed_date
                    .is_some_and(|d| d.year() == now.year() && d.month() == now.month())
            })
            .count(),
        upcoming_tasks: tickets
            .iter()
            .filter(|t| t.due_date.is_some_and(|d| d > now && d <= week_out))
            .count(),
    }
}

// ---------------------------------------------------------------------------
// Ticket drafts and validation
// ---------------------------------------------------------------------------

/// Form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketField {
    Title,
    Description,
    EstimatedHours,
}

impl TicketField {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::EstimatedHours => "estimated hours",
        }
    }
}

/// Field-level validation failures, surfaced inline next to each field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<(TicketField, &'static str)>);

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message for a field, if that field failed.
    #[must_use]
    pub fn for_field(&self, field: TicketField) -> Option<&'static str> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, m)| *m)
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (TicketField, &'static str)> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {message}", field.label())?;
            first = false;
        }
        Ok(())
    }
}

/// Raw form input for a new ticket. Text fields stay text until
/// validation so a bad hours entry can be reported inline rather than
/// rejected at the type level.
#[derive(Debug, Clone)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub ticket_type: TicketType,
    pub priority: TicketPriority,
    pub block_id: Option<String>,
    pub assigned_to: Option<String>,
    /// Raw text; empty means no estimate.
    pub estimated_hours: String,
    pub due_date: Option<NaiveDate>,
    /// Raw comma-separated text.
    pub tags: String,
}

impl Default for TicketDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            ticket_type: TicketType::Maintenance,
            priority: TicketPriority::Medium,
            block_id: None,
            assigned_to: None,
            estimated_hours: String::new(),
            due_date: None,
            tags: String::new(),
        }
    }
}

impl TicketDraft {
    /// Validate the draft. Every failing field is reported; submission is
    /// blocked while any failure remains.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.title.trim().is_empty() {
            errors.0.push((TicketField::Title, "Title is required"));
        }
        if self.description.trim().is_empty() {
            errors
                .0
                .push((TicketField::Description, "Description is required"));
        }
        if self.parsed_hours().is_err() {
            errors
                .0
                .push((TicketField::EstimatedHours, "Must be a valid number"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Parsed estimate: `Ok(None)` when blank, `Err` on non-numeric or
    /// negative input.
    fn parsed_hours(&self) -> Result<Option<f64>, ()> {
        let raw = self.estimated_hours.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(h) if h >= 0.0 && h.is_finite() => Ok(Some(h)),
            _ => Err(()),
        }
    }

    /// Tags split on commas, trimmed, empties dropped.
    #[must_use]
    pub fn parsed_tags(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// The store
// ---------------------------------------------------------------------------

/// Owns the ranch, its blocks, and its tickets for the life of a session.
#[derive(Debug, Clone)]
pub struct RanchStore {
    ranch: Ranch,
    blocks: Vec<Block>,
    tickets: Vec<Ticket>,
}

impl RanchStore {
    #[must_use]
    pub fn new(ranch: Ranch, blocks: Vec<Block>, tickets: Vec<Ticket>) -> Self {
        Self {
            ranch,
            blocks,
            tickets,
        }
    }

    #[must_use]
    pub fn ranch(&self) -> &Ranch {
        &self.ranch
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Look up a block by id.
    #[must_use]
    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    /// Tickets attached to one block, in store order.
    #[must_use]
    pub fn tickets_for_block(&self, block_id: &str) -> Vec<&Ticket> {
        self.tickets
            .iter()
            .filter(|t| t.block_id.as_deref() == Some(block_id))
            .collect()
    }

    /// Headline stats for the overview, scoped to the active ranch.
    #[must_use]
    pub fn stats(&self, now: DateTime<Utc>) -> DashboardStats {
        dashboard_stats(&self.ranch.id, &self.blocks, &self.tickets, now)
    }

    /// Create a ticket from a validated draft and prepend it.
    ///
    /// The new ticket starts `open`, stamped with the active ranch id, the
    /// creator, and `now` for both audit timestamps. Returns the created
    /// ticket by value (the store keeps its own copy at the front of the
    /// collection).
    pub fn create_ticket(
        &mut self,
        draft: &TicketDraft,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<Ticket, CoreError> {
        draft.validate().map_err(CoreError::Validation)?;
        // validate() vouched for the hours field
        let estimated_hours = draft.parsed_hours().unwrap_or(None);

        let ticket = Ticket {
            id: self.next_ticket_id(),
            ranch_id: self.ranch.id.clone(),
            block_id: draft.block_id.clone(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            ticket_type: draft.ticket_type,
            priority: draft.priority,
            status: TicketStatus::Open,
            assigned_to: draft.assigned_to.clone(),
            created_by: created_by.to_string(),
            estimated_hours,
            actual_hours: None,
            due_date: draft
                .due_date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc()),
            completed_date: None,
            tags: draft.parsed_tags(),
            created_at: now,
            updated_at: now,
        };

        self.tickets.insert(0, ticket.clone());
        Ok(ticket)
    }

    /// Move a ticket through its lifecycle, enforcing the transition rules.
    pub fn transition_ticket(
        &mut self,
        ticket_id: &str,
        target: TicketStatus,
        now: DateTime<Utc>,
    ) -> Result<&Ticket, CoreError> {
        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket_id)
            .ok_or_else(|| CoreError::TicketNotFound(ticket_id.to_string()))?;

        ticket.status.can_transition_to(target)?;
        ticket.status = target;
        ticket.updated_at = now;
        if target == TicketStatus::Completed {
            ticket.completed_date = Some(now);
        }
        Ok(ticket)
    }

    /// Next free `ticket-NNN` id, one past the highest numeric suffix in
    /// the collection.
    fn next_ticket_id(&self) -> String {
        let max = self
            .tickets
            .iter()
            .filter_map(|t| t.id.strip_prefix("ticket-"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("ticket-{:03}", max + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BlockFilter, BlockSort, RanchStore, TicketDraft, TicketField, TicketFilter, TicketSort,
        sort_blocks, sort_tickets, ticket_status_counts,
    };
    use crate::model::block::sample_block;
    use crate::model::{
        BlockStatus, Ranch, Ticket, TicketPriority, TicketStatus, TicketType,
    };
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn sample_ranch() -> Ranch {
        Ranch {
            id: "ranch-don-enrique".to_string(),
            name: "Rancho Don Enrique".to_string(),
            slug: "rancho-don-enrique".to_string(),
            total_area: 87.4,
            established_date: NaiveDate::from_ymd_opt(1998, 9, 12).expect("date"),
            description: None,
            is_active: true,
        }
    }

    fn sample_ticket(id: &str, status: TicketStatus, priority: TicketPriority) -> Ticket {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("ts");
        Ticket {
            id: id.to_string(),
            ranch_id: "ranch-don-enrique".to_string(),
            block_id: Some("b1".to_string()),
            title: format!("Ticket {id}"),
            description: "work to do".to_string(),
            ticket_type: TicketType::Maintenance,
            priority,
            status,
            assigned_to: None,
            created_by: "manager-001".to_string(),
            estimated_hours: None,
            actual_hours: None,
            due_date: None,
            completed_date: None,
            tags: vec![],
            created_at: ts,
            updated_at: ts,
        }
    }

    fn sample_store() -> RanchStore {
        RanchStore::new(
            sample_ranch(),
            vec![
                sample_block("b1", BlockStatus::Active),
                sample_block("b2", BlockStatus::Maintenance),
            ],
            vec![
                sample_ticket("ticket-001", TicketStatus::Open, TicketPriority::High),
                sample_ticket("ticket-002", TicketStatus::Completed, TicketPriority::Low),
            ],
        )
    }

    #[test]
    fn block_filter_by_status_and_search() {
        let blocks = vec![
            sample_block("b1", BlockStatus::Active),
            sample_block("b2", BlockStatus::Resting),
        ];

        let filter = BlockFilter {
            status: Some(BlockStatus::Resting),
            ..BlockFilter::default()
        };
        let hits = filter.apply(&blocks);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b2");

        let filter = BlockFilter {
            search: "block b1".to_string(),
            ..BlockFilter::default()
        };
        assert_eq!(filter.apply(&blocks).len(), 1);

        let filter = BlockFilter {
            search: "loam".to_string(),
            ..BlockFilter::default()
        };
        assert_eq!(filter.apply(&blocks).len(), 2, "soil type matches too");
    }

    #[test]
    fn ticket_filter_criteria_compose() {
        let mut t1 = sample_ticket("ticket-001", TicketStatus::Open, TicketPriority::High);
        t1.tags = vec!["water".to_string()];
        let t2 = sample_ticket("ticket-002", TicketStatus::Open, TicketPriority::Low);
        let tickets = vec![t1, t2];

        let filter = TicketFilter {
            status: Some(TicketStatus::Open),
            priority: Some(TicketPriority::High),
            search: "water".to_string(),
            ..TicketFilter::default()
        };
        let hits = filter.apply(&tickets);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "ticket-001");

        let filter = TicketFilter {
            block_id: Some("b9".to_string()),
            ..TicketFilter::default()
        };
        assert!(filter.apply(&tickets).is_empty());
    }

    #[test]
    fn block_sorts() {
        let mut big = sample_block("b1", BlockStatus::Active);
        big.area = 40.0;
        big.name = "Zanja".to_string();
        let small = sample_block("b2", BlockStatus::Active);
        let blocks = vec![big, small];

        let mut by_name: Vec<_> = blocks.iter().collect();
        sort_blocks(&mut by_name, BlockSort::Name);
        assert_eq!(by_name[0].id, "b2");

        let mut by_area: Vec<_> = blocks.iter().collect();
        sort_blocks(&mut by_area, BlockSort::Area);
        assert_eq!(by_area[0].id, "b1", "largest area first");
    }

    #[test]
    fn ticket_sort_due_date_puts_missing_last() {
        let mut due_soon = sample_ticket("ticket-001", TicketStatus::Open, TicketPriority::Low);
        due_soon.due_date = Some(Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).single().expect("ts"));
        let mut due_later = sample_ticket("ticket-002", TicketStatus::Open, TicketPriority::Low);
        due_later.due_date = Some(Utc.with_ymd_and_hms(2024, 7, 3, 0, 0, 0).single().expect("ts"));
        let no_due = sample_ticket("ticket-003", TicketStatus::Open, TicketPriority::Low);
        let tickets = vec![no_due, due_later, due_soon];

        let mut sorted: Vec<_> = tickets.iter().collect();
        sort_tickets(&mut sorted, TicketSort::DueDate);
        let ids: Vec<_> = sorted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["ticket-001", "ticket-002", "ticket-003"]);
    }

    #[test]
    fn ticket_sort_priority_urgent_first() {
        let tickets = vec![
            sample_ticket("ticket-001", TicketStatus::Open, TicketPriority::Low),
            sample_ticket("ticket-002", TicketStatus::Open, TicketPriority::Urgent),
            sample_ticket("ticket-003", TicketStatus::Open, TicketPriority::Medium),
        ];
        let mut sorted: Vec<_> = tickets.iter().collect();
        sort_tickets(&mut sorted, TicketSort::Priority);
        let ids: Vec<_> = sorted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["ticket-002", "ticket-003", "ticket-001"]);
    }

    #[test]
    fn status_counts_cover_every_state() {
        let tickets = vec![
            sample_ticket("ticket-001", TicketStatus::Open, TicketPriority::Low),
            sample_ticket("ticket-002", TicketStatus::Open, TicketPriority::Low),
            sample_ticket("ticket-003", TicketStatus::OnHold, TicketPriority::Low),
        ];
        let counts = ticket_status_counts(&tickets);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.open, 2);
        assert_eq!(counts.on_hold, 1);
        assert_eq!(counts.completed, 0);
    }

    #[test]
    fn stats_count_active_and_upcoming() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).single().expect("ts");
        let mut store = sample_store();
        let mut due = sample_ticket("ticket-010", TicketStatus::Open, TicketPriority::Low);
        due.due_date = Some(now + Duration::days(3));
        let mut done = sample_ticket("ticket-011", TicketStatus::Completed, TicketPriority::Low);
        done.completed_date = Some(now - Duration::days(2));
        store.tickets.extend([due, done]);

        let stats = store.stats(now);
        assert_eq!(stats.total_blocks, 2);
        assert!((stats.total_acres - 25.0).abs() < 1e-9);
        assert_eq!(stats.active_tickets, 2);
        assert_eq!(stats.completed_this_month, 1);
        assert_eq!(stats.upcoming_tasks, 1);
    }

    #[test]
    fn draft_with_empty_title_fails_and_collection_is_unchanged() {
        let mut store = sample_store();
        let before = store.tickets().len();

        let draft = TicketDraft {
            description: "something".to_string(),
            ..TicketDraft::default()
        };
        let err = store
            .create_ticket(&draft, "manager-001", Utc::now())
            .expect_err("empty title must fail");
        assert!(matches!(err, crate::error::CoreError::Validation(_)));
        assert_eq!(store.tickets().len(), before);
    }

    #[test]
    fn draft_validation_reports_each_field() {
        let draft = TicketDraft {
            estimated_hours: "soon".to_string(),
            ..TicketDraft::default()
        };
        let errors = draft.validate().expect_err("three failures");
        assert!(errors.for_field(TicketField::Title).is_some());
        assert!(errors.for_field(TicketField::Description).is_some());
        assert_eq!(
            errors.for_field(TicketField::EstimatedHours),
            Some("Must be a valid number")
        );
    }

    #[test]
    fn negative_hours_are_rejected() {
        let draft = TicketDraft {
            title: "t".to_string(),
            description: "d".to_string(),
            estimated_hours: "-2".to_string(),
            ..TicketDraft::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn valid_draft_prepends_an_open_ticket() {
        let mut store = sample_store();
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).single().expect("ts");

        let draft = TicketDraft {
            title: "Check drip line".to_string(),
            description: "Leak near valve 3".to_string(),
            ticket_type: TicketType::Irrigation,
            block_id: Some("b1".to_string()),
            estimated_hours: "2.5".to_string(),
            tags: "water, equipment".to_string(),
            ..TicketDraft::default()
        };
        let created = store
            .create_ticket(&draft, "manager-001", now)
            .expect("valid draft");

        assert_eq!(created.status, TicketStatus::Open);
        assert_eq!(created.id, "ticket-003");
        assert_eq!(created.ranch_id, "ranch-don-enrique");
        assert_eq!(created.estimated_hours, Some(2.5));
        assert_eq!(created.tags, ["water", "equipment"]);
        assert_eq!(store.tickets()[0].id, created.id, "prepended");
        assert_eq!(store.tickets().len(), 3);
    }

    #[test]
    fn transition_follows_lifecycle_rules() {
        let mut store = sample_store();
        let now = Utc::now();

        let moved = store
            .transition_ticket("ticket-001", TicketStatus::InProgress, now)
            .expect("open -> in_progress");
        assert_eq!(moved.status, TicketStatus::InProgress);

        assert!(
            store
                .transition_ticket("ticket-001", TicketStatus::Cancelled, now)
                .is_err(),
            "in_progress -> cancelled is not allowed"
        );

        let done = store
            .transition_ticket("ticket-001", TicketStatus::Completed, now)
            .expect("in_progress -> completed");
        assert_eq!(done.completed_date, Some(now));
    }

    #[test]
    fn transition_rejects_unknown_ticket() {
        let mut store = sample_store();
        assert!(
            store
                .transition_ticket("ticket-999", TicketStatus::InProgress, Utc::now())
                .is_err()
        );
    }

    #[test]
    fn block_lookup() {
        let store = sample_store();
        assert!(store.block("b1").is_some());
        assert!(store.block("nonexistent").is_none());
        assert_eq!(store.tickets_for_block("b1").len(), 2);
    }
}
