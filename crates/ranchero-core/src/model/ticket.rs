//! Work ticket model and its lifecycle rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ParseEnumError;

/// The nine categories of ranch work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    Irrigation,
    Fertilization,
    PestControl,
    Pruning,
    Harvest,
    Planting,
    Maintenance,
    Inspection,
    Other,
}

impl TicketType {
    pub const ALL: [Self; 9] = [
        Self::Irrigation,
        Self::Fertilization,
        Self::PestControl,
        Self::Pruning,
        Self::Harvest,
        Self::Planting,
        Self::Maintenance,
        Self::Inspection,
        Self::Other,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Irrigation => "irrigation",
            Self::Fertilization => "fertilization",
            Self::PestControl => "pest_control",
            Self::Pruning => "pruning",
            Self::Harvest => "harvest",
            Self::Planting => "planting",
            Self::Maintenance => "maintenance",
            Self::Inspection => "inspection",
            Self::Other => "other",
        }
    }
}

/// Ticket urgency. Ordered: low < medium < high < urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Rank for descending-priority sorts: urgent first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

/// The six lifecycle states of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    PendingReview,
    Completed,
    Cancelled,
    OnHold,
}

impl TicketStatus {
    pub const ALL: [Self; 6] = [
        Self::Open,
        Self::InProgress,
        Self::PendingReview,
        Self::Completed,
        Self::Cancelled,
        Self::OnHold,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::PendingReview => "pending_review",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::OnHold => "on_hold",
        }
    }

    /// True for states that still need work (drives the "active tickets"
    /// stat and block activity panels).
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::InProgress | Self::PendingReview)
    }

    /// Validate whether a transition from self to `target` is allowed.
    ///
    /// Valid transitions:
    /// - `open -> in_progress | on_hold | cancelled`
    /// - `in_progress -> pending_review | completed | on_hold | open`
    /// - `pending_review -> completed | in_progress`
    /// - `on_hold -> open | in_progress | cancelled`
    /// - `completed -> open` (reopen)
    /// - `cancelled -> open` (reopen)
    pub fn can_transition_to(self, target: Self) -> Result<(), InvalidTransition> {
        if self == target {
            return Err(InvalidTransition {
                from: self,
                to: target,
                reason: "no-op transition is not allowed",
            });
        }

        let allowed = matches!(
            (self, target),
            (Self::Open, Self::InProgress | Self::OnHold | Self::Cancelled)
                | (
                    Self::InProgress,
                    Self::PendingReview | Self::Completed | Self::OnHold | Self::Open
                )
                | (Self::PendingReview, Self::Completed | Self::InProgress)
                | (Self::OnHold, Self::Open | Self::InProgress | Self::Cancelled)
                | (Self::Completed | Self::Cancelled, Self::Open)
        );

        if allowed {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
                reason: "transition not allowed by lifecycle rules",
            })
        }
    }
}

/// Error returned when a status transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: TicketStatus,
    pub to: TicketStatus,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot move ticket {} -> {}: {}", self.from, self.to, self.reason)
    }
}

impl std::error::Error for InvalidTransition {}

/// A unit of work against the ranch or one of its blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub ranch_id: String,
    /// Ranch-wide tickets carry no block id.
    #[serde(default)]
    pub block_id: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub created_by: String,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "irrigation" => Ok(Self::Irrigation),
            "fertilization" => Ok(Self::Fertilization),
            "pest_control" => Ok(Self::PestControl),
            "pruning" => Ok(Self::Pruning),
            "harvest" => Ok(Self::Harvest),
            "planting" => Ok(Self::Planting),
            "maintenance" => Ok(Self::Maintenance),
            "inspection" => Ok(Self::Inspection),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError {
                expected: "ticket type",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for TicketPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseEnumError {
                expected: "ticket priority",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "pending_review" => Ok(Self::PendingReview),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "on_hold" => Ok(Self::OnHold),
            _ => Err(ParseEnumError {
                expected: "ticket status",
                got: s.to_string(),
            }),
        }
    }
}
