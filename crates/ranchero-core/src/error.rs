//! Error taxonomy for the dashboard core.
//!
//! Three recoverable families, per the UI contract: not-found degrades to a
//! list view, validation failures surface inline next to the offending
//! field, and simulated-write failures are logged to the operator console
//! only. Nothing here is fatal.

use crate::store::ValidationErrors;
use std::fmt;
use thiserror::Error;

/// Machine-readable error codes for stable CLI/JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    FixtureParseError,
    BlockNotFound,
    TicketNotFound,
    InvalidEnumValue,
    InvalidStatusTransition,
    ValidationFailed,
    EmptyMap,
    WriteFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::FixtureParseError => "E1002",
            Self::BlockNotFound => "E2001",
            Self::TicketNotFound => "E2002",
            Self::InvalidEnumValue => "E2003",
            Self::InvalidStatusTransition => "E2004",
            Self::ValidationFailed => "E3001",
            Self::EmptyMap => "E4001",
            Self::WriteFailed => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::FixtureParseError => "Fixture data parse error",
            Self::BlockNotFound => "Block not found",
            Self::TicketNotFound => "Ticket not found",
            Self::InvalidEnumValue => "Invalid status/type/priority value",
            Self::InvalidStatusTransition => "Invalid ticket status transition",
            Self::ValidationFailed => "Ticket validation failed",
            Self::EmptyMap => "No blocks to render",
            Self::WriteFailed => "Write operation failed",
        }
    }

    /// Optional remediation hint surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .ranchero/config.toml and retry."),
            Self::FixtureParseError => Some("Check the bundled fixture JSON against the data model."),
            Self::BlockNotFound => Some("Run `ranch blocks` to list known block ids."),
            Self::TicketNotFound => None,
            Self::InvalidEnumValue => Some("Use one of the documented status/type/priority values."),
            Self::InvalidStatusTransition => {
                Some("Follow valid transitions: open -> in_progress -> pending_review -> completed.")
            }
            Self::ValidationFailed => Some("Fill in the required fields and resubmit."),
            Self::EmptyMap => Some("Load at least one block before rendering the map."),
            Self::WriteFailed => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Typed error for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("block '{0}' not found")]
    BlockNotFound(String),

    #[error("ticket '{0}' not found")]
    TicketNotFound(String),

    #[error("ticket validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("fixture parse error: {0}")]
    FixtureParse(#[from] serde_json::Error),

    #[error("simulated write failure: {0}")]
    WriteFailed(String),

    #[error(transparent)]
    Transition(#[from] crate::model::InvalidTransition),
}

impl CoreError {
    /// The stable code for this error family.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::BlockNotFound(_) => ErrorCode::BlockNotFound,
            Self::TicketNotFound(_) => ErrorCode::TicketNotFound,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::FixtureParse(_) => ErrorCode::FixtureParseError,
            Self::WriteFailed(_) => ErrorCode::WriteFailed,
            Self::Transition(_) => ErrorCode::InvalidStatusTransition,
        }
    }
}
