//! Status-to-style lookup shared by every presentation surface.
//!
//! The map renderer, the block cards, and the terminal views all consult
//! this one table instead of re-deriving colors per call site.

use crate::model::{BlockStatus, TicketPriority, TicketStatus};

/// An sRGB color. Carries its own hex rendering for SVG output; terminal
/// frontends read the channels directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` form for SVG attributes.
    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

// Ranch greens.
pub const FILL_ACTIVE: Rgb = Rgb(0xbc, 0xe5, 0xbc);
pub const FILL_SELECTED: Rgb = Rgb(0x57, 0xb7, 0x57);
pub const FILL_HOVERED: Rgb = Rgb(0x8d, 0xd2, 0x8d);
pub const STROKE_IDLE: Rgb = Rgb(0x35, 0x92, 0x35);
pub const STROKE_SELECTED: Rgb = Rgb(0x35, 0x92, 0x35);
pub const STROKE_HOVERED: Rgb = Rgb(0x57, 0xb7, 0x57);

// Non-active block statuses.
pub const FILL_MAINTENANCE: Rgb = Rgb(0xf5, 0x9e, 0x0b);
pub const FILL_RESTING: Rgb = Rgb(0xd1, 0xd5, 0xdb);
pub const FILL_REPLANTING: Rgb = Rgb(0xfb, 0xbf, 0x24);

// Status indicator dot.
pub const DOT_MAINTENANCE: Rgb = Rgb(0xf5, 0x9e, 0x0b);
pub const DOT_INACTIVE: Rgb = Rgb(0x6b, 0x72, 0x80);

// Map chrome.
pub const MAP_BACKGROUND: Rgb = Rgb(0xf9, 0xfa, 0xfb);
pub const MAP_BORDER: Rgb = Rgb(0xe5, 0xe7, 0xeb);
pub const LABEL_PRIMARY: Rgb = Rgb(0x37, 0x41, 0x51);
pub const LABEL_SECONDARY: Rgb = Rgb(0x6b, 0x72, 0x80);

/// Stroke widths by interaction state: selected > hovered > idle.
pub const STROKE_WIDTH_SELECTED: f64 = 3.0;
pub const STROKE_WIDTH_HOVERED: f64 = 2.0;
pub const STROKE_WIDTH_IDLE: f64 = 1.0;

/// Vertical offset between the name label and the area label, in map units.
pub const AREA_LABEL_OFFSET: f64 = 15.0;
/// Status dot offset from the block center (towards the upper-left).
pub const DOT_OFFSET: f64 = 15.0;
pub const DOT_RADIUS: f64 = 4.0;

/// Fill for a block. Priority order, first match wins: selected, hovered,
/// then status. Unknown statuses fall back to the active fill.
#[must_use]
pub const fn block_fill(status: BlockStatus, selected: bool, hovered: bool) -> Rgb {
    if selected {
        return FILL_SELECTED;
    }
    if hovered {
        return FILL_HOVERED;
    }
    match status {
        BlockStatus::Active => FILL_ACTIVE,
        BlockStatus::Maintenance => FILL_MAINTENANCE,
        BlockStatus::Resting => FILL_RESTING,
        BlockStatus::Replanting => FILL_REPLANTING,
    }
}

#[must_use]
pub const fn block_stroke(selected: bool, hovered: bool) -> Rgb {
    if selected {
        STROKE_SELECTED
    } else if hovered {
        STROKE_HOVERED
    } else {
        STROKE_IDLE
    }
}

#[must_use]
pub const fn stroke_width(selected: bool, hovered: bool) -> f64 {
    if selected {
        STROKE_WIDTH_SELECTED
    } else if hovered {
        STROKE_WIDTH_HOVERED
    } else {
        STROKE_WIDTH_IDLE
    }
}

/// Indicator dot color for a block, or `None` when the block is active
/// (active blocks draw no dot). Maintenance gets its own color; every other
/// non-active status shares the muted fallback.
#[must_use]
pub const fn status_dot(status: BlockStatus) -> Option<Rgb> {
    match status {
        BlockStatus::Active => None,
        BlockStatus::Maintenance => Some(DOT_MAINTENANCE),
        BlockStatus::Resting | BlockStatus::Replanting => Some(DOT_INACTIVE),
    }
}

/// Badge color for a ticket status.
#[must_use]
pub const fn ticket_status_color(status: TicketStatus) -> Rgb {
    match status {
        TicketStatus::Open => Rgb(0xca, 0x8a, 0x04),
        TicketStatus::InProgress => Rgb(0x25, 0x63, 0xeb),
        TicketStatus::PendingReview => Rgb(0x93, 0x33, 0xea),
        TicketStatus::Completed => Rgb(0x16, 0xa3, 0x4a),
        TicketStatus::Cancelled => Rgb(0xdc, 0x26, 0x26),
        TicketStatus::OnHold => Rgb(0x6b, 0x72, 0x80),
    }
}

/// Badge color for a ticket priority.
#[must_use]
pub const fn ticket_priority_color(priority: TicketPriority) -> Rgb {
    match priority {
        TicketPriority::Urgent => Rgb(0xdc, 0x26, 0x26),
        TicketPriority::High => Rgb(0xea, 0x58, 0x0c),
        TicketPriority::Medium => Rgb(0xca, 0x8a, 0x04),
        TicketPriority::Low => Rgb(0x6b, 0x72, 0x80),
    }
}

/// Badge color for a block status (cards and list rows, not map fills).
#[must_use]
pub const fn block_status_color(status: BlockStatus) -> Rgb {
    match status {
        BlockStatus::Active => Rgb(0x16, 0xa3, 0x4a),
        BlockStatus::Maintenance => Rgb(0xca, 0x8a, 0x04),
        BlockStatus::Resting => Rgb(0x6b, 0x72, 0x80),
        BlockStatus::Replanting => Rgb(0x25, 0x63, 0xeb),
    }
}
