//! Ticket creation dialog.
//!
//! Pressing `c` in any dashboard view opens this overlay. Field-by-field
//! entry with Tab/Shift-Tab, enum fields cycle with Left/Right, Enter
//! validates and submits, Esc cancels. Validation failures render inline
//! next to the offending field and block submission; nothing is saved
//! until every check passes.

use crossterm::event::{KeyCode, KeyEvent};
use ranchero_core::model::{TicketPriority, TicketType};
use ranchero_core::store::{TicketDraft, TicketField, ValidationErrors};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// The action the dialog wants the caller to take.
pub enum DialogAction {
    /// Draft validated; hand it to the ticket sink.
    Submit(TicketDraft),
    /// The user cancelled; close the dialog.
    Cancel,
}

/// Focusable form fields, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Field {
    #[default]
    Title,
    Description,
    Type,
    Priority,
    Block,
    Hours,
    Tags,
}

impl Field {
    const ORDER: [Self; 7] = [
        Self::Title,
        Self::Description,
        Self::Type,
        Self::Priority,
        Self::Block,
        Self::Hours,
        Self::Tags,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Type => "Type",
            Self::Priority => "Priority",
            Self::Block => "Block",
            Self::Hours => "Est. hours",
            Self::Tags => "Tags",
        }
    }

    fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Overlay dialog state.
pub struct CreateDialog {
    draft: TicketDraft,
    focus: Field,
    errors: ValidationErrors,
    /// `(id, name)` choices for the block selector; index `None` means
    /// ranch-wide.
    block_choices: Vec<(String, String)>,
    block_idx: Option<usize>,
}

impl CreateDialog {
    /// Open a fresh dialog. `preselect_block` pins the block choice when
    /// the dialog is opened from a block detail view.
    #[must_use]
    pub fn new(block_choices: Vec<(String, String)>, preselect_block: Option<&str>) -> Self {
        let block_idx = preselect_block
            .and_then(|id| block_choices.iter().position(|(b, _)| b == id));
        let mut dialog = Self {
            draft: TicketDraft::default(),
            focus: Field::Title,
            errors: ValidationErrors::default(),
            block_choices,
            block_idx,
        };
        dialog.sync_block();
        dialog
    }

    fn sync_block(&mut self) {
        self.draft.block_id = self
            .block_idx
            .and_then(|i| self.block_choices.get(i))
            .map(|(id, _)| id.clone());
    }

    /// Feed a key event. `Some` means the dialog is finished and the
    /// caller should close the overlay.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<DialogAction> {
        match key.code {
            KeyCode::Esc => Some(DialogAction::Cancel),

            KeyCode::Enter => {
                match self.draft.validate() {
                    Ok(()) => Some(DialogAction::Submit(self.draft.clone())),
                    Err(errors) => {
                        // keep the dialog open; errors render inline
                        self.errors = errors;
                        None
                    }
                }
            }

            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                None
            }

            KeyCode::Left => {
                self.cycle(false);
                None
            }
            KeyCode::Right => {
                self.cycle(true);
                None
            }

            KeyCode::Backspace => {
                if let Some(buf) = self.focused_text_mut() {
                    buf.pop();
                }
                None
            }
            KeyCode::Char(c) => {
                if let Some(buf) = self.focused_text_mut() {
                    buf.push(c);
                }
                None
            }

            _ => None,
        }
    }

    /// The text buffer behind the focused field, when it is a text field.
    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Title => Some(&mut self.draft.title),
            Field::Description => Some(&mut self.draft.description),
            Field::Hours => Some(&mut self.draft.estimated_hours),
            Field::Tags => Some(&mut self.draft.tags),
            Field::Type | Field::Priority | Field::Block => None,
        }
    }

    /// Cycle the focused enum field forward or backward.
    fn cycle(&mut self, forward: bool) {
        match self.focus {
            Field::Type => {
                self.draft.ticket_type = cycle_slice(&TicketType::ALL, self.draft.ticket_type, forward);
            }
            Field::Priority => {
                self.draft.priority =
                    cycle_slice(&TicketPriority::ALL, self.draft.priority, forward);
            }
            Field::Block => {
                let n = self.block_choices.len();
                if n == 0 {
                    return;
                }
                // None -> 0 -> 1 ... -> n-1 -> None
                self.block_idx = match (self.block_idx, forward) {
                    (None, true) => Some(0),
                    (Some(i), true) if i + 1 < n => Some(i + 1),
                    (Some(_), true) => None,
                    (None, false) => Some(n - 1),
                    (Some(0), false) => None,
                    (Some(i), false) => Some(i - 1),
                };
                self.sync_block();
            }
            _ => {}
        }
    }

    fn field_value(&self, field: Field) -> String {
        match field {
            Field::Title => self.draft.title.clone(),
            Field::Description => self.draft.description.clone(),
            Field::Type => self.draft.ticket_type.to_string(),
            Field::Priority => self.draft.priority.to_string(),
            Field::Block => self
                .block_idx
                .and_then(|i| self.block_choices.get(i))
                .map_or_else(|| "(ranch-wide)".to_string(), |(_, name)| name.clone()),
            Field::Hours => self.draft.estimated_hours.clone(),
            Field::Tags => self.draft.tags.clone(),
        }
    }

    fn field_error(&self, field: Field) -> Option<&'static str> {
        match field {
            Field::Title => self.errors.for_field(TicketField::Title),
            Field::Description => self.errors.for_field(TicketField::Description),
            Field::Hours => self.errors.for_field(TicketField::EstimatedHours),
            _ => None,
        }
    }

    /// Render the dialog as a centered overlay on top of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let dialog_w: u16 = 64.min(area.width.saturating_sub(4));
        let dialog_h: u16 = (Field::ORDER.len() as u16 + 4).min(area.height.saturating_sub(2));

        let x = area.x + area.width.saturating_sub(dialog_w) / 2;
        let y = area.y + area.height.saturating_sub(dialog_h) / 2;
        let dialog_area = Rect {
            x,
            y,
            width: dialog_w,
            height: dialog_h,
        };

        frame.render_widget(Clear, dialog_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" New Ticket ")
            .title_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().bg(Color::Black));
        frame.render_widget(block, dialog_area);

        let inner = Rect {
            x: dialog_area.x + 1,
            y: dialog_area.y + 1,
            width: dialog_area.width.saturating_sub(2),
            height: dialog_area.height.saturating_sub(2),
        };

        let constraints: Vec<Constraint> = Field::ORDER
            .iter()
            .map(|_| Constraint::Length(1))
            .chain([Constraint::Min(0), Constraint::Length(1)])
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, field) in Field::ORDER.into_iter().enumerate() {
            let focused = field == self.focus;
            let marker = if focused { "► " } else { "  " };
            let mut spans = vec![
                Span::styled(
                    marker,
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("{:<12}", field.label()),
                    if focused {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Gray)
                    },
                ),
                Span::raw(self.field_value(field)),
            ];
            if focused && is_text_field(field) {
                spans.push(Span::styled("_", Style::default().fg(Color::White)));
            }
            if let Some(message) = self.field_error(field) {
                spans.push(Span::styled(
                    format!("  {message}"),
                    Style::default().fg(Color::Red),
                ));
            }
            frame.render_widget(Paragraph::new(Line::from(spans)), rows[i]);
        }

        let hints = Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" save  "),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" next field  "),
            Span::styled("←/→", Style::default().fg(Color::Yellow)),
            Span::raw(" change  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel"),
        ]);
        frame.render_widget(Paragraph::new(hints), rows[Field::ORDER.len() + 1]);
    }

    /// The draft under edit (for tests).
    #[cfg(test)]
    pub fn draft(&self) -> &TicketDraft {
        &self.draft
    }
}

const fn is_text_field(field: Field) -> bool {
    matches!(
        field,
        Field::Title | Field::Description | Field::Hours | Field::Tags
    )
}

fn cycle_slice<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let i = all.iter().position(|v| *v == current).unwrap_or(0);
    let n = all.len();
    let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
    all[next]
}
