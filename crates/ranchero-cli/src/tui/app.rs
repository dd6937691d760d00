//! Dashboard application state: views, navigation, and event dispatch.
//!
//! One `DashboardApp` owns the store and all view state for a TUI session.
//! Views: overview, block list, ticket list, map, and per-block detail.
//! Navigation to an unknown block id redirects to the block list — the
//! same recovery the route layer performs, with no user-visible error.

use crate::format;
use crate::tui::create_dialog::{CreateDialog, DialogAction};
use crate::tui::map_view::{self, tui_color};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ranchero_core::config::ProjectConfig;
use ranchero_core::map::{ClickOutcome, MapViewState, hit_test};
use ranchero_core::model::{Block, Ticket};
use ranchero_core::store::{
    BlockFilter, BlockSort, RanchStore, TicketFilter, TicketSort, sort_blocks, sort_tickets,
    ticket_status_counts,
};
use ranchero_core::theme;
use ranchero_core::write::{DelayedSink, DirectSink, TicketSink};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block as UiBlock, Borders, Cell, Paragraph, Row, Table, TableState},
};
use std::time::{Duration, Instant};
use tracing::debug;

/// How long transient status messages stay visible.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// The dashboard's screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Overview,
    Blocks,
    Tickets,
    Map,
    BlockDetail(String),
}

pub struct DashboardApp {
    store: RanchStore,
    operator: String,
    sink: DelayedSink<DirectSink>,
    view: View,
    /// Ephemeral per-session map interaction state.
    map_state: MapViewState,
    map_padding: f64,
    /// Canvas interior from the last render, for mouse mapping.
    map_area: Rect,
    blocks_table: TableState,
    block_filter: BlockFilter,
    block_sort: BlockSort,
    tickets_table: TableState,
    ticket_filter: TicketFilter,
    ticket_sort: TicketSort,
    create_dialog: Option<CreateDialog>,
    status_msg: Option<(String, Instant)>,
    should_quit: bool,
}

impl DashboardApp {
    #[must_use]
    pub fn new(store: RanchStore, config: &ProjectConfig, operator: String) -> Self {
        let map_state = MapViewState {
            show_labels: config.map.show_labels,
            show_grid: config.map.show_grid,
            ..MapViewState::default()
        };

        Self {
            store,
            operator,
            sink: DelayedSink::new(
                DirectSink,
                Duration::from_millis(config.write.simulated_latency_ms),
            ),
            view: View::Overview,
            map_state,
            map_padding: config.map.padding,
            map_area: Rect::default(),
            blocks_table: TableState::default(),
            block_filter: BlockFilter::default(),
            block_sort: BlockSort::default(),
            tickets_table: TableState::default(),
            ticket_filter: TicketFilter::default(),
            ticket_sort: TicketSort::default(),
            create_dialog: None,
            status_msg: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Switch screens. Detail requests for unknown ids redirect to the
    /// block list.
    pub fn navigate(&mut self, view: View) {
        if let View::BlockDetail(id) = &view {
            if self.store.block(id).is_none() {
                debug!(block_id = %id, "unknown block; redirecting to the block list");
                self.view = View::Blocks;
                return;
            }
        }
        self.view = view;
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_msg = Some((msg, Instant::now()));
    }

    /// Drop stale status messages. Called on every tick.
    pub fn tick(&mut self) {
        if let Some((_, at)) = &self.status_msg {
            if at.elapsed() > STATUS_TTL {
                self.status_msg = None;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Input handling
    // -----------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Modal dialog swallows everything first.
        if let Some(dialog) = &mut self.create_dialog {
            match dialog.handle_key(key) {
                Some(DialogAction::Submit(draft)) => {
                    self.create_dialog = None;
                    match self.sink.create_ticket(&mut self.store, &draft, &self.operator) {
                        Ok(ticket) => self.set_status(format!("Created {}", ticket.id)),
                        // failure already logged by the sink; the busy
                        // indicator just clears
                        Err(_) => self.status_msg = None,
                    }
                }
                Some(DialogAction::Cancel) => self.create_dialog = None,
                None => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.navigate(View::Overview),
            KeyCode::Char('2') => self.navigate(View::Blocks),
            KeyCode::Char('3') => self.navigate(View::Tickets),
            KeyCode::Char('4') | KeyCode::Char('m') => self.navigate(View::Map),
            KeyCode::Char('c') => self.open_create_dialog(),
            KeyCode::Esc | KeyCode::Backspace => {
                if matches!(self.view, View::BlockDetail(_)) {
                    self.navigate(View::Blocks);
                }
            }
            _ => match self.view.clone() {
                View::Blocks => self.handle_blocks_key(key),
                View::Tickets => self.handle_tickets_key(key),
                View::Map => self.handle_map_key(key),
                View::Overview | View::BlockDetail(_) => {}
            },
        }
    }

    fn open_create_dialog(&mut self) {
        let choices = self
            .store
            .blocks()
            .iter()
            .map(|b| (b.id.clone(), b.name.clone()))
            .collect();
        let preselect = match &self.view {
            View::BlockDetail(id) => Some(id.as_str()),
            View::Map => self.map_state.selected_block_id.as_deref(),
            _ => None,
        };
        self.create_dialog = Some(CreateDialog::new(choices, preselect));
    }

    fn handle_blocks_key(&mut self, key: KeyEvent) {
        let count = self.visible_blocks().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => select_next(&mut self.blocks_table, count),
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut self.blocks_table, count),
            KeyCode::Enter => {
                if let Some(block) = self
                    .blocks_table
                    .selected()
                    .and_then(|i| self.visible_blocks().get(i).map(|b| b.id.clone()))
                {
                    self.navigate(View::BlockDetail(block));
                }
            }
            KeyCode::Char('s') => {
                self.block_sort = self.block_sort.next();
                self.set_status(format!("sort: {}", self.block_sort.label()));
            }
            KeyCode::Char('f') => {
                self.block_filter.status = cycle_block_status(self.block_filter.status);
                self.blocks_table.select(None);
            }
            _ => {}
        }
    }

    fn handle_tickets_key(&mut self, key: KeyEvent) {
        let count = self.visible_tickets().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => select_next(&mut self.tickets_table, count),
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut self.tickets_table, count),
            KeyCode::Char('s') => {
                self.ticket_sort = self.ticket_sort.next();
                self.set_status(format!("sort: {}", self.ticket_sort.label()));
            }
            KeyCode::Char('f') => {
                self.ticket_filter.status = cycle_ticket_status(self.ticket_filter.status);
                self.tickets_table.select(None);
            }
            KeyCode::Enter => {
                // jump to the ticket's block, when it has one
                if let Some(block_id) = self
                    .tickets_table
                    .selected()
                    .and_then(|i| self.visible_tickets().get(i).and_then(|t| t.block_id.clone()))
                {
                    self.navigate(View::BlockDetail(block_id));
                }
            }
            _ => {}
        }
    }

    fn handle_map_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('l') => self.map_state.toggle_labels(),
            KeyCode::Char('g') => self.map_state.toggle_grid(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.map_state.zoom_in(),
            KeyCode::Char('-') => self.map_state.zoom_out(),
            // keyboard fallback for hover: Tab walks the blocks
            KeyCode::Tab => {
                let blocks = self.store.blocks();
                if blocks.is_empty() {
                    return;
                }
                let next = match &self.map_state.hovered_block_id {
                    None => 0,
                    Some(id) => blocks
                        .iter()
                        .position(|b| &b.id == id)
                        .map_or(0, |i| (i + 1) % blocks.len()),
                };
                let id = blocks[next].id.clone();
                self.map_state.hover_enter(&id);
            }
            KeyCode::Enter => {
                if let Some(id) = self.map_state.hovered_block_id.clone() {
                    self.click_block(&id);
                }
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.create_dialog.is_some() || self.view != View::Map {
            return;
        }
        let Some(viewport) = map_view::effective_viewport(
            self.store.blocks(),
            &self.map_state,
            self.map_padding,
        ) else {
            return;
        };

        match mouse.kind {
            MouseEventKind::Moved => {
                let hit = map_view::cell_to_map(self.map_area, viewport, mouse.column, mouse.row)
                    .and_then(|p| hit_test(self.store.blocks(), p))
                    .map(|b| b.id.clone());
                match hit {
                    Some(id) => self.map_state.hover_enter(&id),
                    None => self.map_state.hover_leave(),
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = map_view::cell_to_map(self.map_area, viewport, mouse.column, mouse.row)
                    .and_then(|p| hit_test(self.store.blocks(), p))
                    .map(|b| b.id.clone());
                if let Some(id) = hit {
                    self.click_block(&id);
                }
            }
            MouseEventKind::ScrollUp => self.map_state.zoom_in(),
            MouseEventKind::ScrollDown => self.map_state.zoom_out(),
            _ => {}
        }
    }

    /// Click dispatch: the dashboard wires no external selection callback,
    /// so clicks select and then navigate to the detail view.
    fn click_block(&mut self, block_id: &str) {
        match self.map_state.click(block_id, false) {
            ClickOutcome::OpenDetail(id) => self.navigate(View::BlockDetail(id)),
            ClickOutcome::Notify(_) => {}
        }
    }

    // -----------------------------------------------------------------------
    // Derived collections
    // -----------------------------------------------------------------------

    fn visible_blocks(&self) -> Vec<&Block> {
        let mut blocks = self.block_filter.apply(self.store.blocks());
        sort_blocks(&mut blocks, self.block_sort);
        blocks
    }

    fn visible_tickets(&self) -> Vec<&Ticket> {
        let mut tickets = self.ticket_filter.apply(self.store.tickets());
        sort_tickets(&mut tickets, self.ticket_sort);
        tickets
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_tabs(frame, chunks[0]);
        match self.view.clone() {
            View::Overview => self.render_overview(frame, chunks[1]),
            View::Blocks => self.render_blocks(frame, chunks[1]),
            View::Tickets => self.render_tickets(frame, chunks[1]),
            View::Map => {
                self.map_area = map_view::render(
                    frame,
                    chunks[1],
                    self.store.blocks(),
                    &self.map_state,
                    self.map_padding,
                    &self.store.ranch().name,
                );
            }
            View::BlockDetail(id) => self.render_block_detail(frame, chunks[1], &id),
        }
        self.render_footer(frame, chunks[2]);

        if let Some(dialog) = &self.create_dialog {
            dialog.render(frame, frame.area());
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let tab = |label: &str, active: bool| {
            if active {
                Span::styled(
                    format!(" {label} "),
                    Style::default()
                        .fg(Color::Black)
                        .bg(tui_color(theme::FILL_SELECTED)),
                )
            } else {
                Span::styled(format!(" {label} "), Style::default().fg(Color::Gray))
            }
        };
        let line = Line::from(vec![
            tab("1 Overview", self.view == View::Overview),
            tab("2 Blocks", self.view == View::Blocks),
            tab("3 Tickets", self.view == View::Tickets),
            tab(
                "4 Map",
                matches!(self.view, View::Map | View::BlockDetail(_)),
            ),
            Span::raw("  "),
            Span::styled(
                self.store.ranch().name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_overview(&self, frame: &mut Frame, area: Rect) {
        let stats = self.store.stats(chrono::Utc::now());
        let counts = ticket_status_counts(self.store.tickets());
        let lines = vec![
            Line::raw(""),
            stat_line("Blocks", &stats.total_blocks.to_string()),
            stat_line("Total area", &format::acres(stats.total_acres)),
            stat_line("Active tasks", &stats.active_tickets.to_string()),
            stat_line("Done this month", &stats.completed_this_month.to_string()),
            stat_line("Due in 7 days", &stats.upcoming_tasks.to_string()),
            Line::raw(""),
            stat_line(
                "Tickets",
                &format!(
                    "{} open / {} doing / {} review / {} done",
                    counts.open, counts.in_progress, counts.pending_review, counts.completed
                ),
            ),
        ];
        let widget = Paragraph::new(lines).block(
            UiBlock::default()
                .borders(Borders::ALL)
                .title(" Overview "),
        );
        frame.render_widget(widget, area);
    }

    fn render_blocks(&mut self, frame: &mut Frame, area: Rect) {
        let blocks = self.visible_blocks();
        let rows: Vec<Row<'_>> = blocks
            .iter()
            .map(|b| {
                Row::new(vec![
                    Cell::from(b.name.clone()),
                    Cell::from(b.status.to_string()).style(
                        Style::default().fg(tui_color(theme::block_status_color(b.status))),
                    ),
                    Cell::from(format::acres(b.area)),
                    Cell::from(b.crop_type.to_string()),
                    Cell::from(b.irrigation_type.to_string()),
                ])
            })
            .collect();

        let title = match self.block_filter.status {
            Some(status) => format!(" Blocks — {status} ({}) ", rows.len()),
            None => format!(" Blocks ({}) ", rows.len()),
        };
        let table = Table::new(
            rows,
            [
                Constraint::Min(18),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(10),
            ],
        )
        .header(
            Row::new(vec!["name", "status", "area", "crop", "water"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(UiBlock::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");
        frame.render_stateful_widget(table, area, &mut self.blocks_table);
    }

    fn render_tickets(&mut self, frame: &mut Frame, area: Rect) {
        let tickets = self.visible_tickets();
        let rows: Vec<Row<'_>> = tickets
            .iter()
            .map(|t| {
                Row::new(vec![
                    Cell::from(t.id.clone()),
                    Cell::from(t.status.to_string()).style(
                        Style::default().fg(tui_color(theme::ticket_status_color(t.status))),
                    ),
                    Cell::from(t.priority.to_string()).style(
                        Style::default().fg(tui_color(theme::ticket_priority_color(t.priority))),
                    ),
                    Cell::from(t.ticket_type.to_string()),
                    Cell::from(t.title.clone()),
                ])
            })
            .collect();

        let title = match self.ticket_filter.status {
            Some(status) => format!(" Tickets — {status} ({}) ", rows.len()),
            None => format!(" Tickets ({}) ", rows.len()),
        };
        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(15),
                Constraint::Length(8),
                Constraint::Length(14),
                Constraint::Min(20),
            ],
        )
        .header(
            Row::new(vec!["id", "status", "prio", "type", "title"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(UiBlock::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");
        frame.render_stateful_widget(table, area, &mut self.tickets_table);
    }

    fn render_block_detail(&self, frame: &mut Frame, area: Rect, block_id: &str) {
        // navigate() guarantees the id exists; render defensively anyway
        let Some(block) = self.store.block(block_id) else {
            frame.render_widget(Paragraph::new("Block not found"), area);
            return;
        };

        let tickets = self.store.tickets_for_block(block_id);
        let active = tickets.iter().filter(|t| t.status.is_active()).count();

        let mut lines = vec![
            Line::raw(""),
            stat_line("Status", &format::title_case(&block.status.to_string())),
            stat_line("Area", &format::acres(block.area)),
            stat_line("Crop", &block.crop_type.to_string()),
            stat_line("Soil", &block.soil_type),
            stat_line("Planted", &format::date(block.planting_date)),
            stat_line("Active tasks", &active.to_string()),
        ];
        if let Some(variety) = &block.metadata.variety {
            lines.push(stat_line("Variety", variety));
        }
        if let Some(notes) = &block.metadata.notes {
            lines.push(stat_line("Notes", notes));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "Recent tickets",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let mut recent: Vec<_> = tickets;
        recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        for ticket in recent.iter().take(5) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<14}", ticket.status.to_string()),
                    Style::default().fg(tui_color(theme::ticket_status_color(ticket.status))),
                ),
                Span::raw(ticket.title.clone()),
            ]));
        }

        let widget = Paragraph::new(lines).block(
            UiBlock::default()
                .borders(Borders::ALL)
                .title(format!(" {} — {} ", block.name, self.store.ranch().name)),
        );
        frame.render_widget(widget, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some((msg, _)) = &self.status_msg {
            Line::styled(msg.clone(), Style::default().fg(Color::Green))
        } else {
            let hints = match self.view {
                View::Map => "l labels  g grid  +/- zoom  Tab/hover  Enter/click open  c new  q quit",
                View::Blocks => "j/k move  Enter open  f filter  s sort  c new  q quit",
                View::Tickets => "j/k move  Enter block  f filter  s sort  c new  q quit",
                _ => "1-4 views  c new ticket  q quit",
            };
            Line::styled(hints, Style::default().fg(Color::DarkGray))
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn stat_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {label:<16}"),
            Style::default().fg(Color::Gray),
        ),
        Span::raw(value.to_string()),
    ])
}

fn select_next(state: &mut TableState, len: usize) {
    if len == 0 {
        return;
    }
    let i = state
        .selected()
        .map_or(0, |i| if i + 1 >= len { 0 } else { i + 1 });
    state.select(Some(i));
}

fn select_prev(state: &mut TableState, len: usize) {
    if len == 0 {
        return;
    }
    let i = state
        .selected()
        .map_or(0, |i| if i == 0 { len - 1 } else { i - 1 });
    state.select(Some(i));
}

fn cycle_block_status(
    current: Option<ranchero_core::model::BlockStatus>,
) -> Option<ranchero_core::model::BlockStatus> {
    use ranchero_core::model::BlockStatus;
    match current {
        None => Some(BlockStatus::Active),
        Some(BlockStatus::Active) => Some(BlockStatus::Maintenance),
        Some(BlockStatus::Maintenance) => Some(BlockStatus::Resting),
        Some(BlockStatus::Resting) => Some(BlockStatus::Replanting),
        Some(BlockStatus::Replanting) => None,
    }
}

fn cycle_ticket_status(
    current: Option<ranchero_core::model::TicketStatus>,
) -> Option<ranchero_core::model::TicketStatus> {
    use ranchero_core::model::TicketStatus;
    match current {
        None => Some(TicketStatus::Open),
        Some(TicketStatus::Open) => Some(TicketStatus::InProgress),
        Some(TicketStatus::InProgress) => Some(TicketStatus::PendingReview),
        Some(TicketStatus::PendingReview) => Some(TicketStatus::Completed),
        Some(TicketStatus::Completed) => Some(TicketStatus::Cancelled),
        Some(TicketStatus::Cancelled) => Some(TicketStatus::OnHold),
        Some(TicketStatus::OnHold) => None,
    }
}
