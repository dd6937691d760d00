//! Terminal rendering of the schematic ranch map.
//!
//! Draws block polygons on a braille canvas and translates terminal cells
//! back into map coordinates so mouse hover/click can hit-test against the
//! real geometry. Styling comes from the shared theme table; the canvas
//! only approximates fills (terminals have no polygon fill), so the stroke
//! color carries the interaction state.

use ranchero_core::geometry::{Point, Viewport};
use ranchero_core::map::{GRID_STEP, MapViewState, map_bounds};
use ranchero_core::model::Block;
use ranchero_core::theme::{self, Rgb};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{
        Block as UiBlock, Borders, Paragraph,
        canvas::{Canvas, Context, Line as CanvasLine},
    },
};

/// Theme color → terminal color.
#[must_use]
pub const fn tui_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// The visible window in map units, after padding and zoom.
///
/// Zooming in shrinks the window around the bounds center; the polygon
/// coordinates never change.
#[must_use]
pub fn effective_viewport(blocks: &[Block], state: &MapViewState, padding: f64) -> Option<Viewport> {
    let bounds = map_bounds(blocks);
    if bounds.is_degenerate() {
        return None;
    }
    let base = Viewport::around(bounds, padding);
    let zoom = state.zoom_level.max(0.01);
    let width = base.width / zoom;
    let height = base.height / zoom;
    let center_x = base.origin_x + base.width / 2.0;
    let center_y = base.origin_y + base.height / 2.0;
    Some(Viewport {
        origin_x: center_x - width / 2.0,
        origin_y: center_y - height / 2.0,
        width,
        height,
    })
}

/// Map coordinates under a terminal cell, or `None` outside `area`.
///
/// `area` must be the canvas interior (no borders). Terminal rows grow
/// downward, matching the map's y axis, so only scaling is involved.
#[must_use]
pub fn cell_to_map(area: Rect, viewport: Viewport, column: u16, row: u16) -> Option<Point> {
    if area.width == 0
        || area.height == 0
        || column < area.x
        || column >= area.x + area.width
        || row < area.y
        || row >= area.y + area.height
    {
        return None;
    }
    let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
    let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
    Some(Point::new(
        viewport.origin_x + fx * viewport.width,
        viewport.origin_y + fy * viewport.height,
    ))
}

/// Render the map into `area`, returning the canvas interior used for
/// mouse mapping.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    blocks: &[Block],
    state: &MapViewState,
    padding: f64,
    ranch_name: &str,
) -> Rect {
    let title = format!(" Map — {ranch_name} ");
    let frame_block = UiBlock::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(tui_color(theme::STROKE_IDLE)));
    let inner = frame_block.inner(area);

    let Some(viewport) = effective_viewport(blocks, state, padding) else {
        // Documented precondition says callers avoid this; degrade to a
        // visible empty state instead of a crash when they don't.
        let placeholder = Paragraph::new("No blocks to display").block(frame_block);
        frame.render_widget(placeholder, area);
        return inner;
    };

    let canvas = Canvas::default()
        .block(frame_block)
        .x_bounds([viewport.origin_x, viewport.origin_x + viewport.width])
        // canvas y grows upward; map y grows downward — negate on the way in
        .y_bounds([
            -(viewport.origin_y + viewport.height),
            -viewport.origin_y,
        ])
        .paint(|ctx| paint_scene(ctx, blocks, state, viewport));

    frame.render_widget(canvas, area);
    inner
}

fn paint_scene(ctx: &mut Context<'_>, blocks: &[Block], state: &MapViewState, viewport: Viewport) {
    if state.show_grid {
        paint_grid(ctx, viewport);
    }

    // two passes so the selected/hovered outline paints over neighbors
    for emphasized in [false, true] {
        for block in blocks {
            let selected = state.is_selected(&block.id);
            let hovered = state.is_hovered(&block.id);
            if (selected || hovered) == emphasized {
                paint_block(ctx, block, selected, hovered, state.show_labels);
            }
        }
    }
}

fn paint_grid(ctx: &mut Context<'_>, viewport: Viewport) {
    let color = tui_color(theme::MAP_BORDER);
    let mut x = (viewport.origin_x / GRID_STEP).floor() * GRID_STEP;
    while x <= viewport.origin_x + viewport.width {
        ctx.draw(&CanvasLine {
            x1: x,
            y1: -viewport.origin_y,
            x2: x,
            y2: -(viewport.origin_y + viewport.height),
            color,
        });
        x += GRID_STEP;
    }
    let mut y = (viewport.origin_y / GRID_STEP).floor() * GRID_STEP;
    while y <= viewport.origin_y + viewport.height {
        ctx.draw(&CanvasLine {
            x1: viewport.origin_x,
            y1: -y,
            x2: viewport.origin_x + viewport.width,
            y2: -y,
            color,
        });
        y += GRID_STEP;
    }
}

fn paint_block(ctx: &mut Context<'_>, block: &Block, selected: bool, hovered: bool, labels: bool) {
    let points = &block.coordinates.points;
    if points.len() < 2 {
        return;
    }

    // Stroke carries both interaction state and status on a terminal: use
    // the fill color for idle blocks so non-active statuses stay visible.
    let stroke = if selected || hovered {
        theme::block_stroke(selected, hovered)
    } else {
        theme::block_fill(block.status, false, false)
    };
    let color = tui_color(stroke);

    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        ctx.draw(&CanvasLine {
            x1: a.x,
            y1: -a.y,
            x2: b.x,
            y2: -b.y,
            color,
        });
    }

    let center = block.coordinates.center;
    if labels {
        let mut style = Style::default().fg(tui_color(theme::LABEL_PRIMARY));
        if selected {
            style = style.add_modifier(Modifier::BOLD);
        }
        ctx.print(
            center.x,
            -center.y,
            Line::styled(block.name.clone(), style),
        );
        ctx.print(
            center.x,
            -(center.y + theme::AREA_LABEL_OFFSET),
            Line::styled(
                format!("{:.1} acres", block.area),
                Style::default().fg(tui_color(theme::LABEL_SECONDARY)),
            ),
        );
    }

    if let Some(dot) = theme::status_dot(block.status) {
        ctx.print(
            center.x - theme::DOT_OFFSET,
            -(center.y - theme::DOT_OFFSET),
            Line::styled("●", Style::default().fg(tui_color(dot))),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{cell_to_map, effective_viewport};
    use ranchero_core::fixtures;
    use ranchero_core::map::MapViewState;
    use ratatui::layout::Rect;

    #[test]
    fn viewport_matches_padded_bounds_at_zoom_one() {
        let store = fixtures::load_default().expect("fixtures");
        let state = MapViewState::default();
        let vp = effective_viewport(store.blocks(), &state, 50.0).expect("viewport");
        // fixture bounds: x 50..480, y 50..300
        assert!((vp.origin_x - 0.0).abs() < 1e-9);
        assert!((vp.origin_y - 0.0).abs() < 1e-9);
        assert!((vp.width - 530.0).abs() < 1e-9);
        assert!((vp.height - 350.0).abs() < 1e-9);
    }

    #[test]
    fn zooming_in_halves_the_window() {
        let store = fixtures::load_default().expect("fixtures");
        let mut state = MapViewState::default();
        let base = effective_viewport(store.blocks(), &state, 50.0).expect("viewport");
        state.zoom_level = 2.0;
        let zoomed = effective_viewport(store.blocks(), &state, 50.0).expect("viewport");
        assert!((zoomed.width - base.width / 2.0).abs() < 1e-9);
        // same center
        let base_cx = base.origin_x + base.width / 2.0;
        let zoom_cx = zoomed.origin_x + zoomed.width / 2.0;
        assert!((base_cx - zoom_cx).abs() < 1e-9);
    }

    #[test]
    fn empty_blocks_yield_no_viewport() {
        assert!(effective_viewport(&[], &MapViewState::default(), 50.0).is_none());
    }

    #[test]
    fn cell_mapping_covers_the_viewport() {
        let store = fixtures::load_default().expect("fixtures");
        let state = MapViewState::default();
        let vp = effective_viewport(store.blocks(), &state, 50.0).expect("viewport");
        let area = Rect {
            x: 1,
            y: 1,
            width: 100,
            height: 40,
        };

        // top-left cell maps near the viewport origin
        let p = cell_to_map(area, vp, 1, 1).expect("inside");
        assert!(p.x >= vp.origin_x && p.x < vp.origin_x + vp.width / 50.0);
        assert!(p.y >= vp.origin_y && p.y < vp.origin_y + vp.height / 20.0);

        // bottom-right cell maps near the far corner
        let p = cell_to_map(area, vp, 100, 40).expect("inside");
        assert!(p.x > vp.origin_x + vp.width * 0.9);
        assert!(p.y > vp.origin_y + vp.height * 0.9);

        // outside the area
        assert!(cell_to_map(area, vp, 0, 0).is_none());
        assert!(cell_to_map(area, vp, 101, 10).is_none());
    }

    #[test]
    fn hovering_center_of_a_block_hits_it() {
        let store = fixtures::load_default().expect("fixtures");
        let state = MapViewState::default();
        let vp = effective_viewport(store.blocks(), &state, 50.0).expect("viewport");
        let area = Rect {
            x: 0,
            y: 0,
            width: 106,
            height: 70,
        };

        // North Field center is (125, 100); invert the transform to find
        // its cell, then map back and hit-test
        let col = ((125.0 - vp.origin_x) / vp.width * f64::from(area.width)) as u16;
        let row = ((100.0 - vp.origin_y) / vp.height * f64::from(area.height)) as u16;
        let p = cell_to_map(area, vp, col, row).expect("inside");
        let hit = ranchero_core::map::hit_test(store.blocks(), p).expect("hover hits a block");
        assert_eq!(hit.id, "rde-block-1");
    }
}
