//! Map view state and scene building.
//!
//! The map composes one shape per block over a shared viewport. Interaction
//! state (selection, hover, toggles, zoom) lives here and is created per
//! view, mutated by user events, and discarded when the view closes — never
//! persisted.
//!
//! Per block the derived interaction states are `idle`, `hovered`, and
//! `selected`. Selection and hover are orthogonal flags: a block can be
//! both at once, and selection persists across hover changes. There is no
//! deselect; clicking another block overwrites the selection.

use crate::geometry::{self, BoundingBox, Point, Viewport};
use crate::model::Block;
use crate::theme::{self, Rgb};

/// Default padding around the union bounds, in map units.
pub const MAP_PADDING: f64 = 50.0;

/// Grid cell size for the optional background grid, in map units.
pub const GRID_STEP: f64 = 20.0;

const ZOOM_MIN: f64 = 0.5;
const ZOOM_MAX: f64 = 4.0;
const ZOOM_STEP: f64 = 0.25;

const NAME_LABEL_SIZE: f64 = 12.0;
const AREA_LABEL_SIZE: f64 = 10.0;

/// Ephemeral interaction state owned by a map view.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewState {
    pub selected_block_id: Option<String>,
    pub hovered_block_id: Option<String>,
    pub show_labels: bool,
    pub show_grid: bool,
    pub zoom_level: f64,
}

impl Default for MapViewState {
    fn default() -> Self {
        Self {
            selected_block_id: None,
            hovered_block_id: None,
            show_labels: true,
            show_grid: false,
            zoom_level: 1.0,
        }
    }
}

/// What the composing view should do after a click lands on a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A selection callback is wired; notify it with the block id.
    Notify(String),
    /// No callback; navigate to the block's detail view.
    OpenDetail(String),
}

impl MapViewState {
    #[must_use]
    pub fn with_selection(selected: Option<String>) -> Self {
        Self {
            selected_block_id: selected,
            ..Self::default()
        }
    }

    /// hover-enter(blockId): the pointer moved onto a block.
    pub fn hover_enter(&mut self, block_id: &str) {
        self.hovered_block_id = Some(block_id.to_string());
    }

    /// hover-leave: the pointer left all blocks.
    pub fn hover_leave(&mut self) {
        self.hovered_block_id = None;
    }

    /// click(blockId): select the block and tell the caller how to
    /// dispatch — to its selection callback when one is wired, otherwise
    /// to the block detail view.
    pub fn click(&mut self, block_id: &str, has_selection_callback: bool) -> ClickOutcome {
        self.selected_block_id = Some(block_id.to_string());
        if has_selection_callback {
            ClickOutcome::Notify(block_id.to_string())
        } else {
            ClickOutcome::OpenDetail(block_id.to_string())
        }
    }

    pub fn toggle_labels(&mut self) {
        self.show_labels = !self.show_labels;
    }

    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    pub fn zoom_in(&mut self) {
        self.zoom_level = (self.zoom_level + ZOOM_STEP).min(ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_level = (self.zoom_level - ZOOM_STEP).max(ZOOM_MIN);
    }

    #[must_use]
    pub fn is_selected(&self, block_id: &str) -> bool {
        self.selected_block_id.as_deref() == Some(block_id)
    }

    #[must_use]
    pub fn is_hovered(&self, block_id: &str) -> bool {
        self.hovered_block_id.as_deref() == Some(block_id)
    }
}

/// A positioned text label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Rgb,
}

/// The small colored indicator drawn on non-active blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusDot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgb,
}

/// Everything needed to draw one block, fully resolved against the theme.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockShape {
    pub block_id: String,
    pub path: String,
    pub fill: Rgb,
    pub stroke: Rgb,
    pub stroke_width: f64,
    pub name_label: Option<TextLabel>,
    pub area_label: Option<TextLabel>,
    pub status_dot: Option<StatusDot>,
}

/// Resolve one block's visual representation from its geometry, the theme
/// table, and the two interaction flags.
#[must_use]
pub fn block_shape(block: &Block, selected: bool, hovered: bool, show_label: bool) -> BlockShape {
    let center = block.coordinates.center;

    let name_label = show_label.then(|| TextLabel {
        text: block.name.clone(),
        x: center.x,
        y: center.y,
        size: NAME_LABEL_SIZE,
        color: theme::LABEL_PRIMARY,
    });
    let area_label = show_label.then(|| TextLabel {
        text: format!("{:.1} acres", block.area),
        x: center.x,
        y: center.y + theme::AREA_LABEL_OFFSET,
        size: AREA_LABEL_SIZE,
        color: theme::LABEL_SECONDARY,
    });

    let status_dot = theme::status_dot(block.status).map(|color| StatusDot {
        x: center.x - theme::DOT_OFFSET,
        y: center.y - theme::DOT_OFFSET,
        radius: theme::DOT_RADIUS,
        color,
    });

    BlockShape {
        block_id: block.id.clone(),
        path: geometry::polygon_path(&block.coordinates.points),
        fill: theme::block_fill(block.status, selected, hovered),
        stroke: theme::block_stroke(selected, hovered),
        stroke_width: theme::stroke_width(selected, hovered),
        name_label,
        area_label,
        status_dot,
    }
}

/// A fully resolved map: viewport plus one shape per block, in document
/// order (later shapes paint over earlier ones).
#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub viewport: Viewport,
    pub bounds: BoundingBox,
    pub show_grid: bool,
    pub shapes: Vec<BlockShape>,
}

/// Union bounds over all blocks.
///
/// Recomputed on every render pass; block collections are small and static
/// for the life of a session, so caching would buy nothing.
#[must_use]
pub fn map_bounds(blocks: &[Block]) -> BoundingBox {
    BoundingBox::of_all(blocks.iter().map(|b| b.coordinates.bounding_box))
}

/// Build the scene for `blocks` under `state`.
///
/// Returns `None` for an empty collection: the union bounds are degenerate
/// and there is nothing to size a viewport around. Callers render an empty
/// placeholder instead.
#[must_use]
pub fn build_scene(blocks: &[Block], state: &MapViewState, padding: f64) -> Option<MapScene> {
    let bounds = map_bounds(blocks);
    if bounds.is_degenerate() {
        return None;
    }

    let shapes = blocks
        .iter()
        .map(|b| {
            block_shape(
                b,
                state.is_selected(&b.id),
                state.is_hovered(&b.id),
                state.show_labels,
            )
        })
        .collect();

    Some(MapScene {
        viewport: Viewport::around(bounds, padding),
        bounds,
        show_grid: state.show_grid,
        shapes,
    })
}

/// Topmost block containing `p`, if any.
///
/// Blocks are painted in document order, so the last match wins — the same
/// block that would receive the pointer event in an SVG document.
#[must_use]
pub fn hit_test<'a>(blocks: &'a [Block], p: Point) -> Option<&'a Block> {
    blocks
        .iter()
        .rev()
        .find(|b| geometry::point_in_polygon(p, &b.coordinates.points))
}

#[cfg(test)]
mod tests {
    use super::{ClickOutcome, MapViewState, block_shape, build_scene, hit_test, map_bounds};
    use crate::geometry::Point;
    use crate::model::BlockStatus;
    use crate::model::block::sample_block;
    use crate::theme;

    #[test]
    fn selection_persists_across_hover_changes() {
        let mut state = MapViewState::default();
        state.click("b1", false);
        state.hover_enter("b2");

        assert!(state.is_selected("b1"));
        assert!(state.is_hovered("b2"));
        assert!(!state.is_hovered("b1"));

        state.hover_leave();
        assert!(state.is_selected("b1"));
        assert!(state.hovered_block_id.is_none());
    }

    #[test]
    fn clicking_another_block_overwrites_selection() {
        let mut state = MapViewState::default();
        state.click("b1", false);
        state.click("b2", false);
        assert!(state.is_selected("b2"));
        assert!(!state.is_selected("b1"));
    }

    #[test]
    fn click_dispatch_prefers_callback_over_navigation() {
        let mut state = MapViewState::default();
        assert_eq!(
            state.click("b1", true),
            ClickOutcome::Notify("b1".to_string())
        );
        assert_eq!(
            state.click("b2", false),
            ClickOutcome::OpenDetail("b2".to_string())
        );
    }

    #[test]
    fn zoom_is_clamped() {
        let mut state = MapViewState::default();
        for _ in 0..100 {
            state.zoom_in();
        }
        assert!(state.zoom_level <= 4.0);
        for _ in 0..100 {
            state.zoom_out();
        }
        assert!(state.zoom_level >= 0.5);
    }

    #[test]
    fn only_non_active_blocks_render_a_dot() {
        let active = sample_block("b1", BlockStatus::Active);
        let maintenance = sample_block("b2", BlockStatus::Maintenance);

        assert!(block_shape(&active, false, false, true).status_dot.is_none());
        let dot = block_shape(&maintenance, false, false, true)
            .status_dot
            .expect("maintenance block gets a dot");
        assert_eq!(dot.color, theme::DOT_MAINTENANCE);
    }

    #[test]
    fn labels_follow_the_show_label_flag() {
        let block = sample_block("b1", BlockStatus::Active);

        let with = block_shape(&block, false, false, true);
        assert!(with.name_label.is_some());
        let area = with.area_label.expect("area label");
        assert_eq!(area.text, "12.5 acres");
        assert!((area.y - (block.coordinates.center.y + theme::AREA_LABEL_OFFSET)).abs() < 1e-9);

        let without = block_shape(&block, false, false, false);
        assert!(without.name_label.is_none());
        assert!(without.area_label.is_none());
    }

    #[test]
    fn fill_resolution_priority() {
        let block = sample_block("b1", BlockStatus::Resting);
        assert_eq!(block_shape(&block, true, true, false).fill, theme::FILL_SELECTED);
        assert_eq!(block_shape(&block, false, true, false).fill, theme::FILL_HOVERED);
        assert_eq!(block_shape(&block, false, false, false).fill, theme::FILL_RESTING);
    }

    #[test]
    fn bounds_are_the_union_of_block_boxes() {
        let mut b1 = sample_block("b1", BlockStatus::Active);
        let mut b2 = sample_block("b2", BlockStatus::Active);
        b1.coordinates.points = vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 40.0),
        ];
        b2.coordinates.points = vec![
            Point::new(100.0, 60.0),
            Point::new(300.0, 60.0),
            Point::new(300.0, 200.0),
        ];
        b1.reconcile_geometry();
        b2.reconcile_geometry();

        let bounds = map_bounds(&[b1, b2]);
        assert!((bounds.min_x - 0.0).abs() < 1e-9);
        assert!((bounds.max_x - 300.0).abs() < 1e-9);
        assert!((bounds.min_y - 0.0).abs() < 1e-9);
        assert!((bounds.max_y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn empty_collection_builds_no_scene() {
        assert!(build_scene(&[], &MapViewState::default(), 50.0).is_none());
    }

    #[test]
    fn scene_viewport_pads_the_union_bounds() {
        let block = sample_block("b1", BlockStatus::Active);
        let scene = build_scene(&[block], &MapViewState::default(), 50.0).expect("scene");
        assert!((scene.viewport.origin_x - 50.0).abs() < 1e-9);
        assert!((scene.viewport.width - 200.0).abs() < 1e-9);
        assert_eq!(scene.shapes.len(), 1);
    }

    #[test]
    fn hit_test_returns_topmost_block() {
        let mut bottom = sample_block("bottom", BlockStatus::Active);
        let mut top = sample_block("top", BlockStatus::Active);
        // overlapping squares; `top` is later in document order
        bottom.coordinates.points = vec![
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 20.0),
            Point::new(0.0, 20.0),
        ];
        top.coordinates.points = vec![
            Point::new(10.0, 10.0),
            Point::new(30.0, 10.0),
            Point::new(30.0, 30.0),
            Point::new(10.0, 30.0),
        ];
        bottom.reconcile_geometry();
        top.reconcile_geometry();
        let blocks = vec![bottom, top];

        let hit = hit_test(&blocks, Point::new(15.0, 15.0)).expect("overlap hit");
        assert_eq!(hit.id, "top");
        let hit = hit_test(&blocks, Point::new(5.0, 5.0)).expect("bottom-only hit");
        assert_eq!(hit.id, "bottom");
        assert!(hit_test(&blocks, Point::new(100.0, 100.0)).is_none());
    }
}
