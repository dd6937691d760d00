//! SVG rendering of a resolved map scene.
//!
//! Produces a standalone SVG document string: padded viewBox, background,
//! optional grid pattern, then one group per block (polygon, labels, status
//! dot) in document order. All styling comes pre-resolved on the scene, so
//! this module is pure string assembly.

use crate::map::{BlockShape, GRID_STEP, MapScene};
use crate::theme;
use std::fmt::Write as _;

/// Render `scene` as a complete SVG document.
#[must_use]
pub fn render_map(scene: &MapScene) -> String {
    let vp = scene.viewport;
    let mut out = String::with_capacity(1024 + scene.shapes.len() * 512);

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        num(vp.origin_x),
        num(vp.origin_y),
        num(vp.width),
        num(vp.height)
    );

    if scene.show_grid {
        let _ = writeln!(
            out,
            r#"  <defs><pattern id="grid" width="{step}" height="{step}" patternUnits="userSpaceOnUse"><path d="M {step} 0 L 0 0 0 {step}" fill="none" stroke="{stroke}" stroke-width="0.5"/></pattern></defs>"#,
            step = num(GRID_STEP),
            stroke = theme::MAP_BORDER.hex(),
        );
    }

    // Background, then the grid wash over it.
    let _ = writeln!(
        out,
        r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="1"/>"#,
        num(vp.origin_x),
        num(vp.origin_y),
        num(vp.width),
        num(vp.height),
        theme::MAP_BACKGROUND.hex(),
        theme::MAP_BORDER.hex(),
    );
    if scene.show_grid {
        let _ = writeln!(
            out,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="url(#grid)"/>"#,
            num(vp.origin_x),
            num(vp.origin_y),
            num(vp.width),
            num(vp.height),
        );
    }

    for shape in &scene.shapes {
        render_shape(&mut out, shape);
    }

    out.push_str("</svg>\n");
    out
}

fn render_shape(out: &mut String, shape: &BlockShape) {
    let _ = writeln!(out, r#"  <g data-block-id="{}">"#, escape(&shape.block_id));
    let _ = writeln!(
        out,
        r#"    <path d="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
        shape.path,
        shape.fill.hex(),
        shape.stroke.hex(),
        num(shape.stroke_width),
    );

    for label in [&shape.name_label, &shape.area_label].into_iter().flatten() {
        let _ = writeln!(
            out,
            r#"    <text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="{}" fill="{}">{}</text>"#,
            num(label.x),
            num(label.y),
            num(label.size),
            label.color.hex(),
            escape(&label.text),
        );
    }

    if let Some(dot) = shape.status_dot {
        let _ = writeln!(
            out,
            r#"    <circle cx="{}" cy="{}" r="{}" fill="{}" stroke="white" stroke-width="1"/>"#,
            num(dot.x),
            num(dot.y),
            num(dot.radius),
            dot.color.hex(),
        );
    }

    out.push_str("  </g>\n");
}

/// Trim the trailing `.0` off whole-valued attributes.
fn num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::render_map;
    use crate::map::{MapViewState, build_scene};
    use crate::model::BlockStatus;
    use crate::model::block::sample_block;

    fn scene_for(blocks: &[crate::model::Block], state: &MapViewState) -> String {
        let scene = build_scene(blocks, state, 50.0).expect("non-empty scene");
        render_map(&scene)
    }

    #[test]
    fn document_has_padded_viewbox() {
        let svg = scene_for(
            &[sample_block("b1", BlockStatus::Active)],
            &MapViewState::default(),
        );
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"viewBox="50 50 200 180""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn only_non_active_blocks_get_a_status_circle() {
        let blocks = vec![
            sample_block("b1", BlockStatus::Active),
            sample_block("b2", BlockStatus::Maintenance),
        ];
        let svg = scene_for(&blocks, &MapViewState::default());
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(svg.contains("#f59e0b"));
    }

    #[test]
    fn labels_disappear_when_toggled_off() {
        let blocks = vec![sample_block("b1", BlockStatus::Active)];
        let mut state = MapViewState::default();

        let with_labels = scene_for(&blocks, &state);
        assert!(with_labels.contains(">Block b1</text>"));
        assert!(with_labels.contains(">12.5 acres</text>"));

        state.toggle_labels();
        let without = scene_for(&blocks, &state);
        assert!(!without.contains("<text"));
    }

    #[test]
    fn grid_pattern_only_when_enabled() {
        let blocks = vec![sample_block("b1", BlockStatus::Active)];
        let mut state = MapViewState::default();
        assert!(!scene_for(&blocks, &state).contains("url(#grid)"));
        state.toggle_grid();
        let svg = scene_for(&blocks, &state);
        assert!(svg.contains("<pattern id=\"grid\""));
        assert!(svg.contains("url(#grid)"));
    }

    #[test]
    fn label_text_is_escaped() {
        let mut block = sample_block("b1", BlockStatus::Active);
        block.name = "North & <South>".to_string();
        let svg = scene_for(&[block], &MapViewState::default());
        assert!(svg.contains("North &amp; &lt;South&gt;"));
    }

    #[test]
    fn selected_block_uses_highlight_fill_and_wide_stroke() {
        let blocks = vec![sample_block("b1", BlockStatus::Active)];
        let state = MapViewState::with_selection(Some("b1".to_string()));
        let svg = scene_for(&blocks, &state);
        assert!(svg.contains(r##"fill="#57b757""##));
        assert!(svg.contains(r#"stroke-width="3""#));
    }
}
