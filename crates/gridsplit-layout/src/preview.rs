//! Cut-guide overlay geometry and SVG rendering for grid previews.
//!
//! Coordinates are in source pixels, so the overlay can be stacked on top of
//! the image at any display scale by sharing its `viewBox`.

use std::fmt::Write as _;

use gridsplit_core::GridSpec;

/// Stroke colour of the cut guides.
const GUIDE_COLOR: &str = "#6366f1";
/// Opacity of the cut guides.
const GUIDE_OPACITY: f64 = 0.9;
/// Minimum stroke width in source pixels.
const MIN_STROKE_WIDTH: f64 = 3.0;

/// Label drawn at the centre of one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellLabel {
    /// One-based page number in row-major order.
    pub page_number: usize,
    /// Horizontal centre of the cell.
    pub center_x: f64,
    /// Vertical centre of the cell.
    pub center_y: f64,
}

impl CellLabel {
    /// Display text, e.g. `PAGE 3`.
    pub fn text(&self) -> String {
        format!("PAGE {}", self.page_number)
    }
}

/// Cut guides and page labels for one image and grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOverlay {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// X positions of interior vertical guides.
    pub vertical_lines: Vec<f64>,
    /// Y positions of interior horizontal guides.
    pub horizontal_lines: Vec<f64>,
    /// Guide stroke width.
    pub stroke_width: f64,
    /// Dash pattern as `(dash, gap)`.
    pub dash: (f64, f64),
    /// Page labels in row-major order.
    pub labels: Vec<CellLabel>,
}

/// Computes overlay geometry for an image of `width` x `height` pixels.
pub fn grid_overlay(width: u32, height: u32, grid: GridSpec) -> GridOverlay {
    let w = f64::from(width);
    let h = f64::from(height);
    let columns = grid.columns();
    let rows = grid.rows();
    let cell_w = w / f64::from(columns);
    let cell_h = h / f64::from(rows);

    let vertical_lines = (1..columns).map(|i| cell_w * f64::from(i)).collect();
    let horizontal_lines = (1..rows).map(|j| cell_h * f64::from(j)).collect();

    let mut labels = Vec::with_capacity(grid.page_count());
    for row in 0..rows {
        for column in 0..columns {
            labels.push(CellLabel {
                page_number: labels.len() + 1,
                center_x: cell_w * (f64::from(column) + 0.5),
                center_y: cell_h * (f64::from(row) + 0.5),
            });
        }
    }

    GridOverlay {
        width,
        height,
        vertical_lines,
        horizontal_lines,
        stroke_width: (w / 300.0).max(MIN_STROKE_WIDTH),
        dash: (w / 50.0, w / 100.0),
        labels,
    }
}

/// Renders the overlay as a standalone SVG document.
pub fn render_overlay_svg(overlay: &GridOverlay) -> String {
    let w = f64::from(overlay.width);
    let h = f64::from(overlay.height);
    let label_size = label_font_size(overlay);
    let mut svg = String::with_capacity(512 + overlay.labels.len() * 160);

    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        overlay.width, overlay.height, overlay.width, overlay.height
    );
    let _ = writeln!(
        svg,
        r#"  <g stroke="{GUIDE_COLOR}" stroke-width="{}" stroke-dasharray="{},{}" opacity="{GUIDE_OPACITY}">"#,
        fmt_num(overlay.stroke_width),
        fmt_num(overlay.dash.0),
        fmt_num(overlay.dash.1)
    );
    for x in &overlay.vertical_lines {
        let x = fmt_num(*x);
        let _ = writeln!(
            svg,
            r#"    <line x1="{x}" y1="0" x2="{x}" y2="{}"/>"#,
            fmt_num(h)
        );
    }
    for y in &overlay.horizontal_lines {
        let y = fmt_num(*y);
        let _ = writeln!(
            svg,
            r#"    <line x1="0" y1="{y}" x2="{}" y2="{y}"/>"#,
            fmt_num(w)
        );
    }
    svg.push_str("  </g>\n");

    let _ = writeln!(
        svg,
        r#"  <g font-family="sans-serif" font-weight="900" font-size="{}" fill="{GUIDE_COLOR}" text-anchor="middle" dominant-baseline="middle">"#,
        fmt_num(label_size)
    );
    for label in &overlay.labels {
        let _ = writeln!(
            svg,
            r#"    <text x="{}" y="{}">{}</text>"#,
            fmt_num(label.center_x),
            fmt_num(label.center_y),
            label.text()
        );
    }
    svg.push_str("  </g>\n</svg>\n");
    svg
}

fn label_font_size(overlay: &GridOverlay) -> f64 {
    let columns = overlay.vertical_lines.len() + 1;
    let rows = overlay.horizontal_lines.len() + 1;
    let cell_w = f64::from(overlay.width) / columns as f64;
    let cell_h = f64::from(overlay.height) / rows as f64;
    (cell_w.min(cell_h) / 8.0).max(12.0)
}

/// Formats with at most two decimals and no trailing zeros.
fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        let text = format!("{rounded:.2}");
        text.trim_end_matches('0').to_string()
    }
}
