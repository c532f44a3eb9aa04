/*!
# SVG Output

A small line-oriented SVG builder shared by the grid adapter and the panel
composer, plus [`grid_to_svg`], which draws a [`GridLayout`] as the three
groups `majorGrid`, `minorGrid` and `gridText`.
*/

use crate::grid::{GridLayout, GridPoint};
use phyloview_core::js_number;
use serde::{Deserialize, Serialize};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Stroke and font settings for drawn gridlines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    pub major_grid_stroke: String,
    pub major_grid_width: f64,
    pub minor_grid_stroke: String,
    pub minor_grid_width: f64,
    pub tick_label_size: f64,
    pub tick_label_fill: String,
    pub font_family: String,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            major_grid_stroke: "#CCC".to_string(),
            major_grid_width: 2.0,
            minor_grid_stroke: "#DDD".to_string(),
            minor_grid_width: 1.0,
            tick_label_size: 12.0,
            tick_label_fill: "#555".to_string(),
            font_family: "Lato, Helvetica Neue, Helvetica, sans-serif".to_string(),
        }
    }
}

/// Collects SVG elements, one per output line
#[derive(Debug, Default)]
pub struct SvgBuilder {
    elements: Vec<String>,
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: impl Into<String>) {
        self.elements.push(element.into());
    }

    pub fn open_root(&mut self, width: f64, height: f64) {
        self.elements.push(format!(
            r#"<svg xmlns:xlink="{}" xmlns="{}" width="{}" height="{}">"#,
            XLINK_NS,
            SVG_NS,
            js_number(width),
            js_number(height)
        ));
    }

    pub fn open_group(&mut self, id: &str) {
        self.elements.push(format!(r#"<g id="{}">"#, escape_xml(id)));
    }

    pub fn close_group(&mut self) {
        self.elements.push("</g>".to_string());
    }

    pub fn close_svg(&mut self) {
        self.elements.push("</svg>".to_string());
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn finish(self) -> String {
        self.elements.join("\n")
    }
}

/// Escape text for use in element content or attribute values
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_lines(svg: &mut SvgBuilder, class: &str, points: &[GridPoint], paths: &[String], stroke: &str, width: f64) {
    for (point, d) in points.iter().zip(paths) {
        svg.push(format!(
            r#"<path d="{}" class="{}" style="fill: none; visibility: {}; stroke: {}; stroke-width: {}"/>"#,
            d,
            class,
            point.visibility.as_str(),
            escape_xml(stroke),
            js_number(width)
        ));
    }
}

/// Draw a computed grid as SVG groups. Hidden elements are kept with
/// `visibility: hidden` so the groups always mirror the layout.
pub fn grid_to_svg(layout: &GridLayout, style: &GridStyle) -> String {
    let mut svg = SvgBuilder::new();

    svg.open_group("majorGrid");
    push_lines(
        &mut svg,
        "majorGrid",
        &layout.major_points,
        &layout.major_paths,
        &style.major_grid_stroke,
        style.major_grid_width,
    );
    svg.close_group();

    svg.open_group("minorGrid");
    push_lines(
        &mut svg,
        "minorGrid",
        &layout.minor_points,
        &layout.minor_paths,
        &style.minor_grid_stroke,
        style.minor_grid_width,
    );
    svg.close_group();

    svg.open_group("gridText");
    for label in &layout.labels {
        svg.push(format!(
            r#"<text class="gridText" x="{}" y="{}" style="font-size: {}px; font-family: {}; fill: {}; text-anchor: {}; visibility: {}">{}</text>"#,
            js_number(label.x),
            js_number(label.y),
            js_number(style.tick_label_size),
            escape_xml(&style.font_family),
            escape_xml(&style.tick_label_fill),
            label.anchor.as_str(),
            label.visibility.as_str(),
            escape_xml(&label.text)
        ));
    }
    svg.close_group();

    svg.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{compute_grid, GridParams};
    use phyloview_core::{AxisScale, LayoutMode};

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"a<b & "c">"#), "a&lt;b &amp; &quot;c&quot;&gt;");
    }

    #[test]
    fn test_builder_joins_lines() {
        let mut svg = SvgBuilder::new();
        svg.open_root(450.0, 320.5);
        svg.close_svg();
        assert_eq!(svg.len(), 2);
        let out = svg.finish();
        assert!(out.starts_with(r#"<svg xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(out.contains(r#"width="450" height="320.5""#));
        assert!(out.ends_with("\n</svg>"));
    }

    #[test]
    fn test_grid_groups() {
        let x = AxisScale::linear([0.0, 10.0], [0.0, 500.0]);
        let y = AxisScale::linear([1.0, 30.0], [0.0, 400.0]);
        let grid = compute_grid(&x, &y, LayoutMode::Rect, &GridParams::default()).unwrap();
        let out = grid_to_svg(&grid, &GridStyle::default());
        assert!(out.starts_with(r#"<g id="majorGrid">"#));
        assert!(out.contains(r#"<g id="minorGrid">"#));
        assert!(out.contains(r#"<g id="gridText">"#));
        assert_eq!(out.matches(r#"class="majorGrid""#).count(), grid.major_points.len());
        assert_eq!(out.matches(r#"class="minorGrid""#).count(), grid.minor_points.len());
        assert_eq!(out.matches("<text ").count(), grid.labels.len());
        assert!(out.contains("stroke: #CCC; stroke-width: 2"));
        assert!(out.contains(">4</text>"));
    }

    #[test]
    fn test_empty_grid_still_has_groups() {
        let out = grid_to_svg(&GridLayout::default(), &GridStyle::default());
        assert_eq!(out.lines().count(), 6);
    }
}
