//! SVG rendering of radar layouts.

use serde::{Deserialize, Serialize};

use wiscar_core::radar::{Point, RadarLayout};

use crate::html::html_escape;

/// Colors and sizes for a rendered radar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarStyle {
    pub fill: String,
    pub fill_opacity: f64,
    pub stroke: String,
    pub grid_stroke: String,
    pub point_radius: f64,
    pub font_size: f64,
}

impl Default for RadarStyle {
    fn default() -> Self {
        Self {
            fill: "#6366f1".to_string(),
            fill_opacity: 0.2,
            stroke: "#6366f1".to_string(),
            grid_stroke: "#d1d5db".to_string(),
            point_radius: 4.0,
            font_size: 12.0,
        }
    }
}

/// `x,y x,y ...` for a polygon's `points` attribute.
fn points_attr(vertices: &[Point]) -> String {
    vertices
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn text_anchor(anchor: &Point, center: &Point) -> &'static str {
    let dx = anchor.x - center.x;
    if dx.abs() < 1.0 {
        "middle"
    } else if dx > 0.0 {
        "start"
    } else {
        "end"
    }
}

/// Render a radar layout as a standalone `<svg>` element.
pub fn render_radar(layout: &RadarLayout, style: &RadarStyle) -> String {
    let size = layout.size;
    let mut svg = format!(
        "<svg width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\" xmlns=\"http://www.w3.org/2000/svg\" class=\"radar\">\n"
    );

    for ring in &layout.grid {
        svg.push_str(&format!(
            "  <polygon class=\"grid\" points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>\n",
            points_attr(&ring.vertices),
            style.grid_stroke
        ));
    }

    for axis in &layout.axes {
        svg.push_str(&format!(
            "  <line class=\"axis\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>\n",
            axis.from.x, axis.from.y, axis.to.x, axis.to.y, style.grid_stroke
        ));
    }

    svg.push_str(&format!(
        "  <polygon class=\"data\" points=\"{}\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>\n",
        points_attr(&layout.data_polygon),
        style.fill,
        style.fill_opacity,
        style.stroke
    ));

    for point in &layout.points {
        svg.push_str(&format!(
            "  <circle class=\"point\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\"><title>{}: {}</title></circle>\n",
            point.position.x,
            point.position.y,
            style.point_radius,
            style.stroke,
            html_escape(&point.label),
            point.value
        ));
    }

    let line_height = style.font_size * 1.2;
    for label in &layout.labels {
        let anchor = text_anchor(&label.anchor, &layout.center);
        svg.push_str(&format!(
            "  <text class=\"label\" x=\"{:.2}\" y=\"{:.2}\" font-size=\"{}\" text-anchor=\"{anchor}\" fill=\"currentColor\">\
<tspan font-weight=\"600\">{}</tspan>\
<tspan x=\"{:.2}\" dy=\"{line_height}\">{}</tspan></text>\n",
            label.anchor.x,
            label.anchor.y,
            style.font_size,
            html_escape(&label.label),
            label.anchor.x,
            label.value
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
