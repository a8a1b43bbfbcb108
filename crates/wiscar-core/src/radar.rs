//! Radar chart geometry.
//!
//! Converts N labeled values into screen-space primitives: concentric grid
//! rings, axis spokes, the data polygon, point markers and label anchors.
//! Axis 0 points straight up and axes proceed clockwise (screen y grows
//! downwards). The layout is a pure function of its inputs.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;

/// Fractions of the usable radius at which grid rings are drawn.
pub const GRID_LEVELS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

/// Max value used for axes that don't specify one.
pub const DEFAULT_MAX_VALUE: f64 = 100.0;

/// One input axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarAxis {
    pub label: String,
    pub value: f64,
    #[serde(default)]
    pub max_value: Option<f64>,
}

impl RadarAxis {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            max_value: None,
        }
    }

    pub fn with_max(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    pub fn effective_max(&self) -> f64 {
        self.max_value.unwrap_or(DEFAULT_MAX_VALUE)
    }
}

/// Canvas settings for a radar layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Width and height of the square canvas.
    pub size: f64,
    /// Inset reserved around the outer ring for labels.
    pub margin: f64,
    /// Distance of label anchors beyond the outer ring.
    pub label_offset: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            size: 300.0,
            margin: 50.0,
            label_offset: 25.0,
        }
    }
}

impl RadarConfig {
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Radius of the outer grid ring.
    pub fn radius(&self) -> f64 {
        self.size / 2.0 - self.margin
    }

    fn validate(&self) -> Result<(), AssessmentError> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(AssessmentError::validation(
                "radar canvas",
                format!("size must be a positive number, got {}", self.size),
            ));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(AssessmentError::validation(
                "radar canvas",
                format!("margin must be zero or positive, got {}", self.margin),
            ));
        }
        if !self.label_offset.is_finite() {
            return Err(AssessmentError::validation(
                "radar canvas",
                "label offset must be finite",
            ));
        }
        if self.radius() <= 0.0 {
            return Err(AssessmentError::validation(
                "radar canvas",
                format!(
                    "margin {} leaves no room on a {} canvas",
                    self.margin, self.size
                ),
            ));
        }
        Ok(())
    }
}

/// A screen-space coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// What a closed ring through N vertices actually looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// N = 1: every vertex sits on the single axis.
    Point,
    /// N = 2: two opposite vertices.
    Segment,
    Polygon,
}

impl Shape {
    fn for_vertices(n: usize) -> Self {
        match n {
            0 | 1 => Shape::Point,
            2 => Shape::Segment,
            _ => Shape::Polygon,
        }
    }
}

/// One concentric grid ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRing {
    /// Fraction of the full radius.
    pub level: f64,
    pub vertices: Vec<Point>,
}

/// A spoke from the center to the outer ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLine {
    pub from: Point,
    pub to: Point,
}

/// A data vertex together with the value it encodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub label: String,
    pub value: f64,
    pub max_value: f64,
    pub position: Point,
}

/// Where to draw an axis caption, and the raw value to print under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarLabel {
    pub label: String,
    pub value: f64,
    pub anchor: Point,
}

/// Everything a renderer needs to draw a radar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarLayout {
    pub size: f64,
    pub center: Point,
    pub radius: f64,
    /// Shape of every grid ring and of the data polygon.
    pub shape: Shape,
    /// One ring per entry of [`GRID_LEVELS`], innermost first.
    pub grid: Vec<GridRing>,
    pub axes: Vec<AxisLine>,
    pub data_polygon: Vec<Point>,
    pub points: Vec<RadarPoint>,
    pub labels: Vec<RadarLabel>,
}

/// Angle of axis `index` out of `count`, with axis 0 pointing up.
pub fn axis_angle(index: usize, count: usize) -> f64 {
    index as f64 * (TAU / count as f64) - FRAC_PI_2
}

fn project(center: Point, distance: f64, angle: f64) -> Point {
    Point {
        x: center.x + distance * angle.cos(),
        y: center.y + distance * angle.sin(),
    }
}

/// Lay out a radar chart.
///
/// Values above their max extend past the outer ring. Negative or
/// non-finite values, non-positive max values and an empty axis list are
/// rejected.
pub fn layout(axes: &[RadarAxis], config: &RadarConfig) -> Result<RadarLayout, AssessmentError> {
    if axes.is_empty() {
        return Err(AssessmentError::validation(
            "radar input",
            "at least one axis is required",
        ));
    }
    config.validate()?;
    let radius = config.radius();
    for axis in axes {
        validate_axis(axis, radius)?;
    }

    let n = axes.len();
    let center = Point {
        x: config.size / 2.0,
        y: config.size / 2.0,
    };
    let angles: Vec<f64> = (0..n).map(|i| axis_angle(i, n)).collect();

    let grid = GRID_LEVELS
        .iter()
        .map(|&level| GridRing {
            level,
            vertices: angles
                .iter()
                .map(|&a| project(center, radius * level, a))
                .collect(),
        })
        .collect();

    let axis_lines = angles
        .iter()
        .map(|&a| AxisLine {
            from: center,
            to: project(center, radius, a),
        })
        .collect();

    let points: Vec<RadarPoint> = axes
        .iter()
        .zip(&angles)
        .map(|(axis, &a)| {
            let max_value = axis.effective_max();
            let ratio = (axis.value / max_value).max(0.0);
            RadarPoint {
                label: axis.label.clone(),
                value: axis.value,
                max_value,
                position: project(center, radius * ratio, a),
            }
        })
        .collect();

    let label_radius = radius + config.label_offset;
    let labels = axes
        .iter()
        .zip(&angles)
        .map(|(axis, &a)| RadarLabel {
            label: axis.label.clone(),
            value: axis.value,
            anchor: project(center, label_radius, a),
        })
        .collect();

    Ok(RadarLayout {
        size: config.size,
        center,
        radius,
        shape: Shape::for_vertices(n),
        grid,
        axes: axis_lines,
        data_polygon: points.iter().map(|p| p.position).collect(),
        points,
        labels,
    })
}

fn validate_axis(axis: &RadarAxis, radius: f64) -> Result<(), AssessmentError> {
    let subject = || format!("radar value for '{}'", axis.label);
    if !axis.value.is_finite() {
        return Err(AssessmentError::validation(subject(), "value must be finite"));
    }
    if axis.value < 0.0 {
        return Err(AssessmentError::validation(
            subject(),
            format!("negative value {}", axis.value),
        ));
    }
    let max = axis.effective_max();
    if !max.is_finite() || max <= 0.0 {
        return Err(AssessmentError::validation(
            subject(),
            format!("max value must be positive, got {max}"),
        ));
    }
    if !(radius * (axis.value / max)).is_finite() {
        return Err(AssessmentError::validation(
            subject(),
            format!("{} / {max} is too large to plot", axis.value),
        ));
    }
    Ok(())
}
