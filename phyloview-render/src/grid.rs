/*!
# Grid Layout

Computes the gridlines drawn behind a tree: major lines carrying tick labels,
minor lines between them, and (clock layout only) divergence labels along the
y axis. Rectangular and clock layouts get vertical lines, radial layouts get
circles around the root. Unrooted trees have no grid.

The computation is pure; [`crate::svg::grid_to_svg`] turns a [`GridLayout`]
into SVG groups.
*/

use phyloview_core::{js_number, to_fixed, AxisScale, DistanceMeasure, LayoutMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extra major lines emitted past the visible maximum
const MAJOR_PADDING_STEPS: f64 = 3.0;
/// Extra minor lines emitted past the visible maximum
const MINOR_PADDING_STEPS: f64 = 30.0;
/// Extra y-axis (clock) lines emitted past the visible maximum
const Y_PADDING_STEPS: f64 = 10.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("cannot place gridlines on the {axis:?} axis over [{min}, {max}]")]
    DegenerateRange { axis: Axis, min: f64, max: f64 },
    #[error("minor tick count must be at least 1")]
    NoMinorTicks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::Hidden => "hidden",
        }
    }

    fn within(position: f64, min_vis: f64, max_vis: f64) -> Self {
        if position < min_vis || position > max_vis {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub position: f64,
    pub visibility: Visibility,
    pub axis: Axis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Tick label of a major grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    pub visibility: Visibility,
    pub axis: Axis,
}

/// Inputs of the grid computation that do not come from the scales.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridParams {
    /// Depth of the root node; the radial grid starts here
    pub root_depth: f64,
    pub distance_measure: DistanceMeasure,
    pub minor_ticks: u32,
    pub minor_ticks_time_tree: u32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            root_depth: 0.0,
            distance_measure: DistanceMeasure::Divergence,
            minor_ticks: 4,
            minor_ticks_time_tree: 3,
        }
    }
}

impl GridParams {
    pub fn num_minor_ticks(&self) -> u32 {
        if self.distance_measure.is_temporal() {
            self.minor_ticks_time_tree
        } else {
            self.minor_ticks
        }
    }
}

/// Gridlines, their paths and labels. `major_paths[i]` draws `major_points[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub major_points: Vec<GridPoint>,
    pub minor_points: Vec<GridPoint>,
    pub major_paths: Vec<String>,
    pub minor_paths: Vec<String>,
    pub labels: Vec<GridLabel>,
    /// Major separation along x (absent for unrooted trees)
    pub step: Option<f64>,
    /// Major separation along y (clock layout only)
    pub y_step: Option<f64>,
}

impl GridLayout {
    pub fn is_empty(&self) -> bool {
        self.major_points.is_empty() && self.minor_points.is_empty()
    }

    /// Hide every line and label without recomputing positions
    pub fn hide(&mut self) {
        for p in self.major_points.iter_mut().chain(self.minor_points.iter_mut()) {
            p.visibility = Visibility::Hidden;
        }
        for label in &mut self.labels {
            label.visibility = Visibility::Hidden;
        }
    }

    pub fn visible_major(&self) -> impl Iterator<Item = &GridPoint> {
        self.major_points.iter().filter(|p| p.visibility == Visibility::Visible)
    }
}

/// Separation between major gridlines: a 1, 2 or 5 × 10^k step giving
/// between 2 and 10 lines over `range`.
pub fn major_grid_separation(range: f64) -> f64 {
    let mut log_range = range.log10().floor();
    // log10 can land one ulp short of an exact power of ten
    let base = 10f64.powf(log_range);
    if range / base >= 10.0 {
        log_range += 1.0;
    } else if range / base < 1.0 {
        log_range -= 1.0;
    }
    let mut step = 10f64.powf(log_range);
    if range / step < 2.0 {
        step /= 5.0;
    } else if range / step < 5.0 {
        step /= 2.0;
    }
    step
}

/// Decimals needed to print multiples of `step`
pub fn label_precision(step: f64) -> usize {
    (-step.log10().floor()).max(0.0) as usize
}

fn check_range(axis: Axis, min: f64, max: f64) -> Result<f64, GridError> {
    let range = max - min;
    if range.is_finite() && range > 0.0 {
        Ok(range)
    } else {
        Err(GridError::DegenerateRange { axis, min, max })
    }
}

/// Points `start + step * i` for `i` in `first..=floor(last)`
fn emit_points(start: f64, step: f64, first: u32, last: f64, min_vis: f64, max_vis: f64, axis: Axis) -> Vec<GridPoint> {
    let mut points = Vec::new();
    let mut i = first;
    while f64::from(i) <= last {
        let position = start + step * f64::from(i);
        points.push(GridPoint {
            position,
            visibility: Visibility::within(position, min_vis, max_vis),
            axis,
        });
        i += 1;
    }
    points
}

/// Viewport bounds in data units for one grid computation
struct Geometry<'a> {
    x: &'a AxisScale,
    y: &'a AxisScale,
    layout: LayoutMode,
    x_min: f64,
    x_max: f64,
}

impl<'a> Geometry<'a> {
    fn new(x: &'a AxisScale, y: &'a AxisScale, layout: LayoutMode, root_depth: f64) -> Self {
        let (x_min, x_max) = if layout == LayoutMode::Radial {
            let [xd0, xd1] = x.domain();
            let [yd0, yd1] = y.domain();
            let reach = xd1.max(yd1).max(-xd0).max(-yd0);
            (root_depth, root_depth + reach)
        } else {
            let [xd0, xd1] = x.domain();
            (xd0, xd1)
        };
        Self { x, y, layout, x_min, x_max }
    }

    fn path(&self, point: &GridPoint) -> String {
        let v = point.position;
        match point.axis {
            Axis::X if self.layout == LayoutMode::Radial => {
                let x_pos = self.x.apply(v - self.x_min);
                let y0 = self.y.apply(0.0);
                format!(
                    "M {} {} A {} {} 0 1 0 {} {}",
                    js_number(x_pos),
                    js_number(y0),
                    js_number(x_pos - self.x.apply(0.0)),
                    js_number(self.y.apply(v) - self.y.apply(self.x_min)),
                    js_number(x_pos),
                    js_number(y0 + 0.001),
                )
            }
            Axis::X => {
                let x_pos = js_number(self.x.apply(v));
                let [r0, r1] = self.y.range();
                format!("M{} {} L {} {}", x_pos, js_number(r1), x_pos, js_number(r0))
            }
            Axis::Y => {
                let y_pos = js_number(self.y.apply(v));
                format!(
                    "M{} {} L {} {}",
                    js_number(self.x.apply(self.x_min) + 20.0),
                    y_pos,
                    js_number(self.x.apply(self.x_max)),
                    y_pos
                )
            }
        }
    }

    fn label(&self, point: &GridPoint, precision_x: usize, precision_y: usize) -> GridLabel {
        let v = point.position;
        let radial = self.layout == LayoutMode::Radial;
        let (x, y, anchor, precision) = match point.axis {
            Axis::X if radial => (
                self.x.apply(0.0),
                self.y.apply(v - self.x_min) - 5.0,
                TextAnchor::End,
                precision_x,
            ),
            Axis::X => (self.x.apply(v), self.y.range()[1] + 18.0, TextAnchor::Middle, precision_x),
            Axis::Y => (self.x.range()[0] - 15.0, self.y.apply(v), TextAnchor::Start, precision_y),
        };
        GridLabel {
            text: to_fixed(v, precision),
            x,
            y,
            anchor,
            visibility: point.visibility,
            axis: point.axis,
        }
    }
}

/// Compute gridlines and labels for the current scales and layout.
/// Returns an empty layout for unrooted trees.
pub fn compute_grid(
    x_scale: &AxisScale,
    y_scale: &AxisScale,
    layout: LayoutMode,
    params: &GridParams,
) -> Result<GridLayout, GridError> {
    if layout == LayoutMode::Unrooted {
        log::debug!("Grid disabled for unrooted layout");
        return Ok(GridLayout::default());
    }
    let num_minor_ticks = params.num_minor_ticks();
    if num_minor_ticks == 0 {
        return Err(GridError::NoMinorTicks);
    }

    let geo = Geometry::new(x_scale, y_scale, layout, params.root_depth);
    let (x_min, x_max) = (geo.x_min, geo.x_max);
    let range = check_range(Axis::X, x_min, x_max)?;
    let step = major_grid_separation(range);

    let grid_min = (x_min / step).floor() * step;
    let min_vis = if layout == LayoutMode::Radial { x_min } else { grid_min };
    let max_vis = x_max;

    let mut major_points = emit_points(
        grid_min,
        step,
        0,
        (x_max - grid_min) / step + MAJOR_PADDING_STEPS,
        min_vis,
        max_vis,
        Axis::X,
    );

    let minor_step = step / f64::from(num_minor_ticks);
    let minor_points = emit_points(
        grid_min,
        minor_step,
        0,
        (x_max - grid_min) / minor_step + MINOR_PADDING_STEPS,
        min_vis,
        max_vis + minor_step,
        Axis::X,
    );

    let mut y_step = None;
    if layout == LayoutMode::Clock {
        let (y_min, y_max) = (y_scale.domain_min(), y_scale.domain_max());
        let step_y = major_grid_separation(check_range(Axis::Y, y_min, y_max)?);
        let grid_y_min = (y_min / step_y).floor() * step_y;
        major_points.extend(emit_points(
            grid_y_min,
            step_y,
            1,
            (y_max - grid_y_min) / step_y + Y_PADDING_STEPS,
            grid_y_min,
            y_max,
            Axis::Y,
        ));
        y_step = Some(step_y);
    }

    let precision_x = label_precision(step);
    let precision_y = y_step.map(label_precision).unwrap_or(0);

    let major_paths = major_points.iter().map(|p| geo.path(p)).collect();
    let minor_paths = minor_points.iter().map(|p| geo.path(p)).collect();
    let labels = major_points
        .iter()
        .map(|p| geo.label(p, precision_x, precision_y))
        .collect();

    log::debug!(
        "Grid for {} layout: step {} ({} major, {} minor points)",
        layout,
        step,
        major_points.len(),
        minor_points.len()
    );

    Ok(GridLayout {
        major_points,
        minor_points,
        major_paths,
        minor_paths,
        labels,
        step: Some(step),
        y_step,
    })
}
