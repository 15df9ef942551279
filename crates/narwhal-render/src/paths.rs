//! Edge path smoothing.
//!
//! The layout oracle hands us a polyline per edge. We turn it into a cubic-bezier `d` string
//! whose control handles either follow the layout flow (so edges leave and enter nodes
//! straight along the rank axis) or smooth through the local geometry when the flow is not a
//! meaningful guide: the edge runs against the flow somewhere, or the waypoint barely bends
//! the route.

use crate::error::Result;
use crate::fmt::fmt_pair_into;
use narwhal_core::config::NarwhalConfig;
use narwhal_core::geom::{Point, Vector, VectorExt, between, distance_from_line};
use narwhal_core::{Edge, Error as CoreError, Graph, LayoutOptions, Node, RankDir, pin_connectors};

/// Tunables of the smoothing pass. Defaults match the stock look.
#[derive(Debug, Clone, PartialEq)]
pub struct PathOptions {
    /// Handle length for points curved along the layout flow.
    pub curve_length: f64,
    /// Handle length for smoothed points.
    pub smooth_length: f64,
    /// Decimal places smoothed handles are rounded to.
    pub smooth_decimals: u32,
    /// Interior points closer than this to the line through their neighbours are smoothed.
    pub unimportant_distance: f64,
    /// Side length of the arrowhead triangle.
    pub arrow_side: f64,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            curve_length: 20.0,
            smooth_length: 2.0,
            smooth_decimals: 2,
            unimportant_distance: 20.0,
            arrow_side: 10.0,
        }
    }
}

impl PathOptions {
    pub fn from_config(config: &NarwhalConfig) -> Self {
        let mut out = Self::default();
        if let Some(v) = config.get_f64("paths.curveLength") {
            out.curve_length = v;
        }
        if let Some(v) = config.get_f64("paths.smoothLength") {
            out.smooth_length = v;
        }
        if let Some(v) = config.get_f64("paths.smoothDecimals") {
            out.smooth_decimals = v.clamp(0.0, 12.0) as u32;
        }
        if let Some(v) = config.get_f64("paths.unimportantDistance") {
            out.unimportant_distance = v;
        }
        if let Some(v) = config.get_f64("paths.arrowSide") {
            out.arrow_side = v;
        }
        out
    }
}

/// A waypoint with the two bezier handles attached to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPointData {
    pub point: Point,
    pub incoming_control: Point,
    pub outgoing_control: Point,
}

/// Whether any segment moves against the layout flow on either axis.
pub fn is_path_backwards(points: &[Point], dir: RankDir) -> bool {
    let flow = dir.flow();
    points.windows(2).any(|w| {
        let along = between(w[0], w[1]).component_mul(flow);
        along.x < 0.0 || along.y < 0.0
    })
}

/// Whether `point` sits within `threshold` of the straight line through its neighbours.
pub fn is_point_unimportant(prior: Point, point: Point, next: Point, threshold: f64) -> bool {
    distance_from_line(point, prior, next) <= threshold
}

/// Computes the handles for every point of an already pinned route.
pub fn path_point_data(points: &[Point], dir: RankDir, opts: &PathOptions) -> Vec<PathPointData> {
    let backwards = is_path_backwards(points, dir);
    let flow_handle = dir.flow() * opts.curve_length;
    let last = points.len().saturating_sub(1);

    points
        .iter()
        .enumerate()
        .map(|(i, &point)| {
            let prior = if i > 0 { points[i - 1] } else { point };
            let next = points.get(i + 1).copied().unwrap_or(point);
            let endpoint = i == 0 || i == last;
            let smooth = backwards
                || (!endpoint
                    && is_point_unimportant(prior, point, next, opts.unimportant_distance));

            let handle: Vector = if smooth {
                (between(prior, next).normalized_or_zero() * opts.smooth_length)
                    .rounded_to(opts.smooth_decimals)
            } else {
                flow_handle
            };

            PathPointData {
                point,
                incoming_control: point - handle,
                outgoing_control: point + handle,
            }
        })
        .collect()
}

/// Assembles `M` plus one `C` segment per consecutive pair.
pub fn bezier_path_d(data: &[PathPointData]) -> String {
    let Some(first) = data.first() else {
        return String::new();
    };
    let mut out = String::with_capacity(16 + data.len() * 40);
    out.push_str("M ");
    fmt_pair_into(&mut out, first.point.x, first.point.y);
    for w in data.windows(2) {
        let (a, b) = (&w[0], &w[1]);
        out.push_str(" C ");
        fmt_pair_into(&mut out, a.outgoing_control.x, a.outgoing_control.y);
        out.push(' ');
        fmt_pair_into(&mut out, b.incoming_control.x, b.incoming_control.y);
        out.push(' ');
        fmt_pair_into(&mut out, b.point.x, b.point.y);
    }
    out
}

/// Smooth path from `src`'s output connector to `dest`'s input connector through the
/// interior `points`. The first and last entries of `points` are replaced by the connectors.
pub fn curved_path_between(
    src: &Node,
    dest: &Node,
    points: &[Point],
    layout: &LayoutOptions,
    opts: &PathOptions,
) -> Result<String> {
    let dir = layout.rank_direction;
    let route = pin_route(src, dest, points, dir)?;
    Ok(bezier_path_d(&path_point_data(&route, dir, opts)))
}

fn pin_route(src: &Node, dest: &Node, points: &[Point], dir: RankDir) -> Result<Vec<Point>> {
    let mut route = points.to_vec();
    if !pin_connectors(src, dest, &mut route, dir) {
        let unplaced = if src.center().is_none() { src } else { dest };
        return Err(CoreError::MissingPosition {
            node_id: unplaced.id.clone(),
        }
        .into());
    }
    Ok(route)
}

/// The edge's waypoints with both ends moved onto the endpoints' current connectors, i.e. the
/// route `curved_path` draws through.
pub fn pinned_route(graph: &Graph, edge: &Edge, layout: &LayoutOptions) -> Result<Vec<Point>> {
    let (src, dest) = graph.endpoints(edge)?;
    pin_route(src, dest, &edge.points, layout.rank_direction)
}

pub fn curved_path_with(
    graph: &Graph,
    edge: &Edge,
    layout: &LayoutOptions,
    opts: &PathOptions,
) -> Result<String> {
    let (src, dest) = graph.endpoints(edge)?;
    curved_path_between(src, dest, &edge.points, layout, opts)
}

/// Renderable `d` attribute for an edge, with default smoothing options.
pub fn curved_path(graph: &Graph, edge: &Edge, layout: &LayoutOptions) -> Result<String> {
    curved_path_with(graph, edge, layout, &PathOptions::default())
}

/// Straight polyline through `points` (`"M x,y x,y ..."`); empty for fewer than two points.
pub fn points_to_lines<U>(points: &[narwhal_core::geom::Point<U>]) -> String {
    if points.len() < 2 {
        return String::new();
    }
    let mut out = String::from("M");
    for p in points {
        out.push(' ');
        fmt_pair_into(&mut out, p.x, p.y);
    }
    out
}

/// Arrowhead tip on `dest`'s input connector, base upstream along the flow.
pub fn triangle_vertices(dest: &Node, dir: RankDir, side: f64) -> Result<[Point; 3]> {
    let tip = dest
        .input_connector(dir)
        .ok_or_else(|| CoreError::MissingPosition {
            node_id: dest.id.clone(),
        })?;
    let flow = dir.flow();
    let height = side * 3f64.sqrt() / 2.0;
    let base = tip - flow * height;
    let half = flow.perpendicular() * (side / 2.0);
    Ok([base + half, base - half, tip])
}

/// Arrowhead polygon for an edge as `"x,y x,y x,y"`. Fails when the destination node has
/// not been positioned yet.
pub fn triangle_points(graph: &Graph, edge: &Edge, layout: &LayoutOptions) -> Result<String> {
    triangle_points_with(graph, edge, layout, &PathOptions::default())
}

pub fn triangle_points_with(
    graph: &Graph,
    edge: &Edge,
    layout: &LayoutOptions,
    opts: &PathOptions,
) -> Result<String> {
    let (_, dest) = graph.endpoints(edge)?;
    let vertices = triangle_vertices(dest, layout.rank_direction, opts.arrow_side)?;
    let mut out = String::with_capacity(48);
    for (i, p) in vertices.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        fmt_pair_into(&mut out, p.x, p.y);
    }
    Ok(out)
}
