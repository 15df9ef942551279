//! Graph model types.
//!
//! Node sizes are inputs; node positions and edge waypoints are filled in by a
//! [`crate::layout::LayoutOracle`].

use crate::config::NarwhalConfig;
use crate::error::{Error, Result};
use crate::geom::{Point, Rect, Vector, VectorExt, point, rect, vector};
use serde::{Deserialize, Serialize};

/// Primary flow axis of the hierarchical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    #[serde(alias = "TOP_TO_BOTTOM")]
    TB,
    #[serde(alias = "BOTTOM_TO_TOP")]
    BT,
    #[serde(alias = "LEFT_TO_RIGHT")]
    LR,
    #[serde(alias = "RIGHT_TO_LEFT")]
    RL,
}

impl RankDir {
    /// Unit vector pointing downstream.
    pub fn flow(self) -> Vector {
        match self {
            RankDir::TB => vector(0.0, 1.0),
            RankDir::BT => vector(0.0, -1.0),
            RankDir::LR => vector(1.0, 0.0),
            RankDir::RL => vector(-1.0, 0.0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, RankDir::TB | RankDir::BT)
    }
}

impl std::str::FromStr for RankDir {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" | "TD" | "TOP_TO_BOTTOM" => Ok(RankDir::TB),
            "BT" | "BOTTOM_TO_TOP" => Ok(RankDir::BT),
            "LR" | "LEFT_TO_RIGHT" => Ok(RankDir::LR),
            "RL" | "RIGHT_TO_LEFT" => Ok(RankDir::RL),
            _ => Err(Error::InvalidConfig {
                key: "layout.rankDirection".to_string(),
                message: format!("unknown rank direction `{s}`"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    pub rank_direction: RankDir,
    pub node_sep: f64,
    pub rank_sep: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            rank_direction: RankDir::TB,
            node_sep: 50.0,
            rank_sep: 50.0,
        }
    }
}

impl LayoutOptions {
    pub fn from_config(config: &NarwhalConfig) -> Result<Self> {
        let mut out = Self::default();
        if let Some(dir) = config.get_str("layout.rankDirection") {
            out.rank_direction = dir.parse()?;
        }
        if let Some(v) = config.get_f64("layout.nodeSep") {
            out.node_sep = v;
        }
        if let Some(v) = config.get_f64("layout.rankSep") {
            out.rank_sep = v;
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Center, assigned by layout.
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            x: None,
            y: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn center(&self) -> Option<Point> {
        Some(point(self.x?, self.y?))
    }

    pub fn set_center(&mut self, center: Point) {
        self.x = Some(center.x);
        self.y = Some(center.y);
    }

    pub fn bounds(&self) -> Option<Rect> {
        let c = self.center()?;
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        Some(rect(c.x - hw, c.y - hh, c.x + hw, c.y + hh))
    }

    fn half_extent_along(&self, dir: RankDir) -> Vector {
        dir.flow()
            .component_mul(vector(self.width / 2.0, self.height / 2.0))
    }

    /// Where incoming edges attach: the upstream side of the node.
    pub fn input_connector(&self, dir: RankDir) -> Option<Point> {
        Some(self.center()? - self.half_extent_along(dir))
    }

    /// Where outgoing edges leave: the downstream side of the node.
    pub fn output_connector(&self, dir: RankDir) -> Option<Point> {
        Some(self.center()? + self.half_extent_along(dir))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub src: String,
    pub dest: String,
    /// Waypoints from the layout oracle. After connector pinning the first and last entries
    /// sit on the endpoint connectors.
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Edge {
    pub fn new(id: impl Into<String>, src: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
            dest: dest.into(),
            points: Vec::new(),
        }
    }

    pub fn with_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.points = points.into_iter().collect();
        self
    }
}

/// Rewrites the first and last waypoints onto the src output / dest input connectors.
///
/// Lists shorter than two entries are padded first, so the result always has at least two
/// points. Returns `false` (leaving `points` untouched) when either endpoint has no
/// position yet.
pub fn pin_connectors(src: &Node, dest: &Node, points: &mut Vec<Point>, dir: RankDir) -> bool {
    let (Some(start), Some(end)) = (src.output_connector(dir), dest.input_connector(dir)) else {
        return false;
    };
    while points.len() < 2 {
        points.push(Point::origin());
    }
    let last = points.len() - 1;
    points[0] = start;
    points[last] = end;
    true
}
