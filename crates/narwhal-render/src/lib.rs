#![forbid(unsafe_code)]

//! Headless edge-path smoothing and pan/zoom camera for graph canvases.
//!
//! - [`paths`] turns laid-out edges into SVG path data (`d` attributes, arrowhead polygons).
//! - [`camera`] owns the view transform, its animations and the device/view/world coordinate
//!   conversions used to interpret pointer input.
//!
//! Nothing here touches a window system; hosts plug in through the traits in
//! [`camera::host`].

pub mod camera;
pub mod error;
mod fmt;
pub mod paths;

pub use camera::{Camera, CameraBuilder, CameraOptions, PanListenerId};
pub use error::{Error, Result};
pub use paths::{
    PathOptions, PathPointData, curved_path, curved_path_with, pinned_route, points_to_lines,
    triangle_points, triangle_points_with,
};
