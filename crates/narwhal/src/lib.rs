#![forbid(unsafe_code)]

//! `narwhal` is a headless engine for interactive graph canvases.
//!
//! The graph model, the layout seam and the geometry types come from `narwhal-core` and are
//! re-exported at the crate root.
//!
//! # Features
//!
//! - `render`: enable edge path smoothing, the pan/zoom camera and the [`render::GraphView`]
//!   that ties them to a graph

pub use narwhal_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use narwhal_render::camera::animation::Channel;
    pub use narwhal_render::camera::host;
    pub use narwhal_render::paths::{
        PathOptions, PathPointData, curved_path, curved_path_with, path_point_data, pinned_route,
        points_to_lines, triangle_points, triangle_points_with,
    };
    pub use narwhal_render::{Camera, CameraBuilder, CameraOptions, PanListenerId};

    mod view;
    pub use view::{EdgeGeometry, GraphView};

    #[derive(Debug, thiserror::Error)]
    pub enum NarwhalError {
        #[error(transparent)]
        Graph(#[from] narwhal_core::Error),
        #[error(transparent)]
        Render(#[from] narwhal_render::Error),
    }

    pub type Result<T> = std::result::Result<T, NarwhalError>;
}
