#![forbid(unsafe_code)]

//! Graph model, editing bookkeeping and geometry kernel (headless).
//!
//! `narwhal-core` holds everything that does not depend on a viewport: the editable
//! [`Graph`], the layout oracle seam, and the `euclid`-backed geometry types the path engine
//! and camera in `narwhal-render` are built on.

pub mod config;
pub mod error;
pub mod geom;
pub mod graph;
pub mod layout;
pub mod model;

pub use config::NarwhalConfig;
pub use error::{Error, Result};
pub use graph::{Graph, GraphDocument, Item};
pub use layout::{LayoutOracle, LayoutResult, PresetLayout, apply_layout};
pub use model::{Edge, LayoutOptions, Node, RankDir, pin_connectors};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
