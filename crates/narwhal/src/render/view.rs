use super::{NarwhalError, Result};
use narwhal_core::geom::{DeviceSpace, Point};
use narwhal_core::{Graph, Item, LayoutOptions, LayoutOracle, NarwhalConfig, apply_layout};
use narwhal_render::paths::{
    PathOptions, curved_path_with, pinned_route, points_to_lines, triangle_points_with,
};
use narwhal_render::{Camera, CameraBuilder, CameraOptions};

/// Renderable strings for one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGeometry {
    pub id: String,
    /// Cubic-bezier `d` attribute.
    pub path: String,
    /// Arrowhead polygon `points` attribute.
    pub arrowhead: String,
    /// Straight polyline through the same pinned route as `path`, for debugging overlays.
    pub polyline: String,
}

/// A graph on a canvas: the model, the options it is laid out and drawn with, and the camera
/// looking at it.
#[derive(Debug)]
pub struct GraphView {
    graph: Graph,
    layout: LayoutOptions,
    paths: PathOptions,
    camera: Camera,
}

impl GraphView {
    pub fn new(graph: Graph, camera: Camera) -> Self {
        Self {
            graph,
            layout: LayoutOptions::default(),
            paths: PathOptions::default(),
            camera,
        }
    }

    /// Reads `layout.*`, `paths.*` and `camera.*` from `config` and finishes `camera` with the
    /// resulting options.
    pub fn from_config(graph: Graph, camera: CameraBuilder, config: &NarwhalConfig) -> Result<Self> {
        let layout = LayoutOptions::from_config(config)?;
        let paths = PathOptions::from_config(config);
        let camera = camera.options(CameraOptions::from_config(config)?).build()?;
        Ok(Self {
            graph,
            layout,
            paths,
            camera,
        })
    }

    pub fn with_layout_options(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_path_options(mut self, paths: PathOptions) -> Self {
        self.paths = paths;
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Direct access for edits. Call [`GraphView::refresh_content_bounds`] afterwards if
    /// nodes were added, removed or moved.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn layout_options(&self) -> &LayoutOptions {
        &self.layout
    }

    pub fn path_options(&self) -> &PathOptions {
        &self.paths
    }

    pub fn into_parts(self) -> (Graph, Camera) {
        (self.graph, self.camera)
    }

    /// Runs the layout oracle, then fits the camera to the new drawing.
    pub fn relayout(&mut self, oracle: &dyn LayoutOracle) -> Result<()> {
        apply_layout(&mut self.graph, oracle, &self.layout)?;
        self.refresh_content_bounds();
        self.camera.reset();
        tracing::debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            zoom = self.camera.zoom(),
            "graph view relayout"
        );
        Ok(())
    }

    /// Tells the camera about the current drawing bounds without moving it.
    pub fn refresh_content_bounds(&mut self) {
        self.camera.set_content_bounds(self.graph.bounding_box());
    }

    pub fn edge_geometry(&self, edge_id: &str) -> Result<EdgeGeometry> {
        let edge = self
            .graph
            .edge(edge_id)
            .ok_or_else(|| narwhal_core::Error::UnknownEdge {
                edge_id: edge_id.to_string(),
            })?;
        Ok(EdgeGeometry {
            id: edge.id.clone(),
            path: curved_path_with(&self.graph, edge, &self.layout, &self.paths)?,
            arrowhead: triangle_points_with(&self.graph, edge, &self.layout, &self.paths)?,
            polyline: points_to_lines(&pinned_route(&self.graph, edge, &self.layout)?),
        })
    }

    /// Geometry for every edge, in insertion order.
    pub fn edges_geometry(&self) -> Result<Vec<EdgeGeometry>> {
        self.graph
            .edges()
            .map(|e| self.edge_geometry(&e.id))
            .collect()
    }

    /// `(edge id, d attribute)` for every edge.
    pub fn edge_paths(&self) -> Result<Vec<(&str, String)>> {
        self.graph
            .edges()
            .map(|e| {
                let d = curved_path_with(&self.graph, e, &self.layout, &self.paths)?;
                Ok::<_, NarwhalError>((e.id.as_str(), d))
            })
            .collect()
    }

    /// `(edge id, polygon points)` for every edge.
    pub fn arrowheads(&self) -> Result<Vec<(&str, String)>> {
        self.graph
            .edges()
            .map(|e| {
                let points = triangle_points_with(&self.graph, e, &self.layout, &self.paths)?;
                Ok::<_, NarwhalError>((e.id.as_str(), points))
            })
            .collect()
    }

    /// Focuses a node and smoothly pans it into view. Returns whether the camera moved.
    pub fn focus_node(&mut self, node_id: &str) -> Result<bool> {
        self.graph.focus(Some(Item::Node(node_id.to_string())))?;
        let node = self
            .graph
            .node(node_id)
            .ok_or_else(|| narwhal_core::Error::UnknownNode {
                node_id: node_id.to_string(),
            })?;
        Ok(self.camera.pan_node_into_view(node, None)?)
    }

    pub fn pointer_to_world(&self, pointer: Point<DeviceSpace>) -> Point {
        self.camera.dom_to_world_space(pointer)
    }

    /// Rubber-band line shown while dragging a new edge out of `src_id`: from the node's
    /// output connector to the pointer.
    pub fn drag_preview(&self, src_id: &str, pointer: Point<DeviceSpace>) -> Result<String> {
        let src = self
            .graph
            .node(src_id)
            .ok_or_else(|| narwhal_core::Error::UnknownNode {
                node_id: src_id.to_string(),
            })?;
        let start = src
            .output_connector(self.layout.rank_direction)
            .ok_or_else(|| narwhal_core::Error::MissingPosition {
                node_id: src_id.to_string(),
            })?;
        Ok(points_to_lines(&[start, self.pointer_to_world(pointer)]))
    }

    /// Drops a dragged node at the pointer and re-pins its edges.
    pub fn move_node_to_pointer(&mut self, node_id: &str, pointer: Point<DeviceSpace>) -> Result<()> {
        let world = self.pointer_to_world(pointer);
        self.graph.move_node(node_id, world)?;
        self.graph.pin_connectors(self.layout.rank_direction);
        self.refresh_content_bounds();
        Ok(())
    }

    /// Deletes the selected items and returns how many nodes and edges went away.
    pub fn delete_selection(&mut self) -> usize {
        let removed = self.graph.delete_selection();
        if removed > 0 {
            self.refresh_content_bounds();
        }
        removed
    }
}
