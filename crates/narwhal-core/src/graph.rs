//! Editable graph container.
//!
//! Nodes and edges keep insertion order so rendering and serialization stay deterministic.
//! Editing bookkeeping (selection, focus) lives next to the data it refers to, which lets
//! removals clean up dangling references in one place.

use crate::error::{Error, Result};
use crate::geom::{Point, Rect, union_all};
use crate::model::{Edge, Node, RankDir, pin_connectors};
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

type IndexMap<K, V> = indexmap::IndexMap<K, V, FxBuildHasher>;
type IndexSet<T> = indexmap::IndexSet<T, FxBuildHasher>;

/// Something the user can select or focus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum Item {
    Node(String),
    Edge(String),
}

/// Serialized form of a graph: plain node and edge lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    edges: IndexMap<String, Edge>,
    selection: IndexSet<Item>,
    focused: Option<Item>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(doc: GraphDocument) -> Result<Self> {
        let mut g = Self::new();
        for n in doc.nodes {
            g.add_node(n)?;
        }
        for e in doc.edges {
            g.add_edge(e)?;
        }
        Ok(g)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_document(serde_json::from_str(text)?)
    }

    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    /// Both endpoint nodes of an edge.
    pub fn endpoints(&self, edge: &Edge) -> Result<(&Node, &Node)> {
        let src = self.nodes.get(&edge.src).ok_or_else(|| Error::MissingEndpoint {
            edge_id: edge.id.clone(),
            node_id: edge.src.clone(),
        })?;
        let dest = self
            .nodes
            .get(&edge.dest)
            .ok_or_else(|| Error::MissingEndpoint {
                edge_id: edge.id.clone(),
                node_id: edge.dest.clone(),
            })?;
        Ok((src, dest))
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(Error::DuplicateNode { node_id: node.id });
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Removes a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Node> {
        let node = self.nodes.shift_remove(id).ok_or_else(|| Error::UnknownNode {
            node_id: id.to_string(),
        })?;

        let incident: Vec<String> = self
            .edges
            .values()
            .filter(|e| e.src == id || e.dest == id)
            .map(|e| e.id.clone())
            .collect();
        for edge_id in &incident {
            self.edges.shift_remove(edge_id);
            self.forget(&Item::Edge(edge_id.clone()));
        }
        self.forget(&Item::Node(id.to_string()));

        tracing::debug!(node = id, removed_edges = incident.len(), "removed node");
        Ok(node)
    }

    /// Adds an edge between two existing nodes. A second edge with the same `src -> dest`
    /// pair is rejected.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        if self.edges.contains_key(&edge.id) {
            return Err(Error::DuplicateEdge { edge_id: edge.id });
        }
        self.endpoints(&edge)?;
        if let Some(existing) = self
            .edges
            .values()
            .find(|e| e.src == edge.src && e.dest == edge.dest)
        {
            return Err(Error::DuplicateEdge {
                edge_id: existing.id.clone(),
            });
        }
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<Edge> {
        let edge = self.edges.shift_remove(id).ok_or_else(|| Error::UnknownEdge {
            edge_id: id.to_string(),
        })?;
        self.forget(&Item::Edge(id.to_string()));
        Ok(edge)
    }

    pub fn incident_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .values()
            .filter(move |e| e.src == node_id || e.dest == node_id)
    }

    /// Moves a node's center. Waypoints of incident edges are left as they are; callers
    /// re-run layout or [`Graph::pin_connectors`] afterwards.
    pub fn move_node(&mut self, id: &str, center: Point) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or_else(|| Error::UnknownNode {
            node_id: id.to_string(),
        })?;
        node.set_center(center);
        Ok(())
    }

    fn contains(&self, item: &Item) -> bool {
        match item {
            Item::Node(id) => self.nodes.contains_key(id),
            Item::Edge(id) => self.edges.contains_key(id),
        }
    }

    fn check(&self, item: &Item) -> Result<()> {
        if self.contains(item) {
            return Ok(());
        }
        Err(match item {
            Item::Node(id) => Error::UnknownNode {
                node_id: id.clone(),
            },
            Item::Edge(id) => Error::UnknownEdge {
                edge_id: id.clone(),
            },
        })
    }

    fn forget(&mut self, item: &Item) {
        self.selection.shift_remove(item);
        if self.focused.as_ref() == Some(item) {
            self.focused = None;
        }
    }

    /// Replaces the selection with a single item.
    pub fn select(&mut self, item: Item) -> Result<()> {
        self.check(&item)?;
        self.selection.clear();
        self.selection.insert(item);
        Ok(())
    }

    /// Adds the item to the selection, or removes it if already selected. Returns whether the
    /// item is selected afterwards.
    pub fn toggle_selection(&mut self, item: Item) -> Result<bool> {
        self.check(&item)?;
        if self.selection.shift_remove(&item) {
            return Ok(false);
        }
        self.selection.insert(item);
        Ok(true)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, item: &Item) -> bool {
        self.selection.contains(item)
    }

    pub fn selection(&self) -> impl Iterator<Item = &Item> {
        self.selection.iter()
    }

    /// Removes every selected node and edge. Returns how many items were deleted, counting
    /// edges dropped because one of their endpoints went away.
    pub fn delete_selection(&mut self) -> usize {
        let before = self.nodes.len() + self.edges.len();
        let items: Vec<Item> = self.selection.drain(..).collect();
        for item in items {
            // An edge may already be gone together with a selected endpoint.
            let _ = match item {
                Item::Node(id) => self.remove_node(&id).map(|_| ()),
                Item::Edge(id) => self.remove_edge(&id).map(|_| ()),
            };
        }
        before - (self.nodes.len() + self.edges.len())
    }

    pub fn focus(&mut self, item: Option<Item>) -> Result<()> {
        if let Some(item) = &item {
            self.check(item)?;
        }
        self.focused = item;
        Ok(())
    }

    pub fn focused(&self) -> Option<&Item> {
        self.focused.as_ref()
    }

    /// World-space bounds of every positioned node and every edge waypoint.
    pub fn bounding_box(&self) -> Option<Rect> {
        let node_boxes = self.nodes.values().filter_map(Node::bounds);
        let point_boxes = self
            .edges
            .values()
            .flat_map(|e| e.points.iter())
            .map(|p| Rect::new(*p, *p));
        union_all(node_boxes.chain(point_boxes))
    }

    /// Pins the first and last waypoint of every edge onto its endpoint connectors. Edges with
    /// an unpositioned endpoint are skipped; returns how many edges were updated.
    pub fn pin_connectors(&mut self, dir: RankDir) -> usize {
        let mut pinned = 0usize;
        for edge in self.edges.values_mut() {
            let (Some(src), Some(dest)) = (self.nodes.get(&edge.src), self.nodes.get(&edge.dest))
            else {
                continue;
            };
            if pin_connectors(src, dest, &mut edge.points, dir) {
                pinned += 1;
            } else {
                tracing::trace!(edge = edge.id.as_str(), "skipping unpositioned edge");
            }
        }
        pinned
    }
}
