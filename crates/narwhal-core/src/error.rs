pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node already exists: {node_id}")]
    DuplicateNode { node_id: String },

    #[error("unknown node: {node_id}")]
    UnknownNode { node_id: String },

    #[error("edge already exists: {edge_id}")]
    DuplicateEdge { edge_id: String },

    #[error("edge {edge_id} references a missing endpoint: {node_id}")]
    MissingEndpoint { edge_id: String, node_id: String },

    #[error("unknown edge: {edge_id}")]
    UnknownEdge { edge_id: String },

    /// Geometry was requested for a node the layout has not positioned yet.
    #[error("node {node_id} has no position (was layout run?)")]
    MissingPosition { node_id: String },

    #[error("layout oracle returned no position for node {node_id}")]
    IncompleteLayout { node_id: String },

    #[error("invalid config value at `{key}`: {message}")]
    InvalidConfig { key: String, message: String },

    #[error("graph JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
