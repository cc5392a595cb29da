pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Duplicate node id: {id}")]
    DuplicateNodeId { id: String },

    #[error("Edge {edge_id} references missing node: {node_id}")]
    DanglingEdgeReference { edge_id: String, node_id: String },

    #[error("Invalid layout config: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f64 },

    #[error("Unknown layout direction: {0} (expected TB, BT, LR or RL)")]
    InvalidDirection(String),

    #[error("Layout engine failure: {message}")]
    LayoutEngineFailure { message: String },

    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("Unknown view: {key}")]
    UnknownView { key: String },

    #[error("Layout is not available for view: {key}")]
    LayoutUnavailable { key: String },

    #[error("Diagram catalog is empty")]
    EmptyCatalog,

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification used by callers that only care where a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The nodes, edges, config or document handed in are malformed.
    InvalidInput,
    /// The layout engine failed or returned an inconsistent result.
    LayoutEngineFailure,
    /// The requested view does not exist or does not support the operation.
    View,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DuplicateNodeId { .. }
            | Error::DanglingEdgeReference { .. }
            | Error::InvalidConfig { .. }
            | Error::InvalidDirection(_)
            | Error::InvalidSchema { .. }
            | Error::Json(_) => ErrorKind::InvalidInput,
            Error::LayoutEngineFailure { .. } => ErrorKind::LayoutEngineFailure,
            Error::UnknownView { .. } | Error::LayoutUnavailable { .. } | Error::EmptyCatalog => {
                ErrorKind::View
            }
            Error::Io(_) => ErrorKind::Io,
        }
    }
}
