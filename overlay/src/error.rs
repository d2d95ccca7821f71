use crate::model::Handle;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("vertex {0} not found")]
    VertexNotFound(Handle),

    #[error("edge {0} not found")]
    EdgeNotFound(Handle),

    #[error("{0} is neither a vertex nor an edge of the graph")]
    HandleNotFound(Handle),

    #[error("no segment to split on edge {0}")]
    NoSegmentFound(Handle),

    #[error("cannot connect vertex {0} to itself")]
    SelfLoop(Handle),

    #[error("coordinates out of bounds")]
    OutOfBounds,

    #[error("limit exceeded: {0}")]
    Limit(&'static str),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("vertex {0} not found in graph")]
    VertexNotFound(u64),
}

/// Failures reported by a spatial store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("entity {0} does not exist")]
    Missing(Handle),

    #[error("entity {0} has no usable geometry")]
    NoGeometry(Handle),

    #[error("store refused the request: {0}")]
    Refused(String),
}
