//! Error types for wiremesh.
//!
//! Recoverable failures are reported through [`MeshError`]. Misuse of handles
//! (reading a removed element, closing a face over an open boundary) is a
//! programming error and panics instead.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The input has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face (or edge) index in the input list.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three corners or repeats a corner.
    #[error("face {face} is degenerate (fewer than three distinct corners)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge connects a vertex to itself.
    #[error("edge {edge} is degenerate (both ends are vertex {vertex})")]
    DegenerateEdge {
        /// The edge index in the input list.
        edge: usize,
        /// The repeated vertex index.
        vertex: usize,
    },

    /// A topology invariant does not hold.
    #[error("topology invariant violated: {0}")]
    Topology(String),

    /// Face reconstruction found no starting move.
    #[error(
        "face reconstruction cannot proceed: no 3-degree vertex and no triangle loop among {eligible_halfedges} eligible half-edges"
    )]
    ReconstructionStalled {
        /// Number of half-edges that passed the mask.
        eligible_halfedges: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
