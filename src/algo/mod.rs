//! Mesh algorithms.
//!
//! - **Traversal**: depth-first search, connected components, pruning of
//!   dangling vertices
//! - **Reconstruction**: recovering polygon faces from a vertices-and-edges mesh
//! - **Progress**: callbacks for long-running operations

pub mod progress;
pub mod reconstruct;
pub mod traversal;
