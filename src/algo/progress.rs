//! Progress reporting for long-running algorithms.
//!
//! Algorithms with a `*_with_progress` variant call back into a [`Progress`]
//! as they go.
//!
//! # Example
//!
//! ```
//! use wiremesh::algo::progress::Progress;
//! use wiremesh::algo::reconstruct::{reconstruct_all_faces_with_progress, ReconstructOptions};
//! use wiremesh::mesh::make_icosahedron_wireframe;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//!
//! let mut mesh = make_icosahedron_wireframe();
//! reconstruct_all_faces_with_progress(&mut mesh, &ReconstructOptions::default(), &progress)
//!     .unwrap();
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Work done so far
/// - `total`: Total amount of work
/// - `message`: Description of the current operation
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_report_forwards_to_callback() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let progress = Progress::new(move |current, total, message| {
            sink.lock().unwrap().push((current, total, message.to_string()));
        });

        progress.report(1, 4, "first");
        progress.report(4, 4, "done");
        assert_eq!(
            *log.lock().unwrap(),
            vec![(1, 4, "first".to_string()), (4, 4, "done".to_string())]
        );
    }

    #[test]
    fn test_none_and_debug() {
        let progress = Progress::default();
        progress.report(0, 0, "ignored");
        assert_eq!(format!("{:?}", progress), "Progress { .. }");
    }
}
