//! # symnmf
//!
//! Clustering of dense points with two independent algorithms, K-means and
//! Symmetric Non-negative Matrix Factorization, plus the silhouette score to
//! compare them.
//!
//! The numeric core is single-threaded and owns all of its state per call.
//! The optional `parallel` feature spreads row-independent work over rayon
//! without changing results.
//!
//! ```rust
//! use symnmf::{labels_from_h, normalize, decompose, run_kmeans, PointSet};
//!
//! let points = PointSet::new(vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![10.0, 10.0],
//!     vec![10.0, 11.0],
//! ])?;
//!
//! let fit = run_kmeans(&points, 2, 300, 1e-4)?;
//! assert_eq!(fit.clusters, vec![vec![0, 1], vec![2, 3]]);
//!
//! let a = normalize(&points)?;
//! let h = decompose(&a, 2, 300, 1e-4)?;
//! assert_eq!(labels_from_h(&h).len(), 4);
//! # Ok::<(), symnmf::Error>(())
//! ```

pub mod analysis;
pub mod cluster;
/// Error types used across `symnmf`.
pub mod error;
pub mod io;
pub mod metrics;
pub mod points;
pub mod similarity;
mod util;

pub use analysis::{compare, AnalysisConfig, Comparison};
pub use cluster::{
    decompose, labels_from_clusters, labels_from_h, run_kmeans, Clustering, Kmeans, KmeansFit,
    SoftClustering, SymNmf, SymNmfFit,
};
pub use error::{Error, Result};
pub use io::{format_matrix, read_points, read_points_from_path, RowRead, RowReader};
pub use metrics::silhouette_score;
pub use points::PointSet;
pub use similarity::{degree, degree_from, degree_matrix, normalize, normalize_from, similarity};
