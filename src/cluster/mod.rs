//! Clustering algorithms.
//!
//! Two independent ways of splitting a [`PointSet`](crate::PointSet) into k
//! groups, both ending in one label per point.
//!
//! ## Hard vs Soft Clustering
//!
//! **Hard clustering** assigns each item to exactly one cluster. K-means does
//! this directly.
//!
//! **Soft clustering** gives each item a weight per cluster. SymNMF produces a
//! non-negative `n × k` factor `H`; row `i` says how strongly point `i` belongs
//! to each cluster, and the hard label is the row-wise argmax.
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! Assign each point to the nearest centroid, then move centroids to the mean
//! of their points. Repeat. Centroids are seeded with the first k points.
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**: roughly spherical clusters of similar size, k known.
//!
//! ### SymNMF
//!
//! Build the normalized Gaussian similarity graph `A` and factor it as
//! `A ≈ H Hᵀ` with `H ≥ 0`:
//!
//! ```text
//! min_{H ≥ 0} ||A - H Hᵀ||²_F
//! ```
//!
//! **When to use**: clusters that are connected through chains of close
//! points rather than compact around a center. Costs O(n²) memory for `A`.
//!
//! ## Usage
//!
//! ```rust
//! use symnmf::cluster::{Clustering, Kmeans, SymNmf};
//! use symnmf::PointSet;
//!
//! let points = PointSet::new(vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![10.0, 10.0],
//!     vec![10.0, 11.0],
//! ])
//! .unwrap();
//!
//! let labels = Kmeans::new(2).fit_predict(&points).unwrap();
//! assert_eq!(labels, vec![0, 0, 1, 1]);
//!
//! let fit = SymNmf::new(2).with_seed(1234).fit(&points).unwrap();
//! assert_eq!(fit.h.dim(), (4, 2));
//! assert!(fit.h.iter().all(|&v| v >= 0.0));
//! ```

mod kmeans;
mod labels;
mod symnmf;
mod traits;

pub use kmeans::{
    run_kmeans, Kmeans, KmeansFit, DEFAULT_EPSILON, DEFAULT_MAX_ITER, KMEANS_CLI_MAX_ITER,
};
pub use labels::{labels_from_clusters, labels_from_h};
pub use symnmf::{
    decompose, initial_factor, SymNmf, SymNmfFit, DEFAULT_SEED, DEFAULT_STABILITY,
};
pub use traits::{Clustering, SoftClustering};
