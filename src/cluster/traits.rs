//! Clustering traits.

use crate::error::Result;
use crate::points::PointSet;

/// Trait for clustering algorithms.
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input point, each in `0..k`.
    fn fit_predict(&self, points: &PointSet) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}

/// Trait for soft clustering algorithms that return membership weights.
pub trait SoftClustering: Clustering {
    /// Fit and return soft cluster assignments.
    ///
    /// Returns a matrix where entry \[i\]\[k\] is the (unnormalized, non-negative)
    /// weight of point i in cluster k.
    fn fit_predict_proba(&self, points: &PointSet) -> Result<Vec<Vec<f64>>>;
}
