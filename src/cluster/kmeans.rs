//! K-means clustering.
//!
//! Partitions data into k clusters by minimizing **within-cluster sum of squares**
//! (WCSS). The foundational clustering algorithm, dating to 1957 (Lloyd).
//!
//! # The Objective
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids as copies of the **first k points**
//! 2. **Assign**: Each point → nearest centroid (squared Euclidean)
//! 3. **Update**: Each centroid → mean of assigned points
//! 4. Stop once no centroid moves more than ε (Euclidean), or at the cap
//!
//! Seeding is deterministic: there is no random or k-means++ initialization,
//! so the same input always yields the same clustering. Reordering the input
//! changes the seeds and therefore possibly the result.
//!
//! # Tie Breaking and Empty Clusters
//!
//! A point equidistant from several centroids goes to the lowest centroid
//! index. A cluster that receives no points keeps its previous centroid; it
//! is never re-seeded or dropped, so the result always has exactly k
//! clusters (some possibly empty).
//!
//! # Iteration Cap
//!
//! Reaching `max_iter` without convergence is not an error. The last
//! clustering is returned and [`KmeansFit::converged`] is false.

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::points::PointSet;
use crate::util::squared_euclidean;
use ndarray::{s, Array2, ArrayView2};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default iteration cap for library and analysis runs.
pub const DEFAULT_MAX_ITER: usize = 300;

/// Default cap of the standalone `kmeans` command.
pub const KMEANS_CLI_MAX_ITER: usize = 400;

/// Default convergence threshold on per-centroid movement.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence threshold on centroid shift.
    epsilon: f64,
}

/// Result of a K-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansFit {
    /// Point indices per cluster, each list ascending. Exactly k lists.
    pub clusters: Vec<Vec<usize>>,
    /// Final `k × dim` centroids.
    pub centroids: Array2<f64>,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether every centroid moved at most ε in the last iteration.
    pub converged: bool,
    labels: Vec<usize>,
}

impl KmeansFit {
    /// Cluster label per point.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Consume the fit, keeping only the labels.
    pub fn into_labels(self) -> Vec<usize> {
        self.labels
    }
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Maximum iterations.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Convergence threshold.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn validate(&self, n: usize) -> Result<()> {
        if self.k <= 1 || self.k >= n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be finite and positive",
            });
        }
        Ok(())
    }

    /// Run Lloyd's algorithm to convergence or the iteration cap.
    pub fn fit(&self, points: &PointSet) -> Result<KmeansFit> {
        let n = points.len();
        self.validate(n)?;

        let data = points.view();
        let k = self.k;
        debug!(n, dim = points.dim(), k, max_iter = self.max_iter, "kmeans start");

        let mut centroids = data.slice(s![..k, ..]).to_owned();
        let mut labels = vec![0usize; n];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            assign(data, centroids.view(), &mut labels);
            let next = update(data, &labels, &centroids);

            let max_shift = max_centroid_shift(&centroids, &next);
            centroids = next;

            if max_shift <= self.epsilon {
                converged = true;
                break;
            }
        }

        if converged {
            debug!(iterations, "kmeans converged");
        } else {
            debug!(iterations, "kmeans reached iteration cap without converging");
        }

        let mut clusters = vec![Vec::new(); k];
        for (i, &label) in labels.iter().enumerate() {
            clusters[label].push(i);
        }

        Ok(KmeansFit {
            clusters,
            centroids,
            iterations,
            converged,
            labels,
        })
    }
}

/// Run K-means with explicit parameters.
///
/// Equivalent to `Kmeans::new(k).with_max_iter(max_iter).with_epsilon(epsilon).fit(points)`.
pub fn run_kmeans(points: &PointSet, k: usize, max_iter: usize, epsilon: f64) -> Result<KmeansFit> {
    Kmeans::new(k)
        .with_max_iter(max_iter)
        .with_epsilon(epsilon)
        .fit(points)
}

#[inline]
fn nearest(point: ndarray::ArrayView1<'_, f64>, centroids: ArrayView2<'_, f64>) -> usize {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;

    for (c, centroid) in centroids.rows().into_iter().enumerate() {
        let dist = squared_euclidean(point, centroid);
        // Strict: an equal distance keeps the earlier centroid.
        if dist < best_dist {
            best_dist = dist;
            best_cluster = c;
        }
    }
    best_cluster
}

/// Assignment step: every point to its nearest centroid.
pub(crate) fn assign(data: ArrayView2<'_, f64>, centroids: ArrayView2<'_, f64>, labels: &mut [usize]) {
    #[cfg(feature = "parallel")]
    labels.par_iter_mut().enumerate().for_each(|(i, label)| {
        *label = nearest(data.row(i), centroids);
    });

    #[cfg(not(feature = "parallel"))]
    for (i, label) in labels.iter_mut().enumerate() {
        *label = nearest(data.row(i), centroids);
    }
}

/// Update step: coordinate-wise mean per cluster; empty clusters keep `previous`.
pub(crate) fn update(data: ArrayView2<'_, f64>, labels: &[usize], previous: &Array2<f64>) -> Array2<f64> {
    let (k, d) = previous.dim();
    let mut sums = Array2::<f64>::zeros((k, d));
    let mut counts = vec![0usize; k];

    for (i, &c) in labels.iter().enumerate() {
        let mut row = sums.row_mut(c);
        row += &data.row(i);
        counts[c] += 1;
    }

    for (c, &count) in counts.iter().enumerate() {
        if count > 0 {
            sums.row_mut(c).mapv_inplace(|v| v / count as f64);
        } else {
            sums.row_mut(c).assign(&previous.row(c));
        }
    }
    sums
}

fn max_centroid_shift(old: &Array2<f64>, new: &Array2<f64>) -> f64 {
    old.rows()
        .into_iter()
        .zip(new.rows())
        .map(|(a, b)| squared_euclidean(a, b).sqrt())
        .fold(0.0, f64::max)
}

impl Clustering for Kmeans {
    fn fit_predict(&self, points: &PointSet) -> Result<Vec<usize>> {
        Ok(self.fit(points)?.into_labels())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn two_blobs() -> PointSet {
        PointSet::new(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_kmeans_basic() {
        let fit = run_kmeans(&two_blobs(), 2, 300, 1e-4).unwrap();

        assert!(fit.converged);
        assert_eq!(fit.clusters, vec![vec![0, 1], vec![2, 3]]);
        assert_eq!(fit.labels(), &[0, 0, 1, 1]);
        assert!((fit.centroids[[0, 0]] - 0.0).abs() < 1e-12);
        assert!((fit.centroids[[0, 1]] - 0.5).abs() < 1e-12);
        assert!((fit.centroids[[1, 0]] - 10.0).abs() < 1e-12);
        assert!((fit.centroids[[1, 1]] - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_kmeans_first_k_seeding_is_deterministic() {
        // Shuffled blobs: seeds are points 0 and 1, which sit in different blobs.
        let points = PointSet::new(vec![
            vec![10.0, 10.0],
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 11.0],
        ])
        .unwrap();

        let a = Kmeans::new(2).fit(&points).unwrap();
        let b = Kmeans::new(2).fit(&points).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.labels(), &[0, 1, 1, 0]);
    }

    #[test]
    fn test_kmeans_all_points_assigned() {
        let points = PointSet::new(
            (0..50)
                .map(|i| vec![i as f64 * 0.1, (i % 5) as f64])
                .collect(),
        )
        .unwrap();

        let fit = Kmeans::new(5).fit(&points).unwrap();
        assert_eq!(fit.clusters.len(), 5);

        let mut seen = HashSet::new();
        for cluster in &fit.clusters {
            for &i in cluster {
                assert!(seen.insert(i), "point {} assigned twice", i);
            }
        }
        assert_eq!(seen.len(), 50);
        assert!(fit.labels().iter().all(|&l| l < 5));
    }

    #[test]
    fn test_kmeans_tie_goes_to_lowest_index() {
        let centroids = ndarray::array![[0.0], [2.0]];
        let data = ndarray::array![[1.0]];
        let mut labels = vec![9];
        assign(data.view(), centroids.view(), &mut labels);
        assert_eq!(labels, vec![0]);
    }

    #[test]
    fn test_kmeans_empty_cluster_keeps_centroid() {
        let data = ndarray::array![[0.0], [1.0]];
        let previous = ndarray::array![[0.0], [100.0], [0.5]];
        let next = update(data.view(), &[0, 0], &previous);
        assert_eq!(next[[0, 0]], 0.5);
        assert_eq!(next[[1, 0]], 100.0);
        assert_eq!(next[[2, 0]], 0.5);
    }

    #[test]
    fn test_kmeans_idempotent_at_convergence() {
        let points = two_blobs();
        let fit = Kmeans::new(2).fit(&points).unwrap();

        let mut labels = vec![0; points.len()];
        assign(points.view(), fit.centroids.view(), &mut labels);
        let again = update(points.view(), &labels, &fit.centroids);
        assert_eq!(max_centroid_shift(&fit.centroids, &again), 0.0);
    }

    #[test]
    fn test_kmeans_single_iteration_is_not_an_error() {
        let points = PointSet::new(
            (0..30)
                .map(|i| vec![(i * 7 % 13) as f64, (i * 3 % 11) as f64])
                .collect(),
        )
        .unwrap();

        let fit = run_kmeans(&points, 3, 1, 1e-12).unwrap();
        assert_eq!(fit.iterations, 1);
        assert!(!fit.converged);
        assert_eq!(fit.labels().len(), 30);
    }

    #[test]
    fn test_kmeans_invalid_k() {
        let points = two_blobs();
        for k in [0, 1, 4, 5] {
            let err = Kmeans::new(k).fit(&points).unwrap_err();
            assert!(matches!(err, Error::InvalidClusterCount { requested, n_items: 4 } if requested == k));
        }
    }

    #[test]
    fn test_kmeans_invalid_parameters() {
        let points = two_blobs();
        assert!(Kmeans::new(2).with_max_iter(0).fit(&points).is_err());
        assert!(Kmeans::new(2).with_epsilon(0.0).fit(&points).is_err());
        assert!(Kmeans::new(2).with_epsilon(f64::NAN).fit(&points).is_err());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_assign_matches_scalar_nearest() {
        let data = Array2::from_shape_fn((200, 3), |(i, j)| ((i * 31 + j * 17) % 23) as f64 * 0.5);
        // Duplicate coordinates make ties common.
        let centroids = ndarray::array![[1.0, 1.0, 1.0], [5.0, 5.0, 5.0], [1.0, 1.0, 1.0], [9.0, 0.0, 4.5]];

        let mut labels = vec![usize::MAX; data.nrows()];
        assign(data.view(), centroids.view(), &mut labels);

        let expected: Vec<usize> = (0..data.nrows())
            .map(|i| nearest(data.row(i), centroids.view()))
            .collect();
        assert_eq!(labels, expected);
        assert!(labels.iter().all(|&l| l != 2));
    }

    #[test]
    fn test_kmeans_scaling_invariant() {
        let scaled = PointSet::new(
            two_blobs()
                .iter()
                .map(|p| p.iter().map(|x| x * 100.0).collect())
                .collect(),
        )
        .unwrap();

        let labels1 = Kmeans::new(2).fit_predict(&two_blobs()).unwrap();
        let labels2 = Kmeans::new(2).fit_predict(&scaled).unwrap();
        assert_eq!(labels1, labels2);
    }
}
