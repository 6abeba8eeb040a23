//! Side-by-side comparison of SymNMF and K-means on one point set.
//!
//! Both algorithms run independently on the same points with the same k,
//! each result is reduced to hard labels, and each labeling is scored with
//! the silhouette coefficient. Higher is better.

use crate::cluster::{Kmeans, SymNmf};
use crate::error::{Error, Result};
use crate::metrics::silhouette_score;
use crate::points::PointSet;
use std::collections::HashSet;
use tracing::debug;

/// Settings for both runs. Caps and thresholds are independent.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisConfig {
    /// K-means iteration cap.
    pub kmeans_max_iter: usize,
    /// K-means centroid-shift threshold.
    pub kmeans_epsilon: f64,
    /// SymNMF iteration cap.
    pub symnmf_max_iter: usize,
    /// SymNMF Frobenius-change threshold.
    pub symnmf_epsilon: f64,
    /// Seed for the SymNMF initial factor.
    pub seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            kmeans_max_iter: crate::cluster::DEFAULT_MAX_ITER,
            kmeans_epsilon: crate::cluster::DEFAULT_EPSILON,
            symnmf_max_iter: crate::cluster::DEFAULT_MAX_ITER,
            symnmf_epsilon: crate::cluster::DEFAULT_EPSILON,
            seed: crate::cluster::DEFAULT_SEED,
        }
    }
}

/// Silhouette scores of the two labelings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// SymNMF silhouette.
    pub nmf: f64,
    /// K-means silhouette.
    pub kmeans: f64,
}

/// Cluster `points` into `k` groups with both algorithms and score each.
///
/// Fails if either labeling uses fewer than two distinct clusters.
pub fn compare(points: &PointSet, k: usize, config: &AnalysisConfig) -> Result<Comparison> {
    let symnmf = SymNmf::new(k)
        .with_max_iter(config.symnmf_max_iter)
        .with_epsilon(config.symnmf_epsilon)
        .with_seed(config.seed);
    let kmeans = Kmeans::new(k)
        .with_max_iter(config.kmeans_max_iter)
        .with_epsilon(config.kmeans_epsilon);

    let run_nmf = || symnmf.fit(points).map(|fit| fit.labels());
    let run_kmeans = || kmeans.fit(points).map(|fit| fit.into_labels());

    #[cfg(feature = "parallel")]
    let (nmf_labels, kmeans_labels) = rayon::join(run_nmf, run_kmeans);
    #[cfg(not(feature = "parallel"))]
    let (nmf_labels, kmeans_labels) = (run_nmf(), run_kmeans());

    let nmf_labels = nmf_labels?;
    let kmeans_labels = kmeans_labels?;

    for labels in [&nmf_labels, &kmeans_labels] {
        let distinct = labels.iter().collect::<HashSet<_>>().len();
        if distinct < 2 {
            return Err(Error::DegenerateLabels { distinct });
        }
    }

    let comparison = Comparison {
        nmf: silhouette_score(points, &nmf_labels)?,
        kmeans: silhouette_score(points, &kmeans_labels)?,
    };
    debug!(nmf = comparison.nmf, kmeans = comparison.kmeans, "silhouette comparison");
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_blobs() -> PointSet {
        let centers = [(0.0, 0.0), (6.0, 0.0), (0.0, 6.0)];
        let offsets = [(0.0, 0.0), (0.3, 0.1), (-0.2, 0.3), (0.1, -0.3), (-0.3, -0.1)];
        let mut rows = Vec::new();
        for &(cx, cy) in &centers {
            for &(dx, dy) in &offsets {
                rows.push(vec![cx + dx, cy + dy]);
            }
        }
        PointSet::new(rows).unwrap()
    }

    #[test]
    fn test_compare_scores_in_range() {
        let cmp = compare(&three_blobs(), 3, &AnalysisConfig::default()).unwrap();
        assert!((-1.0..=1.0).contains(&cmp.nmf));
        assert!((-1.0..=1.0).contains(&cmp.kmeans));
    }

    #[test]
    fn test_compare_deterministic() {
        let config = AnalysisConfig::default();
        let a = compare(&three_blobs(), 3, &config).unwrap();
        let b = compare(&three_blobs(), 3, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_compare_invalid_k() {
        assert!(compare(&three_blobs(), 1, &AnalysisConfig::default()).is_err());
        assert!(compare(&three_blobs(), 15, &AnalysisConfig::default()).is_err());
    }
}
