//! Clustering evaluation metrics.
//!
//! Internal quality measures that need only the points and a label vector,
//! no ground truth. Used to compare K-means and SymNMF on the same data.
//!
//! # Silhouette
//!
//! For point i in cluster C:
//!
//! ```text
//! a(i) = mean distance from i to the other members of C
//! b(i) = min over clusters C' != C of the mean distance from i to C'
//! s(i) = (b(i) - a(i)) / max(a(i), b(i))
//! ```
//!
//! The score is the mean of s(i), in [-1, 1]. Near 1: tight, well separated
//! clusters. Near 0: overlapping clusters. Negative: points closer to another
//! cluster than to their own. Points alone in their cluster get s(i) = 0.
//!
//! # Example
//!
//! ```rust
//! use symnmf::metrics::silhouette_score;
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
//! let good = silhouette_score(&points, &[0, 0, 1, 1]).unwrap();
//! let bad = silhouette_score(&points, &[0, 1, 0, 1]).unwrap();
//! assert!(good > 0.9);
//! assert!(bad < 0.0);
//! ```
//!
//! # References
//!
//! - Rousseeuw (1987). "Silhouettes: a graphical aid to the interpretation and
//!   validation of cluster analysis"

use crate::error::{Error, Result};
use crate::points::PointSet;
use crate::util::squared_euclidean;
use std::collections::HashMap;

/// Mean silhouette coefficient with Euclidean distance.
///
/// `labels[i]` is the cluster of point `i`. Label values need not be dense.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if `labels.len()` differs from the number of points
/// - [`Error::DegenerateLabels`] unless there are between 2 and n − 1 distinct labels
pub fn silhouette_score(points: &PointSet, labels: &[usize]) -> Result<f64> {
    let n = points.len();
    if labels.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            found: labels.len(),
        });
    }

    let (dense, sizes) = densify(labels);
    let n_clusters = sizes.len();
    if n_clusters < 2 || n_clusters >= n {
        return Err(Error::DegenerateLabels {
            distinct: n_clusters,
        });
    }

    let mut total = 0.0;
    let mut dist_sums = vec![0.0f64; n_clusters];

    for i in 0..n {
        let own = dense[i];
        if sizes[own] == 1 {
            continue;
        }

        dist_sums.iter_mut().for_each(|s| *s = 0.0);
        let p = points.point(i);
        for j in 0..n {
            if j != i {
                dist_sums[dense[j]] += squared_euclidean(p, points.point(j)).sqrt();
            }
        }

        let a = dist_sums[own] / (sizes[own] - 1) as f64;
        let b = dist_sums
            .iter()
            .zip(sizes.iter())
            .enumerate()
            .filter(|&(c, _)| c != own)
            .map(|(_, (&sum, &size))| sum / size as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    Ok(total / n as f64)
}

/// Map arbitrary label values to `0..c` in order of first appearance.
fn densify(labels: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let mut index: HashMap<usize, usize> = HashMap::new();
    let mut sizes: Vec<usize> = Vec::new();
    let dense = labels
        .iter()
        .map(|&l| {
            let next = index.len();
            let c = *index.entry(l).or_insert(next);
            if c == sizes.len() {
                sizes.push(0);
            }
            sizes[c] += 1;
            c
        })
        .collect();
    (dense, sizes)
}
