//! Hard labels from algorithm outputs.
//!
//! Both algorithms end up as one label per point so they can be scored with
//! the same metric. Ties resolve to the lowest index, the same rule the
//! K-means assignment step uses for equidistant centroids.

use crate::error::{Error, Result};
use ndarray::Array2;

/// Row-wise argmax of a SymNMF factor `H`.
///
/// `labels[i]` is the column with the largest weight in row `i`; equal
/// weights keep the earlier column.
pub fn labels_from_h(h: &Array2<f64>) -> Vec<usize> {
    h.rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            for (j, &v) in row.iter().enumerate().skip(1) {
                if v > row[best] {
                    best = j;
                }
            }
            best
        })
        .collect()
}

/// Dense label vector from K-means membership lists.
///
/// `clusters[c]` holds the point indices of cluster `c`. The lists must
/// partition `0..n` exactly once each.
pub fn labels_from_clusters(clusters: &[Vec<usize>], n: usize) -> Result<Vec<usize>> {
    let mut labels: Vec<Option<usize>> = vec![None; n];

    for (c, members) in clusters.iter().enumerate() {
        for &i in members {
            let slot = labels.get_mut(i).ok_or(Error::InvalidParameter {
                name: "clusters",
                message: "point index out of range",
            })?;
            if slot.is_some() {
                return Err(Error::InvalidParameter {
                    name: "clusters",
                    message: "point assigned to more than one cluster",
                });
            }
            *slot = Some(c);
        }
    }

    labels
        .into_iter()
        .map(|l| {
            l.ok_or(Error::InvalidParameter {
                name: "clusters",
                message: "point missing from every cluster",
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_labels_from_h_argmax() {
        let h = array![[0.9, 0.1], [0.2, 0.7], [0.0, 0.0], [0.3, 0.3]];
        assert_eq!(labels_from_h(&h), vec![0, 1, 0, 0]);
    }

    #[test]
    fn test_labels_from_h_three_columns() {
        let h = array![[0.1, 0.5, 0.5], [0.1, 0.2, 0.6]];
        assert_eq!(labels_from_h(&h), vec![1, 2]);
    }

    #[test]
    fn test_labels_from_clusters() {
        let clusters = vec![vec![1, 3], vec![0], vec![2, 4]];
        assert_eq!(labels_from_clusters(&clusters, 5).unwrap(), vec![1, 0, 2, 0, 2]);
    }

    #[test]
    fn test_labels_from_clusters_rejects_bad_partitions() {
        assert!(labels_from_clusters(&[vec![0, 1], vec![1]], 2).is_err());
        assert!(labels_from_clusters(&[vec![0], vec![]], 2).is_err());
        assert!(labels_from_clusters(&[vec![0, 7], vec![1]], 2).is_err());
    }
}
