use proptest::prelude::*;
use symnmf::{labels_from_clusters, labels_from_h, normalize, similarity, Kmeans, PointSet, SymNmf};

fn points_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..4).prop_flat_map(|d| {
        prop::collection::vec(prop::collection::vec(-3.0f64..3.0, d), 3..16)
    })
}

proptest! {
    #[test]
    fn prop_kmeans_clusters_partition_points(rows in points_strategy(), k_seed in 0usize..100) {
        let points = PointSet::new(rows).unwrap();
        let n = points.len();
        let k = 2 + k_seed % (n - 2);

        let fit = Kmeans::new(k).fit(&points).unwrap();
        prop_assert_eq!(fit.clusters.len(), k);
        prop_assert_eq!(fit.centroids.dim(), (k, points.dim()));

        let mut seen = vec![false; n];
        for cluster in &fit.clusters {
            for &i in cluster {
                prop_assert!(!seen[i]);
                seen[i] = true;
            }
        }
        prop_assert!(seen.iter().all(|&s| s));

        let labels = labels_from_clusters(&fit.clusters, n).unwrap();
        prop_assert_eq!(labels.as_slice(), fit.labels());
    }

    #[test]
    fn prop_similarity_symmetric_zero_diagonal(rows in points_strategy()) {
        let points = PointSet::new(rows).unwrap();
        let w = similarity(&points).unwrap();
        let n = points.len();
        for i in 0..n {
            prop_assert_eq!(w[[i, i]], 0.0);
            for j in 0..n {
                prop_assert_eq!(w[[i, j]], w[[j, i]]);
                prop_assert!(w[[i, j]] >= 0.0 && w[[i, j]] <= 1.0);
            }
        }
    }

    #[test]
    fn prop_symnmf_factor_non_negative(rows in points_strategy(), seed in any::<u64>()) {
        let points = PointSet::new(rows).unwrap();
        let a = normalize(&points).unwrap();

        let fit = SymNmf::new(2)
            .with_max_iter(50)
            .with_seed(seed)
            .fit_normalized(&a)
            .unwrap();
        prop_assert_eq!(fit.h.dim(), (points.len(), 2));
        prop_assert!(fit.h.iter().all(|&v| v >= 0.0 && v.is_finite()));

        let labels = labels_from_h(&fit.h);
        prop_assert!(labels.iter().all(|&l| l < 2));
    }
}
