//! Property-based tests for recall and edge batching.
//!
//! - Recall is always in [0, 1]
//! - Identical spaces give recall 1 everywhere
//! - Every undirected edge lands in exactly one group

use proptest::prelude::*;
use qntx_embedviz::{
    neighbor_recall, Adjacency, EdgeBatcher, ExactSearch, GroupKind, LabelVector, PointMatrix,
    SelfMatch,
};

prop_compose! {
    fn arb_points(n: usize, dims: usize)(data in prop::collection::vec(-10.0f32..10.0, n * dims)) -> PointMatrix {
        PointMatrix::from_flat(data, n, dims).unwrap()
    }
}

fn arb_self_match() -> impl Strategy<Value = SelfMatch> {
    prop_oneof![Just(SelfMatch::Include), Just(SelfMatch::Exclude)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn recall_in_unit_interval(
        high in arb_points(20, 6),
        low in arb_points(20, 2),
        k in 1usize..20,
        self_match in arb_self_match(),
    ) {
        let recall = neighbor_recall(&ExactSearch::new(), &high, &low, k, self_match).unwrap();
        prop_assert_eq!(recall.len(), 20);
        for r in &recall {
            prop_assert!((0.0..=1.0).contains(r), "recall out of range: {}", r);
        }
        let mean = recall.iter().sum::<f32>() / recall.len() as f32;
        prop_assert!((0.0..=1.0).contains(&mean));
    }

    #[test]
    fn identical_spaces_recall_one(
        points in arb_points(15, 3),
        k in 1usize..15,
        self_match in arb_self_match(),
    ) {
        let recall = neighbor_recall(&ExactSearch::new(), &points, &points, k, self_match).unwrap();
        prop_assert!(recall.iter().all(|&r| r == 1.0), "recall {:?}", recall);
    }

    #[test]
    fn edges_partitioned_exactly_once(
        raw_labels in prop::collection::vec(-3i64..3, 12),
        pairs in prop::collection::vec((0usize..12, 0usize..12), 0..40),
    ) {
        let labels = LabelVector::normalize(&raw_labels).unwrap();
        let adj = Adjacency::from_edges(12, &pairs).unwrap();
        let groups = EdgeBatcher::new(adj.edges(), &labels).groups();

        let mut seen: Vec<(usize, usize)> = groups.iter().flat_map(|g| g.edges.clone()).collect();
        prop_assert_eq!(seen.len(), adj.n_edges());
        seen.sort_unstable();
        prop_assert_eq!(seen.as_slice(), adj.edges());

        for group in &groups {
            for &(i, j) in &group.edges {
                match group.kind {
                    GroupKind::Intra(l) => {
                        prop_assert_eq!(labels.get(i), l);
                        prop_assert_eq!(labels.get(j), l);
                    }
                    GroupKind::Inter => prop_assert_ne!(labels.get(i), labels.get(j)),
                }
            }
        }
    }
}
