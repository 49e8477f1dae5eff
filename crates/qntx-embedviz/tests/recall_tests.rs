//! Neighbor recall tests against the exact search backend and a stub

use pretty_assertions::assert_eq;
use qntx_embedviz::{
    compute_neighbor_recall, compute_neighbor_recall_with, neighbor_recall, ExactSearch,
    KnnResult, NeighborSearch, PointMatrix, RecallStyle, RecallSummary, SelfMatch, VizError,
};
use std::cell::Cell;

/// Search backend that records how often it was called
struct CountingSearch {
    calls: Cell<usize>,
    inner: ExactSearch,
}

impl CountingSearch {
    fn new() -> Self {
        Self {
            calls: Cell::new(0),
            inner: ExactSearch::new(),
        }
    }
}

impl NeighborSearch for CountingSearch {
    fn kneighbors(
        &self,
        reference: &PointMatrix,
        queries: &PointMatrix,
        k: usize,
    ) -> qntx_embedviz::Result<KnnResult> {
        self.calls.set(self.calls.get() + 1);
        self.inner.kneighbors(reference, queries, k)
    }
}

/// Backend that always fails
struct BrokenSearch;

impl NeighborSearch for BrokenSearch {
    fn kneighbors(
        &self,
        _: &PointMatrix,
        _: &PointMatrix,
        _: usize,
    ) -> qntx_embedviz::Result<KnnResult> {
        Err(VizError::Search("index unavailable".to_string()))
    }
}

fn unit_square() -> PointMatrix {
    PointMatrix::from_rows(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap()
}

/// 12 points on a coarse grid in 5 dimensions, deterministic
fn high_dim() -> PointMatrix {
    let rows: Vec<Vec<f32>> = (0..12)
        .map(|i| (0..5).map(|d| ((i * (d + 3) + d * d) % 7) as f32).collect())
        .collect();
    PointMatrix::from_vecs(&rows).unwrap()
}

fn embedding() -> PointMatrix {
    let rows: Vec<[f32; 2]> = (0..12)
        .map(|i| [((i * 5) % 9) as f32, ((i * 3 + 1) % 8) as f32])
        .collect();
    PointMatrix::from_rows(&rows).unwrap()
}

fn map_rows(points: &PointMatrix, f: impl Fn(f32, f32) -> [f32; 2]) -> PointMatrix {
    let rows: Vec<[f32; 2]> = (0..points.n_points())
        .map(|i| {
            let r = points.row(i);
            f(r[0], r[1])
        })
        .collect();
    PointMatrix::from_rows(&rows).unwrap()
}

#[test]
fn test_unit_square_full_recall() {
    let style = RecallStyle {
        k: 2,
        ..Default::default()
    };
    let (recall, figure) =
        compute_neighbor_recall(&unit_square(), &unit_square(), &style).unwrap();
    assert_eq!(recall, vec![1.0, 1.0, 1.0, 1.0]);
    assert_eq!(figure.histogram_count(), 1);
}

#[test]
fn test_k_equal_n_fails_before_search() {
    let points = PointMatrix::from_rows(&[[0.0], [1.0], [2.0], [3.0], [4.0]]).unwrap();
    let search = CountingSearch::new();
    let style = RecallStyle {
        k: 5,
        ..Default::default()
    };
    let err = compute_neighbor_recall_with(&search, &points, &points, &style).unwrap_err();

    assert!(matches!(err, VizError::InvalidParameter(_)));
    assert_eq!(search.calls.get(), 0);
}

#[test]
fn test_k_zero_fails() {
    let search = CountingSearch::new();
    let err = neighbor_recall(&search, &unit_square(), &unit_square(), 0, SelfMatch::Include)
        .unwrap_err();
    assert!(matches!(err, VizError::InvalidParameter(_)));
    assert_eq!(search.calls.get(), 0);
}

#[test]
fn test_point_count_mismatch() {
    let search = CountingSearch::new();
    let err = neighbor_recall(&search, &high_dim(), &unit_square(), 2, SelfMatch::Include)
        .unwrap_err();
    assert!(matches!(err, VizError::ShapeMismatch { .. }));
    assert_eq!(search.calls.get(), 0);
}

#[test]
fn test_one_search_per_space() {
    let search = CountingSearch::new();
    neighbor_recall(&search, &high_dim(), &embedding(), 3, SelfMatch::Exclude).unwrap();
    assert_eq!(search.calls.get(), 2);
}

#[test]
fn test_search_failure_propagates() {
    let err = neighbor_recall(
        &BrokenSearch,
        &unit_square(),
        &unit_square(),
        1,
        SelfMatch::Include,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "neighbor search error: index unavailable");
}

#[test]
fn test_recall_bounded() {
    for k in 1..12 {
        for self_match in [SelfMatch::Include, SelfMatch::Exclude] {
            let recall =
                neighbor_recall(&ExactSearch::new(), &high_dim(), &embedding(), k, self_match)
                    .unwrap();
            assert_eq!(recall.len(), 12);
            assert!(recall.iter().all(|r| (0.0..=1.0).contains(r)));
            let summary = RecallSummary::from_values(&recall).unwrap();
            assert!((0.0..=1.0).contains(&summary.mean));
        }
    }
}

#[test]
fn test_isometry_invariance() {
    let high = high_dim();
    let low = embedding();
    let search = ExactSearch::new();
    let baseline = neighbor_recall(&search, &high, &low, 4, SelfMatch::Include).unwrap();

    // Integer coordinates keep every transform exact in f32
    let rotated = map_rows(&low, |x, y| [-y, x]);
    let reflected = map_rows(&low, |x, y| [-x, y]);
    let translated = map_rows(&low, |x, y| [x + 16.0, y - 32.0]);

    for moved in [rotated, reflected, translated] {
        let recall = neighbor_recall(&search, &high, &moved, 4, SelfMatch::Include).unwrap();
        assert_eq!(recall, baseline);
    }
}

#[test]
fn test_histogram_is_density() {
    let style = RecallStyle {
        k: 3,
        bins: 5,
        ..Default::default()
    };
    let (recall, figure) = compute_neighbor_recall(&high_dim(), &embedding(), &style).unwrap();
    let hist = match figure.layers().next() {
        Some(qntx_embedviz::Layer::Histogram(h)) => h.clone(),
        other => panic!("expected histogram, got {:?}", other),
    };

    assert_eq!(hist.values, recall);
    assert_eq!(hist.range, (0.0, 1.0));
    let area: f32 = hist.heights().iter().map(|h| h * 0.2).sum();
    assert!((area - 1.0).abs() < 1e-5, "density area {}", area);
}
