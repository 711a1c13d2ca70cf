//! Tests for the spatial window filter and the indexed window queries.

use spacewise_core::{
    CoordStore, SpatialError, Window, WindowIndex, WindowParams, points_in_spatial_window,
    points_in_window, points_in_window_with, window_mask,
};

fn ring(n: usize, radius: f64) -> CoordStore {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * std::f64::consts::TAU;
            (radius * t.cos(), radius * t.sin())
        })
        .collect()
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn test_points_on_each_edge_are_excluded() {
    let xs = [-1.0, 1.0, 0.0, 0.0, 0.0, -1.0, 1.0];
    let ys = [0.0, 0.0, -1.0, 1.0, 0.0, -1.0, 1.0];
    let out = points_in_spatial_window(-1.0, 1.0, -1.0, 1.0, &xs, &ys).unwrap();
    assert_eq!(out.iter().collect::<Vec<_>>(), vec![(0.0, 0.0)]);
}

#[test]
fn test_points_just_inside_edges_are_kept() {
    let eps = 1e-12;
    let xs = [-1.0 + eps, 1.0 - eps];
    let ys = [1.0 - eps, -1.0 + eps];
    let out = points_in_spatial_window(-1.0, 1.0, -1.0, 1.0, &xs, &ys).unwrap();
    assert_eq!(out.len(), 2);
}

#[test]
fn test_retained_points_keep_input_order() {
    let xs = [5.0, 1.0, 9.0, 3.0, 2.0, 7.0];
    let ys = [0.5, 0.5, 0.5, 9.0, 0.5, 0.5];
    let out = points_in_spatial_window(0.0, 8.0, 0.0, 1.0, &xs, &ys).unwrap();
    assert_eq!(out.xs(), &[5.0, 1.0, 2.0, 7.0]);
    assert_eq!(out.ys(), &[0.5, 0.5, 0.5, 0.5]);
}

#[test]
fn test_empty_input_gives_empty_output() {
    let out = points_in_spatial_window(0.0, 1.0, 0.0, 1.0, &[], &[]).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_inverted_window_gives_empty_output() {
    let store = ring(64, 1.0);
    let inverted_x = Window::new(2.0, -2.0, -2.0, 2.0);
    let inverted_y = Window::new(-2.0, 2.0, 2.0, -2.0);
    assert!(points_in_window(&inverted_x, store.view()).is_empty());
    assert!(points_in_window(&inverted_y, store.view()).is_empty());
    assert!(points_in_window(&Window::new(-2.0, 2.0, -2.0, 2.0), store.view()).len() == 64);
}

#[test]
fn test_ragged_columns_are_rejected() {
    let err = points_in_spatial_window(0.0, 1.0, 0.0, 1.0, &[0.5, 0.5], &[0.5]).unwrap_err();
    assert_eq!(
        err,
        SpatialError::ShapeMismatch {
            what: "y coordinates",
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn test_mask_agrees_with_filter() {
    let store = ring(37, 3.0);
    let window = Window::new(-1.0, 3.5, -2.0, 2.5);
    let mask = window_mask(&window, store.view());
    let expected: Vec<_> = store
        .iter()
        .zip(&mask)
        .filter(|(_, keep)| **keep)
        .map(|(p, _)| p)
        .collect();
    let out = points_in_window(&window, store.view());
    assert_eq!(out.iter().collect::<Vec<_>>(), expected);
}

// ============================================================================
// Parallel compaction and determinism
// ============================================================================

#[test]
fn test_parallel_compaction_preserves_order() {
    let n = 50_000;
    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let ys: Vec<f64> = (0..n).map(|i| (i % 10) as f64).collect();
    let store = CoordStore::new(xs, ys).unwrap();
    let window = Window::new(100.0, 40_000.0, 2.0, 7.0);

    let par = points_in_window_with(
        &window,
        store.view(),
        &WindowParams::default().with_parallel_min_len(1),
    );
    let seq = points_in_window_with(&window, store.view(), &WindowParams::sequential());
    assert_eq!(par, seq);
    assert!(par.xs().windows(2).all(|w| w[0] < w[1]));
    assert!(par.ys().iter().all(|&y| y > 2.0 && y < 7.0));
}

#[test]
fn test_repeated_calls_are_bit_identical() {
    let store = ring(1000, 10.0);
    let window = Window::new(-3.3, 7.1, -9.0, 0.4);
    let a = points_in_window(&window, store.view());
    let b = points_in_window(&window, store.view());
    let bits = |s: &CoordStore| -> Vec<u64> { s.xs().iter().map(|v| v.to_bits()).collect() };
    assert_eq!(bits(&a), bits(&b));
    assert_eq!(a, b);
}

// ============================================================================
// WindowIndex
// ============================================================================

#[test]
fn test_window_index_matches_filter_across_queries() {
    let store = ring(500, 5.0);
    let index = WindowIndex::build(store.view());
    assert_eq!(index.len(), 500);
    for k in 0..10 {
        let lo = -5.0 + k as f64;
        let window = Window::new(lo, lo + 3.0, -5.5, lo + 1.0);
        assert_eq!(
            index.query(&window),
            points_in_window(&window, store.view())
        );
    }
}
