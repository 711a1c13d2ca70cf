//! Packed R-tree over a coordinate store for repeated window queries.
//!
//! Building the index costs one Hilbert sort; afterwards each query only
//! touches the candidates whose boxes meet the window. Results follow the
//! exact rules of [`points_in_window`](crate::window::points_in_window):
//! strict containment, original order.

use geo_index::rtree::sort::HilbertSort;
use geo_index::rtree::{RTree as GeoRTree, RTreeBuilder, RTreeIndex};
use tracing::debug;

use crate::coords::{CoordSlice, CoordStore};
use crate::window::Window;

/// Items per packed tree. Tree item ids are `u32`, so larger stores are
/// split across several trees.
const MAX_TREE_ITEMS: usize = 1 << 30;

pub struct WindowIndex<'a> {
    coords: CoordSlice<'a>,
    /// Static trees over consecutive runs of `positions`; empty when no
    /// point is finite.
    trees: Vec<GeoRTree<f64>>,
    /// Items per tree; tree `t` covers `positions[t * chunk_len..]`.
    chunk_len: usize,
    /// Indexed point -> position in `coords`.
    positions: Vec<usize>,
}

impl<'a> WindowIndex<'a> {
    /// Bulk-loads every finite point of `coords`.
    ///
    /// Non-finite points can never be strictly inside a window, so they are
    /// left out of the tree.
    pub fn build(coords: CoordSlice<'a>) -> Self {
        Self::build_chunked(coords, MAX_TREE_ITEMS)
    }

    fn build_chunked(coords: CoordSlice<'a>, chunk_len: usize) -> Self {
        let chunk_len = chunk_len.clamp(1, MAX_TREE_ITEMS);
        let positions: Vec<usize> = coords
            .iter()
            .enumerate()
            .filter(|(_, (x, y))| x.is_finite() && y.is_finite())
            .map(|(i, _)| i)
            .collect();

        let xs = coords.xs();
        let ys = coords.ys();
        let trees: Vec<GeoRTree<f64>> = positions
            .chunks(chunk_len)
            .map(|chunk| {
                let items = u32::try_from(chunk.len()).unwrap_or(u32::MAX);
                let mut builder: RTreeBuilder<f64> = RTreeBuilder::new(items);
                for &pos in chunk {
                    builder.add(xs[pos], ys[pos], xs[pos], ys[pos]);
                }
                builder.finish::<HilbertSort>()
            })
            .collect();
        debug!(
            points = coords.len(),
            indexed = positions.len(),
            trees = trees.len(),
            "window index built"
        );

        Self {
            coords,
            trees,
            chunk_len,
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Positions of the points strictly inside `window`, ascending.
    pub fn query_positions(&self, window: &Window) -> Vec<usize> {
        if self.trees.is_empty() || window.is_empty() {
            return Vec::new();
        }

        let xs = self.coords.xs();
        let ys = self.coords.ys();
        let mut hits: Vec<usize> = self
            .trees
            .iter()
            .enumerate()
            .flat_map(|(t, tree)| {
                let base = t * self.chunk_len;
                tree.search(window.min_x, window.min_y, window.max_x, window.max_y)
                    .into_iter()
                    .map(move |id| self.positions[base + id as usize])
            })
            .filter(|&pos| window.contains(xs[pos], ys[pos]))
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Points strictly inside `window`, in their original order.
    pub fn query(&self, window: &Window) -> CoordStore {
        let xs = self.coords.xs();
        let ys = self.coords.ys();
        self.query_positions(window)
            .into_iter()
            .map(|pos| (xs[pos], ys[pos]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::points_in_window;

    #[test]
    fn matches_linear_filter() {
        let store: CoordStore = (0..400)
            .map(|i| (((i * 37) % 101) as f64 * 0.5, ((i * 13) % 59) as f64))
            .collect();
        let index = WindowIndex::build(store.view());
        for window in [
            Window::new(5.0, 30.0, 2.0, 40.0),
            Window::new(0.0, 50.0, 0.0, 58.0),
            Window::new(10.0, 10.5, -5.0, 100.0),
            Window::new(30.0, 5.0, 2.0, 40.0),
        ] {
            assert_eq!(index.query(&window), points_in_window(&window, store.view()));
        }
    }

    #[test]
    fn boundary_hits_are_dropped() {
        let store = CoordStore::from_points([(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let index = WindowIndex::build(store.view());
        assert_eq!(
            index.query_positions(&Window::new(1.0, 3.0, 1.0, 3.0)),
            vec![1]
        );
    }

    #[test]
    fn split_trees_answer_like_one() {
        let store: CoordStore = (0..200)
            .map(|i| (((i * 29) % 83) as f64, ((i * 11) % 47) as f64))
            .collect();
        let whole = WindowIndex::build(store.view());
        let split = WindowIndex::build_chunked(store.view(), 7);
        assert_eq!(whole.trees.len(), 1);
        assert_eq!(split.trees.len(), 200usize.div_ceil(7));
        for window in [
            Window::new(3.0, 60.0, 1.0, 30.0),
            Window::new(-1.0, 100.0, -1.0, 100.0),
            Window::new(40.0, 41.0, 0.0, 47.0),
        ] {
            let expected = points_in_window(&window, store.view());
            assert_eq!(split.query(&window), expected);
            assert_eq!(whole.query(&window), expected);
        }
    }

    #[test]
    fn empty_and_non_finite_inputs() {
        let empty = CoordStore::empty();
        let index = WindowIndex::build(empty.view());
        assert!(index.query(&Window::new(-1.0, 1.0, -1.0, 1.0)).is_empty());

        let store = CoordStore::from_points([(f64::NAN, 0.0), (f64::INFINITY, 0.0)]);
        let index = WindowIndex::build(store.view());
        assert!(
            index
                .query(&Window::new(f64::NEG_INFINITY, f64::INFINITY, -1.0, 1.0))
                .is_empty()
        );
    }
}
