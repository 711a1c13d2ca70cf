//! Spatial window filter.
//!
//! Keeps the points strictly inside an axis-aligned rectangle:
//! `min_x < x < max_x && min_y < y < max_y`. Points on an edge are dropped,
//! and NaN coordinates never pass. The retained points keep their input order.
//!
//! Large inputs are filtered on the rayon pool with a two-pass stream
//! compaction: count survivors per block, carve the output into per-block
//! slices from those counts (an exclusive prefix sum), then let every block
//! scatter into its own slice.

use rayon::prelude::*;
use tracing::debug;

use crate::coords::{CoordSlice, CoordStore, Point};
use crate::error::Result;
use crate::params::WindowParams;

const LANES: usize = 4;

/// Points per block in the parallel compaction.
const BLOCK: usize = 1 << 12;

/// Axis-aligned query rectangle with open (exclusive) edges.
///
/// Bounds are not required to be ordered; an inverted window simply contains
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Window {
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Window spanned by two opposite corners, in either order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min_x: a.0.min(b.0),
            max_x: a.0.max(b.0),
            min_y: a.1.min(b.1),
            max_y: a.1.max(b.1),
        }
    }

    /// Strict containment test. Branch-free so that lane loops vectorize.
    #[inline(always)]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x < x) & (x < self.max_x) & (self.min_y < y) & (y < self.max_y)
    }

    /// True when no point can satisfy the strict test (inverted, flat or NaN bounds).
    pub fn is_empty(&self) -> bool {
        !(self.min_x < self.max_x && self.min_y < self.max_y)
    }
}

/// Membership mask, one entry per input point.
pub fn window_mask(window: &Window, coords: CoordSlice<'_>) -> Vec<bool> {
    let mut mask = vec![false; coords.len()];
    fill_mask(window, coords.xs(), coords.ys(), &mut mask);
    mask
}

fn fill_mask(window: &Window, xs: &[f64], ys: &[f64], mask: &mut [bool]) {
    let mut x_chunks = xs.chunks_exact(LANES);
    let mut y_chunks = ys.chunks_exact(LANES);
    let mut m_chunks = mask.chunks_exact_mut(LANES);
    for ((cx, cy), cm) in (&mut x_chunks).zip(&mut y_chunks).zip(&mut m_chunks) {
        for lane in 0..LANES {
            cm[lane] = window.contains(cx[lane], cy[lane]);
        }
    }
    let rest = x_chunks
        .remainder()
        .iter()
        .zip(y_chunks.remainder())
        .zip(m_chunks.into_remainder());
    for ((&x, &y), m) in rest {
        *m = window.contains(x, y);
    }
}

fn count_inside(window: &Window, xs: &[f64], ys: &[f64]) -> usize {
    xs.iter()
        .zip(ys)
        .filter(|&(&x, &y)| window.contains(x, y))
        .count()
}

fn scatter_inside(window: &Window, xs: &[f64], ys: &[f64], out_x: &mut [f64], out_y: &mut [f64]) {
    let mut k = 0;
    for (&x, &y) in xs.iter().zip(ys) {
        if window.contains(x, y) {
            out_x[k] = x;
            out_y[k] = y;
            k += 1;
        }
    }
    debug_assert_eq!(k, out_x.len());
}

/// Filters `coords` to the points strictly inside `window`, using default
/// parameters.
pub fn points_in_window(window: &Window, coords: CoordSlice<'_>) -> CoordStore {
    points_in_window_with(window, coords, &WindowParams::default())
}

/// Filters `coords` to the points strictly inside `window`.
pub fn points_in_window_with(
    window: &Window,
    coords: CoordSlice<'_>,
    params: &WindowParams,
) -> CoordStore {
    let len = coords.len();
    if len == 0 || window.is_empty() {
        debug!(points = len, retained = 0, "spatial window: nothing to keep");
        return CoordStore::empty();
    }

    let parallel = len >= params.parallel_min_len;
    let (xs, ys) = if parallel {
        compact_parallel(window, coords.xs(), coords.ys())
    } else {
        compact_sequential(window, coords.xs(), coords.ys())
    };
    debug!(points = len, retained = xs.len(), parallel, "spatial window");

    CoordStore::from_columns(xs, ys)
}

/// Raw-column entry point: `min_x < x < max_x && min_y < y < max_y`.
///
/// Fails with `ShapeMismatch` when `xs` and `ys` differ in length.
pub fn points_in_spatial_window(
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    xs: &[f64],
    ys: &[f64],
) -> Result<CoordStore> {
    let coords = CoordSlice::new(xs, ys)?;
    Ok(points_in_window(
        &Window::new(min_x, max_x, min_y, max_y),
        coords,
    ))
}

fn compact_sequential(window: &Window, xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut mask = vec![false; xs.len()];
    fill_mask(window, xs, ys, &mut mask);
    let kept = mask.iter().filter(|&&m| m).count();
    let mut out_x = Vec::with_capacity(kept);
    let mut out_y = Vec::with_capacity(kept);
    for ((&x, &y), _) in xs.iter().zip(ys).zip(&mask).filter(|(_, m)| **m) {
        out_x.push(x);
        out_y.push(y);
    }
    (out_x, out_y)
}

fn compact_parallel(window: &Window, xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let counts: Vec<usize> = xs
        .par_chunks(BLOCK)
        .zip(ys.par_chunks(BLOCK))
        .map(|(bx, by)| count_inside(window, bx, by))
        .collect();
    let total: usize = counts.iter().sum();

    let mut out_x = vec![0.0; total];
    let mut out_y = vec![0.0; total];
    let x_parts = split_by_counts(&mut out_x, &counts);
    let y_parts = split_by_counts(&mut out_y, &counts);

    xs.par_chunks(BLOCK)
        .zip(ys.par_chunks(BLOCK))
        .zip(x_parts.into_par_iter().zip(y_parts.into_par_iter()))
        .for_each(|((bx, by), (ox, oy))| scatter_inside(window, bx, by, ox, oy));

    (out_x, out_y)
}

/// Carves `buf` into consecutive disjoint slices of the given lengths.
fn split_by_counts<'a>(mut buf: &'a mut [f64], counts: &[usize]) -> Vec<&'a mut [f64]> {
    let mut parts = Vec::with_capacity(counts.len());
    for &count in counts {
        let (head, tail) = std::mem::take(&mut buf).split_at_mut(count);
        parts.push(head);
        buf = tail;
    }
    parts
}
