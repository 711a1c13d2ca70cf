//! Pairwise directed Hausdorff distances between spaces.
//!
//! For spaces `i` and `j` of one partitioned store,
//! `H(i, j) = max_{p in i} min_{q in j} |p - q|`. The engine fills the full
//! `M x M` matrix, row `i` holding distances *from* space `i`.
//!
//! - Squared distances are compared throughout; one square root is taken per
//!   cell, on the retained maximum.
//! - Cells are independent and run on the rayon pool. Large source spaces
//!   additionally split their outer maximisation across the pool.
//! - Large target spaces can be searched through an R-tree instead of a
//!   linear scan. The neighbour it returns is re-measured with
//!   [`distance_sq`], so both paths report identical bits.
//! - An empty source space gives 0. An empty target space gives the value
//!   chosen by [`EmptyTargetPolicy`](crate::params::EmptyTargetPolicy).
//! - A point with a NaN coordinate has no distance to anything and is
//!   ignored on both sides. A space holding only such points counts as
//!   empty.

use std::fmt;

use rayon::prelude::*;
use rstar::RTree;
use tracing::{debug, trace};

use crate::coords::{CoordSlice, distance_sq};
use crate::error::Result;
use crate::params::HausdorffParams;
use crate::partition::SpacePartition;

/// Square matrix of directed distances, row-major by space index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistanceMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// The 0 x 0 matrix.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps row-major values; `None` unless `data.len() == dim * dim`.
    pub fn from_row_major(dim: usize, data: Vec<f64>) -> Option<Self> {
        (dim.checked_mul(dim)? == data.len()).then_some(Self { dim, data })
    }

    /// Number of spaces (rows and columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// `H(from, to)`.
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        if from >= self.dim || to >= self.dim {
            return None;
        }
        Some(self.data[from * self.dim + to])
    }

    /// Distances from space `from` to every space.
    pub fn row(&self, from: usize) -> Option<&[f64]> {
        if from >= self.dim {
            return None;
        }
        Some(&self.data[from * self.dim..(from + 1) * self.dim])
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        (0..self.dim).map(|i| &self.data[i * self.dim..(i + 1) * self.dim])
    }

    /// Distances from every space to space `to`.
    pub fn column(&self, to: usize) -> Option<Vec<f64>> {
        if to >= self.dim {
            return None;
        }
        Some(self.rows().map(|row| row[to]).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Undirected Hausdorff distances: `max(H(i, j), H(j, i))`.
    pub fn symmetric(&self) -> DistanceMatrix {
        let n = self.dim;
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                data[i * n + j] = self.data[i * n + j].max(self.data[j * n + i]);
            }
        }
        DistanceMatrix { dim: n, data }
    }
}

impl fmt::Display for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{value:.6}")?;
            }
        }
        Ok(())
    }
}

/// R-tree over the finite points of one target space.
struct NearestIndex {
    tree: RTree<[f64; 2]>,
}

impl NearestIndex {
    /// `None` when the space holds a non-finite point; such targets are
    /// always scanned so that NaN and infinity behave the same on both paths.
    fn build(space: CoordSlice<'_>) -> Option<Self> {
        let points: Vec<[f64; 2]> = space.iter().map(|(x, y)| [x, y]).collect();
        if points.iter().any(|p| !(p[0].is_finite() && p[1].is_finite())) {
            return None;
        }
        Some(Self {
            tree: RTree::bulk_load(points),
        })
    }

    fn nearest_sq(&self, x: f64, y: f64) -> Option<f64> {
        self.tree
            .nearest_neighbor(&[x, y])
            .map(|q| distance_sq(x, y, q[0], q[1]))
    }
}

#[inline]
fn nearest_sq_scan(x: f64, y: f64, to: CoordSlice<'_>) -> f64 {
    let mut best = f64::INFINITY;
    for (&qx, &qy) in to.xs().iter().zip(to.ys()) {
        let d = distance_sq(x, y, qx, qy);
        if d < best {
            best = d;
        }
    }
    best
}

#[inline]
fn nearest_sq(x: f64, y: f64, to: CoordSlice<'_>, index: Option<&NearestIndex>) -> f64 {
    match index {
        Some(index) if x.is_finite() && y.is_finite() => index
            .nearest_sq(x, y)
            .unwrap_or_else(|| nearest_sq_scan(x, y, to)),
        _ => nearest_sq_scan(x, y, to),
    }
}

#[inline]
fn is_comparable(x: f64, y: f64) -> bool {
    !(x.is_nan() || y.is_nan())
}

fn directed_cell(
    from: CoordSlice<'_>,
    to: CoordSlice<'_>,
    index: Option<&NearestIndex>,
    params: &HausdorffParams,
) -> f64 {
    if !from.iter().any(|(x, y)| is_comparable(x, y)) {
        return 0.0;
    }
    if !to.iter().any(|(x, y)| is_comparable(x, y)) {
        return params.empty_target.value();
    }

    let max_sq = if params.parallel && from.len() >= params.outer_split_len {
        from.xs()
            .par_iter()
            .zip(from.ys().par_iter())
            .filter(|&(&x, &y)| is_comparable(x, y))
            .map(|(&x, &y)| nearest_sq(x, y, to, index))
            .reduce(|| 0.0, f64::max)
    } else {
        from.iter()
            .filter(|&(x, y)| is_comparable(x, y))
            .map(|(x, y)| nearest_sq(x, y, to, index))
            .fold(0.0, f64::max)
    };
    max_sq.sqrt()
}

/// Directed Hausdorff distance from one point set to another, computed on
/// the calling thread. Returns 0 when either set is empty.
pub fn directed_hausdorff(from: CoordSlice<'_>, to: CoordSlice<'_>) -> f64 {
    directed_cell(from, to, None, &HausdorffParams::sequential())
}

/// Full matrix of directed Hausdorff distances with default parameters.
pub fn pairwise_hausdorff(
    coords: CoordSlice<'_>,
    partition: &SpacePartition,
) -> Result<DistanceMatrix> {
    pairwise_hausdorff_with(coords, partition, &HausdorffParams::default())
}

/// Full matrix of directed Hausdorff distances.
///
/// Fails with `InvalidPartition` before any work if `partition` does not
/// cover `coords` exactly.
pub fn pairwise_hausdorff_with(
    coords: CoordSlice<'_>,
    partition: &SpacePartition,
    params: &HausdorffParams,
) -> Result<DistanceMatrix> {
    let spaces = partition.split(coords)?;
    let n = spaces.len();
    if n == 0 {
        debug!(points = coords.len(), spaces = 0, "pairwise hausdorff: empty");
        return Ok(DistanceMatrix::empty());
    }

    let build = |space: &CoordSlice<'_>| {
        if params.nearest.uses_index(space.len()) {
            NearestIndex::build(*space)
        } else {
            None
        }
    };
    let indices: Vec<Option<NearestIndex>> = if params.parallel {
        spaces.par_iter().map(build).collect()
    } else {
        spaces.iter().map(build).collect()
    };
    let indexed = indices.iter().filter(|idx| idx.is_some()).count();
    debug!(
        points = coords.len(),
        spaces = n,
        indexed,
        parallel = params.parallel,
        "pairwise hausdorff"
    );

    let cell = |k: usize| {
        let (i, j) = (k / n, k % n);
        directed_cell(spaces[i], spaces[j], indices[j].as_ref(), params)
    };
    let mut data = vec![0.0; n * n];
    if params.parallel {
        data.par_iter_mut()
            .enumerate()
            .for_each(|(k, out)| *out = cell(k));
    } else {
        for (k, out) in data.iter_mut().enumerate() {
            *out = cell(k);
            if (k + 1) % n == 0 {
                trace!(row = k / n, "pairwise hausdorff row done");
            }
        }
    }

    Ok(DistanceMatrix { dim: n, data })
}
