//! Coordinate storage.
//!
//! Points live in two parallel columns (x and y) rather than as a vector of
//! structs. Groups of points ("spaces") are index ranges into one shared
//! buffer, so kernels borrow sub-slices instead of allocating per group:
//! - `CoordStore` - owned, immutable x/y columns
//! - `CoordSlice` - borrowed view over a contiguous run of points

use std::ops::Range;

use crate::error::{Result, SpatialError};

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// Squared Euclidean distance between two points.
///
/// Every kernel compares squared distances through this one function so that
/// different search strategies agree bit for bit.
#[inline(always)]
pub fn distance_sq(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// Owned x/y columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordStore {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl CoordStore {
    /// Builds a store from two columns, rejecting columns of unequal length.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        check_columns(xs.len(), ys.len())?;
        Ok(Self { xs, ys })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a store from (x, y) pairs.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let (xs, ys) = points.into_iter().unzip();
        Self { xs, ys }
    }

    /// Wraps columns a kernel produced in lockstep.
    pub(crate) fn from_columns(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        Self { xs, ys }
    }

    /// Copies two equal-length columns into a new store.
    pub fn from_slices(xs: &[f64], ys: &[f64]) -> Result<Self> {
        check_columns(xs.len(), ys.len())?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn point(&self, idx: usize) -> Option<Point> {
        self.view().point(idx)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Borrows the whole store.
    pub fn view(&self) -> CoordSlice<'_> {
        CoordSlice {
            xs: &self.xs,
            ys: &self.ys,
        }
    }

    /// Borrows the points in `range`, or `None` when it runs past the end.
    pub fn slice(&self, range: Range<usize>) -> Option<CoordSlice<'_>> {
        self.view().sub(range)
    }

    /// Gives back the x and y columns.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.xs, self.ys)
    }
}

impl FromIterator<Point> for CoordStore {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}

/// Borrowed view over equal-length x/y columns.
#[derive(Debug, Clone, Copy)]
pub struct CoordSlice<'a> {
    xs: &'a [f64],
    ys: &'a [f64],
}

impl<'a> CoordSlice<'a> {
    /// Wraps two borrowed columns, rejecting columns of unequal length.
    pub fn new(xs: &'a [f64], ys: &'a [f64]) -> Result<Self> {
        check_columns(xs.len(), ys.len())?;
        Ok(Self { xs, ys })
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs(&self) -> &'a [f64] {
        self.xs
    }

    pub fn ys(&self) -> &'a [f64] {
        self.ys
    }

    pub fn point(&self, idx: usize) -> Option<Point> {
        Some((*self.xs.get(idx)?, *self.ys.get(idx)?))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Point> + 'a {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Narrows the view to `range`, or `None` when it runs past the end.
    pub fn sub(&self, range: Range<usize>) -> Option<CoordSlice<'a>> {
        Some(CoordSlice {
            xs: self.xs.get(range.clone())?,
            ys: self.ys.get(range)?,
        })
    }

    pub fn to_store(&self) -> CoordStore {
        CoordStore {
            xs: self.xs.to_vec(),
            ys: self.ys.to_vec(),
        }
    }
}

impl<'a> From<&'a CoordStore> for CoordSlice<'a> {
    fn from(store: &'a CoordStore) -> Self {
        store.view()
    }
}

fn check_columns(x_len: usize, y_len: usize) -> Result<()> {
    if x_len != y_len {
        return Err(SpatialError::ShapeMismatch {
            what: "y coordinates",
            expected: x_len,
            got: y_len,
        });
    }
    Ok(())
}
