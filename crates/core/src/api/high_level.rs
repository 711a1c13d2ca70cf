//! High-level entry points mirroring the raw-array call contract.
//!
//! Callers hand over flat x/y columns (plus optional space offsets) and get
//! back plain vectors or a [`DistanceMatrix`] whose row and column indices
//! are space indices. Labelling and presentation are left to the caller.

use tracing::debug;

use crate::coords::{CoordSlice, CoordStore, Point};
use crate::error::Result;
use crate::hausdorff::{DistanceMatrix, pairwise_hausdorff_with};
use crate::params::{HausdorffParams, WindowParams};
use crate::partition::SpacePartition;
use crate::window::{Window, points_in_window_with};

/// Options shared by the high-level calls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryOptions {
    /// Window filter scheduling.
    pub window: WindowParams,

    /// Distance engine parameters.
    pub hausdorff: HausdorffParams,
}

/// Returns the x and y columns of the points with
/// `min_x < x < max_x && min_y < y < max_y`, in input order.
///
/// # Arguments
/// * `min_x`, `max_x`, `min_y`, `max_y` - window bounds, in any order
/// * `xs`, `ys` - equal-length coordinate columns
/// * `options` - tuning options (None for defaults)
pub fn spatial_window(
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    xs: &[f64],
    ys: &[f64],
    options: Option<QueryOptions>,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let options = options.unwrap_or_default();
    let coords = CoordSlice::new(xs, ys)?;
    let window = Window::new(min_x, max_x, min_y, max_y);
    Ok(points_in_window_with(&window, coords, &options.window).into_parts())
}

/// Directed Hausdorff distance between every ordered pair of spaces.
///
/// # Arguments
/// * `xs`, `ys` - equal-length coordinate columns
/// * `space_offsets` - start offset of every space followed by the point
///   count; `None` makes every point its own space
/// * `options` - tuning options (None for defaults)
pub fn directed_hausdorff_distance(
    xs: &[f64],
    ys: &[f64],
    space_offsets: Option<&[usize]>,
    options: Option<QueryOptions>,
) -> Result<DistanceMatrix> {
    let options = options.unwrap_or_default();
    let coords = CoordSlice::new(xs, ys)?;
    let partition = match space_offsets {
        Some(offsets) => SpacePartition::new(offsets.to_vec(), coords.len())?,
        None => SpacePartition::singletons(coords.len()),
    };
    pairwise_hausdorff_with(coords, &partition, &options.hausdorff)
}

/// Directed Hausdorff matrix for spaces given as separate point lists.
///
/// The lists are packed into one coordinate buffer first, so the engine
/// still works on contiguous ranges.
pub fn directed_hausdorff_from_groups<G: AsRef<[Point]>>(
    groups: &[G],
    options: Option<QueryOptions>,
) -> Result<DistanceMatrix> {
    let options = options.unwrap_or_default();
    let lengths: Vec<usize> = groups.iter().map(|g| g.as_ref().len()).collect();
    let store: CoordStore = groups
        .iter()
        .flat_map(|g| g.as_ref().iter().copied())
        .collect();
    let partition = SpacePartition::from_lengths(&lengths);
    debug!(groups = groups.len(), points = store.len(), "packed point groups");
    pairwise_hausdorff_with(store.view(), &partition, &options.hausdorff)
}
