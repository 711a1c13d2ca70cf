//! spacewise - spatial window filtering and pairwise directed Hausdorff
//! distances over batches of 2-D points.
//!
//! Points are stored as flat x/y columns; groups of points ("spaces") are
//! contiguous ranges described by an offsets array.

pub mod api;
pub mod coords;
pub mod error;
pub mod hausdorff;
pub mod params;
pub mod partition;
pub mod trajectory;
pub mod window;
pub mod window_index;

// Re-export high_level for convenience
pub use api::high_level;

pub use coords::{CoordSlice, CoordStore, Point};
pub use error::{PartitionError, Result, SpatialError};
pub use hausdorff::{DistanceMatrix, directed_hausdorff, pairwise_hausdorff, pairwise_hausdorff_with};
pub use params::{EmptyTargetPolicy, HausdorffParams, NearestStrategy, WindowParams};
pub use partition::{SpacePartition, validate_offsets};
pub use window::{
    Window, points_in_spatial_window, points_in_window, points_in_window_with, window_mask,
};
pub use window_index::WindowIndex;
