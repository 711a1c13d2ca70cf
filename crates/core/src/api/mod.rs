//! High-level API: raw columns in, plain columns or a matrix out.
//!
//! # Example
//!
//! ```
//! use spacewise_core::api::{directed_hausdorff_distance, spatial_window};
//!
//! let xs = [0.0, 0.0, -1.0, -1.0];
//! let ys = [0.0, 1.0, 0.0, 1.0];
//! let matrix = directed_hausdorff_distance(&xs, &ys, Some(&[0, 2, 4][..]), None)?;
//! assert_eq!(matrix.get(0, 1), Some(1.0));
//!
//! let (kept_x, _kept_y) = spatial_window(-2.0, 0.5, -0.5, 0.5, &xs, &ys, None)?;
//! assert_eq!(kept_x, vec![0.0, -1.0]);
//! # Ok::<(), spacewise_core::SpatialError>(())
//! ```

pub mod high_level;

// Re-export for convenience
pub use high_level::{
    QueryOptions, directed_hausdorff_distance, directed_hausdorff_from_groups, spatial_window,
};
