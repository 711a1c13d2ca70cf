//! Trajectory helpers over timestamped, object-tagged points.
//!
//! A trajectory is the time-ordered run of points sharing one object id.
//! Once derived, trajectories are ordinary spaces of a [`SpacePartition`], so
//! they can be fed straight into the Hausdorff engine.

use itertools::Itertools;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::coords::{CoordSlice, CoordStore, distance_sq};
use crate::error::{Result, SpatialError};
use crate::partition::SpacePartition;

/// Points regrouped into trajectories.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectories {
    /// Points sorted by (object id, timestamp).
    pub coords: CoordStore,
    pub object_ids: Vec<i64>,
    pub timestamps: Vec<i64>,
    /// One id per trajectory, ascending.
    pub trajectory_ids: Vec<i64>,
    /// One space per trajectory.
    pub partition: SpacePartition,
}

impl Trajectories {
    pub fn len(&self) -> usize {
        self.trajectory_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory_ids.is_empty()
    }
}

/// Travelled length and timing of one trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryMotion {
    /// Polyline length in coordinate units.
    pub distance: f64,
    /// Last timestamp minus first, in timestamp units.
    pub duration: f64,
    /// `distance / duration`, or 0 when the duration is 0.
    pub speed: f64,
}

/// Closed bounding box of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Points kept by [`subset_trajectory_id`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrajectorySubset {
    pub coords: CoordStore,
    pub object_ids: Vec<i64>,
    pub timestamps: Vec<i64>,
}

fn check_column(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(SpatialError::ShapeMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

/// Positions of `ids`/`timestamps` ordered by (id, timestamp); ties keep
/// their input order.
fn sorted_order(positions: Vec<usize>, ids: &[i64], timestamps: &[i64]) -> Vec<usize> {
    let mut order = positions;
    order.par_sort_by_key(|&i| (ids[i], timestamps[i]));
    order
}

fn gather<T: Copy>(values: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| values[i]).collect()
}

/// Sorts points by (object id, timestamp) and groups them by id.
pub fn derive_trajectories(
    xs: &[f64],
    ys: &[f64],
    object_ids: &[i64],
    timestamps: &[i64],
) -> Result<Trajectories> {
    let coords = CoordSlice::new(xs, ys)?;
    check_column("object ids", coords.len(), object_ids.len())?;
    check_column("timestamps", coords.len(), timestamps.len())?;

    let order = sorted_order((0..coords.len()).collect(), object_ids, timestamps);
    let sorted_ids = gather(object_ids, &order);

    let mut trajectory_ids = Vec::new();
    let mut lengths = Vec::new();
    for (count, &id) in sorted_ids.iter().dedup_with_count() {
        trajectory_ids.push(id);
        lengths.push(count);
    }
    debug!(
        points = coords.len(),
        trajectories = trajectory_ids.len(),
        "derived trajectories"
    );

    Ok(Trajectories {
        coords: CoordStore::from_columns(gather(xs, &order), gather(ys, &order)),
        timestamps: gather(timestamps, &order),
        object_ids: sorted_ids,
        trajectory_ids,
        partition: SpacePartition::from_lengths(&lengths),
    })
}

/// Length, duration and average speed of every trajectory.
pub fn trajectory_distance_and_speed(
    coords: CoordSlice<'_>,
    timestamps: &[i64],
    partition: &SpacePartition,
) -> Result<Vec<TrajectoryMotion>> {
    check_column("timestamps", coords.len(), timestamps.len())?;
    let spaces = partition.split(coords)?;

    Ok(spaces
        .par_iter()
        .zip(partition.spaces().collect::<Vec<_>>())
        .map(|(space, range)| {
            let distance: f64 = space
                .iter()
                .tuple_windows()
                .map(|((ax, ay), (bx, by))| distance_sq(ax, ay, bx, by).sqrt())
                .sum();
            let duration = if range.len() < 2 {
                0.0
            } else {
                timestamps[range.end - 1].saturating_sub(timestamps[range.start]) as f64
            };
            let speed = if duration > 0.0 {
                distance / duration
            } else {
                0.0
            };
            TrajectoryMotion {
                distance,
                duration,
                speed,
            }
        })
        .collect())
}

/// Bounding box of every trajectory; `None` for an empty space.
pub fn trajectory_spatial_bounds(
    coords: CoordSlice<'_>,
    partition: &SpacePartition,
) -> Result<Vec<Option<BoundingBox>>> {
    let spaces = partition.split(coords)?;
    Ok(spaces
        .par_iter()
        .map(|space| {
            space.iter().fold(None, |acc: Option<BoundingBox>, (x, y)| {
                Some(match acc {
                    None => BoundingBox {
                        min_x: x,
                        min_y: y,
                        max_x: x,
                        max_y: y,
                    },
                    Some(b) => BoundingBox {
                        min_x: b.min_x.min(x),
                        min_y: b.min_y.min(y),
                        max_x: b.max_x.max(x),
                        max_y: b.max_y.max(y),
                    },
                })
            })
        })
        .collect())
}

/// Keeps the points whose object id is in `keep`, ordered by (id, timestamp).
pub fn subset_trajectory_id(
    keep: &[i64],
    xs: &[f64],
    ys: &[f64],
    object_ids: &[i64],
    timestamps: &[i64],
) -> Result<TrajectorySubset> {
    let coords = CoordSlice::new(xs, ys)?;
    check_column("object ids", coords.len(), object_ids.len())?;
    check_column("timestamps", coords.len(), timestamps.len())?;

    let keep: FxHashSet<i64> = keep.iter().copied().collect();
    let selected: Vec<usize> = (0..coords.len())
        .filter(|&i| keep.contains(&object_ids[i]))
        .collect();
    let order = sorted_order(selected, object_ids, timestamps);

    Ok(TrajectorySubset {
        coords: CoordStore::from_columns(gather(xs, &order), gather(ys, &order)),
        object_ids: gather(object_ids, &order),
        timestamps: gather(timestamps, &order),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_groups_by_id_then_time() {
        let xs = [0.0, 10.0, 1.0, 11.0, 2.0];
        let ys = [0.0, 0.0, 0.0, 0.0, 0.0];
        let ids = [7, 3, 7, 3, 7];
        let ts = [30, 2, 10, 1, 20];
        let t = derive_trajectories(&xs, &ys, &ids, &ts).unwrap();
        assert_eq!(t.trajectory_ids, vec![3, 7]);
        assert_eq!(t.partition.offsets(), &[0, 2, 5]);
        assert_eq!(t.coords.xs(), &[11.0, 10.0, 1.0, 2.0, 0.0]);
        assert_eq!(t.timestamps, vec![1, 2, 10, 20, 30]);
    }

    #[test]
    fn derive_rejects_short_columns() {
        let err = derive_trajectories(&[0.0], &[0.0], &[1], &[]).unwrap_err();
        assert_eq!(
            err,
            SpatialError::ShapeMismatch {
                what: "timestamps",
                expected: 1,
                got: 0
            }
        );
    }

    #[test]
    fn single_point_has_no_motion() {
        let store = CoordStore::from_points([(1.0, 1.0)]);
        let motion =
            trajectory_distance_and_speed(store.view(), &[5], &SpacePartition::singletons(1))
                .unwrap();
        assert_eq!(
            motion,
            vec![TrajectoryMotion {
                distance: 0.0,
                duration: 0.0,
                speed: 0.0
            }]
        );
    }

    #[test]
    fn bounds_of_empty_space_is_none() {
        let store = CoordStore::from_points([(1.0, 2.0), (-1.0, 5.0)]);
        let part = SpacePartition::from_lengths(&[0, 2]);
        let bounds = trajectory_spatial_bounds(store.view(), &part).unwrap();
        assert_eq!(bounds[0], None);
        assert_eq!(
            bounds[1],
            Some(BoundingBox {
                min_x: -1.0,
                min_y: 2.0,
                max_x: 1.0,
                max_y: 5.0
            })
        );
    }
}
