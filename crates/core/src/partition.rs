//! Space partitions: contiguous groups over a shared coordinate buffer.
//!
//! A partition is an offsets array `offsets[0..=M]` with `offsets[0] == 0`,
//! `offsets[M] == L` (the point count) and no decreasing step. Space `i` is
//! the half-open range `offsets[i]..offsets[i + 1]` and may be empty.

use std::ops::Range;

use itertools::Itertools;

use crate::coords::{CoordSlice, CoordStore};
use crate::error::{PartitionError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacePartition {
    offsets: Vec<usize>,
}

impl SpacePartition {
    /// Validates `offsets` against a store of `len` points.
    pub fn new(offsets: Vec<usize>, len: usize) -> Result<Self> {
        validate_offsets(&offsets, len)?;
        Ok(Self { offsets })
    }

    /// Zero spaces over an empty store.
    pub fn empty() -> Self {
        Self { offsets: vec![0] }
    }

    /// One space per point.
    pub fn singletons(len: usize) -> Self {
        Self {
            offsets: (0..=len).collect(),
        }
    }

    /// Builds offsets from per-space lengths (a running sum starting at 0).
    pub fn from_lengths(lengths: &[usize]) -> Self {
        let mut offsets = Vec::with_capacity(lengths.len() + 1);
        offsets.push(0);
        let mut acc = 0;
        for &n in lengths {
            acc += n;
            offsets.push(acc);
        }
        Self { offsets }
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Number of spaces (one less than the number of offsets).
    pub fn num_spaces(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of points covered by the partition.
    pub fn num_points(&self) -> usize {
        self.offsets[self.offsets.len() - 1]
    }

    pub fn space(&self, idx: usize) -> Option<Range<usize>> {
        let start = *self.offsets.get(idx)?;
        let end = *self.offsets.get(idx + 1)?;
        Some(start..end)
    }

    pub fn spaces(&self) -> impl ExactSizeIterator<Item = Range<usize>> + '_ {
        self.offsets.windows(2).map(|w| w[0]..w[1])
    }

    pub fn lengths(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.offsets.windows(2).map(|w| w[1] - w[0])
    }

    /// Checks that this partition covers exactly `len` points.
    pub fn check_len(&self, len: usize) -> Result<()> {
        validate_offsets(&self.offsets, len)
    }

    /// Borrows every space of `store` as a slice, after checking that the
    /// partition covers the store exactly.
    pub fn split<'a>(&self, store: CoordSlice<'a>) -> Result<Vec<CoordSlice<'a>>> {
        self.check_len(store.len())?;
        Ok(self
            .spaces()
            .filter_map(|range| store.sub(range))
            .collect())
    }

    /// Same as [`split`](Self::split) for an owned store.
    pub fn split_store<'a>(&self, store: &'a CoordStore) -> Result<Vec<CoordSlice<'a>>> {
        self.split(store.view())
    }
}

/// Verifies that `offsets` starts at 0, ends at `len` and never decreases.
pub fn validate_offsets(offsets: &[usize], len: usize) -> Result<()> {
    let (&first, &last) = match (offsets.first(), offsets.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(PartitionError::Empty.into()),
    };
    if first != 0 {
        return Err(PartitionError::BadStart { first }.into());
    }
    if let Some((index, (&prev, &next))) = offsets
        .iter()
        .tuple_windows()
        .enumerate()
        .find(|(_, (prev, next))| next < prev)
    {
        return Err(PartitionError::Decreasing {
            index: index + 1,
            prev,
            next,
        }
        .into());
    }
    if last != len {
        return Err(PartitionError::BadEnd { last, len }.into());
    }
    Ok(())
}
