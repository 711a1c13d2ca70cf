//! Tuning parameters for the window filter and the distance engine.
//!
//! None of these change results; they only pick how the work is scheduled
//! and which nearest-neighbour search backs the engine. The one exception is
//! [`EmptyTargetPolicy`], which chooses the value reported for a non-empty
//! space measured against an empty one.

/// How the engine finds the nearest target point for each source point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearestStrategy {
    /// Linear scan over the target space.
    Scan,
    /// R-tree nearest-neighbour lookup over the target space.
    Indexed,
    /// Index the target space only when it holds at least `min_target_len` points.
    Auto { min_target_len: usize },
}

impl Default for NearestStrategy {
    fn default() -> Self {
        Self::Auto {
            min_target_len: 256,
        }
    }
}

impl NearestStrategy {
    /// Whether a target space of `target_len` points should be indexed.
    pub fn uses_index(self, target_len: usize) -> bool {
        match self {
            Self::Scan => false,
            Self::Indexed => target_len > 0,
            Self::Auto { min_target_len } => target_len > 0 && target_len >= min_target_len,
        }
    }
}

/// Value of `H(i, j)` when space `i` has points but space `j` has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyTargetPolicy {
    /// Report 0.
    #[default]
    Zero,
    /// Report `f64::INFINITY` (no nearest point exists).
    Infinity,
}

impl EmptyTargetPolicy {
    pub const fn value(self) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Infinity => f64::INFINITY,
        }
    }
}

/// Parameters for [`pairwise_hausdorff_with`](crate::hausdorff::pairwise_hausdorff_with).
#[derive(Debug, Clone, PartialEq)]
pub struct HausdorffParams {
    /// Run on the rayon pool. When false every cell is computed on the
    /// calling thread.
    pub parallel: bool,

    /// Nearest-neighbour search used for the inner minimum.
    pub nearest: NearestStrategy,

    /// Source spaces at least this large also split their outer
    /// maximisation across the pool.
    pub outer_split_len: usize,

    /// Value reported against an empty target space.
    pub empty_target: EmptyTargetPolicy,
}

impl Default for HausdorffParams {
    fn default() -> Self {
        Self {
            parallel: true,
            nearest: NearestStrategy::default(),
            outer_split_len: 4096,
            empty_target: EmptyTargetPolicy::default(),
        }
    }
}

impl HausdorffParams {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_nearest(mut self, nearest: NearestStrategy) -> Self {
        self.nearest = nearest;
        self
    }

    pub fn with_outer_split_len(mut self, outer_split_len: usize) -> Self {
        self.outer_split_len = outer_split_len.max(1);
        self
    }

    pub fn with_empty_target(mut self, empty_target: EmptyTargetPolicy) -> Self {
        self.empty_target = empty_target;
        self
    }
}

/// Parameters for [`points_in_window_with`](crate::window::points_in_window_with).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowParams {
    /// Inputs with at least this many points are filtered on the rayon pool.
    pub parallel_min_len: usize,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            parallel_min_len: 1 << 15,
        }
    }
}

impl WindowParams {
    pub fn sequential() -> Self {
        Self {
            parallel_min_len: usize::MAX,
        }
    }

    pub fn with_parallel_min_len(mut self, parallel_min_len: usize) -> Self {
        self.parallel_min_len = parallel_min_len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_strategy_indexes_only_large_targets() {
        let auto = NearestStrategy::Auto { min_target_len: 4 };
        assert!(!auto.uses_index(0));
        assert!(!auto.uses_index(3));
        assert!(auto.uses_index(4));
        assert!(!NearestStrategy::Scan.uses_index(1_000_000));
        assert!(!NearestStrategy::Indexed.uses_index(0));
        assert!(NearestStrategy::Indexed.uses_index(1));
    }

    #[test]
    fn outer_split_len_never_zero() {
        let params = HausdorffParams::default().with_outer_split_len(0);
        assert_eq!(params.outer_split_len, 1);
    }

    #[test]
    fn empty_target_values() {
        assert_eq!(EmptyTargetPolicy::Zero.value(), 0.0);
        assert_eq!(EmptyTargetPolicy::Infinity.value(), f64::INFINITY);
    }
}
