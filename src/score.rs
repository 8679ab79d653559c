//! Match quality as a `(points, penalty)` pair.
//!
//! Higher points win; on equal points, lower penalty wins. The invalid
//! sentinel marks a query fragment that could not be placed at all.

use std::cmp::Ordering;
use std::ops::AddAssign;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub points: u64,
    pub penalty: u64,
}

impl Score {
    pub const INVALID: Score = Score {
        points: u64::MAX,
        penalty: u64::MAX,
    };

    pub const ZERO: Score = Score {
        points: 0,
        penalty: 0,
    };

    pub fn new(points: u64, penalty: u64) -> Self {
        Self { points, penalty }
    }

    pub fn is_valid(&self) -> bool {
        self.points != u64::MAX && self.penalty != u64::MAX
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        self.points = self.points.wrapping_add(rhs.points);
        self.penalty = self.penalty.wrapping_add(rhs.penalty);
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.points
            .cmp(&other.points)
            .then_with(|| other.penalty.cmp(&self.penalty))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
