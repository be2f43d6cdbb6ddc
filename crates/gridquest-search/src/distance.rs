use gridquest_core::{Cell, DirectionSet};

/// Manhattan (L1) distance between two cells.
#[inline]
pub fn manhattan(a: Cell, b: Cell) -> i32 {
    (a.row - b.row).abs() + (a.col - b.col).abs()
}

/// Chebyshev (L∞) distance between two cells.
#[inline]
pub fn chebyshev(a: Cell, b: Cell) -> i32 {
    (a.row - b.row).abs().max((a.col - b.col).abs())
}

/// Heuristic used by A* to estimate remaining distance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    Manhattan,
    Chebyshev,
}

impl Heuristic {
    /// The admissible default for a direction set: Manhattan for cardinal
    /// movement, Chebyshev when diagonals are allowed.
    #[inline]
    pub fn for_directions(dirs: DirectionSet) -> Self {
        if dirs.diagonal() {
            Self::Chebyshev
        } else {
            Self::Manhattan
        }
    }

    /// Estimated distance from `a` to `b`.
    #[inline]
    pub fn estimate(self, a: Cell, b: Cell) -> i32 {
        match self {
            Self::Manhattan => manhattan(a, b),
            Self::Chebyshev => chebyshev(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Cell::new(0, 0);
        let b = Cell::new(3, -4);
        assert_eq!(manhattan(a, b), 7);
        assert_eq!(chebyshev(a, b), 4);
    }

    #[test]
    fn default_heuristic_per_direction_set() {
        assert_eq!(
            Heuristic::for_directions(DirectionSet::Four),
            Heuristic::Manhattan
        );
        assert_eq!(
            Heuristic::for_directions(DirectionSet::Eight),
            Heuristic::Chebyshev
        );
    }
}
