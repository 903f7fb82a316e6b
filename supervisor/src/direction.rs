/// Which way the monitored metric improves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Higher is better (accuracy).
    Maximize,
    /// Lower is better (loss).
    Minimize,
}

impl Direction {
    /// The score every finite metric improves upon.
    pub fn worst(self) -> f64 {
        match self {
            Direction::Maximize => f64::NEG_INFINITY,
            Direction::Minimize => f64::INFINITY,
        }
    }

    /// Strict comparison, ties never count as an improvement.
    #[inline]
    pub fn improves(self, candidate: f64, best: f64) -> bool {
        match self {
            Direction::Maximize => candidate > best,
            Direction::Minimize => candidate < best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_is_beaten_by_any_finite_value() {
        assert!(Direction::Maximize.improves(-1e300, Direction::Maximize.worst()));
        assert!(Direction::Minimize.improves(1e300, Direction::Minimize.worst()));
    }

    #[test]
    fn test_ties_do_not_improve() {
        assert!(!Direction::Maximize.improves(0.6, 0.6));
        assert!(!Direction::Minimize.improves(0.6, 0.6));
    }

    #[test]
    fn test_direction_of_comparison() {
        assert!(Direction::Maximize.improves(0.7, 0.6));
        assert!(!Direction::Maximize.improves(0.5, 0.6));
        assert!(Direction::Minimize.improves(0.5, 0.6));
        assert!(!Direction::Minimize.improves(0.7, 0.6));
    }
}
