//! Scoring for line clears

/// Points awarded by number of rows cleared at once
const CLEAR_POINTS: [u64; 5] = [0, 100, 300, 700, 1500];

/// Points for clearing `lines` rows with a single lock.
///
/// Four-block pieces cannot clear more than four rows; larger counts get
/// the four-row award.
pub fn points_for(lines: usize) -> u64 {
    CLEAR_POINTS[lines.min(CLEAR_POINTS.len() - 1)]
}

/// Display name for a clear, shown in the stats panel
pub fn clear_name(lines: usize) -> Option<&'static str> {
    match lines {
        0 => None,
        1 => Some("Single"),
        2 => Some("Double"),
        3 => Some("Triple"),
        _ => Some("Tetris"),
    }
}

/// Running score for one game
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total lines cleared
    pub lines: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the award for a lock that cleared `lines` rows, returns the award
    pub fn add_clear(&mut self, lines: usize) -> u64 {
        let award = points_for(lines);
        self.points = self.points.saturating_add(award);
        self.lines = self.lines.saturating_add(lines as u32);
        award
    }

    /// Back to zero for a new game
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_table() {
        assert_eq!(points_for(0), 0);
        assert_eq!(points_for(1), 100);
        assert_eq!(points_for(2), 300);
        assert_eq!(points_for(3), 700);
        assert_eq!(points_for(4), 1500);
    }

    #[test]
    fn test_oversized_clear_is_clamped() {
        assert_eq!(points_for(5), 1500);
        assert_eq!(points_for(20), 1500);
    }

    #[test]
    fn test_single_clear() {
        let mut score = Score::new();
        assert_eq!(score.add_clear(1), 100);
        assert_eq!(score.points, 100);
        assert_eq!(score.lines, 1);
    }

    #[test]
    fn test_tetris() {
        let mut score = Score::new();
        score.add_clear(4);
        score.add_clear(0);
        assert_eq!(score.points, 1500);
        assert_eq!(score.lines, 4);
    }

    #[test]
    fn test_reset() {
        let mut score = Score::new();
        score.add_clear(2);
        score.reset();
        assert_eq!(score, Score::new());
    }
}
