//! Progress math and badge tiers.

/// Point threshold at which a learner is promoted to the Intermediate badge.
const INTERMEDIATE_POINTS: i64 = 100;

/// Point threshold for the Advanced badge.
const ADVANCED_POINTS: i64 = 500;

/// Point threshold for the Expert badge.
const EXPERT_POINTS: i64 = 1000;

/// Completion percentage for a course, rounded to the nearest integer.
///
/// A course with no lessons reports 0 rather than dividing by zero.
pub fn completion_percentage(completed_lessons: i64, total_lessons: i64) -> i32 {
    if total_lessons <= 0 {
        return 0;
    }
    ((completed_lessons as f64 / total_lessons as f64) * 100.0).round() as i32
}

/// The canonical server-side badge scale, a pure function of lifetime points.
pub fn badge_for_points(total_points: i64) -> &'static str {
    if total_points >= EXPERT_POINTS {
        "Expert"
    } else if total_points >= ADVANCED_POINTS {
        "Advanced"
    } else if total_points >= INTERMEDIATE_POINTS {
        "Intermediate"
    } else {
        "Novice"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_lessons_reports_zero_percent() {
        assert_eq!(completion_percentage(0, 0), 0);
    }

    #[test]
    fn percentage_rounds_to_nearest_integer() {
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(1, 1), 100);
        assert_eq!(completion_percentage(0, 5), 0);
    }

    #[test]
    fn badge_thresholds_are_inclusive_lower_bounds() {
        assert_eq!(badge_for_points(0), "Novice");
        assert_eq!(badge_for_points(99), "Novice");
        assert_eq!(badge_for_points(100), "Intermediate");
        assert_eq!(badge_for_points(499), "Intermediate");
        assert_eq!(badge_for_points(500), "Advanced");
        assert_eq!(badge_for_points(999), "Advanced");
        assert_eq!(badge_for_points(1000), "Expert");
        assert_eq!(badge_for_points(250_000), "Expert");
    }
}
