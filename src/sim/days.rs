//! "Days together" counter

use crate::consts::MS_PER_DAY;

/// Whole days between two timestamps, rounded up
pub fn day_count(now_ms: f64, reference_ms: f64) -> u64 {
    ((now_ms - reference_ms).abs() / MS_PER_DAY).ceil() as u64
}

/// Group thousands with commas
pub fn format_days(days: u64) -> String {
    let digits = days.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::REFERENCE_DATE_MS;

    #[test]
    fn test_same_instant_is_zero() {
        assert_eq!(day_count(REFERENCE_DATE_MS, REFERENCE_DATE_MS), 0);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        assert_eq!(day_count(REFERENCE_DATE_MS + 1.0, REFERENCE_DATE_MS), 1);
        assert_eq!(day_count(REFERENCE_DATE_MS + MS_PER_DAY, REFERENCE_DATE_MS), 1);
        assert_eq!(day_count(REFERENCE_DATE_MS + MS_PER_DAY * 1.5, REFERENCE_DATE_MS), 2);
    }

    #[test]
    fn test_before_reference_is_absolute() {
        assert_eq!(day_count(REFERENCE_DATE_MS - MS_PER_DAY * 3.0, REFERENCE_DATE_MS), 3);
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(0), "0");
        assert_eq!(format_days(999), "999");
        assert_eq!(format_days(1000), "1,000");
        assert_eq!(format_days(1234567), "1,234,567");
    }
}
