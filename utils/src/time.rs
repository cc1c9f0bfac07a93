//! Time formatting helpers.

use paylink_types::Timestamp;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Countdown text for a payment link deadline. `"Expired"` once passed.
pub fn format_time_remaining(expires_at: Timestamp, now: Timestamp) -> String {
    if expires_at.has_passed(now) {
        return "Expired".to_string();
    }
    format_duration(expires_at.remaining_from(now))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_range() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3 * 3600 + 120), "3h 2m");
        assert_eq!(format_duration(2 * 86400 + 3600), "2d 1h");
    }

    #[test]
    fn remaining_counts_down_then_expires() {
        let deadline = Timestamp::new(1_000);
        assert_eq!(format_time_remaining(deadline, Timestamp::new(940)), "1m 0s");
        assert_eq!(format_time_remaining(deadline, Timestamp::new(1_000)), "Expired");
        assert_eq!(format_time_remaining(deadline, Timestamp::new(5_000)), "Expired");
    }
}
