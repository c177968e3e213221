//! Countdown display formatting

/// Format remaining seconds for display.
///
/// The most significant unit has no leading zero, every lower unit is padded
/// to two digits, and anything under a minute is shown as `"N sec"`.
/// Fractional seconds are truncated.
///
/// ```
/// use shutdown_timer::utils::format_time;
/// assert_eq!(format_time(45.0), "45 sec");
/// assert_eq!(format_time(90.0), "1:30");
/// assert_eq!(format_time(3661.0), "1:01:01");
/// assert_eq!(format_time(90061.0), "1:01:01:01");
/// ```
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let secs = total % 60;

    if total >= 86_400 {
        format!("{}:{:02}:{:02}:{:02}", days, hours, minutes, secs)
    } else if total >= 3_600 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else if total >= 60 {
        format!("{}:{:02}", minutes, secs)
    } else {
        format!("{} sec", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_only() {
        assert_eq!(format_time(0.0), "0 sec");
        assert_eq!(format_time(45.0), "45 sec");
        assert_eq!(format_time(59.0), "59 sec");
    }

    #[test]
    fn test_bracket_boundaries() {
        assert_eq!(format_time(60.0), "1:00");
        assert_eq!(format_time(90.0), "1:30");
        assert_eq!(format_time(3_599.0), "59:59");
        assert_eq!(format_time(3_600.0), "1:00:00");
        assert_eq!(format_time(3_661.0), "1:01:01");
        assert_eq!(format_time(86_399.0), "23:59:59");
        assert_eq!(format_time(86_400.0), "1:00:00:00");
        assert_eq!(format_time(90_061.0), "1:01:01:01");
        assert_eq!(format_time(365.0 * 86_400.0), "365:00:00:00");
    }

    #[test]
    fn test_fraction_truncates() {
        assert_eq!(format_time(59.99), "59 sec");
        assert_eq!(format_time(60.4), "1:00");
        assert_eq!(format_time(0.7), "0 sec");
    }

    #[test]
    fn test_negative_and_nan_show_zero() {
        assert_eq!(format_time(-5.0), "0 sec");
        assert_eq!(format_time(f64::NAN), "0 sec");
    }
}
