//! Display formatting helpers

use std::time::Duration;

/// Format milliseconds as "HH:MM:SS.cc" (centisecond display precision)
pub fn format_elapsed(ms: u64) -> String {
    let total_secs = ms / 1000;
    let cs = (ms % 1000) / 10;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}.{:02}", h, m, s, cs)
}

/// Format an uptime duration as a compact human string
pub fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_formats_centiseconds() {
        assert_eq!(format_elapsed(0), "00:00:00.00");
        assert_eq!(format_elapsed(12_340), "00:00:12.34");
        assert_eq!(format_elapsed(61_000), "00:01:01.00");
        assert_eq!(format_elapsed(3_661_090), "01:01:01.09");
    }

    #[test]
    fn elapsed_truncates_below_centiseconds() {
        assert_eq!(format_elapsed(9), "00:00:00.00");
        assert_eq!(format_elapsed(1_239), "00:00:01.23");
    }

    #[test]
    fn uptime_picks_largest_unit() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
