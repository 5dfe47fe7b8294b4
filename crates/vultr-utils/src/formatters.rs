/// Trait for formatting values for display
pub trait Formatter<T> {
    fn format(&self, input: T) -> String;
}

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Decimal (SI) byte sizes, the unit the API bills bandwidth in
pub struct BytesFormatter;

impl Formatter<u64> for BytesFormatter {
    fn format(&self, bytes: u64) -> String {
        if bytes < 1000 {
            return format!("{} B", bytes);
        }

        let mut value = bytes as f64;
        let mut unit = 0;
        while value >= 1000.0 && unit < BYTE_UNITS.len() - 1 {
            value /= 1000.0;
            unit += 1;
        }

        format!("{:.2} {}", value, BYTE_UNITS[unit])
    }
}

/// Bandwidth used against the monthly allowance, both in GB
pub struct BandwidthUsageFormatter;

impl Formatter<(f64, f64)> for BandwidthUsageFormatter {
    fn format(&self, input: (f64, f64)) -> String {
        let (used, allowed) = input;
        if allowed > 0.0 {
            format!(
                "{:.2} / {:.0} GB ({:.1}%)",
                used,
                allowed,
                used / allowed * 100.0
            )
        } else {
            format!("{:.2} GB", used)
        }
    }
}

/// Elapsed time in days, hours and minutes
pub struct AgeFormatter;

impl Formatter<i64> for AgeFormatter {
    fn format(&self, seconds: i64) -> String {
        let seconds = seconds.max(0);
        let days = seconds / 86_400;
        let hours = (seconds % 86_400) / 3_600;
        let mins = (seconds % 3_600) / 60;

        match (days, hours) {
            (0, 0) => format!("{}m", mins),
            (0, _) => format!("{}h {}m", hours, mins),
            _ => format!("{}d {}h", days, hours),
        }
    }
}

// Convenience functions
pub fn format_bytes(bytes: u64) -> String {
    BytesFormatter.format(bytes)
}

pub fn format_bandwidth_usage(used_gb: f64, allowed_gb: f64) -> String {
    BandwidthUsageFormatter.format((used_gb, allowed_gb))
}

pub fn format_age(seconds: i64) -> String {
    AgeFormatter.format(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_formatting() {
        let formatter = BytesFormatter;

        assert_eq!(formatter.format(0), "0 B");
        assert_eq!(formatter.format(999), "999 B");
        assert_eq!(formatter.format(1_500), "1.50 KB");
        assert_eq!(formatter.format(81_072_581), "81.07 MB");
        assert_eq!(formatter.format(222_387_466_000), "222.39 GB");
        assert_eq!(formatter.format(5_000_000_000_000_000), "5000.00 TB");
    }

    #[test]
    fn test_bandwidth_usage_formatting() {
        assert_eq!(
            format_bandwidth_usage(131.512, 1000.0),
            "131.51 / 1000 GB (13.2%)"
        );
        assert_eq!(format_bandwidth_usage(2.5, 0.0), "2.50 GB");
    }

    #[test]
    fn test_age_formatting() {
        let formatter = AgeFormatter;

        assert_eq!(formatter.format(30), "0m");
        assert_eq!(formatter.format(3_661), "1h 1m");
        assert_eq!(formatter.format(90_061), "1d 1h");
        assert_eq!(formatter.format(-10), "0m");
    }
}
