/// Utilities for date and time formatting
///
/// Provides consistent date/time display across the application

/// Format ISO date string to MM/DD/YYYY format
/// Example: "2025-04-01" or "2025-04-01T08:30:00Z" -> "04/01/2025"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}/{}/{}", month, day, year);
        }
    }
    date_str.to_string()
}

/// Format a money value with two decimals for display.
pub fn format_money(v: f64) -> String {
    format!("{:.2}", v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-04-01"), "04/01/2025");
        assert_eq!(format_date("2025-04-01T08:30:00Z"), "04/01/2025");
    }

    #[test]
    fn test_invalid_format_passes_through() {
        assert_eq!(format_date("invalid"), "invalid");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(6610.079999), "6610.08");
        assert_eq!(format_money(0.0), "0.00");
    }
}
