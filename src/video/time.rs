/// Formats seconds as `M:SS`, minutes unpadded.
///
/// Non-finite or negative input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5.0), "0:05");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(59.99), "0:59");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(3725.0), "62:05");
    }

    #[test]
    fn test_format_time_placeholder() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
    }
}
