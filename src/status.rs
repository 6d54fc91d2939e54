// Status display helpers

use crate::models::MonitorStatus;

pub fn status_icon(status: MonitorStatus) -> &'static str {
    match status {
        MonitorStatus::Up => "✅",
        MonitorStatus::Down => "❌",
        MonitorStatus::Pending => "⏳",
        MonitorStatus::Paused => "⏸️",
    }
}

pub fn status_label(status: MonitorStatus) -> &'static str {
    match status {
        MonitorStatus::Up => "Up",
        MonitorStatus::Down => "Down",
        MonitorStatus::Pending => "Pending",
        MonitorStatus::Paused => "Paused",
    }
}

/// e.g. "✅ Up".
pub fn format_status_with_icon(status: MonitorStatus) -> String {
    format!("{} {}", status_icon(status), status_label(status))
}

/// "N/A" for unknown (negative), milliseconds below one second, seconds above.
pub fn format_response_time(response_time_ms: i64) -> String {
    if response_time_ms < 0 {
        "N/A".to_string()
    } else if response_time_ms < 1000 {
        format!("{} ms", response_time_ms)
    } else {
        format!("{:.2} s", response_time_ms as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_status_and_response_time() {
        assert_eq!(format_status_with_icon(MonitorStatus::Up), "✅ Up");
        assert_eq!(format_status_with_icon(MonitorStatus::Paused), "⏸️ Paused");
        assert_eq!(format_response_time(-1), "N/A");
        assert_eq!(format_response_time(123), "123 ms");
        assert_eq!(format_response_time(1500), "1.50 s");
    }
}
