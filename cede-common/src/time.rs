//! Timestamp and duration display utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a duration in seconds for log and anomaly messages
///
/// Short durations (< 100 s, which covers every clip this engine handles)
/// render as `X.XXs`; longer values fall back to `M:SS.Xs`.
pub fn format_seconds(seconds: f64) -> String {
    if seconds < 100.0 {
        format!("{:.2}s", seconds)
    } else {
        let minutes = (seconds / 60.0).floor() as i64;
        let rem = seconds - (minutes as f64) * 60.0;
        format!("{}:{:04.1}s", minutes, rem)
    }
}
