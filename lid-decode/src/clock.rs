//! Clock parsing and ISO-8601-with-comma timestamp formatting for CSV rows.
use chrono::{Duration, NaiveDateTime};
use lid_core::errors::LidError;

const CLK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a mini-header `CLK` value of the form `YYYY-MM-DD HH:MM:SS`.
pub fn parse_clk(value: &str) -> Result<NaiveDateTime, LidError> {
    NaiveDateTime::parse_from_str(value, CLK_FORMAT).map_err(|_| LidError::BadClock {
        value: value.to_string(),
    })
}

/// Formats a timestamp as `YYYY-MM-DD,HH:MM:SS.mmm`, the layout used by both CSV sinks.
pub fn format_row_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d,%H:%M:%S%.3f").to_string()
}

/// The offset of the `k`-th sample within a burst sampled at `bmr` Hz, as a [`Duration`].
///
/// Computed per-sample from the burst rate rather than accumulated, so fractional-millisecond
/// rates (e.g. `BMR = 3`) do not drift over a long burst.
pub fn burst_offset(k: u32, bmr: u32) -> Duration {
    let nanos = (k as f64 * 1_000_000_000.0 / bmr as f64).round() as i64;
    Duration::nanoseconds(nanos)
}
