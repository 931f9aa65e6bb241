// src/core/timecode.rs

//! Renders frame positions as `HH:MM:SS:FF` timecode.

/// The timecode shown for an unknown rate or a non-positive position.
pub const ZERO_TIMECODE: &str = "00:00:00:00";

/// Width of every timecode field, in digits.
const FIELD_WIDTH: u32 = 2;

/// Formats `frames` at `rate` frames per second.
///
/// Every field is zero-padded to two digits and saturates at `99` instead of
/// wrapping, so a 150 hour position renders as `99:..`.
pub fn format(frames: i64, rate: i64) -> String {
    if rate <= 0 || frames <= 0 {
        return ZERO_TIMECODE.to_string();
    }

    let total_seconds = frames / rate;
    let frames = frames % rate;
    let seconds = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minutes = total_minutes % 60;
    let hours = total_minutes / 60;

    format!(
        "{}:{}:{}:{}",
        pad(hours),
        pad(minutes),
        pad(seconds),
        pad(frames)
    )
}

/// Formats a position given in seconds, as telemetry reports it.
/// Fractional rates use their nominal integer rate; partial frames are dropped.
pub fn format_seconds(seconds: f64, rate: f64) -> String {
    let nominal = nominal_rate(rate);
    if !seconds.is_finite() || seconds <= 0.0 {
        return ZERO_TIMECODE.to_string();
    }
    format((seconds * nominal as f64).floor() as i64, nominal)
}

/// Rounds a frame rate such as 29.97 to the integer rate used for timecode.
pub fn nominal_rate(rate: f64) -> i64 {
    if rate.is_finite() && rate > 0.0 {
        rate.round() as i64
    } else {
        0
    }
}

fn pad(value: i64) -> String {
    let max = 10_i64.pow(FIELD_WIDTH) - 1;
    format!("{:0width$}", value.min(max), width = FIELD_WIDTH as usize)
}
