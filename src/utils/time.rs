//! Time parsing and formatting utilities

use crate::error::{QuickCutError, QuickCutResult};

/// Parse a time string to milliseconds
///
/// Accepts seconds (`12.5`), `MM:SS(.ms)` and `HH:MM:SS(.ms)`.
pub fn parse_time_ms(time_str: &str) -> QuickCutResult<u64> {
    let trimmed = time_str.trim();
    let invalid = || QuickCutError::InvalidTimeFormat {
        time: time_str.to_string(),
    };

    let parts: Vec<&str> = trimmed.split(':').collect();
    let seconds = match parts.as_slice() {
        [secs] => parse_component(secs).ok_or_else(invalid)?,
        [minutes, secs] => {
            let minutes = parse_whole(minutes).ok_or_else(invalid)?;
            let secs = parse_component(secs).ok_or_else(invalid)?;
            if secs >= 60.0 {
                return Err(invalid());
            }
            minutes * 60.0 + secs
        }
        [hours, minutes, secs] => {
            let hours = parse_whole(hours).ok_or_else(invalid)?;
            let minutes = parse_whole(minutes).ok_or_else(invalid)?;
            let secs = parse_component(secs).ok_or_else(invalid)?;
            if minutes >= 60.0 || secs >= 60.0 {
                return Err(invalid());
            }
            hours * 3600.0 + minutes * 60.0 + secs
        }
        _ => return Err(invalid()),
    };

    Ok((seconds * 1000.0).round() as u64)
}

fn parse_component(value: &str) -> Option<f64> {
    let parsed = value.parse::<f64>().ok()?;
    if parsed.is_finite() && parsed >= 0.0 {
        Some(parsed)
    } else {
        None
    }
}

fn parse_whole(value: &str) -> Option<f64> {
    value.parse::<u32>().ok().map(f64::from)
}

/// Format milliseconds as `M:SS`, or `H:MM:SS` past the hour
pub fn format_ms(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Milliseconds as fractional seconds for command lines (`12.345`)
pub fn ms_to_seconds_arg(ms: u64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}
