use chrono::NaiveDateTime;

use crate::trajectory::waypoint::{RawCoordinate, Waypoint};

/// Maximum title length (in chars) before the caption card truncates it.
pub const TITLE_MAX_CHARS: usize = 32;

/// Caption-card date, e.g. `May 1, 2024 09:30`.
pub fn format_capture_date(ts: NaiveDateTime) -> String {
    ts.format("%b %-d, %Y %H:%M").to_string()
}

/// Truncate to `max_chars` characters, replacing the tail with an ellipsis when cut.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    let title = title.trim();
    if title.chars().count() <= max_chars {
        return title.to_owned();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = title.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}

/// Coordinate string with hemisphere letters, e.g. `35.6895° N, 139.6917° E`.
pub fn format_coordinate(coord: &RawCoordinate) -> String {
    format!(
        "{:.4}° {}, {:.4}° {}",
        coord.latitude.abs(),
        coord.latitude_ref.letter(),
        coord.longitude.abs(),
        coord.longitude_ref.letter()
    )
}

/// Caption title: explicit title, else caption, else a numbered fallback.
pub fn display_title(wp: &Waypoint) -> String {
    let raw = wp
        .photo
        .title
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| wp.photo.caption.as_deref().filter(|s| !s.trim().is_empty()));
    match raw {
        Some(s) => truncate_title(s, TITLE_MAX_CHARS),
        None => format!("Stop {}", wp.sequence_index + 1),
    }
}
