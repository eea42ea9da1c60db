//! Human-readable byte counts and clock-style durations for status lines.

const SUFFIXES: [&str; 5] = ["bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count with 1024-scaled suffixes, at most two decimal places,
/// trailing zeros trimmed: `1536` -> `"1.5 KB"`, `1048576` -> `"1 MB"`.
pub fn format_bytes(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut idx = 0;
    while size >= 1024.0 && idx < SUFFIXES.len() - 1 {
        size /= 1024.0;
        idx += 1;
    }
    let rendered = format!("{size:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rendered, SUFFIXES[idx])
}

/// Format seconds as MM:SS. Negative or non-finite input clamps to 00:00;
/// `None` (rate not yet known) renders as `--:--`. Minutes may exceed two
/// digits for very long estimates.
pub fn format_clock(seconds: Option<f64>) -> String {
    match seconds {
        None => "--:--".to_string(),
        Some(s) => {
            let s = if s.is_finite() && s > 0.0 { s } else { 0.0 };
            let total = s.round() as u64;
            format!("{:02}:{:02}", total / 60, total % 60)
        }
    }
}
