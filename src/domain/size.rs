//! Human-readable byte sizes (1024-based units)

const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Format a byte count with the largest binary unit that keeps the value >= 1.
///
/// Bytes are printed as a plain integer, every larger unit with one decimal:
/// `0 -> "0 B"`, `1023 -> "1023 B"`, `1536 -> "1.5 KiB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
