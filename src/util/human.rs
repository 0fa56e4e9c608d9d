const GIB: f64 = 1_073_741_824.0;
const TIB: f64 = 1_099_511_627_776.0;

/// Format a byte count as "12.34 GiB", switching to TiB from 1 TiB up.
/// Values under 1 GiB stay in GiB.
pub fn fmt_bytes(bytes: i64) -> String {
    let b = bytes as f64;
    if b >= TIB { format!("{:.2} TiB", b / TIB) }
    else        { format!("{:.2} GiB", b / GIB) }
}

/// Signed difference: "+1.00 GiB", "-512.00 GiB".
pub fn fmt_diff(diff: i64) -> String {
    if diff >= 0 { format!("+{}", fmt_bytes(diff)) }
    else         { format!("-{}", fmt_bytes(diff.saturating_neg())) }
}
