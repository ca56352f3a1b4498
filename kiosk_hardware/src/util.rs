/// Append a `t=<millis>` query parameter so intermediaries never serve a
/// cached classification.
pub fn with_cache_buster(url: &str, t_ms: u128) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}t={t_ms}")
}

/// Milliseconds since the Unix epoch, 0 if the system clock is before it.
pub fn unix_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
