//! CLI parsing helpers for clap value parsers.

/// Parse a positive number of seconds.
pub(super) fn parse_timeout_secs(s: &str) -> Result<u64, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("{s} is not a valid number of seconds"))?;
    if secs == 0 {
        return Err(String::from("timeout must be at least one second"));
    }
    Ok(secs)
}
