//! Port specification parsing.
//!
//! Expands specs like `"80"`, `"1-1000"`, or `"22,80,8000-9000"` into an
//! ascending, deduplicated list of port numbers. Parsing is lenient:
//! malformed or out-of-range tokens are dropped silently instead of
//! failing the whole spec.

use tracing::debug;

/// Ports scanned when no specification is given.
pub const DEFAULT_RANGE: std::ops::RangeInclusive<u16> = 1..=1024;

/// Expand a port specification into a sorted, deduplicated port list.
///
/// Supports single ports (`"80"`), ranges (`"1-1000"`), and comma-separated
/// combinations. An empty or blank spec yields the default range 1-1024.
/// Tokens that fail to parse, fall outside 1-65535, or describe an inverted
/// range contribute nothing.
pub fn expand(spec: &str) -> Vec<u16> {
    if spec.trim().is_empty() {
        return DEFAULT_RANGE.collect();
    }

    let mut ports = Vec::new();

    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once('-') {
            match (parse_port(start), parse_port(end)) {
                (Some(start), Some(end)) if start <= end => ports.extend(start..=end),
                _ => debug!(token, "dropping invalid port range token"),
            }
        } else {
            match parse_port(token) {
                Some(port) => ports.push(port),
                None => debug!(token, "dropping invalid port token"),
            }
        }
    }

    ports.sort_unstable();
    ports.dedup();
    ports
}

/// Parse a single port token, rejecting 0 and anything that does not fit
/// in a u16.
fn parse_port(token: &str) -> Option<u16> {
    match token.trim().parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(port) => Some(port),
    }
}
