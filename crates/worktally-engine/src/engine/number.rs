//! Lenient number parsing for cell contents.
//!
//! Cells hold whatever the user typed or whatever the server rendered
//! (`"7.50"`, `"3"`, `""`, `"2.5h"`). Parsing reads the longest numeric
//! prefix after leading whitespace and ignores the rest, the same way browsers
//! parse form values. Anything that does not start with a number counts as
//! `0`, so half-filled tables still sum.

use regex::Regex;
use std::sync::OnceLock;

fn numeric_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("numeric prefix pattern is valid")
    })
}

/// Parse a cell value into a finite number.
///
/// Returns `0.0` for empty, non-numeric and malformed input, and for values
/// that would not be finite (`"Infinity"`, `"1e999"`).
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let Some(prefix) = numeric_prefix_re().find(trimmed) else {
        return 0.0;
    };
    match prefix.as_str().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}
