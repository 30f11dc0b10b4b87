//! Filename prefix classification (`CSCS318-003.pdf` -> `CSCS318`).

use once_cell::sync::Lazy;
use regex::Regex;

/// Letters followed by digits, anchored at the start and closed by `-`
static PREFIX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<prefix>[A-Za-z]+[0-9]+)-").expect("prefix pattern is valid")
});

/// Extract the group key from a file name.
///
/// Returns `None` for names without a `letters+digits-` prefix. Case is kept
/// as written.
pub fn group_key(file_name: &str) -> Option<&str> {
    PREFIX_PATTERN
        .captures(file_name)
        .and_then(|caps| caps.name("prefix"))
        .map(|m| m.as_str())
}
