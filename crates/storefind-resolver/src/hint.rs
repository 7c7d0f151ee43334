//! Heuristic for deciding whether a scraper-supplied hint is a physical
//! street address worth geocoding directly, as opposed to a provider store
//! ID or a bare postal code.

/// Returns `true` when `hint` looks like a street address: a leading house
/// number followed by at least one word with three or more letters.
#[must_use]
pub fn looks_like_street_address(hint: &str) -> bool {
    let re = regex::Regex::new(r"^\s*\d{1,6}\s+.*[A-Za-z]{3,}").expect("valid regex");
    re.is_match(hint)
}
