//! Canonical store-name signatures.
//!
//! A signature is the lowercase, ASCII-alphanumeric-only form of a store
//! name. All matching, family lookup, and cache keying is done on
//! signatures so that `"Smith’s"`, `"Smiths"`, and `"SMITH'S #482"` collapse
//! to comparable forms.

/// Reduce a free-text store name to its canonical signature.
///
/// Lowercases the input and keeps only ASCII alphanumeric characters;
/// whitespace, punctuation, apostrophes (typographic or plain), and
/// non-ASCII characters are dropped.
///
/// Canonicalization is idempotent: applying it to its own output returns
/// the same string.
#[must_use]
pub fn canonicalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
