//! Signature matching for geocoding candidates.
//!
//! A [`StoreMatcher`] is built once per search from the requested store name,
//! any scraper-supplied aliases, and the full brand family. Candidate place
//! names coming back from the maps provider are accepted only if they match
//! one of the held signatures — exactly, by length-gated containment, by
//! bounded prefix/suffix, or within a dynamic Levenshtein threshold.

use crate::canonical::canonicalize;
use crate::families::FamilyIndex;

/// Shorter side must be at least this long for substring containment to
/// count; avoids short-token false positives ("heb" inside "shell").
const MIN_CONTAINMENT_LEN: usize = 5;

/// Prefix/suffix matching gates: shorter side length and maximum length
/// difference between the two signatures.
const MIN_AFFIX_LEN: usize = 4;
const MAX_AFFIX_DIFF: usize = 4;

/// Both sides must be at least this long before the fuzzy check applies.
const MIN_FUZZY_LEN: usize = 4;

/// Matches candidate place names against a store's family of signatures.
#[derive(Debug, Clone)]
pub struct StoreMatcher {
    signatures: Vec<String>,
}

impl StoreMatcher {
    /// Build a matcher holding the canonical signatures of `name`, all of
    /// its brand-family member names, and any scraper-supplied `aliases`.
    #[must_use]
    pub fn new(name: &str, aliases: &[String], families: &FamilyIndex) -> Self {
        let mut signatures: Vec<String> = Vec::new();
        let mut push = |raw: &str| {
            let sig = canonicalize(raw);
            if !sig.is_empty() && !signatures.contains(&sig) {
                signatures.push(sig);
            }
        };

        for member in families.family_members(name) {
            push(&member);
        }
        for alias in aliases {
            push(alias);
        }

        Self { signatures }
    }

    /// Number of distinct signatures held.
    #[must_use]
    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Whether `candidate` matches any held signature.
    ///
    /// Degenerate inputs (empty candidate, or a matcher built from
    /// empty/symbol-only names) never match.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        let cand = canonicalize(candidate);
        if cand.is_empty() {
            return false;
        }
        self.signatures.iter().any(|sig| signature_match(sig, &cand))
    }
}

fn signature_match(sig: &str, cand: &str) -> bool {
    if sig == cand {
        return true;
    }

    let (shorter, longer) = if sig.len() <= cand.len() {
        (sig, cand)
    } else {
        (cand, sig)
    };

    // Containment: "kroger" inside "krogerfuelcenter127".
    if shorter.len() >= MIN_CONTAINMENT_LEN && longer.contains(shorter) {
        return true;
    }

    // Bounded prefix/suffix: absorbs short trailing qualifiers on 4-char
    // signatures that the containment gate excludes.
    if shorter.len() >= MIN_AFFIX_LEN
        && longer.len() - shorter.len() <= MAX_AFFIX_DIFF
        && (longer.starts_with(shorter) || longer.ends_with(shorter))
    {
        return true;
    }

    // Fuzzy: dynamic threshold of ~20% of the longer signature's length,
    // never below one edit. Absorbs typos and minor regional respellings.
    if shorter.len() >= MIN_FUZZY_LEN {
        let max_edits = (longer.len() / 5).max(1);
        if strsim::levenshtein(sig, cand) <= max_edits {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::{FamiliesFile, FamilyConfig};

    fn kroger_index() -> FamilyIndex {
        FamilyIndex::new(&FamiliesFile {
            families: vec![FamilyConfig {
                name: "Kroger".to_string(),
                subsidiaries: vec![
                    "Ralphs".to_string(),
                    "Fred Meyer".to_string(),
                    "Food 4 Less".to_string(),
                ],
            }],
        })
    }

    #[test]
    fn exact_signature_match() {
        let m = StoreMatcher::new("Kroger", &[], &kroger_index());
        assert!(m.matches("Kroger"));
        assert!(m.matches("KROGER"));
    }

    #[test]
    fn family_member_names_match() {
        // Searching for the parent must accept subsidiary storefront names.
        let m = StoreMatcher::new("Kroger", &[], &kroger_index());
        assert!(m.matches("Ralphs"));
        assert!(m.matches("Fred Meyer"));
        assert!(m.matches("Food 4 Less"));
    }

    #[test]
    fn subsidiary_request_accepts_parent_candidates() {
        let m = StoreMatcher::new("Fred Meyer", &[], &kroger_index());
        assert!(m.matches("Kroger"));
    }

    #[test]
    fn containment_with_store_qualifier() {
        let m = StoreMatcher::new("Kroger", &[], &kroger_index());
        assert!(m.matches("Kroger Fuel Center #127"));
        assert!(m.matches("Kroger Marketplace"));
    }

    #[test]
    fn short_token_containment_rejected() {
        let index = FamilyIndex::default();
        let m = StoreMatcher::new("HEB", &[], &index);
        // "heb" is only 3 chars: containment inside "shell" (or anything
        // else) must not fire.
        assert!(!m.matches("Shell"));
        assert!(m.matches("H-E-B"));
    }

    #[test]
    fn fuzzy_absorbs_single_typo() {
        let m = StoreMatcher::new("Kroger", &[], &kroger_index());
        assert!(m.matches("Krogers"));
        assert!(m.matches("Kroeger"));
    }

    #[test]
    fn fuzzy_rejects_different_chain() {
        let m = StoreMatcher::new("Safeway", &[], &FamilyIndex::default());
        assert!(!m.matches("Subway"));
        assert!(!m.matches("Gateway Liquor"));
    }

    #[test]
    fn scraper_aliases_extend_the_family() {
        let aliases = vec!["QFC".to_string()];
        let m = StoreMatcher::new("Kroger", &aliases, &kroger_index());
        assert!(m.matches("QFC"));
    }

    #[test]
    fn degenerate_inputs_never_match() {
        let index = FamilyIndex::default();
        let m = StoreMatcher::new("!!!", &[], &index);
        assert_eq!(m.signature_count(), 0);
        assert!(!m.matches("Kroger"));
        assert!(!m.matches(""));

        let m = StoreMatcher::new("Kroger", &[], &index);
        assert!(!m.matches("---"));
    }

    #[test]
    fn levenshtein_distance_is_symmetric() {
        for (a, b) in [
            ("kroger", "krogers"),
            ("ralphs", "ralfs"),
            ("safeway", "subway"),
            ("", "fredmeyer"),
        ] {
            assert_eq!(strsim::levenshtein(a, b), strsim::levenshtein(b, a));
        }
    }
}
