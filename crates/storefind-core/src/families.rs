//! Brand-family registry: parent grocery chains and their regionally
//! rebranded subsidiary storefronts.
//!
//! Loaded from a YAML file (see `config/families.yaml`) and compiled into a
//! [`FamilyIndex`] with forward (parent → member names) and reverse (member →
//! parent) lookups keyed by canonical signature.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::canonical::canonicalize;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyConfig {
    /// Parent chain display name, e.g. `"Kroger"`.
    pub name: String,
    /// Regional subsidiary display names, e.g. `"Fred Meyer"`.
    #[serde(default)]
    pub subsidiaries: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FamiliesFile {
    pub families: Vec<FamilyConfig>,
}

/// Load and validate the brand-family registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_families(path: &Path) -> Result<FamiliesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FamiliesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let families_file: FamiliesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::FamiliesFileParse)?;

    validate_families(&families_file)?;

    Ok(families_file)
}

fn validate_families(families_file: &FamiliesFile) -> Result<(), ConfigError> {
    let mut parent_sigs = HashSet::new();
    let mut member_sigs = HashSet::new();

    for family in &families_file.families {
        let parent_sig = canonicalize(&family.name);
        if parent_sig.is_empty() {
            return Err(ConfigError::Validation(format!(
                "family name '{}' has an empty canonical signature",
                family.name
            )));
        }
        if !parent_sigs.insert(parent_sig.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate family: '{}'",
                family.name
            )));
        }

        for subsidiary in &family.subsidiaries {
            let sig = canonicalize(subsidiary);
            if sig.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "subsidiary '{}' of '{}' has an empty canonical signature",
                    subsidiary, family.name
                )));
            }
            if !member_sigs.insert(sig) {
                return Err(ConfigError::Validation(format!(
                    "subsidiary '{}' appears in more than one family",
                    subsidiary
                )));
            }
        }
    }

    // A subsidiary signature colliding with any parent signature would make
    // reverse lookup ambiguous.
    if let Some(sig) = member_sigs.intersection(&parent_sigs).next() {
        return Err(ConfigError::Validation(format!(
            "'{sig}' is both a parent chain and a subsidiary"
        )));
    }

    Ok(())
}

/// Compiled brand-family lookups.
#[derive(Debug, Clone, Default)]
pub struct FamilyIndex {
    /// Parent signature → all member display names (parent first).
    members: HashMap<String, Vec<String>>,
    /// Member signature (including the parent's own) → parent signature.
    parents: HashMap<String, String>,
}

impl FamilyIndex {
    #[must_use]
    pub fn new(families_file: &FamiliesFile) -> Self {
        let mut members: HashMap<String, Vec<String>> = HashMap::new();
        let mut parents: HashMap<String, String> = HashMap::new();

        for family in &families_file.families {
            let parent_sig = canonicalize(&family.name);
            let mut names = Vec::with_capacity(1 + family.subsidiaries.len());
            names.push(family.name.clone());
            parents.insert(parent_sig.clone(), parent_sig.clone());

            for subsidiary in &family.subsidiaries {
                parents.insert(canonicalize(subsidiary), parent_sig.clone());
                names.push(subsidiary.clone());
            }
            members.insert(parent_sig, names);
        }

        Self { members, parents }
    }

    /// The parent chain signature for any member name, or `None` if the name
    /// is not in the registry.
    #[must_use]
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.parents
            .get(&canonicalize(name))
            .map(String::as_str)
    }

    /// All display-name variants to try when matching a store name: the
    /// parent chain plus every subsidiary, regardless of which member was
    /// asked about.
    ///
    /// Unknown names are returned as a single-element list so callers can
    /// use the result uniformly as a search list.
    #[must_use]
    pub fn family_members(&self, name: &str) -> Vec<String> {
        match self.parent_of(name).and_then(|p| self.members.get(p)) {
            Some(names) => names.clone(),
            None => vec![name.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FamiliesFile {
        FamiliesFile {
            families: vec![
                FamilyConfig {
                    name: "Kroger".to_string(),
                    subsidiaries: vec![
                        "Ralphs".to_string(),
                        "Fred Meyer".to_string(),
                        "King Soopers".to_string(),
                    ],
                },
                FamilyConfig {
                    name: "Albertsons".to_string(),
                    subsidiaries: vec!["Safeway".to_string(), "Vons".to_string()],
                },
            ],
        }
    }

    #[test]
    fn parent_of_resolves_subsidiary_to_parent() {
        let index = FamilyIndex::new(&sample());
        assert_eq!(index.parent_of("Fred Meyer"), Some("kroger"));
        assert_eq!(index.parent_of("Safeway"), Some("albertsons"));
    }

    #[test]
    fn parent_of_resolves_parent_to_itself() {
        let index = FamilyIndex::new(&sample());
        assert_eq!(index.parent_of("Kroger"), Some("kroger"));
    }

    #[test]
    fn parent_of_unknown_name_is_none() {
        let index = FamilyIndex::new(&sample());
        assert_eq!(index.parent_of("Wegmans"), None);
    }

    #[test]
    fn family_members_same_for_subsidiary_and_parent() {
        let index = FamilyIndex::new(&sample());
        assert_eq!(
            index.family_members("King Soopers"),
            index.family_members("Kroger")
        );
        assert_eq!(
            index.family_members("Kroger"),
            vec!["Kroger", "Ralphs", "Fred Meyer", "King Soopers"]
        );
    }

    #[test]
    fn family_members_unknown_name_returns_input() {
        let index = FamilyIndex::new(&sample());
        assert_eq!(index.family_members("Wegmans"), vec!["Wegmans"]);
    }

    #[test]
    fn lookup_ignores_case_and_punctuation() {
        let index = FamilyIndex::new(&sample());
        assert_eq!(index.parent_of("FRED-MEYER"), Some("kroger"));
        assert_eq!(index.parent_of("fred meyer"), Some("kroger"));
    }

    #[test]
    fn validate_rejects_duplicate_family() {
        let file = FamiliesFile {
            families: vec![
                FamilyConfig {
                    name: "Kroger".to_string(),
                    subsidiaries: vec![],
                },
                FamilyConfig {
                    name: "KROGER".to_string(),
                    subsidiaries: vec![],
                },
            ],
        };
        let err = validate_families(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate family"));
    }

    #[test]
    fn validate_rejects_subsidiary_in_two_families() {
        let file = FamiliesFile {
            families: vec![
                FamilyConfig {
                    name: "Kroger".to_string(),
                    subsidiaries: vec!["Ralphs".to_string()],
                },
                FamilyConfig {
                    name: "Albertsons".to_string(),
                    subsidiaries: vec!["Ralphs".to_string()],
                },
            ],
        };
        let err = validate_families(&file).unwrap_err();
        assert!(err.to_string().contains("more than one family"));
    }

    #[test]
    fn validate_rejects_subsidiary_shadowing_a_parent() {
        let file = FamiliesFile {
            families: vec![
                FamilyConfig {
                    name: "Kroger".to_string(),
                    subsidiaries: vec!["Albertsons".to_string()],
                },
                FamilyConfig {
                    name: "Albertsons".to_string(),
                    subsidiaries: vec![],
                },
            ],
        };
        let err = validate_families(&file).unwrap_err();
        assert!(err.to_string().contains("both a parent chain"));
    }

    #[test]
    fn validate_rejects_empty_signature_name() {
        let file = FamiliesFile {
            families: vec![FamilyConfig {
                name: "---".to_string(),
                subsidiaries: vec![],
            }],
        };
        let err = validate_families(&file).unwrap_err();
        assert!(err.to_string().contains("empty canonical signature"));
    }

    #[test]
    fn validate_accepts_sample() {
        assert!(validate_families(&sample()).is_ok());
    }

    #[test]
    fn load_families_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("families.yaml");
        assert!(
            path.exists(),
            "families.yaml missing at {path:?} — required for this test"
        );
        let result = load_families(&path);
        assert!(result.is_ok(), "failed to load families.yaml: {result:?}");
        let families_file = result.unwrap();
        assert!(!families_file.families.is_empty());

        let index = FamilyIndex::new(&families_file);
        assert_eq!(index.parent_of("King Soopers"), Some("kroger"));
    }
}
