use std::collections::HashMap;
use std::sync::LazyLock;

use super::registry::{self, Registry, RegistryError};
use super::spdx;
use crate::expression::{parse, SpdxExpression};

/// Fold `key` for case-insensitive lookup, rejecting a key that folds to
/// one already claimed. The first spelling is the one reported.
fn claim_key(claimed: &mut HashMap<String, String>, key: &str) -> Result<String, RegistryError> {
    let folded = key.trim().to_lowercase();
    if let Some(first) = claimed.get(&folded) {
        return Err(RegistryError::DuplicateKey {
            first: first.clone(),
            second: key.to_string(),
        });
    }
    claimed.insert(folded.clone(), key.to_string());
    Ok(folded)
}

/// Free-text license strings mapped to expressions, looked up ignoring case.
#[derive(Debug, Clone)]
pub struct LicenseMapping {
    entries: HashMap<String, SpdxExpression>,
}

impl LicenseMapping {
    /// Build an alias table.
    ///
    /// Keys differing only by case are rejected, and so is any key that is
    /// already a canonical id of `canonical`.
    pub fn new<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, SpdxExpression)>,
        canonical: &Registry,
    ) -> Result<Self, RegistryError> {
        let mut keys: HashMap<String, String> = HashMap::new();
        let mut map = HashMap::new();
        for (key, expression) in entries {
            let key = key.into();
            if let Some(entry) = canonical.get(&key) {
                return Err(RegistryError::AliasShadowsCanonical {
                    alias: key,
                    canonical: entry.id.clone(),
                });
            }
            let folded = claim_key(&mut keys, &key)?;
            map.insert(folded, expression);
        }
        Ok(Self { entries: map })
    }

    /// Build from `(key, expression text)` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)], canonical: &Registry) -> Result<Self, RegistryError> {
        let entries = pairs
            .iter()
            .map(|(key, target)| {
                parse(target)
                    .map(|e| (key.to_string(), e))
                    .map_err(|source| RegistryError::InvalidTarget {
                        key: key.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries, canonical)
    }

    pub fn get(&self, key: &str) -> Option<&SpdxExpression> {
        self.entries.get(&key.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
struct DeprecatedEntry {
    original: SpdxExpression,
    current: SpdxExpression,
}

/// Deprecated license ids and the expressions that replace them.
#[derive(Debug, Clone)]
pub struct DeprecatedMapping {
    entries: HashMap<String, DeprecatedEntry>,
}

impl DeprecatedMapping {
    /// Every key, minus a trailing `+`, must be a deprecated id of `canonical`.
    pub fn new(pairs: &[(&str, &str)], canonical: &Registry) -> Result<Self, RegistryError> {
        let mut keys = HashMap::new();
        let mut entries = HashMap::new();
        for (key, target) in pairs {
            let base = key.strip_suffix('+').unwrap_or(key);
            if !canonical.is_deprecated(base) {
                return Err(RegistryError::NotDeprecated {
                    key: key.to_string(),
                });
            }
            let invalid = |source| RegistryError::InvalidTarget {
                key: key.to_string(),
                source,
            };
            let entry = DeprecatedEntry {
                original: parse(key).map_err(invalid)?,
                current: parse(target).map_err(invalid)?,
            };
            entries.insert(claim_key(&mut keys, key)?, entry);
        }
        Ok(Self { entries })
    }

    /// The expression for `id`: its replacement when `map_deprecated`,
    /// otherwise the deprecated id itself in canonical spelling.
    pub fn get(&self, id: &str, map_deprecated: bool) -> Option<&SpdxExpression> {
        self.entries
            .get(&id.trim().to_lowercase())
            .map(|entry| {
                if map_deprecated {
                    &entry.current
                } else {
                    &entry.original
                }
            })
    }
}

/// Deprecated exception ids and their current replacement id.
#[derive(Debug, Clone)]
pub struct ExceptionMapping {
    entries: HashMap<String, String>,
}

impl ExceptionMapping {
    pub fn new(pairs: &[(&str, &str)], canonical: &Registry) -> Result<Self, RegistryError> {
        let mut keys = HashMap::new();
        let mut entries = HashMap::new();
        for (key, target) in pairs {
            if !canonical.is_deprecated(key) {
                return Err(RegistryError::NotDeprecated {
                    key: key.to_string(),
                });
            }
            entries.insert(claim_key(&mut keys, key)?, target.to_string());
        }
        Ok(Self { entries })
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .get(&id.trim().to_lowercase())
            .map(String::as_str)
    }
}

static ALIASES: LazyLock<LicenseMapping> = LazyLock::new(|| {
    LicenseMapping::from_pairs(spdx::ALIASES, registry::licenses())
        .unwrap_or_else(|e| panic!("built-in license alias table: {e}"))
});

static DEPRECATED: LazyLock<DeprecatedMapping> = LazyLock::new(|| {
    DeprecatedMapping::new(spdx::DEPRECATED_LICENSES, registry::licenses())
        .unwrap_or_else(|e| panic!("built-in deprecated license table: {e}"))
});

static DEPRECATED_EXCEPTIONS: LazyLock<ExceptionMapping> = LazyLock::new(|| {
    ExceptionMapping::new(spdx::DEPRECATED_EXCEPTIONS, registry::exceptions())
        .unwrap_or_else(|e| panic!("built-in deprecated exception table: {e}"))
});

pub fn aliases() -> &'static LicenseMapping {
    &ALIASES
}

pub fn deprecated() -> &'static DeprecatedMapping {
    &DEPRECATED
}

pub fn deprecated_exceptions() -> &'static ExceptionMapping {
    &DEPRECATED_EXCEPTIONS
}

/// Map a free-text or legacy license string to an expression.
///
/// Deprecated ids are checked first, then aliases; `map_deprecated` only
/// affects the former. Returns `None` for
/// strings neither table knows, including plain canonical ids.
pub fn map(key: &str, map_deprecated: bool) -> Option<SpdxExpression> {
    if let Some(expression) = deprecated().get(key, map_deprecated) {
        return Some(expression.clone());
    }
    aliases().get(key).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::registry::RegistryEntry;

    fn registry() -> Registry {
        Registry::new([
            RegistryEntry::new("MIT", "MIT License", false),
            RegistryEntry::new("GPL-2.0", "GPL 2", true),
            RegistryEntry::new("GPL-2.0-only", "GPL 2 only", false),
        ])
        .unwrap()
    }

    #[test]
    fn test_alias_lookup_is_case_insensitive() {
        let a = map("apache2", true);
        assert_eq!(a, Some(SpdxExpression::license("Apache-2.0")));
        assert_eq!(map("APACHE2", true), a);
        assert_eq!(map("Apache2", true), a);
    }

    #[test]
    fn test_alias_to_compound() {
        assert_eq!(
            map("mit/apache-2.0", true).unwrap().to_string(),
            "MIT OR Apache-2.0"
        );
    }

    #[test]
    fn test_canonical_ids_are_not_aliases() {
        assert_eq!(map("MIT", true), None);
    }

    #[test]
    fn test_deprecated_selection() {
        assert_eq!(map("gpl-2.0+", true).unwrap().to_string(), "GPL-2.0-or-later");
        assert_eq!(map("gpl-2.0+", false).unwrap().to_string(), "GPL-2.0+");
        assert_eq!(
            map("GPL-2.0-with-classpath-exception", true).unwrap().to_string(),
            "GPL-2.0-only WITH Classpath-exception-2.0"
        );
        assert_eq!(
            map("GPL-2.0-with-classpath-exception", false).unwrap().to_string(),
            "GPL-2.0-with-classpath-exception"
        );
    }

    #[test]
    fn test_rejects_alias_of_canonical_id() {
        let err = LicenseMapping::from_pairs(&[("mit", "MIT")], &registry()).unwrap_err();
        assert!(matches!(err, RegistryError::AliasShadowsCanonical { .. }));
    }

    #[test]
    fn test_rejects_keys_differing_by_case() {
        let err = LicenseMapping::from_pairs(&[("Expat", "MIT"), ("EXPAT", "MIT")], &registry())
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateKey { .. }));
    }

    #[test]
    fn test_rejects_invalid_target() {
        let err = LicenseMapping::from_pairs(&[("Expat", "MIT OR")], &registry()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTarget { .. }));
    }

    #[test]
    fn test_deprecated_mapping_requires_deprecated_key() {
        assert!(DeprecatedMapping::new(&[("GPL-2.0", "GPL-2.0-only")], &registry()).is_ok());
        let err = DeprecatedMapping::new(&[("MIT", "MIT-0")], &registry()).unwrap_err();
        assert!(matches!(err, RegistryError::NotDeprecated { .. }));
    }

    #[test]
    fn test_deprecated_duplicate_reports_both_spellings() {
        let err = DeprecatedMapping::new(
            &[("GPL-2.0", "GPL-2.0-only"), ("gpl-2.0", "GPL-2.0-only")],
            &registry(),
        )
        .unwrap_err();
        match err {
            RegistryError::DuplicateKey { first, second } => {
                assert_eq!(first, "GPL-2.0");
                assert_eq!(second, "gpl-2.0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_exception_mapping_rejects_keys_differing_by_case() {
        let exceptions = Registry::new([
            RegistryEntry::new("Nokia-Qt-exception-1.1", "Nokia Qt LGPL exception 1.1", true),
            RegistryEntry::new("Qt-LGPL-exception-1.1", "Qt LGPL exception 1.1", false),
        ])
        .unwrap();
        let err = ExceptionMapping::new(
            &[
                ("Nokia-Qt-exception-1.1", "Qt-LGPL-exception-1.1"),
                ("NOKIA-QT-EXCEPTION-1.1", "Qt-LGPL-exception-1.1"),
            ],
            &exceptions,
        )
        .unwrap_err();
        match err {
            RegistryError::DuplicateKey { first, second } => {
                assert_eq!(first, "Nokia-Qt-exception-1.1");
                assert_eq!(second, "NOKIA-QT-EXCEPTION-1.1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_built_in_tables_load() {
        assert!(!aliases().is_empty());
        assert_eq!(
            deprecated_exceptions().get("nokia-qt-exception-1.1"),
            Some("Qt-LGPL-exception-1.1")
        );
    }
}
