use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;
use thiserror::Error;

use super::spdx;
use crate::expression::ExpressionError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("canonical ids '{first}' and '{second}' collide case-insensitively")]
    CaseCollision { first: String, second: String },

    #[error("mapping keys '{first}' and '{second}' differ only by case")]
    DuplicateKey { first: String, second: String },

    #[error("alias '{alias}' is the canonical id '{canonical}'; aliases are for non-canonical spellings only")]
    AliasShadowsCanonical { alias: String, canonical: String },

    #[error("'{key}' is not a deprecated id")]
    NotDeprecated { key: String },

    #[error("mapping target for '{key}' is invalid: {source}")]
    InvalidTarget {
        key: String,
        #[source]
        source: ExpressionError,
    },
}

/// Metadata of one canonical license or exception id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub id: String,
    pub full_name: String,
    pub deprecated: bool,
    pub text: Option<String>,
}

impl RegistryEntry {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>, deprecated: bool) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            deprecated,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// An immutable id table with case-insensitive lookup.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: HashMap<String, RegistryEntry>,
}

impl Registry {
    /// Build a registry. Fails if two ids are equal ignoring case.
    pub fn new(entries: impl IntoIterator<Item = RegistryEntry>) -> Result<Self, RegistryError> {
        let mut map: HashMap<String, RegistryEntry> = HashMap::new();
        for entry in entries {
            let key = entry.id.to_ascii_lowercase();
            if let Some(existing) = map.get(&key) {
                return Err(RegistryError::CaseCollision {
                    first: existing.id.clone(),
                    second: entry.id,
                });
            }
            map.insert(key, entry);
        }
        Ok(Self { entries: map })
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.get(&id.trim().to_ascii_lowercase())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_deprecated(&self, id: &str) -> bool {
        self.get(id).is_some_and(|e| e.deprecated)
    }

    /// All canonical ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.values().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn from_table(table: &[(&str, &str, bool)]) -> Result<Registry, RegistryError> {
    Registry::new(
        table
            .iter()
            .map(|(id, name, deprecated)| RegistryEntry::new(*id, *name, *deprecated)),
    )
}

static LICENSES: LazyLock<Registry> = LazyLock::new(|| {
    from_table(spdx::LICENSES).unwrap_or_else(|e| panic!("built-in SPDX license table: {e}"))
});

static EXCEPTIONS: LazyLock<Registry> = LazyLock::new(|| {
    from_table(spdx::EXCEPTIONS).unwrap_or_else(|e| panic!("built-in SPDX exception table: {e}"))
});

/// The process-wide SPDX license registry.
pub fn licenses() -> &'static Registry {
    &LICENSES
}

/// The process-wide SPDX exception registry.
pub fn exceptions() -> &'static Registry {
    &EXCEPTIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_case_collision() {
        let err = Registry::new([
            RegistryEntry::new("MIT", "MIT License", false),
            RegistryEntry::new("mit", "MIT License", false),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RegistryError::CaseCollision {
                first: "MIT".to_string(),
                second: "mit".to_string()
            }
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let entry = licenses().get("apache-2.0").unwrap();
        assert_eq!(entry.id, "Apache-2.0");
        assert!(!entry.deprecated);
        assert!(licenses().is_deprecated("gpl-2.0"));
        assert!(exceptions().contains("CLASSPATH-EXCEPTION-2.0"));
    }

    #[test]
    fn test_built_in_tables_load() {
        assert!(licenses().len() > 50);
        assert!(!exceptions().is_empty());
        assert!(licenses().ids().contains(&"MIT"));
    }

    #[test]
    fn test_entry_text() {
        let registry = Registry::new([
            RegistryEntry::new("LicenseRef-acme", "ACME", false).with_text("All yours."),
        ])
        .unwrap();
        assert_eq!(
            registry.get("licenseref-ACME").unwrap().text.as_deref(),
            Some("All yours.")
        );
    }
}
