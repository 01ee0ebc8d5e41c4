use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::expression::{SpdxExpression, Strictness};
use crate::license::DeclaredLicenseProcessor;

/// Root configuration structure, deserialized from `.license-resolvr/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub expression: ExpressionConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Curated declared-license mappings, keyed by the string as it appears
    /// in package metadata. Applied before the built-in alias table.
    #[serde(default)]
    pub declared_license_mapping: BTreeMap<String, SpdxExpression>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExpressionConfig {
    /// Strictness applied to concluded and detected expressions read from
    /// evidence files. Defaults to `allow-any`.
    #[serde(default)]
    pub strictness: Strictness,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolverConfig {
    /// Replace deprecated SPDX ids by their current equivalents.
    #[serde(default = "default_map_deprecated")]
    pub map_deprecated: bool,
}

fn default_map_deprecated() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            map_deprecated: default_map_deprecated(),
        }
    }
}

impl Config {
    /// A declared-license processor carrying the configured curations.
    pub fn declared_license_processor(&self) -> DeclaredLicenseProcessor {
        DeclaredLicenseProcessor::new().with_curations(
            self.declared_license_mapping
                .iter()
                .map(|(key, expression)| (key.clone(), expression.clone())),
        )
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` (path passed via `--config`)
/// 2. `<base_dir>/.license-resolvr/config.toml`
/// 3. `~/.config/license-resolvr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = base_dir.join(".license-resolvr").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-resolvr")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.expression.strictness, Strictness::AllowAny);
        assert!(config.resolver.map_deprecated);
        assert!(config.declared_license_mapping.is_empty());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_all_sections() {
        let config: Config = toml::from_str(
            r#"
            [expression]
            strictness = "allow-current"

            [resolver]
            map_deprecated = false

            [declared_license_mapping]
            "The Apache Software License" = "Apache-2.0"
            "Dual MIT/GPL" = "MIT OR GPL-2.0-only"
            "#,
        )
        .unwrap();

        assert_eq!(config.expression.strictness, Strictness::AllowCurrent);
        assert!(!config.resolver.map_deprecated);
        assert_eq!(
            config.declared_license_mapping["Dual MIT/GPL"].to_string(),
            "MIT OR GPL-2.0-only"
        );
    }

    #[test]
    fn test_malformed_mapping_is_rejected() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [declared_license_mapping]
            "broken" = "MIT AND"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_override_path_wins() {
        let dir = TempDir::new().unwrap();
        let local = dir.path().join(".license-resolvr");
        std::fs::create_dir_all(&local).unwrap();
        std::fs::write(
            local.join("config.toml"),
            "[resolver]\nmap_deprecated = false\n",
        )
        .unwrap();
        let override_path = dir.path().join("custom.toml");
        std::fs::write(&override_path, "[expression]\nstrictness = \"allow-deprecated\"\n")
            .unwrap();

        let config = load_config(dir.path(), Some(&override_path)).unwrap();
        assert_eq!(config.expression.strictness, Strictness::AllowDeprecated);
        assert!(config.resolver.map_deprecated);
    }

    #[test]
    fn test_local_config_is_found() {
        let dir = TempDir::new().unwrap();
        let local = dir.path().join(".license-resolvr");
        std::fs::create_dir_all(&local).unwrap();
        std::fs::write(
            local.join("config.toml"),
            "[resolver]\nmap_deprecated = false\n",
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert!(!config.resolver.map_deprecated);
    }

    #[test]
    fn test_missing_override_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_curations_reach_the_processor() {
        let config: Config = toml::from_str(
            r#"
            [declared_license_mapping]
            "Some Custom License" = "LicenseRef-custom"
            "#,
        )
        .unwrap();
        let declared: BTreeSet<String> = ["Some Custom License".to_string()].into();
        let processed = config.declared_license_processor().process(&declared);
        assert_eq!(
            processed.spdx_expression.unwrap().to_string(),
            "LicenseRef-custom"
        );
    }
}
