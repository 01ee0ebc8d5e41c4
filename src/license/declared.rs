use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::{mapping, registry};
use crate::expression::{parse, Operator, SpdxExpression};

/// The outcome of mapping a package's declared license strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedDeclaredLicense {
    /// AND of every string that could be mapped or parsed.
    pub spdx_expression: Option<SpdxExpression>,
    /// Strings that needed a mapping to become an expression.
    #[serde(default)]
    pub mapped: BTreeMap<String, SpdxExpression>,
    /// Strings that could not be turned into a known expression.
    #[serde(default)]
    pub unmapped: BTreeSet<String>,
}

impl ProcessedDeclaredLicense {
    /// The expression a single declared string contributed, if any.
    pub fn expression_for(&self, declared: &str) -> Option<SpdxExpression> {
        if let Some(expression) = self.mapped.get(declared) {
            return Some(expression.clone());
        }
        if self.unmapped.contains(declared) {
            return None;
        }
        parse(declared).ok()
    }
}

/// Turns the free-text license strings found in manifests into expressions.
#[derive(Debug, Clone, Default)]
pub struct DeclaredLicenseProcessor {
    curations: HashMap<String, SpdxExpression>,
}

impl DeclaredLicenseProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add mappings that take precedence over the built-in alias table.
    pub fn with_curations(
        mut self,
        curations: impl IntoIterator<Item = (String, SpdxExpression)>,
    ) -> Self {
        self.curations.extend(
            curations
                .into_iter()
                .map(|(key, expression)| (key.trim().to_lowercase(), expression)),
        );
        self
    }

    /// Map a single declared string. The flag is set when the result differs
    /// from the string as written.
    fn process_one(&self, declared: &str) -> Option<(SpdxExpression, bool)> {
        let key = declared.trim();
        if key.is_empty() {
            return None;
        }
        if let Some(expression) = self.curations.get(&key.to_lowercase()) {
            return Some((expression.clone(), true));
        }
        if let Some(expression) = mapping::map(key, true) {
            return Some((expression, true));
        }

        let parsed = parse(key).ok()?;
        let all_known = parsed
            .decompose()
            .iter()
            .all(|term| term.is_reference() || registry::licenses().contains(&term.id));
        if !all_known {
            return None;
        }
        let normalized = parsed.normalize(true);
        let changed = normalized.to_string() != key;
        Some((normalized, changed))
    }

    pub fn process(&self, declared: &BTreeSet<String>) -> ProcessedDeclaredLicense {
        let mut result = ProcessedDeclaredLicense::default();
        let mut operands: Vec<SpdxExpression> = Vec::new();

        for license in declared {
            match self.process_one(license) {
                Some((expression, changed)) => {
                    if changed {
                        result.mapped.insert(license.clone(), expression.clone());
                    }
                    if !operands.contains(&expression) {
                        operands.push(expression);
                    }
                }
                None => {
                    tracing::warn!(license = %license, "declared license could not be mapped");
                    result.unmapped.insert(license.clone());
                }
            }
        }

        result.spdx_expression = SpdxExpression::compound(Operator::And, operands);
        result
    }
}
