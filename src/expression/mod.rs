//! The SPDX license expression language.
//!
//! - [`parser`] turns expression text into a [`SpdxExpression`] tree.
//! - [`SpdxExpression`]'s `Display` is the canonical printer; parsing its
//!   output yields a structurally equal tree.
//! - [`SpdxExpression::decompose`] flattens a tree into its single-license
//!   terms for aggregate reporting.

mod lexer;
pub mod parser;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::license::{mapping, registry};

pub use parser::parse;

/// How strictly license ids are checked by [`SpdxExpression::validate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strictness {
    /// Any syntactically valid id; unknown ids are opaque.
    #[default]
    AllowAny,
    /// SPDX ids, including deprecated ones.
    AllowDeprecated,
    /// Only current, non-deprecated SPDX ids.
    AllowCurrent,
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strictness::AllowAny => write!(f, "allow-any"),
            Strictness::AllowDeprecated => write!(f, "allow-deprecated"),
            Strictness::AllowCurrent => write!(f, "allow-current"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// The text does not match the expression grammar.
    #[error("malformed license expression '{expression}': {message} at offset {offset} near '{fragment}'")]
    Syntax {
        expression: String,
        fragment: String,
        offset: usize,
        message: String,
    },

    /// The text parses, but uses an id the requested strictness rejects.
    #[error("license expression '{expression}' is invalid under {strictness}: {reason}")]
    Validation {
        expression: String,
        strictness: Strictness,
        reason: String,
    },
}

impl ExpressionError {
    pub(crate) fn syntax(expression: &str, fragment: &str, offset: usize, message: &str) -> Self {
        ExpressionError::Syntax {
            expression: expression.to_string(),
            fragment: fragment.to_string(),
            offset,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    And,
    Or,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
        }
    }
}

/// A single-license term: `id[+] [WITH exception]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseTerm {
    pub id: String,
    pub or_later: bool,
    pub exception: Option<String>,
}

impl LicenseTerm {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            or_later: false,
            exception: None,
        }
    }

    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    pub fn or_later(mut self) -> Self {
        self.or_later = true;
        self
    }

    /// Whether the id is a `LicenseRef-` or `DocumentRef-` reference.
    pub fn is_reference(&self) -> bool {
        let lower = self.id.to_ascii_lowercase();
        lower.starts_with("licenseref-") || lower.starts_with("documentref-")
    }

    /// The id with its `+` suffix, if any; the key used by the mapping tables.
    fn mapping_key(&self) -> String {
        if self.or_later {
            format!("{}+", self.id)
        } else {
            self.id.clone()
        }
    }
}

impl fmt::Display for LicenseTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if self.or_later {
            write!(f, "+")?;
        }
        if let Some(exception) = &self.exception {
            write!(f, " WITH {}", exception)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for LicenseTerm {
    type Error = ExpressionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match parse(&value)? {
            SpdxExpression::License(term) => Ok(term),
            SpdxExpression::Compound { .. } => Err(ExpressionError::syntax(
                &value,
                &value,
                0,
                "expected a single license",
            )),
        }
    }
}

impl From<LicenseTerm> for String {
    fn from(term: LicenseTerm) -> Self {
        term.to_string()
    }
}

/// An immutable license expression tree.
///
/// A `Compound` always has at least two operands.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpdxExpression {
    License(LicenseTerm),
    Compound {
        operator: Operator,
        operands: Vec<SpdxExpression>,
    },
}

impl SpdxExpression {
    pub fn license(id: impl Into<String>) -> Self {
        SpdxExpression::License(LicenseTerm::new(id))
    }

    /// Parse and validate in one step.
    pub fn parse_with(text: &str, strictness: Strictness) -> Result<Self, ExpressionError> {
        let expression = parse(text)?;
        expression.validate(strictness)?;
        Ok(expression)
    }

    /// Combine expressions under one operator. Returns `None` for an empty
    /// input and the expression itself for a single one.
    pub fn compound(
        operator: Operator,
        operands: impl IntoIterator<Item = SpdxExpression>,
    ) -> Option<Self> {
        let mut operands: Vec<_> = operands.into_iter().collect();
        match operands.len() {
            0 => None,
            1 => operands.pop(),
            _ => Some(SpdxExpression::Compound { operator, operands }),
        }
    }

    pub fn and(self, other: SpdxExpression) -> Self {
        SpdxExpression::Compound {
            operator: Operator::And,
            operands: vec![self, other],
        }
    }

    pub fn or(self, other: SpdxExpression) -> Self {
        SpdxExpression::Compound {
            operator: Operator::Or,
            operands: vec![self, other],
        }
    }

    /// Flatten AND and OR alike into the ordered list of leaf terms.
    ///
    /// This drops the logical structure: `A AND B` and `A OR B` both give
    /// `[A, B]`. It serves aggregate license-set reporting only, never
    /// satisfiability. Duplicates are kept.
    pub fn decompose(&self) -> Vec<LicenseTerm> {
        let mut terms = Vec::new();
        self.collect_terms(&mut terms);
        terms
    }

    fn collect_terms(&self, terms: &mut Vec<LicenseTerm>) {
        match self {
            SpdxExpression::License(term) => terms.push(term.clone()),
            SpdxExpression::Compound { operands, .. } => {
                for operand in operands {
                    operand.collect_terms(terms);
                }
            }
        }
    }

    /// The distinct license ids used anywhere in the expression.
    pub fn licenses(&self) -> BTreeSet<String> {
        self.decompose().into_iter().map(|t| t.id).collect()
    }

    /// Check every id against the registries under `strictness`.
    pub fn validate(&self, strictness: Strictness) -> Result<(), ExpressionError> {
        if strictness == Strictness::AllowAny {
            return Ok(());
        }

        let fail = |reason: String| ExpressionError::Validation {
            expression: self.to_string(),
            strictness,
            reason,
        };

        for term in self.decompose() {
            if !term.is_reference() {
                match registry::licenses().get(&term.id) {
                    None => return Err(fail(format!("unknown license id '{}'", term.id))),
                    Some(entry) if entry.deprecated && strictness == Strictness::AllowCurrent => {
                        return Err(fail(format!("license id '{}' is deprecated", entry.id)));
                    }
                    Some(_) => {}
                }
            }

            if let Some(exception) = &term.exception {
                if exception.to_ascii_lowercase().starts_with("licenseref-") {
                    continue;
                }
                match registry::exceptions().get(exception) {
                    None => return Err(fail(format!("unknown exception id '{}'", exception))),
                    Some(entry) if entry.deprecated && strictness == Strictness::AllowCurrent => {
                        return Err(fail(format!("exception id '{}' is deprecated", entry.id)));
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }

    /// Rewrite every leaf through the alias and deprecated-id tables and fix
    /// the letter case of known ids.
    ///
    /// With `map_deprecated`, deprecated ids become their current
    /// replacement (`GPL-2.0+` to `GPL-2.0-or-later`); without it they keep
    /// their original id.
    pub fn normalize(&self, map_deprecated: bool) -> SpdxExpression {
        match self {
            SpdxExpression::License(term) => normalize_term(term, map_deprecated),
            SpdxExpression::Compound { operator, operands } => SpdxExpression::Compound {
                operator: *operator,
                operands: operands
                    .iter()
                    .map(|o| o.normalize(map_deprecated))
                    .collect(),
            },
        }
    }

    fn fmt_operand(
        &self,
        f: &mut fmt::Formatter<'_>,
        parent: Operator,
    ) -> fmt::Result {
        match self {
            SpdxExpression::License(term) => write!(f, "{}", term),
            // AND inside OR is the only nesting precedence makes implicit.
            // A compound with the parent's own operator needs parentheses,
            // or it would flatten into the parent when parsed again.
            SpdxExpression::Compound { operator, .. }
                if parent == Operator::Or && *operator == Operator::And =>
            {
                write!(f, "{}", self)
            }
            SpdxExpression::Compound { .. } => write!(f, "({})", self),
        }
    }
}

fn normalize_term(term: &LicenseTerm, map_deprecated: bool) -> SpdxExpression {
    let exception = term
        .exception
        .as_deref()
        .map(|e| normalize_exception(e, map_deprecated));

    let mapped = mapping::map(&term.mapping_key(), map_deprecated).or_else(|| {
        // Retry without the `+` and put it back on a single-license result.
        let base = mapping::map(&term.id, map_deprecated)?;
        match base {
            SpdxExpression::License(mut t) if term.or_later && t.exception.is_none() => {
                t.or_later = true;
                Some(SpdxExpression::License(t))
            }
            other if !term.or_later => Some(other),
            _ => None,
        }
    });

    match (mapped, exception) {
        (Some(expression), None) => expression,
        (Some(SpdxExpression::License(mut t)), Some(exception)) if t.exception.is_none() => {
            t.exception = Some(exception);
            SpdxExpression::License(t)
        }
        (mapped, exception) => {
            // A term carries at most one exception, so a target that is a
            // compound or has its own exception cannot take this one.
            if let (Some(target), Some(exception)) = (&mapped, &exception) {
                tracing::warn!(
                    term = %term,
                    target = %target,
                    exception = %exception,
                    "mapping skipped: target cannot carry the term's exception"
                );
            }
            let id = registry::licenses()
                .get(&term.id)
                .map(|entry| entry.id.clone())
                .unwrap_or_else(|| term.id.clone());
            SpdxExpression::License(LicenseTerm {
                id,
                or_later: term.or_later,
                exception,
            })
        }
    }
}

fn normalize_exception(exception: &str, map_deprecated: bool) -> String {
    if map_deprecated {
        if let Some(current) = mapping::deprecated_exceptions().get(exception) {
            return current.to_string();
        }
    }
    registry::exceptions()
        .get(exception)
        .map(|entry| entry.id.clone())
        .unwrap_or_else(|| exception.to_string())
}

impl fmt::Display for SpdxExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpdxExpression::License(term) => write!(f, "{}", term),
            SpdxExpression::Compound { operator, operands } => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", operator)?;
                    }
                    operand.fmt_operand(f, *operator)?;
                }
                Ok(())
            }
        }
    }
}

impl From<LicenseTerm> for SpdxExpression {
    fn from(term: LicenseTerm) -> Self {
        SpdxExpression::License(term)
    }
}

impl std::str::FromStr for SpdxExpression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl TryFrom<String> for SpdxExpression {
    type Error = ExpressionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse(&value)
    }
}

impl From<SpdxExpression> for String {
    fn from(expression: SpdxExpression) -> Self {
        expression.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(text: &str) -> SpdxExpression {
        parse(text).unwrap()
    }

    fn ids(terms: &[LicenseTerm]) -> Vec<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_decompose_and_or_alike() {
        let and = SpdxExpression::license("MIT").and(SpdxExpression::license("Apache-2.0"));
        let or = SpdxExpression::license("MIT").or(SpdxExpression::license("Apache-2.0"));
        assert_eq!(ids(&and.decompose()), vec!["MIT", "Apache-2.0"]);
        assert_eq!(and.decompose(), or.decompose());
    }

    #[test]
    fn test_decompose_keeps_order_and_duplicates() {
        let e = expr("(MIT OR ISC) AND (MIT WITH foo OR GPL-2.0+)");
        assert_eq!(
            ids(&e.decompose()),
            vec!["MIT", "ISC", "MIT WITH foo", "GPL-2.0+"]
        );
    }

    #[test]
    fn test_decompose_is_idempotent() {
        let once = expr("A AND (B OR C WITH x) AND A").decompose();
        let again: Vec<_> = once
            .iter()
            .cloned()
            .flat_map(|t| SpdxExpression::from(t).decompose())
            .collect();
        assert_eq!(once, again);
    }

    #[test]
    fn test_print_minimal_parentheses() {
        assert_eq!(expr("MIT OR (ISC AND 0BSD)").to_string(), "MIT OR ISC AND 0BSD");
        assert_eq!(expr("(MIT OR ISC) AND 0BSD").to_string(), "(MIT OR ISC) AND 0BSD");
        assert_eq!(expr("mit or isc").to_string(), "mit OR isc");
    }

    #[test]
    fn test_print_keeps_explicit_same_operator_grouping() {
        let e = expr("(A OR B) OR C");
        assert_eq!(e.to_string(), "(A OR B) OR C");
        assert_eq!(parse(&e.to_string()).unwrap(), e);
    }

    #[test]
    fn test_built_nesting_round_trips() {
        let e = SpdxExpression::license("A")
            .and(SpdxExpression::license("B"))
            .and(SpdxExpression::license("C").or(SpdxExpression::license("D")));
        assert_eq!(e.to_string(), "(A AND B) AND (C OR D)");
        assert_eq!(parse(&e.to_string()).unwrap(), e);
    }

    #[test]
    fn test_validate_levels() {
        let unknown = expr("MIT AND Foo-Bar");
        assert!(unknown.validate(Strictness::AllowAny).is_ok());
        assert!(matches!(
            unknown.validate(Strictness::AllowDeprecated),
            Err(ExpressionError::Validation { .. })
        ));

        let deprecated = expr("GPL-2.0 WITH Classpath-exception-2.0");
        assert!(deprecated.validate(Strictness::AllowDeprecated).is_ok());
        let err = deprecated.validate(Strictness::AllowCurrent).unwrap_err();
        assert!(err.to_string().contains("deprecated"));

        assert!(expr("GPL-2.0-only OR LicenseRef-acme")
            .validate(Strictness::AllowCurrent)
            .is_ok());
    }

    #[test]
    fn test_validate_is_case_insensitive() {
        assert!(expr("apache-2.0").validate(Strictness::AllowCurrent).is_ok());
    }

    #[test]
    fn test_validate_unknown_exception() {
        let err = expr("MIT WITH Not-An-Exception")
            .validate(Strictness::AllowDeprecated)
            .unwrap_err();
        assert!(err.to_string().contains("Not-An-Exception"));
    }

    #[test]
    fn test_parse_with_rejects_deprecated() {
        assert!(SpdxExpression::parse_with("GPL-3.0+", Strictness::AllowCurrent).is_err());
        assert!(SpdxExpression::parse_with("GPL-3.0-or-later", Strictness::AllowCurrent).is_ok());
    }

    #[test]
    fn test_normalize_maps_deprecated() {
        assert_eq!(
            expr("GPL-2.0+ OR lgpl-2.1").normalize(true).to_string(),
            "GPL-2.0-or-later OR LGPL-2.1-only"
        );
        assert_eq!(
            expr("GPL-2.0+ OR lgpl-2.1").normalize(false).to_string(),
            "GPL-2.0+ OR LGPL-2.1"
        );
    }

    #[test]
    fn test_normalize_deprecated_license_with_embedded_exception() {
        assert_eq!(
            expr("GPL-2.0-with-classpath-exception").normalize(true),
            expr("GPL-2.0-only WITH Classpath-exception-2.0")
        );
    }

    #[test]
    fn test_normalize_keeps_term_when_target_cannot_take_exception() {
        // wxWindows maps to a term that already has an exception.
        assert_eq!(
            expr("wxwindows WITH font-exception-2.0").normalize(true).to_string(),
            "wxWindows WITH Font-exception-2.0"
        );
        // GPL-2.0-with-font-exception maps to a term with its own exception.
        assert_eq!(
            expr("GPL-2.0-with-font-exception WITH Classpath-exception-2.0")
                .normalize(true)
                .to_string(),
            "GPL-2.0-with-font-exception WITH Classpath-exception-2.0"
        );
    }

    #[test]
    fn test_normalize_attaches_exception_to_single_license_target() {
        assert_eq!(
            expr("GPL-2.0 WITH Classpath-exception-2.0").normalize(true).to_string(),
            "GPL-2.0-only WITH Classpath-exception-2.0"
        );
    }

    #[test]
    fn test_normalize_keeps_unknown_ids() {
        assert_eq!(
            expr("LicenseRef-acme AND Foo").normalize(true).to_string(),
            "LicenseRef-acme AND Foo"
        );
    }

    #[test]
    fn test_serde_as_string() {
        let e = expr("MIT OR Apache-2.0");
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, "\"MIT OR Apache-2.0\"");
        let back: SpdxExpression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
        assert!(serde_json::from_str::<SpdxExpression>("\"MIT OR\"").is_err());
    }

    #[test]
    fn test_license_term_rejects_compound() {
        assert!(LicenseTerm::try_from("MIT AND ISC".to_string()).is_err());
        assert_eq!(
            LicenseTerm::try_from("GPL-2.0+".to_string()).unwrap(),
            LicenseTerm::new("GPL-2.0").or_later()
        );
    }
}
