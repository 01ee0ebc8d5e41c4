//! Grouping of copyright statements that differ only in formatting.
//!
//! Two statements land in the same group when they name the same holder
//! after normalization: whitespace collapsed, copyright markers (`copyright`,
//! `(c)`, `©`, `copr.`) and years removed, `all rights reserved` dropped,
//! letter case folded. Statements without a marker or without a holder are
//! not grouped.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:copyright\b|copyrights\b|copr\.|\(c\)|©)\s*[:,]?\s*")
        .unwrap_or_else(|e| panic!("copyright marker pattern: {e}"))
});

static YEARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:19|20)\d{2}\b(?:\s*(?:-|–|to|,)\s*(?:(?:19|20)\d{2}\b|\d{2}\b|present\b))*\s*[,.;:]?",
    )
    .unwrap_or_else(|e| panic!("copyright year pattern: {e}"))
});

static RESERVED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s,.;]*all\s+rights\s+reserved[\s.]*$")
        .unwrap_or_else(|e| panic!("rights reserved pattern: {e}"))
});

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trim_punctuation(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':' | '-'))
}

/// The holder key of a statement, or `None` when it cannot be grouped.
///
/// Two statements share a group exactly when their keys are equal.
pub fn holder_key(statement: &str) -> Option<String> {
    let mut text = collapse_whitespace(statement).to_lowercase();

    let mut found_marker = false;
    loop {
        let stripped = trim_punctuation(&text).to_string();
        let Some(m) = MARKER.find(&stripped) else {
            text = stripped;
            break;
        };
        found_marker = true;
        text = stripped[m.end()..].to_string();
    }
    if !found_marker {
        return None;
    }

    let text = YEARS.replace_all(&text, " ");
    let text = RESERVED.replace(&text, "");
    let text = collapse_whitespace(&text);
    let text = trim_punctuation(&text);
    let text = text.strip_prefix("by ").unwrap_or(text);
    let holder = trim_punctuation(text);

    if holder.is_empty() {
        None
    } else {
        Some(holder.to_string())
    }
}

/// The grouping of a set of copyright statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedCopyrights {
    /// Representative statement to every variant grouped under it,
    /// the representative included.
    pub groups: BTreeMap<String, BTreeSet<String>>,
    /// Statements that were not grouped; each stands for itself.
    pub unprocessed: BTreeSet<String>,
}

impl ProcessedCopyrights {
    /// The statement that stands for `statement` in reports.
    pub fn representative_of<'a>(&'a self, statement: &'a str) -> &'a str {
        if self.unprocessed.contains(statement) {
            return statement;
        }
        self.groups
            .iter()
            .find(|(_, variants)| variants.contains(statement))
            .map(|(representative, _)| representative.as_str())
            .unwrap_or(statement)
    }

    /// A lookup table from every known statement to its representative.
    pub fn index(&self) -> HashMap<&str, &str> {
        let mut index = HashMap::new();
        for (representative, variants) in &self.groups {
            for variant in variants {
                index.insert(variant.as_str(), representative.as_str());
            }
        }
        for statement in &self.unprocessed {
            index.insert(statement.as_str(), statement.as_str());
        }
        index
    }
}

/// Group a multiset of raw statements.
///
/// The representative of a group is one of its observed variants: the most
/// frequent, then the longest, then the lexicographically smallest. The
/// same input always gives the same output.
pub fn process<I, S>(statements: I) -> ProcessedCopyrights
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for statement in statements {
        *counts.entry(statement.as_ref().to_string()).or_insert(0) += 1;
    }

    let mut by_holder: BTreeMap<String, Vec<(&String, usize)>> = BTreeMap::new();
    let mut result = ProcessedCopyrights::default();

    for (statement, &count) in &counts {
        match holder_key(statement) {
            Some(key) => by_holder.entry(key).or_default().push((statement, count)),
            None => {
                result.unprocessed.insert(statement.clone());
            }
        }
    }

    for variants in by_holder.into_values() {
        let Some(&(representative, _)) = variants.iter().min_by(|(a, count_a), (b, count_b)| {
            count_b
                .cmp(count_a)
                .then_with(|| b.len().cmp(&a.len()))
                .then_with(|| a.cmp(b))
        }) else {
            continue;
        };
        result.groups.insert(
            representative.clone(),
            variants.iter().map(|(s, _)| (*s).clone()).collect(),
        );
    }

    tracing::trace!(
        groups = result.groups.len(),
        unprocessed = result.unprocessed.len(),
        "processed copyright statements"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_variants_group_together() {
        let processed = process(["Copyright 2020 Jane Doe", "Copyright (c) 2020 Jane Doe"]);
        assert_eq!(processed.groups.len(), 1);
        let (representative, variants) = processed.groups.iter().next().unwrap();
        assert_eq!(representative, "Copyright (c) 2020 Jane Doe");
        assert_eq!(variants.len(), 2);
        assert!(processed.unprocessed.is_empty());
    }

    #[test]
    fn test_different_holders_never_merge() {
        let processed = process(["Copyright 2020 Jane Doe", "Copyright 2020 John Roe"]);
        assert_eq!(processed.groups.len(), 2);
        for variants in processed.groups.values() {
            assert_eq!(variants.len(), 1);
        }
    }

    #[test]
    fn test_years_and_whitespace_are_ignored() {
        for (a, b) in [
            ("Copyright 2019-2021 Acme Inc.", "copyright  2020, 2021  ACME Inc"),
            ("© 2001 - 2005 Foo Bar. All rights reserved.", "Copyright (C) 2003 Foo Bar"),
            ("Copyright (c) 1999 by The Authors", "Copr. The Authors"),
        ] {
            assert_eq!(holder_key(a), holder_key(b), "{a:?} vs {b:?}");
            assert!(holder_key(a).is_some());
        }
    }

    #[test]
    fn test_holder_key_values() {
        assert_eq!(
            holder_key("Copyright (c) 2015-2020 Jane Doe, All Rights Reserved."),
            Some("jane doe".to_string())
        );
        assert_eq!(holder_key("Copyright 2020"), None);
        assert_eq!(holder_key("Jane Doe wrote this"), None);
    }

    #[test]
    fn test_ungroupable_statements_are_kept() {
        let processed = process(["Copyright 2020", "Portions by Jane Doe"]);
        assert!(processed.groups.is_empty());
        assert_eq!(processed.unprocessed.len(), 2);
        assert_eq!(processed.representative_of("Copyright 2020"), "Copyright 2020");
    }

    #[test]
    fn test_most_frequent_variant_wins() {
        let processed = process([
            "Copyright 2020 Jane Doe",
            "Copyright 2020 Jane Doe",
            "Copyright (c) 2020 Jane Doe",
        ]);
        assert_eq!(
            processed.representative_of("Copyright (c) 2020 Jane Doe"),
            "Copyright 2020 Jane Doe"
        );
    }

    #[test]
    fn test_deterministic_under_input_order() {
        let a = process(["Copyright 2021 X Corp", "Copyright (c) 2020 X Corp", "© Y Ltd"]);
        let b = process(["© Y Ltd", "Copyright (c) 2020 X Corp", "Copyright 2021 X Corp"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_index_covers_all_statements() {
        let processed = process(["Copyright 2020 Jane Doe", "(c) Jane Doe", "Copyright"]);
        let index = processed.index();
        assert_eq!(index.len(), 3);
        assert_eq!(index["(c) Jane Doe"], index["Copyright 2020 Jane Doe"]);
        assert_eq!(index["Copyright"], "Copyright");
    }
}
