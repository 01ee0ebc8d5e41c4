//! File-backed license evidence.
//!
//! An evidence file is a JSON document:
//!
//! ```json
//! {
//!   "packages": [{
//!     "id": "Maven:org.example:lib:1.0",
//!     "concluded_license": "MIT",
//!     "declared_licenses": ["BSD-3"],
//!     "findings": [{
//!       "provenance": { "kind": "artifact", "url": "https://..." },
//!       "licenses": [{ "license": "Apache-2.0",
//!                      "location": { "path": "src/lib.c", "start_line": 1, "end_line": 5 } }],
//!       "copyrights": [{ "statement": "Copyright 2020 Jane Doe",
//!                        "location": { "path": "src/lib.c", "start_line": 3, "end_line": 3 } }]
//!     }]
//!   }],
//!   "projects": [],
//!   "graph": null
//! }
//! ```
//!
//! License strings are parsed while loading. A string that does not parse,
//! or fails the configured strictness, is dropped and recorded as an
//! [`Issue`] of its package instead of failing the whole file.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;
use crate::expression::{SpdxExpression, Strictness};
use crate::graph::tree::Project;
use crate::graph::{DependencyGraph, DependencyNavigator, GraphNavigator, TreeNavigator};
use crate::license::DeclaredLicenseProcessor;
use crate::models::{CopyrightFinding, Identifier, Issue, LicenseFinding, Provenance, Severity};
use crate::resolver::{LicenseInfo, LicenseInfoProvider, ProvenanceFindings};

const ISSUE_SOURCE: &str = "evidence";

#[derive(Debug, Deserialize)]
struct RawEvidence {
    #[serde(default)]
    packages: Vec<RawPackage>,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    graph: Option<DependencyGraph>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    id: Identifier,
    #[serde(default)]
    concluded_license: Option<String>,
    #[serde(default)]
    declared_licenses: BTreeSet<String>,
    #[serde(default)]
    findings: Vec<RawFindings>,
}

#[derive(Debug, Deserialize)]
struct RawFindings {
    provenance: Provenance,
    #[serde(default)]
    licenses: Vec<RawLicenseFinding>,
    #[serde(default)]
    copyrights: Vec<CopyrightFinding>,
}

#[derive(Debug, Deserialize)]
struct RawLicenseFinding {
    license: String,
    location: crate::models::TextLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvidenceError {
    #[error("no license evidence for package '{0}'")]
    UnknownPackage(Identifier),
}

/// How license strings are turned into expressions while loading.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub strictness: Strictness,
    pub map_deprecated: bool,
    pub declared: DeclaredLicenseProcessor,
}

impl From<&Config> for LoadOptions {
    fn from(config: &Config) -> Self {
        Self {
            strictness: config.expression.strictness,
            map_deprecated: config.resolver.map_deprecated,
            declared: config.declared_license_processor(),
        }
    }
}

/// License evidence and dependency data loaded from one file.
#[derive(Debug, Clone, Default)]
pub struct FileProvider {
    infos: HashMap<Identifier, LicenseInfo>,
    issues: BTreeMap<Identifier, Vec<Issue>>,
    projects: Vec<Project>,
    graph: Option<Arc<DependencyGraph>>,
}

impl FileProvider {
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read evidence file {}", path.display()))?;
        Self::from_json(&content, options)
            .with_context(|| format!("failed to load evidence file {}", path.display()))
    }

    pub fn from_json(content: &str, options: &LoadOptions) -> Result<Self> {
        let raw: RawEvidence =
            serde_json::from_str(content).context("malformed evidence document")?;

        let mut provider = FileProvider {
            projects: raw.projects,
            graph: raw.graph.map(Arc::new),
            ..Default::default()
        };

        for package in raw.packages {
            let mut issues = Vec::new();
            let info = build_info(package, options, &mut issues);
            if !issues.is_empty() {
                tracing::warn!(id = %info.id, count = issues.len(), "evidence issues");
                provider.issues.insert(info.id.clone(), issues);
            }
            provider.infos.insert(info.id.clone(), info);
        }

        tracing::debug!(
            packages = provider.infos.len(),
            projects = provider.projects.len(),
            graph = provider.graph.is_some(),
            "loaded evidence"
        );

        Ok(provider)
    }

    /// Package ids, sorted.
    pub fn package_ids(&self) -> Vec<Identifier> {
        let mut ids: Vec<_> = self.infos.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Problems found while loading the evidence of `id`.
    pub fn issues_of(&self, id: &Identifier) -> &[Issue] {
        self.issues.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn issues(&self) -> impl Iterator<Item = (&Identifier, &Issue)> {
        self.issues
            .iter()
            .flat_map(|(id, issues)| issues.iter().map(move |issue| (id, issue)))
    }

    /// Project ids known to the dependency data, sorted.
    pub fn project_ids(&self) -> Vec<Identifier> {
        let mut ids: BTreeSet<Identifier> = self.projects.iter().map(|p| p.id.clone()).collect();
        if let Some(graph) = &self.graph {
            ids.extend(graph.scopes().map(|scope| scope.project.clone()));
        }
        ids.into_iter().collect()
    }

    /// A navigator over the dependency data in the file.
    ///
    /// The compact graph is preferred when the file carries one.
    pub fn navigator(&self) -> Box<dyn DependencyNavigator> {
        match &self.graph {
            Some(graph) => Box::new(GraphNavigator::new(Arc::clone(graph))),
            None => Box::new(TreeNavigator::new(self.projects.clone())),
        }
    }
}

impl LicenseInfoProvider for FileProvider {
    type Error = EvidenceError;

    fn get(&self, id: &Identifier) -> Result<LicenseInfo, Self::Error> {
        self.infos
            .get(id)
            .cloned()
            .ok_or_else(|| EvidenceError::UnknownPackage(id.clone()))
    }
}

fn parse_license(
    text: &str,
    context: &str,
    options: &LoadOptions,
    issues: &mut Vec<Issue>,
) -> Option<SpdxExpression> {
    match SpdxExpression::parse_with(text, options.strictness) {
        Ok(expression) => Some(expression.normalize(options.map_deprecated)),
        Err(e) => {
            issues.push(Issue::new(
                ISSUE_SOURCE,
                format!("{context}: {e}"),
                Severity::Warning,
            ));
            None
        }
    }
}

fn build_info(package: RawPackage, options: &LoadOptions, issues: &mut Vec<Issue>) -> LicenseInfo {
    let mut info = LicenseInfo::new(package.id);

    info.concluded.concluded_license = package
        .concluded_license
        .as_deref()
        .and_then(|text| parse_license(text, "concluded license", options, issues));

    info.declared.processed = options.declared.process(&package.declared_licenses);
    for unmapped in &info.declared.processed.unmapped {
        issues.push(Issue::new(
            ISSUE_SOURCE,
            format!("declared license '{unmapped}' could not be mapped"),
            Severity::Hint,
        ));
    }
    info.declared.licenses = package.declared_licenses;

    for raw in package.findings {
        let licenses = raw
            .licenses
            .into_iter()
            .filter_map(|finding| {
                let context = format!("license finding at {}", finding.location);
                parse_license(&finding.license, &context, options, issues)
                    .map(|license| LicenseFinding::new(license, finding.location))
            })
            .collect();
        info.detected.findings.push(ProvenanceFindings {
            provenance: raw.provenance,
            licenses,
            copyrights: raw.copyrights.into_iter().collect(),
        });
    }

    info
}
