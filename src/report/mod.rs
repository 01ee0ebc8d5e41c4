//! Report renderers for resolved license data.
//!
//! - [`terminal`]: colored tables with a summary box; respects `--verbose` / `--quiet`.
//! - JSON output serializes [`PackageReport`] directly.

pub mod terminal;

use serde::Serialize;

use crate::models::{Identifier, Issue};
use crate::resolver::ResolvedLicenseInfo;

/// One resolved package together with the issues found while loading it.
#[derive(Debug, Serialize)]
pub struct PackageReport<'a> {
    #[serde(flatten)]
    pub resolved: &'a ResolvedLicenseInfo,
    pub issues: &'a [Issue],
}

/// A package whose resolution failed.
#[derive(Debug, Serialize)]
pub struct Failure {
    pub id: Identifier,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub packages: Vec<PackageReport<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<Failure>,
}

impl Report<'_> {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
