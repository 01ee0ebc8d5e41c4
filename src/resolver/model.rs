use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize, Serializer};

use crate::expression::{LicenseTerm, SpdxExpression};
use crate::license::ProcessedDeclaredLicense;
use crate::models::{CopyrightFinding, Identifier, LicenseFinding, LicenseSource, Provenance};

/// Raw license evidence for one package, as handed out by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub id: Identifier,
    #[serde(default)]
    pub concluded: ConcludedLicenseInfo,
    #[serde(default)]
    pub declared: DeclaredLicenseInfo,
    #[serde(default)]
    pub detected: DetectedLicenseInfo,
}

impl LicenseInfo {
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            concluded: ConcludedLicenseInfo::default(),
            declared: DeclaredLicenseInfo::default(),
            detected: DetectedLicenseInfo::default(),
        }
    }
}

/// A license set by a person, overriding everything found automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcludedLicenseInfo {
    pub concluded_license: Option<SpdxExpression>,
}

/// License strings from package metadata and their mapping to expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredLicenseInfo {
    #[serde(default)]
    pub licenses: BTreeSet<String>,
    #[serde(default)]
    pub processed: ProcessedDeclaredLicense,
}

/// Scanner findings, grouped by where the scanned files came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedLicenseInfo {
    #[serde(default)]
    pub findings: Vec<ProvenanceFindings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceFindings {
    pub provenance: Provenance,
    #[serde(default)]
    pub licenses: BTreeSet<LicenseFinding>,
    #[serde(default)]
    pub copyrights: BTreeSet<CopyrightFinding>,
}

/// A copyright statement as reported, with the findings it stands for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResolvedCopyright {
    /// The representative statement of the group.
    pub statement: String,
    pub original_findings: BTreeSet<CopyrightFinding>,
}

/// One place a detected license was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResolvedLicenseLocation {
    pub provenance: Provenance,
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub copyrights: BTreeSet<ResolvedCopyright>,
}

/// A single license with everything that supports it for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLicense {
    pub license: LicenseTerm,
    pub sources: BTreeSet<LicenseSource>,
    pub original_declared_licenses: BTreeSet<String>,
    pub locations: BTreeSet<ResolvedLicenseLocation>,
}

impl ResolvedLicense {
    pub fn new(license: LicenseTerm) -> Self {
        Self {
            license,
            sources: BTreeSet::new(),
            original_declared_licenses: BTreeSet::new(),
            locations: BTreeSet::new(),
        }
    }

    /// Every copyright statement attached to any location of this license.
    pub fn copyrights(&self) -> BTreeSet<&str> {
        self.locations
            .iter()
            .flat_map(|l| l.copyrights.iter())
            .map(|c| c.statement.as_str())
            .collect()
    }
}

/// The resolved license picture of one package. Built once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLicenseInfo {
    pub id: Identifier,
    /// One entry per distinct license, in order of first appearance.
    pub licenses: Vec<ResolvedLicense>,
    #[serde(serialize_with = "serialize_by_provenance")]
    pub unmatched_copyrights: BTreeMap<Provenance, BTreeSet<CopyrightFinding>>,
}

/// Provenances are structured, so a map keyed by them is written as a list.
fn serialize_by_provenance<S: Serializer>(
    map: &BTreeMap<Provenance, BTreeSet<CopyrightFinding>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Entry<'a> {
        provenance: &'a Provenance,
        copyrights: &'a BTreeSet<CopyrightFinding>,
    }

    serializer.collect_seq(map.iter().map(|(provenance, copyrights)| Entry {
        provenance,
        copyrights,
    }))
}

impl ResolvedLicenseInfo {
    pub fn get(&self, license: &LicenseTerm) -> Option<&ResolvedLicense> {
        self.licenses.iter().find(|l| &l.license == license)
    }

    /// Licenses supported by `source`, among others.
    pub fn licenses_from(&self, source: LicenseSource) -> impl Iterator<Item = &ResolvedLicense> {
        self.licenses
            .iter()
            .filter(move |l| l.sources.contains(&source))
    }

    pub fn license_ids(&self) -> BTreeSet<&str> {
        self.licenses.iter().map(|l| l.license.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty() && self.unmatched_copyrights.is_empty()
    }
}
