//! Per-package license resolution.
//!
//! [`LicenseInfoResolver`] pulls raw evidence from a [`LicenseInfoProvider`],
//! decomposes concluded and declared expressions, matches detected findings
//! per provenance, and merges everything into one [`ResolvedLicenseInfo`]
//! per package. Results are cached by identifier.

pub mod model;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use dashmap::DashMap;
use rayon::prelude::*;

use crate::copyright::{self, ProcessedCopyrights};
use crate::expression::LicenseTerm;
use crate::matcher::match_findings;
use crate::models::{CopyrightFinding, Identifier, LicenseFinding, LicenseSource, Provenance};

pub use model::{
    ConcludedLicenseInfo, DeclaredLicenseInfo, DetectedLicenseInfo, LicenseInfo,
    ProvenanceFindings, ResolvedCopyright, ResolvedLicense, ResolvedLicenseInfo,
    ResolvedLicenseLocation,
};

/// Source of raw license evidence.
///
/// Implementations may block, e.g. on I/O. Errors reach the resolver's
/// caller unchanged; there are no retries.
pub trait LicenseInfoProvider: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(&self, id: &Identifier) -> Result<LicenseInfo, Self::Error>;
}

impl<P: LicenseInfoProvider + ?Sized> LicenseInfoProvider for Arc<P> {
    type Error = P::Error;

    fn get(&self, id: &Identifier) -> Result<LicenseInfo, Self::Error> {
        (**self).get(id)
    }
}

/// Resolves and caches license information per package.
///
/// Caching is compute-if-absent without a per-key lock: threads racing on
/// the same uncached id may each compute it. Resolution is a pure function
/// of the provider's data, so all of them produce equal values, and the
/// first one stored is the one every caller gets.
pub struct LicenseInfoResolver<P> {
    provider: P,
    cache: DashMap<Identifier, Arc<ResolvedLicenseInfo>>,
}

impl<P: LicenseInfoProvider> LicenseInfoResolver<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: DashMap::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn resolve(&self, id: &Identifier) -> Result<Arc<ResolvedLicenseInfo>, P::Error> {
        if let Some(cached) = self.cache.get(id) {
            tracing::trace!(%id, "license info cache hit");
            return Ok(Arc::clone(cached.value()));
        }

        let info = self.provider.get(id)?;
        let resolved = Arc::new(resolve_license_info(info));
        tracing::debug!(%id, licenses = resolved.licenses.len(), "resolved license info");

        let entry = self.cache.entry(id.clone()).or_insert(resolved);
        Ok(Arc::clone(entry.value()))
    }

    /// Resolve many packages in parallel. Results keep the input order.
    pub fn resolve_all(
        &self,
        ids: &[Identifier],
    ) -> Vec<(Identifier, Result<Arc<ResolvedLicenseInfo>, P::Error>)>
    where
        P::Error: Send,
    {
        ids.par_iter()
            .map(|id| (id.clone(), self.resolve(id)))
            .collect()
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

/// Accumulates resolved licenses, merging equal terms.
#[derive(Default)]
struct LicenseAccumulator {
    licenses: Vec<ResolvedLicense>,
    positions: HashMap<LicenseTerm, usize>,
}

impl LicenseAccumulator {
    fn entry(&mut self, term: LicenseTerm) -> &mut ResolvedLicense {
        let index = match self.positions.get(&term) {
            Some(&index) => index,
            None => {
                let index = self.licenses.len();
                self.positions.insert(term.clone(), index);
                self.licenses.push(ResolvedLicense::new(term));
                index
            }
        };
        &mut self.licenses[index]
    }
}

/// Build the resolved picture of one package from its raw evidence.
pub fn resolve_license_info(info: LicenseInfo) -> ResolvedLicenseInfo {
    let mut accumulator = LicenseAccumulator::default();

    if let Some(concluded) = &info.concluded.concluded_license {
        for term in concluded.decompose() {
            accumulator.entry(term).sources.insert(LicenseSource::Concluded);
        }
    }

    let declared = &info.declared;
    if let Some(expression) = &declared.processed.spdx_expression {
        for term in expression.decompose() {
            let originals: BTreeSet<String> = declared
                .licenses
                .iter()
                .filter(|original| {
                    declared
                        .processed
                        .expression_for(original)
                        .is_some_and(|e| e.decompose().contains(&term))
                })
                .cloned()
                .collect();
            let resolved = accumulator.entry(term);
            resolved.sources.insert(LicenseSource::Declared);
            resolved.original_declared_licenses.extend(originals);
        }
    }

    let processed = copyright::process(
        info.detected
            .findings
            .iter()
            .flat_map(|f| f.copyrights.iter())
            .map(|c| c.statement.as_str()),
    );

    // Entries may repeat a provenance; the matcher must see all of its
    // findings at once.
    let mut by_provenance: BTreeMap<&Provenance, (Vec<&LicenseFinding>, Vec<&CopyrightFinding>)> =
        BTreeMap::new();
    for findings in &info.detected.findings {
        let (licenses, copyrights) = by_provenance.entry(&findings.provenance).or_default();
        licenses.extend(&findings.licenses);
        copyrights.extend(&findings.copyrights);
    }

    let mut unmatched_copyrights = BTreeMap::new();

    for (provenance, (licenses, copyrights)) in by_provenance {
        let result = match_findings(licenses, copyrights);

        for matched in result.matches {
            let location = ResolvedLicenseLocation {
                provenance: provenance.clone(),
                path: matched.license.location.path().to_string(),
                start_line: matched.license.location.start_line(),
                end_line: matched.license.location.end_line(),
                copyrights: resolve_copyrights(&processed, &matched.copyrights),
            };
            for term in matched.license.license.decompose() {
                let resolved = accumulator.entry(term);
                resolved.sources.insert(LicenseSource::Detected);
                resolved.locations.insert(location.clone());
            }
        }

        if !result.unmatched_copyrights.is_empty() {
            unmatched_copyrights
                .entry(provenance.clone())
                .or_insert_with(BTreeSet::new)
                .extend(result.unmatched_copyrights);
        }
    }

    ResolvedLicenseInfo {
        id: info.id,
        licenses: accumulator.licenses,
        unmatched_copyrights,
    }
}

/// Group matched copyright findings under their representative statements.
fn resolve_copyrights(
    processed: &ProcessedCopyrights,
    findings: &BTreeSet<CopyrightFinding>,
) -> BTreeSet<ResolvedCopyright> {
    let mut grouped: BTreeMap<&str, BTreeSet<CopyrightFinding>> = BTreeMap::new();
    for finding in findings {
        grouped
            .entry(processed.representative_of(&finding.statement))
            .or_default()
            .insert(finding.clone());
    }
    grouped
        .into_iter()
        .map(|(statement, original_findings)| ResolvedCopyright {
            statement: statement.to_string(),
            original_findings,
        })
        .collect()
}
