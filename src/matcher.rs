//! Association of copyright findings with the license findings around them.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use serde::Serialize;

use crate::models::{CopyrightFinding, LicenseFinding};

/// A license finding and the copyrights attributed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingsMatch {
    pub license: LicenseFinding,
    pub copyrights: BTreeSet<CopyrightFinding>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// One entry per input license finding, in input order.
    pub matches: Vec<FindingsMatch>,
    /// Copyrights no license span covers.
    pub unmatched_copyrights: BTreeSet<CopyrightFinding>,
}

/// License findings sharing one exact line span.
struct Region {
    start: u32,
    end: u32,
    matches: Vec<usize>,
}

/// Match the findings of one provenance.
///
/// A copyright belongs to the license findings whose span, in the same file,
/// covers the copyright's first line. When several spans cover it, the
/// narrowest wins, then the one starting first. Findings with an identical
/// span share the copyright.
///
/// Spans and copyrights are each sorted once and swept together; a min-heap
/// keyed by span width holds the spans opened so far.
pub fn match_findings<'a>(
    licenses: impl IntoIterator<Item = &'a LicenseFinding>,
    copyrights: impl IntoIterator<Item = &'a CopyrightFinding>,
) -> MatchResult {
    let mut result = MatchResult::default();
    let mut spans_by_path: BTreeMap<&str, BTreeMap<(u32, u32), Vec<usize>>> = BTreeMap::new();

    for (index, finding) in licenses.into_iter().enumerate() {
        let location = &finding.location;
        spans_by_path
            .entry(location.path())
            .or_default()
            .entry((location.start_line(), location.end_line()))
            .or_default()
            .push(index);
        result.matches.push(FindingsMatch {
            license: finding.clone(),
            copyrights: BTreeSet::new(),
        });
    }

    let mut copyrights_by_path: BTreeMap<&str, Vec<&CopyrightFinding>> = BTreeMap::new();
    for copyright in copyrights {
        copyrights_by_path
            .entry(copyright.location.path())
            .or_default()
            .push(copyright);
    }

    for (path, mut copyrights) in copyrights_by_path {
        let Some(spans) = spans_by_path.remove(path) else {
            result
                .unmatched_copyrights
                .extend(copyrights.into_iter().cloned());
            continue;
        };

        // BTreeMap order is by (start, end), which the sweep relies on.
        let regions: Vec<Region> = spans
            .into_iter()
            .map(|((start, end), matches)| Region {
                start,
                end,
                matches,
            })
            .collect();

        copyrights.sort_by_key(|c| c.location.start_line());

        let mut open: BinaryHeap<Reverse<(u32, u32, usize)>> = BinaryHeap::new();
        let mut next = 0;

        for copyright in copyrights {
            let line = copyright.location.start_line();

            while next < regions.len() && regions[next].start <= line {
                let region = &regions[next];
                open.push(Reverse((region.end - region.start, region.start, next)));
                next += 1;
            }

            // Lines only grow, so a span that ended before this one is done
            // for good.
            while let Some(&Reverse((_, _, index))) = open.peek() {
                if regions[index].end >= line {
                    break;
                }
                open.pop();
            }

            match open.peek() {
                Some(&Reverse((_, _, index))) => {
                    for &m in &regions[index].matches {
                        result.matches[m].copyrights.insert(copyright.clone());
                    }
                }
                None => {
                    result.unmatched_copyrights.insert(copyright.clone());
                }
            }
        }
    }

    result
}
