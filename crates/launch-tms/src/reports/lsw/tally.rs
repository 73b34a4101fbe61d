use crate::fleet::StatusKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Count of records per status, built in a single pass.
///
/// Every variant of `S` is present (zero-filled) so serialized tallies keep a
/// stable shape, and the bucket counts always sum to [`StatusTally::total`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound = "S: StatusKind")]
pub struct StatusTally<S: StatusKind> {
    counts: BTreeMap<S, usize>,
    total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(bound = "S: StatusKind")]
pub struct TallyEntry<S: StatusKind> {
    pub status: S,
    pub label: &'static str,
    pub count: usize,
}

impl<S: StatusKind> StatusTally<S> {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut counts: BTreeMap<S, usize> = S::ALL.iter().map(|status| (*status, 0)).collect();
        let mut total = 0;

        for status in statuses {
            *counts.entry(status).or_insert(0) += 1;
            total += 1;
        }

        Self { counts, total }
    }

    pub fn count(&self, status: S) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn count_any(&self, statuses: &[S]) -> usize {
        statuses.iter().map(|status| self.count(*status)).sum()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn entries(&self) -> Vec<TallyEntry<S>> {
        self.counts
            .iter()
            .map(|(status, count)| TallyEntry {
                status: *status,
                label: status.label(),
                count: *count,
            })
            .collect()
    }
}

impl<S: StatusKind> Default for StatusTally<S> {
    fn default() -> Self {
        Self::from_statuses(std::iter::empty())
    }
}
