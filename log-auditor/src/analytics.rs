use std::collections::BTreeMap;

use crate::{
    models::{Aggregate, AggregateRow},
    store::{LogStore, StoreError},
};

/// The three result sets of one run, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    pub activity_per_ip: Vec<AggregateRow>,
    pub most_accessed: Vec<AggregateRow>,
    pub suspicious_activity: Vec<AggregateRow>,
}

impl Report {
    /// Runs every aggregation against a committed store.
    pub fn collect<S: LogStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(Self {
            activity_per_ip: store.query(Aggregate::ActivityPerIp)?,
            most_accessed: store.query(Aggregate::MostAccessed)?,
            suspicious_activity: store.query(Aggregate::SuspiciousActivity)?,
        })
    }

    pub fn sections(&self) -> [(Aggregate, &[AggregateRow]); 3] {
        Aggregate::ALL.map(|aggregate| (aggregate, self.rows(aggregate)))
    }

    pub fn rows(&self, aggregate: Aggregate) -> &[AggregateRow] {
        match aggregate {
            Aggregate::ActivityPerIp => &self.activity_per_ip,
            Aggregate::MostAccessed => &self.most_accessed,
            Aggregate::SuspiciousActivity => &self.suspicious_activity,
        }
    }
}

/// Sums weights per key and orders the groups by total descending, keys
/// ascending on ties. A key with zero total weight is still listed.
pub fn rank<'a>(weighted: impl IntoIterator<Item = (&'a str, u64)>) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<&str, u64> = BTreeMap::new();
    for (key, weight) in weighted {
        *groups.entry(key).or_default() += weight;
    }
    let mut rows: Vec<_> = groups
        .into_iter()
        .map(|(key, count)| AggregateRow::new(key, count))
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}
