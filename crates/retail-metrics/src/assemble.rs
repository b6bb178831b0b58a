//! Result assembly: named result tables and per-metric outcomes.
//!
//! A [`ReportSet`] is the handoff point between the computation core and
//! an external writer. Tables are keyed by metric name; inserting under an
//! existing name replaces the old table (last write wins), so a freshly
//! computed set can be merged over previously persisted results without
//! touching unrelated names.

use crate::MetricsError;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Named result tables plus the failures recorded while producing them.
///
/// Tables are never mutated after insertion; merging replaces whole tables
/// by name. Iteration order is deterministic (name order).
#[derive(Debug, Default)]
pub struct ReportSet {
    tables: BTreeMap<String, DataFrame>,
    failures: BTreeMap<String, MetricsError>,
}

impl ReportSet {
    /// Create an empty report set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result table, replacing any existing table of the same name.
    pub fn insert(&mut self, name: impl Into<String>, table: DataFrame) {
        let name = name.into();
        self.failures.remove(&name);
        self.tables.insert(name, table);
    }

    /// Record that the named metric failed to compute.
    pub fn record_failure(&mut self, name: impl Into<String>, error: MetricsError) {
        self.failures.insert(name.into(), error);
    }

    /// Get a result table by name.
    pub fn get(&self, name: &str) -> Option<&DataFrame> {
        self.tables.get(name)
    }

    /// Iterate over `(name, table)` pairs in name order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &DataFrame)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    /// Iterate over `(name, error)` pairs for metrics that failed.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &MetricsError)> {
        self.failures
            .iter()
            .map(|(name, error)| (name.as_str(), error))
    }

    /// Names of all successfully produced tables.
    pub fn names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    /// Merge a newer report set over this one.
    ///
    /// Colliding names take the newer table; all other existing names are
    /// preserved untouched. Newer failures are appended the same way.
    pub fn absorb(&mut self, newer: Self) {
        for (name, table) in newer.tables {
            self.insert(name, table);
        }
        for (name, error) in newer.failures {
            self.record_failure(name, error);
        }
    }

    /// Number of result tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the set holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: i64) -> DataFrame {
        df!["x" => (0..rows).collect::<Vec<_>>()].unwrap()
    }

    #[test]
    fn test_absorb_replaces_by_name_and_preserves_others() {
        let mut prior = ReportSet::new();
        prior.insert("growth_rate", table(3));
        prior.insert("seasonal_index", table(12));

        let mut newer = ReportSet::new();
        newer.insert("growth_rate", table(5));

        prior.absorb(newer);
        assert_eq!(prior.len(), 2);
        assert_eq!(prior.get("growth_rate").unwrap().height(), 5);
        assert_eq!(prior.get("seasonal_index").unwrap().height(), 12);
    }

    #[test]
    fn test_insert_clears_recorded_failure() {
        let mut reports = ReportSet::new();
        reports.record_failure(
            "growth_rate",
            MetricsError::InvalidInput("bad input".to_string()),
        );
        assert_eq!(reports.failures().count(), 1);

        reports.insert("growth_rate", table(2));
        assert_eq!(reports.failures().count(), 0);
        assert_eq!(reports.names(), vec!["growth_rate"]);
    }

    #[test]
    fn test_name_ordered_iteration() {
        let mut reports = ReportSet::new();
        reports.insert("seasonal_index", table(1));
        reports.insert("abc_analysis", table(1));
        reports.insert("growth_rate", table(1));
        let names: Vec<&str> = reports.tables().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["abc_analysis", "growth_rate", "seasonal_index"]);
    }
}
