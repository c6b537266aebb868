// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed metadata filter expressions for [`get`](crate::VectorCollection::get).

use std::collections::BTreeMap;

use crate::types::{Metadata, MetadataValue};

/// A single filter condition on one metadata key.
///
/// Only equality and negation are supported; no other operators exist.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// The key must be present with exactly this value.
    Equals(MetadataValue),
    /// The key must not hold this value. A missing key satisfies this.
    NotEquals(MetadataValue),
}

/// A conjunction of per-key filter conditions. A record matches when every
/// condition is satisfied by its metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataFilter {
    conditions: BTreeMap<String, FilterCondition>,
}

impl MetadataFilter {
    /// Creates an empty filter (matches every record).
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `key` to equal `value`.
    pub fn equals(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.conditions
            .insert(key.into(), FilterCondition::Equals(value.into()));
        self
    }

    /// Requires `key` to not equal `value`.
    pub fn not_equals(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.conditions
            .insert(key.into(), FilterCondition::NotEquals(value.into()));
        self
    }

    /// Evaluates the filter against a record's metadata.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.conditions.iter().all(|(key, condition)| match condition {
            FilterCondition::Equals(value) => metadata.get(key) == Some(value),
            FilterCondition::NotEquals(value) => metadata.get(key) != Some(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, MetadataValue)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn equals_matches_exact_value() {
        let filter = MetadataFilter::new().equals("type", "summary");
        assert!(filter.matches(&meta(&[("type", "summary".into())])));
        assert!(!filter.matches(&meta(&[("type", "conversation".into())])));
    }

    #[test]
    fn equals_fails_on_missing_key() {
        let filter = MetadataFilter::new().equals("type", "summary");
        assert!(!filter.matches(&Metadata::new()));
    }

    #[test]
    fn not_equals_passes_on_missing_key() {
        // A record without the key is "not equal" to the excluded value.
        let filter = MetadataFilter::new().not_equals("type", "summary");
        assert!(filter.matches(&Metadata::new()));
        assert!(filter.matches(&meta(&[("type", "conversation".into())])));
        assert!(!filter.matches(&meta(&[("type", "summary".into())])));
    }

    #[test]
    fn conjunction_requires_all_conditions() {
        let filter = MetadataFilter::new()
            .equals("session_id", "s1")
            .not_equals("type", "summary");
        assert!(filter.matches(&meta(&[
            ("session_id", "s1".into()),
            ("type", "conversation".into()),
        ])));
        assert!(!filter.matches(&meta(&[
            ("session_id", "s1".into()),
            ("type", "summary".into()),
        ])));
        assert!(!filter.matches(&meta(&[("type", "conversation".into())])));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = MetadataFilter::new();
        assert!(filter.matches(&Metadata::new()));
        assert!(filter.matches(&meta(&[("anything", true.into())])));
    }
}
