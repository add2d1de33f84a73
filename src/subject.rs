use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::identity::Resolution;

/// Identity assigned to subjects nobody could put a name to.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Compliance record of one tracked subject.
///
/// Worn flags and violations only ever grow during a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubjectRecord {
    worn: BTreeMap<String, bool>,
    violations: BTreeSet<String>,
    identity: String,
}

impl SubjectRecord {
    pub fn new<I>(positive_items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            worn: positive_items
                .into_iter()
                .map(|item| (item.into(), false))
                .collect(),
            violations: BTreeSet::new(),
            identity: UNKNOWN_IDENTITY.to_string(),
        }
    }

    /// Marks `item` as worn. Returns false if the item is not tracked.
    pub fn mark_worn(&mut self, item: &str) -> bool {
        match self.worn.get_mut(item) {
            Some(flag) => {
                *flag = true;
                true
            }
            None => false,
        }
    }

    pub fn add_violation(&mut self, label: &str) {
        if !self.violations.contains(label) {
            self.violations.insert(label.to_string());
        }
    }

    /// Applies an identity resolution, never downgrading a known name.
    pub fn apply_resolution(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Found(name) if name != UNKNOWN_IDENTITY => {
                self.identity.clone_from(name);
            }
            _ => {}
        }
    }

    pub fn is_worn(&self, item: &str) -> bool {
        self.worn.get(item).copied().unwrap_or(false)
    }

    pub fn worn_items(&self) -> impl Iterator<Item = &str> {
        self.worn
            .iter()
            .filter(|(_, worn)| **worn)
            .map(|(item, _)| item.as_str())
    }

    pub fn violations(&self) -> &BTreeSet<String> {
        &self.violations
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_starts_unworn_and_unknown() {
        let record = SubjectRecord::new(["helmet", "vest"]);

        assert!(!record.is_worn("helmet"));
        assert!(!record.is_worn("vest"));
        assert!(record.violations().is_empty());
        assert_eq!(record.identity(), UNKNOWN_IDENTITY);
    }

    #[test]
    fn test_mark_worn_ignores_untracked_items() {
        let mut record = SubjectRecord::new(["helmet"]);

        assert!(!record.mark_worn("gloves"));
        assert_eq!(record.worn_items().count(), 0);
    }

    #[test]
    fn test_known_identity_is_never_downgraded() {
        let mut record = SubjectRecord::new(["helmet"]);

        record.apply_resolution(&Resolution::Found("Alice".to_string()));
        record.apply_resolution(&Resolution::NotFound);
        record.apply_resolution(&Resolution::Found(UNKNOWN_IDENTITY.to_string()));

        assert_eq!(record.identity(), "Alice");
    }

    #[test]
    fn test_later_match_overwrites_identity() {
        let mut record = SubjectRecord::new(["helmet"]);

        record.apply_resolution(&Resolution::Found("Alice".to_string()));
        record.apply_resolution(&Resolution::Found("Bob".to_string()));

        assert_eq!(record.identity(), "Bob");
    }
}
