use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Semantic partition of detector labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    /// Equipment worn correctly, or the generic person class.
    Positive,
    /// A detected violation such as `no_helmet`.
    Negative,
    /// Anything outside the configured vocabulary.
    Ignored,
}

/// Data-driven label classifier.
///
/// The vocabulary is fixed for the lifetime of a session and shared
/// read-only between sessions.
#[derive(Clone, Debug)]
pub struct LabelClassifier {
    positive_items: Vec<String>,
    negative_items: Vec<String>,
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl LabelClassifier {
    pub fn new<P, N>(positive: P, negative: N) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let mut positive_items = Vec::new();
        let mut positive_set = HashSet::new();
        for label in positive {
            let label = normalize(label.as_ref())?;
            if positive_set.insert(label.clone()) {
                positive_items.push(label);
            }
        }

        let mut negative_items = Vec::new();
        let mut negative_set = HashSet::new();
        for label in negative {
            let label = normalize(label.as_ref())?;
            if positive_set.contains(&label) {
                return Err(Error::Config {
                    message: format!("label '{label}' is both positive and negative"),
                });
            }
            if negative_set.insert(label.clone()) {
                negative_items.push(label);
            }
        }

        Ok(Self {
            positive_items,
            negative_items,
            positive: positive_set,
            negative: negative_set,
        })
    }

    pub fn classify(&self, label: &str) -> EquipmentCategory {
        let label = label.trim();
        if self.positive.contains(label) {
            EquipmentCategory::Positive
        } else if self.negative.contains(label) {
            EquipmentCategory::Negative
        } else {
            EquipmentCategory::Ignored
        }
    }

    /// Positive items in configuration order.
    pub fn positive_items(&self) -> &[String] {
        &self.positive_items
    }

    /// Violation labels in configuration order.
    pub fn negative_labels(&self) -> &[String] {
        &self.negative_items
    }

    /// Every known label, positive items first.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.positive_items
            .iter()
            .chain(&self.negative_items)
            .map(String::as_str)
    }
}

fn normalize(label: &str) -> Result<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(Error::Config {
            message: "empty label in vocabulary".to_string(),
        });
    }
    Ok(label.to_string())
}
