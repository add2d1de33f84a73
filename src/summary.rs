use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{observation::Detection, track_store::TrackStateStore};

/// Anything that can answer "how often was this label seen".
pub trait LabelCounts {
    fn count(&self, label: &str) -> u64;
}

/// End-of-session tally, counting each subject at most once per label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionSummary {
    counts: BTreeMap<String, u64>,
}

impl SessionSummary {
    /// Flattens every subject record into one label -> subject count map.
    ///
    /// Worn items, violations and the resolved identity (including
    /// `"unknown"`) each contribute one unit per subject.
    pub fn summarize(store: &TrackStateStore) -> Self {
        let mut counts = BTreeMap::new();
        for (_, record) in store.all() {
            let labels = record
                .worn_items()
                .chain(record.violations().iter().map(String::as_str))
                .chain(std::iter::once(record.identity()));
            for label in labels {
                *counts.entry(label.to_string()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl LabelCounts for SessionSummary {
    fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }
}

/// Raw per-label detection counts for sources processed without tracking.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionTally {
    counts: BTreeMap<String, u64>,
}

impl DetectionTally {
    pub fn add(&mut self, label: &str) {
        *self.counts.entry(label.trim().to_string()).or_insert(0) += 1;
    }

    pub fn from_detections<'a, I>(detections: I) -> Self
    where
        I: IntoIterator<Item = &'a Detection>,
    {
        let mut tally = Self::default();
        for detection in detections {
            tally.add(&detection.label);
        }
        tally
    }

    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }
}

impl LabelCounts for DetectionTally {
    fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }
}

impl LabelCounts for BTreeMap<String, u64> {
    fn count(&self, label: &str) -> u64 {
        self.get(label).copied().unwrap_or(0)
    }
}
