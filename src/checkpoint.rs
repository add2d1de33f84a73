use itertools::{Either, Itertools};
use serde::Serialize;

use crate::summary::LabelCounts;

/// Pass/fail gate for one expected label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckpointResult {
    pub name: String,
    pub passed: bool,
}

/// Checkpoints split by outcome, each in caller order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CheckpointOutcome {
    pub failed: Vec<String>,
    pub passed: Vec<String>,
}

impl CheckpointOutcome {
    pub fn any_failed(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// A checkpoint passes iff its label was counted at least once.
pub fn evaluate<I, C>(expected: I, counts: &C) -> CheckpointOutcome
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    C: LabelCounts + ?Sized,
{
    let (passed, failed) = expected.into_iter().partition_map(|label| {
        let label = label.as_ref();
        if counts.count(label) > 0 {
            Either::Left(label.to_string())
        } else {
            Either::Right(label.to_string())
        }
    });
    CheckpointOutcome { failed, passed }
}

/// One result per label, in the order given.
pub fn checkpoint_results<I, C>(labels: I, counts: &C) -> Vec<CheckpointResult>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    C: LabelCounts + ?Sized,
{
    labels
        .into_iter()
        .map(|label| CheckpointResult {
            name: label.as_ref().to_string(),
            passed: counts.count(label.as_ref()) > 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn counts(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
        entries
            .iter()
            .map(|(label, count)| (label.to_string(), *count))
            .collect()
    }

    #[test]
    fn test_evaluate_follows_caller_order() {
        let counts = counts(&[("vest", 2), ("helmet", 1)]);

        let outcome = evaluate(["gloves", "helmet", "boots", "vest"], &counts);

        assert_eq!(outcome.passed, vec!["helmet", "vest"]);
        assert_eq!(outcome.failed, vec!["gloves", "boots"]);
        assert!(outcome.any_failed());
    }

    #[test]
    fn test_zero_count_fails() {
        let counts = counts(&[("helmet", 0)]);

        assert_eq!(evaluate(["helmet"], &counts).failed, vec!["helmet"]);
    }

    #[test]
    fn test_checkpoint_results_cover_every_label() {
        let counts = counts(&[("helmet", 3)]);

        let results = checkpoint_results(["helmet", "vest"], &counts);

        assert_eq!(
            results,
            vec![
                CheckpointResult {
                    name: "helmet".to_string(),
                    passed: true
                },
                CheckpointResult {
                    name: "vest".to_string(),
                    passed: false
                },
            ]
        );
    }
}
