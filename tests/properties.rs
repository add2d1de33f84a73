//! Property-based tests for the aggregation laws:
//! 1. Ignored labels never change the summary
//! 2. Worn flags and violations are monotonic
//! 3. The final record of a subject does not depend on observation order
//! 4. A subject contributes at most one unit per label

use std::sync::Arc;

use ppe_compliance::{
    FrameReducer, LabelClassifier, LabelCounts, Observation, SessionSummary, SubjectRecord,
    TrackId, reduce,
};
use proptest::prelude::*;

const LABELS: [&str; 8] = [
    "helmet", "vest", "boots", "no_helmet", "no_shoes", "forklift", "ladder", "cone",
];

fn classifier() -> Arc<LabelClassifier> {
    Arc::new(LabelClassifier::new(["helmet", "vest", "boots"], ["no_helmet", "no_shoes"]).unwrap())
}

fn is_ignored(label: &str) -> bool {
    matches!(label, "forklift" | "ladder" | "cone")
}

fn observation_strategy(max_tracks: TrackId) -> impl Strategy<Value = Observation> {
    (0..max_tracks, prop::sample::select(LABELS.to_vec()))
        .prop_map(|(track_id, label)| Observation::new(track_id, label, 0.9))
}

fn summarize(observations: &[Observation]) -> SessionSummary {
    let mut reducer = FrameReducer::new(classifier());
    for observation in observations {
        reducer.observe(observation);
    }
    SessionSummary::summarize(reducer.store())
}

fn record_for(observations: &[Observation]) -> SubjectRecord {
    let classifier = classifier();
    let mut record = SubjectRecord::new(classifier.positive_items().iter().cloned());
    for observation in observations {
        reduce(&classifier, &mut record, observation);
    }
    record
}

proptest! {
    #[test]
    fn ignored_observations_are_a_no_op(
        observations in prop::collection::vec(observation_strategy(5), 0..60)
    ) {
        let relevant: Vec<Observation> = observations
            .iter()
            .filter(|o| !is_ignored(&o.label))
            .cloned()
            .collect();

        prop_assert_eq!(summarize(&observations), summarize(&relevant));
    }

    #[test]
    fn flags_and_violations_never_shrink(
        prefix in prop::collection::vec(observation_strategy(1), 1..30),
        suffix in prop::collection::vec(observation_strategy(1), 0..30),
    ) {
        let before = record_for(&prefix);
        let mut all = prefix.clone();
        all.extend(suffix);
        let after = record_for(&all);

        for item in before.worn_items() {
            prop_assert!(after.is_worn(item));
        }
        prop_assert!(after.violations().is_superset(before.violations()));
    }

    #[test]
    fn final_record_is_order_independent(
        (observations, shuffled) in prop::collection::vec(observation_strategy(1), 0..40)
            .prop_flat_map(|observations| {
                let shuffled = Just(observations.clone()).prop_shuffle();
                (Just(observations), shuffled)
            })
    ) {
        prop_assert_eq!(record_for(&observations), record_for(&shuffled));
    }

    #[test]
    fn subjects_count_at_most_once_per_label(
        observations in prop::collection::vec(observation_strategy(4), 0..80),
        repeats in 1..5usize,
    ) {
        let repeated: Vec<Observation> = observations
            .iter()
            .flat_map(|o| std::iter::repeat_n(o.clone(), repeats))
            .collect();

        let summary = summarize(&repeated);
        let subjects = summary.count("unknown");

        for (_, count) in summary.iter() {
            prop_assert!(count <= subjects);
        }
        prop_assert_eq!(summary, summarize(&observations));
    }
}
