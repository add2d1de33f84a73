use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use crate::{
    bbox::BBox,
    identity::{IdentityResolver, resolve_or_unknown},
    label::{EquipmentCategory, LabelClassifier},
    observation::{Observation, TrackId, TrackedDetection},
    subject::SubjectRecord,
    track_store::TrackStateStore,
};

/// Folds one observation into `record`.
///
/// Flags are only ever set and violations only ever added, so reducing the
/// same multiset of observations in any order yields the same record.
pub fn reduce(
    classifier: &LabelClassifier,
    record: &mut SubjectRecord,
    observation: &Observation,
) -> EquipmentCategory {
    let label = observation.label.trim();
    let category = classifier.classify(label);
    match category {
        EquipmentCategory::Positive => {
            record.mark_worn(label);
        }
        EquipmentCategory::Negative => record.add_violation(label),
        EquipmentCategory::Ignored => return category,
    }
    if let Some(resolution) = &observation.identity {
        record.apply_resolution(resolution);
    }
    category
}

/// Per-frame bookkeeping returned by [`FrameReducer::reduce_frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub reduced: usize,
    pub tentative: usize,
    pub ignored: usize,
}

/// Maps each frame's tracked detections onto the session's track store.
#[derive(Debug)]
pub struct FrameReducer {
    classifier: Arc<LabelClassifier>,
    store: TrackStateStore,
    frames: u64,
}

impl FrameReducer {
    pub fn new(classifier: Arc<LabelClassifier>) -> Self {
        let store = TrackStateStore::new(classifier.positive_items());
        Self {
            classifier,
            store,
            frames: 0,
        }
    }

    /// Reduces a single observation. Ignored labels never create a record.
    pub fn observe(&mut self, observation: &Observation) -> EquipmentCategory {
        if self.classifier.classify(&observation.label) == EquipmentCategory::Ignored {
            debug!(
                track_id = observation.track_id,
                label = %observation.label,
                "ignoring label outside vocabulary"
            );
            return EquipmentCategory::Ignored;
        }
        let record = self.store.get_or_create(observation.track_id);
        reduce(&self.classifier, record, observation)
    }

    pub fn reduce_frame<I>(&mut self, detections: I) -> FrameStats
    where
        I: IntoIterator<Item = TrackedDetection>,
    {
        self.frames += 1;
        let mut stats = FrameStats::default();
        for detection in detections {
            match detection.into_observation() {
                Some(observation) => self.tally(&observation, &mut stats),
                None => stats.tentative += 1,
            }
        }
        stats
    }

    /// Like [`FrameReducer::reduce_frame`], resolving each confirmed track's
    /// identity once per frame from its largest box.
    pub fn reduce_frame_with_identity<I, F, R>(
        &mut self,
        detections: I,
        resolver: &R,
        frame: &F,
        frame_size: (u32, u32),
    ) -> FrameStats
    where
        I: IntoIterator<Item = TrackedDetection>,
        F: ?Sized,
        R: IdentityResolver<F> + ?Sized,
    {
        let (confirmed, tentative): (Vec<_>, Vec<_>) =
            detections.into_iter().partition(|d| d.confirmed);

        let mut regions: HashMap<TrackId, BBox> = HashMap::new();
        for detection in &confirmed {
            if self.classifier.classify(&detection.label) == EquipmentCategory::Ignored {
                continue;
            }
            regions
                .entry(detection.track_id)
                .and_modify(|bbox| {
                    if detection.bbox.area() > bbox.area() {
                        *bbox = detection.bbox;
                    }
                })
                .or_insert(detection.bbox);
        }

        let (frame_width, frame_height) = frame_size;
        let resolutions: HashMap<TrackId, _> = regions
            .into_iter()
            .map(|(track_id, bbox)| {
                let region = bbox.crop_region(frame_width, frame_height);
                (track_id, resolve_or_unknown(resolver, frame, &region))
            })
            .collect();

        self.frames += 1;
        let mut stats = FrameStats {
            tentative: tentative.len(),
            ..FrameStats::default()
        };
        for detection in confirmed {
            let Some(mut observation) = detection.into_observation() else {
                continue;
            };
            observation.identity = resolutions.get(&observation.track_id).cloned();
            self.tally(&observation, &mut stats);
        }
        stats
    }

    fn tally(&mut self, observation: &Observation, stats: &mut FrameStats) {
        match self.observe(observation) {
            EquipmentCategory::Ignored => stats.ignored += 1,
            _ => stats.reduced += 1,
        }
    }

    pub fn classifier(&self) -> &LabelClassifier {
        &self.classifier
    }

    pub fn store(&self) -> &TrackStateStore {
        &self.store
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
