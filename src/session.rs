use std::{path::PathBuf, sync::Arc};

use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::{
    checkpoint::{CheckpointOutcome, CheckpointResult, checkpoint_results, evaluate},
    config::ComplianceConfig,
    error::Result,
    identity::IdentityResolver,
    label::LabelClassifier,
    media::{MediaKind, MediaSource},
    notification::{AlertTrigger, Notification},
    observation::{Detection, Observation, TrackedDetection},
    reducer::{FrameReducer, FrameStats},
    summary::{DetectionTally, SessionSummary},
    tally_store::TallyStore,
};

/// Read-only state shared by every session of a process.
#[derive(Debug)]
pub struct ComplianceContext {
    classifier: Arc<LabelClassifier>,
    checkpoints: Vec<String>,
    trigger: AlertTrigger,
    max_upload_bytes: u64,
}

impl ComplianceContext {
    pub fn from_config(config: &ComplianceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: Arc::new(config.classifier()?),
            checkpoints: config.effective_checkpoints(),
            trigger: AlertTrigger::new(config.alert.clone()),
            max_upload_bytes: config.media.effective_max_upload_bytes(),
        })
    }

    pub fn classifier(&self) -> &LabelClassifier {
        &self.classifier
    }

    pub fn checkpoints(&self) -> &[String] {
        &self.checkpoints
    }

    /// Validates the upload and opens a fresh session for it.
    pub fn start_session(self: &Arc<Self>, source: &MediaSource) -> Result<ComplianceSession> {
        let kind = source.validate(self.max_upload_bytes)?;
        info!(file = %source.filename, ?kind, "session started");
        Ok(ComplianceSession {
            name: source.filename.clone(),
            kind,
            reducer: FrameReducer::new(Arc::clone(&self.classifier)),
            context: Arc::clone(self),
            annotated_media: Vec::new(),
        })
    }

    /// Quality-gate check for untracked sources: one result per vocabulary
    /// label, passing iff any detection carried it.
    pub fn check_detections(&self, detections: &[Detection]) -> Vec<CheckpointResult> {
        let tally = DetectionTally::from_detections(detections);
        checkpoint_results(self.classifier.vocabulary(), &tally)
    }
}

/// Outcome of writing a session's tallies to the durable store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TallyCommit {
    Committed,
    Failed { message: String },
    Skipped,
}

/// Everything a finished session hands back to the requester.
#[derive(Clone, Debug, Serialize)]
pub struct SessionReport {
    pub name: String,
    pub kind: MediaKind,
    pub frames: u64,
    pub subjects: usize,
    pub summary: SessionSummary,
    pub checkpoints: CheckpointOutcome,
    pub alert: Option<Notification>,
    pub tally: TallyCommit,
}

/// Aggregation state of one uploaded image or video.
///
/// Dropping a session without calling [`ComplianceSession::finish`] discards
/// it without touching the tally store.
#[derive(Debug)]
pub struct ComplianceSession {
    name: String,
    kind: MediaKind,
    reducer: FrameReducer,
    context: Arc<ComplianceContext>,
    annotated_media: Vec<PathBuf>,
}

impl ComplianceSession {
    /// Registers annotated output (image or video) to attach to any alert.
    pub fn attach_media(&mut self, path: impl Into<PathBuf>) {
        self.annotated_media.push(path.into());
    }

    pub fn observe(&mut self, observation: &Observation) {
        self.reducer.observe(observation);
    }

    pub fn observe_frame<I>(&mut self, detections: I) -> FrameStats
    where
        I: IntoIterator<Item = TrackedDetection>,
    {
        self.reducer.reduce_frame(detections)
    }

    pub fn observe_frame_with_identity<I, F, R>(
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
        self.reducer
            .reduce_frame_with_identity(detections, resolver, frame, frame_size)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::summarize(self.reducer.store())
    }

    pub fn evaluate(&self) -> CheckpointOutcome {
        evaluate(&self.context.checkpoints, &self.summary())
    }

    pub fn reducer(&self) -> &FrameReducer {
        &self.reducer
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Closes the session: summarizes, evaluates checkpoints, builds the alert
    /// and commits tallies. Store failures are reported, never raised.
    pub fn finish(self, store: Option<&dyn TallyStore>, context: &str) -> SessionReport {
        let span = info_span!("finish", session = %self.name);
        let _guard = span.enter();

        let summary = self.summary();
        let checkpoints = evaluate(&self.context.checkpoints, &summary);
        let alert = self
            .context
            .trigger
            .evaluate(&checkpoints, &summary, context)
            .map(|alert| alert.with_attachments(self.annotated_media));

        let tally = match store {
            Some(store) => match store.commit_summary(&summary) {
                Ok(()) => TallyCommit::Committed,
                Err(e) => {
                    warn!(error = %e, "tally commit failed, returning summary anyway");
                    TallyCommit::Failed {
                        message: e.to_string(),
                    }
                }
            },
            None => TallyCommit::Skipped,
        };

        info!(
            frames = self.reducer.frames(),
            subjects = self.reducer.store().len(),
            failed = checkpoints.failed.len(),
            "session finished"
        );

        SessionReport {
            subjects: self.reducer.store().len(),
            frames: self.reducer.frames(),
            name: self.name,
            kind: self.kind,
            summary,
            checkpoints,
            alert,
            tally,
        }
    }

    /// Discards the session after an upstream failure or disconnect.
    pub fn abort(self, reason: &str) {
        warn!(session = %self.name, reason, "session aborted, nothing committed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bbox::BBox, error::Error};

    fn context() -> Arc<ComplianceContext> {
        let config = ComplianceConfig::from_toml_str(
            r#"
            checkpoints = ["helmet", "vest"]

            [vocabulary]
            positive = ["helmet", "vest"]
            negative = ["no_helmet"]

            [alert]
            recipients = ["safety@example.com"]
            "#,
        )
        .unwrap();
        Arc::new(ComplianceContext::from_config(&config).unwrap())
    }

    fn detection(label: &str) -> Detection {
        Detection {
            label: label.to_string(),
            confidence: 0.5,
            bbox: BBox::default(),
        }
    }

    #[test]
    fn test_invalid_media_never_opens_a_session() {
        let result = context().start_session(&MediaSource::new("abc.exe", 9));

        assert!(matches!(result, Err(Error::InvalidMedia { .. })));
    }

    #[test]
    fn test_finish_without_store_skips_commit() {
        let mut session = context()
            .start_session(&MediaSource::new("gate.mp4", 1024))
            .unwrap();
        session.observe(&Observation::new(1, "helmet", 0.9));

        let report = session.finish(None, "Gate 3");

        assert_eq!(report.tally, TallyCommit::Skipped);
        assert_eq!(report.checkpoints.passed, vec!["helmet"]);
        assert_eq!(report.checkpoints.failed, vec!["vest"]);
        assert!(report.alert.is_some());
        assert_eq!(report.subjects, 1);
    }

    #[test]
    fn test_check_detections_covers_vocabulary() {
        let results = context().check_detections(&[detection("vest"), detection("vest")]);

        let passed: Vec<(&str, bool)> = results
            .iter()
            .map(|r| (r.name.as_str(), r.passed))
            .collect();
        assert_eq!(
            passed,
            vec![("helmet", false), ("vest", true), ("no_helmet", false)]
        );
    }
}
