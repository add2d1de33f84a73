mod bbox;
mod checkpoint;
mod config;
mod error;
mod identity;
mod label;
mod media;
mod notification;
mod observation;
#[cfg(feature = "python")]
mod python_api;
mod reducer;
mod session;
mod subject;
mod summary;
mod tally_store;
mod telemetry;
mod track_store;

pub use bbox::{BBox, CropRegion};
pub use checkpoint::{CheckpointOutcome, CheckpointResult, checkpoint_results, evaluate};
pub use config::{AlertConfig, ComplianceConfig, MediaConfig, StorageConfig, VocabularyConfig};
pub use error::{Error, Result};
pub use identity::{IdentityResolver, Resolution, resolve_or_unknown};
pub use label::{EquipmentCategory, LabelClassifier};
pub use media::{DEFAULT_MAX_UPLOAD_BYTES, MediaKind, MediaSource};
pub use notification::{AlertTrigger, Notification, NotificationBody, Notifier};
pub use observation::{Detection, Observation, TrackId, TrackedDetection};
pub use reducer::{FrameReducer, FrameStats, reduce};
pub use session::{ComplianceContext, ComplianceSession, SessionReport, TallyCommit};
pub use subject::{SubjectRecord, UNKNOWN_IDENTITY};
pub use summary::{DetectionTally, LabelCounts, SessionSummary};
pub use tally_store::{SqliteTallyStore, TallyStore};
pub use telemetry::init_tracing;
pub use track_store::TrackStateStore;

#[cfg(feature = "python")]
use pyo3::{
    Bound, PyResult, pymodule,
    types::{PyModule, PyModuleMethods},
};

#[cfg(feature = "python")]
use crate::python_api::{PyBBox, PySession, PyTrackedDetection};

#[cfg(feature = "python")]
#[pymodule]
fn ppe_compliance(m: &Bound<'_, PyModule>) -> PyResult<()> {
    init_tracing();
    m.add_class::<PyBBox>()?;
    m.add_class::<PyTrackedDetection>()?;
    m.add_class::<PySession>()?;

    Ok(())
}
