use std::{collections::BTreeMap, sync::Arc};

use pyo3::{PyRef, PyResult, exceptions::PyRuntimeError, pyclass, pymethods};

use crate::{
    ComplianceConfig, ComplianceContext, ComplianceSession, Error, MediaSource, Observation,
    Resolution, SqliteTallyStore, TallyStore, TrackId, TrackedDetection,
    python_api::PyTrackedDetection,
};

#[pyclass(name = "Session")]
pub struct PySession {
    inner: Option<ComplianceSession>,
}

impl PySession {
    fn session(&mut self) -> Result<&mut ComplianceSession, Error> {
        self.inner.as_mut().ok_or(Error::SessionClosed)
    }
}

#[pymethods]
impl PySession {
    #[new]
    #[pyo3(signature = (filename, size_bytes, config_toml = None))]
    pub fn new(filename: &str, size_bytes: u64, config_toml: Option<&str>) -> PyResult<Self> {
        let config = match config_toml {
            Some(source) => ComplianceConfig::from_toml_str(source)?,
            None => ComplianceConfig::default(),
        };
        let context = Arc::new(ComplianceContext::from_config(&config)?);
        let session = context.start_session(&MediaSource::new(filename, size_bytes))?;
        Ok(Self {
            inner: Some(session),
        })
    }

    /// Returns `(reduced, tentative, ignored)` for the frame.
    pub fn observe_frame(
        &mut self,
        detections: Vec<PyRef<PyTrackedDetection>>,
    ) -> PyResult<(usize, usize, usize)> {
        let detections = detections
            .iter()
            .map(|detection| detection.inner.clone())
            .collect::<Vec<TrackedDetection>>();
        let stats = self.session()?.observe_frame(detections);
        Ok((stats.reduced, stats.tentative, stats.ignored))
    }

    /// Binds a face-matching result to a track. `None` means no match.
    #[pyo3(signature = (track_id, label, name = None))]
    pub fn observe_identity(
        &mut self,
        track_id: TrackId,
        label: &str,
        name: Option<String>,
    ) -> PyResult<()> {
        let resolution = match name {
            Some(name) => Resolution::Found(name),
            None => Resolution::NotFound,
        };
        self.session()?
            .observe(&Observation::new(track_id, label, 1.0).with_identity(resolution));
        Ok(())
    }

    /// Path of the annotated image or video to attach to any alert.
    pub fn attach_media(&mut self, path: &str) -> PyResult<()> {
        self.session()?.attach_media(path);
        Ok(())
    }

    pub fn summary(&mut self) -> PyResult<BTreeMap<String, u64>> {
        Ok(self.session()?.summary().counts().clone())
    }

    /// Returns `(failed, passed)` checkpoint labels.
    pub fn evaluate(&mut self) -> PyResult<(Vec<String>, Vec<String>)> {
        let outcome = self.session()?.evaluate();
        Ok((outcome.failed, outcome.passed))
    }

    /// Closes the session and returns the report as JSON.
    #[pyo3(signature = (context = "", database_path = None))]
    pub fn finish(&mut self, context: &str, database_path: Option<&str>) -> PyResult<String> {
        let store = database_path.map(SqliteTallyStore::open).transpose()?;
        let session = self.inner.take().ok_or(Error::SessionClosed)?;
        let report = session.finish(store.as_ref().map(|s| s as &dyn TallyStore), context);
        serde_json::to_string(&report).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    pub fn abort(&mut self, reason: &str) -> PyResult<()> {
        let session = self.inner.take().ok_or(Error::SessionClosed)?;
        session.abort(reason);
        Ok(())
    }
}
