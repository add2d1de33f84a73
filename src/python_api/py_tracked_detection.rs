use pyo3::{pyclass, pymethods};

use crate::{TrackId, TrackedDetection, python_api::PyBBox};

#[pyclass(name = "TrackedDetection")]
pub struct PyTrackedDetection {
    pub inner: TrackedDetection,
}

#[pymethods]
impl PyTrackedDetection {
    #[new]
    #[pyo3(signature = (track_id, label, confidence, bbox, confirmed = true))]
    pub fn new(
        track_id: TrackId,
        label: String,
        confidence: f64,
        bbox: &PyBBox,
        confirmed: bool,
    ) -> Self {
        Self {
            inner: TrackedDetection {
                track_id,
                label,
                confidence,
                bbox: bbox.inner,
                confirmed,
            },
        }
    }

    #[getter]
    fn track_id(&self) -> TrackId {
        self.inner.track_id
    }

    #[getter]
    fn label(&self) -> String {
        self.inner.label.clone()
    }

    #[getter]
    fn confidence(&self) -> f64 {
        self.inner.confidence
    }

    #[getter]
    fn bbox(&self) -> PyBBox {
        PyBBox {
            inner: self.inner.bbox,
        }
    }

    #[getter]
    fn confirmed(&self) -> bool {
        self.inner.confirmed
    }
}
