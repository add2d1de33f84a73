mod py_bbox;
mod py_session;
mod py_tracked_detection;

pub use py_bbox::PyBBox;
pub use py_session::PySession;
pub use py_tracked_detection::PyTrackedDetection;

use pyo3::{
    PyErr,
    exceptions::{PyRuntimeError, PyValueError},
};

use crate::Error;

impl From<Error> for PyErr {
    fn from(e: Error) -> Self {
        match e {
            Error::Config { .. } | Error::InvalidMedia { .. } => {
                PyValueError::new_err(e.to_string())
            }
            _ => PyRuntimeError::new_err(e.to_string()),
        }
    }
}
