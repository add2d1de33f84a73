use serde::{Deserialize, Serialize};

use crate::{bbox::BBox, identity::Resolution};

/// Identifier a tracker assigns to a subject for the lifetime of a video.
pub type TrackId = u32;

/// Raw detector output for one box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f64,
    #[serde(default)]
    pub bbox: BBox,
}

/// Tracker output for one box of the current frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedDetection {
    pub track_id: TrackId,
    pub label: String,
    pub confidence: f64,
    #[serde(default)]
    pub bbox: BBox,
    #[serde(default = "confirmed_by_default")]
    pub confirmed: bool,
}

fn confirmed_by_default() -> bool {
    true
}

/// One reduced detection event bound to a tracked subject.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub track_id: TrackId,
    pub label: String,
    pub confidence: f64,
    pub identity: Option<Resolution>,
}

impl Observation {
    pub fn new(track_id: TrackId, label: impl Into<String>, confidence: f64) -> Self {
        Self {
            track_id,
            label: label.into(),
            confidence,
            identity: None,
        }
    }

    pub fn with_identity(mut self, resolution: Resolution) -> Self {
        self.identity = Some(resolution);
        self
    }
}

impl TrackedDetection {
    /// Tentative tracks never become observations.
    pub fn into_observation(self) -> Option<Observation> {
        if !self.confirmed {
            return None;
        }
        Some(Observation::new(self.track_id, self.label, self.confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfirmed_detection_is_dropped() {
        let detection = TrackedDetection {
            track_id: 4,
            label: "helmet".to_string(),
            confidence: 0.9,
            bbox: BBox::default(),
            confirmed: false,
        };

        assert_eq!(detection.into_observation(), None);
    }

    #[test]
    fn test_confirmed_detection_keeps_track_and_label() {
        let detection = TrackedDetection {
            track_id: 4,
            label: "vest".to_string(),
            confidence: 0.7,
            bbox: BBox::new(0.0, 0.0, 1.0, 1.0),
            confirmed: true,
        };

        let observation = detection.into_observation().unwrap();

        assert_eq!(observation.track_id, 4);
        assert_eq!(observation.label, "vest");
        assert_eq!(observation.identity, None);
    }

    #[test]
    fn test_tracked_detection_json_defaults_to_confirmed() {
        let detection: TrackedDetection =
            serde_json::from_str(r#"{"track_id": 1, "label": "helmet", "confidence": 0.8}"#)
                .unwrap();

        assert!(detection.confirmed);
        assert_eq!(detection.bbox, BBox::default());
    }
}
