use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bbox::CropRegion;

/// Outcome of matching a subject region against a face gallery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Resolution {
    Found(String),
    NotFound,
}

impl Resolution {
    pub fn name(&self) -> Option<&str> {
        match self {
            Resolution::Found(name) => Some(name),
            Resolution::NotFound => None,
        }
    }
}

/// Face-matching collaborator.
///
/// Implementations receive the whole frame plus the region of the tracked
/// subject and decide themselves how to crop it.
pub trait IdentityResolver<Frame: ?Sized> {
    type Error: Display;

    fn resolve(&self, frame: &Frame, region: &CropRegion) -> Result<Resolution, Self::Error>;
}

/// Runs `resolver` and folds every failure into [`Resolution::NotFound`].
pub fn resolve_or_unknown<F, R>(resolver: &R, frame: &F, region: &CropRegion) -> Resolution
where
    F: ?Sized,
    R: IdentityResolver<F> + ?Sized,
{
    if region.is_empty() {
        return Resolution::NotFound;
    }
    match resolver.resolve(frame, region) {
        Ok(resolution) => resolution,
        Err(e) => {
            warn!(error = %e, ?region, "identity resolution failed, falling back to unknown");
            Resolution::NotFound
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Gallery {
        calls: Cell<u32>,
        fail: bool,
    }

    impl IdentityResolver<str> for Gallery {
        type Error = String;

        fn resolve(&self, frame: &str, _region: &CropRegion) -> Result<Resolution, Self::Error> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err("no face found".to_string());
            }
            Ok(Resolution::Found(frame.to_string()))
        }
    }

    fn region() -> CropRegion {
        CropRegion {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        }
    }

    #[test]
    fn test_failures_degrade_to_not_found() {
        let gallery = Gallery {
            calls: Cell::new(0),
            fail: true,
        };

        assert_eq!(
            resolve_or_unknown(&gallery, "Alice", &region()),
            Resolution::NotFound
        );
    }

    #[test]
    fn test_empty_region_skips_resolver() {
        let gallery = Gallery {
            calls: Cell::new(0),
            fail: false,
        };
        let empty = CropRegion {
            width: 0,
            ..region()
        };

        assert_eq!(
            resolve_or_unknown(&gallery, "Alice", &empty),
            Resolution::NotFound
        );
        assert_eq!(gallery.calls.get(), 0);
    }

    #[test]
    fn test_match_is_passed_through() {
        let gallery = Gallery {
            calls: Cell::new(0),
            fail: false,
        };

        assert_eq!(
            resolve_or_unknown(&gallery, "Alice", &region()).name(),
            Some("Alice")
        );
    }
}
