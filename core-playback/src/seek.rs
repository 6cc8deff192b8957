//! Seek bounds resolution.
//!
//! A seek target is checked against what the engine can actually reach before
//! any state sees it. Items with a known duration are bounded by that
//! duration; live items (indeterminate duration) are bounded by the union of
//! their seekable and loaded ranges.

use crate::types::UnavailableActionReason;
use bridge_traits::media::TimeRange;

/// Inputs of one seek resolution. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SeekQuery {
    /// Requested position in seconds. May be negative or past the end.
    pub requested: f64,
    /// Item duration in seconds. NaN (or any non-normal value) when
    /// indeterminate.
    pub duration: f64,
    pub seekable: Vec<TimeRange>,
    pub loaded: Vec<TimeRange>,
}

impl SeekQuery {
    /// Whether `position` falls inside any seekable or loaded range.
    fn is_available(&self, position: f64) -> bool {
        self.seekable
            .iter()
            .chain(self.loaded.iter())
            .any(|range| range.contains(position))
    }
}

/// Resolve a seek target to a position the engine can reach.
///
/// Returns the bounded position, or the reason the seek must be refused.
pub fn resolve(query: &SeekQuery) -> Result<f64, UnavailableActionReason> {
    if query.requested <= 0.0 || query.requested.is_nan() {
        return Ok(0.0);
    }

    if !query.duration.is_normal() {
        return if query.is_available(query.requested) {
            Ok(query.requested)
        } else {
            Err(UnavailableActionReason::SeekPositionNotAvailable)
        };
    }

    if query.requested.floor() < query.duration.floor() {
        Ok(query.requested)
    } else {
        Err(UnavailableActionReason::SeekOverstepPosition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vod(requested: f64, duration: f64) -> SeekQuery {
        SeekQuery {
            requested,
            duration,
            seekable: vec![TimeRange::new(0.0, duration)],
            loaded: Vec::new(),
        }
    }

    fn live(requested: f64) -> SeekQuery {
        SeekQuery {
            requested,
            duration: f64::NAN,
            seekable: vec![TimeRange::new(100.0, 30.0)],
            loaded: vec![TimeRange::new(125.0, 15.0)],
        }
    }

    #[test]
    fn test_non_positive_targets_clamp_to_zero() {
        assert_eq!(resolve(&vod(-5.0, 60.0)), Ok(0.0));
        assert_eq!(resolve(&vod(0.0, 60.0)), Ok(0.0));
        assert_eq!(resolve(&live(-1.0)), Ok(0.0));
    }

    #[test]
    fn test_targets_inside_duration_pass_through() {
        for target in [0.5, 10.0, 59.2] {
            assert_eq!(resolve(&vod(target, 60.0)), Ok(target));
        }
    }

    #[test]
    fn test_targets_at_or_past_duration_overstep() {
        assert_eq!(
            resolve(&vod(60.0, 60.0)),
            Err(UnavailableActionReason::SeekOverstepPosition)
        );
        assert_eq!(
            resolve(&vod(1e9, 60.0)),
            Err(UnavailableActionReason::SeekOverstepPosition)
        );
    }

    #[test]
    fn test_whole_second_comparison() {
        // 60.4 and 60.9 land in the same second.
        assert_eq!(
            resolve(&vod(60.4, 60.9)),
            Err(UnavailableActionReason::SeekOverstepPosition)
        );
        assert_eq!(resolve(&vod(59.99, 60.9)), Ok(59.99));
    }

    #[test]
    fn test_live_targets_use_ranges() {
        assert_eq!(resolve(&live(110.0)), Ok(110.0));
        // Only inside the loaded range.
        assert_eq!(resolve(&live(135.0)), Ok(135.0));
        assert_eq!(
            resolve(&live(50.0)),
            Err(UnavailableActionReason::SeekPositionNotAvailable)
        );
        // Ranges are half-open.
        assert_eq!(
            resolve(&live(140.0)),
            Err(UnavailableActionReason::SeekPositionNotAvailable)
        );
    }

    #[test]
    fn test_infinite_duration_is_indeterminate() {
        let query = SeekQuery {
            duration: f64::INFINITY,
            ..live(50.0)
        };
        assert_eq!(
            resolve(&query),
            Err(UnavailableActionReason::SeekPositionNotAvailable)
        );
    }
}
