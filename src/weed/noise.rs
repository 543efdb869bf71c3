//! Noise-based dropping of candidates.
//!
//! The gate is in place but the filter itself is not implemented. When a noise
//! threshold below π radians is configured, the pass reports
//! [`WeedError::UnimplementedNoiseFilter`] instead of returning an unfiltered
//! mask that downstream stages would trust.

use std::f64::consts::PI;

use tracing::warn;

use super::WeedConfig;
use crate::WeedError;

/// Reaction to a configured but unimplemented noise filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseFilterPolicy {
    /// Fail the run with [`WeedError::UnimplementedNoiseFilter`].
    #[default]
    Abort,
    /// Log a warning and continue without noise filtering.
    WarnAndSkip,
}

/// Whether the configured thresholds ask for noise weeding.
///
/// An unset threshold counts as "no limit". The filter is requested as soon
/// as either threshold is strictly below π.
pub fn gate_active(standard_dev: Option<f64>, max_noise: Option<f64>) -> bool {
    let below = |t: Option<f64>| t.is_some_and(|v| v < PI);
    below(standard_dev) || below(max_noise)
}

/// Run the noise pass. Returns `Ok(true)` if a filter was applied,
/// `Ok(false)` if none was requested or it was skipped by policy.
pub fn drop_noisy(config: &WeedConfig, _selectable: &mut [bool]) -> Result<bool, WeedError> {
    if !gate_active(config.noise_standard_dev, config.noise_max) {
        return Ok(false);
    }
    match config.noise_policy {
        NoiseFilterPolicy::Abort => Err(WeedError::UnimplementedNoiseFilter {
            standard_dev: config.noise_standard_dev,
            max_noise: config.noise_max,
        }),
        NoiseFilterPolicy::WarnAndSkip => {
            warn!(
                "Noise weeding requested (standard_dev={:?}, max_noise={:?}) but not implemented; skipping",
                config.noise_standard_dev, config.noise_max
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate() {
        assert!(!gate_active(None, None));
        assert!(!gate_active(Some(PI), Some(10.0)));
        assert!(gate_active(Some(1.0), None));
        assert!(gate_active(None, Some(3.0)));
    }

    #[test]
    fn test_default_config_is_noop() {
        let mut selectable = vec![true, true];
        let applied = drop_noisy(&WeedConfig::default(), &mut selectable).unwrap();
        assert!(!applied);
        assert_eq!(selectable, vec![true, true]);
    }

    #[test]
    fn test_configured_threshold_aborts() {
        let config = WeedConfig {
            noise_standard_dev: Some(1.0),
            ..Default::default()
        };
        let err = drop_noisy(&config, &mut [true]).unwrap_err();
        assert!(matches!(
            err,
            WeedError::UnimplementedNoiseFilter {
                standard_dev: Some(_),
                max_noise: None
            }
        ));
    }

    #[test]
    fn test_warn_and_skip_leaves_mask() {
        let config = WeedConfig {
            noise_max: Some(0.5),
            noise_policy: NoiseFilterPolicy::WarnAndSkip,
            ..Default::default()
        };
        let mut selectable = vec![true, false, true];
        assert!(!drop_noisy(&config, &mut selectable).unwrap());
        assert_eq!(selectable, vec![true, false, true]);
    }
}
