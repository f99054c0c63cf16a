//! Rate-proportional animation cadence.
//!
//! An edge is animated by emitting dots at an interval inversely
//! proportional to its traffic rate. Rates across a graph can span many
//! orders of magnitude, so the mapping is re-centered on the largest rate
//! seen in the current graph load: [`CalibrationState`] tracks a threshold
//! that ratchets up to twice any rate exceeding it, and a sub-linear scale
//! factor derived from how far the threshold has grown.
//!
//! ```
//! use meshgraph::data::animation::{AnimationSpeed, RateAnimationCalibrator};
//! use meshgraph::TrafficKind;
//!
//! let mut calibrator = RateAnimationCalibrator::new(TrafficKind::Requests);
//! calibrator.calibrate(1.0);
//!
//! assert_eq!(calibrator.compute_delay(1.0), Some(1000.0));
//! assert_eq!(calibrator.compute_delay(0.0), None);
//! assert_eq!(calibrator.compute_animation_speed(f64::NAN), AnimationSpeed::None);
//! ```

use meshgraph_types::TrafficKind;
use serde::Serialize;
use tracing::trace;

/// Threshold a fresh calibration starts from.
pub const INITIAL_THRESHOLD: f64 = 50.0;

/// Fastest allowed dot interval.
pub const MIN_DELAY_MS: f64 = 40.0;

/// Slowest allowed dot interval.
pub const MAX_DELAY_MS: f64 = 5000.0;

/// Threshold growth beyond which the scale factor uses exponent 0.9.
pub const HIGH_TIER_RATIO: f64 = 100.0;

/// Threshold growth beyond which the scale factor uses exponent 0.95.
pub const MIDDLE_TIER_RATIO: f64 = 10.0;

/// Base delay for request rates: one dot per request per second.
pub const REQUESTS_BASE_DELAY: f64 = 1.0;

/// Base delay for byte rates.
pub const BYTES_BASE_DELAY: f64 = 0.05;

const SPEED_TIERS: usize = 5;

/// Calibration of one traffic category within one graph load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationState {
    pub threshold: f64,
    pub scale_factor: f64,
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self {
            threshold: INITIAL_THRESHOLD,
            scale_factor: 1.0,
        }
    }
}

impl CalibrationState {
    /// Widen the threshold to `2 * rate` when `rate` exceeds it.
    ///
    /// The threshold never shrinks; start over with `CalibrationState::default()`.
    pub fn calibrate(self, rate: f64) -> Self {
        if !rate.is_finite() || rate <= self.threshold {
            return self;
        }

        let threshold = 2.0 * rate;
        Self {
            threshold,
            scale_factor: scale_factor(threshold),
        }
    }
}

/// Scale factor for a calibrated threshold.
pub fn scale_factor(threshold: f64) -> f64 {
    let ratio = threshold / INITIAL_THRESHOLD;
    if ratio > HIGH_TIER_RATIO {
        ratio.powf(0.9)
    } else if ratio > MIDDLE_TIER_RATIO {
        ratio.powf(0.95)
    } else {
        ratio
    }
}

/// Discrete animation speed for renderers without continuous delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationSpeed {
    /// No animation.
    None,
    Fast,
    MediumFast,
    Medium,
    MediumSlow,
    Slow,
}

impl AnimationSpeed {
    const TIERS: [AnimationSpeed; SPEED_TIERS] = [
        AnimationSpeed::Fast,
        AnimationSpeed::MediumFast,
        AnimationSpeed::Medium,
        AnimationSpeed::MediumSlow,
        AnimationSpeed::Slow,
    ];

    /// Bucket a clamped delay into one of five equal-width tiers.
    pub fn from_delay(delay: f64) -> Self {
        let width = (MAX_DELAY_MS - MIN_DELAY_MS) / SPEED_TIERS as f64;
        let tier = ((delay - MIN_DELAY_MS) / width).floor().max(0.0) as usize;
        Self::TIERS[tier.min(SPEED_TIERS - 1)]
    }
}

/// Maps rates to dot intervals for one traffic category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTimer {
    base_delay: f64,
}

impl AnimationTimer {
    pub fn new(base_delay: f64) -> Self {
        Self { base_delay }
    }

    /// Timer with the base delay of a traffic category.
    pub fn for_kind(kind: TrafficKind) -> Self {
        match kind {
            TrafficKind::Requests => Self::new(REQUESTS_BASE_DELAY),
            TrafficKind::Bytes => Self::new(BYTES_BASE_DELAY),
        }
    }

    pub fn base_delay(&self) -> f64 {
        self.base_delay
    }

    /// Dot interval in milliseconds, or `None` when the edge should not animate.
    pub fn compute_delay(&self, state: &CalibrationState, rate: f64) -> Option<f64> {
        if rate.is_nan() || rate <= 0.0 {
            return None;
        }

        let delay = 1000.0 * self.base_delay * state.scale_factor / rate;
        Some(delay.clamp(MIN_DELAY_MS, MAX_DELAY_MS))
    }

    pub fn compute_animation_speed(&self, state: &CalibrationState, rate: f64) -> AnimationSpeed {
        self.compute_delay(state, rate)
            .map(AnimationSpeed::from_delay)
            .unwrap_or(AnimationSpeed::None)
    }
}

/// A timer together with the calibration it is currently using.
///
/// Each graph view owns one of these per traffic category.
#[derive(Debug, Clone)]
pub struct RateAnimationCalibrator {
    kind: TrafficKind,
    timer: AnimationTimer,
    state: CalibrationState,
}

impl RateAnimationCalibrator {
    pub fn new(kind: TrafficKind) -> Self {
        Self {
            kind,
            timer: AnimationTimer::for_kind(kind),
            state: CalibrationState::default(),
        }
    }

    pub fn kind(&self) -> TrafficKind {
        self.kind
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    pub fn calibrate(&mut self, rate: f64) {
        let next = self.state.calibrate(rate);
        if next != self.state {
            trace!(
                kind = ?self.kind,
                threshold = next.threshold,
                scale_factor = next.scale_factor,
                "Calibration threshold raised"
            );
        }
        self.state = next;
    }

    /// Back to the initial threshold and a scale factor of 1.
    pub fn reset_calibration(&mut self) {
        self.state = CalibrationState::default();
    }

    pub fn compute_delay(&self, rate: f64) -> Option<f64> {
        self.timer.compute_delay(&self.state, rate)
    }

    pub fn compute_animation_speed(&self, rate: f64) -> AnimationSpeed {
        self.timer.compute_animation_speed(&self.state, rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_delay_is_unclamped_inverse() {
        let mut calibrator = RateAnimationCalibrator::new(TrafficKind::Requests);
        calibrator.reset_calibration();
        calibrator.calibrate(1.0);

        assert_eq!(calibrator.compute_delay(1.0), Some(1000.0));
        assert_eq!(calibrator.compute_delay(4.0), Some(250.0));
    }

    #[test]
    fn test_no_animation_for_degenerate_rates() {
        let calibrator = RateAnimationCalibrator::new(TrafficKind::Requests);
        assert_eq!(calibrator.compute_delay(f64::NAN), None);
        assert_eq!(calibrator.compute_delay(0.0), None);
        assert_eq!(calibrator.compute_delay(-3.0), None);
        assert_eq!(calibrator.compute_animation_speed(0.0), AnimationSpeed::None);
    }

    #[test]
    fn test_delay_is_clamped() {
        let calibrator = RateAnimationCalibrator::new(TrafficKind::Requests);
        assert_eq!(calibrator.compute_delay(0.001), Some(MAX_DELAY_MS));
        assert_eq!(calibrator.compute_delay(1000.0), Some(MIN_DELAY_MS));
    }

    #[test]
    fn test_bytes_base_delay() {
        let calibrator = RateAnimationCalibrator::new(TrafficKind::Bytes);
        assert_eq!(calibrator.compute_delay(1.0), Some(50.0));
        assert_eq!(calibrator.compute_delay(0.01), Some(5000.0));
    }

    #[test]
    fn test_monotonic_delays() {
        let rates = [0.5, 2.0, 7.5, 30.0, 120.0, 900.0, 5000.0];
        let mut calibrator = RateAnimationCalibrator::new(TrafficKind::Requests);
        for rate in rates {
            calibrator.calibrate(rate);
        }

        let delays: Vec<f64> = rates
            .iter()
            .filter_map(|r| calibrator.compute_delay(*r))
            .collect();
        assert_eq!(delays.len(), rates.len());
        for pair in delays.windows(2) {
            assert!(pair[1] <= pair[0], "{:?}", delays);
        }
    }

    #[test]
    fn test_calibrate_ratchets() {
        let state = CalibrationState::default();

        let same = state.calibrate(50.0);
        assert_eq!(same, state);

        let raised = state.calibrate(100.0);
        assert_eq!(raised.threshold, 200.0);
        assert_eq!(raised.scale_factor, 4.0);

        // Lower rates never shrink the threshold
        assert_eq!(raised.calibrate(60.0), raised);
        assert_eq!(raised.calibrate(f64::NAN), raised);
    }

    #[test]
    fn test_scale_factor_tiers() {
        assert_eq!(scale_factor(INITIAL_THRESHOLD), 1.0);
        assert_eq!(scale_factor(500.0), 10.0);

        let middle = scale_factor(1000.0);
        assert!((middle - 20f64.powf(0.95)).abs() < 1e-9);

        let high = scale_factor(10_000.0);
        assert!((high - 200f64.powf(0.9)).abs() < 1e-9);
        assert!(high < 200.0);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut calibrator = RateAnimationCalibrator::new(TrafficKind::Requests);
        calibrator.calibrate(10_000.0);
        assert!(calibrator.state().threshold > INITIAL_THRESHOLD);

        calibrator.reset_calibration();
        assert_eq!(calibrator.state(), CalibrationState::default());
    }

    #[test]
    fn test_speed_tiers() {
        assert_eq!(AnimationSpeed::from_delay(MIN_DELAY_MS), AnimationSpeed::Fast);
        assert_eq!(AnimationSpeed::from_delay(1500.0), AnimationSpeed::MediumFast);
        assert_eq!(AnimationSpeed::from_delay(2500.0), AnimationSpeed::Medium);
        assert_eq!(AnimationSpeed::from_delay(3500.0), AnimationSpeed::MediumSlow);
        assert_eq!(AnimationSpeed::from_delay(MAX_DELAY_MS), AnimationSpeed::Slow);

        let calibrator = RateAnimationCalibrator::new(TrafficKind::Requests);
        assert_eq!(calibrator.compute_animation_speed(100.0), AnimationSpeed::Fast);
        assert_eq!(calibrator.compute_animation_speed(0.2), AnimationSpeed::Slow);
    }
}
