//! Loop configuration.
//!
//! A [`LoopConfig`] is immutable for the lifetime of a controller run and is
//! replaced wholesale through [`CycleController::reconfigure`].
//!
//! [`CycleController::reconfigure`]: super::CycleController::reconfigure

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::curve::Curve;
use crate::error::{LoopError, LoopResult};

/// How many times the loop repeats after its first cycle.
///
/// On the wire (config files, CLI) this is the classic integer form:
/// `-1` for infinite, `0` for a single cycle, `N` for `N + 1` cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Repeat {
    /// Play until paused or disposed
    #[default]
    Infinite,
    /// Play the first cycle plus this many repeats
    Times(u32),
}

impl Repeat {
    /// True once `cycle` completed cycles have gone past the repeat budget.
    /// Only meaningful at a cycle boundary.
    pub fn exceeded_by(self, cycle: u32) -> bool {
        match self {
            Repeat::Infinite => false,
            Repeat::Times(n) => cycle > n,
        }
    }

    /// Total number of cycles this setting plays, `None` when infinite
    pub fn total_cycles(self) -> Option<u32> {
        match self {
            Repeat::Infinite => None,
            Repeat::Times(n) => Some(n.saturating_add(1)),
        }
    }
}

impl TryFrom<i64> for Repeat {
    type Error = LoopError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Repeat::Infinite),
            n if n < -1 => Err(LoopError::InvalidConfiguration(format!(
                "repeat count must be -1 (infinite) or >= 0, got {n}"
            ))),
            n => u32::try_from(n).map(Repeat::Times).map_err(|_| {
                LoopError::InvalidConfiguration(format!("repeat count {n} is too large"))
            }),
        }
    }
}

impl From<Repeat> for i64 {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Infinite => -1,
            Repeat::Times(n) => i64::from(n),
        }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repeat::Infinite => f.write_str("∞"),
            Repeat::Times(n) => write!(f, "{n}"),
        }
    }
}

/// Everything the cycle controller is configured with
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    pub repeat: Repeat,
    /// External pause request
    pub paused: bool,
    /// Resume from the frozen position (`true`) or restart the leg (`false`)
    pub continuity: bool,
    /// Play a backward leg after each forward leg
    pub mirror: bool,
    /// Present progress inverted (starting at 1, travelling to 0)
    pub reverse: bool,
    pub curve: Curve,
    /// Wait before each forward leg after the first
    pub delay: Duration,
    pub duration: Duration,
    /// Wait before each backward leg; falls back to `delay`
    pub backward_delay: Option<Duration>,
    /// Length of each backward leg; falls back to `duration`
    pub backward_duration: Option<Duration>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            repeat: Repeat::Infinite,
            paused: false,
            continuity: true,
            mirror: false,
            reverse: false,
            curve: Curve::Linear,
            delay: Duration::ZERO,
            duration: Duration::from_millis(1000),
            backward_delay: None,
            backward_duration: None,
        }
    }
}

impl LoopConfig {
    /// Build a config from the raw integer repeat form, failing fast on
    /// anything below `-1`.
    pub fn with_repeat_count(mut self, count: i64) -> LoopResult<Self> {
        self.repeat = Repeat::try_from(count)?;
        Ok(self)
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn continuity(mut self, continuity: bool) -> Self {
        self.continuity = continuity;
        self
    }

    pub fn mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn backward_delay(mut self, delay: Duration) -> Self {
        self.backward_delay = Some(delay);
        self
    }

    pub fn backward_duration(mut self, duration: Duration) -> Self {
        self.backward_duration = Some(duration);
        self
    }

    pub fn effective_backward_delay(&self) -> Duration {
        self.backward_delay.unwrap_or(self.delay)
    }

    pub fn effective_backward_duration(&self) -> Duration {
        self.backward_duration.unwrap_or(self.duration)
    }

    /// Check invariants that the typed fields cannot express on their own.
    pub fn validate(&self) -> LoopResult<()> {
        if let Repeat::Times(n) = self.repeat {
            if n == u32::MAX {
                return Err(LoopError::InvalidConfiguration(
                    "repeat count overflows the cycle counter".into(),
                ));
            }
        }
        self.curve.validate()
    }

    /// Whether moving from `self` to `next` forces a full controller reset.
    /// Repeat, continuity, mirror and reverse changes do; timing, curve and
    /// pause changes apply in place.
    pub fn requires_reset(&self, next: &LoopConfig) -> bool {
        self.repeat != next.repeat
            || self.continuity != next.continuity
            || self.mirror != next.mirror
            || self.reverse != next.reverse
    }

    /// Whether the driver needs new durations or a new curve
    pub fn timing_changed(&self, next: &LoopConfig) -> bool {
        self.duration != next.duration
            || self.backward_duration != next.backward_duration
            || self.curve != next.curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_from_integer() {
        assert_eq!(Repeat::try_from(-1).unwrap(), Repeat::Infinite);
        assert_eq!(Repeat::try_from(0).unwrap(), Repeat::Times(0));
        assert_eq!(Repeat::try_from(7).unwrap(), Repeat::Times(7));
        assert!(matches!(
            Repeat::try_from(-2),
            Err(LoopError::InvalidConfiguration(_))
        ));
        assert!(Repeat::try_from(i64::MAX).is_err());
    }

    #[test]
    fn repeat_exceeded() {
        assert!(!Repeat::Times(0).exceeded_by(0));
        assert!(Repeat::Times(0).exceeded_by(1));
        assert!(!Repeat::Times(2).exceeded_by(2));
        assert!(Repeat::Times(2).exceeded_by(3));
        assert!(!Repeat::Infinite.exceeded_by(u32::MAX));
    }

    #[test]
    fn total_cycles() {
        assert_eq!(Repeat::Times(0).total_cycles(), Some(1));
        assert_eq!(Repeat::Times(4).total_cycles(), Some(5));
        assert_eq!(Repeat::Infinite.total_cycles(), None);
    }

    #[test]
    fn with_repeat_count_rejects_below_minus_one() {
        assert!(LoopConfig::default().with_repeat_count(-5).is_err());
        let config = LoopConfig::default().with_repeat_count(3).unwrap();
        assert_eq!(config.repeat, Repeat::Times(3));
    }

    #[test]
    fn backward_values_fall_back_to_forward() {
        let config = LoopConfig::default()
            .delay(Duration::from_millis(200))
            .duration(Duration::from_millis(600));
        assert_eq!(config.effective_backward_delay(), Duration::from_millis(200));
        assert_eq!(
            config.effective_backward_duration(),
            Duration::from_millis(600)
        );

        let config = config
            .backward_delay(Duration::from_millis(50))
            .backward_duration(Duration::from_millis(300));
        assert_eq!(config.effective_backward_delay(), Duration::from_millis(50));
        assert_eq!(
            config.effective_backward_duration(),
            Duration::from_millis(300)
        );
    }

    #[test]
    fn validate_rejects_out_of_range_bezier() {
        let config = LoopConfig::default().curve(Curve::CubicBezier(1.5, 0.0, 0.2, 1.0));
        assert!(matches!(
            config.validate(),
            Err(LoopError::InvalidConfiguration(_))
        ));
        let config = LoopConfig::default().curve(Curve::CubicBezier(0.4, 0.0, 0.2, 1.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reset_rules() {
        let base = LoopConfig::default();
        assert!(base.requires_reset(&base.clone().mirror(true)));
        assert!(base.requires_reset(&base.clone().reverse(true)));
        assert!(base.requires_reset(&base.clone().continuity(false)));
        assert!(base.requires_reset(&base.clone().repeat(Repeat::Times(1))));

        assert!(!base.requires_reset(&base.clone().paused(true)));
        assert!(!base.requires_reset(&base.clone().delay(Duration::from_secs(1))));
        assert!(!base.requires_reset(&base.clone().curve(Curve::EaseIn)));
        assert!(base.timing_changed(&base.clone().curve(Curve::EaseIn)));
        assert!(!base.timing_changed(&base.clone().delay(Duration::from_secs(1))));
    }

    #[test]
    fn repeat_serde_uses_integer_form() {
        #[derive(Deserialize, Serialize)]
        struct Wrapper {
            repeat: Repeat,
        }
        let w: Wrapper = toml::from_str("repeat = -1").unwrap();
        assert_eq!(w.repeat, Repeat::Infinite);
        let w: Wrapper = toml::from_str("repeat = 2").unwrap();
        assert_eq!(w.repeat, Repeat::Times(2));
        assert!(toml::from_str::<Wrapper>("repeat = -3").is_err());
        assert_eq!(serde_json::to_string(&Repeat::Times(4)).unwrap(), "4");
    }
}
