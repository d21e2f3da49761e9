use std::time::Duration;

use super::curve::Curve;
use super::driver::{Direction, DriverStatus, ProgressDriver};

/// Float slack when deciding that a tick reached the leg bound
const BOUND_EPSILON: f32 = 1e-6;

/// Ticker-driven progress driver.
///
/// Advances linearly by `dt / duration` on each tick while running and
/// applies its curve on read. Forward legs use `duration`, backward legs
/// use `reverse_duration`.
#[derive(Debug, Clone)]
pub struct Tween {
    value: f32,
    direction: Direction,
    running: bool,
    duration: Duration,
    reverse_duration: Duration,
    curve: Curve,
    /// Time past the bound on the tick that completed the last leg
    leftover: Duration,
}

impl Tween {
    pub fn new(duration: Duration) -> Self {
        Self {
            value: 0.0,
            direction: Direction::Forward,
            running: false,
            duration,
            reverse_duration: duration,
            curve: Curve::Linear,
            leftover: Duration::ZERO,
        }
    }

    fn leg_duration(&self) -> Duration {
        match self.direction {
            Direction::Forward => self.duration,
            Direction::Backward => self.reverse_duration,
        }
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

impl ProgressDriver for Tween {
    fn configure(&mut self, duration: Duration, reverse_duration: Duration, curve: Curve) {
        self.duration = duration;
        self.reverse_duration = reverse_duration;
        self.curve = curve;
    }

    fn start(&mut self) {
        self.direction = Direction::Forward;
        self.running = true;
    }

    fn start_from(&mut self, progress: f32) {
        self.value = progress.clamp(0.0, 1.0);
        self.start();
    }

    fn reverse(&mut self) {
        self.direction = Direction::Backward;
        self.running = true;
    }

    fn reverse_from(&mut self, progress: f32) {
        self.value = progress.clamp(0.0, 1.0);
        self.reverse();
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn reset(&mut self) {
        self.running = false;
        self.value = 0.0;
        self.direction = Direction::Forward;
    }

    fn status(&self) -> DriverStatus {
        if !self.running {
            if self.value >= 1.0 {
                return DriverStatus::AtEnd;
            }
            if self.value <= 0.0 {
                return DriverStatus::AtStart;
            }
        }
        match self.direction {
            Direction::Forward => DriverStatus::Forward,
            Direction::Backward => DriverStatus::Reverse,
        }
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn value(&self) -> f32 {
        self.value
    }

    fn eased_value(&self) -> f32 {
        self.curve.transform(self.value)
    }

    fn tick(&mut self, dt: Duration) -> Option<DriverStatus> {
        self.leftover = Duration::ZERO;
        if !self.running {
            return None;
        }

        let leg = self.leg_duration();
        let delta = if leg.is_zero() {
            1.0
        } else {
            dt.as_secs_f32() / leg.as_secs_f32()
        };
        let to_bound = match self.direction {
            Direction::Forward => 1.0 - self.value,
            Direction::Backward => self.value,
        };

        if delta + BOUND_EPSILON < to_bound {
            match self.direction {
                Direction::Forward => self.value += delta,
                Direction::Backward => self.value -= delta,
            }
            return None;
        }

        // A zero-length leg consumes the whole tick.
        if !leg.is_zero() {
            self.leftover = dt.saturating_sub(leg.mul_f32(to_bound));
        }
        self.running = false;
        match self.direction {
            Direction::Forward => {
                self.value = 1.0;
                Some(DriverStatus::AtEnd)
            }
            Direction::Backward => {
                self.value = 0.0;
                Some(DriverStatus::AtStart)
            }
        }
    }

    fn leftover(&self) -> Duration {
        self.leftover
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn idle_tween_does_not_advance() {
        let mut tween = Tween::new(Duration::from_millis(400));
        assert_eq!(tween.tick(MS_100), None);
        assert_eq!(tween.value(), 0.0);
        assert_eq!(tween.status(), DriverStatus::AtStart);
    }

    #[test]
    fn forward_leg_completes_at_end() {
        let mut tween = Tween::new(Duration::from_millis(400));
        tween.start();
        assert_eq!(tween.status(), DriverStatus::Forward);
        for _ in 0..3 {
            assert_eq!(tween.tick(MS_100), None);
        }
        assert!((tween.value() - 0.75).abs() < 1e-4);
        assert_eq!(tween.tick(MS_100), Some(DriverStatus::AtEnd));
        assert_eq!(tween.value(), 1.0);
        assert!(!tween.is_running());
        assert_eq!(tween.status(), DriverStatus::AtEnd);
    }

    #[test]
    fn backward_leg_uses_reverse_duration() {
        let mut tween = Tween::new(Duration::from_millis(400));
        tween.configure(
            Duration::from_millis(400),
            Duration::from_millis(200),
            Curve::Linear,
        );
        tween.reverse_from(1.0);
        assert_eq!(tween.status(), DriverStatus::Reverse);
        assert_eq!(tween.tick(MS_100), None);
        assert_eq!(tween.tick(MS_100), Some(DriverStatus::AtStart));
        assert_eq!(tween.direction(), Direction::Backward);
    }

    #[test]
    fn stop_freezes_mid_leg() {
        let mut tween = Tween::new(Duration::from_millis(400));
        tween.start();
        tween.tick(MS_100);
        tween.stop();
        assert_eq!(tween.tick(MS_100), None);
        assert!((tween.value() - 0.25).abs() < 1e-4);
        assert_eq!(tween.status(), DriverStatus::Forward);
    }

    #[test]
    fn zero_duration_jumps_to_bound() {
        let mut tween = Tween::new(Duration::ZERO);
        tween.start();
        assert_eq!(tween.tick(Duration::from_millis(1)), Some(DriverStatus::AtEnd));
        assert_eq!(tween.leftover(), Duration::ZERO);
    }

    #[test]
    fn completion_reports_time_past_bound() {
        let mut tween = Tween::new(Duration::from_millis(1000));
        tween.start_from(0.5);
        assert_eq!(tween.tick(Duration::from_millis(250)), None);
        assert_eq!(tween.leftover(), Duration::ZERO);
        assert_eq!(
            tween.tick(Duration::from_millis(500)),
            Some(DriverStatus::AtEnd)
        );
        assert_eq!(tween.value(), 1.0);
        assert_eq!(tween.leftover(), Duration::from_millis(250));
    }

    #[test]
    fn eased_value_applies_curve() {
        let mut tween = Tween::new(Duration::from_millis(400));
        tween.configure(
            Duration::from_millis(400),
            Duration::from_millis(400),
            Curve::EaseIn,
        );
        tween.start_from(0.5);
        assert!((tween.eased_value() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn reset_returns_to_start() {
        let mut tween = Tween::new(Duration::from_millis(400));
        tween.reverse_from(0.6);
        tween.reset();
        assert_eq!(tween.value(), 0.0);
        assert_eq!(tween.direction(), Direction::Forward);
        assert_eq!(tween.status(), DriverStatus::AtStart);
    }
}
