use log::{debug, trace, warn};
use num_traits::{float::FloatConst, Float};

use super::{gains::PidGains, FeedbackController, Signal};

/// Incremental-form PID.
///
/// [`update`](Self::update) returns a *change* in command, computed from the
/// last three errors:
///
/// `kp·(e0 − e1) + ki·e0 + kd·(e0 − 2·e1 + e2)`
///
/// The caller adds it to the actuator's current command. Nothing is summed
/// internally, so there is no integral state to wind up.
///
/// # Example
/// ```
/// use lampid::IncPid;
///
/// let mut pid = IncPid::new(1.0, 0.0, 0.0).with_target(10.0);
/// let mut command = 0.0;
/// command += pid.update(0.0);
/// assert_eq!(command, 10.0);
/// // The error is still positive but shrinking, so the command backs off.
/// assert_eq!(pid.update(5.0), -5.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct IncrementalPid<T: Float = f32> {
    gains: PidGains<T>,
    signal: Signal<T>,
    errors: [T; 3], // Newest first
}

/// Single precision incremental PID.
pub type IncPid = IncrementalPid<f32>;

impl<T: Float + FloatConst> IncrementalPid<T> {
    pub fn new(kp: T, ki: T, kd: T) -> Self {
        Self::from_gains(PidGains::new(kp, ki, kd))
    }

    pub fn from_gains(gains: PidGains<T>) -> Self {
        Self {
            gains,
            signal: Signal::new(),
            errors: [T::zero(); 3],
        }
    }

    pub fn with_target(mut self, target: T) -> Self {
        self.signal.target = target;
        self
    }

    /// Replaces the gains. The error history is kept.
    pub fn init(&mut self, kp: T, ki: T, kd: T) {
        self.gains = PidGains::new(kp, ki, kd);
        debug!(
            "incremental pid gains set to ({:?}, {:?}, {:?})",
            kp.to_f64(),
            ki.to_f64(),
            kd.to_f64()
        );
    }

    pub fn set_target(&mut self, target: T) {
        self.signal.target = target;
        debug!("incremental pid target set to {:?}", target.to_f64());
    }

    /// Clears measurements and all three error slots. Gains and target are
    /// kept.
    pub fn reset(&mut self) {
        self.signal.clear();
        self.errors = [T::zero(); 3];
        debug!("incremental pid reset");
    }

    pub fn update(&mut self, input: T) -> T {
        if !input.is_finite() {
            warn!("non-finite pid input {:?}", input.to_f64());
        }
        self.signal.current = input;

        self.errors.rotate_right(1);
        self.errors[0] = self.signal.target - self.signal.current;

        self.signal.previous = self.signal.current;

        let [e0, e1, e2] = self.errors;
        let two = T::one() + T::one();
        let output = self.gains.kp * (e0 - e1)
            + self.gains.ki * e0
            + self.gains.kd * (e0 - two * e1 + e2);
        trace!(
            "incremental pid error={:?} output={:?}",
            e0.to_f64(),
            output.to_f64()
        );
        output
    }

    pub fn gains(&self) -> PidGains<T> {
        self.gains
    }

    pub fn target(&self) -> T {
        self.signal.target
    }

    pub fn current(&self) -> T {
        self.signal.current
    }

    pub fn previous(&self) -> T {
        self.signal.previous
    }

    /// Error history, newest first.
    pub fn errors(&self) -> [T; 3] {
        self.errors
    }
}

impl<T: Float + FloatConst> FeedbackController<T> for IncrementalPid<T> {
    fn update(&mut self, input: T) -> T {
        IncrementalPid::update(self, input)
    }

    fn reset(&mut self) {
        IncrementalPid::reset(self)
    }

    fn set_target(&mut self, target: T) {
        IncrementalPid::set_target(self, target)
    }

    fn target(&self) -> T {
        IncrementalPid::target(self)
    }

    fn init(&mut self, kp: T, ki: T, kd: T) {
        IncrementalPid::init(self, kp, ki, kd)
    }

    fn gains(&self) -> PidGains<T> {
        IncrementalPid::gains(self)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn proportional_delta() {
        let mut pid = IncPid::new(1.0, 0.0, 0.0);
        pid.set_target(10.0);
        assert_eq!(pid.update(0.0), 10.0);
        assert_eq!(pid.errors(), [10.0, 0.0, 0.0]);
        assert_eq!(pid.update(5.0), -5.0);
        assert_eq!(pid.errors(), [5.0, 10.0, 0.0]);
    }

    #[test]
    fn history_shifts_oldest_out() {
        let mut pid = IncPid::new(0.0, 0.0, 0.0).with_target(4.0);
        pid.update(0.0);
        pid.update(1.0);
        pid.update(2.0);
        pid.update(3.0);
        assert_eq!(pid.errors(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn integral_uses_latest_error_only() {
        let mut pid = IncPid::new(0.0, 0.5, 0.0).with_target(2.0);
        assert_eq!(pid.update(0.0), 1.0);
        assert_eq!(pid.update(0.0), 1.0);
        assert_eq!(pid.update(2.0), 0.0);
    }

    #[test]
    fn derivative_is_second_difference() {
        let mut pid = IncPid::new(0.0, 0.0, 1.0).with_target(0.0);
        // e = [-1, 0, 0]
        assert_eq!(pid.update(1.0), -1.0);
        // e = [-3, -1, 0] -> -3 + 2 + 0
        assert_eq!(pid.update(3.0), -1.0);
        // e = [-4, -3, -1] -> -4 + 6 - 1
        assert_eq!(pid.update(4.0), 1.0);
    }

    #[test]
    fn accumulated_deltas_match_positional_form() {
        // With kd = 0 the running sum of deltas is kp·e + ki·Σe.
        let (kp, ki) = (0.8, 0.3);
        let mut pid = IncPid::new(kp, ki, 0.0).with_target(1.0);
        let mut command = 0.0;
        let mut sum = 0.0;
        for input in [0.0, 0.2, 0.5, 0.9, 1.1, 1.0] {
            command += pid.update(input);
            let error = 1.0 - input;
            sum += error;
            assert_relative_eq!(command, kp * error + ki * sum, epsilon = 1e-5);
        }
    }

    #[test]
    fn reset_keeps_gains_and_target() {
        let mut pid = IncPid::new(1.0, 2.0, 3.0).with_target(7.0);
        pid.update(1.0);
        pid.update(2.0);
        pid.reset();

        assert_eq!(pid.gains(), PidGains::new(1.0, 2.0, 3.0));
        assert_eq!(pid.target(), 7.0);
        assert_eq!(pid.errors(), [0.0; 3]);
        assert_eq!(pid.current(), 0.0);
        assert_eq!(pid.previous(), 0.0);
    }

    #[test]
    fn init_keeps_history() {
        let mut pid = IncPid::new(1.0, 0.0, 0.0).with_target(10.0);
        pid.update(0.0);
        pid.init(2.0, 0.0, 0.0);
        assert_eq!(pid.errors(), [10.0, 0.0, 0.0]);
        assert_eq!(pid.update(5.0), -10.0);
    }
}
