use log::{debug, trace, warn};
use num_traits::{float::FloatConst, Float};

use super::{gains::PidGains, FeedbackController, Signal};
use crate::utils::math::{exceeds_single_wrap, fold_angle_error};

/// Error side of a positional controller.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ErrorState<T> {
    current: T,
    previous: T,
    sum: T,   // Running integral, never clamped
    delta: T, // current - previous
}

impl<T: Float> ErrorState<T> {
    fn new() -> Self {
        Self {
            current: T::zero(),
            previous: T::zero(),
            sum: T::zero(),
            delta: T::zero(),
        }
    }
}

/// Positional-form PID: `kp·e + ki·Σe + kd·Δe`.
///
/// The error sum grows without bound under a sustained offset. Callers that
/// need anti-windup or output limits apply them to the returned value.
///
/// Non-finite inputs or gains propagate into the sum and poison every later
/// output until [`reset`](Self::reset) is called. They are not filtered out.
///
/// # Example
/// ```
/// use lampid::Pid;
///
/// let mut pid = Pid::new(0.0, 1.0, 0.0);
/// pid.set_target(1.0);
/// assert_eq!(pid.update(0.0), 1.0);
/// assert_eq!(pid.update(0.0), 2.0);
/// // A zero error freezes the sum, it does not decay.
/// assert_eq!(pid.update(1.0), 2.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PositionalPid<T: Float = f32> {
    gains: PidGains<T>,
    signal: Signal<T>,
    error: ErrorState<T>,
}

/// Single precision positional PID.
pub type Pid = PositionalPid<f32>;

impl<T: Float + FloatConst> PositionalPid<T> {
    pub fn new(kp: T, ki: T, kd: T) -> Self {
        Self::from_gains(PidGains::new(kp, ki, kd))
    }

    pub fn from_gains(gains: PidGains<T>) -> Self {
        PositionalPid {
            gains,
            signal: Signal::new(),
            error: ErrorState::new(),
        }
    }

    /// Sets the initial target while constructing.
    pub fn with_target(mut self, target: T) -> Self {
        self.signal.target = target;
        self
    }

    /// Replaces the gains.
    ///
    /// The error sum and history are left as they are, so a re-tune mid-run
    /// keeps the integral built up under the old gains. Call
    /// [`reset`](Self::reset) too if that is not wanted.
    pub fn init(&mut self, kp: T, ki: T, kd: T) {
        self.gains = PidGains::new(kp, ki, kd);
        debug!("positional pid gains set to {:?}", self.gains_f64());
    }

    pub fn set_target(&mut self, target: T) {
        self.signal.target = target;
        debug!("positional pid target set to {:?}", target.to_f64());
    }

    /// Clears measurements and error history. Gains and target are kept.
    pub fn reset(&mut self) {
        self.signal.clear();
        self.error = ErrorState::new();
        debug!("positional pid reset");
    }

    pub fn update(&mut self, input: T) -> T {
        self.step(input, |error| error)
    }

    /// Like [`update`](Self::update), with the error treated as an angle in
    /// radians and folded onto the shortest arc.
    ///
    /// Only one wrap is undone. An error of `2π` or more is used as is.
    pub fn update_angle(&mut self, input: T) -> T {
        self.step(input, |error| {
            if exceeds_single_wrap(error) {
                warn!(
                    "angle error {:?} is beyond a single turn, left unwrapped",
                    error.to_f64()
                );
            }
            fold_angle_error(error)
        })
    }

    fn step(&mut self, input: T, correct: impl FnOnce(T) -> T) -> T {
        if !input.is_finite() {
            warn!("non-finite pid input {:?}", input.to_f64());
        }
        self.signal.current = input;

        let error = correct(self.signal.target - self.signal.current);
        self.error.current = error;
        self.error.sum = self.error.sum + error;
        self.error.delta = error - self.error.previous;
        self.error.previous = error;

        self.signal.previous = self.signal.current;

        let output = self.gains.kp * self.error.current
            + self.gains.ki * self.error.sum
            + self.gains.kd * self.error.delta;
        trace!(
            "pid error={:?} sum={:?} output={:?}",
            error.to_f64(),
            self.error.sum.to_f64(),
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

    /// The last measured input.
    pub fn current(&self) -> T {
        self.signal.current
    }

    /// The measured input before the last update. Equal to
    /// [`current`](Self::current) once an update has finished.
    pub fn previous(&self) -> T {
        self.signal.previous
    }

    pub fn error(&self) -> T {
        self.error.current
    }

    pub fn previous_error(&self) -> T {
        self.error.previous
    }

    pub fn error_sum(&self) -> T {
        self.error.sum
    }

    pub fn error_delta(&self) -> T {
        self.error.delta
    }

    fn gains_f64(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (
            self.gains.kp.to_f64(),
            self.gains.ki.to_f64(),
            self.gains.kd.to_f64(),
        )
    }
}

impl<T: Float + FloatConst> FeedbackController<T> for PositionalPid<T> {
    fn update(&mut self, input: T) -> T {
        PositionalPid::update(self, input)
    }

    fn reset(&mut self) {
        PositionalPid::reset(self)
    }

    fn set_target(&mut self, target: T) {
        PositionalPid::set_target(self, target)
    }

    fn target(&self) -> T {
        PositionalPid::target(self)
    }

    fn init(&mut self, kp: T, ki: T, kd: T) {
        PositionalPid::init(self, kp, ki, kd)
    }

    fn gains(&self) -> PidGains<T> {
        PositionalPid::gains(self)
    }
}

/// Positional PID for angles in radians.
///
/// Same state and contract as [`PositionalPid`], but every update goes
/// through [`PositionalPid::update_angle`].
///
/// # Example
/// ```
/// use lampid::AnglePid;
///
/// let mut heading = AnglePid::new(1.0, 0.0, 0.0);
/// heading.set_target(0.0);
/// // 3.2 rad is past π, so the short way round is positive.
/// let output = heading.update(3.2);
/// assert!((output - (core::f32::consts::TAU - 3.2)).abs() < 1e-6);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AnglePositionalPid<T: Float = f32> {
    inner: PositionalPid<T>,
}

/// Single precision angle-aware PID.
pub type AnglePid = AnglePositionalPid<f32>;

impl<T: Float + FloatConst> AnglePositionalPid<T> {
    pub fn new(kp: T, ki: T, kd: T) -> Self {
        Self {
            inner: PositionalPid::new(kp, ki, kd),
        }
    }

    pub fn from_gains(gains: PidGains<T>) -> Self {
        Self {
            inner: PositionalPid::from_gains(gains),
        }
    }

    pub fn with_target(self, target: T) -> Self {
        Self {
            inner: self.inner.with_target(target),
        }
    }

    /// Replaces the gains without touching accumulated state.
    pub fn init(&mut self, kp: T, ki: T, kd: T) {
        self.inner.init(kp, ki, kd);
    }

    pub fn set_target(&mut self, target: T) {
        self.inner.set_target(target);
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn update(&mut self, input: T) -> T {
        self.inner.update_angle(input)
    }

    /// Read access to the underlying positional state.
    pub fn state(&self) -> &PositionalPid<T> {
        &self.inner
    }

    pub fn gains(&self) -> PidGains<T> {
        self.inner.gains()
    }

    pub fn target(&self) -> T {
        self.inner.target()
    }

    pub fn error(&self) -> T {
        self.inner.error()
    }

    pub fn error_sum(&self) -> T {
        self.inner.error_sum()
    }
}

impl<T: Float + FloatConst> From<PositionalPid<T>> for AnglePositionalPid<T> {
    fn from(inner: PositionalPid<T>) -> Self {
        Self { inner }
    }
}

impl<T: Float + FloatConst> FeedbackController<T> for AnglePositionalPid<T> {
    fn update(&mut self, input: T) -> T {
        AnglePositionalPid::update(self, input)
    }

    fn reset(&mut self) {
        AnglePositionalPid::reset(self)
    }

    fn set_target(&mut self, target: T) {
        AnglePositionalPid::set_target(self, target)
    }

    fn target(&self) -> T {
        AnglePositionalPid::target(self)
    }

    fn init(&mut self, kp: T, ki: T, kd: T) {
        AnglePositionalPid::init(self, kp, ki, kd)
    }

    fn gains(&self) -> PidGains<T> {
        AnglePositionalPid::gains(self)
    }
}
