use num_traits::{float::FloatConst, Float};

use self::gains::PidGains;

#[macro_use]
pub mod gains;
pub mod incremental;
pub mod pid;

dyn_clone::clone_trait_object!(<T> FeedbackController<T> where T: Float + FloatConst);

/// The shared capability of every controller in this crate.
///
/// Lets a control loop swap algorithms at runtime through a
/// `Box<dyn FeedbackController<T>>`.
pub trait FeedbackController<T: Float + FloatConst>: dyn_clone::DynClone {
    /// Runs one control tick with the measured value and returns the output.
    fn update(&mut self, input: T) -> T;

    /// Clears accumulated state. Gains and target are kept.
    fn reset(&mut self);

    fn set_target(&mut self, target: T);

    fn target(&self) -> T;

    /// Replaces the gains. Accumulated state is kept, call [`reset`] as well
    /// to start from a clean slate.
    ///
    /// [`reset`]: FeedbackController::reset
    fn init(&mut self, kp: T, ki: T, kd: T);

    fn gains(&self) -> PidGains<T>;

    fn set_gains(&mut self, gains: PidGains<T>) {
        self.init(gains.kp, gains.ki, gains.kd);
    }
}

/// Signal side of a controller: the last measurement, the one before, and
/// the set-point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Signal<T> {
    pub current: T,
    pub previous: T,
    pub target: T,
}

impl<T: Float> Signal<T> {
    pub fn new() -> Self {
        Self {
            current: T::zero(),
            previous: T::zero(),
            target: T::zero(),
        }
    }

    /// Zeroes the measurements. The target survives.
    pub fn clear(&mut self) {
        self.current = T::zero();
        self.previous = T::zero();
    }
}
