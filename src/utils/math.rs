use num_traits::{float::FloatConst, Float};

/// Folds an angular error (radians) onto the shortest signed arc.
///
/// Only a single wrap is undone: errors with `π < |error| < 2π` are shifted by
/// `2π` toward zero. Anything else, including `|error| >= 2π`, is returned
/// unchanged.
pub fn fold_angle_error<T: Float + FloatConst>(error: T) -> T {
    let magnitude = error.abs();
    if magnitude > T::PI() && magnitude < T::TAU() {
        if error > T::zero() {
            return error - T::TAU();
        } else if error < T::zero() {
            return error + T::TAU();
        }
    }
    error
}

/// Whether `error` lies outside the range [`fold_angle_error`] can correct.
pub fn exceeds_single_wrap<T: Float + FloatConst>(error: T) -> bool {
    error.abs() >= T::TAU()
}
