use core::fmt;

use bon::Builder;
use num_traits::Float;
use thiserror::Error;

/// Tuning constants of a PID controller.
///
/// # Example
/// ```
/// use lampid::PidGains;
///
/// let gains = PidGains::builder().kp(1.5f32).kd(0.2).build();
/// assert_eq!(gains.ki, 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Builder)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PidGains<T: Float> {
    /// Proportional gain.
    #[builder(default = T::zero())]
    pub kp: T,
    /// Integral gain.
    #[builder(default = T::zero())]
    pub ki: T,
    /// Derivative gain.
    #[builder(default = T::zero())]
    pub kd: T,
}

/// One of the three PID terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Term {
    Proportional,
    Integral,
    Derivative,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Term::Proportional => "kp",
            Term::Integral => "ki",
            Term::Derivative => "kd",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GainsError {
    #[error("{term} must be finite, got {value}")]
    NonFinite { term: Term, value: f64 },
}

impl<T: Float> PidGains<T> {
    pub fn new(kp: T, ki: T, kd: T) -> Self {
        Self { kp, ki, kd }
    }

    /// Builds gains, rejecting NaN and infinities.
    ///
    /// The controllers accept any gains; this is for loading tuning from an
    /// untrusted source before it reaches a loop.
    pub fn try_new(kp: T, ki: T, kd: T) -> Result<Self, GainsError> {
        check(Term::Proportional, kp)?;
        check(Term::Integral, ki)?;
        check(Term::Derivative, kd)?;
        Ok(Self { kp, ki, kd })
    }

    /// Re-validates gains, e.g. after deserializing them.
    pub fn validate(self) -> Result<Self, GainsError> {
        Self::try_new(self.kp, self.ki, self.kd)
    }
}

fn check<T: Float>(term: Term, value: T) -> Result<(), GainsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GainsError::NonFinite {
            term,
            value: value.to_f64().unwrap_or(f64::NAN),
        })
    }
}

/// Builds a [`PidGains`] from named terms. Missing terms are zero.
///
/// # Example
/// ```
/// let gains = lampid::pid_gains!(kp: 2.0f32, kd: 0.5);
/// assert_eq!(gains.ki, 0.0);
/// ```
#[macro_export]
macro_rules! pid_gains {
    (
        $($key:ident : $value:expr),* $(,)?
    ) => {{
        #[allow(unused_mut)]
        let mut gains = $crate::controllers::gains::PidGains::default();
        $(gains.$key = $value;)*
        gains
    }};
}
pub use pid_gains;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_accepts_finite_gains() {
        let gains = PidGains::try_new(1.0f32, 0.5, -0.25).unwrap();
        assert_eq!(gains, PidGains::new(1.0, 0.5, -0.25));
    }

    #[test]
    fn try_new_names_the_bad_term() {
        let err = PidGains::try_new(1.0f32, f32::NAN, 0.0).unwrap_err();
        assert!(matches!(
            err,
            GainsError::NonFinite {
                term: Term::Integral,
                ..
            }
        ));

        let err = PidGains::try_new(1.0f32, 0.0, f32::INFINITY).unwrap_err();
        assert_eq!(
            err,
            GainsError::NonFinite {
                term: Term::Derivative,
                value: f64::INFINITY
            }
        );
    }

    #[test]
    fn validate_checks_existing_record() {
        let gains = PidGains {
            kp: f32::NEG_INFINITY,
            ki: 0.0,
            kd: 0.0,
        };
        assert!(gains.validate().is_err());
        assert!(PidGains::new(3.0f64, 0.0, 1.0).validate().is_ok());
    }

    #[test]
    fn builder_defaults_to_zero() {
        let gains = PidGains::builder().ki(0.3f32).build();
        assert_eq!(gains, PidGains::new(0.0, 0.3, 0.0));
    }

    #[test]
    fn macro_fills_named_terms() {
        let gains: PidGains<f32> = pid_gains!(ki: 0.1, kd: 2.0);
        assert_eq!(gains, PidGains::new(0.0, 0.1, 2.0));

        let empty: PidGains<f32> = pid_gains!();
        assert_eq!(empty, PidGains::default());
    }
}
