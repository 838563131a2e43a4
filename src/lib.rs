//! Discrete-time PID controllers for embedded motion and attitude loops.
//!
//! Three controllers are provided, each owning its own state:
//! - [`PositionalPid`]: `kp·e + ki·Σe + kd·Δe`.
//! - [`AnglePositionalPid`]: the same, with the error folded onto the shortest arc of a
//!   circle of circumference `2π` (radians).
//! - [`IncrementalPid`]: outputs a command *delta* computed from the last three
//!   errors. The caller accumulates it.
//!
//! None of them clamp the integral, filter the derivative or saturate the
//! output. Those are left to the caller.
//!
//! ```
//! use lampid::Pid;
//!
//! let mut pid = Pid::new(1.0, 0.0, 0.0);
//! pid.set_target(10.0);
//! assert_eq!(pid.update(0.0), 10.0);
//! assert_eq!(pid.update(5.0), 5.0);
//! ```
#![no_std]
extern crate alloc;

#[macro_use]
pub mod controllers;

pub mod utils;

pub use controllers::{
    gains::{GainsError, PidGains, Term},
    incremental::{IncPid, IncrementalPid},
    pid::{AnglePid, AnglePositionalPid, Pid, PositionalPid},
    FeedbackController,
};
