//! Animation core: state, timers, typing state machine, and burst effect.
//!
//! Everything in here is synchronous and clock-free: operations take the
//! current time as a parameter, so the whole machine can be driven
//! deterministically from tests. The async event loop is the only place
//! that reads a real clock.

mod burst;
mod machine;
mod scheduler;
mod state;
mod timings;

pub use burst::{opacity_at, phase_at, scale_at, BurstPhase};
pub use machine::Animator;
pub use scheduler::{Scheduler, Timer};
pub use state::{AnimatorState, BurstState, Pose, PositionEvent};
pub use timings::Timings;
