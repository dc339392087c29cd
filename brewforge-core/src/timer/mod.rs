//! The brew countdown: a frame-driven stopwatch from zero to a technique's total time.
//!
//! Elapsed time is always recomputed from an absolute reference instant, so a
//! late or skipped frame never causes drift. Frames come from a [`Ticker`] and
//! time from a [`Clock`]; both have virtual implementations for tests.

pub mod builder;
pub mod clock;
pub mod engine;
pub mod state;
pub mod ticker;

pub use builder::TimerBuilder;
pub use clock::{Clock, SystemClock, VirtualClock};
pub use engine::CountdownTimer;
pub use state::TimerState;
pub use ticker::{FrameHandle, IntervalTicker, Ticker, VirtualTicker};
