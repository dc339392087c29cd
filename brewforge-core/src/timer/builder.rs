use super::{
    clock::Clock,
    engine::{CompletionCallback, CountdownTimer, TickObserver},
    state::TimerState,
    ticker::Ticker,
};
use crate::error::BrewError;
use brewforge_schemas::method::BrewingTechnique;

/// A fluent builder for constructing a `CountdownTimer`.
///
/// The clock and ticker are fixed up front; observers, the completion
/// callback and auto-start are optional.
pub struct TimerBuilder<C: Clock, T: Ticker> {
    total: f64,
    clock: C,
    ticker: T,
    observers: Vec<TickObserver>,
    on_complete: Option<CompletionCallback>,
    auto_start: bool,
}

impl<C: Clock, T: Ticker> TimerBuilder<C, T> {
    /// Creates a builder for a countdown of `total_secs` seconds.
    pub fn new(total_secs: f64, clock: C, ticker: T) -> Self {
        Self {
            total: total_secs,
            clock,
            ticker,
            observers: Vec::new(),
            on_complete: None,
            auto_start: false,
        }
    }

    /// Creates a builder that runs for the technique's total brew time.
    pub fn for_technique(technique: &BrewingTechnique, clock: C, ticker: T) -> Self {
        Self::new(f64::from(technique.total_time), clock, ticker)
    }

    /// Adds an observer that receives the elapsed seconds on every frame.
    pub fn on_tick(mut self, observer: impl FnMut(f64) + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Sets the callback fired once when the countdown reaches its total.
    pub fn on_complete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Consumes the builder and returns a timer, already running if auto-start was set.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::InvalidDuration` if the total time is not a positive number.
    pub fn build(self) -> Result<CountdownTimer<C, T>, BrewError> {
        if !(self.total.is_finite() && self.total > 0.0) {
            return Err(BrewError::InvalidDuration(self.total));
        }

        let mut timer = CountdownTimer {
            total: self.total,
            clock: self.clock,
            ticker: self.ticker,
            state: TimerState::Idle,
            reference: None,
            saved: 0.0,
            elapsed: 0.0,
            pending: None,
            observers: self.observers,
            on_complete: self.on_complete,
        };
        if self.auto_start {
            timer.start();
        }
        Ok(timer)
    }
}
