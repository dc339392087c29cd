use super::{
    clock::Clock,
    state::TimerState,
    ticker::{FrameHandle, Ticker},
};
use std::time::Duration;
use tracing::{debug, info, trace};

pub type TickObserver = Box<dyn FnMut(f64)>;
pub type CompletionCallback = Box<dyn FnMut()>;

pub struct CountdownTimer<C: Clock, T: Ticker> {
    pub(super) total: f64,
    pub(super) clock: C,
    pub(super) ticker: T,
    pub(super) state: TimerState,
    pub(super) reference: Option<Duration>,
    pub(super) saved: f64,
    pub(super) elapsed: f64,
    pub(super) pending: Option<FrameHandle>,
    pub(super) observers: Vec<TickObserver>,
    pub(super) on_complete: Option<CompletionCallback>,
}

impl<C: Clock, T: Ticker> CountdownTimer<C, T> {
    /// Idle -> Running. Returns false from any other state.
    pub fn start(&mut self) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        debug!(total = self.total, "timer started");
        self.run();
        true
    }

    /// Running -> Paused, keeping the elapsed time for a later resume.
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.saved = self.current_elapsed().min(self.total);
        self.elapsed = self.saved;
        self.reference = None;
        self.cancel_pending();
        self.state = TimerState::Paused;
        debug!(elapsed = self.saved, "timer paused");
        true
    }

    /// Paused -> Running from the saved offset.
    pub fn resume(&mut self) -> bool {
        if self.state != TimerState::Paused {
            return false;
        }
        debug!(elapsed = self.saved, "timer resumed");
        self.run();
        true
    }

    /// Play/pause button semantics. A completed timer has to be reset first.
    pub fn toggle(&mut self) -> bool {
        match self.state {
            TimerState::Idle => self.start(),
            TimerState::Running => self.pause(),
            TimerState::Paused => self.resume(),
            TimerState::Completed => false,
        }
    }

    /// Back to Idle from any state, reporting zero to observers.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.reference = None;
        self.saved = 0.0;
        self.elapsed = 0.0;
        self.state = TimerState::Idle;
        debug!("timer reset");
        self.report(0.0);
    }

    /// Handles one frame from the ticker. Frames that were cancelled or belong
    /// to an earlier run are ignored and return false.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.state != TimerState::Running || self.pending != Some(handle) {
            trace!(?handle, "ignoring stale frame");
            return false;
        }
        self.pending = None;

        let elapsed = self.current_elapsed();
        if elapsed >= self.total {
            self.complete();
        } else {
            self.elapsed = elapsed;
            self.report(elapsed);
            self.pending = Some(self.ticker.request_frame());
        }
        true
    }

    /// Waits for the next frame and dispatches it. Returns false once nothing is scheduled.
    pub fn pump(&mut self) -> bool {
        match self.ticker.next_frame() {
            Some(handle) => {
                self.on_frame(handle);
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Last elapsed value reported to observers, in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Percent of the total time elapsed, capped at 100.
    pub fn progress(&self) -> f64 {
        (self.elapsed / self.total * 100.0).min(100.0)
    }

    fn run(&mut self) {
        self.reference = Some(self.clock.now());
        self.state = TimerState::Running;
        self.pending = Some(self.ticker.request_frame());
    }

    fn current_elapsed(&self) -> f64 {
        match self.reference {
            Some(reference) => self.clock.now().saturating_sub(reference).as_secs_f64() + self.saved,
            None => self.saved,
        }
    }

    fn complete(&mut self) {
        self.elapsed = self.total;
        self.saved = self.total;
        self.reference = None;
        self.state = TimerState::Completed;
        self.report(self.total);
        info!(total = self.total, "brew timer complete");
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }

    fn report(&mut self, elapsed: f64) {
        for observer in &mut self.observers {
            observer(elapsed);
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.ticker.cancel_frame(handle);
        }
    }
}

impl<C: Clock, T: Ticker> Drop for CountdownTimer<C, T> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{TimerBuilder, VirtualClock, VirtualTicker};
    use std::{cell::Cell, cell::RefCell, rc::Rc};

    struct Harness {
        clock: VirtualClock,
        ticker: VirtualTicker,
        reports: Rc<RefCell<Vec<f64>>>,
        completions: Rc<Cell<u32>>,
    }

    fn timer(total: f64) -> (CountdownTimer<VirtualClock, VirtualTicker>, Harness) {
        let harness = Harness {
            clock: VirtualClock::new(),
            ticker: VirtualTicker::new(),
            reports: Rc::new(RefCell::new(Vec::new())),
            completions: Rc::new(Cell::new(0)),
        };
        let reports = Rc::clone(&harness.reports);
        let completions = Rc::clone(&harness.completions);
        let timer = TimerBuilder::new(total, harness.clock.clone(), harness.ticker.clone())
            .on_tick(move |t| reports.borrow_mut().push(t))
            .on_complete(move || completions.set(completions.get() + 1))
            .build()
            .unwrap();
        (timer, harness)
    }

    #[test]
    fn completes_exactly_once_at_total_time() {
        let (mut timer, h) = timer(210.0);
        assert!(timer.start());
        h.clock.advance_secs(210.0);
        assert!(timer.pump());

        assert_eq!(timer.state(), TimerState::Completed);
        assert_eq!(*h.reports.borrow(), vec![210.0]);
        assert_eq!(h.completions.get(), 1);

        h.clock.advance_secs(60.0);
        assert!(!timer.pump());
        assert!(!timer.start());
        assert_eq!(h.completions.get(), 1);
        assert_eq!(h.ticker.pending_frames(), 0);
    }

    #[test]
    fn overshooting_frames_clamp_to_total() {
        let (mut timer, h) = timer(30.0);
        timer.start();
        timer.pump();
        h.clock.advance_secs(12.0);
        timer.pump();
        h.clock.advance_secs(45.0);
        timer.pump();

        assert_eq!(*h.reports.borrow(), vec![0.0, 12.0, 30.0]);
        assert_eq!(timer.elapsed(), 30.0);
        assert_eq!(timer.progress(), 100.0);
    }

    #[test]
    fn missed_frames_do_not_drift() {
        let (mut timer, h) = timer(100.0);
        timer.start();
        h.clock.advance_secs(10.0);
        h.clock.advance_secs(15.0);
        h.clock.advance_secs(20.0);
        timer.pump();
        assert_eq!(timer.elapsed(), 45.0);
    }

    #[test]
    fn pause_freezes_elapsed_until_resume() {
        let (mut timer, h) = timer(100.0);
        timer.start();
        h.clock.advance_secs(30.0);
        timer.pump();
        assert!(timer.pause());
        assert!(!timer.state().is_running());
        assert_eq!(h.ticker.pending_frames(), 0);

        h.clock.advance_secs(100.0);
        assert!(!timer.pump());
        assert_eq!(timer.elapsed(), 30.0);
        assert_eq!(timer.state(), TimerState::Paused);

        assert!(timer.toggle());
        assert!(timer.state().is_running());
        h.clock.advance_secs(10.0);
        timer.pump();
        assert_eq!(timer.elapsed(), 40.0);
        assert_eq!(h.completions.get(), 0);
    }

    #[test]
    fn reset_reports_zero_and_cancels_the_pending_frame() {
        let (mut timer, h) = timer(100.0);
        timer.start();
        h.clock.advance_secs(5.0);
        timer.pump();
        timer.reset();

        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(h.reports.borrow().last(), Some(&0.0));
        assert_eq!(h.ticker.pending_frames(), 0);

        h.clock.advance_secs(3.0);
        assert!(timer.start());
        h.clock.advance_secs(2.0);
        timer.pump();
        assert_eq!(timer.elapsed(), 2.0);
    }

    #[test]
    fn stale_frames_are_ignored() {
        let (mut timer, h) = timer(100.0);
        timer.start();
        let stale = h.ticker.pending_handles()[0];
        timer.pause();
        timer.resume();
        h.clock.advance_secs(1.0);
        assert!(!timer.on_frame(stale));
        assert!(h.reports.borrow().is_empty());
    }

    #[test]
    fn dropping_a_running_timer_cancels_its_frame() {
        let (mut timer, h) = timer(100.0);
        timer.start();
        assert_eq!(h.ticker.pending_frames(), 1);
        drop(timer);
        assert_eq!(h.ticker.pending_frames(), 0);
    }
}
