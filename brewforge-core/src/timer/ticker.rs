use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
    thread,
    time::{Duration, Instant},
};

/// Identifies one requested frame so it can be cancelled before it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// A cancellable per-frame scheduler.
///
/// Each request yields exactly one frame. Consumers that want a steady stream
/// request the next frame from inside the current one.
pub trait Ticker {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Waits until the oldest pending frame is due and hands it out.
    /// `None` means nothing is scheduled.
    fn next_frame(&mut self) -> Option<FrameHandle>;
}

#[derive(Debug, Default)]
struct FrameQueue {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
}

impl FrameQueue {
    fn request(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push_back(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}

/// Delivers frames at a fixed cadence on the current thread.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    queue: FrameQueue,
    last_frame: Option<Instant>,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            queue: FrameQueue::default(),
            last_frame: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Ticker for IntervalTicker {
    fn request_frame(&mut self) -> FrameHandle {
        self.queue.request()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.cancel(handle);
    }

    fn next_frame(&mut self) -> Option<FrameHandle> {
        let handle = self.queue.pending.pop_front()?;
        if let Some(last) = self.last_frame {
            let due = last + self.period;
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }
        }
        self.last_frame = Some(Instant::now());
        Some(handle)
    }
}

/// Hands out frames immediately. Clones share one queue, so a test can keep a
/// clone to inspect what the timer left scheduled.
#[derive(Debug, Clone, Default)]
pub struct VirtualTicker {
    queue: Rc<RefCell<FrameQueue>>,
}

impl VirtualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_frames(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    pub fn pending_handles(&self) -> Vec<FrameHandle> {
        self.queue.borrow().pending.iter().copied().collect()
    }
}

impl Ticker for VirtualTicker {
    fn request_frame(&mut self) -> FrameHandle {
        self.queue.borrow_mut().request()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.borrow_mut().cancel(handle);
    }

    fn next_frame(&mut self) -> Option<FrameHandle> {
        self.queue.borrow_mut().pending.pop_front()
    }
}
