//! Frame scheduling
//!
//! The shared loop never owns a thread: it repeatedly asks the host for one
//! more frame and the host calls back into the scheduler when that frame
//! fires. Arming passes the host a delay hint chosen by the active strategy;
//! cancellation is immediate, and a request already in flight when the loop
//! is cancelled gets ignored on delivery.

use std::time::Duration;

/// Fixed-timer frame interval (~60 Hz)
pub(crate) const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// How the next frame is requested from the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameStrategy {
    /// Ride the host's per-frame (vsync-aligned) callback
    #[default]
    PerFrame,
    /// Fixed ~60 Hz timer, for hosts without a frame callback
    TimerFallback,
}

impl FrameStrategy {
    /// Delay hint passed to the host when arming a frame
    pub fn delay_hint(self) -> Duration {
        match self {
            FrameStrategy::PerFrame => Duration::ZERO,
            FrameStrategy::TimerFallback => FRAME_INTERVAL,
        }
    }
}

/// Callback the host installs to receive frame requests
pub type RequestFrame = Box<dyn FnMut(Duration)>;

/// One-shot frame requests, re-armed each frame while the loop runs
///
/// `armed` gates delivery: `run_frame` consumes it, so a delivery after
/// `cancel` finds the flag down and does nothing.
pub(crate) struct FrameLoop {
    strategy: FrameStrategy,
    request: Option<RequestFrame>,
    armed: bool,
}

impl FrameLoop {
    pub(crate) fn new() -> Self {
        Self {
            strategy: FrameStrategy::default(),
            request: None,
            armed: false,
        }
    }

    pub(crate) fn strategy(&self) -> FrameStrategy {
        self.strategy
    }

    pub(crate) fn set_strategy(&mut self, strategy: FrameStrategy) {
        self.strategy = strategy;
    }

    pub(crate) fn set_request(&mut self, request: RequestFrame) {
        self.request = Some(request);
    }

    /// Ask the host for the next frame
    pub(crate) fn arm(&mut self) {
        self.armed = true;
        let hint = self.strategy.delay_hint();
        if let Some(request) = self.request.as_mut() {
            request(hint);
        }
    }

    /// Drop the armed state; a request already in flight is ignored on
    /// delivery
    pub(crate) fn cancel(&mut self) {
        self.armed = false;
    }

    /// Consume the armed flag at delivery time
    pub(crate) fn take_armed(&mut self) -> bool {
        std::mem::replace(&mut self.armed, false)
    }
}
