//! Throbber scheduler
//!
//! Owns the registry of running spinners and the one frame loop they all
//! share. Handles join on `start`, leave on `stop` (or get reaped by the
//! liveness sweep once their surface falls out of the tree), and the loop
//! runs exactly while the registry is non-empty.
//!
//! The scheduler is an explicit context object: whatever subsystem owns the
//! UI lifecycle constructs one and passes it around. Nothing here is global.

use std::time::{Duration, Instant};

use whorl_core::{Element, Size};

use crate::handle::ThrobberHandle;
use crate::options::{ThrobberOptions, ThrobberVariant};
use crate::render;
use crate::schedule::{FrameLoop, FrameStrategy};
use crate::target::{self, Target};

/// Liveness sweep cadence, in frames
pub const SWEEP_INTERVAL: u64 = 50;

/// Creates the surface elements appended into container targets
pub type SurfaceFactory = Box<dyn FnMut() -> Element>;

/// Registry of running spinners plus their shared frame loop
///
/// All handles share one start time: a spinner started while the loop is
/// already running joins at the loop's current phase rather than restarting
/// the rotation.
pub struct ThrobberScheduler {
    /// Running handles, in start order
    active: Vec<ThrobberHandle>,
    /// Set when the loop starts, cleared when it goes idle
    animation_start: Option<Instant>,
    /// Frames delivered since the loop started
    tick_counter: u64,
    /// Options cloned for each start
    defaults: ThrobberOptions,
    /// Display density used to bind new surfaces
    scale_factor: f64,
    frame_loop: FrameLoop,
    surface_factory: SurfaceFactory,
}

impl ThrobberScheduler {
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            animation_start: None,
            tick_counter: 0,
            defaults: ThrobberOptions::default(),
            scale_factor: 1.0,
            frame_loop: FrameLoop::new(),
            surface_factory: Box::new(|| Element::recording_surface(Size::ZERO)),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Install the host callback invoked each time a frame is armed
    ///
    /// The callback receives a delay hint (zero under the per-frame
    /// strategy, ~16.7 ms under the timer fallback) and should call
    /// [`run_frame`](Self::run_frame) when the frame fires.
    pub fn set_request_frame<F>(&mut self, request: F)
    where
        F: FnMut(Duration) + 'static,
    {
        self.frame_loop.set_request(Box::new(request));
    }

    /// Replace the factory that creates surfaces for container targets
    pub fn set_surface_factory<F>(&mut self, factory: F)
    where
        F: FnMut() -> Element + 'static,
    {
        self.surface_factory = Box::new(factory);
    }

    /// Toggle between per-frame callbacks and the fixed ~60 Hz timer
    ///
    /// Affects only frames armed after the call.
    pub fn use_timer_fallback(&mut self, enabled: bool) {
        tracing::debug!("ThrobberScheduler: use_timer_fallback({})", enabled);
        self.frame_loop.set_strategy(if enabled {
            FrameStrategy::TimerFallback
        } else {
            FrameStrategy::PerFrame
        });
    }

    /// Current frame-request strategy
    pub fn frame_strategy(&self) -> FrameStrategy {
        self.frame_loop.strategy()
    }

    /// Set the display density applied when binding new surfaces
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Replace the options cloned for future starts
    ///
    /// Running spinners keep the options they were started with.
    pub fn set_defaults(&mut self, defaults: ThrobberOptions) {
        self.defaults = defaults;
    }

    pub fn defaults(&self) -> &ThrobberOptions {
        &self.defaults
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start a spinner on the given target
    ///
    /// Resolves the target to one drawable surface; returns `None` when
    /// nothing resolves. If that surface already hosts a running spinner the
    /// existing handle is returned instead of a duplicate. Otherwise the
    /// scheduler binds cloned options (variant geometry, display density,
    /// backing-store resize), registers a fresh handle, and wakes the loop
    /// if it was idle.
    pub fn start(
        &mut self,
        target: impl Into<Target>,
        variant: ThrobberVariant,
    ) -> Option<ThrobberHandle> {
        let target = target.into();
        let element = target::resolve(&target, &mut self.surface_factory)?;
        let backing = element.paint_surface()?;

        if let Some(existing) = self.active.iter().find(|handle| handle.uses(&element)) {
            return Some(existing.clone());
        }

        let mut options = variant.apply(&self.defaults);
        let scale = options.apply_density(self.scale_factor);
        backing.borrow_mut().resize(Size::square(options.canvas_size));

        let handle = ThrobberHandle::new(options, scale, element);
        self.active.push(handle.clone());
        tracing::debug!("ThrobberScheduler: started handle ({} active)", self.active.len());

        if self.animation_start.is_none() {
            self.animation_start = Some(Instant::now());
            self.frame_loop.arm();
            tracing::debug!("ThrobberScheduler: loop started");
        }
        Some(handle)
    }

    /// Stop a handle
    ///
    /// Safe to call repeatedly; once a handle is stopped, later calls are
    /// no-ops. Stopping the last running handle halts the loop immediately,
    /// and the handle's surface element is detached from its parent.
    pub fn stop(&mut self, handle: &ThrobberHandle) {
        let Some(active) = handle.take_active() else {
            return;
        };

        if let Some(index) = self.active.iter().rposition(|entry| entry == handle) {
            self.active.remove(index);
        }
        if self.active.is_empty() {
            self.halt_loop();
        }

        active.element.detach();
        tracing::debug!("ThrobberScheduler: stopped handle ({} active)", self.active.len());
    }

    /// Stop the most recently started spinner still running
    pub fn stop_last(&mut self) {
        if let Some(handle) = self.active.last().cloned() {
            self.stop(&handle);
        }
    }

    /// Stop every running spinner, most recent first
    pub fn stop_all(&mut self) {
        let handles: Vec<_> = self.active.iter().rev().cloned().collect();
        for handle in handles {
            self.stop(&handle);
        }
    }

    /// Number of currently running spinners
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether the shared frame loop is running
    pub fn is_running(&self) -> bool {
        self.animation_start.is_some()
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Deliver one frame from the host
    ///
    /// Ignored unless a frame is actually armed, so deliveries that were in
    /// flight when the loop halted do nothing. Every `SWEEP_INTERVAL`-th
    /// frame sweeps out handles whose surface left the tree. While handles
    /// remain, the next frame is armed before drawing so a slow redraw
    /// cannot throttle scheduling.
    pub fn run_frame(&mut self) {
        if !self.frame_loop.take_armed() {
            return;
        }
        self.tick_counter += 1;

        if !self.active.is_empty() && self.tick_counter % SWEEP_INTERVAL == 0 {
            self.sweep();
        }

        if self.active.is_empty() {
            self.halt_loop();
            return;
        }

        self.frame_loop.arm();

        let elapsed = self.animation_start.map(|start| start.elapsed()).unwrap_or_default();
        for handle in &self.active {
            handle.with_active(|active| render::draw(active, elapsed));
        }
        tracing::trace!(
            "ThrobberScheduler: frame {} ({} active)",
            self.tick_counter,
            self.active.len()
        );
    }

    /// Stop every handle whose surface is no longer reachable from a root
    ///
    /// Scans backward so removals keep the indices still to visit stable.
    fn sweep(&mut self) {
        for index in (0..self.active.len()).rev() {
            let Some(handle) = self.active.get(index).cloned() else {
                continue;
            };
            if !handle.is_attached() {
                tracing::debug!("ThrobberScheduler: sweeping detached handle");
                self.stop(&handle);
            }
        }
    }

    fn halt_loop(&mut self) {
        if self.animation_start.is_none() {
            return;
        }
        self.animation_start = None;
        self.tick_counter = 0;
        self.frame_loop.cancel();
        tracing::debug!("ThrobberScheduler: loop idle");
    }
}

impl Default for ThrobberScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::FRAME_INTERVAL;
    use crate::target::THROBBER_TAG;
    use std::cell::RefCell;
    use std::rc::Rc;
    use whorl_core::{PaintSurface, RecordingSurface, SurfaceCommand};

    fn recording_element() -> (Element, Rc<RefCell<RecordingSurface>>) {
        let backing = Rc::new(RefCell::new(RecordingSurface::new(Size::ZERO)));
        let element = Element::surface(backing.clone());
        (element, backing)
    }

    fn counting_scheduler() -> (ThrobberScheduler, Rc<RefCell<u32>>) {
        let requests = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&requests);
        let mut scheduler = ThrobberScheduler::new();
        scheduler.set_request_frame(move |_| *sink.borrow_mut() += 1);
        (scheduler, requests)
    }

    /// Commands recorded for one full frame of a `bars`-bar spinner
    fn frame_len(bars: usize) -> usize {
        3 + bars * 5 + 2
    }

    #[test]
    fn test_start_on_surface() {
        let (mut scheduler, requests) = counting_scheduler();
        let (element, _backing) = recording_element();

        let handle = scheduler.start(&element, ThrobberVariant::Regular).unwrap();

        assert!(handle.is_active());
        assert!(handle.uses(&element));
        assert!(element.has_tag(THROBBER_TAG));
        assert_eq!(scheduler.active_count(), 1);
        assert!(scheduler.is_running());
        assert_eq!(*requests.borrow(), 1);
    }

    #[test]
    fn test_restart_returns_existing_handle() {
        let (mut scheduler, requests) = counting_scheduler();
        let (element, _backing) = recording_element();

        let first = scheduler.start(&element, ThrobberVariant::Regular).unwrap();
        let second = scheduler.start(&element, ThrobberVariant::Regular).unwrap();

        assert_eq!(first, second);
        assert_eq!(scheduler.active_count(), 1);
        // The loop was already running, so no extra frame was armed
        assert_eq!(*requests.borrow(), 1);
    }

    #[test]
    fn test_start_on_container_creates_tagged_surface() {
        let mut scheduler = ThrobberScheduler::new();
        let root = Element::root();
        let panel = Element::container();
        root.append_child(&panel).unwrap();

        let handle = scheduler.start(&panel, ThrobberVariant::Regular).unwrap();
        let surface = handle.element().unwrap();

        assert!(surface.is_surface());
        assert!(surface.has_tag(THROBBER_TAG));
        assert_eq!(surface.parent(), Some(panel));
        assert!(handle.is_attached());
    }

    #[test]
    fn test_start_empty_collection_is_noop() {
        let (mut scheduler, requests) = counting_scheduler();

        assert!(scheduler.start(Vec::new(), ThrobberVariant::Regular).is_none());
        assert_eq!(scheduler.active_count(), 0);
        assert!(!scheduler.is_running());
        assert_eq!(*requests.borrow(), 0);
    }

    #[test]
    fn test_density_resizes_backing() {
        let mut scheduler = ThrobberScheduler::new();
        scheduler.set_scale_factor(2.0);

        let (element, backing) = recording_element();
        scheduler.start(&element, ThrobberVariant::Small).unwrap();

        // The small 20-unit surface doubles under a high-density display
        assert_eq!(backing.borrow().size(), Size::square(40.0));
    }

    #[test]
    fn test_stop_detaches_and_halts() {
        let (mut scheduler, _requests) = counting_scheduler();
        let root = Element::root();
        let panel = Element::container();
        root.append_child(&panel).unwrap();

        let handle = scheduler.start(&panel, ThrobberVariant::Regular).unwrap();
        let surface = handle.element().unwrap();
        assert!(scheduler.is_running());

        scheduler.stop(&handle);

        assert!(!handle.is_active());
        assert!(surface.parent().is_none());
        assert_eq!(panel.child_count(), 0);
        assert_eq!(scheduler.active_count(), 0);
        assert!(!scheduler.is_running());

        // A second stop is a silent no-op
        scheduler.stop(&handle);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_stop_last() {
        let mut scheduler = ThrobberScheduler::new();
        let (a, _) = recording_element();
        let (b, _) = recording_element();
        let (c, _) = recording_element();

        let first = scheduler.start(&a, ThrobberVariant::Regular).unwrap();
        let second = scheduler.start(&b, ThrobberVariant::Regular).unwrap();
        let third = scheduler.start(&c, ThrobberVariant::Regular).unwrap();

        scheduler.stop_last();

        assert!(first.is_active());
        assert!(second.is_active());
        assert!(!third.is_active());
        assert_eq!(scheduler.active_count(), 2);
    }

    #[test]
    fn test_stop_all_then_fresh_start() {
        let (mut scheduler, requests) = counting_scheduler();
        let (a, _) = recording_element();
        let (b, _) = recording_element();

        let first = scheduler.start(&a, ThrobberVariant::Regular).unwrap();
        let second = scheduler.start(&b, ThrobberVariant::Regular).unwrap();

        scheduler.stop_all();

        assert!(!first.is_active());
        assert!(!second.is_active());
        assert_eq!(scheduler.active_count(), 0);
        assert!(!scheduler.is_running());

        // Starting again behaves as if nothing ever ran
        let (c, _) = recording_element();
        let fresh = scheduler.start(&c, ThrobberVariant::Regular).unwrap();
        assert!(fresh.is_active());
        assert!(scheduler.is_running());
        assert_eq!(*requests.borrow(), 2);
    }

    #[test]
    fn test_late_frame_after_halt_is_ignored() {
        let (mut scheduler, requests) = counting_scheduler();
        let (element, backing) = recording_element();

        let handle = scheduler.start(&element, ThrobberVariant::Regular).unwrap();
        scheduler.stop(&handle);

        // The frame armed by start was still in flight when the loop
        // halted; its delivery must neither draw nor re-arm
        scheduler.run_frame();

        assert!(!scheduler.is_running());
        assert_eq!(*requests.borrow(), 1);
        assert!(backing.borrow().commands().is_empty());
    }

    #[test]
    fn test_run_frame_rearms_before_drawing() {
        let (element, backing) = recording_element();
        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&snapshots);
        let watched = Rc::clone(&backing);

        let mut scheduler = ThrobberScheduler::new();
        scheduler.set_request_frame(move |_| {
            sink.borrow_mut().push(watched.borrow().commands().len());
        });

        scheduler.start(&element, ThrobberVariant::Regular).unwrap();
        scheduler.run_frame();
        scheduler.run_frame();

        assert_eq!(backing.borrow().commands().len(), 2 * frame_len(12));
        // Each frame re-arms before it draws, so every request sees only
        // the streams of frames already finished
        assert_eq!(*snapshots.borrow(), vec![0, 0, frame_len(12)]);
    }

    #[test]
    fn test_sweep_reaps_detached_handle() {
        let (mut scheduler, requests) = counting_scheduler();
        let root = Element::root();
        let (element, _backing) = recording_element();
        root.append_child(&element).unwrap();

        let handle = scheduler.start(&element, ThrobberVariant::Regular).unwrap();
        element.detach();

        // An orphaned spinner keeps drawing until the sweep frame
        for _ in 0..SWEEP_INTERVAL - 1 {
            scheduler.run_frame();
        }
        assert!(handle.is_active());
        assert_eq!(scheduler.active_count(), 1);

        scheduler.run_frame();

        assert!(!handle.is_active());
        assert_eq!(scheduler.active_count(), 0);
        assert!(!scheduler.is_running());

        // With the loop halted, nothing further is armed
        let armed_so_far = *requests.borrow();
        scheduler.run_frame();
        assert_eq!(*requests.borrow(), armed_so_far);
    }

    #[test]
    fn test_sweep_reaps_every_detached_handle() {
        let (mut scheduler, _requests) = counting_scheduler();
        let root = Element::root();
        let (a, _) = recording_element();
        let (b, _) = recording_element();
        let (c, _) = recording_element();
        root.append_child(&a).unwrap();
        root.append_child(&b).unwrap();
        root.append_child(&c).unwrap();

        let first = scheduler.start(&a, ThrobberVariant::Regular).unwrap();
        let second = scheduler.start(&b, ThrobberVariant::Regular).unwrap();
        let third = scheduler.start(&c, ThrobberVariant::Regular).unwrap();

        a.detach();
        c.detach();

        for _ in 0..SWEEP_INTERVAL {
            scheduler.run_frame();
        }

        // One sweep removes both orphans, even as each stop shrinks the
        // registry under the scan, and spares the attached middle spinner
        assert!(!first.is_active());
        assert!(second.is_active());
        assert!(!third.is_active());
        assert_eq!(scheduler.active_count(), 1);
        assert!(scheduler.is_running());
    }

    #[test]
    fn test_sweep_spares_attached_handles() {
        let (mut scheduler, _requests) = counting_scheduler();
        let root = Element::root();
        let (element, _backing) = recording_element();
        root.append_child(&element).unwrap();

        let handle = scheduler.start(&element, ThrobberVariant::Regular).unwrap();

        for _ in 0..SWEEP_INTERVAL {
            scheduler.run_frame();
        }
        assert!(handle.is_active());
        assert!(scheduler.is_running());
    }

    #[test]
    fn test_timer_fallback_changes_hint() {
        let hints = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&hints);
        let mut scheduler = ThrobberScheduler::new();
        scheduler.set_request_frame(move |hint| sink.borrow_mut().push(hint));

        scheduler.use_timer_fallback(true);
        assert_eq!(scheduler.frame_strategy(), FrameStrategy::TimerFallback);

        let (element, _backing) = recording_element();
        scheduler.start(&element, ThrobberVariant::Regular).unwrap();
        scheduler.use_timer_fallback(false);
        scheduler.run_frame();

        assert_eq!(*hints.borrow(), vec![FRAME_INTERVAL, Duration::ZERO]);
    }

    #[test]
    fn test_defaults_flow_into_new_handles() {
        let (mut scheduler, _requests) = counting_scheduler();
        scheduler.set_defaults(ThrobberOptions {
            bars: 6,
            ..ThrobberOptions::default()
        });

        let (element, backing) = recording_element();
        scheduler.start(&element, ThrobberVariant::Regular).unwrap();
        scheduler.run_frame();

        assert_eq!(backing.borrow().commands().len(), frame_len(6));
    }

    #[test]
    fn test_started_handles_keep_cloned_options() {
        let (mut scheduler, _requests) = counting_scheduler();
        scheduler.set_scale_factor(2.0);

        let (element, backing) = recording_element();
        let handle = scheduler.start(&element, ThrobberVariant::Regular).unwrap();

        // Density doubling binds the handle's clone; the shared defaults
        // keep their size
        assert_eq!(backing.borrow().size(), Size::square(80.0));
        assert_eq!(scheduler.defaults().canvas_size, 40.0);

        // Replacing the defaults afterwards leaves the running spinner on
        // the options it started with
        scheduler.set_defaults(ThrobberOptions {
            bars: 6,
            ..ThrobberOptions::default()
        });
        scheduler.run_frame();

        assert!(handle.is_active());
        assert_eq!(backing.borrow().commands().len(), frame_len(12));
    }

    #[test]
    fn test_handles_share_loop_phase() {
        let (mut scheduler, _requests) = counting_scheduler();
        let (a, backing_a) = recording_element();
        let (b, backing_b) = recording_element();

        scheduler.start(&a, ThrobberVariant::Regular).unwrap();
        scheduler.start(&b, ThrobberVariant::Regular).unwrap();
        scheduler.run_frame();

        let lead_alpha = |backing: &Rc<RefCell<RecordingSurface>>| {
            backing.borrow().commands().iter().find_map(|c| match c {
                SurfaceCommand::FillPath { color, .. } => Some(color.a),
                _ => None,
            })
        };

        // One shared start time: both spinners draw at the same phase
        assert_eq!(lead_alpha(&backing_a), lead_alpha(&backing_b));
    }
}
