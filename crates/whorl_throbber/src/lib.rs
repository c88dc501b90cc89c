//! Whorl Throbber
//!
//! A canvas-style loading spinner ("throbber") for element trees built on
//! [`whorl_core`]: a registry of running spinner handles, one shared frame
//! loop driving them, and a renderer producing the classic rotating-bar
//! fade.
//!
//! - **Scheduler**: explicit context object owning the registry and the
//!   frame loop; the loop runs exactly while spinners exist
//! - **Handles**: cheap shared references with one-way, idempotent stop
//! - **Targets**: start on a surface directly, on a container (a tagged
//!   surface is reused or created on demand), or on the first element of a
//!   collection
//! - **Liveness**: every [`SWEEP_INTERVAL`] frames, spinners whose surface
//!   fell out of the tree are reaped automatically
//!
//! # Example
//!
//! ```rust
//! use whorl_core::Element;
//! use whorl_throbber::{ThrobberScheduler, ThrobberVariant};
//!
//! let mut scheduler = ThrobberScheduler::new();
//! scheduler.set_request_frame(|_delay| {
//!     // hand off to the host's frame timer
//! });
//!
//! let root = Element::root();
//! let handle = scheduler.start(&root, ThrobberVariant::Regular).unwrap();
//! assert!(handle.is_active());
//!
//! // the host delivers each armed frame back to the scheduler
//! scheduler.run_frame();
//!
//! scheduler.stop(&handle);
//! assert!(!scheduler.is_running());
//! ```

pub mod handle;
pub mod options;
mod render;
pub mod schedule;
pub mod scheduler;
pub mod target;

pub use handle::ThrobberHandle;
pub use options::{ThrobberOptions, ThrobberVariant};
pub use schedule::{FrameStrategy, RequestFrame};
pub use scheduler::{SurfaceFactory, ThrobberScheduler, SWEEP_INTERVAL};
pub use target::{Target, THROBBER_TAG};
