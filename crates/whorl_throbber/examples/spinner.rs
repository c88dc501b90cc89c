//! Spinner Demo
//!
//! Drives the throbber scheduler with a hand-rolled frame pump and prints
//! the command stream recorded for the first few frames.
//!
//! Features demonstrated:
//! - Wiring a frame-request callback
//! - Starting on a container (the surface is created and tagged on demand)
//! - Inspecting frames through a shared RecordingSurface
//!
//! Run with: cargo run -p whorl_throbber --example spinner

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use whorl_core::{Element, RecordingSurface, Size, SurfaceCommand};
use whorl_throbber::{ThrobberScheduler, ThrobberVariant};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut scheduler = ThrobberScheduler::new();

    // A real host would schedule a vsync callback or timer here; this demo
    // pumps run_frame by hand below.
    scheduler.set_request_frame(|delay| {
        tracing::trace!("frame requested (delay hint {:?})", delay);
    });

    let root = Element::root();
    let panel = Element::container();
    root.append_child(&panel).expect("fresh tree");

    let backing = Rc::new(RefCell::new(RecordingSurface::new(Size::ZERO)));
    let canvas = Element::surface(backing.clone());
    panel.append_child(&canvas).expect("fresh tree");

    let handle = scheduler
        .start(&canvas, ThrobberVariant::Regular)
        .expect("surface targets always resolve");

    for frame in 1..=3u32 {
        std::thread::sleep(Duration::from_millis(16));
        scheduler.run_frame();

        let commands = backing.borrow_mut().take_commands();
        let bars = commands
            .iter()
            .filter(|c| matches!(c, SurfaceCommand::FillPath { .. }))
            .count();
        println!("frame {frame}: {} commands, {bars} bars", commands.len());
    }

    scheduler.stop(&handle);
    println!(
        "stopped; loop running: {}, surface attached: {}",
        scheduler.is_running(),
        canvas.is_attached()
    );
}
