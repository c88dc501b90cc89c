//! Whorl Core Primitives
//!
//! This crate provides the host-environment primitives shared by the Whorl
//! widget set:
//!
//! - **Geometry**: 2D points and sizes
//! - **Paint**: colors, affine transforms, vector paths, and the
//!   `PaintSurface` drawing seam with a command-recording implementation
//! - **Element Tree**: retained display tree with roots, containers, tagged
//!   drawable surfaces, and attachment queries
//!
//! # Example
//!
//! ```rust
//! use whorl_core::{Element, PaintSurface, Size};
//!
//! let root = Element::root();
//! let canvas = Element::recording_surface(Size::square(40.0));
//! root.append_child(&canvas).unwrap();
//! assert!(canvas.is_attached());
//!
//! // Widgets draw through the shared paint backing
//! let backing = canvas.paint_surface().unwrap();
//! backing.borrow_mut().clear();
//! ```

pub mod error;
pub mod geometry;
pub mod paint;
pub mod scene;

pub use error::{Result, SceneError};
pub use geometry::{Point, Size};
pub use paint::{
    Affine2D, Color, PaintSurface, Path, PathCommand, RecordingSurface, SurfaceCommand,
};
pub use scene::{Element, ElementKind, WeakElement};
