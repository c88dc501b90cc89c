//! Paint Surface - 2D Drawing Abstraction
//!
//! The `PaintSurface` trait is the seam between widgets and whatever actually
//! rasterizes them. A surface is a resizable square of pixels with a transform
//! stack and path filling; widgets draw by pushing transforms and filling
//! vector paths, and the host decides what a surface is backed by.
//!
//! `RecordingSurface` is the stock implementation: it records every call into
//! a replayable command stream, which keeps widget rendering testable without
//! a rasterizer and lets hosts replay frames onto their own canvas.
//!
//! # Example
//!
//! ```rust
//! use whorl_core::{Affine2D, Color, Path, PaintSurface, RecordingSurface, Size};
//!
//! let mut surface = RecordingSurface::new(Size::new(40.0, 40.0));
//! surface.clear();
//! surface.push_transform(Affine2D::translation(20.0, 20.0));
//! surface.fill_path(&Path::new().move_to(0.0, 0.0).line_to(10.0, 0.0), Color::BLACK);
//! surface.pop_transform();
//!
//! assert_eq!(surface.commands().len(), 4);
//! ```

use crate::geometry::{Point, Size};

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color (linear space)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Affine Transform
// ─────────────────────────────────────────────────────────────────────────────

/// 2D affine transformation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2D {
    /// Matrix elements [a, b, c, d, tx, ty]
    /// | a  c  tx |
    /// | b  d  ty |
    /// | 0  0   1 |
    pub elements: [f32; 6],
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2D {
    pub const IDENTITY: Affine2D = Affine2D {
        elements: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            elements: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            elements: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    pub fn rotation(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            elements: [c, s, -s, c, 0.0, 0.0],
        }
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let [a, b, c, d, tx, ty] = self.elements;
        Point::new(
            a * point.x + c * point.y + tx,
            b * point.x + d * point.y + ty,
        )
    }

    /// Concatenate this transform with another (self * other)
    /// The resulting transform first applies `other`, then `self`.
    pub fn then(&self, other: &Affine2D) -> Affine2D {
        let [a1, b1, c1, d1, tx1, ty1] = self.elements;
        let [a2, b2, c2, d2, tx2, ty2] = other.elements;

        Affine2D {
            elements: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * tx2 + c1 * ty2 + tx1,
                b1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Path Types
// ─────────────────────────────────────────────────────────────────────────────

/// Path command for building vector paths
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    /// Move to a point
    MoveTo(Point),
    /// Line to a point
    LineTo(Point),
    /// Quadratic Bézier curve
    QuadTo { control: Point, end: Point },
    /// Close the current subpath
    Close,
}

/// A vector path
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create a new empty path
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Create a path from a vector of commands
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// Move to a point
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    /// Line to a point
    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    /// Quadratic Bézier curve
    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::QuadTo {
            control: Point::new(cx, cy),
            end: Point::new(x, y),
        });
        self
    }

    /// Close the path
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Get the path commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Paint Surface
// ─────────────────────────────────────────────────────────────────────────────

/// A drawable surface with a transform stack
///
/// Transforms nest: `push_transform` composes onto the current transform and
/// `pop_transform` restores the previous one. `clear` wipes the whole backing
/// store regardless of the current transform.
pub trait PaintSurface {
    /// Resize the backing store, discarding existing content
    fn resize(&mut self, size: Size);

    /// Current backing store size
    fn size(&self) -> Size;

    /// Clear the entire surface
    fn clear(&mut self);

    /// Push a transform, composed onto the current one
    fn push_transform(&mut self, transform: Affine2D);

    /// Pop the most recent transform
    fn pop_transform(&mut self);

    /// The composed transform currently in effect
    fn current_transform(&self) -> Affine2D;

    /// Fill a path with a solid color under the current transform
    fn fill_path(&mut self, path: &Path, color: Color);
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording Surface
// ─────────────────────────────────────────────────────────────────────────────

/// A surface operation that can be recorded and replayed
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCommand {
    Clear,
    PushTransform(Affine2D),
    PopTransform,
    FillPath { path: Path, color: Color },
}

/// A paint surface that records commands for later replay
#[derive(Debug)]
pub struct RecordingSurface {
    commands: Vec<SurfaceCommand>,
    transform_stack: Vec<Affine2D>,
    size: Size,
}

impl RecordingSurface {
    /// Create a new recording surface
    pub fn new(size: Size) -> Self {
        Self {
            commands: Vec::new(),
            transform_stack: vec![Affine2D::IDENTITY],
            size,
        }
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the stream empty
    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Drop all recorded commands and reset the transform stack
    pub fn reset(&mut self) {
        self.commands.clear();
        self.transform_stack = vec![Affine2D::IDENTITY];
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

impl PaintSurface for RecordingSurface {
    fn resize(&mut self, size: Size) {
        tracing::trace!("RecordingSurface: resize {}x{}", size.width, size.height);
        self.size = size;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(SurfaceCommand::Clear);
    }

    fn push_transform(&mut self, transform: Affine2D) {
        self.commands.push(SurfaceCommand::PushTransform(transform));
        let composed = self.current_transform().then(&transform);
        self.transform_stack.push(composed);
    }

    fn pop_transform(&mut self) {
        self.commands.push(SurfaceCommand::PopTransform);
        if self.transform_stack.len() > 1 {
            self.transform_stack.pop();
        }
    }

    fn current_transform(&self) -> Affine2D {
        self.transform_stack.last().copied().unwrap_or_default()
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.commands.push(SurfaceCommand::FillPath {
            path: path.clone(),
            color,
        });
    }
}
