//! Bar renderer
//!
//! Redraws one spinner from scratch each frame. Phase comes from elapsed
//! time alone, so frame rate only affects smoothness, never speed: the
//! opacity offset is the fraction of a full revolution completed, and each
//! bar fades by its distance behind the lead bar, producing the trailing
//! comet effect.
//!
//! Trigonometry and phase math run in f64; values narrow to f32 at the
//! paint-surface boundary.

use std::time::Duration;

use whorl_core::{Affine2D, Color, PaintSurface, Path};

use crate::handle::ActiveThrobber;
use crate::options::ThrobberOptions;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Fraction of a full revolution completed after `elapsed`
///
/// Unbounded; per-bar math wraps it. An rpm of zero divides by infinity and
/// freezes the phase at zero.
pub(crate) fn opacity_offset(elapsed: Duration, rpm: f64) -> f64 {
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    elapsed_ms / (MS_PER_MINUTE / rpm)
}

/// Opacity of one bar: the lead bar is fully opaque, trailing bars dim
/// linearly with their distance behind it
pub(crate) fn bar_opacity(bars: u32, index: u32, offset: f64) -> f64 {
    if bars == 0 {
        return 0.0;
    }
    let fraction = (bars - index) as f64 / bars as f64 + offset;
    1.0 - fraction.rem_euclid(1.0)
}

/// Fill color for one bar: black, alpha clamped and rounded to three
/// decimals
pub(crate) fn bar_color(opacity: f64) -> Color {
    let rounded = (opacity.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
    Color::BLACK.with_alpha(rounded as f32)
}

/// Position of a bar's near end on the inner circle, relative to the center
pub(crate) fn bar_position(inner_radius: f32, angle: f64) -> (f32, f32) {
    let x = f64::from(inner_radius) * (-angle).sin();
    let y = f64::from(inner_radius) * (-angle).cos();
    (x as f32, y as f32)
}

/// One bar outline in local coordinates: straight flanks, tip rounded by
/// two quadratic curves
pub(crate) fn bar_path(width: f32, height: f32) -> Path {
    let half = width / 2.0;
    Path::new()
        .move_to(half, 0.0)
        .line_to(-half, 0.0)
        .line_to(-half, height - half)
        .quad_to(-half, height, 0.0, height)
        .quad_to(half, height, half, height - half)
}

/// Redraw one handle's surface for the given elapsed time
pub(crate) fn draw(active: &ActiveThrobber, elapsed: Duration) {
    let Some(backing) = active.element.paint_surface() else {
        return;
    };
    let mut surface = backing.borrow_mut();
    draw_into(&mut *surface, &active.options, active.scale, elapsed);
}

/// Full frame for one spinner: clear, scale for density, recenter, then one
/// rotated bar per step
pub(crate) fn draw_into(
    surface: &mut dyn PaintSurface,
    options: &ThrobberOptions,
    scale: f32,
    elapsed: Duration,
) {
    let offset = opacity_offset(elapsed, options.rpm);

    surface.clear();
    surface.push_transform(Affine2D::scale(scale, scale));
    surface.push_transform(Affine2D::translation(options.center.x, options.center.y));

    let path = bar_path(options.bar_width, options.bar_height);
    for index in 0..options.bars {
        let angle = f64::from(index) * std::f64::consts::TAU / f64::from(options.bars);
        let (x, y) = bar_position(options.inner_radius, angle);

        surface.push_transform(Affine2D::translation(x, y));
        surface.push_transform(Affine2D::rotation(angle as f32));
        surface.fill_path(&path, bar_color(bar_opacity(options.bars, index, offset)));
        surface.pop_transform();
        surface.pop_transform();
    }

    surface.pop_transform();
    surface.pop_transform();
}
