//! Throbber geometry and timing options
//!
//! Options are cloned per start, so mutating the scheduler defaults never
//! leaks into already-running instances.

use whorl_core::Point;

/// Display scale at and above which the backing store doubles
const HIDPI_THRESHOLD: f64 = 1.5;

/// Configuration for one throbber instance
#[derive(Clone, Debug, PartialEq)]
pub struct ThrobberOptions {
    /// Number of rotating bars
    pub bars: u32,
    /// Distance from the center to the near end of each bar
    pub inner_radius: f32,
    /// Drawing origin, in surface coordinates
    pub center: Point,
    /// Bar width, in surface units
    pub bar_width: f32,
    /// Bar length, in surface units
    pub bar_height: f32,
    /// Edge length of the square surface
    pub canvas_size: f32,
    /// Rotation speed, in revolutions per minute
    pub rpm: f64,
}

impl ThrobberOptions {
    /// The standard 40-unit spinner
    pub fn regular() -> Self {
        Self {
            bars: 12,
            inner_radius: 8.0,
            center: Point::new(20.0, 20.0),
            bar_width: 3.0,
            bar_height: 8.0,
            canvas_size: 40.0,
            rpm: 60.0,
        }
    }

    /// A compact 20-unit spinner (inline indicators, list rows)
    pub fn small() -> Self {
        Self {
            inner_radius: 3.0,
            center: Point::new(10.0, 10.0),
            bar_width: 2.0,
            bar_height: 5.0,
            canvas_size: 20.0,
            ..Self::regular()
        }
    }

    /// Resolve the backing-store scale for a display density
    ///
    /// High-density displays (scale factor >= 1.5) double the surface edge
    /// and draw at 2x; everything else renders 1:1. Returns the draw scale.
    pub fn apply_density(&mut self, scale_factor: f64) -> f32 {
        if scale_factor >= HIDPI_THRESHOLD {
            self.canvas_size *= 2.0;
            2.0
        } else {
            1.0
        }
    }
}

impl Default for ThrobberOptions {
    fn default() -> Self {
        Self::regular()
    }
}

/// Named geometry preset applied on top of the scheduler defaults
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThrobberVariant {
    #[default]
    Regular,
    Small,
}

impl ThrobberVariant {
    /// Overlay this variant's geometry on a base configuration
    ///
    /// Bar count and rotation speed always come from the base; the `Small`
    /// variant replaces only the five geometry fields.
    pub fn apply(self, base: &ThrobberOptions) -> ThrobberOptions {
        match self {
            ThrobberVariant::Regular => base.clone(),
            ThrobberVariant::Small => ThrobberOptions {
                bars: base.bars,
                rpm: base.rpm,
                ..ThrobberOptions::small()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_defaults() {
        let options = ThrobberOptions::default();
        assert_eq!(options.bars, 12);
        assert_eq!(options.inner_radius, 8.0);
        assert_eq!(options.center, Point::new(20.0, 20.0));
        assert_eq!(options.bar_width, 3.0);
        assert_eq!(options.bar_height, 8.0);
        assert_eq!(options.canvas_size, 40.0);
        assert_eq!(options.rpm, 60.0);
    }

    #[test]
    fn test_small_variant_geometry() {
        let options = ThrobberVariant::Small.apply(&ThrobberOptions::default());
        assert_eq!(options.inner_radius, 3.0);
        assert_eq!(options.center, Point::new(10.0, 10.0));
        assert_eq!(options.bar_width, 2.0);
        assert_eq!(options.bar_height, 5.0);
        assert_eq!(options.canvas_size, 20.0);
        assert_eq!(options, ThrobberOptions::small());
    }

    #[test]
    fn test_variant_keeps_base_timing() {
        let base = ThrobberOptions {
            bars: 8,
            rpm: 90.0,
            ..ThrobberOptions::regular()
        };
        let options = ThrobberVariant::Small.apply(&base);
        assert_eq!(options.bars, 8);
        assert_eq!(options.rpm, 90.0);
    }

    #[test]
    fn test_density_binding() {
        let mut options = ThrobberOptions::regular();
        assert_eq!(options.apply_density(1.0), 1.0);
        assert_eq!(options.canvas_size, 40.0);

        let mut options = ThrobberOptions::regular();
        assert_eq!(options.apply_density(2.0), 2.0);
        assert_eq!(options.canvas_size, 80.0);

        // The threshold itself already doubles
        let mut options = ThrobberOptions::small();
        assert_eq!(options.apply_density(1.5), 2.0);
        assert_eq!(options.canvas_size, 40.0);
    }
}
