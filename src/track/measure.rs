/// One layout measurement of a track item, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementMetrics {
    /// Layout position along the axis, before any transform.
    pub offset_left: f64,
    pub width: f64,
    pub scale_x: f64,
    /// Existing pixel translation.
    pub x: f64,
    /// Existing translation as a percentage of `width`.
    pub x_percent: f64,
}

impl ElementMetrics {
    pub fn new(offset_left: f64, width: f64) -> Self {
        Self {
            offset_left,
            width,
            scale_x: 1.0,
            x: 0.0,
            x_percent: 0.0,
        }
    }

    pub fn rendered_width(&self) -> f64 {
        self.width * self.scale_x
    }

    /// Items without a usable width stay painted but never take part in wrap math.
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.width > 0.0 && self.offset_left.is_finite()
    }
}

/// The host side of a marquee: where measurements come from and where
/// transforms go.
pub trait TrackSurface {
    /// Measures every item, in track order.
    fn measure(&self) -> Vec<ElementMetrics>;

    /// Sets the item's horizontal translation as a percentage of its own width.
    /// Any pixel translation reported by `measure` is expected to be reset by
    /// the first call.
    fn set_x_percent(&mut self, index: usize, x_percent: f64);
}

/// Rounds transform values to a pixel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Snap {
    Off,
    Grid(f64),
}

impl Snap {
    /// Non-positive or non-finite grids turn snapping off.
    pub fn from_grid(grid: f64) -> Self {
        if grid.is_finite() && grid > 0.0 {
            Snap::Grid(grid)
        } else {
            Snap::Off
        }
    }

    pub fn apply(self, value: f64) -> f64 {
        match self {
            Snap::Off => value,
            Snap::Grid(grid) => (value / grid).round() * grid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_to_grid() {
        assert_eq!(Snap::Grid(1.0).apply(10.4), 10.0);
        assert_eq!(Snap::Grid(0.5).apply(10.3), 10.5);
        assert_eq!(Snap::Off.apply(10.3), 10.3);
        assert_eq!(Snap::from_grid(0.0), Snap::Off);
        assert_eq!(Snap::from_grid(f64::NAN), Snap::Off);
    }

    #[test]
    fn zero_and_nan_widths_are_not_measurable() {
        assert!(ElementMetrics::new(0.0, 10.0).is_measurable());
        assert!(!ElementMetrics::new(0.0, 0.0).is_measurable());
        assert!(!ElementMetrics::new(0.0, f64::NAN).is_measurable());
    }
}
