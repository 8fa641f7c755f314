//! Screen geometry: sizes, absolute points, and fraction-to-pixel mapping.

/// Dimensions of the host screen in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

/// An absolute position on the host screen in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Maps normalised screen fractions to an absolute point.
    ///
    /// No clamping is done; the frame decoder already rejects fractions
    /// outside `[0, 1]`.
    pub fn resolve(&self, x_fraction: f64, y_fraction: f64) -> ScreenPoint {
        ScreenPoint {
            x: x_fraction * self.width,
            y: y_fraction * self.height,
        }
    }

    /// `true` when both dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_center_of_1080p() {
        let size = ScreenSize::new(1920.0, 1080.0);
        assert_eq!(size.resolve(0.5, 0.5), ScreenPoint::new(960.0, 540.0));
    }

    #[test]
    fn test_resolve_corners() {
        let size = ScreenSize::new(800.0, 600.0);
        assert_eq!(size.resolve(0.0, 0.0), ScreenPoint::new(0.0, 0.0));
        assert_eq!(size.resolve(1.0, 1.0), ScreenPoint::new(800.0, 600.0));
    }

    #[test]
    fn test_zero_or_negative_size_is_invalid() {
        assert!(!ScreenSize::new(0.0, 1080.0).is_valid());
        assert!(!ScreenSize::new(1920.0, -1.0).is_valid());
        assert!(!ScreenSize::new(f64::NAN, 1080.0).is_valid());
        assert!(ScreenSize::new(1.0, 1.0).is_valid());
    }
}
