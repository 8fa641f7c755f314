//! Screen dimension providers.
//!
//! The gesture tracker asks for the screen size on every record, so a
//! provider backed by a live OS query would pick up rotation or resolution
//! changes without a restart.  The relay ships [`FixedScreen`], which returns
//! the size given in the configuration.

use touch_core::ScreenSize;

use crate::application::gesture_tracker::ScreenDimensions;

/// A provider that always reports the same size.
#[derive(Debug, Clone, Copy)]
pub struct FixedScreen {
    size: ScreenSize,
}

impl FixedScreen {
    pub fn new(size: ScreenSize) -> Self {
        Self { size }
    }

    /// A 1920×1080 screen, the most common test fixture.
    pub fn full_hd() -> Self {
        Self::new(ScreenSize::new(1920.0, 1080.0))
    }
}

impl ScreenDimensions for FixedScreen {
    fn screen_size(&self) -> ScreenSize {
        self.size
    }
}
