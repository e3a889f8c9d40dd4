//! Driver configuration.
//!
//! Everything here is fixed when the driver is created. `Config::default()`
//! describes the reference board: an 800x480 panel (153.6 mm x 86.64 mm)
//! mounted at 0 degrees, wired with the two-touch register map.

use crate::op::ThresholdPreset;
use crate::reg::{I2C_ADDRESS, MAX_TOUCHES};

/// Panel dimensions used for coordinate remapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    /// Highest X coordinate in pixels.
    pub max_x: u16,
    /// Highest Y coordinate in pixels.
    pub max_y: u16,
    /// Physical width in millimetres.
    pub width_mm: u16,
    /// Physical height in millimetres.
    pub height_mm: u16,
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self {
            max_x: 800,
            max_y: 480,
            width_mm: 154,
            height_mm: 86,
        }
    }
}

/// Mounting rotation of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    /// Maps raw controller coordinates to screen coordinates.
    ///
    /// The four cases are not rotations of each other and must stay an explicit
    /// table. Subtractions saturate, so raw values beyond the panel land on its edge.
    pub const fn remap(self, x: u16, y: u16, screen: &ScreenGeometry) -> (u16, u16) {
        match self {
            Orientation::Deg0 => (screen.max_x.saturating_sub(x), y),
            Orientation::Deg90 => (screen.max_y.saturating_sub(y), screen.max_x.saturating_sub(x)),
            Orientation::Deg180 => (x, screen.max_y.saturating_sub(y)),
            Orientation::Deg270 => (y, x),
        }
    }
}

/// Register map variant the controller is wired for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchMap {
    /// Only the first two touch slots are mapped.
    #[default]
    TwoTouch,
    /// All [`MAX_TOUCHES`] slots are mapped.
    MultiTouch,
}

impl TouchMap {
    /// Number of touch slots this map exposes.
    pub const fn slots(self) -> usize {
        match self {
            TouchMap::TwoTouch => 2,
            TouchMap::MultiTouch => MAX_TOUCHES,
        }
    }
}

/// How `set_device_mode` treats the two reserved bits of the mode register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeWrite {
    /// Read the register first and keep bits 7..6.
    #[default]
    PreserveReserved,
    /// Write the mode byte as is, clearing the reserved bits.
    Overwrite,
}

/// Configuration of a [`TouchController`](crate::touch::TouchController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// 7-bit slave address.
    pub address: u8,
    pub screen: ScreenGeometry,
    pub orientation: Orientation,
    pub touch_map: TouchMap,
    /// Preset written by `set_threshold_defaults`.
    pub threshold_preset: ThresholdPreset,
    pub mode_write: ModeWrite,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: I2C_ADDRESS,
            screen: ScreenGeometry::default(),
            orientation: Orientation::Deg0,
            touch_map: TouchMap::TwoTouch,
            threshold_preset: ThresholdPreset::Board,
            mode_write: ModeWrite::PreserveReserved,
        }
    }
}

impl Config {
    /// Sets the mounting rotation.
    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the panel dimensions.
    pub const fn with_screen(mut self, screen: ScreenGeometry) -> Self {
        self.screen = screen;
        self
    }

    /// Selects the register map variant.
    pub const fn with_touch_map(mut self, touch_map: TouchMap) -> Self {
        self.touch_map = touch_map;
        self
    }

    /// Selects the preset written by `set_threshold_defaults`.
    pub const fn with_threshold_preset(mut self, preset: ThresholdPreset) -> Self {
        self.threshold_preset = preset;
        self
    }

    /// Selects how the mode register is written.
    pub const fn with_mode_write(mut self, mode_write: ModeWrite) -> Self {
        self.mode_write = mode_write;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remap_follows_the_mounting_table() {
        let screen = ScreenGeometry::default();

        assert_eq!(Orientation::Deg0.remap(100, 50, &screen), (700, 50));
        assert_eq!(Orientation::Deg90.remap(100, 50, &screen), (430, 700));
        assert_eq!(Orientation::Deg180.remap(100, 50, &screen), (100, 430));
        assert_eq!(Orientation::Deg270.remap(100, 50, &screen), (50, 100));
    }

    #[test]
    fn remap_clamps_raw_values_beyond_the_panel() {
        let screen = ScreenGeometry::default();

        assert_eq!(Orientation::Deg0.remap(0x0FFF, 10, &screen), (0, 10));
        assert_eq!(Orientation::Deg180.remap(10, 0x0FFF, &screen), (10, 0));
    }

    #[test]
    fn default_matches_the_reference_board() {
        let config = Config::default();

        assert_eq!(config.address, 0x38);
        assert_eq!(config.touch_map.slots(), 2);
        assert_eq!(TouchMap::MultiTouch.slots(), MAX_TOUCHES);
        assert_eq!(config.mode_write, ModeWrite::PreserveReserved);
    }

    #[test]
    fn builders_are_usable_in_constants() {
        const ROTATED: Config = Config {
            address: I2C_ADDRESS,
            screen: ScreenGeometry {
                max_x: 480,
                max_y: 272,
                width_mm: 95,
                height_mm: 54,
            },
            orientation: Orientation::Deg0,
            touch_map: TouchMap::TwoTouch,
            threshold_preset: ThresholdPreset::Datasheet,
            mode_write: ModeWrite::PreserveReserved,
        }
        .with_orientation(Orientation::Deg180)
        .with_touch_map(TouchMap::MultiTouch);

        assert_eq!(ROTATED.orientation, Orientation::Deg180);
        assert_eq!(ROTATED.touch_map.slots(), MAX_TOUCHES);
        assert_eq!(ROTATED.screen.max_x, 480);
    }
}
