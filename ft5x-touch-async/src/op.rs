//! Typed values of the mode, event, gesture, state and threshold registers.

/// Bits of the device mode register owned by the mode field.
pub const MODE_MASK: u8 = 0b0011_1111;

/// Reserved bits of the device mode register.
pub const MODE_RESERVED_MASK: u8 = 0b1100_0000;

/// The primary threshold is stored on the wire divided by this factor.
pub const THRESHOLD_SCALE: u16 = 4;

/// Operating mode selected through the device mode register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DeviceMode {
    /// Normal operation, touch data is reported.
    Normal = 0x00,
    /// System information mode.
    System = 0x01,
    /// Factory test mode. The register map changes in this mode.
    Test = 0x04,
}

impl TryFrom<u8> for DeviceMode {
    type Error = u8;

    /// Decodes the low six bits of the register; the reserved bits are ignored.
    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw & MODE_MASK {
            0x00 => Ok(DeviceMode::Normal),
            0x01 => Ok(DeviceMode::System),
            0x04 => Ok(DeviceMode::Test),
            other => Err(other),
        }
    }
}

/// Per-point contact state reported in the two top bits of the `XH` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventFlag {
    /// Contact began.
    Down = 0b00,
    /// Contact ended.
    Up = 0b01,
    /// Contact continues.
    Hold = 0b10,
    /// The slot holds no event.
    NoEvent = 0b11,
}

impl EventFlag {
    /// Decodes the two low bits of `bits`.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => EventFlag::Down,
            0b01 => EventFlag::Up,
            0b10 => EventFlag::Hold,
            _ => EventFlag::NoEvent,
        }
    }
}

/// Gesture IDs returned by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    None,
    SwipeUp,
    SwipeLeft,
    SwipeDown,
    SwipeRight,
    ZoomIn,
    ZoomOut,
    /// A code outside the documented set.
    Unknown(u8),
}

impl From<u8> for Gesture {
    fn from(raw: u8) -> Self {
        match raw {
            0x00 => Gesture::None,
            0x10 => Gesture::SwipeUp,
            0x14 => Gesture::SwipeLeft,
            0x18 => Gesture::SwipeDown,
            0x1C => Gesture::SwipeRight,
            0x48 => Gesture::ZoomIn,
            0x49 => Gesture::ZoomOut,
            other => Gesture::Unknown(other),
        }
    }
}

/// Running state of the controller firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunningState {
    Configure = 0x00,
    Work = 0x01,
    Calibration = 0x02,
    Factory = 0x03,
    AutoCalibration = 0x04,
}

impl TryFrom<u8> for RunningState {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0x00 => Ok(RunningState::Configure),
            0x01 => Ok(RunningState::Work),
            0x02 => Ok(RunningState::Calibration),
            0x03 => Ok(RunningState::Factory),
            0x04 => Ok(RunningState::AutoCalibration),
            other => Err(other),
        }
    }
}

/// Power consumption modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PowerMode {
    Active = 0x00,
    Monitor = 0x01,
    /// Deep sleep. Only a reset wakes the controller up again.
    Hibernate = 0x03,
}

impl TryFrom<u8> for PowerMode {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0x00 => Ok(PowerMode::Active),
            0x01 => Ok(PowerMode::Monitor),
            0x03 => Ok(PowerMode::Hibernate),
            other => Err(other),
        }
    }
}

/// How the interrupt line signals new touch data to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InterruptMode {
    /// The line stays asserted while touch data is valid.
    Polling = 0x00,
    /// The line pulses once per report.
    Trigger = 0x01,
}

impl TryFrom<u8> for InterruptMode {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0x00 => Ok(InterruptMode::Polling),
            0x01 => Ok(InterruptMode::Trigger),
            other => Err(other),
        }
    }
}

/// The threshold group: six calibration parameters controlling touch sensitivity.
///
/// `threshold` travels over the wire divided by [`THRESHOLD_SCALE`], so only
/// multiples of four survive a write followed by a read. 281 is written as 70
/// and read back as 280.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdSettings {
    /// Valid touch detect threshold.
    pub threshold: u16,
    /// Valid touch peak detect threshold.
    pub peak: u8,
    /// Threshold used while calculating the focus of a touch.
    pub focus: u8,
    /// Threshold while there is water on the surface.
    pub water: u8,
    /// Temperature compensation threshold.
    pub temperature: u8,
    /// Threshold for reporting a coordinate as moved.
    pub difference: u8,
}

impl ThresholdSettings {
    /// Decodes the six bytes of the threshold group.
    pub fn from_wire(raw: [u8; 6]) -> Self {
        Self {
            threshold: raw[0] as u16 * THRESHOLD_SCALE,
            peak: raw[1],
            focus: raw[2],
            water: raw[3],
            temperature: raw[4],
            difference: raw[5],
        }
    }

    /// Encodes the settings, or `None` when `threshold / 4` does not fit a byte.
    pub fn to_wire(&self) -> Option<[u8; 6]> {
        let threshold = u8::try_from(self.threshold / THRESHOLD_SCALE).ok()?;
        Some([
            threshold,
            self.peak,
            self.focus,
            self.water,
            self.temperature,
            self.difference,
        ])
    }
}

/// Factory threshold presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdPreset {
    /// Defaults listed in the controller datasheet.
    Datasheet,
    /// Values tuned for the reference 800x480 panel.
    Board,
}

impl ThresholdPreset {
    pub const fn settings(self) -> ThresholdSettings {
        match self {
            ThresholdPreset::Datasheet => ThresholdSettings {
                threshold: 280,
                peak: 60,
                focus: 16,
                water: 60,
                temperature: 10,
                difference: 20,
            },
            ThresholdPreset::Board => ThresholdSettings {
                threshold: 240,
                peak: 50,
                focus: 17,
                water: 17,
                temperature: 17,
                difference: 160,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_mode_ignores_reserved_bits() {
        assert_eq!(DeviceMode::try_from(0xC4), Ok(DeviceMode::Test));
        assert_eq!(DeviceMode::try_from(0x40), Ok(DeviceMode::Normal));
        assert_eq!(DeviceMode::try_from(0x03), Err(0x03));
    }

    #[test]
    fn gesture_codes_outside_the_table_are_flagged() {
        assert_eq!(Gesture::from(0x1C), Gesture::SwipeRight);
        assert_eq!(Gesture::from(0x49), Gesture::ZoomOut);
        assert_eq!(Gesture::from(0x11), Gesture::Unknown(0x11));
    }

    #[test]
    fn threshold_scale_is_lossy_below_four() {
        let mut settings = ThresholdPreset::Datasheet.settings();
        let wire = settings.to_wire().unwrap();
        assert_eq!(wire, [70, 60, 16, 60, 10, 20]);
        assert_eq!(ThresholdSettings::from_wire(wire), settings);

        settings.threshold = 281;
        let read_back = ThresholdSettings::from_wire(settings.to_wire().unwrap());
        assert_eq!(read_back.threshold, 280);
        assert_eq!(read_back.difference, settings.difference);
    }

    #[test]
    fn threshold_beyond_one_byte_is_not_encodable() {
        let settings = ThresholdSettings {
            threshold: 1024,
            ..ThresholdPreset::Board.settings()
        };
        assert_eq!(settings.to_wire(), None);

        let settings = ThresholdSettings {
            threshold: 1023,
            ..ThresholdPreset::Board.settings()
        };
        assert_eq!(settings.to_wire().map(|wire| wire[0]), Some(255));
    }

    #[test]
    fn unknown_running_state_is_rejected() {
        assert_eq!(RunningState::try_from(0x01), Ok(RunningState::Work));
        assert_eq!(RunningState::try_from(0x05), Err(0x05));
    }
}
