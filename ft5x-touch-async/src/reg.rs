//! Operating-mode register map of the FT5xxx family.

/// Fixed 7-bit slave address of the touch controller.
pub const I2C_ADDRESS: u8 = 0x38;

/// Capacity of the transmit buffer, register address byte included.
pub const BUFFER_CAPACITY: usize = 30;

/// Highest number of touch slots any register map variant exposes.
pub const MAX_TOUCHES: usize = 10;

/// Bytes between the first registers of two consecutive touch slots.
pub const TOUCH_SLOT_STRIDE: usize = 6;

/// Capacity of the receive buffer: room for every touch slot.
pub const RX_CAPACITY: usize = MAX_TOUCHES * TOUCH_SLOT_STRIDE;

/// Registers available while the device is in normal (operating) mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    DeviceMode = 0x00,
    GestureId = 0x01,
    /// Number of active touch points.
    TouchStatus = 0x02,
    /// `| event flag (2) | - (2) | X[11:8] |` of the first slot.
    Touch1XHigh = 0x03,
    Touch1XLow = 0x04,
    /// `| touch id (4) | Y[11:8] |` of the first slot.
    Touch1YHigh = 0x05,
    Touch1YLow = 0x06,
    Touch2XHigh = 0x09,
    Touch2XLow = 0x0A,
    Touch2YHigh = 0x0B,
    Touch2YLow = 0x0C,
    /// Valid touch detect threshold, in units of 4.
    ThresholdGroup = 0x80,
    ThresholdPeak = 0x81,
    /// Threshold used while calculating the focus of a touch.
    ThresholdFocus = 0x82,
    /// Threshold while there is water on the surface.
    ThresholdWater = 0x83,
    /// Temperature compensation threshold.
    ThresholdTemperature = 0x84,
    /// Threshold for reporting a coordinate as moved.
    ThresholdDifference = 0x85,
    Control = 0x86,
    /// Time without touch before entering monitor mode, in seconds.
    MonitorTimer = 0x87,
    ActivePeriod = 0x88,
    MonitorPeriod = 0x89,
    AutoCalibration = 0xA0,
    LibraryVersionHigh = 0xA1,
    LibraryVersionLow = 0xA2,
    ChipVendor = 0xA3,
    InterruptMode = 0xA4,
    PowerMode = 0xA5,
    FirmwareId = 0xA6,
    RunningState = 0xA7,
    ErrorCode = 0xA9,
    /// Calibration control, only meaningful in test mode.
    Calibrate = 0xAA,
}

impl Register {
    /// First register (`XH`) of touch slot `slot`, counted from zero.
    ///
    /// Slots beyond [`MAX_TOUCHES`] are not part of the map.
    pub const fn touch_slot(slot: usize) -> Option<u8> {
        if slot < MAX_TOUCHES {
            Some(Register::Touch1XHigh as u8 + (slot * TOUCH_SLOT_STRIDE) as u8)
        } else {
            None
        }
    }
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        reg as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_slots_follow_the_documented_stride() {
        assert_eq!(Register::touch_slot(0), Some(Register::Touch1XHigh as u8));
        assert_eq!(Register::touch_slot(1), Some(Register::Touch2XHigh as u8));
        assert_eq!(Register::touch_slot(2), Some(0x0F));
        assert_eq!(Register::touch_slot(4), Some(0x1B));
        assert_eq!(Register::touch_slot(MAX_TOUCHES), None);
    }
}
