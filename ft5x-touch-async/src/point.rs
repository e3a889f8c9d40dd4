//! Touch point decoding.
//!
//! The first four registers of a touch slot, read as one big-endian word:
//!
//! ```text
//!  31 30 29 28 27 ........ 16 15 ... 12 11 ......... 0
//! | event | -  |   X[11:0]   |  id     |   Y[11:0]    |
//! ```

use crate::conf::{Orientation, ScreenGeometry};
use crate::op::EventFlag;

/// A touch point as reported by one slot of the controller.
///
/// `id` is the slot index assigned by the device, not a tracking id that stays
/// stable across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub event: EventFlag,
    /// X coordinate after orientation remapping.
    pub x: u16,
    /// Y coordinate after orientation remapping.
    pub y: u16,
    /// Touch id (0-15).
    pub id: u8,
}

impl TouchPoint {
    /// Decodes the word read from the first registers of a slot and remaps it
    /// to screen coordinates.
    pub fn decode(word: u32, orientation: Orientation, screen: &ScreenGeometry) -> Self {
        let event = EventFlag::from_bits((word >> 30) as u8);
        let x = ((word >> 16) & 0x0FFF) as u16;
        let id = ((word >> 12) & 0x0F) as u8;
        let y = (word & 0x0FFF) as u16;
        let (x, y) = orientation.remap(x, y, screen);

        Self { event, x, y, id }
    }

    /// Decodes a slot from its `XH`, `XL`, `YH` and `YL` registers.
    pub fn from_slot(raw: [u8; 4], orientation: Orientation, screen: &ScreenGeometry) -> Self {
        Self::decode(u32::from_be_bytes(raw), orientation, screen)
    }
}
