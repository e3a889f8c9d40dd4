//! Error type of the FT5xxx driver.

use crate::reg::Register;

/// Driver errors. `E` is the error type of the underlying I2C bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// A bus phase failed or timed out. The bus error is carried unchanged.
    Transfer(E),
    /// A transfer does not fit into the driver's buffers. Nothing was sent.
    BufferTooSmall {
        /// Bytes the transfer needed; writes count the register address.
        requested: usize,
        /// Capacity of the buffer that was exceeded.
        capacity: usize,
    },
    /// A register held a value outside its documented set.
    UnexpectedValue {
        /// The register that was read.
        register: Register,
        /// The raw value found.
        value: u8,
    },
    /// An argument cannot be represented on the wire.
    InvalidArgument,
}

