#![cfg_attr(not(test), no_std)]
#![doc = "Asynchronous I2C bus adapters for the capacitive touch drivers."]

// `transfer` turns a vendor controller that reports completion from its
// interrupt handler into an `embedded-hal-async` bus. `i2c` lets several
// drivers share one such bus.

pub mod i2c;
pub mod transfer;

pub use transfer::{
    BusConfig, CompletionI2c, CompletionSignal, Direction, I2cController, TransferError,
    TransferRequest,
};
