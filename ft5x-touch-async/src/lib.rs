//! An asynchronous, `no_std` driver for FT5xxx-class capacitive touch controllers.
//!
//! This driver provides a `TouchController` to interact with an FT5x06-style
//! I2C touch controller at address `0x38`. It reads touch points (remapped to
//! the panel orientation), gestures, device mode and running state, and reads
//! and writes the calibration threshold group.
//!
//! Layers, each built only on the one below:
//!
//! 1. The bus: anything implementing `embedded-hal-async::i2c::I2c`. The
//!    `captouch-bus-async` crate adapts interrupt-completed vendor controllers.
//! 2. [`access::RegisterAccess`]: byte, half-word, word and array reads and writes.
//! 3. [`touch::TouchController`]: touch decoding and the typed accessors.
//!
//! The driver does not lock the bus. Share it through a mutex-guarded device
//! when more than one task talks to the controller; every register read is a
//! single transaction, so the lock covers both of its phases.
//!
//! The driver waits as long as the bus does. A bounded wait belongs to the bus,
//! which can cancel the transfer in flight (see `CompletionI2c::with_timeout`).
//!
//! # Usage
//!
//! ```ignore
//! use ft5x_touch_async::conf::{Config, Orientation};
//! use ft5x_touch_async::touch::TouchController;
//!
//! #[esp_hal_embassy::main]
//! async fn main(spawner: Spawner) {
//!     let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));
//!     let config = esp_hal::i2c::master::Config::default().with_frequency(Rate::from_khz(100));
//!     let i2c = I2c::new(peripherals.I2C0, config)
//!         .unwrap()
//!         .with_sda(peripherals.GPIO13)
//!         .with_scl(peripherals.GPIO14)
//!         .into_async();
//!
//!     let mut touch = TouchController::new(i2c, Config::default().with_orientation(Orientation::Deg90));
//!     touch.init().await.unwrap();
//!
//!     loop {
//!         if let Ok(points) = touch.touches().await {
//!             for point in points {
//!                 // log::info!("Touch: {:?}", point);
//!             }
//!         }
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod access;
pub mod conf;
pub mod err;
pub mod op;
pub mod point;
pub mod reg;
pub mod touch;

pub use err::Error;
pub use point::TouchPoint;
pub use touch::TouchController;
