//! A completion-signalled I2C transport.
//!
//! Vendor HALs commonly expose a non-blocking "start transfer" call and report
//! the outcome later from the bus interrupt handler. [`CompletionI2c`] starts a
//! single phase on an [`I2cController`] and then awaits the [`CompletionSignal`]
//! that the interrupt handler raises with the controller status. Every
//! `Operation` of a transaction is issued as its own phase; no repeated-start
//! combining is attempted.
//!
//! ```ignore
//! static DONE: CompletionSignal<CriticalSectionRawMutex, MyError> = Signal::new();
//!
//! // In the bus interrupt handler:
//! DONE.signal(status);
//!
//! // In the application:
//! let mut bus = CompletionI2c::new(controller, &DONE);
//! bus.configure(BusConfig::default())?;
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};
use embedded_hal::i2c::{Error, ErrorKind, ErrorType, Operation, SevenBitAddress};
use embedded_hal_async::i2c::I2c;

/// Highest bus clock accepted by [`CompletionI2c::configure`].
pub const MAX_BAUD_RATE_HZ: u32 = 400_000;

/// The completion primitive shared between the interrupt handler and the transport.
///
/// The handler signals `Ok(())` when the controller finished a phase, or the
/// controller error otherwise.
pub type CompletionSignal<M, E> = Signal<M, Result<(), E>>;

/// Direction of a single bus phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Master receives `len` bytes from the slave.
    Read,
    /// Master sends `data` to the slave.
    Write,
}

/// One phase handed to the platform controller. Built per call, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest<'a> {
    /// 7-bit slave address.
    pub address: SevenBitAddress,
    /// Read or write.
    pub direction: Direction,
    /// Payload of a write phase. Empty for reads.
    pub data: &'a [u8],
    /// Number of bytes to move.
    pub len: usize,
}

impl<'a> TransferRequest<'a> {
    /// A write phase sending `data`.
    pub const fn write(address: SevenBitAddress, data: &'a [u8]) -> Self {
        Self {
            address,
            direction: Direction::Write,
            data,
            len: data.len(),
        }
    }
}

impl TransferRequest<'static> {
    /// A read phase receiving `len` bytes.
    pub const fn read(address: SevenBitAddress, len: usize) -> Self {
        Self {
            address,
            direction: Direction::Read,
            data: &[],
            len,
        }
    }
}

/// Electrical configuration passed through to the platform controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// SCL frequency in Hz.
    pub baud_rate_hz: u32,
    /// Frequency of the clock feeding the I2C peripheral, in Hz.
    pub source_clock_hz: u32,
}

impl BusConfig {
    /// Standard mode: 100 kHz from a 16 MHz root clock (SysPLL1 160 MHz / 10).
    pub const fn standard() -> Self {
        Self {
            baud_rate_hz: 100_000,
            source_clock_hz: 16_000_000,
        }
    }

    /// Fast mode, the highest rate the touch controllers support.
    pub const fn fast() -> Self {
        Self {
            baud_rate_hz: MAX_BAUD_RATE_HZ,
            ..Self::standard()
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// A platform bus controller that runs transfers in the background.
///
/// The platform owns pins, clocks and interrupts. It must signal the
/// [`CompletionSignal`] handed to [`CompletionI2c::new`] exactly once for
/// every phase that `start_transfer` accepted.
pub trait I2cController {
    /// Controller-reported failure (NACK, arbitration loss, busy, ...).
    type Error: Error;

    /// Applies the bus clock configuration.
    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::Error>;

    /// Starts one phase without waiting for it.
    fn start_transfer(&mut self, request: TransferRequest<'_>) -> Result<(), Self::Error>;

    /// Copies the bytes of the last completed read phase into `buffer`.
    fn received(&mut self, buffer: &mut [u8]);

    /// Cancels the phase in flight, if any.
    fn abort(&mut self);
}

/// Errors of the [`CompletionI2c`] transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError<E> {
    /// The controller refused to start the phase or reported a failed completion.
    Bus(E),
    /// No completion arrived within the configured limit.
    Timeout,
    /// The requested baud rate exceeds [`MAX_BAUD_RATE_HZ`].
    UnsupportedBaudRate(u32),
}

impl<E: Error> Error for TransferError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Bus(err) => err.kind(),
            Self::Timeout | Self::UnsupportedBaudRate(_) => ErrorKind::Other,
        }
    }
}

/// An `embedded-hal-async` I2C bus over a completion-signalled controller.
///
/// One phase is in flight at a time; `&mut self` on every call enforces it.
pub struct CompletionI2c<'a, C: I2cController, M: RawMutex> {
    controller: C,
    done: &'a CompletionSignal<M, C::Error>,
    timeout: Option<Duration>,
}

impl<'a, C: I2cController, M: RawMutex> CompletionI2c<'a, C, M> {
    /// Creates a transport that waits for completion without a limit.
    pub fn new(controller: C, done: &'a CompletionSignal<M, C::Error>) -> Self {
        Self {
            controller,
            done,
            timeout: None,
        }
    }

    /// Bounds every completion wait. A phase that does not complete in time is
    /// aborted and reported as [`TransferError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Configures the underlying controller.
    pub fn configure(&mut self, config: BusConfig) -> Result<(), TransferError<C::Error>> {
        if config.baud_rate_hz > MAX_BAUD_RATE_HZ {
            log::warn!(
                "Refusing I2C baud rate {} Hz, maximum is {} Hz",
                config.baud_rate_hz,
                MAX_BAUD_RATE_HZ
            );
            return Err(TransferError::UnsupportedBaudRate(config.baud_rate_hz));
        }
        self.controller.configure(&config).map_err(|err| {
            log::warn!("Error configuring the I2C controller: {err:?}");
            TransferError::Bus(err)
        })
    }

    /// Gives back the controller.
    pub fn release(self) -> C {
        self.controller
    }

    async fn phase(&mut self, request: TransferRequest<'_>) -> Result<(), TransferError<C::Error>> {
        // A completion left over from an aborted phase must not satisfy this one.
        self.done.reset();

        self.controller.start_transfer(request).map_err(|err| {
            log::warn!(
                "Error starting {:?} phase to 0x{:02X}: {err:?}",
                request.direction,
                request.address
            );
            TransferError::Bus(err)
        })?;

        let status = match self.timeout {
            Some(limit) => match with_timeout(limit, self.done.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    self.controller.abort();
                    log::warn!(
                        "Timeout waiting for {:?} phase to 0x{:02X}",
                        request.direction,
                        request.address
                    );
                    return Err(TransferError::Timeout);
                }
            },
            None => self.done.wait().await,
        };

        status.map_err(|err| {
            log::warn!(
                "{:?} phase to 0x{:02X} failed: {err:?}",
                request.direction,
                request.address
            );
            TransferError::Bus(err)
        })
    }
}

impl<'a, C: I2cController, M: RawMutex> ErrorType for CompletionI2c<'a, C, M> {
    type Error = TransferError<C::Error>;
}

impl<'a, C: I2cController, M: RawMutex> I2c<SevenBitAddress> for CompletionI2c<'a, C, M> {
    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(data) => {
                    log::trace!("i2c write 0x{address:02X} {:02X?}", data);
                    self.phase(TransferRequest::write(address, *data)).await?;
                }
                Operation::Read(buffer) => {
                    self.phase(TransferRequest::read(address, buffer.len()))
                        .await?;
                    self.controller.received(buffer);
                    log::trace!("i2c read 0x{address:02X} {:02X?}", buffer);
                }
            }
        }
        Ok(())
    }
}
