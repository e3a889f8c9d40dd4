//! Register access over the two-phase I2C protocol.
//!
//! A read is one transaction of an address phase carrying `[register]` and a
//! read phase. A write is a single phase carrying `[register, data...]`.
//! Multi-byte values are big-endian on the wire.
//!
//! Bounding the wait for a phase is left to the bus, which is the only layer
//! able to cancel a transfer it started.

use embedded_hal_async::i2c::{I2c, Operation, SevenBitAddress};

use crate::err::Error;
use crate::reg::{BUFFER_CAPACITY, RX_CAPACITY};

/// Byte, half-word, word and array access to the registers of one slave.
///
/// Owns its transmit and receive buffers. Data handed back by a read is a copy,
/// so nothing a caller holds is touched by later calls.
pub struct RegisterAccess<I2C> {
    i2c: I2C,
    address: SevenBitAddress,
    tx: [u8; BUFFER_CAPACITY],
    rx: [u8; RX_CAPACITY],
}

impl<I2C: I2c<SevenBitAddress>> RegisterAccess<I2C> {
    /// Creates a register accessor for the slave at `address`.
    pub fn new(i2c: I2C, address: SevenBitAddress) -> Self {
        Self {
            i2c,
            address,
            tx: [0; BUFFER_CAPACITY],
            rx: [0; RX_CAPACITY],
        }
    }

    /// Gives back the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Runs both phases of a read into the receive buffer.
    ///
    /// The phases go out as one transaction, so a locking bus keeps other
    /// drivers from moving the register pointer in between.
    async fn fetch(&mut self, start: u8, len: usize) -> Result<&[u8], Error<I2C::Error>> {
        if len > RX_CAPACITY {
            log::warn!("Read of {len} bytes from 0x{start:02X} exceeds the receive buffer");
            return Err(Error::BufferTooSmall {
                requested: len,
                capacity: RX_CAPACITY,
            });
        }

        let select = [start];
        self.i2c
            .transaction(
                self.address,
                &mut [
                    Operation::Write(&select),
                    Operation::Read(&mut self.rx[..len]),
                ],
            )
            .await
            .map_err(Error::Transfer)
            .inspect_err(|err| log::warn!("Error reading register 0x{start:02X}: {err:?}"))?;

        log::trace!("read 0x{start:02X}: {:02X?}", &self.rx[..len]);
        Ok(&self.rx[..len])
    }

    /// Reads one register.
    pub async fn read_byte(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let raw = self.fetch(reg, 1).await?;
        Ok(raw[0])
    }

    /// Reads two registers starting at `start`, high byte first.
    pub async fn read_half_word(&mut self, start: u8) -> Result<u16, Error<I2C::Error>> {
        let raw = self.fetch(start, 2).await?;
        Ok(u16::from_be_bytes([raw[0], raw[1]]))
    }

    /// Reads four registers starting at `start`, high byte first.
    pub async fn read_word(&mut self, start: u8) -> Result<u32, Error<I2C::Error>> {
        let raw = self.fetch(start, 4).await?;
        Ok(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    /// Reads `rxd.len()` consecutive registers starting at `start`.
    ///
    /// `rxd` is only written once both phases succeeded.
    pub async fn read_array(&mut self, start: u8, rxd: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        let raw = self.fetch(start, rxd.len()).await?;
        rxd.copy_from_slice(raw);
        Ok(())
    }

    /// Reads the register space from address zero.
    pub async fn read_raw_data(&mut self, rxd: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.read_array(0x00, rxd).await
    }

    /// Writes one register.
    pub async fn write_byte(&mut self, reg: u8, data: u8) -> Result<(), Error<I2C::Error>> {
        self.write_array(reg, &[data]).await
    }

    /// Writes two registers starting at `start`, high byte first.
    pub async fn write_half_word(&mut self, start: u8, data: u16) -> Result<(), Error<I2C::Error>> {
        self.write_array(start, &data.to_be_bytes()).await
    }

    /// Writes four registers starting at `start`, high byte first.
    pub async fn write_word(&mut self, start: u8, data: u32) -> Result<(), Error<I2C::Error>> {
        self.write_array(start, &data.to_be_bytes()).await
    }

    /// Writes `data` to consecutive registers starting at `start` in one phase.
    ///
    /// Fails with [`Error::BufferTooSmall`] before touching the bus when the
    /// register byte plus `data` exceed [`BUFFER_CAPACITY`].
    pub async fn write_array(&mut self, start: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        let len = data.len() + 1;
        if len > BUFFER_CAPACITY {
            log::warn!("Write of {len} bytes to 0x{start:02X} exceeds the transmit buffer");
            return Err(Error::BufferTooSmall {
                requested: len,
                capacity: BUFFER_CAPACITY,
            });
        }

        self.tx[0] = start;
        self.tx[1..len].copy_from_slice(data);
        log::trace!("write 0x{start:02X}: {:02X?}", data);

        self.i2c
            .write(self.address, &self.tx[..len])
            .await
            .map_err(Error::Transfer)
            .inspect_err(|err| log::warn!("Error writing register 0x{start:02X}: {err:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_hal::i2c::{ErrorKind, ErrorType};
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};

    const ADDR: u8 = 0x38;

    /// Expectations for one register read: a transaction of the address phase
    /// and the read phase.
    fn read(reg: u8, data: &[u8]) -> [Transaction; 4] {
        [
            Transaction::transaction_start(ADDR),
            Transaction::write(ADDR, vec![reg]),
            Transaction::read(ADDR, data.to_vec()),
            Transaction::transaction_end(ADDR),
        ]
    }

    /// Fails the operation at `fail_at`, filling read buffers before that.
    struct Faulty {
        fail_at: usize,
        error: ErrorKind,
        phases: usize,
    }

    impl ErrorType for Faulty {
        type Error = ErrorKind;
    }

    impl I2c<SevenBitAddress> for Faulty {
        async fn transaction(
            &mut self,
            _address: SevenBitAddress,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for (index, op) in operations.iter_mut().enumerate() {
                if index == self.fail_at {
                    return Err(self.error);
                }
                self.phases += 1;
                if let Operation::Read(buffer) = op {
                    buffer.fill(0x46);
                }
            }
            Ok(())
        }
    }

    #[test]
    fn read_word_is_big_endian() {
        let expectations = read(0x03, &[0x12, 0x34, 0x56, 0x78]);
        let mut i2c = Mock::new(&expectations);
        let mut regs = RegisterAccess::new(&mut i2c, ADDR);

        assert_eq!(block_on(regs.read_word(0x03)), Ok(0x1234_5678));
        i2c.done();
    }

    #[test]
    fn read_half_word_is_big_endian() {
        let expectations = read(0xA1, &[0x30, 0x03]);
        let mut i2c = Mock::new(&expectations);
        let mut regs = RegisterAccess::new(&mut i2c, ADDR);

        assert_eq!(block_on(regs.read_half_word(0xA1)), Ok(0x3003));
        i2c.done();
    }

    #[test]
    fn failed_read_phase_returns_no_value() {
        let bus = Faulty {
            fail_at: 1,
            error: ErrorKind::Other,
            phases: 0,
        };
        let mut regs = RegisterAccess::new(bus, ADDR);
        let mut out = [0xEEu8; 2];

        let result = block_on(regs.read_array(0x80, &mut out));

        assert_eq!(result, Err(Error::Transfer(ErrorKind::Other)));
        assert_eq!(out, [0xEE, 0xEE]);
    }

    #[test]
    fn failed_address_phase_skips_the_read() {
        let bus = Faulty {
            fail_at: 0,
            error: ErrorKind::ArbitrationLoss,
            phases: 0,
        };
        let mut regs = RegisterAccess::new(bus, ADDR);

        assert_eq!(
            block_on(regs.read_byte(0x02)),
            Err(Error::Transfer(ErrorKind::ArbitrationLoss))
        );
        assert_eq!(regs.release().phases, 0);
    }

    #[test]
    fn writes_prefix_the_register_and_stay_big_endian() {
        let expectations = [
            Transaction::write(ADDR, vec![0xA5, 0x01]),
            Transaction::write(ADDR, vec![0x88, 0x12, 0x34]),
            Transaction::write(ADDR, vec![0x80, 0xDE, 0xAD, 0xBE, 0xEF]),
        ];
        let mut i2c = Mock::new(&expectations);
        let mut regs = RegisterAccess::new(&mut i2c, ADDR);

        block_on(async {
            regs.write_byte(0xA5, 0x01).await.unwrap();
            regs.write_half_word(0x88, 0x1234).await.unwrap();
            regs.write_word(0x80, 0xDEAD_BEEF).await.unwrap();
        });
        i2c.done();
    }

    #[test]
    fn failed_write_is_reported() {
        let expectations =
            [Transaction::write(ADDR, vec![0xA5, 0x03]).with_error(ErrorKind::Bus)];
        let mut i2c = Mock::new(&expectations);
        let mut regs = RegisterAccess::new(&mut i2c, ADDR);

        assert_eq!(
            block_on(regs.write_byte(0xA5, 0x03)),
            Err(Error::Transfer(ErrorKind::Bus))
        );
        i2c.done();
    }

    #[test]
    fn write_array_fills_the_buffer_to_capacity() {
        let data = [0x5Au8; BUFFER_CAPACITY - 1];
        let mut expected = vec![0x80];
        expected.extend_from_slice(&data);
        let expectations = [Transaction::write(ADDR, expected)];
        let mut i2c = Mock::new(&expectations);
        let mut regs = RegisterAccess::new(&mut i2c, ADDR);

        assert_eq!(block_on(regs.write_array(0x80, &data)), Ok(()));
        i2c.done();
    }

    #[test]
    fn oversized_write_is_refused_before_the_bus() {
        let mut i2c = Mock::new(&[]);
        let mut regs = RegisterAccess::new(&mut i2c, ADDR);

        let result = block_on(regs.write_array(0x80, &[0u8; BUFFER_CAPACITY]));

        assert_eq!(
            result,
            Err(Error::BufferTooSmall {
                requested: BUFFER_CAPACITY + 1,
                capacity: BUFFER_CAPACITY,
            })
        );
        i2c.done();
    }

    #[test]
    fn oversized_read_is_refused_before_the_bus() {
        let mut i2c = Mock::new(&[]);
        let mut regs = RegisterAccess::new(&mut i2c, ADDR);
        let mut out = [0u8; RX_CAPACITY + 1];

        assert_eq!(
            block_on(regs.read_array(0x03, &mut out)),
            Err(Error::BufferTooSmall {
                requested: RX_CAPACITY + 1,
                capacity: RX_CAPACITY,
            })
        );
        i2c.done();
    }

    #[test]
    fn raw_data_starts_at_register_zero() {
        let expectations = read(0x00, &[0x00, 0x00, 0x01]);
        let mut i2c = Mock::new(&expectations);
        let mut regs = RegisterAccess::new(&mut i2c, ADDR);
        let mut out = [0u8; 3];

        block_on(regs.read_raw_data(&mut out)).unwrap();

        assert_eq!(out, [0x00, 0x00, 0x01]);
        i2c.done();
    }
}
