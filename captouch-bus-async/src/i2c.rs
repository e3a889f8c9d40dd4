use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal::i2c::{ErrorType, Operation, SevenBitAddress};
use embedded_hal_async::i2c::I2c;

/// `Mutex`-based shared bus [`I2c`] implementation.
///
/// The touch drivers own their bus for the duration of every call and do not
/// lock anything themselves. Handing each driver its own `MutexI2cDevice`
/// serialises them on one physical bus.
///
/// The lock is held for one bus call. A register read issued as a single
/// `transaction` keeps its address phase and data phase together, so no other
/// driver can move the register pointer in between.
pub struct MutexI2cDevice<'a, M: RawMutex, BUS> {
    bus: &'a Mutex<M, BUS>,
}

impl<'a, M: RawMutex, BUS> MutexI2cDevice<'a, M, BUS> {
    /// Create a new [`MutexI2cDevice`].
    pub fn new(bus: &'a Mutex<M, BUS>) -> Self {
        Self { bus }
    }
}

impl<'a, M: RawMutex, BUS: ErrorType> ErrorType for MutexI2cDevice<'a, M, BUS> {
    type Error = BUS::Error;
}

impl<'a, M, BUS> I2c<SevenBitAddress> for MutexI2cDevice<'a, M, BUS>
where
    M: RawMutex,
    BUS: I2c<SevenBitAddress>,
{
    async fn read(&mut self, address: SevenBitAddress, read: &mut [u8]) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        bus.read(address, read).await.inspect_err(|err| {
            log::warn!("Error reading from 0x{address:02X}: {err:?}");
        })
    }

    async fn write(&mut self, address: SevenBitAddress, write: &[u8]) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        bus.write(address, write).await.inspect_err(|err| {
            log::warn!("Error writing to 0x{address:02X}: {err:?}");
        })
    }

    async fn write_read(
        &mut self,
        address: SevenBitAddress,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        bus.write_read(address, write, read)
            .await
            .inspect_err(|err| {
                log::warn!("Error in write-read with 0x{address:02X}: {err:?}");
            })
    }

    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        bus.transaction(address, operations)
            .await
            .inspect_err(|err| {
                log::warn!("Error in transaction with 0x{address:02X}: {err:?}");
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};

    #[test]
    fn devices_take_turns_on_one_bus() {
        let expectations = [
            Transaction::write(0x38, vec![0x00, 0x00]),
            Transaction::read(0x1A, vec![0x5A]),
            Transaction::write_read(0x38, vec![0x02], vec![0x01]),
        ];
        let bus = Mutex::<NoopRawMutex, _>::new(Mock::new(&expectations));

        {
            let mut touch = MutexI2cDevice::new(&bus);
            let mut other = MutexI2cDevice::new(&bus);
            let mut byte = [0u8; 1];

            block_on(async {
                touch.write(0x38, &[0x00, 0x00]).await.unwrap();
                other.read(0x1A, &mut byte).await.unwrap();
                assert_eq!(byte, [0x5A]);
                touch.write_read(0x38, &[0x02], &mut byte).await.unwrap();
                assert_eq!(byte, [0x01]);
            });
        }

        bus.into_inner().done();
    }

    #[test]
    fn register_read_runs_as_one_locked_transaction() {
        let expectations = [
            Transaction::transaction_start(0x38),
            Transaction::write(0x38, vec![0x02]),
            Transaction::read(0x38, vec![0x01]),
            Transaction::transaction_end(0x38),
        ];
        let bus = Mutex::<NoopRawMutex, _>::new(Mock::new(&expectations));

        {
            let mut touch = MutexI2cDevice::new(&bus);
            let mut byte = [0u8; 1];
            let mut ops = [Operation::Write(&[0x02]), Operation::Read(&mut byte)];

            block_on(touch.transaction(0x38, &mut ops)).unwrap();
            assert!(bus.try_lock().is_ok());
            assert_eq!(byte, [0x01]);
        }

        bus.into_inner().done();
    }

    #[test]
    fn bus_errors_pass_through_unchanged() {
        let expectations = [Transaction::write(0x38, vec![0xA5, 0x00]).with_error(ErrorKind::Other)];
        let bus = Mutex::<NoopRawMutex, _>::new(Mock::new(&expectations));

        {
            let mut touch = MutexI2cDevice::new(&bus);
            let result = block_on(touch.write(0x38, &[0xA5, 0x00]));
            assert_eq!(result, Err(ErrorKind::Other));
        }

        bus.into_inner().done();
    }
}
