//! Core implementation of the FT5xxx touch controller driver.

use embedded_hal_async::i2c::{I2c, SevenBitAddress};
use heapless::Vec;

use crate::access::RegisterAccess;
use crate::conf::{Config, ModeWrite};
use crate::err::Error;
use crate::op::{
    DeviceMode, Gesture, InterruptMode, PowerMode, RunningState, ThresholdSettings,
    MODE_RESERVED_MASK,
};
use crate::point::TouchPoint;
use crate::reg::{Register, MAX_TOUCHES, TOUCH_SLOT_STRIDE};

/// Auto calibration register value that enables it; `0xFF` disables it.
const AUTO_CALIBRATION_ON: u8 = 0x00;
const AUTO_CALIBRATION_OFF: u8 = 0xFF;

/// A controller for FT5xxx-class capacitive touch panels.
pub struct TouchController<I2C> {
    regs: RegisterAccess<I2C>,
    config: Config,
}

impl<I2C: I2c<SevenBitAddress>> TouchController<I2C> {
    /// Creates a new `TouchController`.
    ///
    /// # Arguments
    ///
    /// * `i2c` - An I2C bus that implements `embedded-hal-async::i2c::I2c`.
    /// * `config` - Address, panel geometry, orientation and register map variant.
    pub fn new(i2c: I2C, config: Config) -> Self {
        Self {
            regs: RegisterAccess::new(i2c, config.address),
            config,
        }
    }

    /// The configuration the controller was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Raw access to the register space.
    pub fn registers(&mut self) -> &mut RegisterAccess<I2C> {
        &mut self.regs
    }

    /// Gives back the bus.
    pub fn release(self) -> I2C {
        self.regs.release()
    }

    /// Puts the controller into normal mode and logs its identification.
    pub async fn init(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_device_mode(DeviceMode::Normal)
            .await
            .inspect_err(|err| log::warn!("Error entering normal mode: {err:?}"))?;

        let library = self.library_version().await?;
        let firmware = self.firmware_id().await?;
        let vendor = self.chip_vendor().await?;
        log::info!(
            "Touch controller ready: library 0x{library:04X}, firmware 0x{firmware:02X}, vendor 0x{vendor:02X}"
        );
        Ok(())
    }

    /// Reads the first touch slot.
    pub async fn single_point(&mut self) -> Result<TouchPoint, Error<I2C::Error>> {
        let word = self.regs.read_word(Register::Touch1XHigh.into()).await?;
        Ok(self.decode(word))
    }

    /// Reads one touch slot, counted from zero.
    pub async fn slot_point(&mut self, slot: usize) -> Result<TouchPoint, Error<I2C::Error>> {
        if slot >= self.config.touch_map.slots() {
            log::warn!(
                "Touch slot {slot} is not mapped by {:?}",
                self.config.touch_map
            );
            return Err(Error::InvalidArgument);
        }
        let start = Register::touch_slot(slot).ok_or(Error::InvalidArgument)?;
        let word = self.regs.read_word(start).await?;
        Ok(self.decode(word))
    }

    /// Reads the first `n` touch slots in one transfer.
    ///
    /// `n` is clamped to the number of slots of the configured register map
    /// before anything is put on the bus. On failure no points are returned.
    pub async fn multi_point(
        &mut self,
        n: usize,
    ) -> Result<Vec<TouchPoint, MAX_TOUCHES>, Error<I2C::Error>> {
        let n = n.min(self.config.touch_map.slots());
        let mut points = Vec::new();
        if n == 0 {
            return Ok(points);
        }

        let mut raw = [0u8; MAX_TOUCHES * TOUCH_SLOT_STRIDE];
        let raw = &mut raw[..n * TOUCH_SLOT_STRIDE];
        self.regs
            .read_array(Register::Touch1XHigh.into(), raw)
            .await?;

        for slot in raw.chunks_exact(TOUCH_SLOT_STRIDE) {
            let point = TouchPoint::from_slot(
                [slot[0], slot[1], slot[2], slot[3]],
                self.config.orientation,
                &self.config.screen,
            );
            // n never exceeds MAX_TOUCHES
            points.push(point).ok();
        }
        Ok(points)
    }

    /// Reads the touch count, then every active slot.
    pub async fn touches(&mut self) -> Result<Vec<TouchPoint, MAX_TOUCHES>, Error<I2C::Error>> {
        let count = self.touch_count().await?;
        self.multi_point(count as usize).await
    }

    /// Returns `true` while at least one finger is on the panel.
    pub async fn touch_present(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.touch_count().await? > 0)
    }

    /// Reads the number of active touch points.
    pub async fn touch_count(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.regs.read_byte(Register::TouchStatus.into()).await
    }

    /// Reads the device mode; the two reserved bits are masked off.
    pub async fn device_mode(&mut self) -> Result<DeviceMode, Error<I2C::Error>> {
        let raw = self.regs.read_byte(Register::DeviceMode.into()).await?;
        DeviceMode::try_from(raw).map_err(unexpected(Register::DeviceMode))
    }

    /// Writes the device mode according to [`Config::mode_write`].
    pub async fn set_device_mode(&mut self, mode: DeviceMode) -> Result<(), Error<I2C::Error>> {
        let value = match self.config.mode_write {
            ModeWrite::PreserveReserved => {
                let current = self.regs.read_byte(Register::DeviceMode.into()).await?;
                (current & MODE_RESERVED_MASK) | mode as u8
            }
            ModeWrite::Overwrite => mode as u8,
        };
        self.regs
            .write_byte(Register::DeviceMode.into(), value)
            .await
    }

    /// Reads the detected gesture.
    pub async fn gesture(&mut self) -> Result<Gesture, Error<I2C::Error>> {
        let raw = self.regs.read_byte(Register::GestureId.into()).await?;
        Ok(Gesture::from(raw))
    }

    /// Reads the running state of the controller firmware.
    pub async fn state(&mut self) -> Result<RunningState, Error<I2C::Error>> {
        let raw = self.regs.read_byte(Register::RunningState.into()).await?;
        RunningState::try_from(raw).map_err(unexpected(Register::RunningState))
    }

    /// Reads the threshold group.
    pub async fn threshold_settings(&mut self) -> Result<ThresholdSettings, Error<I2C::Error>> {
        let mut raw = [0u8; 6];
        self.regs
            .read_array(Register::ThresholdGroup.into(), &mut raw)
            .await?;
        Ok(ThresholdSettings::from_wire(raw))
    }

    /// Writes the threshold group. `threshold` is truncated to a multiple of four.
    pub async fn set_threshold_settings(
        &mut self,
        settings: &ThresholdSettings,
    ) -> Result<(), Error<I2C::Error>> {
        let raw = settings.to_wire().ok_or_else(|| {
            log::warn!("Threshold {} does not fit the register", settings.threshold);
            Error::InvalidArgument
        })?;
        self.regs
            .write_array(Register::ThresholdGroup.into(), &raw)
            .await
    }

    /// Writes the threshold preset selected in [`Config::threshold_preset`].
    pub async fn set_threshold_defaults(&mut self) -> Result<(), Error<I2C::Error>> {
        let settings = self.config.threshold_preset.settings();
        self.set_threshold_settings(&settings).await
    }

    /// Reads the firmware library version.
    pub async fn library_version(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.regs
            .read_half_word(Register::LibraryVersionHigh.into())
            .await
    }

    /// Reads the firmware id.
    pub async fn firmware_id(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.regs.read_byte(Register::FirmwareId.into()).await
    }

    /// Reads the chip vendor id (the `CIPHER` register).
    pub async fn chip_vendor(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.regs.read_byte(Register::ChipVendor.into()).await
    }

    /// Reads the error code of the controller firmware; zero means no error.
    pub async fn error_code(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.regs.read_byte(Register::ErrorCode.into()).await
    }

    /// Reads the power mode.
    pub async fn power_mode(&mut self) -> Result<PowerMode, Error<I2C::Error>> {
        let raw = self.regs.read_byte(Register::PowerMode.into()).await?;
        PowerMode::try_from(raw).map_err(unexpected(Register::PowerMode))
    }

    /// Writes the power mode.
    pub async fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<I2C::Error>> {
        self.regs
            .write_byte(Register::PowerMode.into(), mode as u8)
            .await
    }

    /// Reads whether the interrupt line is level (polling) or pulsed (trigger).
    pub async fn interrupt_mode(&mut self) -> Result<InterruptMode, Error<I2C::Error>> {
        let raw = self.regs.read_byte(Register::InterruptMode.into()).await?;
        InterruptMode::try_from(raw).map_err(unexpected(Register::InterruptMode))
    }

    /// Writes the interrupt mode.
    pub async fn set_interrupt_mode(
        &mut self,
        mode: InterruptMode,
    ) -> Result<(), Error<I2C::Error>> {
        self.regs
            .write_byte(Register::InterruptMode.into(), mode as u8)
            .await
    }

    /// Returns `true` when auto calibration is enabled.
    pub async fn auto_calibration(&mut self) -> Result<bool, Error<I2C::Error>> {
        let raw = self.regs.read_byte(Register::AutoCalibration.into()).await?;
        match raw {
            AUTO_CALIBRATION_ON => Ok(true),
            AUTO_CALIBRATION_OFF => Ok(false),
            value => Err(unexpected(Register::AutoCalibration)(value)),
        }
    }

    /// Enables or disables auto calibration.
    pub async fn set_auto_calibration(&mut self, enabled: bool) -> Result<(), Error<I2C::Error>> {
        let value = if enabled {
            AUTO_CALIBRATION_ON
        } else {
            AUTO_CALIBRATION_OFF
        };
        self.regs
            .write_byte(Register::AutoCalibration.into(), value)
            .await
    }

    /// Reads the report period in active mode.
    pub async fn active_period(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.regs.read_byte(Register::ActivePeriod.into()).await
    }

    /// Writes the report period in active mode.
    pub async fn set_active_period(&mut self, period: u8) -> Result<(), Error<I2C::Error>> {
        self.regs
            .write_byte(Register::ActivePeriod.into(), period)
            .await
    }

    /// Reads the report period in monitor mode.
    pub async fn monitor_period(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.regs.read_byte(Register::MonitorPeriod.into()).await
    }

    /// Writes the report period in monitor mode.
    pub async fn set_monitor_period(&mut self, period: u8) -> Result<(), Error<I2C::Error>> {
        self.regs
            .write_byte(Register::MonitorPeriod.into(), period)
            .await
    }

    /// Reads the idle time, in seconds, before the controller drops into monitor mode.
    pub async fn monitor_timer(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.regs.read_byte(Register::MonitorTimer.into()).await
    }

    /// Writes the idle time, in seconds, before monitor mode.
    pub async fn set_monitor_timer(&mut self, seconds: u8) -> Result<(), Error<I2C::Error>> {
        self.regs
            .write_byte(Register::MonitorTimer.into(), seconds)
            .await
    }

    fn decode(&self, word: u32) -> TouchPoint {
        TouchPoint::decode(word, self.config.orientation, &self.config.screen)
    }
}

fn unexpected<E>(register: Register) -> impl Fn(u8) -> Error<E> {
    move |value| {
        log::warn!("Unexpected value 0x{value:02X} in register {register:?}");
        Error::UnexpectedValue { register, value }
    }
}
