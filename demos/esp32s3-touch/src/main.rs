#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those holding buffers for the duration of a data transfer."
)]

use captouch_bus_async::i2c::MutexI2cDevice;
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};
use esp_hal::i2c::master::I2c;
use esp_hal::Async;
use esp_hal::{clock::CpuClock, time::Rate, timer::systimer::SystemTimer};
use esp_println::println;
use ft5x_touch_async::conf::{Config, Orientation, TouchMap};
use ft5x_touch_async::op::Gesture;
use ft5x_touch_async::TouchController;
use log::{debug, info, warn};
use static_cell::StaticCell;

type SharedBus = Mutex<CriticalSectionRawMutex, I2c<'static, Async>>;
type Touch = TouchController<MutexI2cDevice<'static, CriticalSectionRawMutex, I2c<'static, Async>>>;

static TOUCH_BUS: StaticCell<SharedBus> = StaticCell::new();

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    println!("{}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
esp_bootloader_esp_idf::esp_app_desc!();

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger(log::LevelFilter::Debug);

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timer0 = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(timer0.alarm0);

    let config = esp_hal::i2c::master::Config::default().with_frequency(Rate::from_khz(100));
    let i2c = I2c::new(peripherals.I2C0, config)
        .unwrap()
        .with_sda(peripherals.GPIO13)
        .with_scl(peripherals.GPIO14)
        .into_async();
    let bus: &'static SharedBus = TOUCH_BUS.init(Mutex::new(i2c));

    let touch_config = Config::default()
        .with_orientation(Orientation::Deg270)
        .with_touch_map(TouchMap::MultiTouch);

    let mut touch = TouchController::new(MutexI2cDevice::new(bus), touch_config);
    match touch.init().await {
        Ok(_) => debug!("Touch controller initialized."),
        Err(err) => warn!("Error initializing touch controller: {err:?}"),
    };
    if let Err(err) = touch.set_threshold_defaults().await {
        warn!("Error writing touch thresholds: {err:?}");
    }

    // A second handle on the same bus, polled from its own task.
    let monitor = TouchController::new(MutexI2cDevice::new(bus), Config::default());

    spawner.spawn(read_touch(touch)).unwrap();
    spawner.spawn(watch_gestures(monitor)).unwrap();

    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// Continuously reads touch points and logs them.
#[embassy_executor::task]
async fn read_touch(mut touch: Touch) {
    loop {
        match touch.touches().await {
            Ok(points) if !points.is_empty() => info!("Touches detected {points:?}"),
            Ok(_) => {}
            Err(err) => warn!("Error receiving touch: {err:?}"),
        }
        Timer::after(Duration::from_millis(20)).await;
    }
}

/// Logs gestures and the controller running state.
#[embassy_executor::task]
async fn watch_gestures(mut touch: Touch) {
    loop {
        match touch.gesture().await {
            Ok(Gesture::None) => {}
            Ok(gesture) => info!("Gesture {gesture:?}"),
            Err(err) => warn!("Error reading gesture: {err:?}"),
        }
        if let Ok(state) = touch.state().await {
            debug!("Controller state {state:?}");
        }
        Timer::after(Duration::from_millis(200)).await;
    }
}
