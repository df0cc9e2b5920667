//! Example: case and disc motors with a simulated position sensor.
//!
//! This example demonstrates how to:
//! - Load both channels and the sync parameters from TOML
//! - Build the channels and run them on their own threads
//! - Reconfigure and query the motors through the command port
//!
//! The pins only count pulses and the sensor is driven by the wall clock,
//! so no hardware is needed.
//!
//! Run with: `cargo run --example two_motor --features std`

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use stepper_sync::{
    error::Result, ChannelState, CommandPort, DriverPins, MotionSupervisor, MotorChannelBuilder,
    MotorId, PlainActivity, SyncController, SyncReport, SyncSettings, SyncedActivity,
};

static CASE: ChannelState = ChannelState::new();
static DISC: ChannelState = ChannelState::new();
static SYNC: SyncSettings = SyncSettings::new();
static REPORT: SyncReport = SyncReport::new();
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Delay provider backed by the OS scheduler.
struct ThreadDelay;

impl embedded_hal::delay::DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }
}

/// Output pin that counts rising edges.
struct CountingPin {
    high: bool,
    rising: Arc<AtomicU64>,
}

impl CountingPin {
    fn new(rising: Arc<AtomicU64>) -> Self {
        Self { high: false, rising }
    }

    fn quiet() -> Self {
        Self::new(Arc::new(AtomicU64::new(0)))
    }
}

impl embedded_hal::digital::ErrorType for CountingPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for CountingPin {
    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        if !self.high {
            self.rising.fetch_add(1, Ordering::Relaxed);
        }
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }
}

/// Sensor that sees the marker for 300 ms of every 2 s.
struct MarkerSensor {
    start: Instant,
}

impl embedded_hal::digital::ErrorType for MarkerSensor {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::InputPin for MarkerSensor {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(self.start.elapsed().as_millis() % 2_000 < 300)
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

fn driver_pins() -> DriverPins<CountingPin> {
    DriverPins {
        dir: CountingPin::quiet(),
        enable: CountingPin::quiet(),
        sleep: CountingPin::quiet(),
        reset: CountingPin::quiet(),
        ms1: CountingPin::quiet(),
        ms2: CountingPin::quiet(),
        ms3: CountingPin::quiet(),
    }
}

fn main() -> Result<()> {
    println!("=== Two Motor Example ===\n");

    let toml_content = r#"
# Case motor: plain continuous rotation
[case]
speed_hz = 250.0
microsteps = 4

# Disc motor: pauses at the sensor marker
[disc]
speed_hz = 400.0
microsteps = 8

[sync]
pause_ms = 500
confirm_steps = 20
debounce_ms = 10
"#;

    let config = stepper_sync::parse_config(toml_content)?;
    SYNC.apply(&config.sync);
    println!("Loaded configuration: {:?}\n", config);

    let case_pulses = Arc::new(AtomicU64::new(0));
    let disc_pulses = Arc::new(AtomicU64::new(0));

    let case = MotorChannelBuilder::new(MotorId::Case)
        .state(&CASE)
        .step_pin(CountingPin::new(case_pulses.clone()))
        .driver_pins(driver_pins())
        .delay(ThreadDelay)
        .from_config(&config)
        .build()?;
    let disc = MotorChannelBuilder::new(MotorId::Disc)
        .state(&DISC)
        .step_pin(CountingPin::new(disc_pulses.clone()))
        .driver_pins(driver_pins())
        .delay(ThreadDelay)
        .from_config(&config)
        .build()?;
    let sensor = MarkerSensor {
        start: Instant::now(),
    };

    let mut supervisor = MotionSupervisor::new(
        PlainActivity::new(case),
        SyncedActivity::new(disc, SyncController::new(sensor, &SYNC).with_report(&REPORT)),
    );
    supervisor.begin()?;

    let port = CommandPort::new(&CASE, &DISC, &SYNC).with_sync_report(&REPORT);

    let (case_cycles, disc_cycles) = std::thread::scope(|scope| {
        scope.spawn(|| {
            std::thread::sleep(Duration::from_secs(2));
            println!("-> case to 500 Hz, 1/8 step, reversed");
            if let Err(e) = port.set_motor_parameters(MotorId::Case, 500.0, 8, true) {
                println!("   rejected: {e}");
            }
            println!("-> asking for 1/3 step (unsupported)");
            if let Err(e) = port.set_motor_parameters(MotorId::Case, 500.0, 3, true) {
                println!("   rejected: {e}");
            }
            port.set_sync_parameters(250, 10);

            std::thread::sleep(Duration::from_secs(2));
            port.stop_all();
            SHUTDOWN.store(true, Ordering::Release);
        });
        supervisor.run(&SHUTDOWN)
    });

    println!("\n=== Status ===");
    for id in [MotorId::Case, MotorId::Disc] {
        let status = port.get_status(id);
        println!(
            "{}: {} Hz, 1/{} step, dir {}, {:.1} rpm, enabled {}",
            id.as_str(),
            status.speed_hz,
            status.resolution.value(),
            status.direction,
            status.rpm(config.channel(id).steps_per_revolution),
            status.enabled
        );
    }
    if let Some(sync) = port.get_sync_status() {
        println!(
            "sync: {:?}, {} pause episodes, last interval {:?} us",
            sync.phase, sync.episodes, sync.saved_interval_us
        );
    }
    println!(
        "pulses: case {} in {} cycles, disc {} in {} cycles",
        case_pulses.load(Ordering::Relaxed),
        case_cycles,
        disc_pulses.load(Ordering::Relaxed),
        disc_cycles
    );

    println!("\n=== Example Complete ===");
    Ok(())
}
