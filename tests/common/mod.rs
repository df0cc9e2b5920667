//! Simulated-time test bench.
//!
//! A [`SimDelay`] advances a shared clock instead of sleeping, the
//! [`SimStepPin`] records the time of every rising edge on STEP, and the
//! [`SimSensor`] reads HIGH inside scripted time windows. Everything shares
//! one [`Bench`], so the timeline is exact to the nanosecond.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use stepper_sync::{
    ChannelState, DriverControl, DriverPins, MotorChannel, MotorId, PulseClock,
};

/// Shared timeline.
#[derive(Debug, Default)]
pub struct Bench {
    now_ns: Cell<u64>,
    edges_us: RefCell<Vec<u64>>,
}

impl Bench {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn now_us(&self) -> u64 {
        self.now_ns.get() / 1_000
    }

    /// Rising edges seen on STEP so far, in microseconds.
    pub fn edges(&self) -> Vec<u64> {
        self.edges_us.borrow().clone()
    }

    /// Spacing between consecutive rising edges.
    pub fn periods(&self) -> Vec<u64> {
        self.edges_us
            .borrow()
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect()
    }

    pub fn clear_edges(&self) {
        self.edges_us.borrow_mut().clear();
    }
}

/// Delay that moves the bench clock forward.
pub struct SimDelay(pub Rc<Bench>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.now_ns.set(self.0.now_ns.get() + ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.0.now_ns.set(self.0.now_ns.get() + us as u64 * 1_000);
    }
}

/// STEP line that timestamps its rising edges.
pub struct SimStepPin {
    bench: Rc<Bench>,
    high: bool,
}

impl SimStepPin {
    pub fn new(bench: Rc<Bench>) -> Self {
        Self { bench, high: false }
    }
}

impl ErrorType for SimStepPin {
    type Error = Infallible;
}

impl OutputPin for SimStepPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            self.bench.edges_us.borrow_mut().push(self.bench.now_us());
        }
        self.high = true;
        Ok(())
    }
}

/// Control line that accepts every write.
#[derive(Default)]
pub struct IdlePin;

impl ErrorType for IdlePin {
    type Error = Infallible;
}

impl OutputPin for IdlePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Sensor that reads HIGH inside `[start, end)` windows, in microseconds.
pub struct SimSensor {
    bench: Rc<Bench>,
    windows: Vec<(u64, u64)>,
}

impl SimSensor {
    pub fn new(bench: Rc<Bench>, windows: &[(u64, u64)]) -> Self {
        Self {
            bench,
            windows: windows.to_vec(),
        }
    }
}

impl ErrorType for SimSensor {
    type Error = Infallible;
}

impl InputPin for SimSensor {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let now = self.bench.now_us();
        Ok(self.windows.iter().any(|&(start, end)| now >= start && now < end))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub fn idle_pins() -> DriverPins<IdlePin> {
    DriverPins {
        dir: IdlePin,
        enable: IdlePin,
        sleep: IdlePin,
        reset: IdlePin,
        ms1: IdlePin,
        ms2: IdlePin,
        ms3: IdlePin,
    }
}

pub type SimChannel<'a> = MotorChannel<'a, SimStepPin, IdlePin, SimDelay>;

/// A channel wired to the bench, powered on but not started.
pub fn sim_channel<'a>(bench: &Rc<Bench>, id: MotorId, state: &'a ChannelState) -> SimChannel<'a> {
    let mut channel = MotorChannel::new(
        id,
        state,
        DriverControl::new(idle_pins()),
        PulseClock::new(SimStepPin::new(bench.clone()), SimDelay(bench.clone())),
        id == MotorId::Disc,
    );
    channel.begin().expect("power-on sequence");
    channel
}
