//! Sharp IR sensor array
//!
//! Three distance sensors (front, left, right), each read through its own
//! [`SignalFilter`]. A [`SensorArray::snapshot`] is taken once per control tick.

pub mod filter;

pub use filter::SignalFilter;

use crate::config::{DEFAULT_SAMPLE_COUNT, OBSTACLE_THRESHOLD};

/// Physical sensor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorChannel {
    Front,
    Left,
    Right,
}

/// Raw analog access to the sensor channels
///
/// Implemented by the firmware over the ADC and by test fakes on the host.
pub trait AnalogBus {
    /// Takes one raw sample from `channel`
    fn sample(&mut self, channel: SensorChannel) -> u16;
}

/// Filtered readings of all three sensors, captured in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    pub front: u16,
    pub left: u16,
    pub right: u16,
}

impl SensorReading {
    pub const fn new(front: u16, left: u16, right: u16) -> Self {
        Self { front, left, right }
    }

    /// True if any sensor sees an obstacle
    pub fn any_obstacle(&self) -> bool {
        self.front > OBSTACLE_THRESHOLD
            || self.left > OBSTACLE_THRESHOLD
            || self.right > OBSTACLE_THRESHOLD
    }
}

/// The three filtered sensors and the bus they are read from
pub struct SensorArray<B: AnalogBus> {
    bus: B,
    front: SignalFilter,
    left: SignalFilter,
    right: SignalFilter,
}

impl<B: AnalogBus> SensorArray<B> {
    pub fn new(bus: B) -> Self {
        Self::with_sample_count(bus, DEFAULT_SAMPLE_COUNT)
    }

    pub fn with_sample_count(bus: B, sample_count: usize) -> Self {
        Self {
            bus,
            front: SignalFilter::new(SensorChannel::Front, sample_count),
            left: SignalFilter::new(SensorChannel::Left, sample_count),
            right: SignalFilter::new(SensorChannel::Right, sample_count),
        }
    }

    /// Reads front, left and right, in that order
    pub fn snapshot(&mut self) -> SensorReading {
        let front = self.front.read(&mut self.bus);
        let left = self.left.read(&mut self.bus);
        let right = self.right.read(&mut self.bus);
        SensorReading { front, left, right }
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}
