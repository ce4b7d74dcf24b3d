//! Burst median filter
//!
//! The Sharp IR sensors produce occasional single-sample spikes. Each filtered read takes
//! a short burst of raw samples and keeps the median, which rejects those spikes without
//! any floating point work.

use heapless::Vec;

use super::{AnalogBus, SensorChannel};
use crate::config::{DEFAULT_SAMPLE_COUNT, MAX_SAMPLE_COUNT};

/// Median-of-N reader for one sensor channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalFilter {
    channel: SensorChannel,
    sample_count: usize,
}

impl SignalFilter {
    /// Creates a filter taking `sample_count` samples per read.
    ///
    /// Counts above [`MAX_SAMPLE_COUNT`] are capped silently, zero is raised to one.
    pub fn new(channel: SensorChannel, sample_count: usize) -> Self {
        Self {
            channel,
            sample_count: sample_count.clamp(1, MAX_SAMPLE_COUNT),
        }
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Takes a burst of samples from the bus and returns their median
    pub fn read<B: AnalogBus>(&self, bus: &mut B) -> u16 {
        let mut samples: Vec<u16, MAX_SAMPLE_COUNT> = Vec::new();
        for _ in 0..self.sample_count {
            // capacity is guaranteed by the clamp in `new`
            let _ = samples.push(bus.sample(self.channel));
        }
        median(&mut samples).unwrap_or(0)
    }
}

impl Default for SignalFilter {
    fn default() -> Self {
        Self::new(SensorChannel::Front, DEFAULT_SAMPLE_COUNT)
    }
}

/// Sorts `samples` in place and returns the element at index `len / 2`.
///
/// For an even count this is the upper of the two middle values, never their average.
pub fn median(samples: &mut [u16]) -> Option<u16> {
    if samples.is_empty() {
        return None;
    }
    samples.sort_unstable();
    Some(samples[samples.len() / 2])
}
