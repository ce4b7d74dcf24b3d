//! Battery voltage smoothing
//!
//! Turns raw readings of the VSYS divider into a pack voltage in millivolts, median
//! filtered over consecutive control ticks.
//!
//! # Voltage Calculations
//! ```text
//! Battery Voltage = (ADC Value * 3.3V * 3.0) / 4096
//! Where:
//! - 3.3V is ADC reference voltage
//! - 3.0 is voltage divider ratio
//! - 4096 is ADC resolution (12-bit)
//! ```
//!
//! The divider tops out at 9.9V, enough for a full 2S pack at 8.4V.
//!
//! # Failed conversions
//! A failed ADC read is skipped and the previous median stays in effect. Reading it as
//! 0V instead would trip the low battery halt, which is permanent.

use moving_median::MovingMedian;

/// ADC reference voltage (3.3V is RP2350's reference)
pub const REF_VOLTAGE: f32 = 3.3;

/// Hardware voltage divider ratio (3:1 scales battery voltage to ADC range)
pub const V_DIVIDER_RATIO: f32 = 3.0;

/// ADC resolution (12-bit = 4096 steps)
pub const ADC_RANGE: f32 = 4096.0;

/// Median filter window. Sampled every control tick, so a window of 9 spans 90ms and
/// hides motor current spikes.
pub const MEDIAN_WINDOW_SIZE: usize = 9;

/// Smoothed battery voltage
pub struct BatteryFilter {
    median_filter: MovingMedian<f32, MEDIAN_WINDOW_SIZE>,
    primed: bool,
}

impl BatteryFilter {
    pub fn new() -> Self {
        Self {
            median_filter: MovingMedian::<f32, MEDIAN_WINDOW_SIZE>::new(),
            primed: false,
        }
    }

    /// Adds one raw reading, `None` for a failed conversion, and returns the filtered
    /// voltage in millivolts.
    ///
    /// Returns `None` until the first successful reading.
    pub fn update(&mut self, raw: Option<u16>) -> Option<u16> {
        match raw {
            Some(raw) => {
                let voltage = f32::from(raw) * REF_VOLTAGE * V_DIVIDER_RATIO / ADC_RANGE;
                self.median_filter.add_value(voltage);
                self.primed = true;
            }
            None => warn!("battery reading failed, keeping the previous value"),
        }
        self.primed
            .then(|| (self.median_filter.median() * 1000.0) as u16)
    }
}

impl Default for BatteryFilter {
    fn default() -> Self {
        Self::new()
    }
}
