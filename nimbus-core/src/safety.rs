//! Battery supervision
//!
//! Driving on a depleted 2S Li-Ion pack damages the cells, so a reading at or below
//! [`BATTERY_LOW_MV`] stops the robot for good.

use crate::config::{BATTERY_FULL_MV, BATTERY_LOW_MV};
use crate::mapping::map_clamped;

/// Outcome of one battery check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyVerdict {
    Ok,
    LowPower,
}

/// Compares battery readings (millivolts) against the low-power threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SafetyMonitor {
    low_mv: u16,
    full_mv: u16,
}

impl SafetyMonitor {
    pub const fn new() -> Self {
        Self::with_limits(BATTERY_LOW_MV, BATTERY_FULL_MV)
    }

    pub const fn with_limits(low_mv: u16, full_mv: u16) -> Self {
        Self { low_mv, full_mv }
    }

    pub fn check(&self, power_mv: u16) -> SafetyVerdict {
        if power_mv <= self.low_mv {
            SafetyVerdict::LowPower
        } else {
            SafetyVerdict::Ok
        }
    }

    /// Charge level in percent, linear between the low and full readings
    pub fn battery_percent(&self, power_mv: u16) -> u8 {
        map_clamped(
            i32::from(power_mv),
            i32::from(self.low_mv),
            i32::from(self.full_mv),
            0,
            100,
        ) as u8
    }
}

impl Default for SafetyMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_threshold_is_inclusive() {
        let monitor = SafetyMonitor::new();
        assert_eq!(monitor.check(BATTERY_LOW_MV), SafetyVerdict::LowPower);
        assert_eq!(monitor.check(BATTERY_LOW_MV - 1), SafetyVerdict::LowPower);
        assert_eq!(monitor.check(BATTERY_LOW_MV + 1), SafetyVerdict::Ok);
    }

    #[test]
    fn percent_spans_low_to_full() {
        let monitor = SafetyMonitor::with_limits(6400, 8400);
        assert_eq!(monitor.battery_percent(6400), 0);
        assert_eq!(monitor.battery_percent(7400), 50);
        assert_eq!(monitor.battery_percent(8400), 100);
        assert_eq!(monitor.battery_percent(9000), 100);
        assert_eq!(monitor.battery_percent(5000), 0);
    }
}
