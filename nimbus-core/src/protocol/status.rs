//! Status report line
//!
//! ```text
//! SHARP_FRONT 312; SHARP_LEFT 40; SHARP_RIGHT 188; BAT 87; SPEED 10 255; COLOR 255 255 255;
//! ```
//!
//! The line terminator is added by the writer.

use core::fmt;

use crate::motion::{Actuation, IndicatorColor, MotorCommand};
use crate::sensor::SensorReading;

/// Snapshot of one tick, as reported on STATUS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub reading: SensorReading,
    /// Battery charge in percent
    pub battery: u8,
    pub motors: MotorCommand,
    pub color: IndicatorColor,
}

impl StatusReport {
    pub fn new(reading: SensorReading, battery: u8, actuation: Actuation) -> Self {
        Self {
            reading,
            battery,
            motors: actuation.motors,
            color: actuation.color,
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SHARP_FRONT {}; SHARP_LEFT {}; SHARP_RIGHT {}; BAT {}; SPEED {} {}; COLOR {} {} {};",
            self.reading.front,
            self.reading.left,
            self.reading.right,
            self.battery,
            self.motors.left,
            self.motors.right,
            self.color.r,
            self.color.g,
            self.color.b,
        )
    }
}
