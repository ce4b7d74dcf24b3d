//! Robot configuration
//!
//! Tuning constants for the Sharp IR sensors, the drive and the battery, plus the
//! build-time [`Settings`] that pick an override profile.
//!
//! Sensor values are in raw ADC counts scaled to the 10-bit range the constants were
//! tuned for; they grow as an obstacle gets closer.

use embassy_time::Duration;

/// Lowest reading considered "an obstacle is present"
pub const OBSTACLE_THRESHOLD: u16 = 150;

/// Wall distance the robot tries to keep while following.
/// Below it the robot steers towards the wall, at or above it steers away.
pub const FOLLOW_BAND: u16 = 400;

/// Highest reading the Sharp sensors produce in practice
pub const MAX_RANGE: u16 = 700;

/// Wheel speed ceiling (full PWM duty)
pub const MAX_SPEED: i16 = 255;

/// Speed of the inner wheel while turning in place to find a lost wall
pub const LOST_TURN_SPEED: i16 = 60;

/// Turn magnitude bounds when an obstacle is straight ahead
pub const FRONT_TURN_MIN: i16 = 150;
pub const FRONT_TURN_MAX: i16 = 500;

/// Slowest wheel speed used when steering along a wall
pub const FOLLOW_MIN_SPEED: i16 = 100;

/// How long to look for a lost wall before falling back to search
pub const LOST_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default number of raw samples per filtered sensor read
pub const DEFAULT_SAMPLE_COUNT: usize = 10;

/// Sample buffer size, requests above this are capped
pub const MAX_SAMPLE_COUNT: usize = 20;

/// Serial line buffer capacity in bytes. The terminator is not stored, so the longest
/// accepted line is one byte shorter.
pub const LINE_BUFFER_SIZE: usize = 128;

/// Maximum number of arguments kept after a command word
pub const CMD_MAX_ARGS: usize = 8;

/// Serial bytes consumed per tick at most, 9600 baud delivers about 10
pub const MAX_BYTES_PER_TICK: usize = 64;

/// Battery reading (millivolts, 2S Li-Ion) considered full: 4.2V per cell
pub const BATTERY_FULL_MV: u16 = 8400;

/// Battery reading (millivolts, 2S Li-Ion) at or below which driving stops: 3.2V per cell
pub const BATTERY_LOW_MV: u16 = 6400;

/// Blink half-period of the low-battery alert
pub const ALERT_BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Control loop period
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// How serial override commands interact with autonomous control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationMode {
    /// Only the state machine drives; STATUS is still answered
    Autonomous,
    /// Operator commands latch until replaced; the wheels stay stopped until the first SPEED
    Manual,
    /// A command overrides autonomous output for the tick it arrived in only
    #[default]
    Shared,
}

/// Build-time choices for one robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Override profile
    pub mode: OperationMode,
    /// Raw samples per filtered sensor read
    pub sample_count: usize,
    /// Emit a status line every n ticks, `None` to report only on STATUS
    pub status_period: Option<u32>,
}

impl Settings {
    /// Shared override, default filtering, no periodic status
    pub const fn new() -> Self {
        Self {
            mode: OperationMode::Shared,
            sample_count: DEFAULT_SAMPLE_COUNT,
            status_period: None,
        }
    }

    pub const fn with_mode(mut self, mode: OperationMode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn with_status_period(mut self, ticks: u32) -> Self {
        self.status_period = Some(ticks);
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
