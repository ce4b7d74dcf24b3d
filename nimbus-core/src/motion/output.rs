//! Actuator outputs of one control tick

use crate::config::MAX_SPEED;

/// Signed wheel speeds, bounded to `±MAX_SPEED`.
///
/// The sign selects the direction pin, the magnitude is the PWM duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorCommand {
    pub left: i16,
    pub right: i16,
}

impl MotorCommand {
    pub const STOP: Self = Self { left: 0, right: 0 };
    pub const FULL_AHEAD: Self = Self {
        left: MAX_SPEED,
        right: MAX_SPEED,
    };

    /// Builds a command, clamping each wheel to the speed ceiling
    pub fn new(left: i32, right: i32) -> Self {
        let bound = |speed: i32| speed.clamp(-i32::from(MAX_SPEED), i32::from(MAX_SPEED)) as i16;
        Self {
            left: bound(left),
            right: bound(right),
        }
    }
}

/// RGB status LED color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl IndicatorColor {
    pub const OFF: Self = Self::new(0, 0, 0);
    /// Searching for a wall
    pub const YELLOW: Self = Self::new(255, 255, 0);
    /// Obstacle straight ahead
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Following a wall on the right
    pub const GREEN: Self = Self::new(0, 255, 0);
    /// Following a wall on the left, also the low battery alert
    pub const RED: Self = Self::new(255, 0, 0);
    /// Wall lost on the right
    pub const CYAN: Self = Self::new(0, 255, 255);
    /// Wall lost on the left
    pub const MAGENTA: Self = Self::new(255, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Everything the actuators receive in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Actuation {
    pub motors: MotorCommand,
    pub color: IndicatorColor,
}

impl Actuation {
    pub const fn new(motors: MotorCommand, color: IndicatorColor) -> Self {
        Self { motors, color }
    }
}
