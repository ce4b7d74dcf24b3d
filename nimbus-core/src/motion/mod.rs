//! Wall-following state machine
//!
//! The robot drives straight until any sensor sees something, then follows that wall.
//! When the wall disappears it turns towards the side it was last seen on for a while
//! before giving up and searching again.
//!
//! # States
//! - Search: full speed ahead, yellow
//! - Follow: steer around obstacles in front (white) and keep the wall at
//!   [`FOLLOW_BAND`] on the right (green) or left (red)
//! - Lost: turn in place towards the last seen side (cyan right, magenta left) for up to
//!   [`LOST_TIMEOUT`]
//!
//! # Transitions
//! ```text
//! Search --obstacle--> Follow --nothing seen--> Lost --obstacle--> Follow
//!                                                 \--timeout or no side--> Search
//! ```
//! Entering Follow from Search or Lost, and Search from Lost, is evaluated in the same
//! tick. The tick that enters Lost repeats the previous output.

pub mod output;

pub use output::{Actuation, IndicatorColor, MotorCommand};

use embassy_time::{Duration, Instant};

use crate::config::{
    FOLLOW_BAND, FOLLOW_MIN_SPEED, FRONT_TURN_MAX, FRONT_TURN_MIN, LOST_TIMEOUT,
    LOST_TURN_SPEED, MAX_RANGE, MAX_SPEED, OBSTACLE_THRESHOLD,
};
use crate::mapping::map_clamped;
use crate::sensor::SensorReading;

/// Behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RobotState {
    Search,
    Follow,
    Lost,
}

/// Sensor that dominated the last Follow tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    #[default]
    None,
    Front,
    Left,
    Right,
}

/// Internal state, Lost carries its timer so it cannot outlive the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Search,
    Follow,
    Lost { since: Instant },
}

impl Behavior {
    fn state(&self) -> RobotState {
        match self {
            Behavior::Search => RobotState::Search,
            Behavior::Follow => RobotState::Follow,
            Behavior::Lost { .. } => RobotState::Lost,
        }
    }
}

/// The behavior state machine, stepped once per control tick
#[derive(Debug, Clone)]
pub struct MotionController {
    behavior: Behavior,
    side: Side,
    last: Actuation,
}

impl MotionController {
    pub const fn new() -> Self {
        Self {
            behavior: Behavior::Search,
            side: Side::None,
            last: Actuation::new(MotorCommand::STOP, IndicatorColor::OFF),
        }
    }

    pub fn state(&self) -> RobotState {
        self.behavior.state()
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Time spent in Lost so far, `None` in the other states
    pub fn lost_elapsed(&self, now: Instant) -> Option<Duration> {
        match self.behavior {
            Behavior::Lost { since } => Some(elapsed(since, now)),
            _ => None,
        }
    }

    /// Advances the state machine by one tick and returns the autonomous output
    pub fn step(&mut self, reading: &SensorReading, now: Instant) -> Actuation {
        let actuation = match self.behavior {
            Behavior::Search => self.search(reading, now),
            Behavior::Follow => self.follow(reading, now),
            Behavior::Lost { since } => self.lost(reading, since, now),
        };
        self.last = actuation;
        actuation
    }

    fn transition(&mut self, next: Behavior) {
        info!("state {} -> {}", self.behavior.state(), next.state());
        self.behavior = next;
    }

    fn search(&mut self, reading: &SensorReading, now: Instant) -> Actuation {
        if reading.any_obstacle() {
            self.transition(Behavior::Follow);
            return self.follow(reading, now);
        }
        Actuation::new(MotorCommand::FULL_AHEAD, IndicatorColor::YELLOW)
    }

    fn follow(&mut self, reading: &SensorReading, now: Instant) -> Actuation {
        let front = i32::from(reading.front);
        let left = i32::from(reading.left);
        let right = i32::from(reading.right);
        let threshold = i32::from(OBSTACLE_THRESHOLD);
        let max = i32::from(MAX_SPEED);

        if front > threshold {
            let turn = map_clamped(
                front,
                threshold,
                i32::from(MAX_RANGE),
                i32::from(FRONT_TURN_MIN),
                i32::from(FRONT_TURN_MAX),
            );
            self.side = Side::Front;
            // turn away from the closer side wall
            let motors = if right >= left {
                MotorCommand::new(max - turn, max)
            } else {
                MotorCommand::new(max, max - turn)
            };
            return Actuation::new(motors, IndicatorColor::WHITE);
        }

        if right > threshold || left > threshold {
            return if right > left {
                self.side = Side::Right;
                let (closing_in, speed) = wall_steering(right);
                let motors = if closing_in {
                    MotorCommand::new(max, speed)
                } else {
                    MotorCommand::new(speed, max)
                };
                Actuation::new(motors, IndicatorColor::GREEN)
            } else {
                self.side = Side::Left;
                let (closing_in, speed) = wall_steering(left);
                let motors = if closing_in {
                    MotorCommand::new(speed, max)
                } else {
                    MotorCommand::new(max, speed)
                };
                Actuation::new(motors, IndicatorColor::RED)
            };
        }

        self.transition(Behavior::Lost { since: now });
        self.last
    }

    fn lost(&mut self, reading: &SensorReading, since: Instant, now: Instant) -> Actuation {
        if reading.any_obstacle() {
            self.transition(Behavior::Follow);
            return self.follow(reading, now);
        }

        if elapsed(since, now) >= LOST_TIMEOUT {
            self.transition(Behavior::Search);
            return self.search(reading, now);
        }

        match self.side {
            Side::Right => Actuation::new(
                MotorCommand::new(i32::from(MAX_SPEED), i32::from(LOST_TURN_SPEED)),
                IndicatorColor::CYAN,
            ),
            Side::Left => Actuation::new(
                MotorCommand::new(i32::from(LOST_TURN_SPEED), i32::from(MAX_SPEED)),
                IndicatorColor::MAGENTA,
            ),
            Side::Front | Side::None => {
                self.transition(Behavior::Search);
                self.search(reading, now)
            }
        }
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new()
    }
}

/// Speed for the wheel that steers along a side wall reading `distance`.
///
/// Returns `(true, speed)` when the robot is too far from the wall and slows the wheel on
/// the wall side to close in, `(false, speed)` when it is too close and slows the
/// opposite wheel to pull away.
fn wall_steering(distance: i32) -> (bool, i32) {
    let threshold = i32::from(OBSTACLE_THRESHOLD);
    let band = i32::from(FOLLOW_BAND);
    let min = i32::from(FOLLOW_MIN_SPEED);
    let max = i32::from(MAX_SPEED);

    if distance < band {
        (true, map_clamped(distance, threshold, band, min, max))
    } else {
        (false, map_clamped(distance, band, i32::from(MAX_RANGE), max, min))
    }
}

fn elapsed(since: Instant, now: Instant) -> Duration {
    now.checked_duration_since(since).unwrap_or(Duration::from_ticks(0))
}
