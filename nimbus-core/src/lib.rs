//! Nimbus robot control core
//!
//! Hardware-independent logic of the Nimbus wall-following robot:
//! - Median filtering of the Sharp IR distance sensors
//! - The search / follow / lost behavior state machine
//! - The line-based serial override protocol
//! - Battery voltage smoothing and low-battery supervision
//!
//! Hardware is reached through the [`sensor::AnalogBus`] and [`protocol::ByteSource`]
//! traits, so everything here runs on the host for testing and on the RP2350 in the
//! firmware crate.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to the other modules
#[macro_use]
mod fmt;

pub mod battery;
pub mod config;
pub mod error;
pub mod mapping;
pub mod motion;
pub mod protocol;
pub mod safety;
pub mod sensor;
pub mod supervisor;

pub use battery::BatteryFilter;
pub use error::CommandError;
pub use mapping::map_clamped;
pub use motion::{Actuation, IndicatorColor, MotionController, MotorCommand, RobotState, Side};
pub use protocol::{Command, CommandProtocol};
pub use safety::{SafetyMonitor, SafetyVerdict};
pub use sensor::{SensorArray, SensorReading, SignalFilter};
pub use supervisor::{Supervisor, TickOutput};
