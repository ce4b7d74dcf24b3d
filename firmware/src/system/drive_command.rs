//! Drive Command Module
//!
//! Carries the wheel speeds chosen by the control loop to the drive task. Only the
//! latest command matters, so an embassy-sync Signal is used: a command that was not
//! picked up yet is simply replaced.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use nimbus_core::MotorCommand;

/// Latest wheel speeds for the drive task
pub static DRIVE: Signal<CriticalSectionRawMutex, MotorCommand> = Signal::new();

/// Sends new wheel speeds
pub fn update(command: MotorCommand) {
    DRIVE.signal(command);
}

/// Waits for the next wheel speeds
pub async fn wait() -> MotorCommand {
    DRIVE.wait().await
}
