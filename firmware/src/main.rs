//! Robot firmware entry point
//!
//! Initializes the system and spawns the control, drive and indicator tasks.

#![no_std]
#![no_main]

use crate::task::{control_loop::control_loop, drive::drive, rgb_led_indicate::rgb_led_indicate};
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use nimbus_core::config::Settings;
use system::resources::{
    AssignedResources, MotorDriverResources, RGBLedResources, SensorResources, SerialResources,
};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Override profile and reporting for this robot
const SETTINGS: Settings = Settings::new();

/// System core modules
mod system;
/// Task implementations
mod task;

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    // Split the resources into separate groups for each task
    let r = split_resources!(p);

    // Start the consumers before the control loop starts publishing
    spawner.spawn(drive(r.motor_driver)).unwrap();
    spawner.spawn(rgb_led_indicate(r.rgb_led)).unwrap();
    spawner
        .spawn(control_loop(r.sensors, r.serial, SETTINGS))
        .unwrap();
}
