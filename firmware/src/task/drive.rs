//! Drive Task Module
//!
//! Applies the wheel speeds from the control loop to the TB6612FNG motor driver.
//!
//! Speeds arrive as signed values in `-255..=255`. The sign picks the direction and
//! the magnitude is scaled to the driver's duty percentage. A zero speed brakes the
//! wheel instead of letting it coast, so the robot stops where it was told to.

use defmt::{debug, info, warn};
use embassy_rp::gpio;
use embassy_rp::pwm;
use embassy_time::{Duration, Timer};
use nimbus_core::config::MAX_SPEED;
use nimbus_core::MotorCommand;
use tb6612fng::{DriveCommand, Motor, Tb6612fng};

use crate::system::drive_command;
use crate::system::resources::MotorDriverResources;

/// Time the driver needs after leaving standby
const WAKE_DELAY: Duration = Duration::from_millis(100);

/// Maps one wheel speed to a driver command
fn to_drive_command(speed: i16) -> DriveCommand {
    let duty = (i32::from(speed.unsigned_abs()) * 100 / i32::from(MAX_SPEED)).min(100) as u8;
    match speed {
        0 => DriveCommand::Brake,
        s if s > 0 => DriveCommand::Forward(duty),
        _ => DriveCommand::Backward(duty),
    }
}

#[embassy_executor::task]
pub async fn drive(r: MotorDriverResources) {
    // Configure PWM for motor control
    // We use 10kHz frequency as cheaper DC motors often work better at lower frequencies
    let desired_freq_hz = 10_000;
    let clock_freq_hz = embassy_rp::clocks::clk_sys_freq(); // 150MHz

    // Calculate minimum divider needed to keep period under 16-bit limit (65535)
    let divider = ((clock_freq_hz / desired_freq_hz) / 65535 + 1) as u8;
    let period = (clock_freq_hz / (desired_freq_hz * divider as u32)) as u16 - 1;

    let mut pwm_config = pwm::Config::default();
    pwm_config.divider = divider.into();
    pwm_config.top = period;

    let stby = gpio::Output::new(r.standby_pin, gpio::Level::Low);

    // motor A, here defined to be the left motor
    let left_fwd = gpio::Output::new(r.left_forward_pin, gpio::Level::Low);
    let left_bckw = gpio::Output::new(r.left_backward_pin, gpio::Level::Low);
    let left_pwm = pwm::Pwm::new_output_a(r.left_slice, r.left_pwm_pin, pwm_config.clone());

    // motor B, here defined to be the right motor
    let right_fwd = gpio::Output::new(r.right_forward_pin, gpio::Level::Low);
    let right_bckw = gpio::Output::new(r.right_backward_pin, gpio::Level::Low);
    let right_pwm = pwm::Pwm::new_output_b(r.right_slice, r.right_pwm_pin, pwm_config);

    let (Ok(left_motor), Ok(right_motor)) = (
        Motor::new(left_fwd, left_bckw, left_pwm),
        Motor::new(right_fwd, right_bckw, right_pwm),
    ) else {
        warn!("motor setup failed, drive task exiting");
        return;
    };
    let Ok(mut control) = Tb6612fng::new(left_motor, right_motor, stby) else {
        warn!("motor driver setup failed, drive task exiting");
        return;
    };

    if control.disable_standby().is_err() {
        warn!("could not wake the motor driver");
    }
    Timer::after(WAKE_DELAY).await;
    info!("motor driver ready");

    let mut applied: Option<MotorCommand> = None;
    loop {
        let command = drive_command::wait().await;
        if applied == Some(command) {
            continue;
        }
        debug!("drive L:{} R:{}", command.left, command.right);

        if control.motor_a.drive(to_drive_command(command.left)).is_err() {
            warn!("left motor command failed");
        }
        if control.motor_b.drive(to_drive_command(command.right)).is_err() {
            warn!("right motor command failed");
        }
        applied = Some(command);
    }
}
