//! Hardware Resource Management
//!
//! Allocates the robot's pins and peripherals to the tasks that own them.
//!
//! # Resource Groups
//! - Control: ADC with the three Sharp IR sensors and the battery divider, plus the
//!   serial port used for remote commands
//! - RGB LED: PWM-controlled indicator LED pins
//! - Motor Control: Dual motor driver pins and PWM channels
//!
//! The control loop is the only ADC user, so the ADC is owned by its resource group
//! instead of being shared behind a mutex.

use assign_resources::assign_resources;
use embassy_rp::peripherals;

assign_resources! {
    /// Sharp IR distance sensors and battery voltage, all read through the ADC
    sensors: SensorResources {
        adc: ADC,
        front_pin: PIN_26,
        left_pin: PIN_27,
        right_pin: PIN_28,
        vsys_pin: PIN_29,
    },
    /// Serial port for operator commands and status lines
    serial: SerialResources {
        uart: UART0,
        tx_pin: PIN_0,
        rx_pin: PIN_1,
    },
    /// PWM-controlled RGB LED indicator pins
    rgb_led: RGBLedResources {
        pwm_red: PWM_SLICE1,
        pwm_green: PWM_SLICE2,
        pwm_blue: PWM_SLICE3,
        red_pin: PIN_2,
        green_pin: PIN_4,
        blue_pin: PIN_6,
    },
    /// TB6612FNG dual motor driver pins and PWM channels
    motor_driver: MotorDriverResources {
        standby_pin: PIN_22,
        // Motor drive PWM
        left_slice: PWM_SLICE4,
        left_pwm_pin: PIN_8,
        left_forward_pin: PIN_21,
        left_backward_pin: PIN_20,
        // Motor drive PWM
        right_slice: PWM_SLICE7,
        right_pwm_pin: PIN_15,
        right_forward_pin: PIN_19,
        right_backward_pin: PIN_18,
    },
}
