//! RGB LED Indicator Module
//!
//! Shows the indicator color chosen by the control loop on a common cathode RGB LED,
//! one PWM channel per color.
use defmt::debug;
use embassy_rp::pwm;
use embassy_rp::pwm::SetDutyCycle;
use nimbus_core::IndicatorColor;

use crate::system::indicator;
use crate::system::resources::RGBLedResources;

/// Sets one LED channel to `level` out of 255
fn set_level(channel: &mut pwm::Pwm<'static>, level: u8) {
    let _ = channel.set_duty_cycle_fraction(u16::from(level), u16::from(u8::MAX));
}

#[embassy_executor::task]
pub async fn rgb_led_indicate(r: RGBLedResources) {
    // configure pwm for rgb led, 100Hz
    let desired_freq_hz = 100;
    let clock_freq_hz = embassy_rp::clocks::clk_sys_freq(); // 150MHz

    // Calculate minimum divider needed to keep period under 16-bit limit (65535)
    let divider = ((clock_freq_hz / desired_freq_hz) / 65535 + 1) as u8;
    let period = (clock_freq_hz / (desired_freq_hz * divider as u32)) as u16 - 1;

    let mut config = pwm::Config::default();
    config.divider = divider.into();
    config.top = period;

    let mut pwm_red = pwm::Pwm::new_output_a(r.pwm_red, r.red_pin, config.clone());
    let mut pwm_green = pwm::Pwm::new_output_a(r.pwm_green, r.green_pin, config.clone());
    let mut pwm_blue = pwm::Pwm::new_output_a(r.pwm_blue, r.blue_pin, config);

    // set initial color to off
    let _ = pwm_red.set_duty_cycle_fully_off();
    let _ = pwm_green.set_duty_cycle_fully_off();
    let _ = pwm_blue.set_duty_cycle_fully_off();
    let mut shown = IndicatorColor::OFF;

    loop {
        let color = indicator::wait().await;
        if color == shown {
            continue;
        }
        debug!("indicator {}", color);

        set_level(&mut pwm_red, color.r);
        set_level(&mut pwm_green, color.g);
        set_level(&mut pwm_blue, color.b);
        shown = color;
    }
}
