//! Control Loop Task
//!
//! Runs the robot's fixed-rate control tick. Each tick measures the battery, hands the
//! sensors and the serial receiver to the [`Supervisor`], then publishes the resulting
//! wheel speeds and indicator color and writes any pending lines back to the operator.
//!
//! # Serial Output
//! - Usage diagnostics for malformed commands
//! - Status lines, on STATUS or periodically when configured
//! - `LOW BAT!` on every lit blink once the battery ran low
//!
//! # Debug Output
//! Every tick logs the behavior state, the wall side, the time spent in Lost, the
//! battery voltage and the chosen actuation at debug level.

use core::fmt::{Display, Write};

use defmt::{debug, info, warn};
use embassy_rp::uart::{self, Uart};
use embassy_time::{Instant, Ticker};
use heapless::String;
use nimbus_core::config::{Settings, TICK_INTERVAL};
use nimbus_core::{BatteryFilter, SensorArray, Supervisor};

use crate::system::hardware::{SensorBus, SerialCommands};
use crate::system::resources::{SensorResources, SerialResources};
use crate::system::{drive_command, indicator};

/// Serial line speed shared with the operator's terminal
const BAUD_RATE: u32 = 9600;

/// Longest line written back, a status line with every field at its widest fits
const OUTPUT_LINE_SIZE: usize = 128;

/// Printed on each blink of the low battery alert
const LOW_BATTERY_ALERT: &str = "LOW BAT!";

#[embassy_executor::task]
pub async fn control_loop(sensor_r: SensorResources, serial_r: SerialResources, settings: Settings) {
    let mut config = uart::Config::default();
    config.baudrate = BAUD_RATE;
    let uart = Uart::new_blocking(serial_r.uart, serial_r.tx_pin, serial_r.rx_pin, config);
    let (mut tx, rx) = uart.split();
    let mut commands = SerialCommands::new(rx);

    let mut supervisor = Supervisor::new(settings);
    let mut sensors =
        SensorArray::with_sample_count(SensorBus::new(sensor_r), supervisor.settings().sample_count);
    let mut battery = BatteryFilter::new();

    info!("control loop running every {} ms", TICK_INTERVAL.as_millis());
    let mut ticker = Ticker::every(TICK_INTERVAL);

    loop {
        // no tick runs before the battery has been measured once
        let Some(power_mv) = battery.update(sensors.bus_mut().read_vsys()) else {
            ticker.next().await;
            continue;
        };

        let now = Instant::now();
        let output = supervisor.tick(power_mv, &mut sensors, &mut commands, now);

        let controller = supervisor.controller();
        debug!(
            "{} side {} lost {} ms | bat {} mV | speed {} {} | color {} {} {}",
            controller.state(),
            controller.side(),
            controller.lost_elapsed(now).map(|lost| lost.as_millis()),
            power_mv,
            output.actuation.motors.left,
            output.actuation.motors.right,
            output.actuation.color.r,
            output.actuation.color.g,
            output.actuation.color.b,
        );

        drive_command::update(output.actuation.motors);
        indicator::update(output.actuation.color);

        let lines = output
            .replies
            .iter()
            .filter_map(format_line)
            .chain(output.status.as_ref().and_then(format_line))
            .chain(
                output
                    .low_battery_alert
                    .then_some(LOW_BATTERY_ALERT)
                    .and_then(|alert| format_line(&alert)),
            );
        for line in lines {
            if let Err(e) = tx.blocking_write(line.as_bytes()) {
                warn!("uart write failed: {}", defmt::Debug2Format(&e));
            }
        }

        ticker.next().await;
    }
}

/// Renders one newline-terminated output line
fn format_line(item: &impl Display) -> Option<String<OUTPUT_LINE_SIZE>> {
    let mut line = String::new();
    match writeln!(line, "{}", item) {
        Ok(()) => Some(line),
        Err(_) => {
            warn!("output line too long, dropped");
            None
        }
    }
}
