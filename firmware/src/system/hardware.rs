//! Board adapters for the control core
//!
//! Connects the RP2350 peripherals to the hardware traits of `nimbus-core`: the ADC
//! becomes an [`AnalogBus`] for the Sharp sensors and the UART receiver becomes a
//! [`ByteSource`] for the command protocol.

use defmt::warn;
use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::gpio::Pull;
use nimbus_core::protocol::ByteSource;
use nimbus_core::sensor::{AnalogBus, SensorChannel};

use super::resources::SensorResources;

/// ADC reference voltage (3.3V is RP2350's reference)
const REF_MILLIVOLTS: u32 = 3300;

/// ADC resolution (12-bit = 4096 steps)
const ADC_RANGE: u32 = 4096;

/// The distance thresholds are tuned in 10-bit counts over a 5V reference
const TUNED_MILLIVOLTS: u32 = 5000;
const TUNED_RANGE: u32 = 1024;

/// The ADC with the three Sharp sensor inputs and the battery divider
pub struct SensorBus {
    adc: Adc<'static, Blocking>,
    front: Channel<'static>,
    left: Channel<'static>,
    right: Channel<'static>,
    vsys: Channel<'static>,
}

impl SensorBus {
    pub fn new(r: SensorResources) -> Self {
        Self {
            adc: Adc::new_blocking(r.adc, embassy_rp::adc::Config::default()),
            front: Channel::new_pin(r.front_pin, Pull::None),
            left: Channel::new_pin(r.left_pin, Pull::None),
            right: Channel::new_pin(r.right_pin, Pull::None),
            vsys: Channel::new_pin(r.vsys_pin, Pull::None),
        }
    }

    /// Raw 12-bit reading of the battery divider, `None` if the conversion failed
    pub fn read_vsys(&mut self) -> Option<u16> {
        read_raw(&mut self.adc, &mut self.vsys)
    }
}

impl AnalogBus for SensorBus {
    fn sample(&mut self, channel: SensorChannel) -> u16 {
        let pin = match channel {
            SensorChannel::Front => &mut self.front,
            SensorChannel::Left => &mut self.left,
            SensorChannel::Right => &mut self.right,
        };
        // a failed sensor conversion reads as "nothing in range"
        read_raw(&mut self.adc, pin).map_or(0, to_tuned_counts)
    }
}

fn read_raw(adc: &mut Adc<'static, Blocking>, channel: &mut Channel<'static>) -> Option<u16> {
    adc.blocking_read(channel)
        .inspect_err(|e| warn!("adc read failed: {}", defmt::Debug2Format(e)))
        .ok()
}

/// Rescales a 12-bit 3.3V reading to the 10-bit 5V counts the thresholds use
fn to_tuned_counts(raw: u16) -> u16 {
    let millivolts = u32::from(raw) * REF_MILLIVOLTS / ADC_RANGE;
    (millivolts * TUNED_RANGE / TUNED_MILLIVOLTS) as u16
}

/// Non-blocking UART receiver as a byte source
pub struct SerialCommands<R> {
    rx: R,
}

impl<R> SerialCommands<R> {
    pub fn new(rx: R) -> Self {
        Self { rx }
    }
}

impl<R> ByteSource for SerialCommands<R>
where
    R: embedded_hal_nb::serial::Read<u8>,
{
    fn read_byte(&mut self) -> Option<u8> {
        match self.rx.read() {
            Ok(byte) => Some(byte),
            Err(nb::Error::WouldBlock) => None,
            Err(nb::Error::Other(e)) => {
                warn!("uart receive error: {}", defmt::Debug2Format(&e));
                None
            }
        }
    }
}
