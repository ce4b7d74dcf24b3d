//! System Indicator Module
//!
//! Carries the RGB color chosen by the control loop to the LED task.
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use nimbus_core::IndicatorColor;

/// Latest indicator color
///
/// Signalled every control tick, the LED task only touches the PWM when the color changes.
pub static INDICATOR_CHANGED: Signal<CriticalSectionRawMutex, IndicatorColor> = Signal::new();

/// Sends a new indicator color
pub fn update(color: IndicatorColor) {
    INDICATOR_CHANGED.signal(color);
}

/// Waits for the next indicator color
pub async fn wait() -> IndicatorColor {
    INDICATOR_CHANGED.wait().await
}
