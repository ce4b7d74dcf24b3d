//! Task implementations
pub mod control_loop;
pub mod drive;
pub mod rgb_led_indicate;
