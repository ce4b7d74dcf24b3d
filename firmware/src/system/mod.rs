//! Core system components for robot operation
pub mod drive_command;
pub mod hardware;
pub mod indicator;
pub mod resources;
