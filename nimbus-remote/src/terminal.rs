//! Raw-mode keyboard loop

use std::io::{self, stdout};
use std::panic;

use color_eyre::eyre;
use color_eyre::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement,
};
use nimbus_core::Command;
use tracing::{info, warn};

use crate::drive::{Arrow, KeyDrive};
use crate::link::Link;

/// Switches to raw mode and asks for key release events where the terminal has them
pub fn init() -> Result<()> {
    enable_raw_mode()?;
    if supports_keyboard_enhancement()? {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    } else {
        warn!("terminal does not report key releases, arrows stay held until space");
    }
    Ok(())
}

/// Restore the terminal to its original state
pub fn restore() -> io::Result<()> {
    // popping is harmless when nothing was pushed
    execute!(stdout(), PopKeyboardEnhancementFlags)?;
    disable_raw_mode()
}

/// Replaces the standard color_eyre panic and error hooks with hooks that
/// restore the terminal before printing the panic or error.
pub fn install_hooks() -> Result<()> {
    let hook_builder = color_eyre::config::HookBuilder::default();
    let (panic_hook, eyre_hook) = hook_builder.into_hooks();

    let panic_hook = panic_hook.into_panic_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        panic_hook(panic_info);
    }));

    let eyre_hook = eyre_hook.into_eyre_hook();
    eyre::set_hook(Box::new(move |error| {
        let _ = restore();
        eyre_hook(error)
    }))?;

    Ok(())
}

/// Reads keys until the operator quits, the robot is stopped on the way out
pub fn run(link: &mut Link, mut drive: KeyDrive) -> Result<()> {
    info!("arrows drive, space stops, s asks for status, q quits");
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if is_quit(&key) {
            break;
        }
        if let Some(command) = handle_key(&mut drive, key) {
            link.send(&command)?;
            if let Command::SetSpeed(left, right) = command {
                print!("SPEED: {left} {right}\r\n");
            }
        }
    }
    link.send(&drive.stop())
}

fn is_quit(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && match key.code {
            KeyCode::Esc | KeyCode::Char('q') => true,
            KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        }
}

fn handle_key(drive: &mut KeyDrive, key: KeyEvent) -> Option<Command> {
    let arrow = match key.code {
        KeyCode::Up => Some(Arrow::Up),
        KeyCode::Down => Some(Arrow::Down),
        KeyCode::Left => Some(Arrow::Left),
        KeyCode::Right => Some(Arrow::Right),
        _ => None,
    };

    match (arrow, key.kind) {
        (Some(arrow), KeyEventKind::Press) => drive.press(arrow),
        (Some(arrow), KeyEventKind::Release) => drive.release(arrow),
        (None, KeyEventKind::Press) => match key.code {
            KeyCode::Char(' ') => Some(drive.stop()),
            KeyCode::Char('s') => Some(Command::Status),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    #[test]
    fn arrow_press_and_release_drive() {
        let mut drive = KeyDrive::new(255, 0.85);
        assert_eq!(
            handle_key(&mut drive, key(KeyCode::Up, KeyEventKind::Press)),
            Some(Command::SetSpeed(255, 255))
        );
        assert_eq!(
            handle_key(&mut drive, key(KeyCode::Up, KeyEventKind::Repeat)),
            None
        );
        assert_eq!(
            handle_key(&mut drive, key(KeyCode::Up, KeyEventKind::Release)),
            Some(Command::SetSpeed(0, 0))
        );
    }

    #[test]
    fn space_stops_and_s_requests_status() {
        let mut drive = KeyDrive::new(255, 0.85);
        handle_key(&mut drive, key(KeyCode::Left, KeyEventKind::Press));
        assert_eq!(
            handle_key(&mut drive, key(KeyCode::Char(' '), KeyEventKind::Press)),
            Some(Command::Stop)
        );
        assert_eq!(
            handle_key(&mut drive, key(KeyCode::Char('s'), KeyEventKind::Press)),
            Some(Command::Status)
        );
    }

    #[test]
    fn quit_keys() {
        assert!(is_quit(&key(KeyCode::Esc, KeyEventKind::Press)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&key(KeyCode::Char('c'), KeyEventKind::Press)));
    }
}
