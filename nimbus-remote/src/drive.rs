//! Arrow keys to wheel speeds
//!
//! Every held arrow contributes to both wheels: up and down add or remove the full speed,
//! left and right shift the turn speed from one wheel to the other. Holding up and left
//! together gives `(speed - turn, speed + turn)`.

use nimbus_core::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

impl Arrow {
    const ALL: [Arrow; 4] = [Arrow::Up, Arrow::Down, Arrow::Left, Arrow::Right];

    fn index(self) -> usize {
        self as usize
    }
}

/// Tracks held arrows and turns them into SPEED commands
#[derive(Debug)]
pub struct KeyDrive {
    speed: i32,
    turn_speed: i32,
    held: [bool; 4],
}

impl KeyDrive {
    /// `turn` is the share of `speed` used for turning, truncated to whole speed steps
    pub fn new(speed: i32, turn: f32) -> Self {
        Self {
            speed,
            turn_speed: (speed as f32 * turn) as i32,
            held: [false; 4],
        }
    }

    /// Returns the new command, `None` if the key was already held (auto-repeat)
    pub fn press(&mut self, arrow: Arrow) -> Option<Command> {
        if self.held[arrow.index()] {
            return None;
        }
        self.held[arrow.index()] = true;
        Some(self.command())
    }

    /// Returns the new command, `None` if the key was not held
    pub fn release(&mut self, arrow: Arrow) -> Option<Command> {
        if !self.held[arrow.index()] {
            return None;
        }
        self.held[arrow.index()] = false;
        Some(self.command())
    }

    /// Forgets every held key
    pub fn stop(&mut self) -> Command {
        self.held = [false; 4];
        Command::Stop
    }

    /// Wheel speeds for the keys held right now
    pub fn speeds(&self) -> (i32, i32) {
        Arrow::ALL
            .into_iter()
            .filter(|arrow| self.held[arrow.index()])
            .fold((0, 0), |(left, right), arrow| match arrow {
                Arrow::Up => (left + self.speed, right + self.speed),
                Arrow::Down => (left - self.speed, right - self.speed),
                Arrow::Left => (left - self.turn_speed, right + self.turn_speed),
                Arrow::Right => (left + self.turn_speed, right - self.turn_speed),
            })
    }

    fn command(&self) -> Command {
        let (left, right) = self.speeds();
        Command::SetSpeed(left, right)
    }
}
