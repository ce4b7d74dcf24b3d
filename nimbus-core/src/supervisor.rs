//! Control tick supervisor
//!
//! Runs one control tick in a fixed order:
//! 1. Battery check, a low reading halts the robot permanently
//! 2. Sensor snapshot
//! 3. Drain pending serial bytes into commands
//! 4. Step the state machine and arbitrate against operator overrides
//!
//! # Halted
//! Once the battery check fails the supervisor never senses, parses or steps the state
//! machine again. Every later tick stops the wheels and blinks the indicator red, until
//! the robot is power cycled.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::config::{OperationMode, Settings, ALERT_BLINK_INTERVAL, MAX_BYTES_PER_TICK};
use crate::error::CommandError;
use crate::motion::{Actuation, IndicatorColor, MotionController, MotorCommand};
use crate::protocol::{ByteSource, Command, CommandProtocol, StatusReport};
use crate::safety::{SafetyMonitor, SafetyVerdict};
use crate::sensor::{AnalogBus, SensorArray};

/// Diagnostics kept per tick, further ones are only logged
pub const MAX_REPLIES_PER_TICK: usize = 4;

/// Everything the firmware has to act on after one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    pub actuation: Actuation,
    /// Status line to write back, on STATUS or periodic reporting
    pub status: Option<StatusReport>,
    /// Usage diagnostics to write back
    pub replies: Vec<CommandError, MAX_REPLIES_PER_TICK>,
    /// Set on each blink of the low battery alert
    pub low_battery_alert: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Health {
    Running,
    Halted { since: Instant },
}

/// Operator overrides, either for one tick or latched in manual mode
#[derive(Debug, Clone, Copy, Default)]
struct Override {
    motors: Option<MotorCommand>,
    color: Option<IndicatorColor>,
}

/// Owns all robot state and sequences the components each tick
pub struct Supervisor {
    settings: Settings,
    safety: SafetyMonitor,
    controller: MotionController,
    protocol: CommandProtocol,
    latched: Override,
    health: Health,
    ticks: u32,
    alert_phase: Option<u64>,
}

impl Supervisor {
    pub fn new(settings: Settings) -> Self {
        Self::with_safety(settings, SafetyMonitor::new())
    }

    pub fn with_safety(settings: Settings, safety: SafetyMonitor) -> Self {
        info!("supervisor started in {} mode", settings.mode);
        Self {
            settings,
            safety,
            controller: MotionController::new(),
            protocol: CommandProtocol::new(),
            latched: Override::default(),
            health: Health::Running,
            ticks: 0,
            alert_phase: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn controller(&self) -> &MotionController {
        &self.controller
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.health, Health::Halted { .. })
    }

    /// Runs one control tick
    pub fn tick<B, S>(
        &mut self,
        power_mv: u16,
        sensors: &mut SensorArray<B>,
        serial: &mut S,
        now: Instant,
    ) -> TickOutput
    where
        B: AnalogBus,
        S: ByteSource,
    {
        if let Health::Halted { since } = self.health {
            return self.halted(since, now);
        }

        if self.safety.check(power_mv) == SafetyVerdict::LowPower {
            error!("battery at {} mV, halting", power_mv);
            self.health = Health::Halted { since: now };
            return self.halted(now, now);
        }

        let reading = sensors.snapshot();

        let mut output = TickOutput::default();
        let mut transient = Override::default();
        let mut status_requested = false;

        for _ in 0..MAX_BYTES_PER_TICK {
            let Some(byte) = serial.read_byte() else {
                break;
            };
            match self.protocol.feed(byte) {
                Some(Command::Status) => status_requested = true,
                Some(command) => self.accept(command, &mut transient),
                None => {}
            }
            if let Some(error) = self.protocol.take_error() {
                if error.wants_reply() && output.replies.push(error).is_err() {
                    warn!("too many malformed lines this tick");
                }
            }
        }

        let autonomous = self.controller.step(&reading, now);
        output.actuation = self.arbitrate(autonomous, transient);

        self.ticks = self.ticks.wrapping_add(1);
        let periodic = self
            .settings
            .status_period
            .is_some_and(|period| period > 0 && self.ticks % period == 0);
        if status_requested || periodic {
            output.status = Some(StatusReport::new(
                reading,
                self.safety.battery_percent(power_mv),
                output.actuation,
            ));
        }

        output
    }

    fn accept(&mut self, command: Command, transient: &mut Override) {
        let target = match self.settings.mode {
            OperationMode::Autonomous => {
                debug!("ignoring {} in autonomous mode", command);
                return;
            }
            OperationMode::Manual => &mut self.latched,
            OperationMode::Shared => transient,
        };

        match command {
            Command::Stop => target.motors = Some(MotorCommand::STOP),
            Command::SetSpeed(left, right) => target.motors = Some(MotorCommand::new(left, right)),
            Command::SetColor(r, g, b) => target.color = Some(IndicatorColor::new(r, g, b)),
            Command::Status => {}
        }
    }

    fn arbitrate(&self, autonomous: Actuation, transient: Override) -> Actuation {
        match self.settings.mode {
            OperationMode::Autonomous => autonomous,
            OperationMode::Shared => Actuation::new(
                transient.motors.unwrap_or(autonomous.motors),
                transient.color.unwrap_or(autonomous.color),
            ),
            OperationMode::Manual => Actuation::new(
                self.latched.motors.unwrap_or(MotorCommand::STOP),
                self.latched.color.unwrap_or(autonomous.color),
            ),
        }
    }

    fn halted(&mut self, since: Instant, now: Instant) -> TickOutput {
        let elapsed = now
            .checked_duration_since(since)
            .unwrap_or(Duration::from_ticks(0));
        let phase = elapsed.as_millis() / ALERT_BLINK_INTERVAL.as_millis();
        let lit = phase % 2 == 0;

        let low_battery_alert = lit && self.alert_phase != Some(phase);
        self.alert_phase = Some(phase);

        let color = if lit {
            IndicatorColor::RED
        } else {
            IndicatorColor::OFF
        };
        TickOutput {
            actuation: Actuation::new(MotorCommand::STOP, color),
            low_battery_alert,
            ..TickOutput::default()
        }
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
