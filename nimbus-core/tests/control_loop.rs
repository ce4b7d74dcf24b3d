//! End-to-end control ticks against scripted hardware.

use std::collections::VecDeque;

use embassy_time::{Duration, Instant};
use nimbus_core::config::{
    OperationMode, Settings, BATTERY_LOW_MV, LOST_TIMEOUT, LOST_TURN_SPEED, MAX_BYTES_PER_TICK,
    MAX_SPEED,
};
use nimbus_core::protocol::{ByteSource, CommandWord};
use nimbus_core::sensor::{AnalogBus, SensorChannel};
use nimbus_core::supervisor::MAX_REPLIES_PER_TICK;
use nimbus_core::{
    CommandError, IndicatorColor, MotorCommand, RobotState, SensorArray, SensorReading, Side,
    Supervisor,
};

const GOOD_BATTERY: u16 = 8000;

/// Sensors that return a fixed reading per channel
#[derive(Default)]
struct FakeSensors {
    reading: SensorReading,
    samples: usize,
}

impl AnalogBus for FakeSensors {
    fn sample(&mut self, channel: SensorChannel) -> u16 {
        self.samples += 1;
        match channel {
            SensorChannel::Front => self.reading.front,
            SensorChannel::Left => self.reading.left,
            SensorChannel::Right => self.reading.right,
        }
    }
}

/// Serial input that hands out queued bytes
#[derive(Default)]
struct ScriptedSerial {
    bytes: VecDeque<u8>,
}

impl ScriptedSerial {
    fn send(&mut self, line: &str) {
        self.bytes.extend(line.bytes());
    }
}

impl ByteSource for ScriptedSerial {
    fn read_byte(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }
}

struct Rig {
    supervisor: Supervisor,
    sensors: SensorArray<FakeSensors>,
    serial: ScriptedSerial,
    clock_ms: u64,
}

impl Rig {
    fn new(settings: Settings) -> Self {
        Self {
            supervisor: Supervisor::new(settings),
            sensors: SensorArray::with_sample_count(FakeSensors::default(), settings.sample_count),
            serial: ScriptedSerial::default(),
            clock_ms: 0,
        }
    }

    fn see(&mut self, front: u16, left: u16, right: u16) {
        self.sensors.bus_mut().reading = SensorReading::new(front, left, right);
    }

    fn tick_with_power(&mut self, power_mv: u16) -> nimbus_core::TickOutput {
        let now = Instant::from_millis(self.clock_ms);
        self.clock_ms += 10;
        self.supervisor
            .tick(power_mv, &mut self.sensors, &mut self.serial, now)
    }

    fn tick(&mut self) -> nimbus_core::TickOutput {
        self.tick_with_power(GOOD_BATTERY)
    }

    fn now(&self) -> Instant {
        Instant::from_millis(self.clock_ms)
    }

    fn advance(&mut self, by: Duration) {
        self.clock_ms += by.as_millis();
    }
}

#[test]
fn follows_a_wall_then_recovers_and_searches() {
    let mut rig = Rig::new(Settings::default());

    rig.see(0, 0, 0);
    assert_eq!(rig.tick().actuation.motors, MotorCommand::FULL_AHEAD);

    rig.see(0, 0, 275);
    let following = rig.tick();
    assert_eq!(rig.supervisor.controller().state(), RobotState::Follow);
    assert_eq!(following.actuation.color, IndicatorColor::GREEN);

    rig.see(0, 0, 0);
    rig.tick();
    assert_eq!(rig.supervisor.controller().state(), RobotState::Lost);

    let turning = rig.tick();
    assert_eq!(
        turning.actuation.motors,
        MotorCommand { left: MAX_SPEED, right: LOST_TURN_SPEED }
    );
    assert_eq!(turning.actuation.color, IndicatorColor::CYAN);
    assert_eq!(rig.supervisor.controller().side(), Side::Right);

    rig.advance(LOST_TIMEOUT);
    let searching = rig.tick();
    assert_eq!(rig.supervisor.controller().state(), RobotState::Search);
    assert_eq!(searching.actuation.color, IndicatorColor::YELLOW);
}

#[test]
fn speed_override_lasts_one_tick_in_shared_mode() {
    let mut rig = Rig::new(Settings::default());
    rig.see(0, 0, 0);

    rig.serial.send("SPEED 100 -50\n");
    let overridden = rig.tick();
    assert_eq!(overridden.actuation.motors, MotorCommand { left: 100, right: -50 });
    assert_eq!(overridden.actuation.color, IndicatorColor::YELLOW);

    assert_eq!(rig.tick().actuation.motors, MotorCommand::FULL_AHEAD);
}

#[test]
fn override_does_not_freeze_the_state_machine() {
    let mut rig = Rig::new(Settings::default());
    rig.see(200, 0, 0);
    rig.serial.send("STOP\n");

    let out = rig.tick();
    assert_eq!(out.actuation.motors, MotorCommand::STOP);
    assert_eq!(rig.supervisor.controller().state(), RobotState::Follow);
    assert_eq!(rig.supervisor.controller().side(), Side::Front);
}

#[test]
fn color_override_keeps_autonomous_motors() {
    let mut rig = Rig::new(Settings::default());
    rig.see(0, 0, 0);
    rig.serial.send("color 1 2 3\n");

    let out = rig.tick();
    assert_eq!(out.actuation.color, IndicatorColor::new(1, 2, 3));
    assert_eq!(out.actuation.motors, MotorCommand::FULL_AHEAD);
}

#[test]
fn malformed_speed_is_answered_and_ignored() {
    let mut rig = Rig::new(Settings::default());
    rig.see(0, 0, 0);
    rig.serial.send("SPEED 100\n");

    let out = rig.tick();
    assert_eq!(out.actuation.motors, MotorCommand::FULL_AHEAD);
    assert_eq!(
        out.replies.as_slice(),
        [CommandError::Usage(CommandWord::Speed)]
    );
}

#[test]
fn unknown_words_are_not_answered() {
    let mut rig = Rig::new(Settings::default());
    rig.serial.send("DANCE\n");
    assert!(rig.tick().replies.is_empty());
}

#[test]
fn partial_line_waits_for_the_next_tick() {
    let mut rig = Rig::new(Settings::default());
    rig.see(0, 0, 0);

    rig.serial.send("SPEED 30 ");
    assert_eq!(rig.tick().actuation.motors, MotorCommand::FULL_AHEAD);

    rig.serial.send("40\n");
    assert_eq!(rig.tick().actuation.motors, MotorCommand { left: 30, right: 40 });
}

#[test]
fn status_reports_this_ticks_output() {
    let mut rig = Rig::new(Settings::default());
    rig.see(300, 0, 0);
    rig.serial.send("STATUS\n");

    let out = rig.tick();
    let status = out.status.expect("status requested");
    assert_eq!(
        status.to_string(),
        "SHARP_FRONT 300; SHARP_LEFT 0; SHARP_RIGHT 0; BAT 80; SPEED 10 255; COLOR 255 255 255;"
    );
    assert!(rig.tick().status.is_none());
}

#[test]
fn periodic_status_every_n_ticks() {
    let mut rig = Rig::new(Settings::new().with_status_period(3));
    let emitted: Vec<bool> = (0..6).map(|_| rig.tick().status.is_some()).collect();
    assert_eq!(emitted, [false, false, true, false, false, true]);
}

#[test]
fn autonomous_mode_ignores_overrides_but_answers_status() {
    let mut rig = Rig::new(Settings::new().with_mode(OperationMode::Autonomous));
    rig.see(0, 0, 0);
    rig.serial.send("SPEED -255 -255\nCOLOR 0 0 255\nSTATUS\n");

    let out = rig.tick();
    assert_eq!(out.actuation.motors, MotorCommand::FULL_AHEAD);
    assert_eq!(out.actuation.color, IndicatorColor::YELLOW);
    assert!(out.status.is_some());
}

#[test]
fn manual_mode_latches_operator_commands() {
    let mut rig = Rig::new(Settings::new().with_mode(OperationMode::Manual));
    rig.see(0, 0, 0);

    assert_eq!(rig.tick().actuation.motors, MotorCommand::STOP);

    rig.serial.send("SPEED 200 180\n");
    rig.tick();
    let held = rig.tick();
    assert_eq!(held.actuation.motors, MotorCommand { left: 200, right: 180 });
    assert_eq!(held.actuation.color, IndicatorColor::YELLOW);

    rig.serial.send("STOP\n");
    rig.tick();
    assert_eq!(rig.tick().actuation.motors, MotorCommand::STOP);
}

#[test]
fn low_battery_halts_for_good() {
    let mut rig = Rig::new(Settings::default());
    rig.see(0, 0, 0);
    rig.tick();

    let halted = rig.tick_with_power(BATTERY_LOW_MV);
    assert!(rig.supervisor.is_halted());
    assert_eq!(halted.actuation.motors, MotorCommand::STOP);
    assert_eq!(halted.actuation.color, IndicatorColor::RED);
    assert!(halted.low_battery_alert);

    let samples_at_halt = rig.sensors.bus_mut().samples;
    rig.serial.send("SPEED 255 255\n");
    for _ in 0..200 {
        let out = rig.tick();
        assert_eq!(out.actuation.motors, MotorCommand::STOP);
    }
    // no further sensing or parsing once halted
    assert_eq!(rig.sensors.bus_mut().samples, samples_at_halt);
    assert_eq!(rig.serial.bytes.len(), "SPEED 255 255\n".len());
}

#[test]
fn halted_indicator_blinks_and_alerts_once_per_blink() {
    let mut rig = Rig::new(Settings::default());
    rig.tick_with_power(0);

    let mut colors = Vec::new();
    let mut alerts = 0;
    // 10 ms ticks over two seconds
    for _ in 0..200 {
        let out = rig.tick();
        colors.push(out.actuation.color);
        alerts += usize::from(out.low_battery_alert);
    }

    assert!(colors.contains(&IndicatorColor::RED));
    assert!(colors.contains(&IndicatorColor::OFF));
    // the first lit phase alerted on the halting tick, two more start within two seconds
    assert_eq!(alerts, 2);
}

#[test]
fn low_battery_is_checked_before_sensing() {
    let mut rig = Rig::new(Settings::default());
    rig.tick_with_power(BATTERY_LOW_MV - 100);
    assert_eq!(rig.sensors.bus_mut().samples, 0);
}

#[test]
fn controller_reports_time_spent_lost() {
    let mut rig = Rig::new(Settings::default());
    rig.see(0, 0, 275);
    rig.tick();
    assert_eq!(rig.supervisor.controller().lost_elapsed(rig.now()), None);

    // lost from the 10 ms tick on
    rig.see(0, 0, 0);
    rig.tick();
    rig.advance(Duration::from_millis(30));

    let controller = rig.supervisor.controller();
    assert_eq!(controller.state(), RobotState::Lost);
    assert_eq!(controller.side(), Side::Right);
    assert_eq!(controller.lost_elapsed(rig.now()), Some(Duration::from_millis(40)));
}

#[test]
fn serial_bytes_beyond_the_tick_budget_wait_for_the_next_tick() {
    let mut rig = Rig::new(Settings::default());
    rig.see(0, 0, 0);
    let line = format!("{:60}SPEED 30 40\n", "");
    rig.serial.send(&line);

    assert_eq!(rig.tick().actuation.motors, MotorCommand::FULL_AHEAD);
    assert_eq!(rig.serial.bytes.len(), line.len() - MAX_BYTES_PER_TICK);

    assert_eq!(rig.tick().actuation.motors, MotorCommand { left: 30, right: 40 });
    assert!(rig.serial.bytes.is_empty());
}

#[test]
fn replies_are_capped_per_tick_without_dropping_commands() {
    let mut rig = Rig::new(Settings::default());
    rig.see(0, 0, 0);
    for _ in 0..6 {
        rig.serial.send("SPEED 1\n");
    }
    rig.serial.send("SPEED 5 6\n");

    let out = rig.tick();
    assert_eq!(out.replies.len(), MAX_REPLIES_PER_TICK);
    assert!(out
        .replies
        .iter()
        .all(|reply| *reply == CommandError::Usage(CommandWord::Speed)));
    assert_eq!(out.actuation.motors, MotorCommand { left: 5, right: 6 });
}
