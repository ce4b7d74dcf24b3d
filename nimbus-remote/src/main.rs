//! Nimbus keyboard remote
//!
//! Drives the robot from the arrow keys over its serial link and prints whatever the
//! robot writes back.
//!
//! # Keys
//! - Arrows: drive while held, combinations add up
//! - Space: stop and forget held keys
//! - `s`: request a status line
//! - `q` / Esc / Ctrl-C: stop the robot and quit

use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;

mod drive;
mod link;
mod terminal;

use drive::KeyDrive;
use link::Link;

/// How long a read on the serial port waits before checking again
const READ_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Serial device of the robot, e.g. /dev/ttyUSB0
    port: String,

    #[arg(default_value_t = 9600)]
    baud: u32,

    /// Wheel speed for forward and backward
    #[arg(long, default_value_t = 255)]
    speed: i32,

    /// Share of the speed added and removed per wheel when turning
    #[arg(long, default_value_t = 0.85)]
    turn: f32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    terminal::install_hooks()?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let port = serialport::new(&cli.port, cli.baud)
        .timeout(READ_TIMEOUT)
        .open()
        .wrap_err_with(|| format!("opening {}", cli.port))?;
    let mut link = Link::new(port);
    link.echo_replies()?;

    terminal::init()?;
    let result = terminal::run(&mut link, KeyDrive::new(cli.speed, cli.turn));
    terminal::restore()?;
    result
}
