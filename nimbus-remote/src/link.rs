//! Serial link to the robot

use std::io::{self, BufRead, BufReader, Write};
use std::thread;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use nimbus_core::Command;
use serialport::SerialPort;
use tracing::{debug, warn};

pub struct Link {
    port: Box<dyn SerialPort>,
}

impl Link {
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    /// Writes one command line
    pub fn send(&mut self, command: &Command) -> Result<()> {
        debug!(%command, "sending");
        writeln!(self.port, "{command}").wrap_err("writing to the robot")?;
        self.port.flush().wrap_err("writing to the robot")
    }

    /// Prints every line the robot writes back, from a background thread
    pub fn echo_replies(&self) -> Result<()> {
        let port = self.port.try_clone().wrap_err("cloning the serial port")?;
        thread::spawn(move || {
            let mut reader = BufReader::new(port);
            let mut line = String::new();
            loop {
                match reader.read_line(&mut line) {
                    // the robot closed the port
                    Ok(0) => break,
                    Ok(_) => {
                        // raw mode needs an explicit carriage return
                        print!("{}\r\n", line.trim_end());
                        line.clear();
                    }
                    Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                    Err(e) => {
                        warn!(error = %e, "serial read failed, no more replies");
                        break;
                    }
                }
            }
        });
        Ok(())
    }
}
