//! Human-readable status reports.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::actuator::{Actuator, BinaryActuator, SteppedActuator, DETACHED_OFFSET};
use crate::port::ParportBackend;

use super::ActuatorGroup;

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for BinaryActuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name())?;
        if self.offset() == DETACHED_OFFSET {
            writeln!(f, "Pin: none")?;
        } else {
            writeln!(f, "Pin: {}", self.offset())?;
        }
        writeln!(f, "Speed: {} toggles/minute", self.speed())?;
        writeln!(f, "State: {}", if self.get() { "on" } else { "off" })
    }
}

impl fmt::Display for SteppedActuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name())?;
        if self.offset() == DETACHED_OFFSET {
            writeln!(f, "Pins: none")?;
        } else {
            writeln!(f, "Pins: {},{}", self.offset(), self.offset() + 1)?;
        }
        writeln!(f, "Steps: {} step/{}", self.steps_per_unit(), self.unit())?;
        writeln!(f, "Speed: {} {}/minute", self.speed(), self.unit())?;
        writeln!(f, "Position: {} step", self.position())
    }
}

impl<B: ParportBackend, D: DelayNs> fmt::Display for ActuatorGroup<'_, B, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name())?;
        match self.port().name() {
            Ok(port) => writeln!(f, "Using open port: {}", port)?,
            Err(_) => writeln!(f, "Using closed port")?,
        }
        writeln!(f, "Actuators:")?;

        let steppers = self.steppers();
        writeln!(
            f,
            "{} Stepper motor{}{}",
            steppers.len(),
            plural(steppers.len()),
            if steppers.is_empty() { "" } else { ":" }
        )?;
        for stepper in steppers {
            write!(f, "{}", stepper)?;
        }

        let binaries = self.binaries();
        writeln!(
            f,
            "{} On/off device{}{}",
            binaries.len(),
            plural(binaries.len()),
            if binaries.is_empty() { "" } else { ":" }
        )?;
        for binary in binaries {
            write!(f, "{}", binary)?;
        }
        Ok(())
    }
}
