//! Drive the machine described by a device list on the first parallel port.
//!
//! ```text
//! RUST_LOG=debug cargo run --example machine_demo -- demos/conf [/dev/parport0]
//! ```
//!
//! Zeroes the machine, backs every stepper off by four steps and toggles
//! every on/off device four times.

use std::env;
use std::process::ExitCode;

use parport_actuators::port::DEFAULT_PORT;
use parport_actuators::{load_config, ActuatorGroup, PortError, PortHandle, Ppdev, StdDelay};

fn run(group: &mut ActuatorGroup<'_, Ppdev, StdDelay>) -> Result<(), PortError> {
    group.zero()?;
    for index in 0..group.steppers().len() {
        group.step(index, -4)?;
    }
    for index in 0..group.binaries().len() {
        for _ in 0..4 {
            group.toggle(index)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let conf = args.next().unwrap_or_else(|| "conf".to_string());
    let device = args.next().unwrap_or_else(|| DEFAULT_PORT.to_string());

    let config = match load_config(&conf) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Cannot load {}: {}", conf, e);
            return ExitCode::FAILURE;
        }
    };

    let mut port = PortHandle::new(Ppdev::new());
    if let Err(e) = port.open(&device) {
        eprintln!("Error on port {}: {}", device, e);
        return ExitCode::FAILURE;
    }

    let mut group = match ActuatorGroup::from_config(&config, &mut port, StdDelay::new()) {
        Ok(group) => group,
        Err(e) => {
            eprintln!("Cannot build {}: {}", config.name.as_str(), e);
            return ExitCode::FAILURE;
        }
    };
    print!("{}", group);

    if let Err(e) = run(&mut group) {
        eprintln!("Error on port {}: {}", device, e);
        return ExitCode::FAILURE;
    }

    print!("{}", group);
    ExitCode::SUCCESS
}
