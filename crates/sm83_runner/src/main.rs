use std::fs;
use std::io::{self, BufWriter, Write};

use anyhow::{bail, Context, Result};
use clap::{crate_version, App, Arg};

use sm83::{InterruptTiming, Machine, MachineConfig, Serial, TraceLine};

fn main() -> Result<()> {
    env_logger::init();

    let matches = App::new("sm83_runner")
        .version(crate_version!())
        .about("Runs a Game Boy ROM on the SM83 core without video or sound")
        .arg(
            Arg::with_name("ROM")
                .help("Cartridge ROM image")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("boot-rom")
                .long("boot-rom")
                .value_name("PATH")
                .help("256-byte DMG boot ROM; start at 0x0000 instead of 0x0100")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("steps")
                .long("steps")
                .value_name("N")
                .help("Stop after N CPU steps")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("trace")
                .long("trace")
                .help("Print one register trace line per step to stdout"),
        )
        .arg(
            Arg::with_name("interrupt-timing")
                .long("interrupt-timing")
                .value_name("WHEN")
                .possible_values(&["after", "before"])
                .default_value("after")
                .help("Service interrupts after or before the instruction at PC"),
        )
        .get_matches();

    let interrupt_timing = match matches.value_of("interrupt-timing") {
        Some("before") => InterruptTiming::BeforeInstruction,
        _ => InterruptTiming::AfterInstruction,
    };
    let steps = match matches.value_of("steps") {
        Some(n) => Some(
            n.parse::<u64>()
                .with_context(|| format!("invalid step count '{}'", n))?,
        ),
        None => None,
    };

    let config = match matches.value_of("boot-rom") {
        Some(path) => {
            let image =
                fs::read(path).with_context(|| format!("failed to read boot ROM '{}'", path))?;
            MachineConfig::builder()
                .boot_rom(image)
                .interrupt_timing(interrupt_timing)
                .build()
        }
        None => MachineConfig::builder()
            .interrupt_timing(interrupt_timing)
            .build(),
    };

    let rom_path = match matches.value_of("ROM") {
        Some(path) => path,
        None => bail!("no ROM given"),
    };
    let rom = fs::read(rom_path).with_context(|| format!("failed to read ROM '{}'", rom_path))?;
    log::info!("Playing ROM path: '{}'", rom_path);

    let mut machine = Machine::new(config)?;
    machine.load_cartridge(&rom)?;
    machine.set_serial_interface(Box::new(Serial::with_sink(|byte| {
        let mut err = io::stderr();
        let _ = err.write_all(&[byte]);
        let _ = err.flush();
    })));

    if matches.is_present("trace") {
        let mut out = BufWriter::new(io::stdout());
        machine.cpu_mut().set_trace_sink(move |line: &TraceLine| {
            let _ = writeln!(out, "{}", line);
        });
    }

    let mut executed = 0u64;
    let mut cycles = 0u64;
    while steps.map_or(true, |limit| executed < limit) {
        cycles += u64::from(machine.step()?);
        executed += 1;
    }
    log::info!("{} steps, {} cycles", executed, cycles);
    Ok(())
}
