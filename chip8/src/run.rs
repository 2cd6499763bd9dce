use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use log::info;

use emu8::{Chip8, Config, HaltReason, RunState};

use crate::frontend::SdlFrontend;

/// Runs `rom` in a window until the user quits or the program faults
pub fn run(rom: &Path, config: Config, scale: u32) -> anyhow::Result<()> {
    let mut chip8 = Chip8::new(config);

    let file = File::open(rom).with_context(|| format!("unable to open {}", rom.display()))?;
    chip8
        .load_rom(&mut BufReader::new(file))
        .with_context(|| format!("unable to load {}", rom.display()))?;

    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut frontend = SdlFrontend::new(&sdl, scale)?;

    // Sleep for roughly one instruction per pass; advance() catches up on oversleeping
    let clock_hz = chip8.config().clock_hz;
    let cycle_time = Duration::from_secs(1) / clock_hz;
    let mut last_cycle = Instant::now();

    info!("running at {} Hz", clock_hz);
    while !chip8.is_halted() {
        let current_time = Instant::now();
        chip8.advance(current_time - last_cycle, &mut frontend);
        last_cycle = current_time;

        let spent = current_time.elapsed();
        if cycle_time > spent {
            thread::sleep(cycle_time - spent);
        }
    }

    outcome(chip8.run_state(), frontend.take_failure())
}

/// Only a quit the user asked for is a success
fn outcome(run_state: &RunState, display_failure: Option<display::Error>) -> anyhow::Result<()> {
    if let Some(e) = display_failure {
        return Err(anyhow::Error::new(e).context("display stopped working"));
    }
    match run_state {
        RunState::Halted(HaltReason::Fault(report)) => Err(anyhow::Error::new((**report).clone())),
        _ => Ok(()),
    }
}
