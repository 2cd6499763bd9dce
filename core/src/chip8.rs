use std::io::Read;
use std::time::Duration;

use log::{debug, error, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::constants::MAX_ROM_SIZE;
use crate::error::{Fault, FaultReport, LoadError};
use crate::instruction::Instruction;
use crate::io::Frontend;
use crate::operations::Flow;
use crate::state::{Keypad, State};

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Where the driver is in its lifecycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Suspended by `Fx0A` until a key goes down
    WaitingForKey { register: usize },
    /// No further instructions will execute
    Halted(HaltReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HaltReason {
    UserQuit,
    Fault(Box<FaultReport>),
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Owns the machine `state` and is the only thing that changes it. Runs two clocks off the time it
/// is given:
///  - instruction ticks at `config.clock_hz`, each of which polls input and executes one
///    instruction (or checks for the key an `Fx0A` is waiting on)
///  - timer ticks at `config.timer_hz`, each of which decrements the delay and sound timers
///
/// Supplies interfaces for:
/// - loading roms
/// - advancing either clock by a single tick, or both by an amount of wall time
/// - inspecting the state and why execution stopped
pub struct Chip8 {
    state: State,
    config: Config,
    rng: StdRng,
    run_state: RunState,
    tone: bool,
    cpu_credit: u128,
    timer_credit: u128,
}

impl Chip8 {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a machine whose `Cxkk` draws come from `rng`
    pub fn with_rng(config: Config, rng: StdRng) -> Self {
        Chip8 {
            state: State::new(),
            config,
            rng,
            run_state: RunState::Running,
            tone: false,
            cpu_credit: 0,
            timer_credit: 0,
        }
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    ///
    /// Stops reading one byte past the largest ROM that fits, so endless sources fail fast.
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), LoadError> {
        let mut rom = Vec::with_capacity(MAX_ROM_SIZE + 1);
        Read::take(reader, MAX_ROM_SIZE as u64 + 1).read_to_end(&mut rom)?;
        self.state.load_rom(&rom)?;
        info!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.run_state, RunState::Halted(_))
    }

    /// Stops execution as if the user had asked to
    pub fn quit(&mut self) {
        self.halt(HaltReason::UserQuit);
    }

    /// Runs every instruction and timer tick that falls due in `elapsed`, in the order they fall
    /// due. Time that doesn't add up to a whole tick carries over to the next call.
    pub fn advance<F: Frontend + ?Sized>(&mut self, elapsed: Duration, frontend: &mut F) {
        if self.is_halted() {
            return;
        }

        let clock_hz = u128::from(self.config.clock_hz);
        let timer_hz = u128::from(self.config.timer_hz);
        let nanos = elapsed.as_nanos();
        self.cpu_credit += nanos * clock_hz;
        self.timer_credit += nanos * timer_hz;

        while !self.is_halted() {
            let cpu_due = self.cpu_credit >= NANOS_PER_SECOND;
            let timer_due = self.timer_credit >= NANOS_PER_SECOND;
            let cpu_first = match (cpu_due, timer_due) {
                (false, false) => break,
                (true, false) => true,
                (false, true) => false,
                // the clock with more credit left over fell due longer ago
                (true, true) => {
                    (self.cpu_credit - NANOS_PER_SECOND) * timer_hz
                        >= (self.timer_credit - NANOS_PER_SECOND) * clock_hz
                }
            };

            if cpu_first {
                self.cpu_credit -= NANOS_PER_SECOND;
                self.cycle(frontend);
            } else {
                self.timer_credit -= NANOS_PER_SECOND;
                self.tick_timers(frontend);
            }
        }
    }

    /// A single instruction tick
    /// - polls input; quits if asked to
    /// - while awaiting a keypress, checks for one
    /// - otherwise gets and executes the next opcode
    /// - shows the frame if it changed
    pub fn cycle<F: Frontend + ?Sized>(&mut self, frontend: &mut F) {
        let waiting_on = match self.run_state {
            RunState::Running => None,
            RunState::WaitingForKey { register } => Some(register),
            RunState::Halted(_) => return,
        };

        let input = frontend.poll();
        self.state.keypad = Keypad::new(input.keys);

        if input.quit {
            self.quit();
        } else if let Some(register) = waiting_on {
            if let Some(key) = input.key_down {
                debug!("key {:X} pressed; storing it in V{:X}", key, register);
                self.state.v[register] = key;
                self.state.pc += 0x2;
                self.run_state = RunState::Running;
            }
        } else {
            self.step();
        }

        self.present(frontend);
        self.sync_tone(frontend);
    }

    /// A single timer tick
    pub fn tick_timers<F: Frontend + ?Sized>(&mut self, frontend: &mut F) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
        self.sync_tone(frontend);
    }

    fn step(&mut self) {
        let pc = self.state.pc;
        let op = match self.state.fetch() {
            Ok(op) => op,
            Err(fault) => return self.fault(fault, None),
        };

        let instruction = Instruction::decode(op);
        trace!(
            "{:04X}: {:04X} {} v{:02X?} i{:04X}",
            pc,
            op,
            instruction,
            self.state.v,
            self.state.i
        );

        match instruction.execute(&mut self.state, &self.config.quirks, &mut self.rng) {
            Ok(Flow::Next) => self.state.pc += 0x2,
            Ok(Flow::Skip) => self.state.pc += 0x4,
            Ok(Flow::Jump(addr)) => self.state.pc = addr,
            Ok(Flow::AwaitKey(register)) => {
                debug!("waiting for a key to store in V{:X}", register);
                self.run_state = RunState::WaitingForKey { register };
            }
            Ok(Flow::Unrecognized) => {
                warn!("skipping unrecognized opcode {:04X} at {:04X}", op, pc);
                self.state.pc += 0x2;
            }
            Err(fault) => self.fault(fault, Some(op)),
        }
    }

    fn fault(&mut self, fault: Fault, opcode: Option<u16>) {
        let report = FaultReport {
            fault,
            opcode,
            pc: self.state.pc,
            snapshot: self.state.snapshot(),
        };
        error!("halting on {}", report);
        self.halt(HaltReason::Fault(Box::new(report)));
    }

    fn halt(&mut self, reason: HaltReason) {
        if self.is_halted() {
            return;
        }
        if reason == HaltReason::UserQuit {
            info!("quit requested");
        }
        self.run_state = RunState::Halted(reason);
    }

    /// Hands the frame to the display if it changed; the draw flag stays set until it's been shown
    fn present<F: Frontend + ?Sized>(&mut self, frontend: &mut F) {
        if !self.state.draw_flag {
            return;
        }
        let quit = frontend.render(&self.state.frame_buffer);
        self.state.draw_flag = false;
        if quit {
            self.quit();
        }
    }

    /// The tone plays while the sound timer is non-zero, unless the machine has stopped
    fn sync_tone<F: Frontend + ?Sized>(&mut self, frontend: &mut F) {
        let on = self.state.sound_timer > 0 && !self.is_halted();
        if on != self.tone {
            self.tone = on;
            frontend.set_tone(on);
        }
    }
}
