use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;

use emu8::constants::{DEFAULT_CLOCK_HZ, TIMER_HZ};
use emu8::{Config, Quirks};

mod audio;
mod frontend;
mod input;
mod keymap;
mod run;

/// A Chip-8 emulator
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the ROM to run
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(short, long, default_value_t = DEFAULT_CLOCK_HZ, value_parser = clap::value_parser!(u32).range(1..))]
    clock_hz: u32,

    /// Size of a Chip-8 pixel on screen
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    scale: u32,

    /// Make ADD I, Vx set VF when I passes 0xFFF
    #[arg(long)]
    add_i_overflow: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            clock_hz: self.clock_hz,
            timer_hz: TIMER_HZ,
            quirks: Quirks {
                add_i_sets_vf: self.add_i_overflow,
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    run::run(&args.rom, args.config(), args.scale)
}
