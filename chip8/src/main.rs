use std::path::PathBuf;

use clap::Parser;

use chip8_core::CLOCK_SPEED;

mod beeper;
mod keymap;
mod run;

/// Runs a Chip-8 ROM in an SDL2 window
///
/// Keys 1234/QWER/ASDF/ZXCV are the keypad, hold Space to run unthrottled
/// and press Escape to quit. Set RUST_LOG=trace to see every instruction.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions per second
    #[arg(short, long, default_value_t = 1_000_000_000 / CLOCK_SPEED)]
    ips: u64,

    /// Size multiplier for each pixel
    #[arg(short, long, default_value_t = 10)]
    scale: u32,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Tick the timers every N instructions instead of at 60Hz
    #[arg(long, value_name = "N")]
    per_step_timers: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    run::run(run::Settings {
        rom: args.rom,
        ips: args.ips,
        scale: args.scale,
        seed: args.seed,
        per_step_timers: args.per_step_timers,
    })
}
