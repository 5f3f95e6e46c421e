use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use log::{debug, info, warn};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chip8_core::{Config, Mute, TimerMode, Tone, VirtualMachine, TIMER_FREQUENCY};
use display::Display;

use crate::beeper::Beeper;
use crate::keymap::keymap;

/// How the host drives the virtual machine
pub struct Settings {
    pub rom: PathBuf,
    pub ips: u64,
    pub scale: u32,
    pub seed: Option<u64>,
    pub per_step_timers: Option<u32>,
}

impl Settings {
    fn config(&self) -> Config {
        Config {
            timer_mode: match self.per_step_timers {
                Some(n) => TimerMode::PerStep(n),
                None => TimerMode::Host,
            },
            seed: self.seed,
        }
    }
}

pub fn run(settings: Settings) -> anyhow::Result<()> {
    let rom = std::fs::read(&settings.rom)
        .with_context(|| format!("unable to read {}", settings.rom.display()))?;

    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, "Emu-8", settings.scale).map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;
    let tone: Box<dyn Tone> = match Beeper::new(&sdl) {
        Ok(beeper) => Box::new(beeper),
        Err(e) => {
            warn!("no audio ({}), running muted", e);
            Box::new(Mute)
        }
    };

    let mut vm = VirtualMachine::with_config(settings.config(), tone);
    vm.initialize()?;
    let size = vm.load(&rom)?;
    info!("loaded {} ({} bytes)", settings.rom.display(), size);
    debug!("program:\n{}", vm.program_dump());

    // Set initial timing
    let cycle_time = Duration::from_nanos(1_000_000_000 / settings.ips.max(1));
    let timer_period = Duration::from_nanos(1_000_000_000 / TIMER_FREQUENCY);
    let host_timers = vm.config().steps_per_tick().is_none();
    let mut last_cycle = Instant::now();
    let mut last_tick = Instant::now();

    // Whether or not the clock speed should be respected
    let mut fast_forward = false;

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => {
                        vm.set_key(kc, true)?;
                    }
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Escape, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => {
                        vm.set_key(kc, false)?;
                    }
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        let pc = vm.cpu().pc;
        vm.step()
            .with_context(|| format!("halted at {:#05X}", pc))?;

        let current_time = Instant::now();
        if host_timers && current_time - last_tick >= timer_period {
            vm.tick_timers()?;
            last_tick = current_time;
        }

        // If the frame changed, render it
        if let Some(frame) = vm.take_frame() {
            display.render(frame).map_err(|e| anyhow!(e))?;
        }

        // Handle timing
        let elapsed_cycle_time = current_time - last_cycle;
        if !fast_forward && cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = Instant::now();
    }

    info!("quit");
    Ok(())
}
