use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

use chip8_core::{Tone, TIMER_FREQUENCY};

const PITCH: f32 = 440.0;
const VOLUME: f32 = 0.15;

/// A square wave that plays for `remaining` samples, then falls silent
pub struct SquareWave {
    phase_inc: f32,
    phase: f32,
    remaining: usize,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.remaining == 0 {
                0.0
            } else if self.phase <= 0.5 {
                VOLUME
            } else {
                -VOLUME
            };
            self.remaining = self.remaining.saturating_sub(1);
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// # Beeper
/// Plays the sound timer through SDL2 audio.
///
/// Each request replaces whatever is still playing with a tone lasting the
/// requested number of 60Hz ticks.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    samples_per_tick: usize,
}

impl Beeper {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let audio_subsystem = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(44_100),
            channels: Some(1),
            samples: None,
        };
        let device = audio_subsystem.open_playback(None, &desired, |spec| SquareWave {
            phase_inc: PITCH / spec.freq as f32,
            phase: 0.0,
            remaining: 0,
        })?;
        let samples_per_tick = device.spec().freq as usize / TIMER_FREQUENCY as usize;
        device.resume();

        Ok(Beeper {
            device,
            samples_per_tick,
        })
    }
}

impl Tone for Beeper {
    fn request_beep(&mut self, duration_ticks: u8) {
        let mut wave = self.device.lock();
        wave.remaining = usize::from(duration_ticks) * self.samples_per_tick;
    }
}
