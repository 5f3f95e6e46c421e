/// # Tone
/// Something that can make a beep. The core never produces audio itself; it
/// only asks for a tone lasting a number of 60Hz timer ticks.
pub trait Tone {
    fn request_beep(&mut self, duration_ticks: u8);
}

/// Swallows every request
#[derive(Debug, Default)]
pub struct Mute;

impl Tone for Mute {
    fn request_beep(&mut self, _duration_ticks: u8) {}
}

/// Remembers every request, for inspecting what a program asked for
#[derive(Debug, Default)]
pub struct RecordingTone {
    pub requests: Vec<u8>,
}

impl Tone for RecordingTone {
    fn request_beep(&mut self, duration_ticks: u8) {
        self.requests.push(duration_ticks);
    }
}

impl<T: Tone + ?Sized> Tone for Box<T> {
    fn request_beep(&mut self, duration_ticks: u8) {
        (**self).request_beep(duration_ticks)
    }
}
