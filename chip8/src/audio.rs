use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

const TONE_HZ: f32 = 440.0;
const VOLUME: f32 = 0.2;

struct SquareWave {
    phase_inc: f32,
    phase: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase < 0.5 { VOLUME } else { -VOLUME };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// Plays a square wave while the sound timer runs
pub struct Beeper {
    device: AudioDevice<SquareWave>,
}

impl Beeper {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let audio = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(44_100),
            channels: Some(1),
            samples: None,
        };
        let device = audio.open_playback(None, &desired, |spec| SquareWave {
            phase_inc: TONE_HZ / spec.freq as f32,
            phase: 0.0,
        })?;
        Ok(Beeper { device })
    }

    pub fn beep(&mut self) {
        self.device.resume();
    }

    pub fn stop(&mut self) {
        self.device.pause();
    }
}
