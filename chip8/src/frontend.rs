use anyhow::anyhow;
use log::{error, warn};

use display::Screen;
use emu8::{Audio, FrameBuffer, Input, InputSnapshot};

use crate::audio::Beeper;
use crate::input::Keyboard;

/// The window, keyboard and speaker of an SDL2 desktop
pub struct SdlFrontend {
    screen: Screen,
    keyboard: Keyboard,
    beeper: Option<Beeper>,
    /// Set when the window stopped working; the machine is told to quit at the same time
    failure: Option<display::Error>,
}

impl SdlFrontend {
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> anyhow::Result<Self> {
        let screen = Screen::new(sdl, scale)?;
        let keyboard = Keyboard::new(sdl.event_pump().map_err(|e| anyhow!(e))?);
        // a machine without a sound card can still play
        let beeper = match Beeper::new(sdl) {
            Ok(beeper) => Some(beeper),
            Err(e) => {
                warn!("running without sound: {}", e);
                None
            }
        };

        Ok(SdlFrontend {
            screen,
            keyboard,
            beeper,
            failure: None,
        })
    }

    /// The rendering error that ended the run, if any
    pub fn take_failure(&mut self) -> Option<display::Error> {
        self.failure.take()
    }
}

impl emu8::Display for SdlFrontend {
    fn render(&mut self, frame: &FrameBuffer) -> bool {
        match self.screen.render(frame) {
            Ok(()) => false,
            Err(e) => {
                error!("unable to render frame: {}", e);
                self.failure = Some(e);
                true
            }
        }
    }
}

impl Input for SdlFrontend {
    fn poll(&mut self) -> InputSnapshot {
        self.keyboard.poll()
    }
}

impl Audio for SdlFrontend {
    fn set_tone(&mut self, on: bool) {
        if let Some(beeper) = self.beeper.as_mut() {
            if on {
                beeper.beep();
            } else {
                beeper.stop();
            }
        }
    }
}
