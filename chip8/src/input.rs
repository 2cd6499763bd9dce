use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::EventPump;

use emu8::constants::KEY_COUNT;
use emu8::InputSnapshot;

use crate::keymap::keymap;

/// Turns SDL events into keypad snapshots
pub struct Keyboard {
    events: EventPump,
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new(events: EventPump) -> Self {
        Keyboard {
            events,
            keys: [false; KEY_COUNT],
        }
    }

    /// Drains pending events. Keys stay pressed across polls until they're released.
    pub fn poll(&mut self) -> InputSnapshot {
        let mut snapshot = InputSnapshot {
            keys: self.keys,
            ..InputSnapshot::default()
        };
        for event in self.events.poll_iter() {
            record(&mut snapshot, &event);
        }
        self.keys = snapshot.keys;
        snapshot
    }
}

/// Folds a single event into `snapshot`
fn record(snapshot: &mut InputSnapshot, event: &Event) {
    match *event {
        Event::Quit { .. }
        | Event::KeyDown {
            scancode: Some(Scancode::Escape),
            ..
        } => snapshot.quit = true,
        Event::KeyDown {
            scancode: Some(scancode),
            repeat,
            ..
        } => {
            if let Some(key) = keymap(scancode) {
                snapshot.keys[usize::from(key)] = true;
                if !repeat && snapshot.key_down.is_none() {
                    snapshot.key_down = Some(key);
                }
            }
        }
        Event::KeyUp {
            scancode: Some(scancode),
            ..
        } => {
            if let Some(key) = keymap(scancode) {
                snapshot.keys[usize::from(key)] = false;
            }
        }
        _ => {}
    }
}
