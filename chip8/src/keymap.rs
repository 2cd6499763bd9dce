use sdl2::keyboard::Scancode;

const KEYPAD: [Scancode; 16] = [
    Scancode::X,
    Scancode::Num1,
    Scancode::Num2,
    Scancode::Num3,
    Scancode::Q,
    Scancode::W,
    Scancode::E,
    Scancode::A,
    Scancode::S,
    Scancode::D,
    Scancode::Z,
    Scancode::C,
    Scancode::Num4,
    Scancode::R,
    Scancode::F,
    Scancode::V,
];

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// The COSMAC VIP layout is mapped to the left 4 alphanumeric columns.
/// Scancodes are physical key positions, so the layout survives non-QWERTY keyboards.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn keymap(key: Scancode) -> Option<u8> {
    KEYPAD.iter().position(|&k| k == key).map(|i| i as u8)
}
