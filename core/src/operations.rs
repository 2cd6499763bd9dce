use rand::{Rng, RngCore};

use crate::config::Quirks;
use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, FONT_START, MEMORY_SIZE, REGISTER_COUNT,
    STACK_SIZE,
};
use crate::error::Fault;
use crate::state::State;

/// What the driver should do with the program counter once an instruction has executed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// pc += 2
    Next,
    /// pc += 4
    Skip,
    /// pc = addr
    Jump(u16),
    /// Leave pc alone until a key is pressed, then store it in the register
    AwaitKey(usize),
    /// The opcode didn't decode; carry on as if it were Next
    Unrecognized,
}

type Outcome = Result<Flow, Fault>;

const VF: usize = 0xF;

fn skip_if(condition: bool) -> Outcome {
    Ok(if condition { Flow::Skip } else { Flow::Next })
}

/// Both bytes of the instruction at `addr` have to be in memory
fn jump_target(addr: u16) -> Result<u16, Fault> {
    if usize::from(addr) >= MEMORY_SIZE - 1 {
        Err(Fault::InvalidAddress(addr))
    } else {
        Ok(addr)
    }
}

/// clear
pub fn clr(state: &mut State) -> Outcome {
    state.frame_buffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
    Ok(Flow::Next)
}

/// PC = STACK.pop()
/// The popped address already points past the call.
pub fn rts(state: &mut State) -> Outcome {
    if state.sp == 0 {
        return Err(Fault::StackUnderflow);
    }
    state.sp -= 1;
    Ok(Flow::Jump(state.stack[usize::from(state.sp)]))
}

/// PC = addr
pub fn jump(addr: u16) -> Outcome {
    Ok(Flow::Jump(jump_target(addr)?))
}

/// STACK.push(PC + 2); PC = addr
pub fn call(state: &mut State, addr: u16) -> Outcome {
    let sp = usize::from(state.sp);
    if sp >= STACK_SIZE {
        return Err(Fault::StackOverflow);
    }
    let addr = jump_target(addr)?;
    state.stack[sp] = state.pc + 0x2;
    state.sp += 1;
    Ok(Flow::Jump(addr))
}

/// if Vx == kk then pc += 2
pub fn ske(state: &mut State, x: usize, kk: u8) -> Outcome {
    skip_if(state.v[x] == kk)
}

/// if Vx != kk then pc += 2
pub fn skne(state: &mut State, x: usize, kk: u8) -> Outcome {
    skip_if(state.v[x] != kk)
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &mut State, x: usize, y: usize) -> Outcome {
    skip_if(state.v[x] == state.v[y])
}

/// Vx = kk
pub fn load(state: &mut State, x: usize, kk: u8) -> Outcome {
    state.v[x] = kk;
    Ok(Flow::Next)
}

/// Vx += kk
/// Overflow wraps and VF is left alone
pub fn add(state: &mut State, x: usize, kk: u8) -> Outcome {
    state.v[x] = state.v[x].wrapping_add(kk);
    Ok(Flow::Next)
}

/// Vx = Vy
pub fn mv(state: &mut State, x: usize, y: usize) -> Outcome {
    state.v[x] = state.v[y];
    Ok(Flow::Next)
}

/// Vx |= Vy
pub fn or(state: &mut State, x: usize, y: usize) -> Outcome {
    state.v[x] |= state.v[y];
    Ok(Flow::Next)
}

/// Vx &= Vy
pub fn and(state: &mut State, x: usize, y: usize) -> Outcome {
    state.v[x] &= state.v[y];
    Ok(Flow::Next)
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: usize, y: usize) -> Outcome {
    state.v[x] ^= state.v[y];
    Ok(Flow::Next)
}

// The flag setting operations below write VF last so that the flag survives when x is F.

/// Vx += Vy; VF = carry
pub fn addr(state: &mut State, x: usize, y: usize) -> Outcome {
    let (res, carry) = state.v[x].overflowing_add(state.v[y]);
    state.v[x] = res;
    state.v[VF] = carry as u8;
    Ok(Flow::Next)
}

/// Vx -= Vy; VF = Vx > Vy
pub fn sub(state: &mut State, x: usize, y: usize) -> Outcome {
    let flag = state.v[x] > state.v[y];
    state.v[x] = state.v[x].wrapping_sub(state.v[y]);
    state.v[VF] = flag as u8;
    Ok(Flow::Next)
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(state: &mut State, x: usize) -> Outcome {
    let flag = state.v[x] & 0x1;
    state.v[x] >>= 1;
    state.v[VF] = flag;
    Ok(Flow::Next)
}

/// Vx = Vy - Vx; VF = Vy > Vx
pub fn subn(state: &mut State, x: usize, y: usize) -> Outcome {
    let flag = state.v[y] > state.v[x];
    state.v[x] = state.v[y].wrapping_sub(state.v[x]);
    state.v[VF] = flag as u8;
    Ok(Flow::Next)
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(state: &mut State, x: usize) -> Outcome {
    let flag = (state.v[x] >> 7) & 0x1;
    state.v[x] <<= 1;
    state.v[VF] = flag;
    Ok(Flow::Next)
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &mut State, x: usize, y: usize) -> Outcome {
    skip_if(state.v[x] != state.v[y])
}

/// I = addr
pub fn loadi(state: &mut State, addr: u16) -> Outcome {
    state.i = addr;
    Ok(Flow::Next)
}

/// PC = V0 + addr
pub fn jumpi(state: &mut State, addr: u16) -> Outcome {
    jump(u16::from(state.v[0x0]) + addr)
}

/// Vx = rand_byte & kk
pub fn rand(state: &mut State, x: usize, kk: u8, rng: &mut dyn RngCore) -> Outcome {
    let rand_byte: u8 = rng.gen();
    state.v[x] = rand_byte & kk;
    Ok(Flow::Next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased.
pub fn draw(state: &mut State, x: usize, y: usize, n: u8) -> Outcome {
    let n = usize::from(n);
    let mut sprite = [0; 0x10];
    sprite[..n].copy_from_slice(state.read(state.i, n)?);

    let left = usize::from(state.v[x]);
    let top = usize::from(state.v[y]);
    let mut collision = false;

    for (row, byte) in sprite[..n].iter().enumerate() {
        let py = (top + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            if (byte >> (7 - bit)) & 0x1 == 0 {
                continue;
            }
            let px = (left + bit) % DISPLAY_WIDTH;
            let pixel = &mut state.frame_buffer[py][px];
            collision |= *pixel;
            *pixel = !*pixel;
        }
    }

    state.v[VF] = collision as u8;
    state.draw_flag = true;
    Ok(Flow::Next)
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &mut State, x: usize) -> Outcome {
    skip_if(state.keypad.is_pressed(state.v[x]))
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &mut State, x: usize) -> Outcome {
    skip_if(!state.keypad.is_pressed(state.v[x]))
}

/// Vx = DT
pub fn moved(state: &mut State, x: usize) -> Outcome {
    state.v[x] = state.delay_timer;
    Ok(Flow::Next)
}

/// await keypress for Vx
pub fn keyd(x: usize) -> Outcome {
    Ok(Flow::AwaitKey(x))
}

/// DT = Vx
pub fn loads(state: &mut State, x: usize) -> Outcome {
    state.delay_timer = state.v[x];
    Ok(Flow::Next)
}

/// ST = Vx
pub fn ld(state: &mut State, x: usize) -> Outcome {
    state.sound_timer = state.v[x];
    Ok(Flow::Next)
}

/// I += Vx
/// VF = I > 0xFFF, but only for interpreters that do that
pub fn addi(state: &mut State, x: usize, quirks: &Quirks) -> Outcome {
    state.i = state.i.wrapping_add(u16::from(state.v[x]));
    if quirks.add_i_sets_vf {
        state.v[VF] = (state.i > 0x0FFF) as u8;
    }
    Ok(Flow::Next)
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &mut State, x: usize) -> Outcome {
    state.i = FONT_START + u16::from(state.v[x]) * FONT_GLYPH_SIZE;
    Ok(Flow::Next)
}

/// mem[I..I+3] = bcd(Vx)
/// Store the hundreds, tens and ones of Vx in memory starting at address i
pub fn bcd(state: &mut State, x: usize) -> Outcome {
    let value = state.v[x];
    let digits = [value / 100, value / 10 % 10, value % 10];
    state.write(state.i, &digits)?;
    Ok(Flow::Next)
}

/// mem[I..=I+x] = V0..=Vx
/// I itself is left alone
pub fn stor(state: &mut State, x: usize) -> Outcome {
    let v = state.v;
    state.write(state.i, &v[..=x])?;
    Ok(Flow::Next)
}

/// V0..=Vx = mem[I..=I+x]
/// I itself is left alone
pub fn read(state: &mut State, x: usize) -> Outcome {
    let mut values = [0; REGISTER_COUNT];
    values[..=x].copy_from_slice(state.read(state.i, x + 1)?);
    state.v[..=x].copy_from_slice(&values[..=x]);
    Ok(Flow::Next)
}
