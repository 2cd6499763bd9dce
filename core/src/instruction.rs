use std::fmt;

use rand::RngCore;

use crate::config::Quirks;
use crate::error::Fault;
use crate::opcode::Opcode;
use crate::operations::{self, Flow};
use crate::state::State;

/// A decoded opcode and its operands, named after its assembler mnemonic
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Cls,
    Ret,
    Jp(u16),
    Call(u16),
    SeByte { x: usize, kk: u8 },
    SneByte { x: usize, kk: u8 },
    SeReg { x: usize, y: usize },
    LdByte { x: usize, kk: u8 },
    AddByte { x: usize, kk: u8 },
    LdReg { x: usize, y: usize },
    Or { x: usize, y: usize },
    And { x: usize, y: usize },
    Xor { x: usize, y: usize },
    AddReg { x: usize, y: usize },
    Sub { x: usize, y: usize },
    Shr { x: usize },
    Subn { x: usize, y: usize },
    Shl { x: usize },
    SneReg { x: usize, y: usize },
    LdI(u16),
    JpV0(u16),
    Rnd { x: usize, kk: u8 },
    Drw { x: usize, y: usize, n: u8 },
    Skp { x: usize },
    Sknp { x: usize },
    LdVxDt { x: usize },
    LdVxK { x: usize },
    LdDtVx { x: usize },
    LdStVx { x: usize },
    AddI { x: usize },
    LdF { x: usize },
    LdB { x: usize },
    LdIVx { x: usize },
    LdVxI { x: usize },
    Unknown(u16),
}

impl Instruction {
    /// Selects the Instruction for an opcode.
    ///
    /// The family nibble picks the instruction outright for most opcodes; the 0x0, 0x8, 0xE and 0xF
    /// families share a family nibble and are told apart by their low nibble or byte.
    /// Anything else is `Unknown`.
    pub fn decode(op: u16) -> Self {
        use Instruction::*;

        let (x, y, n, kk, nnn) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());
        match op.family() {
            0x0 => match op {
                0x00E0 => Cls,
                0x00EE => Ret,
                _ => Unknown(op),
            },
            0x1 => Jp(nnn),
            0x2 => Call(nnn),
            0x3 => SeByte { x, kk },
            0x4 => SneByte { x, kk },
            0x5 if n == 0x0 => SeReg { x, y },
            0x6 => LdByte { x, kk },
            0x7 => AddByte { x, kk },
            0x8 => match n {
                0x0 => LdReg { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => AddReg { x, y },
                0x5 => Sub { x, y },
                0x6 => Shr { x },
                0x7 => Subn { x, y },
                0xE => Shl { x },
                _ => Unknown(op),
            },
            0x9 if n == 0x0 => SneReg { x, y },
            0xA => LdI(nnn),
            0xB => JpV0(nnn),
            0xC => Rnd { x, kk },
            0xD => Drw { x, y, n },
            0xE => match kk {
                0x9E => Skp { x },
                0xA1 => Sknp { x },
                _ => Unknown(op),
            },
            0xF => match kk {
                0x07 => LdVxDt { x },
                0x0A => LdVxK { x },
                0x15 => LdDtVx { x },
                0x18 => LdStVx { x },
                0x1E => AddI { x },
                0x29 => LdF { x },
                0x33 => LdB { x },
                0x55 => LdIVx { x },
                0x65 => LdVxI { x },
                _ => Unknown(op),
            },
            _ => Unknown(op),
        }
    }

    /// Applies the instruction to `state`.
    ///
    /// The program counter is never touched here; the returned Flow says what should happen to it.
    pub fn execute(
        &self,
        state: &mut State,
        quirks: &Quirks,
        rng: &mut dyn RngCore,
    ) -> Result<Flow, Fault> {
        use operations::*;
        use Instruction::*;

        match *self {
            Cls => clr(state),
            Ret => rts(state),
            Jp(addr) => jump(addr),
            Call(addr) => call(state, addr),
            SeByte { x, kk } => ske(state, x, kk),
            SneByte { x, kk } => skne(state, x, kk),
            SeReg { x, y } => skre(state, x, y),
            LdByte { x, kk } => load(state, x, kk),
            AddByte { x, kk } => add(state, x, kk),
            LdReg { x, y } => mv(state, x, y),
            Or { x, y } => or(state, x, y),
            And { x, y } => and(state, x, y),
            Xor { x, y } => xor(state, x, y),
            AddReg { x, y } => addr(state, x, y),
            Sub { x, y } => sub(state, x, y),
            Shr { x } => shr(state, x),
            Subn { x, y } => subn(state, x, y),
            Shl { x } => shl(state, x),
            SneReg { x, y } => skrne(state, x, y),
            LdI(addr) => loadi(state, addr),
            JpV0(addr) => jumpi(state, addr),
            Rnd { x, kk } => rand(state, x, kk, rng),
            Drw { x, y, n } => draw(state, x, y, n),
            Skp { x } => skpr(state, x),
            Sknp { x } => skup(state, x),
            LdVxDt { x } => moved(state, x),
            LdVxK { x } => keyd(x),
            LdDtVx { x } => loads(state, x),
            LdStVx { x } => ld(state, x),
            AddI { x } => addi(state, x, quirks),
            LdF { x } => ldspr(state, x),
            LdB { x } => bcd(state, x),
            LdIVx { x } => stor(state, x),
            LdVxI { x } => read(state, x),
            Unknown(_) => Ok(Flow::Unrecognized),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp(addr) => write!(f, "JP {:#05X}", addr),
            Call(addr) => write!(f, "CALL {:#05X}", addr),
            SeByte { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SneByte { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x } => write!(f, "SHR V{:X}", x),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x } => write!(f, "SHL V{:X}", x),
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI(addr) => write!(f, "LD I, {:#05X}", addr),
            JpV0(addr) => write!(f, "JP V0, {:#05X}", addr),
            Rnd { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Drw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdVxDt { x } => write!(f, "LD V{:X}, DT", x),
            LdVxK { x } => write!(f, "LD V{:X}, K", x),
            LdDtVx { x } => write!(f, "LD DT, V{:X}", x),
            LdStVx { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LdF { x } => write!(f, "LD F, V{:X}", x),
            LdB { x } => write!(f, "LD B, V{:X}", x),
            LdIVx { x } => write!(f, "LD [I], V{:X}", x),
            LdVxI { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(op) => write!(f, "UNKNOWN {:04X}", op),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Decodes and executes a single opcode
    fn exec(op: u16, state: &mut State) -> Result<Flow, Fault> {
        let mut rng = StdRng::seed_from_u64(0x8);
        Instruction::decode(op).execute(state, &Quirks::default(), &mut rng)
    }

    #[test]
    fn test_decodes_every_family() {
        assert_eq!(Instruction::decode(0x00E0), Instruction::Cls);
        assert_eq!(Instruction::decode(0x00EE), Instruction::Ret);
        assert_eq!(Instruction::decode(0x1ABC), Instruction::Jp(0x0ABC));
        assert_eq!(Instruction::decode(0x2ABC), Instruction::Call(0x0ABC));
        assert_eq!(Instruction::decode(0x3A42), Instruction::SeByte { x: 0xA, kk: 0x42 });
        assert_eq!(Instruction::decode(0x5AB0), Instruction::SeReg { x: 0xA, y: 0xB });
        assert_eq!(Instruction::decode(0x8AB6), Instruction::Shr { x: 0xA });
        assert_eq!(Instruction::decode(0x8ABE), Instruction::Shl { x: 0xA });
        assert_eq!(Instruction::decode(0xBABC), Instruction::JpV0(0x0ABC));
        assert_eq!(Instruction::decode(0xDAB5), Instruction::Drw { x: 0xA, y: 0xB, n: 0x5 });
        assert_eq!(Instruction::decode(0xE19E), Instruction::Skp { x: 0x1 });
        assert_eq!(Instruction::decode(0xE1A1), Instruction::Sknp { x: 0x1 });
        assert_eq!(Instruction::decode(0xF10A), Instruction::LdVxK { x: 0x1 });
        assert_eq!(Instruction::decode(0xF165), Instruction::LdVxI { x: 0x1 });
    }

    #[test]
    fn test_8xye_is_not_8xy0() {
        assert_eq!(Instruction::decode(0x812E), Instruction::Shl { x: 0x1 });
        assert_eq!(Instruction::decode(0x8120), Instruction::LdReg { x: 0x1, y: 0x2 });
    }

    #[test]
    fn test_decodes_unknown() {
        for op in [0x0123, 0x00E1, 0x5121, 0x8128, 0x912F, 0xE19F, 0xF100, 0xFFFF].iter() {
            assert_eq!(Instruction::decode(*op), Instruction::Unknown(*op), "{:04X}", op);
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Instruction::decode(0x6005).to_string(), "LD V0, 0x05");
        assert_eq!(Instruction::decode(0xA300).to_string(), "LD I, 0x300");
        assert_eq!(Instruction::decode(0xD015).to_string(), "DRW V0, V1, 5");
        assert_eq!(Instruction::decode(0xF355).to_string(), "LD [I], V3");
        assert_eq!(Instruction::decode(0xFFFF).to_string(), "UNKNOWN FFFF");
    }

    #[test]
    fn test_unknown_changes_nothing() {
        let mut state = State::new();
        let before = state.clone();
        assert_eq!(exec(0xFFFF, &mut state), Ok(Flow::Unrecognized));
        assert_eq!(state, before);
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = State::new();
        state.frame_buffer[0][0] = true;
        assert_eq!(exec(0x00E0, &mut state), Ok(Flow::Next));
        assert!(!state.frame_buffer[0][0]);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = State::new();
        state.sp = 0x1;
        state.stack[0x0] = 0x0ABC;
        assert_eq!(exec(0x00EE, &mut state), Ok(Flow::Jump(0x0ABC)));
        assert_eq!(state.sp, 0x0);
    }

    #[test]
    fn test_00ee_ret_underflow() {
        let mut state = State::new();
        assert_eq!(exec(0x00EE, &mut state), Err(Fault::StackUnderflow));
    }

    #[test]
    fn test_1nnn_jp() {
        let mut state = State::new();
        assert_eq!(exec(0x1ABC, &mut state), Ok(Flow::Jump(0x0ABC)));
        assert_eq!(exec(0x1FFF, &mut state), Err(Fault::InvalidAddress(0x0FFF)));
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = State::new();
        state.pc = 0x0300;
        assert_eq!(exec(0x2400, &mut state), Ok(Flow::Jump(0x0400)));
        assert_eq!(state.sp, 0x1);
        assert_eq!(state.stack[0x0], 0x0302);
    }

    #[test]
    fn test_2nnn_call_overflow() {
        let mut state = State::new();
        state.sp = 16;
        assert_eq!(exec(0x2400, &mut state), Err(Fault::StackOverflow));
        assert_eq!(state.sp, 16);
    }

    #[test]
    fn test_3xkk_4xkk_every_byte() {
        let mut state = State::new();
        state.v[0x1] = 0x00;
        for kk in 0x00..=0xFF_u16 {
            let equal = kk == 0x00;
            let se = exec(0x3100 | kk, &mut state).unwrap();
            let sne = exec(0x4100 | kk, &mut state).unwrap();
            assert_eq!(se == Flow::Skip, equal, "3x{:02X}", kk);
            assert_eq!(sne == Flow::Skip, !equal, "4x{:02X}", kk);
        }
        state.v[0x1] = 0xFF;
        assert_eq!(exec(0x31FF, &mut state), Ok(Flow::Skip));
        assert_eq!(exec(0x41FF, &mut state), Ok(Flow::Next));
        assert_eq!(exec(0x31FE, &mut state), Ok(Flow::Next));
        assert_eq!(exec(0x41FE, &mut state), Ok(Flow::Skip));
    }

    #[test]
    fn test_5xy0_9xy0() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        assert_eq!(exec(0x5120, &mut state), Ok(Flow::Skip));
        assert_eq!(exec(0x9120, &mut state), Ok(Flow::Next));
        state.v[0x2] = 0x12;
        assert_eq!(exec(0x5120, &mut state), Ok(Flow::Next));
        assert_eq!(exec(0x9120, &mut state), Ok(Flow::Skip));
    }

    #[test]
    fn test_6xkk_7xkk() {
        let mut state = State::new();
        state.v[0xF] = 0x5;
        exec(0x61FE, &mut state).unwrap();
        exec(0x7103, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x01);
        // ADD Vx, byte never touches the flag
        assert_eq!(state.v[0xF], 0x5);
    }

    #[test]
    fn test_8xy0_to_8xy3() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        exec(0x8121, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x7);
        exec(0x8122, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x3);
        exec(0x8123, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x0);
        state.v[0x2] = 0x42;
        exec(0x8120, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x42);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[0x2] = 0x01;
        exec(0x8124, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x00);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy4_add_nocarry() {
        let mut state = State::new();
        state.v[0x1] = 0xEE;
        state.v[0x2] = 0x11;
        state.v[0xF] = 0x1;
        exec(0x8124, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x05;
        state.v[0x2] = 0x09;
        exec(0x8125, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0xFC);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy5_sub_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x33;
        state.v[0x2] = 0x11;
        exec(0x8125, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr() {
        let mut state = State::new();
        state.v[0x1] = 0x05;
        exec(0x8126, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x02);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn() {
        let mut state = State::new();
        state.v[0x1] = 0x09;
        state.v[0x2] = 0x05;
        exec(0x8127, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0xFC);
        assert_eq!(state.v[0xF], 0x0);

        state.v[0x1] = 0x05;
        state.v[0x2] = 0x09;
        exec(0x8127, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x04);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xye_shl() {
        let mut state = State::new();
        state.v[0x1] = 0x81;
        exec(0x812E, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x02);
        assert_eq!(state.v[0xF], 0x1);
        exec(0x812E, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x04);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_annn_bnnn() {
        let mut state = State::new();
        exec(0xA123, &mut state).unwrap();
        assert_eq!(state.i, 0x0123);
        state.v[0x0] = 0x02;
        assert_eq!(exec(0xB300, &mut state), Ok(Flow::Jump(0x0302)));
    }

    #[test]
    fn test_cxkk_masks_random_byte() {
        let mut state = State::new();
        exec(0xC100, &mut state).unwrap();
        assert_eq!(state.v[0x1], 0x00);
        for _ in 0..32 {
            exec(0xC10F, &mut state).unwrap();
            assert_eq!(state.v[0x1] & 0xF0, 0x00);
        }
    }

    #[test]
    fn test_ex9e_exa1() {
        let mut state = State::new();
        let mut keys = [false; 16];
        keys[0xE] = true;
        state.keypad = crate::state::Keypad::new(keys);
        state.v[0x1] = 0xE;
        assert_eq!(exec(0xE19E, &mut state), Ok(Flow::Skip));
        assert_eq!(exec(0xE1A1, &mut state), Ok(Flow::Next));
        state.v[0x1] = 0xD;
        assert_eq!(exec(0xE19E, &mut state), Ok(Flow::Next));
        assert_eq!(exec(0xE1A1, &mut state), Ok(Flow::Skip));
    }

    #[test]
    fn test_fx07_fx15_fx18() {
        let mut state = State::new();
        state.v[0x1] = 0x20;
        exec(0xF115, &mut state).unwrap();
        exec(0xF118, &mut state).unwrap();
        assert_eq!((state.delay_timer, state.sound_timer), (0x20, 0x20));
        state.delay_timer = 0x10;
        exec(0xF207, &mut state).unwrap();
        assert_eq!(state.v[0x2], 0x10);
    }

    #[test]
    fn test_fx0a_waits() {
        let mut state = State::new();
        let before = state.clone();
        assert_eq!(exec(0xF30A, &mut state), Ok(Flow::AwaitKey(0x3)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_fx1e_fx29() {
        let mut state = State::new();
        state.i = 0x0100;
        state.v[0x1] = 0x0A;
        exec(0xF11E, &mut state).unwrap();
        assert_eq!(state.i, 0x010A);
        exec(0xF129, &mut state).unwrap();
        assert_eq!(state.i, 0x0032);
    }

    #[test]
    fn test_fx33_bcd() {
        let mut state = State::new();
        state.i = 0x0300;
        state.v[0x1] = 156;
        exec(0xF133, &mut state).unwrap();
        assert_eq!(state.memory[0x0300..0x0303], [1, 5, 6]);
        state.v[0x1] = 7;
        exec(0xF133, &mut state).unwrap();
        assert_eq!(state.memory[0x0300..0x0303], [0, 0, 7]);
    }

    #[test]
    fn test_fx55_fx65_round_trip() {
        let mut state = State::new();
        state.i = 0x0400;
        let saved = [0x10, 0x20, 0x30, 0x40, 0x50, 0x60];
        state.v[..6].copy_from_slice(&saved);
        state.v[0x6] = 0x99;
        exec(0xF555, &mut state).unwrap();
        assert_eq!(state.memory[0x0400..0x0406], saved);
        assert_eq!(state.memory[0x0406], 0x00);
        assert_eq!(state.i, 0x0400);

        state.v = [0xAA; 16];
        exec(0xF565, &mut state).unwrap();
        assert_eq!(state.v[..6], saved);
        assert_eq!(state.v[0x6], 0xAA);
    }

    #[test]
    fn test_fx65_reads_past_memory() {
        let mut state = State::new();
        state.i = 0x0FFF;
        assert_eq!(exec(0xF165, &mut state), Err(Fault::InvalidAddress(0x0FFF)));
    }
}
