/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, fetched most significant byte first.
/// Which instruction an opcode encodes depends on:
/// - `(n, _, _, _)` the family; applies to all opcodes
/// - `(_, _, _, n)` the instruction within the 0x8 family
/// - `(_, _, n, n)` the instruction within the 0x0, 0xE and 0xF families
///
/// The remaining nibbles carry operands:
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` an immediate byte that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` the register Vx, or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` the height of a sprite
pub trait Opcode {
    /// `[f___]`
    fn family(&self) -> u8;

    /// The register named by the second nibble.
    /// `[_x__]`
    fn x(&self) -> usize;

    /// The register named by the third nibble.
    /// `[__y_]`
    fn y(&self) -> usize;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__kk]`
    fn kk(&self) -> u8;

    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn family(&self) -> u8 {
        ((self & 0xF000) >> 12) as u8
    }

    fn x(&self) -> usize {
        usize::from((self & 0x0F00) >> 8)
    }

    fn y(&self) -> usize {
        usize::from((self & 0x00F0) >> 4)
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_fields() {
        let op: u16 = 0xABCD;
        assert_eq!(op.family(), 0xA);
        assert_eq!(op.x(), 0xB);
        assert_eq!(op.y(), 0xC);
        assert_eq!(op.n(), 0xD);
        assert_eq!(op.kk(), 0xCD);
        assert_eq!(op.nnn(), 0x0BCD);
    }

    #[test]
    fn test_fields_of_zero_and_max() {
        let op: u16 = 0x0000;
        assert_eq!((op.family(), op.x(), op.y(), op.n()), (0, 0, 0, 0));
        let op: u16 = 0xFFFF;
        assert_eq!((op.family(), op.x(), op.y(), op.n()), (0xF, 0xF, 0xF, 0xF));
        assert_eq!(op.nnn(), 0x0FFF);
    }
}
