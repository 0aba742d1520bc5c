use core::fmt;

/// Wire opcodes. Sub operations have no wire encoding; they only exist in
/// derived inverse chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    End = 0x00,
    ReverseBits = 0x01,
    Xor = 0x02,
    XorPos = 0x03,
    Add = 0x04,
    AddPos = 0x05,
}

impl Opcode {
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Opcode::End),
            0x01 => Some(Opcode::ReverseBits),
            0x02 => Some(Opcode::Xor),
            0x03 => Some(Opcode::XorPos),
            0x04 => Some(Opcode::Add),
            0x05 => Some(Opcode::AddPos),
            _ => None,
        }
    }

    /// Number of argument bytes that immediately follow the opcode.
    pub const fn arity(self) -> usize {
        match self {
            Opcode::Xor | Opcode::Add => 1,
            Opcode::End | Opcode::ReverseBits | Opcode::XorPos | Opcode::AddPos => 0,
        }
    }

    /// Builds the operation for this opcode. `End` has none.
    pub const fn operation(self, arg: u8) -> Option<Operation> {
        match self {
            Opcode::End => None,
            Opcode::ReverseBits => Some(Operation::ReverseBits),
            Opcode::Xor => Some(Operation::XorConst(arg)),
            Opcode::XorPos => Some(Operation::XorPos),
            Opcode::Add => Some(Operation::AddConst(arg)),
            Opcode::AddPos => Some(Operation::AddPos),
        }
    }
}

/// A single reversible byte operation.
///
/// Positional variants use the stream position modulo 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ReverseBits,
    XorConst(u8),
    XorPos,
    AddConst(u8),
    AddPos,
    SubConst(u8),
    SubPos,
}

static_assertions::assert_eq_size!(Operation, [u8; 2]);

impl Operation {
    #[inline(always)]
    pub fn apply(self, position: u64, byte: u8) -> u8 {
        let pos = position as u8;
        match self {
            Operation::ReverseBits => byte.reverse_bits(),
            Operation::XorConst(n) => byte ^ n,
            Operation::XorPos => byte ^ pos,
            Operation::AddConst(n) => byte.wrapping_add(n),
            Operation::AddPos => byte.wrapping_add(pos),
            Operation::SubConst(n) => byte.wrapping_sub(n),
            Operation::SubPos => byte.wrapping_sub(pos),
        }
    }

    /// The operation that undoes `self` at the same position.
    pub const fn inverse(self) -> Self {
        match self {
            Operation::AddConst(n) => Operation::SubConst(n),
            Operation::SubConst(n) => Operation::AddConst(n),
            Operation::AddPos => Operation::SubPos,
            Operation::SubPos => Operation::AddPos,
            Operation::ReverseBits | Operation::XorConst(_) | Operation::XorPos => self,
        }
    }

    pub const fn is_self_inverse(self) -> bool {
        matches!(
            self,
            Operation::ReverseBits | Operation::XorConst(_) | Operation::XorPos
        )
    }

    pub const fn is_positional(self) -> bool {
        matches!(
            self,
            Operation::XorPos | Operation::AddPos | Operation::SubPos
        )
    }

    /// Opcode and optional argument for operations that may appear on the wire.
    pub const fn wire(self) -> Option<(Opcode, Option<u8>)> {
        match self {
            Operation::ReverseBits => Some((Opcode::ReverseBits, None)),
            Operation::XorConst(n) => Some((Opcode::Xor, Some(n))),
            Operation::XorPos => Some((Opcode::XorPos, None)),
            Operation::AddConst(n) => Some((Opcode::Add, Some(n))),
            Operation::AddPos => Some((Opcode::AddPos, None)),
            Operation::SubConst(_) | Operation::SubPos => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ReverseBits => f.write_str("reversebits"),
            Operation::XorConst(n) => write!(f, "xor({:#04x})", n),
            Operation::XorPos => f.write_str("xorpos"),
            Operation::AddConst(n) => write!(f, "add({:#04x})", n),
            Operation::AddPos => f.write_str("addpos"),
            Operation::SubConst(n) => write!(f, "sub({:#04x})", n),
            Operation::SubPos => f.write_str("subpos"),
        }
    }
}
