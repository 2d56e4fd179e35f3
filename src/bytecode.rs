use std::fmt;

/// Opcodes of the accumulator machine. The discriminant is the byte the
/// assembler emits for the instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Load = 0x4A,            // accumulator <- constant (u32 follows)
    Read = 0x87,            // accumulator <- memory[addr] (6-bit addr follows)
    Write = 0xD5,           // memory[addr] <- accumulator mod 256 (u32 follows)
    Sgn = 0x9A,             // accumulator <- sign of signed byte
}

/// Static description of one opcode.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub opcode: Opcode,
    pub mnemonic: &'static str,
    pub has_operand: bool,
    /// Width of the encoded operand field, in bits. Zero when there is none.
    pub operand_bits: u32,
    pub description: &'static str,
}

const LOAD: OpcodeInfo = OpcodeInfo {
    opcode: Opcode::Load,
    mnemonic: "load",
    has_operand: true,
    operand_bits: 32,
    description: "Load constant",
};

const READ: OpcodeInfo = OpcodeInfo {
    opcode: Opcode::Read,
    mnemonic: "read",
    has_operand: true,
    operand_bits: 6,
    description: "Read from memory",
};

const WRITE: OpcodeInfo = OpcodeInfo {
    opcode: Opcode::Write,
    mnemonic: "write",
    has_operand: true,
    operand_bits: 32,
    description: "Write to memory",
};

const SGN: OpcodeInfo = OpcodeInfo {
    opcode: Opcode::Sgn,
    mnemonic: "sgn",
    has_operand: false,
    operand_bits: 0,
    description: "Unary operation sgn()",
};

/// Every opcode the machine knows. Adding an instruction means adding a
/// row here, an arm in `Opcode::info` and an arm in `Vm::step`.
pub const OPCODES: &[OpcodeInfo] = &[LOAD, READ, WRITE, SGN];

impl Opcode {
    pub fn from_u8(byte: u8) -> Option<Opcode> {
        OPCODES
            .iter()
            .map(|info| info.opcode)
            .find(|op| *op as u8 == byte)
    }

    /// Mnemonics are case-sensitive: `load` is an opcode, `LOAD` is not.
    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        OPCODES
            .iter()
            .find(|info| info.mnemonic == name)
            .map(|info| info.opcode)
    }

    pub fn info(self) -> &'static OpcodeInfo {
        match self {
            Opcode::Load => &LOAD,
            Opcode::Read => &READ,
            Opcode::Write => &WRITE,
            Opcode::Sgn => &SGN,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        self.info().mnemonic
    }

    pub fn has_operand(self) -> bool {
        self.info().has_operand
    }

    /// Encoded size in bytes: the opcode byte plus the operand field.
    pub fn size(self) -> usize {
        1 + operand_bytes(self.info().operand_bits)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Bytes needed to hold an operand field of `bits` bits.
pub fn operand_bytes(bits: u32) -> usize {
    bits.div_ceil(8) as usize
}
