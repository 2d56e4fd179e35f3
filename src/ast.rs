/// Decoded instructions and programs
use num_bigint::BigUint;
use std::fmt;

use crate::bytecode::Opcode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub op: Opcode,
    /// Constant for `load`, address for `read`/`write`, `None` for `sgn`.
    pub operand: Option<BigUint>,
}

impl Instruction {
    pub fn new(op: Opcode, operand: Option<BigUint>) -> Self {
        Instruction { op, operand }
    }

    pub fn load(value: impl Into<BigUint>) -> Self {
        Instruction::new(Opcode::Load, Some(value.into()))
    }

    pub fn read(addr: impl Into<BigUint>) -> Self {
        Instruction::new(Opcode::Read, Some(addr.into()))
    }

    pub fn write(addr: impl Into<BigUint>) -> Self {
        Instruction::new(Opcode::Write, Some(addr.into()))
    }

    pub fn sgn() -> Self {
        Instruction::new(Opcode::Sgn, None)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Some(operand) => write!(f, "{} {}", self.op, operand),
            None => write!(f, "{}", self.op),
        }
    }
}

/// A straight-line program. `lines[i]` is the script line `instructions[i]`
/// came from (or its index, for programs decoded from an image).
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub lines: Vec<usize>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn push(&mut self, instruction: Instruction, line: usize) {
        self.instructions.push(instruction);
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Instruction, usize)> {
        self.instructions.iter().zip(self.lines.iter().copied())
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        let mut program = Program::new();
        for (i, instruction) in iter.into_iter().enumerate() {
            program.push(instruction, i + 1);
        }
        program
    }
}
