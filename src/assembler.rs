use log::debug;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::ast::*;
use crate::bytecode::{operand_bytes, Opcode};
use crate::error::{DecodeErrorKind, EncodeErrorKind, Error, Result};
use crate::parser::parse_program;

/// Assembled program image
#[derive(Debug, Default)]
pub struct Image {
    pub bytes: Vec<u8>,
    /// Offset of each instruction's opcode byte, in program order.
    pub offsets: Vec<usize>,
}

impl Image {
    pub fn new() -> Self {
        Image::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn emit(&mut self, op: Opcode) {
        self.offsets.push(self.bytes.len());
        self.bytes.push(op as u8);
    }

    pub fn emit_u8(&mut self, val: u8) {
        self.bytes.push(val);
    }

    pub fn emit_u32(&mut self, val: u32) {
        self.bytes.extend_from_slice(&val.to_le_bytes());
    }

    /// Bytes of the `index`th instruction.
    pub fn instruction_bytes(&self, index: usize) -> &[u8] {
        let start = self.offsets[index];
        let end = self.offsets.get(index + 1).copied().unwrap_or(self.bytes.len());
        &self.bytes[start..end]
    }
}

pub struct Assembler {
    image: Image,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler {
            image: Image::new(),
        }
    }

    pub fn assemble(program: &Program) -> Result<Image> {
        let mut assembler = Assembler::new();
        for (instruction, line) in program.iter() {
            assembler.emit_instruction(instruction, line)?;
        }
        debug!(
            "assembled {} instructions into {} bytes",
            program.len(),
            assembler.image.len()
        );
        Ok(assembler.image)
    }

    pub fn assemble_source(source: &str) -> Result<Image> {
        let program = parse_program(source)?;
        Assembler::assemble(&program)
    }

    fn emit_instruction(&mut self, instruction: &Instruction, line: usize) -> Result<()> {
        let op = instruction.op;
        let bits = op.info().operand_bits;

        let operand = match (&instruction.operand, bits) {
            (None, 0) => None,
            (Some(value), bits) if bits > 0 => Some(fit_operand(op, value, bits, line)?),
            (None, _) => {
                return Err(Error::Encode {
                    line,
                    kind: EncodeErrorKind::MissingOperand(op),
                })
            }
            (Some(value), _) => {
                return Err(Error::Encode {
                    line,
                    kind: EncodeErrorKind::OperandTooLarge {
                        op,
                        value: value.to_string(),
                        bits: 0,
                    },
                })
            }
        };

        self.image.emit(op);
        if let Some(value) = operand {
            match operand_bytes(bits) {
                1 => self.image.emit_u8(value as u8),
                _ => self.image.emit_u32(value),
            }
        }
        Ok(())
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Assembler::new()
    }
}

fn fit_operand(op: Opcode, value: &BigUint, bits: u32, line: usize) -> Result<u32> {
    let limit = if bits >= 32 { u32::MAX } else { (1u32 << bits) - 1 };
    match value.to_u32() {
        Some(v) if v <= limit => Ok(v),
        _ => Err(Error::Encode {
            line,
            kind: EncodeErrorKind::OperandTooLarge {
                op,
                value: value.to_string(),
                bits,
            },
        }),
    }
}

/// Decode an image back into a program. Instruction `i` is tagged with
/// line `i + 1`.
pub fn disassemble(bytes: &[u8]) -> Result<Program> {
    let mut program = Program::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let byte = bytes[offset];
        let op = Opcode::from_u8(byte).ok_or(Error::Decode {
            offset,
            kind: DecodeErrorKind::UnknownOpcode(byte),
        })?;

        let size = op.size();
        let available = bytes.len() - offset;
        if available < size {
            return Err(Error::Decode {
                offset,
                kind: DecodeErrorKind::Truncated {
                    op,
                    needed: size,
                    available,
                },
            });
        }

        let field = &bytes[offset + 1..offset + size];
        let operand = match field.len() {
            0 => None,
            1 => {
                let bits = op.info().operand_bits;
                let mask = ((1u16 << bits) - 1) as u8;
                if field[0] & !mask != 0 {
                    return Err(Error::Decode {
                        offset,
                        kind: DecodeErrorKind::ReservedBits { op, byte: field[0] },
                    });
                }
                Some(BigUint::from(field[0]))
            }
            _ => Some(BigUint::from_bytes_le(field)),
        };

        program.push(Instruction::new(op, operand), program.len() + 1);
        offset += size;
    }

    debug!("disassembled {} bytes into {} instructions", bytes.len(), program.len());
    Ok(program)
}

/// Bytes as `0x4A, 0xD4, 0x01`.
pub fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{:02X}", b))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per instruction: offset, encoded bytes, instruction, source
/// line and what the opcode does.
pub fn listing(program: &Program, image: &Image) -> String {
    let mut out = String::new();
    for (i, (instruction, line)) in program.iter().enumerate() {
        out.push_str(&format!(
            "{:04X}: {:<32} {:<16} ; line {}: {}\n",
            image.offsets[i],
            hex_bytes(image.instruction_bytes(i)),
            instruction.to_string(),
            line,
            instruction.op.info().description
        ));
    }
    out
}
