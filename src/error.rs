use thiserror::Error;

use crate::bytecode::Opcode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid literal `{0}`")]
    InvalidLiteral(String),
    #[error("line {line}: syntax error in `{text}`: {kind}")]
    Syntax {
        line: usize,
        text: String,
        kind: SyntaxErrorKind,
    },
    #[error("line {line}: cannot encode instruction: {kind}")]
    Encode { line: usize, kind: EncodeErrorKind },
    #[error("image offset 0x{offset:04X}: {kind}")]
    Decode { offset: usize, kind: DecodeErrorKind },
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("invalid memory range [{start}, {end}): at most {max} cells can be dumped", max = crate::dump::MAX_DUMP_CELLS)]
    InvalidRange { start: u64, end: u64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML program: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("unknown opcode `{0}`")]
    UnknownOpcode(String),
    #[error("`{0}` requires an operand")]
    MissingOperand(Opcode),
    #[error("`{0}` takes no operand")]
    UnexpectedOperand(Opcode),
    #[error("unexpected token `{0}`")]
    TrailingToken(String),
    #[error("invalid literal `{0}`")]
    InvalidLiteral(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeErrorKind {
    #[error("operand {value} of `{op}` does not fit in {bits} bits")]
    OperandTooLarge { op: Opcode, value: String, bits: u32 },
    #[error("`{0}` has no operand")]
    MissingOperand(Opcode),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("unknown opcode byte 0x{0:02X}")]
    UnknownOpcode(u8),
    #[error("truncated `{op}`: need {needed} bytes, {available} left")]
    Truncated {
        op: Opcode,
        needed: usize,
        available: usize,
    },
    #[error("reserved bits set in `{op}` operand 0x{byte:02X}")]
    ReservedBits { op: Opcode, byte: u8 },
}

impl Error {
    /// Source line the error points at, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. } | Error::Encode { line, .. } => Some(*line),
            _ => None,
        }
    }
}
