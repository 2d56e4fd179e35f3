//! YAML program front end.
//!
//! ```yaml
//! program:
//!   - op: load
//!     operand: 0x1000
//!   - op: write
//!     operand: 10
//!   - op: sgn
//! ```
//!
//! Operands may be YAML integers or strings in any literal form. Entry `i`
//! is tagged with line `i + 1`.

use serde::Deserialize;

use crate::ast::Program;
use crate::error::{Error, Result};
use crate::parser::decode_instruction;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlProgram {
    program: Vec<YamlEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlEntry {
    op: String,
    #[serde(default)]
    operand: Option<YamlOperand>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YamlOperand {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl YamlOperand {
    /// Back to a literal token, so integers and strings go through the
    /// same literal rules as script operands.
    fn token(&self) -> String {
        match self {
            YamlOperand::Unsigned(n) => n.to_string(),
            YamlOperand::Signed(n) => n.to_string(),
            YamlOperand::Text(s) => s.clone(),
        }
    }
}

impl YamlEntry {
    fn text(&self) -> String {
        match &self.operand {
            Some(operand) => format!("op: {}, operand: {}", self.op, operand.token()),
            None => format!("op: {}", self.op),
        }
    }
}

pub fn parse_yaml_program(source: &str) -> Result<Program> {
    let document: YamlProgram = serde_yaml::from_str(source)?;
    let mut program = Program::new();

    for (i, entry) in document.program.iter().enumerate() {
        let line = i + 1;
        let operands: Vec<String> = entry.operand.iter().map(YamlOperand::token).collect();
        let instruction =
            decode_instruction(&entry.op, &operands).map_err(|kind| Error::Syntax {
                line,
                text: entry.text(),
                kind,
            })?;
        program.push(instruction, line);
    }

    Ok(program)
}
