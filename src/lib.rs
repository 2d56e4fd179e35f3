//! Accumulator byte-machine.
//!
//! Scripts of `load`, `write`, `read` and `sgn` lines are decoded in full by
//! [`parser::parse_program`] and then run by [`vm::Vm`] against a
//! [`machine::Machine`]: one unbounded accumulator and a sparse byte memory.
//! [`assembler`] converts programs to and from the binary image format, and
//! [`yaml`] reads the same programs written as YAML.

pub mod assembler;
pub mod ast;
pub mod bytecode;
pub mod dump;
pub mod error;
pub mod lexer;
pub mod literal;
pub mod machine;
pub mod parser;
pub mod token;
pub mod vm;
pub mod yaml;

pub use ast::{Instruction, Program};
pub use bytecode::Opcode;
pub use error::{Error, Result};
pub use literal::parse_literal;
pub use machine::Machine;
pub use parser::parse_program;
pub use vm::{run_script, Vm};
pub use yaml::parse_yaml_program;
