use log::{debug, trace};
use num_bigint::BigInt;

use crate::ast::{Instruction, Program};
use crate::bytecode::Opcode;
use crate::error::{Error, Result};
use crate::machine::{as_signed, truncate, Machine};

/// Executes programs against a single machine it owns.
#[derive(Debug, Default)]
pub struct Vm {
    machine: Machine,
    executed: usize,
}

impl Vm {
    pub fn new() -> Self {
        Vm::default()
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn into_machine(self) -> Machine {
        self.machine
    }

    /// Instructions executed so far.
    pub fn executed(&self) -> usize {
        self.executed
    }

    /// Run every instruction in program order.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        for (instruction, line) in program.iter() {
            trace!("line {:>4}: {}", line, instruction);
            self.step(instruction)?;
        }
        debug!(
            "execution finished: {} instructions, accumulator = {}",
            self.executed,
            self.machine.accumulator()
        );
        Ok(())
    }

    pub fn step(&mut self, instruction: &Instruction) -> Result<()> {
        match (instruction.op, &instruction.operand) {
            (Opcode::Load, Some(value)) => {
                self.machine.set_accumulator(BigInt::from(value.clone()));
            }
            (Opcode::Write, Some(addr)) => {
                let acc = self.machine.accumulator().clone();
                self.machine.write(addr, &acc);
                trace!("  memory[{}] = {}", addr, self.machine.read(addr));
            }
            (Opcode::Read, Some(addr)) => {
                let byte = self.machine.read(addr);
                self.machine.set_accumulator(byte);
            }
            (Opcode::Sgn, None) => {
                let sign = sgn(self.machine.accumulator());
                self.machine.set_accumulator(sign);
            }
            (op, operand) => {
                return Err(Error::Runtime(format!(
                    "`{}` {} an operand",
                    op,
                    if operand.is_some() { "does not take" } else { "requires" }
                )));
            }
        }
        self.executed += 1;
        trace!("  acc = {}", self.machine.accumulator());
        Ok(())
    }
}

/// Sign of the accumulator's low byte read as two's complement.
pub fn sgn(value: &BigInt) -> i8 {
    as_signed(truncate(value)).signum()
}

/// Decode and run `source` on a fresh machine.
pub fn run_script(source: &str) -> Result<Machine> {
    let program = crate::parser::parse_program(source)?;
    let mut vm = Vm::new();
    vm.run(&program)?;
    Ok(vm.into_machine())
}
