/*!
  The execution engine. Each cycle fetches the cell at `EIP`, decodes it, and executes it
  against the data stack, the return stack, memory and the I/O ports. Fetching the all-zero cell
  stops the machine. That is the only way a run ends without an error.

  An ALU instruction runs in this order:

  1. `T` and `R` as they were before the instruction are captured. They are the store or I/O
     address and the return address.
  2. `IN` is read from the input mux and `OUT` computed. The two shuffling operations rewrite
     `N` here.
  3. The data stack delta is applied, then the return stack delta.
  4. `OUT` goes to the output mux target.
  5. `EIP` becomes the captured `R` if `RET` is set, otherwise `EIP + 1`.
*/

mod context;
mod io;
mod stack;

pub use context::Context;
pub use io::{Ports, SharedBuffer, IO_EMIT, IO_EMIT_CELL, IO_KEY};
pub use stack::Stack;

use crate::bytecode::{
  decode_instruction, AluInstruction, AluOp, Cell, Instruction, InputMux, JumpKind, OutputMux,
  HALT,
};
use crate::error::{StackError, StackKind, VmError};

const TRUE  : Cell = -1;
const FALSE : Cell = 0;

fn flag(condition: bool) -> Cell {
  match condition {
    true  => TRUE,
    false => FALSE
  }
}

/// Logical shifts. Amounts outside `0..64` shift everything out.
fn shift_right(value: Cell, amount: Cell) -> Cell {
  match (0..64).contains(&amount) {
    true  => ((value as u64) >> amount) as Cell,
    false => 0
  }
}

fn shift_left(value: Cell, amount: Cell) -> Cell {
  match (0..64).contains(&amount) {
    true  => ((value as u64) << amount) as Cell,
    false => 0
  }
}

/// `N->IN ->T d-1`, the shape of `drop`.
fn drops_top(alu: &AluInstruction) -> bool {
  alu.op == AluOp::In && alu.output == OutputMux::T && alu.dstack == -1
}

impl Context {

  /// Runs until the halt sentinel is fetched.
  pub fn run(&mut self) -> Result<(), VmError> {
    while self.step()? {}
    tracing::debug!(cycles = self.cycles, eip = self.eip, "halted");
    Ok(())
  }

  /// Executes one instruction. Returns `false`, without counting a cycle, if the machine halted.
  pub fn step(&mut self) -> Result<bool, VmError> {
    let word = match self.memory.get(self.eip) {
      Some(word) => *word,
      None       => return Err(VmError::AddressOutOfRange(self.eip as Cell)),
    };
    if word == HALT {
      return Ok(false);
    }

    let instruction = decode_instruction(word);
    tracing::trace!(eip = self.eip, word, %instruction, "execute");

    match instruction {

      Instruction::Literal { value, shift, add } => {
        let value = Instruction::literal_value(value, shift) as Cell;
        match add {
          true  => {
            if self.data.is_empty() {
              return Err(StackError::Underflow(StackKind::Data).into());
            }
            self.data.set_top(self.data.top().wrapping_add(value));
          }
          false => self.data.push(value)?,
        }
        self.eip += 1;
      }

      Instruction::Jump { kind: JumpKind::Jump, target } => {
        self.eip = target as usize;
      }

      Instruction::Jump { kind: JumpKind::ZeroBranch, target } => {
        let condition = self.data.pop()?;
        self.eip = match condition == 0 {
          true  => target as usize,
          false => self.eip + 1
        };
      }

      Instruction::Jump { kind: JumpKind::Call, target } => {
        self.returns.push((self.eip + 1) as Cell)?;
        self.eip = target as usize;
      }

      Instruction::Alu(alu) => self.execute_alu(alu)?,

    } // end match instruction

    self.cycles += 1;

    #[cfg(feature = "trace_computation")]
    println!("{}", self);

    Ok(true)
  }

  /**
    Everything that can fail short of the I/O devices is checked before the first write, so a
    failed instruction leaves the stacks, memory and `EIP` as they were. A failed I/O write
    happens last and leaves the stacks adjusted.
  */
  fn execute_alu(&mut self, alu: AluInstruction) -> Result<(), VmError> {
    self.check_operands(&alu)?;
    self.data.check_adjust(alu.dstack)?;
    self.returns.check_adjust(alu.rstack)?;

    let t = self.data.top();
    let r = self.returns.top();
    if alu.output == OutputMux::MemT {
      self.byte_range(t)?;
    }

    let input = match alu.input {
      // `drop` of the only entry moves the parked slot into `T`.
      InputMux::N if self.data.depth() == 1 && drops_top(&alu) => self.data.parked(),
      InputMux::N     => self.data.peek(1)?,
      InputMux::T     => t,
      InputMux::LoadT => self.load_cell(t)?,
      InputMux::R     => r,
    };

    let out = match alu.op {
      AluOp::In      => input,
      AluOp::SwapIn  => {
        let n = self.data.peek(1)?;
        self.data.set_next(t)?;
        self.data.set_top(n);
        input
      }
      AluOp::CopyToN => {
        self.data.set_next(t)?;
        input
      }
      AluOp::Add     => input.wrapping_add(self.data.peek(1)?),
      AluOp::And     => input & self.data.peek(1)?,
      AluOp::Or      => input | self.data.peek(1)?,
      AluOp::Xor     => input ^ self.data.peek(1)?,
      AluOp::Mul     => input.wrapping_mul(self.data.peek(1)?),
      AluOp::Invert  => !input,
      AluOp::Equal   => flag(input == self.data.peek(1)?),
      AluOp::Less    => flag(self.data.peek(1)? < input),
      AluOp::ULess   => flag((self.data.peek(1)? as u64) < input as u64),
      AluOp::RShift  => shift_right(input, t),
      AluOp::LShift  => shift_left(input, t),
      AluOp::Load    => self.load_cell(input)?,
      AluOp::IoRead  => self.io_read(input)?,
    }; // end match alu.op

    self.data.adjust(alu.dstack)?;
    self.returns.adjust(alu.rstack)?;

    match alu.output {
      OutputMux::T    => self.data.set_top(out),
      OutputMux::R    => self.returns.set_top(out),
      OutputMux::MemT => self.store_cell(t, out)?,
      OutputMux::IoT  => self.io_write(t, out)?,
    }

    self.eip = match alu.ret {
      true  => r as usize,
      false => self.eip + 1
    };
    Ok(())
  }

  /**
    The parked slot below an empty data stack may only stand in for `T` when the instruction
    rewrites `T` in place. The return stack must hold the address a return or an `R` read uses.
  */
  fn check_operands(&self, alu: &AluInstruction) -> Result<(), StackError> {
    let reads_top = matches!(alu.input, InputMux::T | InputMux::LoadT)
      || matches!(alu.op, AluOp::RShift | AluOp::LShift)
      || matches!(alu.output, OutputMux::MemT | OutputMux::IoT);
    let rewrites_top = alu.input == InputMux::T
      && matches!(alu.op, AluOp::In | AluOp::Invert)
      && alu.output == OutputMux::T
      && alu.dstack == 0;

    if self.data.is_empty() && reads_top && !rewrites_top {
      return Err(StackError::Underflow(StackKind::Data));
    }
    if self.returns.is_empty() && (alu.input == InputMux::R || alu.ret) {
      return Err(StackError::Underflow(StackKind::Return));
    }
    Ok(())
  }

  // region I/O

  fn io_read(&mut self, address: Cell) -> Result<Cell, VmError> {
    match self.ports.read(address) {
      Err(VmError::Unsupported(error)) if !self.config.fail_on_unsupported_io => {
        tracing::warn!(%error, eip = self.eip, "ignoring I/O read");
        Ok(0)
      }
      result => result
    }
  }

  fn io_write(&mut self, address: Cell, value: Cell) -> Result<(), VmError> {
    match self.ports.write(address, value) {
      Err(VmError::Unsupported(error)) if !self.config.fail_on_unsupported_io => {
        tracing::warn!(%error, eip = self.eip, "ignoring I/O write");
        Ok(())
      }
      result => result
    }
  }

  // endregion

}
