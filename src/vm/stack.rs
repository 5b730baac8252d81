/*!
  A fixed capacity stack of cells. Slot 0 sits below the bottom of the stack and stands in for
  the top register when the stack is empty, so an instruction that only rewrites `T` (`exit`,
  `noop`) is harmless on an empty stack. `peek` and `set_next` never reach the parked slot.
  Everything that would reach below the bottom is a `StackError`.
*/

use crate::bytecode::Cell;
use crate::error::{StackError, StackKind};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stack {
  kind  : StackKind,
  // `cells[depth]` is the top, `cells[0]` the slot below the bottom.
  cells : Vec<Cell>,
  depth : usize,
}

impl Stack {

  pub fn new(kind: StackKind, capacity: usize) -> Stack {
    Stack {
      kind,
      cells : vec![0; capacity + 1],
      depth : 0
    }
  }

  pub fn depth(&self) -> usize {
    self.depth
  }

  pub fn capacity(&self) -> usize {
    self.cells.len() - 1
  }

  pub fn is_empty(&self) -> bool {
    self.depth == 0
  }

  /// Entries from the bottom of the stack to the top.
  pub fn as_slice(&self) -> &[Cell] {
    &self.cells[1..=self.depth]
  }

  /// The top register.
  pub fn top(&self) -> Cell {
    self.cells[self.depth]
  }

  pub fn set_top(&mut self, value: Cell) {
    self.cells[self.depth] = value;
  }

  /// The slot below the bottom.
  pub fn parked(&self) -> Cell {
    self.cells[0]
  }

  /// The entry `index` places below the top. `peek(0)` is the top, `peek(1)` is `N`.
  pub fn peek(&self, index: usize) -> Result<Cell, StackError> {
    match index < self.depth {
      true  => Ok(self.cells[self.depth - index]),
      false => Err(StackError::Underflow(self.kind))
    }
  }

  pub fn set_next(&mut self, value: Cell) -> Result<(), StackError> {
    match self.depth >= 2 {
      true  => {
        self.cells[self.depth - 1] = value;
        Ok(())
      }
      false => Err(StackError::Underflow(self.kind))
    }
  }

  pub fn push(&mut self, value: Cell) -> Result<(), StackError> {
    if self.depth == self.capacity() {
      return Err(StackError::Overflow(self.kind));
    }
    self.depth += 1;
    self.cells[self.depth] = value;
    Ok(())
  }

  pub fn pop(&mut self) -> Result<Cell, StackError> {
    if self.depth == 0 {
      return Err(StackError::Underflow(self.kind));
    }
    let value = self.cells[self.depth];
    self.depth -= 1;
    Ok(value)
  }

  /// Whether `adjust(delta)` would succeed, without changing anything.
  pub fn check_adjust(&self, delta: i8) -> Result<(), StackError> {
    let count = delta.unsigned_abs() as usize;
    match delta {
      d if d > 0 && self.depth + count > self.capacity() => Err(StackError::Overflow(self.kind)),
      d if d < 0 && count > self.depth                   => Err(StackError::Underflow(self.kind)),
      _                                                   => Ok(())
    }
  }

  /**
    Applies an ALU stack delta. Growing copies the current top into the new slot, which the
    instruction's output then overwrites. The engine only grows an empty stack when the new top
    comes from somewhere else.
  */
  pub fn adjust(&mut self, delta: i8) -> Result<(), StackError> {
    self.check_adjust(delta)?;
    match delta {
      d if d > 0 => {
        for _ in 0..d {
          self.cells[self.depth + 1] = self.cells[self.depth];
          self.depth += 1;
        }
      }
      d if d < 0 => self.depth -= d.unsigned_abs() as usize,
      _          => {}
    }
    Ok(())
  }

}
