/*!
  Building a 64-bit value on the data stack out of 12-bit literal chunks.

  The first chunk pushes and every later chunk adds, so a value up to 48 bits costs one literal
  per non-zero chunk. Negative values are built as their complement followed by `invert`. Values
  wider than 48 bits are built as `high 48 lshift` and the low 48 bits are added on top.
*/

use crate::bytecode::{AluInstruction, AluOp, Cell, Instruction, InputMux, OutputMux};

const CHUNK_BITS : u32 = 12;
const CHUNK_MASK : u64 = 0xFFF;
const LOW_48     : u64 = 0xFFFF_FFFF_FFFF;

/// The word `invert`.
pub const INVERT: Instruction = Instruction::Alu(AluInstruction {
  input  : InputMux::T,
  op     : AluOp::Invert,
  output : OutputMux::T,
  dstack : 0,
  rstack : 0,
  ret    : false
});

/// The word `lshift`.
pub const LSHIFT: Instruction = Instruction::Alu(AluInstruction {
  input  : InputMux::N,
  op     : AluOp::LShift,
  output : OutputMux::T,
  dstack : -1,
  rstack : 0,
  ret    : false
});

/// The instructions that leave `n` on top of the data stack. Never empty.
pub fn encode_literal_sequence(n: Cell) -> Vec<Instruction> {
  let mut sequence = Vec::new();
  encode_into(n, &mut sequence);
  tracing::trace!(value = n, instructions = sequence.len(), "encoded literal");
  sequence
}

fn literal(value: u64, shift: u32, add: bool) -> Instruction {
  Instruction::Literal {
    value : (value & CHUNK_MASK) as u16,
    shift : shift as u8,
    add
  }
}

fn encode_into(n: Cell, sequence: &mut Vec<Instruction>) {
  if n == 0 {
    sequence.push(literal(0, 0, false));
    return;
  }

  let negative = n < 0;
  // For negative n this is |n| - 1, which `invert` turns back into n.
  let mut acc: u64 = match negative {
    true  => !(n as u64),
    false => n as u64
  };
  let mut first = true;

  if acc >> 48 != 0 {
    encode_into((acc >> 48) as Cell, sequence);
    encode_into(48, sequence);
    sequence.push(LSHIFT);
    acc &= LOW_48;
    first = false;
  }

  if first && !acc <= CHUNK_MASK {
    sequence.push(literal(!acc, 0, false));
    sequence.push(INVERT);
    return;
  }

  let mut shift_count = 0;
  while acc >> (CHUNK_BITS * (shift_count + 1)) != 0 {
    shift_count += 1;
  }
  for shift in (0..=shift_count).rev() {
    let chunk = (acc >> (CHUNK_BITS * shift)) & CHUNK_MASK;
    // A lone zero chunk still has to push something.
    if chunk != 0 || (first && shift == 0) {
      sequence.push(literal(chunk, shift, !first));
      first = false;
    }
  }

  if negative {
    sequence.push(INVERT);
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  use crate::bytecode::encode_instruction;
  use crate::testutil::run_instructions;

  fn evaluate(n: Cell) -> Vec<Cell> {
    run_instructions(&encode_literal_sequence(n))
  }

  #[test]
  fn zero_is_one_push() {
    assert_eq!(encode_literal_sequence(0), vec![literal(0, 0, false)]);
  }

  #[test]
  fn chunks_push_then_add() {
    assert_eq!(
      encode_literal_sequence(0x123_456),
      vec![literal(0x123, 1, false), literal(0x456, 0, true)]
    );
    // Zero chunks are skipped.
    assert_eq!(encode_literal_sequence(4096), vec![literal(1, 1, false)]);
    assert_eq!(encode_literal_sequence(1 << 47), vec![literal(0x800, 3, false)]);
  }

  #[test]
  fn negatives_invert_the_complement() {
    assert_eq!(encode_literal_sequence(-1), vec![literal(0, 0, false), INVERT]);
    assert_eq!(encode_literal_sequence(-1024), vec![literal(1023, 0, false), INVERT]);
  }

  #[test]
  fn wide_values_are_split_at_48_bits() {
    let sequence = encode_literal_sequence(Cell::min_value());
    let lshift = sequence.iter().position(|i| *i == LSHIFT);
    assert!(lshift.is_some());
    assert_eq!(sequence.last(), Some(&INVERT));
  }

  #[test]
  fn fixed_instructions_match_their_words() {
    let dictionary = crate::dictionary::Dictionary::base().unwrap();
    assert_eq!(
      Ok(dictionary.get("invert").unwrap().instructions[0]),
      encode_instruction(&INVERT)
    );
    assert_eq!(
      Ok(dictionary.get("lshift").unwrap().instructions[0]),
      encode_instruction(&LSHIFT)
    );
  }

  #[test]
  fn round_trip_boundaries() {
    let values: [Cell; 16] = [
      0, 1, 4095, 4096, -1, -1024,
      (1 << 32) - 1, -((1 << 32) - 1),
      (1 << 48) - 1, -(1 << 48),
      0xFFFF_FFFF_FFFF_FF00_u64 as Cell,
      Cell::min_value(), Cell::min_value() + 1,
      Cell::max_value(), Cell::max_value() - 1,
      1 << 48,
    ];
    for n in values.iter() {
      assert_eq!(evaluate(*n), vec![*n], "value {}", n);
    }
  }

  proptest! {
    #[test]
    fn round_trip_any_value(n: i64) {
      prop_assert_eq!(evaluate(n), vec![n]);
    }
  }
}
