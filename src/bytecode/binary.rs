/*!
  This module is responsible for the encoding and decoding of binary instructions.
  Encoding validates every field. Decoding is total: every 16-bit word is some instruction.
*/
use std::convert::TryFrom;

use super::{AluInstruction, AluOp, Instruction, InputMux, JumpKind, OutputMux, Word};
use crate::error::EncodingError;

// If you change any of these you must also change the field table in `assembly`.
pub const LITERAL_FLAG : Word = 0x8000;
pub const LITERAL_ADD  : Word = 0x4000;
const LITERAL_SHIFT_OFFSET : u32  = 12;
const LITERAL_VALUE_MASK   : Word = 0x0FFF;

const CLASS_OFFSET : u32  = 13;
const CLASS_ALU    : Word = 3;
const TARGET_MASK  : Word = 0x1FFF;

const RET_FLAG       : Word = 0x1000;
const IN_MUX_OFFSET  : u32  = 10;
const OUT_MUX_OFFSET : u32  = 8;
const ALU_OP_OFFSET  : u32  = 4;
const DSTACK_OFFSET  : u32  = 2;
const RSTACK_OFFSET  : u32  = 0;

pub const MAX_LITERAL : u16 = 4095;
pub const MAX_TARGET  : u16 = 8191;

/// Fetching this word stops the machine.
pub const HALT: Word = 0x0000;
/// `T->IN IN-> ->T d+0 r-1 RET alu`, the word `exit`.
pub const EXIT: Word = 0x7403;

pub fn encode_literal(value: u16, shift: u8, add: bool) -> Result<Word, EncodingError> {
  if value > MAX_LITERAL {
    return Err(EncodingError::LiteralOutOfRange(value));
  }
  if shift > 3 {
    return Err(EncodingError::ShiftOutOfRange(shift));
  }
  let add_bit = match add {
    true  => LITERAL_ADD,
    false => 0
  };
  Ok(LITERAL_FLAG | add_bit | ((shift as Word) << LITERAL_SHIFT_OFFSET) | value)
}

pub fn encode_jump(kind: JumpKind, target: u16) -> Result<Word, EncodingError> {
  if target > MAX_TARGET {
    return Err(EncodingError::TargetOutOfRange(target));
  }
  Ok(((Into::<u8>::into(kind) as Word) << CLASS_OFFSET) | target)
}

pub fn encode_alu(
    input  : InputMux,
    op     : AluOp,
    output : OutputMux,
    dstack : i8,
    rstack : i8,
    ret    : bool
  ) -> Result<Word, EncodingError>
{
  let ret_bit = match ret {
    true  => RET_FLAG,
    false => 0
  };
  Ok(
    (CLASS_ALU << CLASS_OFFSET)
      | ret_bit
      | ((Into::<u8>::into(input)  as Word) << IN_MUX_OFFSET)
      | ((Into::<u8>::into(output) as Word) << OUT_MUX_OFFSET)
      | ((Into::<u8>::into(op)     as Word) << ALU_OP_OFFSET)
      | (encode_delta(dstack)? << DSTACK_OFFSET)
      | (encode_delta(rstack)? << RSTACK_OFFSET)
  )
}

pub fn encode_instruction(instruction: &Instruction) -> Result<Word, EncodingError> {
  match instruction {

    Instruction::Literal { value, shift, add } => encode_literal(*value, *shift, *add),

    Instruction::Jump { kind, target } => encode_jump(*kind, *target),

    Instruction::Alu(alu) => {
      encode_alu(alu.input, alu.op, alu.output, alu.dstack, alu.rstack, alu.ret)
    }

  }
}

pub fn decode_instruction(word: Word) -> Instruction {
  if word & LITERAL_FLAG != 0 {
    return Instruction::Literal {
      value : word & LITERAL_VALUE_MASK,
      shift : ((word >> LITERAL_SHIFT_OFFSET) & 0b11) as u8,
      add   : word & LITERAL_ADD != 0
    };
  }

  let class = ((word >> CLASS_OFFSET) & 0b11) as u8;
  match JumpKind::try_from(class) {

    Ok(kind) => Instruction::Jump { kind, target: word & TARGET_MASK },

    // The only class that is not a jump.
    Err(_) => {
      let field = |offset: u32, mask: Word| ((word >> offset) & mask) as u8;
      // Each field is masked to its full width, so every value names a variant and the
      // fallbacks below are never taken.
      Instruction::Alu(AluInstruction {
        input  : InputMux::try_from(field(IN_MUX_OFFSET, 0b11)).unwrap_or(InputMux::R),
        op     : AluOp::try_from(field(ALU_OP_OFFSET, 0b1111)).unwrap_or(AluOp::IoRead),
        output : OutputMux::try_from(field(OUT_MUX_OFFSET, 0b11)).unwrap_or(OutputMux::MemT),
        dstack : decode_delta(field(DSTACK_OFFSET, 0b11)),
        rstack : decode_delta(field(RSTACK_OFFSET, 0b11)),
        ret    : word & RET_FLAG != 0
      })
    }

  } // end match class
}

/// Raw equality of two encoded instructions.
pub fn equals(a: Word, b: Word) -> bool {
  a == b
}

// Two bit two's complement.
fn encode_delta(delta: i8) -> Result<Word, EncodingError> {
  match delta {
    0  => Ok(0),
    1  => Ok(1),
    -2 => Ok(2),
    -1 => Ok(3),
    _  => Err(EncodingError::DeltaOutOfRange(delta))
  }
}

fn decode_delta(bits: u8) -> i8 {
  match bits & 0b11 {
    0 => 0,
    1 => 1,
    2 => -2,
    _ => -1
  }
}
