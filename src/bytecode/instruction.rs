use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/**
  Selects the operand `IN` of an ALU instruction. The serialized names are the field mnemonics
  used in word definitions.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[repr(u8)]
pub enum InputMux {
  #[strum(to_string = "N->IN")]
  N,
  #[strum(to_string = "T->IN")]
  T,
  #[strum(to_string = "[T]->IN")]
  LoadT,
  #[strum(to_string = "R->IN")]
  R,
}

/**
  The sixteen ALU operations. `IN` is the selected input, `T` and `N` are the top two entries of
  the data stack as they are before the instruction executes. Comparisons produce `-1` for true.
  The order is the encoding and is significant.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[repr(u8)]
pub enum AluOp {
  #[strum(to_string = "IN->")]
  In,            // IN
  #[strum(to_string = "T<->N,IN->")]
  SwapIn,        // T and N trade places, then IN
  #[strum(to_string = "T->N,IN->")]
  CopyToN,       // N := T, then IN
  #[strum(to_string = "IN+N")]
  Add,
  #[strum(to_string = "IN&N")]
  And,
  #[strum(to_string = "IN|N")]
  Or,
  #[strum(to_string = "IN^N")]
  Xor,
  #[strum(to_string = "IN*N")]
  Mul,
  #[strum(to_string = "~IN")]
  Invert,
  #[strum(to_string = "IN==N")]
  Equal,
  #[strum(to_string = "N<IN")]
  Less,          // signed
  #[strum(to_string = "Nu<IN")]
  ULess,
  #[strum(to_string = "IN>>T")]
  RShift,        // logical
  #[strum(to_string = "IN<<T")]
  LShift,
  #[strum(to_string = "[IN]")]
  Load,
  #[strum(to_string = "io[IN]")]
  IoRead,
}

/// Where the ALU result goes.
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[repr(u8)]
pub enum OutputMux {
  #[strum(to_string = "->T")]
  T,
  #[strum(to_string = "->R")]
  R,
  #[strum(to_string = "->io[T]")]
  IoT,
  #[strum(to_string = "->[T]")]
  MemT,
}

/// The three control transfer classes. Class 3 is the ALU and is not a jump.
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[repr(u8)]
pub enum JumpKind {
  #[strum(to_string = "ubranch")]
  Jump,
  #[strum(to_string = "0branch")]
  ZeroBranch,
  #[strum(to_string = "scall")]
  Call,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct AluInstruction {
  pub input  : InputMux,
  pub op     : AluOp,
  pub output : OutputMux,
  pub dstack : i8,
  pub rstack : i8,
  /// Jump to the pre-instruction top of the return stack.
  pub ret    : bool,
}

/// The unencoded form of an instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// [1][add:1][shift:2][value:12]
  Literal {
    value : u16,
    shift : u8,
    add   : bool
  },
  /// [0][class:2][target:13]
  Jump {
    kind   : JumpKind,
    target : u16
  },
  /// [0][11][RET:1][in:2][out:2][op:4][dstack:2][rstack:2]
  Alu(AluInstruction),
}

impl Instruction {
  /// The contribution of a literal to the value on the stack.
  pub fn literal_value(value: u16, shift: u8) -> u64 {
    (value as u64) << (12 * shift as u32)
  }
}

// The text is accepted by the dictionary builder and reproduces the same bits.
impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      Instruction::Literal { value, shift, add } => {
        write!(f, "{}", value)?;
        if *shift > 0 {
          write!(f, " imm<<{}", 12 * *shift as u32)?;
        }
        if *add {
          write!(f, " imm+")?;
        }
        write!(f, " imm")
      }

      Instruction::Jump { kind, target } => {
        write!(f, "{:#06x} {}", target, kind)
      }

      Instruction::Alu(alu) => {
        write!(
          f,
          "{} {} {} d{:+} r{:+}",
          alu.input, alu.op, alu.output, alu.dstack, alu.rstack
        )?;
        if alu.ret {
          write!(f, " RET")?;
        }
        write!(f, " alu")
      }

    } // end match
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr;

  #[test]
  fn mnemonics_parse_back() {
    assert_eq!(InputMux::from_str("[T]->IN"), Ok(InputMux::LoadT));
    assert_eq!(AluOp::from_str("T<->N,IN->"), Ok(AluOp::SwapIn));
    assert_eq!(AluOp::from_str("Nu<IN"), Ok(AluOp::ULess));
    assert_eq!(OutputMux::from_str("->io[T]"), Ok(OutputMux::IoT));
    assert_eq!(JumpKind::from_str("0branch"), Ok(JumpKind::ZeroBranch));
    assert!(AluOp::from_str("IN-N").is_err());
  }

  #[test]
  fn op_codes_follow_declaration_order() {
    assert_eq!(Into::<u8>::into(AluOp::In), 0);
    assert_eq!(Into::<u8>::into(AluOp::Mul), 7);
    assert_eq!(Into::<u8>::into(AluOp::IoRead), 15);
    assert_eq!(Into::<u8>::into(OutputMux::MemT), 3);
  }

  #[test]
  fn display_alu() {
    let add = Instruction::Alu(AluInstruction {
      input  : InputMux::T,
      op     : AluOp::Add,
      output : OutputMux::T,
      dstack : -1,
      rstack : 0,
      ret    : false,
    });
    assert_eq!(add.to_string(), "T->IN IN+N ->T d-1 r+0 alu");
  }

  #[test]
  fn display_literal_and_jump() {
    let literal = Instruction::Literal { value: 5, shift: 2, add: true };
    assert_eq!(literal.to_string(), "5 imm<<24 imm+ imm");
    let call = Instruction::Jump { kind: JumpKind::Call, target: 0x123 };
    assert_eq!(call.to_string(), "0x0123 scall");
  }
}
