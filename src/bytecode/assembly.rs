/*!
  The field mnemonic table. Every token maps to a partial instruction bit pattern which the
  dictionary builder ORs together. The names come from the `strum` serializations of the field
  enums, so the text printed by `Instruction`'s `Display` is always accepted here.

  ```text
    input       N->IN  T->IN  [T]->IN  R->IN
    ALU op      IN->  T<->N,IN->  T->N,IN->  IN+N ... io[IN]
    output      ->T  ->R  ->io[T]  ->[T]
    deltas      d+1 d+0 d-1 d-2   r+1 r+0 r-1 r-2
    flags       RET  imm+  imm<<12  imm<<24  imm<<36
    terminals   imm  ubranch  0branch  scall  alu
  ```
  A bare decimal integer up to 4095 is also accepted by the builder; it means a literal with
  that value.
*/

use std::collections::HashMap;

use strum::IntoEnumIterator;

use super::{AluOp, InputMux, JumpKind, OutputMux, Word, LITERAL_ADD, LITERAL_FLAG};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
  /// Selects the ALU input. ORed in like an inert field.
  Input,
  /// ORed into the accumulator.
  Inert,
  /// ORed into the accumulator, which is then emitted as an instruction.
  Terminal,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Field {
  pub bits : Word,
  pub kind : FieldKind,
}

lazy_static! {
  pub static ref FIELDS: HashMap<&'static str, Field> = make_field_table();
}

pub fn lookup_field(token: &str) -> Option<Field> {
  FIELDS.get(token).copied()
}

fn make_field_table() -> HashMap<&'static str, Field> {
  let mut table: HashMap<&'static str, Field> = HashMap::new();
  let mut add = |name: &'static str, bits: Word, kind: FieldKind| {
    table.insert(name, Field { bits, kind });
  };

  for input in InputMux::iter() {
    add(input.into(), (Into::<u8>::into(input) as Word) << 10, FieldKind::Input);
  }
  for op in AluOp::iter() {
    add(op.into(), (Into::<u8>::into(op) as Word) << 4, FieldKind::Inert);
  }
  for output in OutputMux::iter() {
    add(output.into(), (Into::<u8>::into(output) as Word) << 8, FieldKind::Inert);
  }

  // Two bit two's complement deltas.
  let dstack: [(&'static str, Word); 4] = [("d+1", 1), ("d+0", 0), ("d-1", 3), ("d-2", 2)];
  let rstack: [(&'static str, Word); 4] = [("r+1", 1), ("r+0", 0), ("r-1", 3), ("r-2", 2)];
  for (name, bits) in dstack.iter() {
    add(*name, *bits << 2, FieldKind::Inert);
  }
  for (name, bits) in rstack.iter() {
    add(*name, *bits, FieldKind::Inert);
  }

  add("RET",     0x1000,      FieldKind::Inert);
  add("imm+",    LITERAL_ADD, FieldKind::Inert);
  add("imm<<12", 0x1000,      FieldKind::Inert);
  add("imm<<24", 0x2000,      FieldKind::Inert);
  add("imm<<36", 0x3000,      FieldKind::Inert);

  add("imm", LITERAL_FLAG, FieldKind::Terminal);
  for kind in JumpKind::iter() {
    add(kind.into(), (Into::<u8>::into(kind) as Word) << 13, FieldKind::Terminal);
  }
  add("alu", 0x6000, FieldKind::Terminal);

  table
}
