/*!

  The VM executes 16-bit instructions out of a memory of 16-bit cells. Values on the data and
  return stacks are 64-bit signed integers. Every instruction is exactly one cell, and each
  bit pattern has exactly one interpretation:

  ```text
    Literal:  [1][add:1][shift:2][value:12]
    Jump:     [0][class:2][target:13]               class 0 = ubranch, 1 = 0branch, 2 = scall
    ALU:      [0][class:2 = 3][RET:1][in:2][out:2][op:4][dstack:2][rstack:2]
  ```

  A literal pushes `value << (12*shift)`, or adds it to the top of the data stack when `add` is
  set. Stack deltas are two bit two's complement numbers, so they range over `-2..=1`.

  The all-zero cell is the halt sentinel. It is also the encoding of `ubranch 0`, which is why
  nothing can jump to address zero.

  The textual form of instructions is the field mnemonic language understood by the
  dictionary builder, e.g. `T->IN IN+N ->T d-1 r+0 alu`. See `assembly` for the field table.
*/

mod binary;
mod instruction;
pub mod assembly;

pub use binary::{
  decode_instruction, encode_alu, encode_instruction, encode_jump, encode_literal, equals,
  EXIT, HALT, LITERAL_ADD, LITERAL_FLAG, MAX_LITERAL, MAX_TARGET,
};
pub use instruction::{AluInstruction, AluOp, Instruction, InputMux, JumpKind, OutputMux};

/// One memory cell, which holds one instruction.
pub type Word = u16;
/// One stack entry.
pub type Cell = i64;
