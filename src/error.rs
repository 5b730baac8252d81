/*!
  Error types for every stage of the pipeline. Each stage gets its own enum so callers can tell
  a malformed base word table apart from a bad program or a failed run. `VmError` is what the
  execution engine returns and wraps the narrower runtime errors.
*/

use thiserror::Error;

use crate::bytecode::{Cell, Word};

/// A field value did not fit its slot in the 16-bit instruction.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum EncodingError {
  #[error("literal value {0} does not fit in 12 bits")]
  LiteralOutOfRange(u16),

  #[error("literal shift {0} is not in 0..=3")]
  ShiftOutOfRange(u8),

  #[error("jump target {0:#06x} does not fit in 13 bits")]
  TargetOutOfRange(u16),

  #[error("stack delta {0} is not one of -2, -1, 0, 1")]
  DeltaOutOfRange(i8),
}

/// A static word definition could not be built.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum DefinitionError {
  #[error("in `{word}`: unknown token `{token}`")]
  UnknownToken { word: String, token: String },

  #[error("in `{word}`: literal `{token}` is larger than 4095")]
  LiteralTooLarge { word: String, token: String },

  #[error("`{0}` is defined more than once")]
  Duplicate(String),

  #[error("definitions form a cycle: {}", .0.join(" -> "))]
  Cycle(Vec<String>),

  #[error("`{0}` compiles to no instructions")]
  Empty(String),

  #[error("`{word}` compiles to {length} instructions, the limit is {limit}")]
  TooLong { word: String, length: usize, limit: usize },

  #[error("in `{word}`: fields {accumulator:#06x} are never terminated")]
  Unterminated { word: String, accumulator: Word },

  #[error("`{word}` is declared primitive but compiles to {length} instructions")]
  NotPrimitive { word: String, length: usize },
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum CompileError {
  #[error("unknown word `{0}`")]
  UnknownWord(String),

  #[error("string literal is missing its closing quote")]
  UnterminatedString,

  #[error(transparent)]
  Encoding(#[from] EncodingError),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StackKind {
  Data,
  Return,
}

impl std::fmt::Display for StackKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      StackKind::Data   => write!(f, "data"),
      StackKind::Return => write!(f, "return"),
    }
  }
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum StackError {
  #[error("{0} stack underflow")]
  Underflow(StackKind),

  #[error("{0} stack overflow")]
  Overflow(StackKind),
}

#[derive(Debug, Error)]
pub enum IoError {
  #[error("input stream is exhausted")]
  EndOfInput,

  #[error("failed to read input: {0}")]
  Read(#[source] std::io::Error),

  #[error("failed to write output: {0}")]
  Write(#[source] std::io::Error),
}

/// An I/O access at an address nothing is mapped to.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum UnsupportedOperationError {
  #[error("no input device at address {0:#x}")]
  IoRead(Cell),

  #[error("no output device at address {0:#x}")]
  IoWrite(Cell),
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("{needed} cells do not fit in memory, {available} cells are free")]
pub struct CapacityError {
  pub needed    : usize,
  pub available : usize,
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ImageError {
  #[error("line {line}: expected 8 hex digits")]
  MalformedLine { line: usize },

  #[error("image has an odd number of bytes ({0})")]
  OddLength(usize),
}

#[derive(Debug, Error)]
pub enum VmError {
  #[error(transparent)]
  Stack(#[from] StackError),

  #[error(transparent)]
  Io(#[from] IoError),

  #[error(transparent)]
  Unsupported(#[from] UnsupportedOperationError),

  #[error(transparent)]
  Capacity(#[from] CapacityError),

  #[error("address {0:#x} is outside of memory")]
  AddressOutOfRange(Cell),
}
