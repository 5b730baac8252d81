mod compile;
mod literal;
mod token;

pub use compile::compile;
pub use literal::{encode_literal_sequence, INVERT, LSHIFT};
pub use token::{tokenize, Token};
