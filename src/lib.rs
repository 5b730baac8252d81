/*!
  Hexaforth: a 16-bit Forth instruction set, a compiler from Forth-like source text to images of
  that instruction set, and a virtual machine that runs the images.

  ```text
  source -> compiler::compile(source, &Dictionary) -> Image -> Context::load_image -> Context::run
  ```
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod bytecode;
pub mod compiler;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod image;
pub mod vm;

#[cfg(test)]
mod testutil;

pub use compiler::compile;
pub use config::VmConfig;
pub use dictionary::{build_dictionary, Dictionary};
pub use image::Image;
pub use vm::Context;
