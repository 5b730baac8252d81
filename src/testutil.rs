//! Helpers shared by the unit tests of several modules.

use crate::bytecode::{encode_instruction, Cell, Instruction, HALT};
use crate::compiler::compile;
use crate::config::VmConfig;
use crate::dictionary::Dictionary;
use crate::image::Image;
use crate::vm::{Context, SharedBuffer};

/// The observable state after a run.
#[derive(Debug)]
pub struct TestRun {
  pub data    : Vec<Cell>,
  pub returns : Vec<Cell>,
  pub eip     : usize,
  pub cycles  : u64,
  pub output  : Vec<u8>,
}

/**
  Writes `init` to memory as 64-bit cells starting at address 0, compiles `source` with the base
  dictionary right after it, and runs it with `input` behind the key device.
*/
pub fn run_source_with(init: &[Cell], source: &str, input: &'static [u8]) -> TestRun {
  let dictionary = Dictionary::base().expect("base dictionary");
  let image = compile(source, &dictionary)
    .unwrap_or_else(|e| panic!("`{}` did not compile: {}", source, e));

  let output = SharedBuffer::new();
  let mut context = Context::new(VmConfig::default())
    .with_input(input)
    .with_output(output.clone());
  for value in init {
    context.insert_cell(*value).expect("initial cell");
  }
  let start = context.load_image(&image).expect("image fits");
  context.set_eip(start);
  context.run().unwrap_or_else(|e| panic!("`{}` failed: {}\n{}", source, e, context));

  TestRun {
    data    : context.data_stack().to_vec(),
    returns : context.return_stack().to_vec(),
    eip     : context.eip(),
    cycles  : context.cycles(),
    output  : output.contents(),
  }
}

pub fn run_source(source: &str) -> TestRun {
  run_source_with(&[], source, b"")
}

/// Runs raw instructions followed by a halt and returns the data stack.
pub fn run_instructions(instructions: &[Instruction]) -> Vec<Cell> {
  let mut cells: Vec<_> = instructions
    .iter()
    .map(|instruction| encode_instruction(instruction).expect("valid instruction"))
    .collect();
  cells.push(HALT);

  let mut context = Context::new(VmConfig::default());
  context.load_image(&Image::from_cells(cells)).expect("image fits");
  context.run().expect("literal sequence runs");
  context.data_stack().to_vec()
}
