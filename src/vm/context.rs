//! The machine state: memory, registers, both stacks and the I/O ports.

use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

use prettytable::{format as TableFormat, Table};

use crate::bytecode::{decode_instruction, Cell, Word};
use crate::config::VmConfig;
use crate::error::{CapacityError, StackKind, VmError};
use crate::image::Image;
use super::io::Ports;
use super::stack::Stack;

pub struct Context {
  pub(crate) config  : VmConfig,

  // Memory Store
  pub(crate) memory  : Vec<Word>,

  // Registers //
  pub(crate) here    : usize, // Compile cursor, only ever moves forward
  pub(crate) eip     : usize, // Instruction pointer, a cell address
  pub(crate) cycles  : u64,   // Instructions executed

  pub(crate) data    : Stack,
  pub(crate) returns : Stack,

  pub(crate) ports   : Ports,
}

impl Context {

  pub fn new(config: VmConfig) -> Context {
    Context {
      memory  : vec![0; config.memory_cells],
      here    : 0,
      eip     : 0,
      cycles  : 0,
      data    : Stack::new(StackKind::Data, config.stack_depth),
      returns : Stack::new(StackKind::Return, config.stack_depth),
      ports   : Ports::detached(),
      config,
    }
  }

  pub fn with_input(mut self, input: impl Read + Send + 'static) -> Context {
    self.ports.set_input(Box::new(input));
    self
  }

  pub fn with_output(mut self, output: impl Write + Send + 'static) -> Context {
    self.ports.set_output(Box::new(output));
    self
  }

  // region Accessors

  pub fn config(&self) -> &VmConfig {
    &self.config
  }

  pub fn memory(&self) -> &[Word] {
    &self.memory
  }

  pub fn here(&self) -> usize {
    self.here
  }

  pub fn eip(&self) -> usize {
    self.eip
  }

  pub fn set_eip(&mut self, eip: usize) {
    self.eip = eip;
  }

  pub fn cycles(&self) -> u64 {
    self.cycles
  }

  /// The data stack from bottom to top.
  pub fn data_stack(&self) -> &[Cell] {
    self.data.as_slice()
  }

  /// The return stack from bottom to top.
  pub fn return_stack(&self) -> &[Cell] {
    self.returns.as_slice()
  }

  // endregion

  // region Loading

  /// Copies `cells` to `HERE` and advances it. Returns the address of the first cell.
  fn append(&mut self, cells: &[Word]) -> Result<usize, CapacityError> {
    let available = self.memory.len() - self.here;
    if cells.len() > available {
      return Err(CapacityError { needed: cells.len(), available });
    }
    let start = self.here;
    self.memory[start..start + cells.len()].copy_from_slice(cells);
    self.here += cells.len();
    Ok(start)
  }

  /**
    Writes a 64-bit value at `HERE` as four little-endian cells, where `@` can load it from
    byte address `2 * HERE`. Returns the cell address.
  */
  pub fn insert_cell(&mut self, value: Cell) -> Result<usize, CapacityError> {
    let bytes = value.to_le_bytes();
    let cells: Vec<Word> = bytes
      .chunks(2)
      .map(|pair| Word::from_le_bytes([pair[0], pair[1]]))
      .collect();
    self.append(&cells)
  }

  /// Appends an image at `HERE` and returns its start address. `EIP` is left alone.
  pub fn load_image(&mut self, image: &Image) -> Result<usize, CapacityError> {
    self.append(image.cells())
  }

  // endregion

  // region Data memory

  /// Byte `address` to byte `address + 8` as one little-endian cell.
  pub(crate) fn load_cell(&self, address: Cell) -> Result<Cell, VmError> {
    let start = self.byte_range(address)?;
    let mut bytes = [0u8; 8];
    for (i, byte) in bytes.iter_mut().enumerate() {
      let position = start + i;
      let cell = self.memory[position / 2];
      *byte = match position % 2 == 0 {
        true  => (cell & 0xFF) as u8,
        false => (cell >> 8) as u8
      };
    }
    Ok(Cell::from_le_bytes(bytes))
  }

  pub(crate) fn store_cell(&mut self, address: Cell, value: Cell) -> Result<(), VmError> {
    let start = self.byte_range(address)?;
    for (i, byte) in value.to_le_bytes().iter().enumerate() {
      let position = start + i;
      let cell = &mut self.memory[position / 2];
      *cell = match position % 2 == 0 {
        true  => (*cell & 0xFF00) | *byte as Word,
        false => (*cell & 0x00FF) | ((*byte as Word) << 8)
      };
    }
    Ok(())
  }

  pub(crate) fn byte_range(&self, address: Cell) -> Result<usize, VmError> {
    let byte_count = self.memory.len() * 2;
    match address >= 0 && (address as u64).saturating_add(8) <= byte_count as u64 {
      true  => Ok(address as usize),
      false => Err(VmError::AddressOutOfRange(address))
    }
  }

  // endregion

  // region Display methods

  fn make_stack_table(name: char, stack: &[Cell]) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Slot", ubl->"Contents"]);

    // Top of the stack first.
    for (i, cell) in stack.iter().rev().enumerate() {
      let label = match i {
        0 => format!("{}[T] =", name),
        1 => format!("{}[N] =", name),
        _ => format!("{}[{}] =", name, stack.len() - 1 - i)
      };
      table.add_row(row![r->label, format!("{}", cell)]);
    }

    table
  }

  fn make_register_table(&self) -> Table {
    let mut table = Table::new();
    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Register", ubl->"Contents"]);

    let current = self.memory.get(self.eip).copied().unwrap_or(0);
    table.add_row(row![r->"EIP =",    format!("{:#06x}", self.eip)]);
    table.add_row(row![r->"[EIP] =",  format!("{:#06x}  {}", current, decode_instruction(current))]);
    table.add_row(row![r->"HERE =",   format!("{:#06x}", self.here)]);
    table.add_row(row![r->"cycles =", format!("{}", self.cycles)]);
    table
  }

  // endregion

}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Context {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let register_table = self.make_register_table();
    let data_table     = Context::make_stack_table('D', self.data.as_slice());
    let return_table   = Context::make_stack_table('R', self.returns.as_slice());

    let mut combined_table = table!([register_table, data_table, return_table]);

    combined_table.set_titles(row![ub->"Registers", ub->"Data Stack", ub->"Return Stack"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(f, "{}", combined_table)
  }
}
