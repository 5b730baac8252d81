/// Run time settings for a `Context`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VmConfig {
  /// Size of memory in 16-bit cells.
  pub memory_cells           : usize,
  /// Capacity of each of the data and return stacks.
  pub stack_depth            : usize,
  /// When false, I/O at an unmapped address logs a warning and does nothing (reads give 0).
  pub fail_on_unsupported_io : bool,
}

pub const DEFAULT_MEMORY_CELLS: usize = 32768;
pub const DEFAULT_STACK_DEPTH : usize = 128;

impl Default for VmConfig {
  fn default() -> Self {
    VmConfig {
      memory_cells           : DEFAULT_MEMORY_CELLS,
      stack_depth            : DEFAULT_STACK_DEPTH,
      fail_on_unsupported_io : true,
    }
  }
}

impl VmConfig {
  pub fn with_memory_cells(mut self, memory_cells: usize) -> Self {
    self.memory_cells = memory_cells;
    self
  }

  pub fn with_stack_depth(mut self, stack_depth: usize) -> Self {
    self.stack_depth = stack_depth;
    self
  }

  pub fn lenient_io(mut self) -> Self {
    self.fail_on_unsupported_io = false;
    self
  }
}
