/*!
  Memory mapped I/O. The machine has three devices:

  ```text
    0xE0  read    one byte from the input stream
    0xF1  write   the low byte of the value
    0xF0  write   the value as little-endian bytes, only as many as its highest set bit needs
  ```
*/

use std::io::{ErrorKind, Read, Write};
use std::sync::{Arc, Mutex};

use crate::bytecode::Cell;
use crate::error::{IoError, UnsupportedOperationError, VmError};

pub const IO_KEY       : Cell = 0xE0;
pub const IO_EMIT_CELL : Cell = 0xF0;
pub const IO_EMIT      : Cell = 0xF1;

/// The input and output streams behind the I/O addresses.
pub struct Ports {
  input  : Box<dyn Read + Send>,
  output : Box<dyn Write + Send>,
}

impl Ports {

  pub fn new(input: Box<dyn Read + Send>, output: Box<dyn Write + Send>) -> Ports {
    Ports { input, output }
  }

  /// No input, and output is discarded.
  pub fn detached() -> Ports {
    Ports::new(Box::new(std::io::empty()), Box::new(std::io::sink()))
  }

  pub fn set_input(&mut self, input: Box<dyn Read + Send>) {
    self.input = input;
  }

  pub fn set_output(&mut self, output: Box<dyn Write + Send>) {
    self.output = output;
  }

  pub fn read(&mut self, address: Cell) -> Result<Cell, VmError> {
    match address {

      IO_KEY => {
        let mut byte = [0u8; 1];
        match self.input.read_exact(&mut byte) {
          Ok(())                                          => Ok(byte[0] as Cell),
          Err(e) if e.kind() == ErrorKind::UnexpectedEof  => Err(IoError::EndOfInput.into()),
          Err(e)                                          => Err(IoError::Read(e).into()),
        }
      }

      _ => Err(UnsupportedOperationError::IoRead(address).into())

    }
  }

  pub fn write(&mut self, address: Cell, value: Cell) -> Result<(), VmError> {
    let bytes = value.to_le_bytes();
    let count = match address {
      IO_EMIT      => 1,
      IO_EMIT_CELL => significant_bytes(value),
      _            => return Err(UnsupportedOperationError::IoWrite(address).into())
    };
    self.output.write_all(&bytes[..count]).map_err(IoError::Write)?;
    self.output.flush().map_err(IoError::Write)?;
    Ok(())
  }

}

/// The number of bytes needed to hold every set bit of `value`. Zero needs none.
fn significant_bytes(value: Cell) -> usize {
  let bits = 64 - (value as u64).leading_zeros() as usize;
  (bits + 7) / 8
}

/**
  An output stream that can be read back while the machine owns a handle to it. Clones share
  the same buffer.
*/
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
  bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {

  pub fn new() -> SharedBuffer {
    SharedBuffer::default()
  }

  pub fn contents(&self) -> Vec<u8> {
    match self.bytes.lock() {
      Ok(bytes)    => bytes.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }

  pub fn to_string_lossy(&self) -> String {
    String::from_utf8_lossy(&self.contents()).into_owned()
  }

}

impl Write for SharedBuffer {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    match self.bytes.lock() {
      Ok(mut bytes) => {
        bytes.extend_from_slice(buf);
        Ok(buf.len())
      }
      Err(_) => Err(std::io::Error::new(ErrorKind::Other, "output buffer lock poisoned"))
    }
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  fn ports(input: &'static [u8]) -> (Ports, SharedBuffer) {
    let output = SharedBuffer::new();
    (Ports::new(Box::new(Cursor::new(input)), Box::new(output.clone())), output)
  }

  #[test]
  fn byte_counts() {
    assert_eq!(significant_bytes(0), 0);
    assert_eq!(significant_bytes(0xFF), 1);
    assert_eq!(significant_bytes(0x100), 2);
    assert_eq!(significant_bytes(-1), 8);
  }

  #[test]
  fn emit_and_emit_cell() {
    let (mut ports, output) = ports(b"");
    ports.write(IO_EMIT, 0x1_68).unwrap();
    ports.write(IO_EMIT_CELL, 0x6968).unwrap();
    ports.write(IO_EMIT_CELL, 0).unwrap();
    assert_eq!(output.contents(), b"hhi".to_vec());
  }

  #[test]
  fn key_reads_until_exhausted() {
    let (mut ports, _) = ports(b"ab");
    assert_eq!(ports.read(IO_KEY).unwrap(), 97);
    assert_eq!(ports.read(IO_KEY).unwrap(), 98);
    assert!(matches!(ports.read(IO_KEY), Err(VmError::Io(IoError::EndOfInput))));
  }

  #[test]
  fn unmapped_addresses() {
    let (mut ports, _) = ports(b"");
    assert!(matches!(
      ports.read(0x10),
      Err(VmError::Unsupported(UnsupportedOperationError::IoRead(0x10)))
    ));
    assert!(matches!(
      ports.write(IO_KEY, 1),
      Err(VmError::Unsupported(UnsupportedOperationError::IoWrite(IO_KEY)))
    ));
  }
}
