/*!
  A compiled program: a flat sequence of 16-bit cells, loaded into memory at `HERE`.

  Two persisted forms are supported. The binary form is the cells as little-endian 16-bit
  words. The hex form has one 32-bit word of 8 hex digits per line, covering two cells. The
  last four digits are the first of the two cells.

  ```text
    cells   0x8001 0x8002 0x8003       ->     80028001
                                              00008003
  ```
*/

use nom::{
  bytes::complete::take_while_m_n,
  combinator::all_consuming,
  IResult,
};

use crate::bytecode::{decode_instruction, Word};
use crate::dictionary::Dictionary;
use crate::error::ImageError;

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Image {
  cells: Vec<Word>,
}

impl Image {

  pub fn new() -> Image {
    Image::default()
  }

  pub fn from_cells(cells: Vec<Word>) -> Image {
    Image { cells }
  }

  pub fn cells(&self) -> &[Word] {
    &self.cells
  }

  pub fn into_cells(self) -> Vec<Word> {
    self.cells
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn last(&self) -> Option<Word> {
    self.cells.last().copied()
  }

  pub fn push(&mut self, word: Word) {
    self.cells.push(word);
  }

  pub fn extend_from_slice(&mut self, words: &[Word]) {
    self.cells.extend_from_slice(words);
  }

  // region Persisted forms

  pub fn to_le_bytes(&self) -> Vec<u8> {
    self.cells.iter().flat_map(|cell| cell.to_le_bytes().to_vec()).collect()
  }

  pub fn from_le_bytes(bytes: &[u8]) -> Result<Image, ImageError> {
    if bytes.len() % 2 != 0 {
      return Err(ImageError::OddLength(bytes.len()));
    }
    let cells = bytes
      .chunks(2)
      .map(|pair| Word::from_le_bytes([pair[0], pair[1]]))
      .collect();
    Ok(Image { cells })
  }

  /// An odd number of cells is padded with a zero cell.
  pub fn to_hex_lines(&self) -> String {
    let mut text = String::with_capacity(self.cells.len() * 5);
    for pair in self.cells.chunks(2) {
      let low  = pair[0] as u32;
      let high = pair.get(1).copied().unwrap_or(0) as u32;
      text.push_str(&format!("{:08x}\n", (high << 16) | low));
    }
    text
  }

  /// Blank lines are skipped.
  pub fn from_hex_lines(text: &str) -> Result<Image, ImageError> {
    let mut cells = Vec::new();
    for (index, line) in text.lines().enumerate() {
      let line = line.trim();
      if line.is_empty() {
        continue;
      }
      let digits = match hex_word(line) {
        Ok((_, digits)) => digits,
        Err(_) => return Err(ImageError::MalformedLine { line: index + 1 }),
      };
      let value = u32::from_str_radix(digits, 16)
        .map_err(|_| ImageError::MalformedLine { line: index + 1 })?;
      cells.push((value & 0xFFFF) as Word);
      cells.push((value >> 16) as Word);
    }
    Ok(Image { cells })
  }

  // endregion

  /// One line per cell: address, raw bits, and the word name or field mnemonics.
  pub fn listing(&self, dictionary: &Dictionary) -> String {
    let mut text = String::new();
    for (address, cell) in self.cells.iter().enumerate() {
      let meaning = match dictionary.name_of(*cell) {
        Some(name) => name.to_string(),
        None       => decode_instruction(*cell).to_string(),
      };
      text.push_str(&format!("{:04x}: {:04x}  {}\n", address, cell, meaning));
    }
    text
  }
}

fn hex_word(input: &str) -> IResult<&str, &str> {
  all_consuming(take_while_m_n(8, 8, |c: char| c.is_ascii_hexdigit()))(input)
}

impl From<Vec<Word>> for Image {
  fn from(cells: Vec<Word>) -> Self {
    Image { cells }
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn little_endian_bytes() {
    let image = Image::from_cells(vec![0x7403, 0x8001]);
    assert_eq!(image.to_le_bytes(), vec![0x03, 0x74, 0x01, 0x80]);
    assert_eq!(Image::from_le_bytes(&[0x03, 0x74, 0x01, 0x80]), Ok(image));
    assert_eq!(Image::from_le_bytes(&[1, 2, 3]), Err(ImageError::OddLength(3)));
  }

  #[test]
  fn hex_lines_put_the_first_cell_last() {
    let image = Image::from_cells(vec![0x8001, 0x8002, 0x8003]);
    assert_eq!(image.to_hex_lines(), "80028001\n00008003\n");

    let loaded = Image::from_hex_lines("80028001\n\n00008003\n").unwrap();
    assert_eq!(loaded.cells(), &[0x8001, 0x8002, 0x8003, 0x0000]);
  }

  #[test]
  fn listing_names_known_words() {
    let dictionary = Dictionary::base().unwrap();
    let image = Image::from_cells(vec![0x8005, 0x7403, 0x0000]);
    assert_eq!(
      image.listing(&dictionary),
      "0000: 8005  5 imm\n0001: 7403  exit\n0002: 0000  halt\n"
    );
  }

  #[test]
  fn malformed_hex_lines() {
    assert_eq!(
      Image::from_hex_lines("80028001\n8002800\n"),
      Err(ImageError::MalformedLine { line: 2 })
    );
    assert_eq!(
      Image::from_hex_lines("8002800g"),
      Err(ImageError::MalformedLine { line: 1 })
    );
    assert_eq!(
      Image::from_hex_lines("800280011"),
      Err(ImageError::MalformedLine { line: 1 })
    );
  }
}
