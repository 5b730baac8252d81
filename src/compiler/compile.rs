/*!
  Functions to produce an image from source text.

  The compilation pipeline is this:
  ```text
  text -> [`tokenize`] -> `Token`s -> dictionary lookup / literal encoding -> `Image`
  ```
  Words are copied from the dictionary verbatim. Numbers and strings become literal sequences.
  The image ends in a halt unless it already ends in `exit`, so even an empty source compiles to
  one halt cell.
*/

use crate::bytecode::{encode_instruction, Cell, EXIT, HALT};
use crate::dictionary::Dictionary;
use crate::error::CompileError;
use crate::image::Image;
use super::literal::encode_literal_sequence;
use super::token::{tokenize, Token};

/// Compiles `source` against `dictionary`. Nothing is returned for a source that fails.
pub fn compile(source: &str, dictionary: &Dictionary) -> Result<Image, CompileError> {
  let tokens = tokenize(source)?;
  let mut image = Image::new();

  for token in tokens.iter() {
    match token {
      Token::Word(word) => compile_word(word, dictionary, &mut image)?,
      Token::Str(text)  => compile_string(text, &mut image)?,
    }
  }

  if image.last() != Some(EXIT) {
    image.push(HALT);
  }

  tracing::debug!(tokens = tokens.len(), cells = image.len(), "compiled");
  Ok(image)
}

fn compile_word(word: &str, dictionary: &Dictionary, image: &mut Image) -> Result<(), CompileError> {
  if let Some(definition) = dictionary.get(word) {
    image.extend_from_slice(&definition.instructions);
    return Ok(());
  }

  let value = match word.parse::<i64>() {
    Ok(value) => value,
    Err(_) => match word.parse::<u64>() {
      Ok(value) => value as Cell,
      Err(_)    => return Err(CompileError::UnknownWord(word.to_string())),
    }
  };
  compile_literal(value, image)
}

fn compile_literal(value: Cell, image: &mut Image) -> Result<(), CompileError> {
  for instruction in encode_literal_sequence(value) {
    image.push(encode_instruction(&instruction)?);
  }
  Ok(())
}

/**
  A one character string is that character's code. Longer strings are packed eight bytes to a
  cell, first byte lowest, and pushed last cell first so the first cell ends up under the cell
  count on top of the stack.
*/
fn compile_string(text: &str, image: &mut Image) -> Result<(), CompileError> {
  let mut chars = text.chars();
  if let (Some(c), None) = (chars.next(), chars.next()) {
    return compile_literal(c as Cell, image);
  }

  let bytes = text.as_bytes();
  if bytes.is_empty() {
    return Ok(());
  }

  let cells: Vec<Cell> = bytes
    .chunks(8)
    .map(|chunk| {
      let mut packed = [0u8; 8];
      packed[..chunk.len()].copy_from_slice(chunk);
      Cell::from_le_bytes(packed)
    })
    .collect();
  for cell in cells.iter().rev() {
    compile_literal(*cell, image)?;
  }
  compile_literal(cells.len() as Cell, image)
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::decode_instruction;

  fn base() -> Dictionary {
    Dictionary::base().unwrap()
  }

  #[test]
  fn words_are_copied_verbatim() {
    let dictionary = base();
    let image = compile("rot", &dictionary).unwrap();
    let mut expected = dictionary.get("rot").unwrap().instructions.clone();
    expected.push(HALT);
    assert_eq!(image.cells(), &expected[..]);
  }

  #[test]
  fn halt_is_appended_unless_the_image_ends_in_exit() {
    let dictionary = base();
    assert_eq!(compile("1", &dictionary).unwrap().cells(), &[0x8001, HALT]);
    assert_eq!(compile("1 exit", &dictionary).unwrap().cells(), &[0x8001, EXIT]);
    assert_eq!(compile("", &dictionary).unwrap().cells(), &[HALT]);
    assert_eq!(compile("  ''  ", &dictionary).unwrap().cells(), &[HALT]);
  }

  #[test]
  fn unknown_words_fail_the_whole_source() {
    let dictionary = base();
    assert_eq!(
      compile("1 2 frobnicate 3", &dictionary),
      Err(CompileError::UnknownWord("frobnicate".to_string()))
    );
    assert_eq!(
      compile("18446744073709551616", &dictionary),
      Err(CompileError::UnknownWord("18446744073709551616".to_string()))
    );
    assert_eq!(compile("1 'abc", &dictionary), Err(CompileError::UnterminatedString));
  }

  #[test]
  fn unsigned_numbers_wrap() {
    let dictionary = base();
    assert_eq!(
      compile("18446744073709551615", &dictionary),
      compile("-1", &dictionary)
    );
  }

  #[test]
  fn compilation_is_deterministic() {
    let dictionary = base();
    let source = "1024 2048 4096 rot 'hello world' 2drop -77 140737488355328 16 lshift key emit";
    let first  = compile(source, &dictionary).unwrap();
    let second = compile(source, &dictionary).unwrap();
    assert_eq!(first.to_le_bytes(), second.to_le_bytes());
  }

  #[test]
  fn character_literal() {
    let dictionary = base();
    let image = compile("'a'", &dictionary).unwrap();
    assert_eq!(image.cells(), &[0x8061, HALT]);
    assert_eq!(
      decode_instruction(image.cells()[0]).to_string(),
      "97 imm"
    );
  }
}
