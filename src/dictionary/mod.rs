/*!
  The dictionary maps word names to flat instruction sequences. It is built once from a table of
  definitions written in the field mnemonic language (see `bytecode::assembly`):

  ```text
    dup   T->IN ->T d+1 alu           fields ORed together until a terminal field
    -     invert 1 imm+ imm +         references to other words are spliced in
  ```
  Each token resolves against, in order, the field table, the other definitions, and then a
  bare integer literal up to 4095. A terminal field or a single-instruction word flushes the
  accumulated fields as one instruction. A multi-instruction word is spliced in whole and leaves
  the accumulator alone.

  Definitions may reference each other in any order. They are resolved in dependency order, and
  a cycle is a `DefinitionError`.
*/

mod words;

use std::collections::HashMap;

use bimap::BiMap;
use string_cache::DefaultAtom;

use crate::bytecode::assembly::{lookup_field, FieldKind};
use crate::bytecode::{Word, LITERAL_FLAG, MAX_LITERAL};
use crate::error::DefinitionError;

pub use words::BASE_WORDS;

/// The longest instruction sequence a word may compile to.
pub const MAX_WORD_LENGTH: usize = 64;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum WordKind {
  /// Exactly one instruction.
  Primitive,
  /// Spliced from other words.
  Composite,
}

/// Net change in depth of the data and return stacks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct StackEffect {
  pub data : i8,
  pub ret  : i8,
}

/// A word definition as written in a definition table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WordSource<'a> {
  pub name : &'a str,
  pub code : &'a str,
  pub kind : WordKind,
  pub data : i8,
  pub ret  : i8,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WordDefinition {
  pub name         : DefaultAtom,
  pub instructions : Vec<Word>,
  pub kind         : WordKind,
  pub stack_effect : StackEffect,
}

#[derive(Debug)]
pub struct Dictionary {
  words   : HashMap<DefaultAtom, WordDefinition>,
  // Definition table order.
  order   : Vec<DefaultAtom>,
  // Primitive name <-> its single instruction.
  encoded : BiMap<DefaultAtom, Word>,
}

impl Dictionary {

  fn new() -> Dictionary {
    Dictionary {
      words   : HashMap::new(),
      order   : Vec::new(),
      encoded : BiMap::new()
    }
  }

  /// The dictionary of `BASE_WORDS`.
  pub fn base() -> Result<Dictionary, DefinitionError> {
    build_dictionary(BASE_WORDS)
  }

  pub fn get(&self, name: &str) -> Option<&WordDefinition> {
    self.words.get(&DefaultAtom::from(name))
  }

  /// The name of the first primitive whose instruction is exactly `word`.
  pub fn name_of(&self, word: Word) -> Option<&str> {
    self.encoded.get_by_right(&word).map(|name| &**name)
  }

  /// Definitions in the order of the table they were built from.
  pub fn iter(&self) -> impl Iterator<Item = &WordDefinition> {
    self.order.iter().filter_map(move |name| self.words.get(name))
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

}

pub fn build_dictionary(definitions: &[WordSource<'_>]) -> Result<Dictionary, DefinitionError> {
  let mut sources: HashMap<&str, &WordSource<'_>> = HashMap::new();
  for definition in definitions {
    if sources.insert(definition.name, definition).is_some() {
      return Err(DefinitionError::Duplicate(definition.name.to_string()));
    }
  }

  let mut dictionary = Dictionary::new();
  for definition in resolution_order(definitions, &sources)? {
    let instructions = assemble(definition, &dictionary.words)?;
    let name = DefaultAtom::from(definition.name);
    dictionary.words.insert(
      name.clone(),
      WordDefinition {
        name,
        instructions,
        kind         : definition.kind,
        stack_effect : StackEffect { data: definition.data, ret: definition.ret }
      }
    );
  }

  // When two primitives share an encoding the first in the table keeps it.
  for definition in definitions {
    let name = DefaultAtom::from(definition.name);
    if let Some(word) = dictionary.words.get(&name) {
      if word.kind == WordKind::Primitive {
        let _ = dictionary.encoded.insert_no_overwrite(name.clone(), word.instructions[0]);
      }
    }
    dictionary.order.push(name);
  }

  tracing::debug!(words = dictionary.len(), "built dictionary");
  Ok(dictionary)
}

/// The definitions a definition refers to. Field mnemonics shadow word names.
fn dependencies<'a>(definition: &WordSource<'a>, sources: &HashMap<&str, &WordSource<'a>>)
  -> Vec<&'a str>
{
  definition.code
    .split_whitespace()
    .filter(|token| lookup_field(token).is_none() && sources.contains_key(token))
    .collect()
}

// Depth first topological sort. Walks the table in order so the result is deterministic.
fn resolution_order<'s, 'a>(
    definitions : &'s [WordSource<'a>],
    sources     : &HashMap<&str, &'s WordSource<'a>>
  ) -> Result<Vec<&'s WordSource<'a>>, DefinitionError>
{
  #[derive(Clone, Copy, Eq, PartialEq)]
  enum Mark { Visiting, Done }

  fn visit<'s, 'a>(
      definition : &'s WordSource<'a>,
      sources    : &HashMap<&str, &'s WordSource<'a>>,
      marks      : &mut HashMap<&'a str, Mark>,
      path       : &mut Vec<&'a str>,
      order      : &mut Vec<&'s WordSource<'a>>
    ) -> Result<(), DefinitionError>
  {
    match marks.get(definition.name) {
      Some(Mark::Done) => return Ok(()),
      Some(Mark::Visiting) => {
        let start = path.iter().position(|name| *name == definition.name).unwrap_or(0);
        let mut cycle: Vec<String> = path[start..].iter().map(|name| name.to_string()).collect();
        cycle.push(definition.name.to_string());
        return Err(DefinitionError::Cycle(cycle));
      }
      None => {}
    }

    marks.insert(definition.name, Mark::Visiting);
    path.push(definition.name);
    for dependency in dependencies(definition, sources) {
      if let Some(&source) = sources.get(dependency) {
        visit(source, sources, marks, path, order)?;
      }
    }
    path.pop();
    marks.insert(definition.name, Mark::Done);
    order.push(definition);
    Ok(())
  }

  let mut marks = HashMap::new();
  let mut path  = Vec::new();
  let mut order = Vec::with_capacity(definitions.len());
  for definition in definitions {
    visit(definition, sources, &mut marks, &mut path, &mut order)?;
  }
  Ok(order)
}

/// Compiles one definition whose dependencies are all in `words`.
fn assemble(definition: &WordSource<'_>, words: &HashMap<DefaultAtom, WordDefinition>)
  -> Result<Vec<Word>, DefinitionError>
{
  let mut instructions: Vec<Word> = Vec::new();
  let mut accumulator: Word = 0;
  // Whether any field has been ORed in since the last flush. Some fields are all zero bits.
  let mut pending = false;

  for token in definition.code.split_whitespace() {
    if let Some(field) = lookup_field(token) {
      accumulator |= field.bits;
      match field.kind {
        FieldKind::Terminal => {
          instructions.push(accumulator);
          accumulator = 0;
          pending = false;
        }
        FieldKind::Input | FieldKind::Inert => pending = true,
      }
    } else if let Some(word) = words.get(&DefaultAtom::from(token)) {
      match word.instructions.len() == 1 {
        true => {
          instructions.push(accumulator | word.instructions[0]);
          accumulator = 0;
          pending = false;
        }
        false => instructions.extend_from_slice(&word.instructions),
      }
    } else if let Ok(value) = token.parse::<u64>() {
      if value > MAX_LITERAL as u64 {
        return Err(DefinitionError::LiteralTooLarge {
          word  : definition.name.to_string(),
          token : token.to_string()
        });
      }
      accumulator |= LITERAL_FLAG | value as Word;
      pending = true;
    } else {
      return Err(DefinitionError::UnknownToken {
        word  : definition.name.to_string(),
        token : token.to_string()
      });
    }
  }

  if pending {
    return Err(DefinitionError::Unterminated { word: definition.name.to_string(), accumulator });
  }
  if instructions.is_empty() {
    return Err(DefinitionError::Empty(definition.name.to_string()));
  }
  if instructions.len() > MAX_WORD_LENGTH {
    return Err(DefinitionError::TooLong {
      word   : definition.name.to_string(),
      length : instructions.len(),
      limit  : MAX_WORD_LENGTH
    });
  }
  if definition.kind == WordKind::Primitive && instructions.len() != 1 {
    return Err(DefinitionError::NotPrimitive {
      word   : definition.name.to_string(),
      length : instructions.len()
    });
  }
  Ok(instructions)
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::{decode_instruction, Instruction, EXIT, HALT};

  fn source<'a>(name: &'a str, code: &'a str, kind: WordKind) -> WordSource<'a> {
    WordSource { name, code, kind, data: 0, ret: 0 }
  }

  #[test]
  fn base_words_build() {
    let dictionary = Dictionary::base().expect("base words must build");
    assert_eq!(dictionary.len(), BASE_WORDS.len());
    for definition in BASE_WORDS {
      assert!(dictionary.get(definition.name).is_some(), "missing {}", definition.name);
    }
  }

  #[test]
  fn known_encodings() {
    let dictionary = Dictionary::base().unwrap();
    assert_eq!(dictionary.get("exit").unwrap().instructions, vec![EXIT]);
    assert_eq!(dictionary.get("halt").unwrap().instructions, vec![HALT]);
    assert_eq!(dictionary.get("1+").unwrap().instructions, vec![0xC001]);
    assert_eq!(dictionary.get("noop").unwrap().instructions, vec![0x6400]);
  }

  #[test]
  fn composites_are_spliced() {
    let dictionary = Dictionary::base().unwrap();
    let invert = dictionary.get("invert").unwrap().instructions[0];
    let plus   = dictionary.get("+").unwrap().instructions[0];
    let minus  = dictionary.get("-").unwrap();
    assert_eq!(minus.kind, WordKind::Composite);
    assert_eq!(minus.instructions, vec![invert, 0xC001, plus]);

    let swap = dictionary.get("swap").unwrap().instructions[0];
    let to_r = dictionary.get(">r").unwrap().instructions[0];
    let from_r = dictionary.get("r>").unwrap().instructions[0];
    let rot = dictionary.get("rot").unwrap().instructions.clone();
    assert_eq!(rot, vec![to_r, swap, from_r, swap]);
    assert_eq!(dictionary.get("-rot").unwrap().instructions, [&rot[..], &rot[..]].concat());
  }

  #[test]
  fn every_primitive_reparses_from_its_display() {
    let dictionary = Dictionary::base().unwrap();
    let primitives = dictionary.iter().filter(|word| {
      word.kind == WordKind::Primitive
        && !matches!(decode_instruction(word.instructions[0]), Instruction::Jump { .. })
    });
    for word in primitives {
      let text = decode_instruction(word.instructions[0]).to_string();
      let rebuilt = build_dictionary(&[source("w", &text, WordKind::Primitive)])
        .unwrap_or_else(|e| panic!("{} rendered as `{}`: {}", word.name, text, e));
      assert_eq!(rebuilt.get("w").unwrap().instructions, word.instructions, "{}", text);
    }
  }

  #[test]
  fn reverse_lookup() {
    let dictionary = Dictionary::base().unwrap();
    assert_eq!(dictionary.name_of(EXIT), Some("exit"));
    assert_eq!(dictionary.name_of(HALT), Some("halt"));
    let dup = dictionary.get("dup").unwrap().instructions[0];
    assert_eq!(dictionary.name_of(dup), Some("dup"));
    assert_eq!(dictionary.name_of(0x8123), None);
  }

  #[test]
  fn forward_references_resolve() {
    let dictionary = build_dictionary(&[
      source("twice", "inc inc",      WordKind::Composite),
      source("inc",   "1 imm+ imm",   WordKind::Primitive),
    ]).unwrap();
    assert_eq!(dictionary.get("twice").unwrap().instructions, vec![0xC001, 0xC001]);
    // Table order is kept for iteration.
    let names: Vec<&str> = dictionary.iter().map(|word| &*word.name).collect();
    assert_eq!(names, vec!["twice", "inc"]);
  }

  #[test]
  fn cycles_are_reported() {
    let result = build_dictionary(&[
      source("a", "b b", WordKind::Composite),
      source("b", "c c", WordKind::Composite),
      source("c", "a a", WordKind::Composite),
    ]);
    assert_eq!(
      result.unwrap_err(),
      DefinitionError::Cycle(vec!["a".into(), "b".into(), "c".into(), "a".into()])
    );

    let result = build_dictionary(&[source("self", "self alu", WordKind::Primitive)]);
    assert_eq!(result.unwrap_err(), DefinitionError::Cycle(vec!["self".into(), "self".into()]));
  }

  #[test]
  fn malformed_definitions() {
    assert_eq!(
      build_dictionary(&[source("x", "T->IN bogus alu", WordKind::Primitive)]).unwrap_err(),
      DefinitionError::UnknownToken { word: "x".into(), token: "bogus".into() }
    );
    assert_eq!(
      build_dictionary(&[source("x", "4096 imm", WordKind::Primitive)]).unwrap_err(),
      DefinitionError::LiteralTooLarge { word: "x".into(), token: "4096".into() }
    );
    assert_eq!(
      build_dictionary(&[source("x", "T->IN ->T", WordKind::Primitive)]).unwrap_err(),
      DefinitionError::Unterminated { word: "x".into(), accumulator: 0x0400 }
    );
    assert_eq!(
      build_dictionary(&[
        source("x", "alu", WordKind::Primitive),
        source("x", "alu", WordKind::Primitive),
      ]).unwrap_err(),
      DefinitionError::Duplicate("x".into())
    );
    assert_eq!(
      build_dictionary(&[source("x", "1 imm 2 imm", WordKind::Primitive)]).unwrap_err(),
      DefinitionError::NotPrimitive { word: "x".into(), length: 2 }
    );
    assert_eq!(
      build_dictionary(&[source("x", "", WordKind::Composite)]).unwrap_err(),
      DefinitionError::Empty("x".into())
    );
  }

  #[test]
  fn length_limit() {
    let long = vec!["1 imm"; MAX_WORD_LENGTH + 1].join(" ");
    let result = build_dictionary(&[source("long", &long, WordKind::Composite)]);
    assert_eq!(
      result.unwrap_err(),
      DefinitionError::TooLong { word: "long".into(), length: 65, limit: MAX_WORD_LENGTH }
    );
  }
}
