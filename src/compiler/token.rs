use nom::{
  branch::alt,
  bytes::complete::{take_till1, take_until},
  character::complete::{char as one_char, multispace0},
  combinator::map,
  multi::many0,
  sequence::{delimited, preceded},
  IResult,
};

use crate::error::CompileError;

/// A whitespace delimited token of source text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Token<'a> {
  Word(&'a str),
  /// The characters between a pair of single quotes, which may include whitespace.
  Str(&'a str),
}

fn quoted(input: &str) -> IResult<&str, Token<'_>> {
  map(
    delimited(one_char('\''), take_until("'"), one_char('\'')),
    Token::Str
  )(input)
}

fn bare(input: &str) -> IResult<&str, Token<'_>> {
  map(take_till1(|c: char| c.is_whitespace()), Token::Word)(input)
}

pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, CompileError> {
  let result: IResult<&str, Vec<Token<'_>>> = many0(preceded(multispace0, alt((quoted, bare))))(source);
  let (rest, tokens) = match result {
    Ok(parsed) => parsed,
    // `bare` accepts any non-empty run of non-whitespace, so only trailing whitespace is left.
    Err(_) => return Err(CompileError::UnknownWord(source.trim().to_string())),
  };

  if !rest.trim().is_empty() {
    return Err(CompileError::UnknownWord(rest.trim().to_string()));
  }
  // A quote that `quoted` could not close.
  if tokens.iter().any(|token| matches!(token, Token::Word(word) if word.starts_with('\''))) {
    return Err(CompileError::UnterminatedString);
  }
  Ok(tokens)
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn words_split_on_whitespace() {
    assert_eq!(
      tokenize("  1 2\tswap\n  + ").unwrap(),
      vec![Token::Word("1"), Token::Word("2"), Token::Word("swap"), Token::Word("+")]
    );
    assert_eq!(tokenize("").unwrap(), vec![]);
    assert_eq!(tokenize(" \n ").unwrap(), vec![]);
  }

  #[test]
  fn strings_keep_their_spaces() {
    assert_eq!(
      tokenize("'hello world' emit 'a'").unwrap(),
      vec![Token::Str("hello world"), Token::Word("emit"), Token::Str("a")]
    );
    assert_eq!(tokenize("''").unwrap(), vec![Token::Str("")]);
  }

  #[test]
  fn unterminated_string() {
    assert_eq!(tokenize("1 'abc def"), Err(CompileError::UnterminatedString));
    assert_eq!(tokenize("'"), Err(CompileError::UnterminatedString));
  }
}
