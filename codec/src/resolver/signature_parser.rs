//! Parser for type signatures with support for nested generics
//!
//! This module uses nom to parse signatures like:
//! - `int32`
//! - `Array<Array<int32>>`
//! - `Map<string, Array<float>>`
//! - `/Script/Engine.Actor*`
//!
//! Map arguments are split at the first top-level comma: the key is parsed
//! as a complete type before the comma is looked for, so a comma nested inside
//! the key's own `<...>` is never mistaken for the separator.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt};
use nom::error::{Error as NomError, ErrorKind};
use nom::sequence::{delimited, preceded, terminated};
use nom::{IResult, Parser};

use crate::constants::{KEYWORD_ARRAY, KEYWORD_MAP, KEYWORD_SET, MAX_SIGNATURE_DEPTH, POINTER_SUFFIX};
use crate::error::{TypeError, TypeResult};

/// A parsed, not yet resolved, type signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    /// `Array<T>`
    Array(Box<TypeSignature>),
    /// `Set<T>`
    Set(Box<TypeSignature>),
    /// `Map<K,V>`
    Map(Box<TypeSignature>, Box<TypeSignature>),
    /// `Name*`, an object reference by class name
    Pointer(String),
    /// A bare name: scalar keyword, struct, enum or class
    Named(String),
}

impl TypeSignature {
    /// Array, set or map
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Set(_) | Self::Map(..))
    }
}

/// Characters allowed in a type name, including engine path separators
fn is_name_char(c: char) -> bool { c.is_alphanumeric() || matches!(c, '_' | '/' | '.' | ':') }

fn name(input: &str) -> IResult<&str, &str> { take_while1(is_name_char)(input) }

/// Wrap a token parser so surrounding whitespace is ignored
fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = NomError<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = NomError<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// `Keyword<` opener of a generic container
fn opener<'a>(keyword: &'static str) -> impl Parser<&'a str, Output = char, Error = NomError<&'a str>> {
    preceded(ws(tag(keyword)), ws(char('<')))
}

fn array(input: &str, depth: usize) -> IResult<&str, TypeSignature> {
    delimited(opener(KEYWORD_ARRAY), |i| type_signature(i, depth + 1), ws(char('>')))
        .map(|element| TypeSignature::Array(Box::new(element)))
        .parse(input)
}

fn set(input: &str, depth: usize) -> IResult<&str, TypeSignature> {
    delimited(opener(KEYWORD_SET), |i| type_signature(i, depth + 1), ws(char('>')))
        .map(|element| TypeSignature::Set(Box::new(element)))
        .parse(input)
}

fn map(input: &str, depth: usize) -> IResult<&str, TypeSignature> {
    let (input, _) = opener(KEYWORD_MAP).parse(input)?;
    let (input, key) = terminated(|i| type_signature(i, depth + 1), ws(char(','))).parse(input)?;
    let (input, value) = terminated(|i| type_signature(i, depth + 1), ws(char('>'))).parse(input)?;
    Ok((input, TypeSignature::Map(Box::new(key), Box::new(value))))
}

fn named_or_pointer(input: &str) -> IResult<&str, TypeSignature> {
    (ws(name), opt(ws(char(POINTER_SUFFIX))))
        .map(|(name, pointer)| {
            if pointer.is_some() {
                TypeSignature::Pointer(name.to_string())
            } else {
                TypeSignature::Named(name.to_string())
            }
        })
        .parse(input)
}

fn type_signature(input: &str, depth: usize) -> IResult<&str, TypeSignature> {
    if depth > MAX_SIGNATURE_DEPTH {
        return Err(nom::Err::Failure(NomError::new(input, ErrorKind::TooLarge)));
    }
    alt((
        |i| array(i, depth),
        |i| set(i, depth),
        |i| map(i, depth),
        named_or_pointer,
    ))
    .parse(input)
}

/// Parse a complete signature; trailing input is an error
pub fn parse_signature(input: &str) -> TypeResult<TypeSignature> {
    if input.trim().is_empty() {
        return Err(TypeError::malformed(input, "empty signature").into());
    }

    match all_consuming(|i| type_signature(i, 0)).parse(input) {
        Ok((_, signature)) => Ok(signature),
        Err(nom::Err::Failure(e)) if e.code == ErrorKind::TooLarge => Err(TypeError::malformed(
            input,
            format!("generic nesting deeper than {MAX_SIGNATURE_DEPTH}"),
        )
        .into()),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            Err(TypeError::malformed(input, format!("unexpected input at '{}'", e.input)).into())
        },
        Err(nom::Err::Incomplete(_)) => Err(TypeError::malformed(input, "incomplete signature").into()),
    }
}

/// Split `input` on `separator` occurrences that are not nested inside `<...>`
///
/// Empty pieces are dropped and every piece is trimmed.
#[must_use]
pub fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;

    for (pos, ch) in input.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                pieces.push(&input[start..pos]);
                start = pos + c.len_utf8();
            },
            _ => {},
        }
    }
    pieces.push(&input[start..]);

    pieces.into_iter().map(str::trim).filter(|piece| !piece.is_empty()).collect()
}
