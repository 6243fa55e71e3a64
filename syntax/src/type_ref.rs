//! Type references as written at a use site.
//!
//! References are serialized as text (`"System.Func<int, T>"`, `"string?"`, `"int[]"`)
//! and parsed with a small recursive-descent parser.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use unionize_errors::{CompilerError, DocumentError};

/// One dotted segment of a named reference: a name and its generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSegment {
    pub name: String,
    pub arguments: Vec<TypeRef>,
}

impl TypeSegment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Named(Vec<TypeSegment>),
    Array(Box<TypeRef>),
    Nullable(Box<TypeRef>),
}

impl TypeRef {
    /// A single-segment reference without arguments, e.g. `int` or `T`.
    pub fn simple(name: impl Into<String>) -> Self {
        Self::Named(vec![TypeSegment::new(name)])
    }

    pub fn parse(text: &str) -> Result<Self, CompilerError> {
        let mut parser = Parser::new(text);
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if let Some(ch) = parser.peek() {
            return Err(parser.error(format!("unexpected trailing character '{ch}'")));
        }
        Ok(ty)
    }

    pub fn is_void(&self) -> bool {
        self.as_simple() == Some("void")
    }

    /// The name of a single-segment, argument-free reference.
    pub fn as_simple(&self) -> Option<&str> {
        match self {
            Self::Named(segments) => {
                match segments.as_slice() {
                    [only] if only.arguments.is_empty() => Some(only.name.as_str()),
                    _ => None,
                }
            },
            _ => None,
        }
    }

    /// Key of the original, unconstructed definition: segment names joined by `.`,
    /// each generic segment suffixed with its arity (`Demo.Outer`1.Shape`).
    ///
    /// Arrays and nullable wrappers have no declaring definition.
    pub fn definition_key(&self) -> Option<String> {
        match self {
            Self::Named(segments) => {
                Some(
                    segments
                        .iter()
                        .map(|seg| definition_segment(&seg.name, seg.arguments.len()))
                        .collect::<Vec<_>>()
                        .join("."),
                )
            },
            Self::Array(..) | Self::Nullable(..) => None,
        }
    }
}

pub(crate) fn definition_segment(
    name: &str,
    arity: usize,
) -> String {
    if arity == 0 {
        name.to_string()
    } else {
        format!("{name}`{arity}")
    }
}

impl fmt::Display for TypeSegment {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("<")?;
            for (idx, arg) in self.arguments.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Named(segments) => {
                for (idx, seg) in segments.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{seg}")?;
                }
                Ok(())
            },
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::Nullable(inner) => write!(f, "{inner}?"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = CompilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = CompilerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn error(
        &self,
        reason: impl Into<String>,
    ) -> CompilerError {
        DocumentError::invalid_type_ref(self.text, reason)
            .unlocated()
            .build()
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self
            .peek()
            .is_some_and(char::is_whitespace)
        {
            self.bump();
        }
    }

    fn eat(
        &mut self,
        expected: char,
    ) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(
        &mut self,
        expected: char,
    ) -> Result<(), CompilerError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(match self.peek() {
                Some(found) => self.error(format!("expected '{expected}', found '{found}'")),
                None => self.error(format!("expected '{expected}', found end of input")),
            })
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef, CompilerError> {
        let mut segments = vec![self.parse_segment()?];
        while self.eat('.') {
            segments.push(self.parse_segment()?);
        }

        let mut ty = TypeRef::Named(segments);
        loop {
            if self.eat('?') {
                ty = TypeRef::Nullable(Box::new(ty));
            } else if self.eat('[') {
                self.expect(']')?;
                ty = TypeRef::Array(Box::new(ty));
            } else {
                break;
            }
        }
        Ok(ty)
    }

    fn parse_segment(&mut self) -> Result<TypeSegment, CompilerError> {
        let name = self.parse_ident()?;
        let mut arguments = vec![];
        if self.eat('<') {
            arguments.push(self.parse_type()?);
            while self.eat(',') {
                arguments.push(self.parse_type()?);
            }
            self.expect('>')?;
        }
        Ok(TypeSegment { name, arguments })
    }

    fn parse_ident(&mut self) -> Result<String, CompilerError> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(ch) if ch == '_' || ch == '@' || ch.is_alphabetic() => {
                self.bump();
            },
            Some(ch) => return Err(self.error(format!("unexpected character '{ch}'"))),
            None => return Err(self.error("expected a type name, found end of input")),
        }
        while self
            .peek()
            .is_some_and(|ch| ch == '_' || ch.is_alphanumeric())
        {
            self.bump();
        }
        Ok(self.text[start..self.pos].to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_case::test_case("int"; "predefined")]
    #[test_case::test_case("Demo.Shape"; "qualified")]
    #[test_case::test_case("System.Func<int, T>"; "generic")]
    #[test_case::test_case("Demo.Outer<T>.Shape<System.Collections.Generic.List<int>>"; "nested generic")]
    #[test_case::test_case("string?"; "nullable")]
    #[test_case::test_case("int[][]"; "jagged array")]
    #[test_case::test_case("Demo.Option<int?>[]"; "mixed suffixes")]
    fn display_round_trips(text: &str) {
        let ty = TypeRef::parse(text).unwrap();
        assert_eq!(ty.to_string(), text);
    }

    #[test]
    fn whitespace_is_normalized() {
        let ty = TypeRef::parse(" System.Func< int ,T > ").unwrap();
        assert_eq!(ty.to_string(), "System.Func<int, T>");
    }

    #[test]
    fn definition_keys_carry_arity() {
        let ty = TypeRef::parse("Demo.Outer<int>.Shape<string, bool>").unwrap();
        assert_eq!(
            ty.definition_key().as_deref(),
            Some("Demo.Outer`1.Shape`2")
        );
        assert_eq!(
            TypeRef::parse("Demo.Shape?")
                .unwrap()
                .definition_key(),
            None
        );
    }

    #[test]
    fn simple_and_void() {
        assert!(TypeRef::simple("void").is_void());
        assert_eq!(TypeRef::simple("T").as_simple(), Some("T"));
        assert_eq!(
            TypeRef::parse("List<T>")
                .unwrap()
                .as_simple(),
            None
        );
    }

    #[test_case::test_case(""; "empty")]
    #[test_case::test_case("List<int"; "unclosed generic")]
    #[test_case::test_case("(int, string)"; "tuple syntax")]
    #[test_case::test_case("int]"; "stray bracket")]
    #[test_case::test_case("Demo..Shape"; "empty segment")]
    fn rejects_malformed(text: &str) {
        let err = TypeRef::parse(text).unwrap_err();
        assert_eq!(err.error_code().to_string(), "DF2");
    }

    #[test]
    fn deserializes_from_string() {
        #[derive(serde::Deserialize)]
        struct Holder {
            ty: TypeRef,
        }

        let holder: Holder = toml::from_str(r#"ty = "System.Func<double, TResult>""#).unwrap();
        assert_eq!(holder.ty.to_string(), "System.Func<double, TResult>");

        let err = toml::from_str::<Holder>(r#"ty = "List<""#);
        assert!(err.is_err());
    }
}
