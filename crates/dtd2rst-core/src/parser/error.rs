//! Parser error types for DTD text

use crate::lexer::{LexError, Location, Span, TokenKind};
use thiserror::Error;

/// A parse error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error
    pub kind: ParseErrorKind,
    /// Byte range where the error occurred
    pub span: Span,
    /// Line and column of the span start
    pub location: Location,
}

impl ParseError {
    /// Create a new parse error
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span, location: Location) -> Self {
        Self {
            kind,
            span,
            location,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.location)
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("{0}")]
    Lex(LexError),

    #[error("unexpected token: found {found}, expected {expected}")]
    UnexpectedToken {
        found: TokenKind,
        expected: ExpectedToken,
    },

    #[error("unterminated <!{0} declaration")]
    UnterminatedDeclaration(&'static str),

    #[error("expected EMPTY, ANY or a parenthesized content model")]
    ExpectedContentModel,

    #[error("unbalanced parentheses in content model")]
    UnbalancedGroup,

    #[error("content model group mixes ',' and '|'")]
    MixedSeparators,

    #[error("mixed content listing element names must end with ')*'")]
    MixedContentNeedsStar,

    #[error("unknown attribute type '{0}'")]
    UnknownAttributeType(String),

    #[error("expected #REQUIRED, #IMPLIED, #FIXED or a default value")]
    ExpectedDefault,

    #[error("expected SYSTEM or PUBLIC identifier")]
    ExpectedExternalId,

    #[error("undeclared parameter entity %{0};")]
    UndeclaredEntity(String),

    #[error("too many parameter entity expansions while expanding %{0};")]
    EntityExpansionLimit(String),

    #[error("expected INCLUDE or IGNORE, found '{0}'")]
    UnknownSectionKeyword(String),

    #[error("unterminated conditional section")]
    UnterminatedSection,

    #[error("']]>' without an open conditional section")]
    UnexpectedSectionEnd,
}

/// What token was expected
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedToken {
    /// A specific token kind
    Token(TokenKind),
    /// One of several possible tokens
    OneOf(Vec<TokenKind>),
    /// A description of what was expected
    Description(&'static str),
}

impl std::fmt::Display for ExpectedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedToken::Token(kind) => write!(f, "{kind}"),
            ExpectedToken::OneOf(kinds) => {
                let names: Vec<String> = kinds.iter().map(|k| format!("{k}")).collect();
                write!(f, "one of: {}", names.join(", "))
            }
            ExpectedToken::Description(desc) => write!(f, "{desc}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_line_and_column() {
        let error = ParseError::new(
            ParseErrorKind::UnterminatedDeclaration("ELEMENT"),
            Span::new(20, 29),
            Location::new(2, 1),
        );
        assert_eq!(error.to_string(), "unterminated <!ELEMENT declaration at 2:1");
    }

    #[test]
    fn test_expected_one_of_lists_tokens() {
        let kind = ParseErrorKind::UnexpectedToken {
            found: TokenKind::Name,
            expected: ExpectedToken::OneOf(vec![TokenKind::Comma, TokenKind::RParen]),
        };
        assert_eq!(
            kind.to_string(),
            "unexpected token: found name, expected one of: ',', ')'"
        );
    }
}
