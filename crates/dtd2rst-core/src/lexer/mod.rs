//! Lexer for DTD text
//!
//! The lexer turns a DTD (an external subset) into a flat token stream:
//! - Markup declaration openers (`<!ELEMENT`, `<!ATTLIST`, ...)
//! - Content model punctuation and reserved `#` names
//! - Names, quoted literals and parameter entity references
//! - Comments and processing instructions, kept as trivia

mod span;
mod token;

pub use span::{LineIndex, Location, Span};
pub use token::TokenKind;

use logos::Logos;
use thiserror::Error;

/// A token with its kind, span, and source text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source text
    pub span: Span,
    /// The source text of the token
    pub lexeme: String,
}

impl Token {
    /// Create a new token
    #[must_use]
    pub fn new(kind: TokenKind, span: Span, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            lexeme: lexeme.into(),
        }
    }

    /// The literal's content without its quotes
    #[must_use]
    pub fn literal_value(&self) -> &str {
        if self.kind == TokenKind::Literal && self.lexeme.len() >= 2 {
            &self.lexeme[1..self.lexeme.len() - 1]
        } else {
            &self.lexeme
        }
    }
}

/// Lexer error types
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character")]
    UnexpectedChar,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unterminated processing instruction")]
    UnterminatedProcessingInstruction,
    #[error("unterminated quoted literal")]
    UnterminatedLiteral,
}

impl LexError {
    /// Work out why lexing failed from the text at the failure point
    fn classify(rest: &str) -> Self {
        if rest.starts_with("<!--") {
            Self::UnterminatedComment
        } else if rest.starts_with("<?") {
            Self::UnterminatedProcessingInstruction
        } else if rest.starts_with('"') || rest.starts_with('\'') {
            Self::UnterminatedLiteral
        } else {
            Self::UnexpectedChar
        }
    }
}

/// A lexer error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedError {
    pub error: LexError,
    pub span: Span,
}

impl SpannedError {
    #[must_use]
    pub fn new(error: LexError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for SpannedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.span)
    }
}

impl std::error::Error for SpannedError {}

/// The DTD lexer
///
/// Invalid input does not stop lexing: it becomes a [`TokenKind::Error`]
/// token plus an entry in the error list, and the parser decides whether it
/// matters (text inside an `IGNORE` section is never interpreted).
pub struct Lexer<'source> {
    source: &'source str,
    inner: logos::Lexer<'source, TokenKind>,
    errors: Vec<SpannedError>,
    finished: bool,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given DTD text
    #[must_use]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            inner: TokenKind::lexer(source),
            errors: Vec::new(),
            finished: false,
        }
    }

    /// Tokenize the entire source, returning all tokens (ending with EOF) and any errors
    #[must_use]
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<SpannedError>) {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }
        (tokens, lexer.errors)
    }

    /// Get the next token; `None` once EOF has been returned
    pub fn next_token(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(kind)) => Some(Token::new(
                kind,
                Span::from(self.inner.span()),
                self.inner.slice(),
            )),
            Some(Err(())) => {
                let range = self.inner.span();
                let error = LexError::classify(&self.source[range.start..]);
                let span = Span::from(range);
                self.errors.push(SpannedError::new(error, span));
                Some(Token::new(TokenKind::Error, span, self.inner.slice()))
            }
            None => {
                self.finished = true;
                let end = self.source.len();
                Some(Token::new(TokenKind::Eof, Span::from(end..end), ""))
            }
        }
    }
}
