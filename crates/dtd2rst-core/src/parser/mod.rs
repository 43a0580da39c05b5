//! Parser for DTD markup declarations
//!
//! This module implements a recursive descent parser over the token stream
//! of a DTD external subset. It produces [`Declaration`]s and stops at the
//! first error; a DTD that fails to parse yields no model at all.
//!
//! Internal parameter entities are expanded where they are referenced, both
//! between declarations and inside them. Conditional sections are honoured:
//! `INCLUDE` contents are parsed, `IGNORE` contents are skipped unread.
//!
//! # Example
//!
//! ```
//! use dtd2rst_core::model::Declaration;
//! use dtd2rst_core::parser::Parser;
//!
//! let declarations = Parser::parse("<!ELEMENT note (#PCDATA)>").unwrap();
//! assert!(matches!(declarations[0], Declaration::Element(_)));
//!
//! let error = Parser::parse("<!ELEMENT note (#PCDATA)").unwrap_err();
//! assert_eq!(error.to_string(), "unterminated <!ELEMENT declaration at 1:1");
//! ```

mod error;

pub use error::{ExpectedToken, ParseError, ParseErrorKind};

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, warn};

use crate::lexer::{LexError, Lexer, LineIndex, Span, SpannedError, Token, TokenKind};
use crate::model::{
    AttributeDecl, AttributeType, ContentModel, Declaration, DefaultDecl, ElementDecl, EntityDecl,
    EntityValue, Occurrence, Particle, Term,
};

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Upper bound on parameter entity expansions in one document
const MAX_ENTITY_EXPANSIONS: usize = 10_000;

/// Upper bound on tokens added by parameter entity expansion in one document
const MAX_EXPANDED_TOKENS: usize = 100_000;

/// The DTD parser
pub struct Parser {
    /// All tokens from the source, with entity expansions spliced in
    tokens: Vec<Token>,
    /// Current position in the token stream
    position: usize,
    /// Lexer errors, looked up when the parser reaches an error token
    lex_errors: Vec<SpannedError>,
    line_index: LineIndex,
    /// Declared parameter entities; the first definition of a name wins
    parameter_entities: HashMap<String, EntityValue>,
    expansions: usize,
    expanded_tokens: usize,
    /// Start spans of the `INCLUDE` sections currently open
    open_sections: Vec<Span>,
    /// Keyword and start of the declaration being parsed
    declaration: Option<(&'static str, Span)>,
}

impl Parser {
    /// Create a new parser for DTD text
    #[must_use]
    pub fn new(source: &str) -> Self {
        let (tokens, lex_errors) = Lexer::tokenize(source);
        Self {
            tokens,
            position: 0,
            lex_errors,
            line_index: LineIndex::new(source),
            parameter_entities: HashMap::new(),
            expansions: 0,
            expanded_tokens: 0,
            open_sections: Vec::new(),
            declaration: None,
        }
    }

    /// Parse a whole DTD into its declarations
    pub fn parse(source: &str) -> ParseResult<Vec<Declaration>> {
        Parser::new(source).declarations()
    }

    fn declarations(&mut self) -> ParseResult<Vec<Declaration>> {
        let mut declarations = Vec::new();
        self.settle()?;

        loop {
            let token = self.current().clone();
            match token.kind {
                TokenKind::Eof => {
                    if let Some(&start) = self.open_sections.last() {
                        return Err(self.error(ParseErrorKind::UnterminatedSection, start));
                    }
                    return Ok(declarations);
                }
                TokenKind::ElementDecl => {
                    declarations.push(Declaration::Element(self.element_decl()?));
                }
                TokenKind::AttlistDecl => {
                    declarations.push(Declaration::Attributes(self.attlist_decl()?));
                }
                TokenKind::EntityDecl => {
                    declarations.push(Declaration::Entity(self.entity_decl()?));
                }
                TokenKind::NotationDecl => {
                    declarations.push(Declaration::Notation(self.notation_decl()?));
                }
                TokenKind::SectionStart => self.conditional_section()?,
                TokenKind::SectionEnd => {
                    if self.open_sections.pop().is_none() {
                        return Err(self.error(ParseErrorKind::UnexpectedSectionEnd, token.span));
                    }
                    self.advance()?;
                }
                _ => return Err(self.unexpected(ExpectedToken::Description("markup declaration"))),
            }
        }
    }

    // ==================== Token Management ====================

    /// Get the current token
    fn current(&self) -> &Token {
        // The stream always ends with EOF and the parser never moves past it
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Check for a name token with the given text
    fn check_keyword(&self, keyword: &str) -> bool {
        self.check(TokenKind::Name) && self.current().lexeme == keyword
    }

    /// Advance to the next token, skipping trivia and expanding entity references
    fn advance(&mut self) -> ParseResult<Token> {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        self.settle()?;
        Ok(token)
    }

    /// Move past trivia and replace parameter entity references with their text
    fn settle(&mut self) -> ParseResult<()> {
        loop {
            match self.current_kind() {
                kind if kind.is_trivia() => self.position += 1,
                TokenKind::PeReference => self.expand_reference()?,
                _ => return Ok(()),
            }
        }
    }

    /// Consume a token if it matches
    fn eat(&mut self, kind: TokenKind) -> ParseResult<Option<Token>> {
        if self.check(kind) {
            self.advance().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Expect and consume a specific token, or error
    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(ExpectedToken::Token(kind)))
        }
    }

    // ==================== Errors ====================

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, span, self.line_index.location(span.start))
    }

    /// Build an error for the current token
    ///
    /// Lexer failures take precedence, and running into EOF or the next
    /// declaration reports the current declaration as unterminated.
    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        let token = self.current();
        if token.kind == TokenKind::Error {
            return self.lex_error(token);
        }
        if let Some((keyword, start)) = self.declaration {
            if token.kind == TokenKind::Eof || token.kind.is_declaration_start() {
                return self.error(ParseErrorKind::UnterminatedDeclaration(keyword), start);
            }
        }
        self.error(kind, token.span)
    }

    fn unexpected(&self, expected: ExpectedToken) -> ParseError {
        self.error_here(ParseErrorKind::UnexpectedToken {
            found: self.current_kind(),
            expected,
        })
    }

    fn lex_error(&self, token: &Token) -> ParseError {
        let error = self
            .lex_errors
            .iter()
            .find(|e| e.span == token.span)
            .map_or(LexError::UnexpectedChar, |e| e.error);
        self.error(ParseErrorKind::Lex(error), token.span)
    }

    // ==================== Parameter Entities ====================

    /// Replace the reference at the current position with its replacement text
    fn expand_reference(&mut self) -> ParseResult<()> {
        let reference = self.current().clone();
        let name = reference.lexeme[1..reference.lexeme.len() - 1].to_string();

        let Some(value) = self.parameter_entities.get(&name).cloned() else {
            return Err(self.error(ParseErrorKind::UndeclaredEntity(name), reference.span));
        };

        match value {
            EntityValue::External {
                system_id,
                public_id,
            } => {
                match public_id {
                    Some(public_id) => warn!(
                        "skipping external parameter entity %{}; (PUBLIC \"{}\" \"{}\")",
                        name, public_id, system_id
                    ),
                    None => warn!(
                        "skipping external parameter entity %{}; (SYSTEM \"{}\")",
                        name, system_id
                    ),
                }
                self.tokens.remove(self.position);
            }
            EntityValue::Internal(text) => {
                self.expansions += 1;
                if self.expansions > MAX_ENTITY_EXPANSIONS {
                    let kind = ParseErrorKind::EntityExpansionLimit(name);
                    return Err(self.error(kind, reference.span));
                }

                // Expanded tokens report errors at the reference
                let (mut tokens, errors) = Lexer::tokenize(&text);
                tokens.pop();
                self.expanded_tokens += tokens.len();
                if self.expanded_tokens > MAX_EXPANDED_TOKENS {
                    let kind = ParseErrorKind::EntityExpansionLimit(name);
                    return Err(self.error(kind, reference.span));
                }
                for token in &mut tokens {
                    token.span = reference.span;
                }
                self.lex_errors
                    .extend(errors.into_iter().map(|e| SpannedError::new(e.error, reference.span)));
                self.tokens.splice(self.position..=self.position, tokens);
            }
        }
        Ok(())
    }

    fn define_parameter_entity(&mut self, name: &str, value: &EntityValue) {
        match self.parameter_entities.entry(name.to_string()) {
            Entry::Occupied(_) => {
                debug!("parameter entity %{}; redeclared; keeping the first definition", name);
            }
            Entry::Vacant(slot) => {
                slot.insert(value.clone());
            }
        }
    }

    // ==================== Declarations ====================

    /// Consume a declaration opener and remember where it started
    fn begin_declaration(&mut self, keyword: &'static str) -> ParseResult<()> {
        let start = self.current().span;
        self.declaration = Some((keyword, start));
        self.advance()?;
        Ok(())
    }

    /// Consume the closing `>` of the current declaration
    fn end_declaration(&mut self) -> ParseResult<()> {
        if !self.check(TokenKind::Close) {
            return Err(self.unexpected(ExpectedToken::Token(TokenKind::Close)));
        }
        self.declaration = None;
        self.advance()?;
        Ok(())
    }

    /// `<!ELEMENT name contentspec>`
    fn element_decl(&mut self) -> ParseResult<ElementDecl> {
        self.begin_declaration("ELEMENT")?;
        let name = self.expect(TokenKind::Name)?.lexeme;
        let content = self.content_model()?;
        self.end_declaration()?;
        Ok(ElementDecl::new(name, content))
    }

    fn content_model(&mut self) -> ParseResult<ContentModel> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Name if token.lexeme == "EMPTY" => {
                self.advance()?;
                Ok(ContentModel::Empty)
            }
            TokenKind::Name if token.lexeme == "ANY" => {
                self.advance()?;
                Ok(ContentModel::Any)
            }
            TokenKind::LParen => {
                self.advance()?;
                if self.check(TokenKind::PcData) {
                    self.mixed_content(token.span)
                } else {
                    Ok(ContentModel::Children(self.group(token.span)?))
                }
            }
            _ => Err(self.error_here(ParseErrorKind::ExpectedContentModel)),
        }
    }

    /// `(#PCDATA)` or `(#PCDATA | a | b)*`, starting at `#PCDATA`
    fn mixed_content(&mut self, open: Span) -> ParseResult<ContentModel> {
        self.advance()?;
        let mut names = Vec::new();
        while self.eat(TokenKind::Pipe)?.is_some() {
            names.push(self.expect(TokenKind::Name)?.lexeme);
        }

        let close = self.current().span;
        match self.current_kind() {
            TokenKind::RParen => {
                self.advance()?;
            }
            TokenKind::Close => return Err(self.error(ParseErrorKind::UnbalancedGroup, open)),
            _ => {
                return Err(self.unexpected(ExpectedToken::OneOf(vec![
                    TokenKind::Pipe,
                    TokenKind::RParen,
                ])))
            }
        }

        let starred = self.eat(TokenKind::Star)?.is_some();
        if !names.is_empty() && !starred {
            return Err(self.error(ParseErrorKind::MixedContentNeedsStar, close));
        }
        Ok(ContentModel::Mixed(names))
    }

    /// A sequence or choice group, after its opening parenthesis
    fn group(&mut self, open: Span) -> ParseResult<Particle> {
        let mut items = vec![self.particle()?];
        let mut separator = None;

        loop {
            match self.current_kind() {
                TokenKind::RParen => {
                    self.advance()?;
                    break;
                }
                kind @ (TokenKind::Comma | TokenKind::Pipe) => {
                    if separator.is_some_and(|s| s != kind) {
                        return Err(self.error_here(ParseErrorKind::MixedSeparators));
                    }
                    separator = Some(kind);
                    self.advance()?;
                    items.push(self.particle()?);
                }
                TokenKind::Close => return Err(self.error(ParseErrorKind::UnbalancedGroup, open)),
                _ => {
                    return Err(self.unexpected(ExpectedToken::OneOf(vec![
                        TokenKind::Comma,
                        TokenKind::Pipe,
                        TokenKind::RParen,
                    ])))
                }
            }
        }

        let occurrence = self.occurrence()?;
        let term = if separator == Some(TokenKind::Pipe) {
            Term::Choice(items)
        } else {
            Term::Sequence(items)
        };
        Ok(Particle::new(term, occurrence))
    }

    fn particle(&mut self) -> ParseResult<Particle> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::LParen => {
                self.advance()?;
                self.group(token.span)
            }
            TokenKind::Name => {
                self.advance()?;
                let occurrence = self.occurrence()?;
                Ok(Particle::new(Term::Name(token.lexeme), occurrence))
            }
            _ => Err(self.unexpected(ExpectedToken::Description("element name or '('"))),
        }
    }

    fn occurrence(&mut self) -> ParseResult<Occurrence> {
        let occurrence = match self.current_kind() {
            TokenKind::Question => Occurrence::Optional,
            TokenKind::Star => Occurrence::ZeroOrMore,
            TokenKind::Plus => Occurrence::OneOrMore,
            _ => return Ok(Occurrence::Once),
        };
        self.advance()?;
        Ok(occurrence)
    }

    /// `<!ATTLIST element (name type default)*>`
    fn attlist_decl(&mut self) -> ParseResult<Vec<AttributeDecl>> {
        self.begin_declaration("ATTLIST")?;
        let element = self.expect(TokenKind::Name)?.lexeme;

        let mut attributes = Vec::new();
        while self.check(TokenKind::Name) {
            let name = self.advance()?.lexeme;
            let kind = self.attribute_type()?;
            let default = self.default_decl()?;
            attributes.push(AttributeDecl {
                element: element.clone(),
                name,
                kind,
                default,
            });
        }

        self.end_declaration()?;
        Ok(attributes)
    }

    fn attribute_type(&mut self) -> ParseResult<AttributeType> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::LParen => {
                self.advance()?;
                Ok(AttributeType::Enumeration(self.value_list(token.span)?))
            }
            TokenKind::Name if token.lexeme == "NOTATION" => {
                self.advance()?;
                let open = self.expect(TokenKind::LParen)?;
                Ok(AttributeType::Notation(self.value_list(open.span)?))
            }
            TokenKind::Name => match AttributeType::from_keyword(&token.lexeme) {
                Some(kind) => {
                    self.advance()?;
                    Ok(kind)
                }
                None => {
                    let kind = ParseErrorKind::UnknownAttributeType(token.lexeme);
                    Err(self.error(kind, token.span))
                }
            },
            _ => Err(self.unexpected(ExpectedToken::Description("attribute type"))),
        }
    }

    /// `a | b | c )`, after the opening parenthesis
    fn value_list(&mut self, open: Span) -> ParseResult<Vec<String>> {
        let mut values = vec![self.expect(TokenKind::Name)?.lexeme];
        loop {
            match self.current_kind() {
                TokenKind::Pipe => {
                    self.advance()?;
                    values.push(self.expect(TokenKind::Name)?.lexeme);
                }
                TokenKind::RParen => {
                    self.advance()?;
                    return Ok(values);
                }
                TokenKind::Close => return Err(self.error(ParseErrorKind::UnbalancedGroup, open)),
                _ => {
                    return Err(self.unexpected(ExpectedToken::OneOf(vec![
                        TokenKind::Pipe,
                        TokenKind::RParen,
                    ])))
                }
            }
        }
    }

    fn default_decl(&mut self) -> ParseResult<DefaultDecl> {
        match self.current_kind() {
            TokenKind::Required => {
                self.advance()?;
                Ok(DefaultDecl::Required)
            }
            TokenKind::Implied => {
                self.advance()?;
                Ok(DefaultDecl::Implied)
            }
            TokenKind::Fixed => {
                self.advance()?;
                let value = self.expect(TokenKind::Literal)?;
                Ok(DefaultDecl::Fixed(value.literal_value().to_string()))
            }
            TokenKind::Literal => {
                let value = self.advance()?;
                Ok(DefaultDecl::Value(value.literal_value().to_string()))
            }
            _ => Err(self.error_here(ParseErrorKind::ExpectedDefault)),
        }
    }

    /// `<!ENTITY [%] name (literal | external-id [NDATA name])>`
    fn entity_decl(&mut self) -> ParseResult<EntityDecl> {
        self.begin_declaration("ENTITY")?;
        let parameter = self.eat(TokenKind::Percent)?.is_some();
        let name = self.expect(TokenKind::Name)?.lexeme;

        let value = if self.check(TokenKind::Literal) {
            EntityValue::Internal(self.advance()?.literal_value().to_string())
        } else {
            let value = self.external_id(false)?;
            if !parameter && self.check_keyword("NDATA") {
                self.advance()?;
                self.expect(TokenKind::Name)?;
            }
            value
        };

        // Defined before the closing '>' is consumed: a reference may follow right after
        if !self.check(TokenKind::Close) {
            return Err(self.unexpected(ExpectedToken::Token(TokenKind::Close)));
        }
        if parameter {
            self.define_parameter_entity(&name, &value);
        }
        self.end_declaration()?;

        Ok(EntityDecl {
            name,
            parameter,
            value,
        })
    }

    /// `<!NOTATION name (external-id | PUBLIC literal)>`
    fn notation_decl(&mut self) -> ParseResult<String> {
        self.begin_declaration("NOTATION")?;
        let name = self.expect(TokenKind::Name)?.lexeme;
        self.external_id(true)?;
        self.end_declaration()?;
        Ok(name)
    }

    /// `SYSTEM "uri"` or `PUBLIC "id" "uri"`; notations may omit the URI
    fn external_id(&mut self, public_only: bool) -> ParseResult<EntityValue> {
        if self.check_keyword("SYSTEM") {
            self.advance()?;
            let system_id = self.expect(TokenKind::Literal)?.literal_value().to_string();
            Ok(EntityValue::External {
                system_id,
                public_id: None,
            })
        } else if self.check_keyword("PUBLIC") {
            self.advance()?;
            let public_id = self.expect(TokenKind::Literal)?.literal_value().to_string();
            let system_id = if public_only && !self.check(TokenKind::Literal) {
                String::new()
            } else {
                self.expect(TokenKind::Literal)?.literal_value().to_string()
            };
            Ok(EntityValue::External {
                system_id,
                public_id: Some(public_id),
            })
        } else {
            Err(self.error_here(ParseErrorKind::ExpectedExternalId))
        }
    }

    /// `<![INCLUDE[ ... ]]>` or `<![IGNORE[ ... ]]>`
    fn conditional_section(&mut self) -> ParseResult<()> {
        let start = self.advance()?.span;
        let keyword = self.current().clone();
        if keyword.kind != TokenKind::Name {
            return Err(self.unexpected(ExpectedToken::Description("INCLUDE or IGNORE")));
        }

        match keyword.lexeme.as_str() {
            "INCLUDE" => {
                self.advance()?;
                self.expect(TokenKind::LBracket)?;
                self.open_sections.push(start);
                Ok(())
            }
            "IGNORE" => {
                self.advance()?;
                if !self.check(TokenKind::LBracket) {
                    return Err(self.unexpected(ExpectedToken::Token(TokenKind::LBracket)));
                }
                // Step over '[' without interpreting what follows
                self.position += 1;
                self.skip_ignored(start)
            }
            other => Err(self.error(
                ParseErrorKind::UnknownSectionKeyword(other.to_string()),
                keyword.span,
            )),
        }
    }

    /// Skip raw tokens up to the matching `]]>`, counting nested sections
    fn skip_ignored(&mut self, start: Span) -> ParseResult<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.current_kind() {
                TokenKind::SectionStart => depth += 1,
                TokenKind::SectionEnd => depth -= 1,
                TokenKind::Eof => {
                    return Err(self.error(ParseErrorKind::UnterminatedSection, start))
                }
                _ => {}
            }
            self.position += 1;
        }
        self.settle()
    }
}
