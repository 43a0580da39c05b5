//! Token types for the DTD lexer

use logos::Logos;

/// The kind of token produced by the lexer
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TokenKind {
    // ========== Markup declarations ==========
    #[token("<!ELEMENT")]
    ElementDecl,
    #[token("<!ATTLIST")]
    AttlistDecl,
    #[token("<!ENTITY")]
    EntityDecl,
    #[token("<!NOTATION")]
    NotationDecl,
    /// Start of a conditional section: <![
    #[token("<![")]
    SectionStart,
    /// End of a conditional section: ]]>
    #[token("]]>")]
    SectionEnd,
    /// End of a markup declaration
    #[token(">")]
    Close,

    // ========== Trivia ==========
    #[regex(r"<!--([^-]|-[^-])*-->")]
    Comment,
    /// Processing instruction, including the `<?xml ...?>` text declaration
    #[regex(r"<\?([^?]|\?+[^?>])*\?+>")]
    ProcessingInstruction,

    // ========== Content model punctuation ==========
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("|")]
    Pipe,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("[")]
    LBracket,
    /// Parameter entity marker in `<!ENTITY % name ...>`
    #[token("%")]
    Percent,

    // ========== Reserved names ==========
    #[token("#PCDATA")]
    PcData,
    #[token("#REQUIRED")]
    Required,
    #[token("#IMPLIED")]
    Implied,
    #[token("#FIXED")]
    Fixed,

    // ========== Values ==========
    /// Parameter entity reference: %name;
    #[regex(r"%[\p{XID_Start}_:][\p{XID_Continue}:.\-]*;")]
    PeReference,

    /// Quoted literal, either quote style
    #[regex(r#""[^"]*""#)]
    #[regex(r"'[^']*'")]
    Literal,

    /// Name or name token. Keywords such as `EMPTY` and `CDATA` are names too
    #[regex(r"[\p{XID_Continue}:.\-]+")]
    Name,

    // ========== Special ==========
    /// Input the lexer could not match
    Error,
    /// End of input
    Eof,
}

impl TokenKind {
    /// Tokens the parser skips between and inside declarations
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Comment | Self::ProcessingInstruction)
    }

    /// Tokens that open a new markup declaration
    #[must_use]
    pub fn is_declaration_start(self) -> bool {
        matches!(
            self,
            Self::ElementDecl
                | Self::AttlistDecl
                | Self::EntityDecl
                | Self::NotationDecl
                | Self::SectionStart
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ElementDecl => write!(f, "'<!ELEMENT'"),
            Self::AttlistDecl => write!(f, "'<!ATTLIST'"),
            Self::EntityDecl => write!(f, "'<!ENTITY'"),
            Self::NotationDecl => write!(f, "'<!NOTATION'"),
            Self::SectionStart => write!(f, "'<!['"),
            Self::SectionEnd => write!(f, "']]>'"),
            Self::Close => write!(f, "'>'"),
            Self::Comment => write!(f, "comment"),
            Self::ProcessingInstruction => write!(f, "processing instruction"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::Comma => write!(f, "','"),
            Self::Pipe => write!(f, "'|'"),
            Self::Question => write!(f, "'?'"),
            Self::Star => write!(f, "'*'"),
            Self::Plus => write!(f, "'+'"),
            Self::LBracket => write!(f, "'['"),
            Self::Percent => write!(f, "'%'"),
            Self::PcData => write!(f, "'#PCDATA'"),
            Self::Required => write!(f, "'#REQUIRED'"),
            Self::Implied => write!(f, "'#IMPLIED'"),
            Self::Fixed => write!(f, "'#FIXED'"),
            Self::PeReference => write!(f, "parameter entity reference"),
            Self::Literal => write!(f, "quoted literal"),
            Self::Name => write!(f, "name"),
            Self::Error => write!(f, "invalid input"),
            Self::Eof => write!(f, "end of file"),
        }
    }
}
