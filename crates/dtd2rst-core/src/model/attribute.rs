//! Attribute types and default declarations

/// The declared type of an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeType {
    CData,
    Id,
    IdRef,
    IdRefs,
    Entity,
    Entities,
    NmToken,
    NmTokens,
    /// `NOTATION (a|b)`
    Notation(Vec<String>),
    /// `(a|b|c)`
    Enumeration(Vec<String>),
}

impl AttributeType {
    /// Look up a tokenized or string type by its keyword
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "CDATA" => Some(Self::CData),
            "ID" => Some(Self::Id),
            "IDREF" => Some(Self::IdRef),
            "IDREFS" => Some(Self::IdRefs),
            "ENTITY" => Some(Self::Entity),
            "ENTITIES" => Some(Self::Entities),
            "NMTOKEN" => Some(Self::NmToken),
            "NMTOKENS" => Some(Self::NmTokens),
            _ => None,
        }
    }

    /// Allowed values for enumerated and notation types
    #[must_use]
    pub fn values(&self) -> Option<&[String]> {
        match self {
            Self::Notation(values) | Self::Enumeration(values) => Some(values),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CData => write!(f, "CDATA"),
            Self::Id => write!(f, "ID"),
            Self::IdRef => write!(f, "IDREF"),
            Self::IdRefs => write!(f, "IDREFS"),
            Self::Entity => write!(f, "ENTITY"),
            Self::Entities => write!(f, "ENTITIES"),
            Self::NmToken => write!(f, "NMTOKEN"),
            Self::NmTokens => write!(f, "NMTOKENS"),
            Self::Notation(values) => write!(f, "NOTATION ({})", values.join("|")),
            Self::Enumeration(values) => write!(f, "({})", values.join("|")),
        }
    }
}

/// The default declaration of an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultDecl {
    /// `#REQUIRED`
    Required,
    /// `#IMPLIED`
    Implied,
    /// `#FIXED "value"`
    Fixed(String),
    /// `"value"`
    Value(String),
}

impl DefaultDecl {
    /// `required`, `implied` or `fixed`; a plain default value has no keyword
    #[must_use]
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::Required => Some("required"),
            Self::Implied => Some("implied"),
            Self::Fixed(_) => Some("fixed"),
            Self::Value(_) => None,
        }
    }

    /// The fixed or default value, if one is declared
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Fixed(value) | Self::Value(value) => Some(value),
            Self::Required | Self::Implied => None,
        }
    }
}
