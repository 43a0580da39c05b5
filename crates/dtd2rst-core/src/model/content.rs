//! Element content models

/// The content specification of an `<!ELEMENT>` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentModel {
    /// `EMPTY`
    Empty,
    /// `ANY`
    Any,
    /// `(#PCDATA)` or `(#PCDATA|a|b)*`, holding the element names
    Mixed(Vec<String>),
    /// A sequence or choice of child elements
    Children(Particle),
}

impl ContentModel {
    /// Child element names in declaration order, duplicates included
    #[must_use]
    pub fn child_names(&self) -> Vec<&str> {
        match self {
            Self::Empty | Self::Any => Vec::new(),
            Self::Mixed(names) => names.iter().map(String::as_str).collect(),
            Self::Children(particle) => {
                let mut names = Vec::new();
                particle.collect_names(&mut names);
                names
            }
        }
    }
}

impl std::fmt::Display for ContentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "EMPTY"),
            Self::Any => write!(f, "ANY"),
            Self::Mixed(names) if names.is_empty() => write!(f, "(#PCDATA)"),
            Self::Mixed(names) => write!(f, "(#PCDATA|{})*", names.join("|")),
            Self::Children(particle) => write!(f, "{particle}"),
        }
    }
}

/// One content particle: a name or a group, with an occurrence marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Particle {
    pub term: Term,
    pub occurrence: Occurrence,
}

impl Particle {
    #[must_use]
    pub fn new(term: Term, occurrence: Occurrence) -> Self {
        Self { term, occurrence }
    }

    /// Pre-order walk over the element names in this particle
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match &self.term {
            Term::Name(name) => names.push(name),
            Term::Sequence(items) | Term::Choice(items) => {
                for item in items {
                    item.collect_names(names);
                }
            }
        }
    }
}

impl std::fmt::Display for Particle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.term {
            Term::Name(name) => write!(f, "{name}")?,
            Term::Sequence(items) | Term::Choice(items) => {
                let separator = if matches!(self.term, Term::Choice(_)) { "|" } else { "," };
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(separator))?;
            }
        }
        write!(f, "{}", self.occurrence)
    }
}

/// The body of a particle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Name(String),
    /// `(a, b, c)`
    Sequence(Vec<Particle>),
    /// `(a | b | c)`
    Choice(Vec<Particle>),
}

/// How often a particle may occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occurrence {
    #[default]
    Once,
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

impl std::fmt::Display for Occurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Once => Ok(()),
            Self::Optional => write!(f, "?"),
            Self::ZeroOrMore => write!(f, "*"),
            Self::OneOrMore => write!(f, "+"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> Particle {
        Particle::new(Term::Name(n.to_string()), Occurrence::Once)
    }

    #[test]
    fn test_child_names_walk_nested_groups_in_order() {
        let model = ContentModel::Children(Particle::new(
            Term::Sequence(vec![
                name("head"),
                Particle::new(Term::Choice(vec![name("p"), name("list")]), Occurrence::ZeroOrMore),
                name("p"),
            ]),
            Occurrence::Once,
        ));
        assert_eq!(model.child_names(), vec!["head", "p", "list", "p"]);
    }

    #[test]
    fn test_empty_and_any_have_no_children() {
        assert!(ContentModel::Empty.child_names().is_empty());
        assert!(ContentModel::Any.child_names().is_empty());
        assert!(ContentModel::Mixed(Vec::new()).child_names().is_empty());
    }

    #[test]
    fn test_display_matches_dtd_syntax() {
        let model = ContentModel::Children(Particle::new(
            Term::Sequence(vec![
                name("title"),
                Particle::new(Term::Name("author".to_string()), Occurrence::OneOrMore),
            ]),
            Occurrence::Optional,
        ));
        assert_eq!(model.to_string(), "(title,author+)?");
        assert_eq!(
            ContentModel::Mixed(vec!["em".to_string(), "b".to_string()]).to_string(),
            "(#PCDATA|em|b)*"
        );
    }
}
