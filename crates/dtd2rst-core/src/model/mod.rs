//! Document model extracted from a DTD
//!
//! The parser produces a flat list of [`Declaration`]s. [`DocumentModel`]
//! folds them into the element and attribute tables the page renderer works
//! from. When a name is declared twice, the first declaration wins, the same
//! rule XML applies to attribute and entity redeclarations.

mod attribute;
mod content;

pub use attribute::{AttributeType, DefaultDecl};
pub use content::{ContentModel, Occurrence, Particle, Term};

use std::collections::{BTreeSet, HashSet};

use log::{debug, warn};

use crate::parser::{ParseResult, Parser};

/// An `<!ELEMENT>` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDecl {
    pub name: String,
    pub content: ContentModel,
}

impl ElementDecl {
    #[must_use]
    pub fn new(name: impl Into<String>, content: ContentModel) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// Child element names in declaration order, duplicates included
    #[must_use]
    pub fn children(&self) -> Vec<&str> {
        self.content.child_names()
    }
}

/// One attribute definition from an `<!ATTLIST>` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDecl {
    /// Name of the owning element
    pub element: String,
    pub name: String,
    pub kind: AttributeType,
    pub default: DefaultDecl,
}

/// Replacement text of an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityValue {
    Internal(String),
    External {
        system_id: String,
        public_id: Option<String>,
    },
}

/// An `<!ENTITY>` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDecl {
    pub name: String,
    /// `<!ENTITY % name ...>`
    pub parameter: bool,
    pub value: EntityValue,
}

/// A markup declaration as read from the DTD
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Element(ElementDecl),
    /// All definitions of one `<!ATTLIST>` block
    Attributes(Vec<AttributeDecl>),
    Entity(EntityDecl),
    Notation(String),
}

/// Elements and attributes of a whole DTD, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentModel {
    elements: Vec<ElementDecl>,
    attributes: Vec<AttributeDecl>,
}

impl DocumentModel {
    /// Parse DTD text and build its model
    pub fn parse(source: &str) -> ParseResult<Self> {
        Parser::parse(source).map(Self::from_declarations)
    }

    /// Build the model from parsed declarations
    ///
    /// Attribute lists may come before the element they belong to; lists for
    /// elements that are never declared are dropped.
    pub fn from_declarations(declarations: impl IntoIterator<Item = Declaration>) -> Self {
        let mut elements: Vec<ElementDecl> = Vec::new();
        let mut element_names = HashSet::new();
        let mut attributes: Vec<AttributeDecl> = Vec::new();
        let mut attribute_keys = HashSet::new();

        for declaration in declarations {
            match declaration {
                Declaration::Element(element) => {
                    if element_names.insert(element.name.clone()) {
                        debug!("element <{}> {}", element.name, element.content);
                        elements.push(element);
                    } else {
                        warn!(
                            "element <{}> is declared again; keeping the first declaration",
                            element.name
                        );
                    }
                }
                Declaration::Attributes(list) => {
                    for attribute in list {
                        let key = (attribute.element.clone(), attribute.name.clone());
                        if attribute_keys.insert(key) {
                            debug!(
                                "attribute {} of <{}>: {}",
                                attribute.name, attribute.element, attribute.kind
                            );
                            attributes.push(attribute);
                        } else {
                            warn!(
                                "attribute {} of <{}> is declared again; keeping the first one",
                                attribute.name, attribute.element
                            );
                        }
                    }
                }
                Declaration::Entity(_) | Declaration::Notation(_) => {}
            }
        }

        let orphans: BTreeSet<&str> = attributes
            .iter()
            .filter(|a| !element_names.contains(&a.element))
            .map(|a| a.element.as_str())
            .collect();
        for element in orphans {
            warn!("ignoring attributes of undeclared element <{}>", element);
        }
        attributes.retain(|a| element_names.contains(&a.element));

        Self {
            elements,
            attributes,
        }
    }

    /// All elements in declaration order
    pub fn elements(&self) -> &[ElementDecl] {
        &self.elements
    }

    /// Look up an element by name
    pub fn element(&self, name: &str) -> Option<&ElementDecl> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Attributes of one element in declaration order
    pub fn attributes_of<'a>(
        &'a self,
        element: &'a str,
    ) -> impl Iterator<Item = &'a AttributeDecl> {
        self.attributes.iter().filter(move |a| a.element == element)
    }

    /// The first declared element, taken as the document root
    pub fn root(&self) -> Option<&ElementDecl> {
        self.elements.first()
    }

    /// Element names sorted for a stable index order
    pub fn sorted_element_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.elements.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
