//! reStructuredText page templates

use std::fmt::{self, Write};

use super::naming::{attribute_heading, AttributeAnchors, PageNames};
use crate::model::{AttributeDecl, DocumentModel, ElementDecl};

/// Underline (and overline) character of page titles
pub const TITLE_UNDERLINER: char = '=';
/// Underline character of attribute sections
pub const SECTION_UNDERLINER: char = '-';

const PURPOSE_PLACEHOLDER: &str = "Purpose";
const ATTRIBUTE_PLACEHOLDER: &str = "Description";

/// Root name used in the index title when the DTD declares no element
const FALLBACK_ROOT: &str = "XML";

/// Write a heading; page titles are overlined as well
fn write_heading(out: &mut impl Write, text: &str, underliner: char) -> fmt::Result {
    let rule = underliner.to_string().repeat(text.chars().count());
    if underliner == TITLE_UNDERLINER {
        writeln!(out, "{rule}")?;
    }
    writeln!(out, "{text}")?;
    writeln!(out, "{rule}")
}

/// The page stub of one element
pub struct TagPage<'a> {
    element: &'a ElementDecl,
    attributes: Vec<&'a AttributeDecl>,
    anchors: AttributeAnchors,
    names: &'a PageNames<'a>,
    link_extension: &'a str,
}

impl<'a> TagPage<'a> {
    /// `link_extension` is the extension of built pages that content links point to
    pub fn new(
        model: &'a DocumentModel,
        names: &'a PageNames<'a>,
        element: &'a ElementDecl,
        link_extension: &'a str,
    ) -> Self {
        let attributes: Vec<&AttributeDecl> = model.attributes_of(&element.name).collect();
        let anchors = AttributeAnchors::new(attributes.iter().map(|a| a.name.as_str()));
        Self {
            element,
            attributes,
            anchors,
            names,
            link_extension,
        }
    }

    fn write_info_box(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, ".. admonition:: <{}>", self.element.name)?;
        writeln!(out)?;
        writeln!(out, "   {PURPOSE_PLACEHOLDER}")?;

        if !self.attributes.is_empty() {
            writeln!(out)?;
            writeln!(out, "   Attributes")?;
            for (index, attribute) in self.attributes.iter().enumerate() {
                writeln!(
                    out,
                    "      - `{} <#{}>`__",
                    attribute.name,
                    self.anchors.id(index)
                )?;
            }
        }

        let children = self.element.children();
        if !children.is_empty() {
            writeln!(out)?;
            writeln!(out, "   Content")?;
            for child in children {
                writeln!(
                    out,
                    "      - `{} <{}.{}>`__",
                    child,
                    self.names.link_target(child),
                    self.link_extension
                )?;
            }
        }
        Ok(())
    }

    fn write_attribute(
        out: &mut impl Write,
        attribute: &AttributeDecl,
        target: Option<&str>,
    ) -> fmt::Result {
        writeln!(out)?;
        if let Some(target) = target {
            writeln!(out, ".. _{target}:")?;
            writeln!(out)?;
        }
        write_heading(out, &attribute_heading(&attribute.name), SECTION_UNDERLINER)?;
        writeln!(out)?;
        writeln!(out, "{ATTRIBUTE_PLACEHOLDER}")?;
        writeln!(out)?;

        match attribute.kind.values() {
            Some(values) => {
                for value in values {
                    writeln!(out, "- {value}: ")?;
                }
            }
            None => writeln!(out, "Type: {}", attribute.kind)?,
        }

        if let Some(keyword) = attribute.default.keyword() {
            writeln!(out)?;
            writeln!(out, "Default: {keyword}")?;
        }
        if let Some(value) = attribute.default.value() {
            writeln!(out)?;
            writeln!(out, "Default value: {value}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TagPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, &format!("The <{}> tag", self.element.name), TITLE_UNDERLINER)?;
        writeln!(f)?;
        self.write_info_box(f)?;
        for (index, attribute) in self.attributes.iter().enumerate() {
            Self::write_attribute(f, attribute, self.anchors.target(index))?;
        }
        Ok(())
    }
}

/// The index page with a toctree over every element page
pub struct IndexPage<'a> {
    root: &'a str,
    /// Page stems in index order
    entries: Vec<String>,
}

impl<'a> IndexPage<'a> {
    pub fn new(model: &'a DocumentModel, names: &PageNames<'_>) -> Self {
        Self {
            root: model.root().map_or(FALLBACK_ROOT, |e| e.name.as_str()),
            entries: model
                .sorted_element_names()
                .into_iter()
                .map(|name| names.link_target(name).into_owned())
                .collect(),
        }
    }
}

impl fmt::Display for IndexPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, &format!("The {} file format", self.root), TITLE_UNDERLINER)?;
        writeln!(f)?;
        writeln!(f, ".. toctree::")?;
        writeln!(f, "   :maxdepth: 1")?;
        writeln!(f, "   :caption: XML tags")?;
        writeln!(f)?;
        for entry in &self.entries {
            writeln!(f, "   {entry}")?;
        }
        Ok(())
    }
}
