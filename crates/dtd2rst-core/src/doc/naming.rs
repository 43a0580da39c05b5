//! Page file names and link anchors
//!
//! Both are pure functions of a name so that unchanged DTDs regenerate
//! byte-identical pages.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use crate::model::DocumentModel;

/// Default stem of the index page; no element page ever receives it
pub const INDEX_STEM: &str = "index";

/// File stem of an element's page
///
/// Lowercase ASCII letters, digits, `-` and `.` are kept. An uppercase ASCII
/// letter becomes `_` plus its lowercase form, `_` becomes `__` and `:`
/// becomes `_-`. Every other character becomes `_`, its decimal code point
/// and a closing `_`, so `\u{212A}` (KELVIN SIGN) is `_8490_`, never `_k`.
/// Each escape is told apart by the character after its `_`, so distinct
/// names never share a stem, even on case-insensitive file systems. An
/// element whose stem would be the index stem gets a trailing `_`, which no
/// escape produces on its own.
pub fn page_stem(name: &str) -> String {
    stem_avoiding(name, INDEX_STEM)
}

fn stem_avoiding(name: &str, index_stem: &str) -> String {
    let mut stem = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        match c {
            'a'..='z' | '0'..='9' | '-' | '.' => stem.push(c),
            'A'..='Z' => {
                stem.push('_');
                stem.push(c.to_ascii_lowercase());
            }
            '_' => stem.push_str("__"),
            ':' => stem.push_str("_-"),
            c => {
                // infallible on String
                let _ = write!(stem, "_{}_", u32::from(c));
            }
        }
    }
    if stem == index_stem {
        stem.push('_');
    }
    stem
}

/// Page stems of every element of one model
#[derive(Debug)]
pub struct PageNames<'a> {
    index_stem: &'a str,
    stems: HashMap<&'a str, String>,
}

impl<'a> PageNames<'a> {
    pub fn new(model: &'a DocumentModel, index_stem: &'a str) -> Self {
        let stems = model
            .elements()
            .iter()
            .map(|e| (e.name.as_str(), stem_avoiding(&e.name, index_stem)))
            .collect();
        Self { index_stem, stems }
    }

    pub fn index_stem(&self) -> &str {
        self.index_stem
    }

    /// Stem of a declared element's page
    pub fn get(&self, name: &str) -> Option<&str> {
        self.stems.get(name).map(String::as_str)
    }

    /// Stem a link to `name` points at, whether or not it is declared
    pub fn link_target(&self, name: &str) -> Cow<'_, str> {
        match self.get(name) {
            Some(stem) => Cow::Borrowed(stem),
            None => Cow::Owned(stem_avoiding(name, self.index_stem)),
        }
    }
}

/// Heading text of an attribute's section
pub fn attribute_heading(name: &str) -> String {
    format!("The {name} attribute")
}

/// Same-page anchor docutils derives from an attribute's section heading
pub fn attribute_anchor(name: &str) -> String {
    section_id(&attribute_heading(name))
}

/// Anchors of one element's attribute sections, in declaration order
///
/// Normally these are the ids docutils derives from the section headings.
/// Two headings can normalise to the same id (`a-b`, `a_b`, `a.b`), and
/// docutils transliterates non-ASCII letters in ways this crate does not
/// reproduce. In either case every section of the page gets an explicit
/// numbered target instead, which no derived id can equal since those all
/// end in `-attribute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeAnchors {
    ids: Vec<String>,
    explicit: bool,
}

impl AttributeAnchors {
    pub fn new<'n>(names: impl IntoIterator<Item = &'n str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        let ids: Vec<String> = names.iter().map(|name| attribute_anchor(name)).collect();
        let derived = names.iter().all(|name| name.is_ascii()) && {
            let mut seen = HashSet::new();
            ids.iter().all(|id| seen.insert(id.as_str()))
        };
        if derived {
            return Self {
                ids,
                explicit: false,
            };
        }
        Self {
            ids: (1..=names.len())
                .map(|n| format!("the-attribute-{n}"))
                .collect(),
            explicit: true,
        }
    }

    /// Anchor the link to the `index`th section points at
    pub fn id(&self, index: usize) -> &str {
        &self.ids[index]
    }

    /// Target to emit above the `index`th section, if derived ids are not used
    pub fn target(&self, index: usize) -> Option<&str> {
        self.explicit.then(|| self.id(index))
    }
}

/// The id docutils assigns to a section title
///
/// Lowercase; every run of ASCII punctuation or whitespace becomes a single
/// `-`; non-ASCII characters are dropped.
fn section_id(title: &str) -> String {
    let mut id = String::with_capacity(title.len());
    let mut separator = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if separator && !id.is_empty() {
                id.push('-');
            }
            separator = false;
            id.push(c.to_ascii_lowercase());
        } else if c.is_ascii() {
            separator = true;
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_names_are_kept() {
        assert_eq!(page_stem("book"), "book");
        assert_eq!(page_stem("table-row.v2"), "table-row.v2");
    }

    #[test]
    fn test_case_and_punctuation_are_escaped() {
        assert_eq!(page_stem("Book"), "_book");
        assert_eq!(page_stem("NOVX"), "_n_o_v_x");
        assert_eq!(page_stem("my_tag"), "my__tag");
        assert_eq!(page_stem("xlink:href"), "xlink_-href");
    }

    #[test]
    fn test_non_ascii_characters_use_code_points() {
        assert_eq!(page_stem("\u{212A}"), "_8490_");
        assert_eq!(page_stem("caf\u{e9}"), "caf_233_");
        assert_eq!(page_stem("\u{c9}t\u{e9}"), "_201_t_233_");
    }

    #[test]
    fn test_distinct_names_get_distinct_stems() {
        let names = [
            "book", "Book", "BOOK", "_book", "b_ook", "b:ook", "index", "index_", "Index", "K",
            "k", "\u{212A}", "\u{e9}", "\u{c9}", "_233_", "_u",
        ];
        let stems: HashSet<String> = names.iter().map(|n| page_stem(n)).collect();
        assert_eq!(stems.len(), names.len());
    }

    #[test]
    fn test_index_stem_is_reserved() {
        assert_eq!(page_stem("index"), "index_");
        assert_ne!(page_stem("Index"), INDEX_STEM);
    }

    #[test]
    fn test_page_names_cover_declared_elements() {
        let model =
            DocumentModel::parse("<!ELEMENT Doc (index)><!ELEMENT index EMPTY>").unwrap();
        let names = PageNames::new(&model, INDEX_STEM);
        assert_eq!(names.get("Doc"), Some("_doc"));
        assert_eq!(names.get("index"), Some("index_"));
        assert_eq!(names.get("missing"), None);
        assert_eq!(names.link_target("missing"), "missing");
    }

    #[test]
    fn test_custom_index_stem_is_reserved() {
        let model =
            DocumentModel::parse("<!ELEMENT contents EMPTY><!ELEMENT index EMPTY>").unwrap();
        let names = PageNames::new(&model, "contents");
        assert_eq!(names.get("contents"), Some("contents_"));
        assert_eq!(names.get("index"), Some("index"));
    }

    #[test]
    fn test_anchors_follow_docutils_ids() {
        assert_eq!(attribute_anchor("id"), "the-id-attribute");
        assert_eq!(attribute_anchor("xml:lang"), "the-xml-lang-attribute");
        assert_eq!(attribute_anchor("Last_Modified"), "the-last-modified-attribute");
        assert_eq!(attribute_heading("id"), "The id attribute");
    }

    #[test]
    fn test_distinct_anchors_are_derived() {
        let anchors = AttributeAnchors::new(["id", "xml:lang"]);
        assert_eq!(anchors.id(0), "the-id-attribute");
        assert_eq!(anchors.id(1), "the-xml-lang-attribute");
        assert_eq!(anchors.target(0), None);
    }

    #[test]
    fn test_colliding_anchors_get_explicit_targets() {
        let anchors = AttributeAnchors::new(["id", "a-b", "a_b", "a.b"]);
        let ids: Vec<&str> = (0..4).map(|i| anchors.id(i)).collect();
        assert_eq!(
            ids,
            vec!["the-attribute-1", "the-attribute-2", "the-attribute-3", "the-attribute-4"]
        );
        assert_eq!(anchors.target(2), Some("the-attribute-3"));
    }

    #[test]
    fn test_non_ascii_names_get_explicit_targets() {
        let anchors = AttributeAnchors::new(["\u{e9}t\u{e9}"]);
        assert_eq!(anchors.target(0), Some("the-attribute-1"));
    }
}
