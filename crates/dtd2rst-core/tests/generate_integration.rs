//! End-to-end page generation from DTD files on disk

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use dtd2rst_core::doc::page_stem;
use dtd2rst_core::parser::ParseErrorKind;
use dtd2rst_core::{run, Config, Error};
use tempfile::{tempdir, TempDir};

const BOOK_DTD: &str = "\
<!ELEMENT book (title, author)>
<!ELEMENT title (#PCDATA)>
<!ELEMENT author (#PCDATA)>
<!ATTLIST book id CDATA #REQUIRED>
";

const NOVEL_DTD: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!-- A small novel format -->
<!ENTITY % inline "#PCDATA | em | strong">
<!ENTITY % common "id ID #IMPLIED
                   xml:lang NMTOKEN #IMPLIED">
<!ELEMENT novel (meta?, chapter+)>
<!ATTLIST novel %common;
                version CDATA #FIXED "1.0">
<!ELEMENT meta (title, author*)>
<!ELEMENT title (%inline;)*>
<!ELEMENT author (#PCDATA)>
<!ELEMENT chapter (title, (para | quote)*)>
<!ATTLIST chapter %common;
                  numbered (yes | no) "yes">
<!ELEMENT para (%inline;)*>
<!ELEMENT quote (para+)>
<!ATTLIST quote source CDATA #IMPLIED>
<!ELEMENT em (#PCDATA)>
<!ELEMENT strong (#PCDATA)>
<![IGNORE[
<!ELEMENT draft ANY>
]]>
"##;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write `source` as a DTD into a fresh directory
fn dtd_file(source: &str) -> (TempDir, Config) {
    init_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("schema.dtd");
    fs::write(&path, source).unwrap();
    (dir, Config::for_dtd(path))
}

fn read_dir_sorted(dir: &Path) -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            (name, fs::read_to_string(&path).unwrap())
        })
        .collect();
    files.sort();
    files
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// Toctree entries of an index page
fn index_entries(index: &str) -> Vec<&str> {
    index
        .split_once(":caption: XML tags\n\n")
        .unwrap()
        .1
        .lines()
        .map(str::trim)
        .collect()
}

#[test]
fn test_book_example() {
    let (_dir, config) = dtd_file(BOOK_DTD);
    let summary = run(&config).unwrap();

    assert_eq!(file_names(&summary.pages), vec!["book.rst", "title.rst", "author.rst"]);
    assert_eq!(read_dir_sorted(&config.output_dir).len(), 4);

    let book = fs::read_to_string(config.output_dir.join("book.rst")).unwrap();
    assert_eq!(book.matches("\n----------------\n").count(), 1);
    assert!(book.contains("      - `id <#the-id-attribute>`__\n"));
    assert_eq!(book.matches(".html>`__").count(), 2);
    assert!(book.contains("`title <title.html>`__"));
    assert!(book.contains("`author <author.html>`__"));

    let index = fs::read_to_string(&summary.index).unwrap();
    assert!(index.starts_with("====================\nThe book file format\n"));
    assert_eq!(index_entries(&index), vec!["author", "book", "title"]);
}

#[test]
fn test_novel_pages_follow_the_model() {
    let (_dir, config) = dtd_file(NOVEL_DTD);
    let summary = run(&config).unwrap();

    // the ignored section declares nothing
    assert_eq!(summary.pages.len(), 9);
    assert!(!config.output_dir.join("draft.rst").exists());

    let novel = fs::read_to_string(config.output_dir.join("novel.rst")).unwrap();
    let headings: Vec<&str> = novel
        .lines()
        .filter(|l| l.starts_with("The ") && l.ends_with(" attribute"))
        .collect();
    assert_eq!(
        headings,
        vec!["The id attribute", "The xml:lang attribute", "The version attribute"]
    );
    assert!(novel.contains("`xml:lang <#the-xml-lang-attribute>`__"));
    assert!(novel.contains("Type: CDATA\n\nDefault: fixed\n\nDefault value: 1.0\n"));

    let chapter = fs::read_to_string(config.output_dir.join("chapter.rst")).unwrap();
    assert!(chapter.contains("- yes: \n- no: \n\nDefault value: yes\n"));
    let links: Vec<&str> = chapter
        .lines()
        .filter(|l| l.trim_start().starts_with("- `") && l.contains(".html>"))
        .map(str::trim)
        .collect();
    assert_eq!(
        links,
        vec![
            "- `title <title.html>`__",
            "- `para <para.html>`__",
            "- `quote <quote.html>`__",
        ]
    );

    let para = fs::read_to_string(config.output_dir.join("para.rst")).unwrap();
    assert!(para.contains("`em <em.html>`__"));
    assert!(para.contains("`strong <strong.html>`__"));
}

#[test]
fn test_every_page_is_indexed_once() {
    let (_dir, config) = dtd_file(NOVEL_DTD);
    let summary = run(&config).unwrap();

    let index = fs::read_to_string(&summary.index).unwrap();
    let entries = index_entries(&index);
    let unique: BTreeSet<&str> = entries.iter().copied().collect();
    assert_eq!(unique.len(), entries.len());

    let pages: BTreeSet<String> = summary
        .pages
        .iter()
        .map(|p| p.file_stem().unwrap().to_string_lossy().into_owned())
        .collect();
    let indexed: BTreeSet<String> = unique.iter().map(|s| (*s).to_string()).collect();
    assert_eq!(pages, indexed);
}

#[test]
fn test_regeneration_is_byte_identical() {
    let (_dir, config) = dtd_file(NOVEL_DTD);
    run(&config).unwrap();
    let first = read_dir_sorted(&config.output_dir);
    run(&config).unwrap();
    let second = read_dir_sorted(&config.output_dir);
    assert_eq!(first, second);
}

#[test]
fn test_stale_pages_are_removed() {
    let (dir, config) = dtd_file(BOOK_DTD);
    run(&config).unwrap();
    assert!(config.output_dir.join("author.rst").exists());

    let source = "<!ELEMENT book (title)>\n<!ELEMENT title EMPTY>";
    fs::write(dir.path().join("schema.dtd"), source).unwrap();
    run(&config).unwrap();
    assert!(!config.output_dir.join("author.rst").exists());
    assert_eq!(read_dir_sorted(&config.output_dir).len(), 3);
}

#[test]
fn test_unterminated_declaration_writes_nothing() {
    let (_dir, config) = dtd_file("<!ELEMENT book (title, author)>\n<!ELEMENT title (#PCDATA)\n");
    let error = run(&config).unwrap_err();
    match error {
        Error::Parse(error) => {
            assert_eq!(error.kind, ParseErrorKind::UnterminatedDeclaration("ELEMENT"));
            assert_eq!(error.location.line, 2);
        }
        Error::Io { .. } => panic!("expected a parse error"),
    }
    assert!(!config.output_dir.exists());
}

#[test]
fn test_parse_error_keeps_previous_output() {
    let (dir, config) = dtd_file(BOOK_DTD);
    run(&config).unwrap();

    fs::write(dir.path().join("schema.dtd"), "<!ELEMENT book (title").unwrap();
    assert!(run(&config).is_err());
    assert_eq!(read_dir_sorted(&config.output_dir).len(), 4);
}

#[test]
fn test_missing_dtd_is_an_io_error() {
    init_logging();
    let dir = tempdir().unwrap();
    let config = Config::for_dtd(dir.path().join("missing.dtd"));
    match run(&config) {
        Err(Error::Io { path, .. }) => assert_eq!(path, config.source),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_unwritable_output_is_an_io_error() {
    let (dir, config) = dtd_file(BOOK_DTD);
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let config = config.with_output_dir(blocker.join("dtd-docs"));
    assert!(matches!(run(&config), Err(Error::Io { .. })));
}

#[test]
fn test_names_differing_in_case_get_separate_pages() {
    let (_dir, config) = dtd_file(
        "<!ELEMENT Para (para)>\n\
         <!ELEMENT para EMPTY>\n\
         <!ELEMENT PARA EMPTY>\n\
         <!ELEMENT index EMPTY>\n",
    );
    let summary = run(&config).unwrap();

    assert_eq!(
        file_names(&summary.pages),
        vec!["_para.rst", "para.rst", "_p_a_r_a.rst", "index_.rst"]
    );
    assert_eq!(read_dir_sorted(&config.output_dir).len(), 5);
    for name in ["Para", "para", "PARA", "index"] {
        let path = config.output_dir.join(format!("{}.rst", page_stem(name)));
        let page = fs::read_to_string(path).unwrap();
        assert!(page.contains(&format!("The <{name}> tag")));
    }
    let index = fs::read_to_string(&summary.index).unwrap();
    assert!(index.contains("The Para file format"));
}

#[test]
fn test_empty_dtd_writes_only_the_index() {
    let (_dir, config) = dtd_file("<!-- nothing declared -->\n");
    let summary = run(&config).unwrap();
    assert!(summary.pages.is_empty());
    let index = fs::read_to_string(&summary.index).unwrap();
    assert!(index.contains("The XML file format"));
    assert_eq!(read_dir_sorted(&config.output_dir).len(), 1);
}

#[test]
fn test_unicode_case_folding_does_not_merge_pages() {
    // KELVIN SIGN lowercases to an ASCII 'k'
    let (_dir, config) = dtd_file("<!ELEMENT K (\u{212A})>\n<!ELEMENT \u{212A} EMPTY>\n");
    let summary = run(&config).unwrap();

    assert_eq!(file_names(&summary.pages), vec!["_k.rst", "_8490_.rst"]);
    assert_eq!(read_dir_sorted(&config.output_dir).len(), 3);

    let kelvin = fs::read_to_string(config.output_dir.join("_8490_.rst")).unwrap();
    assert!(kelvin.contains("The <\u{212A}> tag"));
    let upper = fs::read_to_string(config.output_dir.join("_k.rst")).unwrap();
    assert!(upper.contains("`\u{212A} <_8490_.html>`__"));

    let index = fs::read_to_string(&summary.index).unwrap();
    assert_eq!(index_entries(&index), vec!["_k", "_8490_"]);
}

#[test]
fn test_attribute_links_stay_unique() {
    let (_dir, config) = dtd_file(
        "<!ELEMENT a EMPTY>\n\
         <!ATTLIST a a-b CDATA #IMPLIED a_b CDATA #IMPLIED a.b CDATA #IMPLIED>\n",
    );
    run(&config).unwrap();

    let page = fs::read_to_string(config.output_dir.join("a.rst")).unwrap();
    let targets: Vec<&str> = page.lines().filter(|l| l.starts_with(".. _")).collect();
    assert_eq!(
        targets,
        vec![".. _the-attribute-1:", ".. _the-attribute-2:", ".. _the-attribute-3:"]
    );
    for n in 1..=3 {
        assert_eq!(page.matches(&format!("<#the-attribute-{n}>`__")).count(), 1);
    }
}
