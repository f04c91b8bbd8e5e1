//! Sample-based integration tests: parse the files under `samples/`.

mod common;

use std::fs;
use std::path::PathBuf;

use common::{child_names, parse, parse_err};
use fxml_core::{EmitConfig, Position, emit_fxml};

fn sample(name: &str) -> String {
    let mut root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // crates/core -> repo root
    root.pop();
    root.pop();
    let path = root.join("samples").join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

#[test]
fn page_sample_structure() {
    let doc = parse(&sample("page.fxml"));
    assert_eq!(doc.root.name, "page");
    assert_eq!(doc.root.attribute("title"), Some("Release notes"));
    assert_eq!(doc.root.attribute("lang"), Some("en"));
    assert_eq!(child_names(&doc), ["section", "section"]);

    let sections: Vec<_> = doc.root.child_elements().collect();
    assert_eq!(sections[0].attribute("id"), Some("intro"));
    assert_eq!(sections[1].attribute("id"), Some("details"));

    let intro: Vec<_> = sections[0].child_elements().map(|e| e.name.as_str()).collect();
    assert_eq!(intro, ["heading", "para", "link"]);
    let link = sections[0].child_elements().nth(2).unwrap();
    assert_eq!(link.attribute("href"), Some("https://example.org/notes?v=2"));
    assert_eq!(link.attribute("rel"), Some("external"));
    assert!(link.children.is_empty());
}

#[test]
fn page_sample_text_is_verbatim() {
    let doc = parse(&sample("page.fxml"));
    let intro = doc.root.child_elements().next().unwrap();
    let para = intro.child_elements().nth(1).unwrap();
    let text = para.text_content();
    assert!(text.contains("x = y and C:\\path stay verbatim."), "{text:?}");
    assert!(text.contains("mode stack"));
    assert_eq!(para.children[0].as_text(), Some("The lexer now keeps a "));
}

#[test]
fn page_sample_decodes_attribute_escapes_only() {
    let doc = parse(&sample("page.fxml"));
    let details = doc.root.child_elements().nth(1).unwrap();
    let para = details.child_elements().next().unwrap();
    assert_eq!(para.attribute("class"), Some("note"));
    let i = para.child_elements().next().unwrap();
    assert_eq!(i.attribute("data"), Some("tab\there \u{e9}"));
    assert!(para.text_content().contains("such as \"\\n\" are"));

    let list = details.child_elements().nth(1).unwrap();
    let items: Vec<_> = list.child_elements().map(|e| e.text_content()).collect();
    assert_eq!(items, ["one", "two", "three"]);
    assert_eq!(list.child_elements().nth(2).unwrap().attribute("checked"), Some(""));
}

#[test]
fn page_sample_round_trips() {
    let doc = parse(&sample("page.fxml"));
    let emitted = emit_fxml(&doc, &EmitConfig::indented(2));
    assert_eq!(parse(&emitted), doc);
}

#[test]
fn broken_sample_reports_bad_escape() {
    let err = parse_err(&sample("broken.fxml"));
    assert_eq!(err.message, "invalid escape sequence");
    assert_eq!(err.position, Some(Position::new(2, 14, 55)));
    assert!(err.report.contains(r#"3 |  entry(name="\q"){bad escape}"#), "{}", err.report);
}
