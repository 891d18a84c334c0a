use xmldoc::{Document, XmlError};

const SRC: &str = include_str!("conn.xml");

const FIXTURE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/conn.xml");

#[test]
fn test_lookup_scenario() {
    let document = Document::parse_str(
        r#"<root><tag id="yahoo"><tag id="a" value="1"/></tag></root>"#,
    )
    .unwrap();

    let element = document.get_element_by_id("yahoo").unwrap();
    let tags = element.elements_by_name("tag");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].attribute("id"), Some("a"));
    assert_eq!(tags[0].attribute("value"), Some("1"));
}

#[test]
fn test_lookup_fixture() {
    let document = Document::parse_str(SRC).unwrap();

    let element = document.get_element_by_id("yahoo").unwrap();
    let pairs: Vec<(&str, &str)> = element
        .elements_by_name("tag")
        .into_iter()
        .map(|tag| {
            (
                tag.attribute("id").unwrap_or("-"),
                tag.attribute("value").unwrap_or("-"),
            )
        })
        .collect();
    assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
}

#[test]
fn test_lookup_missing_id() {
    let document = Document::parse_str(SRC).unwrap();
    assert!(document.get_element_by_id("altavista").is_none());
}

#[test]
fn test_from_file() {
    let document = Document::from_file(FIXTURE_PATH).unwrap();
    assert_eq!(document.root.unwrap().name, "connections");
}

#[test]
fn test_from_file_missing() {
    let err = Document::from_file("/no/such/conn.xml").unwrap_err();
    assert!(matches!(err, XmlError::FileAccess { .. }));
}

#[test]
fn test_malformed_input() {
    let err = Document::parse_str("<a><b></a>").unwrap_err();
    assert!(matches!(err, XmlError::Parse(_)));
}

#[test]
fn test_roundtrip() {
    let first = Document::parse_str(SRC).unwrap();
    let rendered = first.to_xml().unwrap();
    let second = Document::parse_str(&rendered).unwrap();
    assert_eq!(first, second);
}
