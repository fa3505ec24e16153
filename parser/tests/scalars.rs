use yaml_cst::{parse, Chomping, ErrorClass, ErrorKind, Node, ScalarStyle, ScalarValue};

/// Parse `source` and return the root of its first document.
fn root_of(source: &str, f: impl FnOnce(&Node<'_>)) {
    let documents = parse(source);
    f(documents[0].contents().expect("document is empty"));
}

/// Return the resolved value of the root scalar of `source`.
fn value(source: &str) -> String {
    let mut out = String::new();
    root_of(source, |root| {
        out = root.str_value().expect("not a scalar").as_str().to_owned();
    });
    out
}

/// Return the resolved value of the first mapping value of `source`.
fn mapping_value(source: &str) -> (String, Vec<ErrorKind>) {
    let mut out = (String::new(), vec![]);
    root_of(source, |root| {
        let value = root.as_mapping().unwrap().pairs[0].value.as_ref().unwrap();
        let scalar = value.str_value().unwrap();
        out = (
            scalar.as_str().to_owned(),
            scalar.errors().iter().map(|error| error.kind().clone()).collect(),
        );
    });
    out
}

#[test]
fn test_plain_folding() {
    assert_eq!(value("trimmed\n\n\n\nlines\n"), "trimmed\n\n\nlines");
    assert_eq!(value("a\n  b\n\n  c # comment\n"), "a b\nc");
    assert_eq!(value("a:b\n"), "a:b");
    assert_eq!(value("a#b\n"), "a#b");
    root_of("one\ntwo\n", |root| {
        assert_eq!(root.raw, "one\ntwo");
        assert!(matches!(root.str_value(), Some(ScalarValue::Plain(_))));
    });
}

#[test]
fn test_plain_stops_at_less_indented_line() {
    root_of("a: one\n  two\nb: three\n", |root| {
        let mapping = root.as_mapping().unwrap();
        let first = mapping.pairs[0].value.as_ref().unwrap();
        assert_eq!(first.raw, "one\n  two");
        assert_eq!(first.str_value().unwrap().as_str(), "one two");
        assert_eq!(mapping.pairs.len(), 2);
    });
}

#[test]
fn test_reserved_indicator() {
    let documents = parse("@foo\n");
    let root = documents[0].contents().unwrap();
    assert_eq!(root.str_value().unwrap().as_str(), "@foo");
    assert_eq!(
        root.error().map(|error| error.kind().clone()),
        Some(ErrorKind::ReservedIndicator('@'))
    );
}

#[test]
fn test_single_quoted() {
    assert_eq!(value("'it''s'\n"), "it's");
    assert_eq!(
        mapping_value("key: 'two\n  lines'\n"),
        ("two lines".into(), vec![])
    );
}

#[test]
fn test_single_quoted_insufficient_indentation() {
    let documents = parse("key: 'two\nlines'\n");
    let document = &documents[0];
    let root = document.contents().unwrap();
    let value = root.as_mapping().unwrap().pairs[0].value.as_ref().unwrap();
    assert!(value.error().is_none());
    assert!(root.error().is_none());

    let scalar = value.str_value().unwrap();
    assert_eq!(scalar.as_str(), "two lines");
    assert_eq!(scalar.errors().len(), 1);
    assert_eq!(
        scalar.errors()[0].info(),
        "Multi-line single-quoted string needs to be sufficiently indented"
    );
    assert_eq!(scalar.errors()[0].class(), ErrorClass::Value);
    assert!(!document.has_fatal_error());
}

#[test]
fn test_double_quoted() {
    assert_eq!(value("\"a\\tb\\u00e9\"\n"), "a\tbé");
    assert_eq!(value("\"fold \n  me\\\n  now\"\n"), "fold menow");
    assert_eq!(
        mapping_value("k: \"bad \\q\"\n"),
        ("bad \\q".into(), vec![ErrorKind::InvalidEscape("\\q".into())])
    );
    assert_eq!(
        mapping_value("k: \"a\nb\"\n"),
        ("a b".into(), vec![ErrorKind::DoubleQuotedIndentation])
    );
}

#[test]
fn test_unterminated_quote() {
    let documents = parse("'abc\n");
    let document = &documents[0];
    let root = document.contents().unwrap();
    assert_eq!(root.raw, "'abc\n");
    assert_eq!(
        root.error().map(|error| error.kind().clone()),
        Some(ErrorKind::UnterminatedQuote('\''))
    );
    assert!(document.has_fatal_error());
}

#[test]
fn test_literal_block() {
    let source = "a: |\n  x\n   y\n\n  z\nb: 1\n";
    root_of(source, |root| {
        let mapping = root.as_mapping().unwrap();
        let value = mapping.pairs[0].value.as_ref().unwrap();
        let scalar = value.as_scalar().unwrap();
        assert_eq!(scalar.style, ScalarStyle::Literal);
        assert_eq!(scalar.chomping, Some(Chomping::Clip));
        assert_eq!(scalar.value.as_str(), "x\n y\n\nz\n");
        assert_eq!(value.raw, "|\n  x\n   y\n\n  z");
        assert_eq!(mapping.pairs.len(), 2);
    });
}

#[test]
fn test_folded_block() {
    assert_eq!(mapping_value("a: >\n  one\n  two\n\n  three\n").0, "one two\nthree\n");
    assert_eq!(mapping_value("a: >-\n  one\n  two\n").0, "one two");
    assert_eq!(mapping_value("a: |+\n  one\n\n").0, "one\n\n");
}

#[test]
fn test_keep_chomping_preserves_trailing_lines() {
    assert_eq!(value(">+\nblock\n\n"), "block\n\n");
    assert_eq!(value(">+\nab\n\n \n"), "ab\n\n \n");

    let documents = parse("a: |+\n  one\n\nb: 2\n");
    let root = documents[0].contents().unwrap();
    let mapping = root.as_mapping().unwrap();
    assert_eq!(mapping.pairs.len(), 2);
    let value = mapping.pairs[0].value.as_ref().unwrap();
    assert_eq!(value.raw, "|+\n  one\n");
    assert_eq!(value.str_value().unwrap().as_str(), "one\n\n");
    assert!(mapping.pairs[1].leading.is_empty());
    assert!(documents[0].trivia.is_empty());
}

#[test]
fn test_explicit_indentation_indicator() {
    assert_eq!(value(">1\n\n\n line\n"), "\n\n line\n");
    root_of("- |1\n   x\n", |root| {
        let item = root.as_sequence().unwrap().items[0].node.as_ref().unwrap();
        let scalar = item.as_scalar().unwrap();
        assert_eq!(scalar.indent_indicator, Some(1));
        assert_eq!(scalar.value.as_str(), "  x\n");
    });
}

#[test]
fn test_block_scalar_header() {
    root_of("a: | # note\n  x\n", |root| {
        let value = root.as_mapping().unwrap().pairs[0].value.as_ref().unwrap();
        assert_eq!(value.trailing.unwrap().comment(), Some(" note"));
        assert_eq!(value.str_value().unwrap().as_str(), "x\n");
    });
    root_of("a: |x\n  y\n", |root| {
        let value = root.as_mapping().unwrap().pairs[0].value.as_ref().unwrap();
        assert_eq!(
            value.error().map(|error| error.kind().clone()),
            Some(ErrorKind::BlockScalarHeaderExtra)
        );
    });
}

#[test]
fn test_block_scalar_leading_indentation() {
    root_of("|\n    \n  a\n", |root| {
        let scalar = root.str_value().unwrap();
        assert_eq!(scalar.as_str(), "\na\n");
        assert_eq!(
            scalar.errors()[0].kind(),
            &ErrorKind::BlockScalarLeadingIndentation
        );
    });
}

#[test]
fn test_block_scalar_keeps_tabs() {
    assert_eq!(mapping_value("key: |\n  a\n  \t\n  b\n").0, "a\n\t\nb\n");
    assert_eq!(value("|\n a\n \t\n b\n"), "a\n\t\nb\n");
    assert_eq!(mapping_value("key: |\n  a\n\t\n  b\n").0, "a\n\nb\n");
}
