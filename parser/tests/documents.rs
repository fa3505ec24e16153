use yaml_cst::{parse, Document, ErrorKind};

fn kinds(document: &Document<'_>) -> Vec<ErrorKind> {
    document
        .errors()
        .into_iter()
        .map(|error| error.kind().clone())
        .collect()
}

#[test]
fn test_empty_stream() {
    let documents = parse("");
    assert_eq!(documents.len(), 1);
    assert!(documents[0].root.is_none());
    assert_eq!(documents[0].raw, "");

    let documents = parse("# only a comment\n\n");
    assert_eq!(documents.len(), 1);
    assert!(documents[0].root.is_none());
    assert_eq!(documents[0].trivia.len(), 2);
    assert_eq!(documents[0].trivia[0].comment(), Some(" only a comment"));
}

#[test]
fn test_document_end_without_content() {
    let documents = parse("---\nx\n...\n");
    assert_eq!(documents.len(), 1);
    let document = &documents[0];
    assert!(document.explicit_start());
    assert!(document.explicit_end());
    assert_eq!(document.contents().unwrap().raw, "x");
    assert!(document.errors().is_empty());
}

#[test]
fn test_documents_tile_the_stream() {
    let source = "a: 1\n---\n- b\n...\n# tail\n--- c\n";
    let documents = parse(source);
    assert_eq!(documents.len(), 3);
    assert_eq!(documents[0].raw, "a: 1\n");
    assert_eq!(documents[1].raw, "---\n- b\n...\n# tail\n");
    assert_eq!(documents[2].raw, "--- c\n");
    assert_eq!(documents[2].contents().unwrap().raw, "c");

    let rebuilt: String = documents.iter().map(|document| document.raw).collect();
    assert_eq!(rebuilt, source);
    for pair in documents.windows(2) {
        assert_eq!(pair[0].range.end, pair[1].range.start);
    }
}

#[test]
fn test_directives() {
    let documents = parse("%YAML 1.2 # version\n%TAG ! tag:example.com,2000:\n---\nfoo\n");
    assert_eq!(documents.len(), 1);
    let document = &documents[0];
    assert_eq!(document.directives.len(), 2);
    assert_eq!(document.directives[0].name, "YAML");
    assert_eq!(document.directives[0].token.text, "%YAML 1.2");
    assert_eq!(document.directives[1].name, "TAG");
    assert!(document.explicit_start());
    assert!(document.errors().is_empty());
}

#[test]
fn test_missing_directives_end() {
    let documents = parse("%YAML 1.2\nfoo\n");
    assert_eq!(kinds(&documents[0]), [ErrorKind::MissingDirectivesEnd]);
    assert_eq!(documents[0].contents().unwrap().raw, "foo");
}

#[test]
fn test_document_end_suffix() {
    let documents = parse("a\n... x\n");
    assert_eq!(documents.len(), 1);
    assert_eq!(kinds(&documents[0]), [ErrorKind::DocumentEndSuffix]);

    let documents = parse("a\n... # fine\n");
    assert!(documents[0].errors().is_empty());
    assert_eq!(documents[0].trivia[0].comment(), Some(" fine"));
}

#[test]
fn test_trailing_content() {
    let documents = parse("[a]\n[b]\n");
    let document = &documents[0];
    assert_eq!(document.contents().unwrap().raw, "[a]");
    assert_eq!(document.stray.len(), 1);
    assert_eq!(document.stray[0].raw, "[b]");
    assert_eq!(kinds(document), [ErrorKind::TrailingContent]);
}

#[test]
fn test_byte_order_mark() {
    let source = "\u{feff}a: 1\nb: 2\n";
    let documents = parse(source);
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].raw, source);
    let root = documents[0].contents().unwrap();
    assert_eq!(root.as_mapping().unwrap().pairs.len(), 2);
    assert!(documents[0].errors().is_empty());

    let documents = parse("\u{feff}--- x\n");
    assert!(documents[0].explicit_start());
    assert_eq!(documents[0].contents().unwrap().raw, "x");
}

#[test]
fn test_crlf() {
    let source = "a: 1\r\nb:\r\n  - c\r\n";
    let documents = parse(source);
    assert_eq!(documents.len(), 1);
    let root = documents[0].contents().unwrap();
    let items = root.items();
    let raws: Vec<_> = items.iter().map(|item| item.raw()).collect();
    assert_eq!(raws, ["a", ": 1", "b", ":\r\n  - c"]);
    assert!(documents[0].errors().is_empty());
}

#[test]
fn test_errors_are_sorted() {
    let documents = parse("%YAML 1.2\na: 'x\ny'\n");
    let document = &documents[0];
    let errors = document.errors();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].range().start <= errors[1].range().start);
    assert_eq!(*errors[0].kind(), ErrorKind::MissingDirectivesEnd);
    assert_eq!(*errors[1].kind(), ErrorKind::SingleQuotedIndentation);
    assert!(!document.has_fatal_error());
}

#[test]
fn test_fatal_error_is_per_document() {
    let documents = parse("[a, b\n---\nc: d\n");
    assert_eq!(documents.len(), 2);
    assert!(documents[0].has_fatal_error());
    assert!(!documents[1].has_fatal_error());
    assert_eq!(documents[1].contents().unwrap().items().len(), 2);
}
