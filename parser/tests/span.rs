use yaml_cst::{parse, Marker, Node, NodeKind, Range};

/// Walk `node` and collect the value and raw text of every scalar below it.
fn collect_scalars(node: &Node<'_>, out: &mut Vec<(String, String)>) {
    if let Some(value) = node.str_value() {
        out.push((value.as_str().to_owned(), node.raw.to_owned()));
    }
    for child in node.children() {
        collect_scalars(child, out);
    }
}

/// Parse `input` and return the value and raw text of all its scalars, in source order.
fn scalar_spans(input: &str) -> Vec<(String, String)> {
    let mut out = vec![];
    for document in parse(input) {
        for node in document.root.iter().chain(&document.stray) {
            collect_scalars(node, &mut out);
        }
    }
    out
}

/// Parse `input` and return the raw text of all its block sequences, outermost first.
fn sequence_spans(input: &str) -> Vec<String> {
    fn walk(node: &Node<'_>, out: &mut Vec<String>) {
        if matches!(node.kind, NodeKind::Sequence(_)) {
            out.push(node.raw.to_owned());
        }
        for child in node.children() {
            walk(child, out);
        }
    }
    let mut out = vec![];
    for document in parse(input) {
        if let Some(root) = &document.root {
            walk(root, &mut out);
        }
    }
    out
}

fn deref_pairs(pairs: &[(String, String)]) -> Vec<(&str, &str)> {
    pairs
        .iter()
        .map(|(a, b)| (a.as_str(), b.as_str()))
        .collect()
}

#[test]
fn test_plain() {
    assert_eq!(
        deref_pairs(&scalar_spans("a: b\nc: d e\n")),
        [("a", "a"), ("b", "b"), ("c", "c"), ("d e", "d e")]
    );
    assert_eq!(
        deref_pairs(&scalar_spans("key: one\n  two\n")),
        [("key", "key"), ("one two", "one\n  two")]
    );
}

#[test]
fn test_quoted() {
    assert_eq!(
        deref_pairs(&scalar_spans("- 'x''y'\n- \"a\\nb\"\n")),
        [("x'y", "'x''y'"), ("a\nb", "\"a\\nb\"")]
    );
}

#[test]
fn test_utf8_ranges_are_bytes() {
    let documents = parse("é: ü\n");
    let root = documents[0].contents().unwrap();
    let pair = &root.as_mapping().unwrap().pairs[0];
    assert_eq!(pair.key.as_ref().unwrap().range, Range::new(0, 2));
    let value = pair.value.as_ref().unwrap();
    assert_eq!(value.range, Range::new(4, 6));
    assert_eq!(value.raw, "ü");
}

#[test]
fn test_sequence_spans() {
    assert_eq!(
        sequence_spans("- - a\n  - b\n- c\n"),
        ["- - a\n  - b\n- c", "- a\n  - b"]
    );
    assert_eq!(sequence_spans("key:\n  - a\n  - b # c\n"), ["- a\n  - b"]);
}

#[test]
fn test_error_markers() {
    let documents = parse("key: \"a\nb\"\n");
    let errors = documents[0].errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].marker(), &Marker::new(5, 1, 5));

    let documents = parse("a: 1\r\nb\r\n");
    let errors = documents[0].errors();
    assert_eq!(errors[0].marker(), &Marker::new(6, 2, 0));
    assert_eq!(
        errors[0].to_string(),
        "Implicit map keys need to be followed by map values at byte 6 line 2 column 1"
    );
}
