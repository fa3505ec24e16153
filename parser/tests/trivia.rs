use yaml_cst::{parse, ErrorKind, TriviaKind};

#[test]
fn test_comments_attach_to_following_node() {
    let documents = parse("# head\na: 1 # tail\n\n# about b\nb: 2\n");
    let document = &documents[0];
    let root = document.contents().unwrap();
    assert_eq!(root.leading.len(), 1);
    assert_eq!(root.leading[0].comment(), Some(" head"));

    let mapping = root.as_mapping().unwrap();
    let first = mapping.pairs[0].value.as_ref().unwrap();
    assert_eq!(first.trailing.unwrap().token.text, "# tail");

    let leading = &mapping.pairs[1].leading;
    assert_eq!(leading.len(), 2);
    assert_eq!(leading[0].kind, TriviaKind::BlankLine);
    assert_eq!(leading[1].comment(), Some(" about b"));
    assert!(document.trivia.is_empty());
}

#[test]
fn test_comments_in_sequences() {
    let documents = parse("- a\n# between\n- b # after\n# end\n");
    let document = &documents[0];
    let sequence = document.contents().unwrap().as_sequence().unwrap();
    assert_eq!(sequence.items[1].leading[0].comment(), Some(" between"));
    let second = sequence.items[1].node.as_ref().unwrap();
    assert_eq!(second.trailing.unwrap().comment(), Some(" after"));
    assert_eq!(document.trivia.len(), 1);
    assert_eq!(document.trivia[0].comment(), Some(" end"));
}

#[test]
fn test_comment_between_properties_and_node() {
    let documents = parse("key: &a # anchor\n  value\n");
    let root = documents[0].contents().unwrap();
    let value = root.as_mapping().unwrap().pairs[0].value.as_ref().unwrap();
    assert_eq!(value.props.anchor_name(), Some("a"));
    assert_eq!(value.props.comments[0].comment(), Some(" anchor"));
    assert_eq!(value.raw, "value");
}

#[test]
fn test_comment_without_space() {
    let documents = parse("a: 'b'#c\n");
    let kinds: Vec<_> = documents[0]
        .errors()
        .into_iter()
        .map(|error| error.kind().clone())
        .collect();
    assert_eq!(kinds, [ErrorKind::CommentWithoutSpace]);

    let documents = parse("a: b#c\n");
    let value = documents[0].contents().unwrap().as_mapping().unwrap().pairs[0]
        .value
        .as_ref()
        .unwrap();
    assert_eq!(value.raw, "b#c");
    assert!(documents[0].errors().is_empty());
}

#[test]
fn test_trivia_is_lossless() {
    let source = "  # indented comment\n\t\n   \nkey:   value   # spaced\n";
    let documents = parse(source);
    let document = &documents[0];
    assert_eq!(document.raw, source);
    let root = document.contents().unwrap();
    let texts: Vec<_> = root.leading.iter().map(|trivia| trivia.token.text).collect();
    assert_eq!(texts, ["# indented comment", "\t", "   "]);
    let value = root.as_mapping().unwrap().pairs[0].value.as_ref().unwrap();
    assert_eq!(value.raw, "value");
    assert_eq!(value.trailing.unwrap().token.text, "# spaced");
}
