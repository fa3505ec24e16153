use yaml_cst::{parse, ErrorKind, FlowKind, Node, NodeKind};

fn flow_root(source: &str, f: impl FnOnce(&Node<'_>, Vec<ErrorKind>)) {
    let documents = parse(source);
    let kinds = documents[0]
        .errors()
        .into_iter()
        .map(|error| error.kind().clone())
        .collect();
    f(documents[0].contents().expect("document is empty"), kinds);
}

fn raws<'a>(nodes: &[Node<'a>]) -> Vec<&'a str> {
    nodes.iter().map(|node| node.raw).collect()
}

#[test]
fn test_flow_sequence() {
    flow_root("[a, 'b', [c]]\n", |root, errors| {
        let flow = root.as_flow().unwrap();
        assert_eq!(flow.kind, FlowKind::Sequence);
        assert_eq!(raws(&flow.items), ["a", "'b'", "[c]"]);
        assert_eq!(root.raw, "[a, 'b', [c]]");
        assert!(errors.is_empty());
    });
    flow_root("[a, b, ]\n", |root, errors| {
        assert_eq!(root.as_flow().unwrap().items.len(), 2);
        assert!(errors.is_empty());
    });
}

#[test]
fn test_flow_mapping() {
    flow_root("{a: 1, b, \"c\":d}\n", |root, errors| {
        let flow = root.as_flow().unwrap();
        assert_eq!(flow.kind, FlowKind::Mapping);
        assert_eq!(raws(&flow.items), ["a: 1", "b", "\"c\":d"]);
        let pairs: Vec<_> = flow.items.iter().map(|item| item.as_pair().unwrap()).collect();
        assert_eq!(pairs[0].value.as_ref().unwrap().raw, "1");
        assert!(pairs[1].value.is_none());
        assert_eq!(pairs[2].key.as_ref().unwrap().str_value().unwrap().as_str(), "c");
        assert_eq!(pairs[2].value.as_ref().unwrap().raw, "d");
        assert!(errors.is_empty());
    });
}

#[test]
fn test_flow_pairs_in_sequence() {
    flow_root("[a: 1, ? b : 2, : 3]\n", |root, errors| {
        let flow = root.as_flow().unwrap();
        assert_eq!(flow.items.len(), 3);
        let pairs: Vec<_> = flow.items.iter().map(|item| item.as_pair().unwrap()).collect();
        assert!(!pairs[0].explicit);
        assert!(pairs[1].explicit);
        assert_eq!(pairs[1].key.as_ref().unwrap().raw, "b");
        assert!(pairs[2].key.is_none());
        assert_eq!(pairs[2].value.as_ref().unwrap().raw, "3");
        assert!(errors.is_empty());
    });
}

#[test]
fn test_multiline_flow() {
    flow_root("key: [a,\n  # note\n  b]\n", |root, errors| {
        let value = root.as_mapping().unwrap().pairs[0].value.as_ref().unwrap();
        let flow = value.as_flow().unwrap();
        assert_eq!(raws(&flow.items), ["a", "b"]);
        assert_eq!(flow.items[1].leading[0].comment(), Some(" note"));
        assert!(errors.is_empty());
    });
}

#[test]
fn test_flow_indentation() {
    flow_root("key: [a,\nb]\n", |root, errors| {
        assert_eq!(errors, [ErrorKind::FlowIndentation]);
        let value = root.as_mapping().unwrap().pairs[0].value.as_ref().unwrap();
        assert_eq!(value.as_flow().unwrap().items.len(), 2);
    });
}

#[test]
fn test_unterminated_flow() {
    flow_root("[a, b\n", |root, errors| {
        assert_eq!(errors, [ErrorKind::UnterminatedFlow(']')]);
        assert_eq!(root.as_flow().unwrap().items.len(), 2);
        assert!(root.errors[0].is_fatal());
    });
    flow_root("{a: [b}\n", |root, errors| {
        assert_eq!(
            errors,
            [ErrorKind::UnterminatedFlow('}'), ErrorKind::UnterminatedFlow(']')]
        );
        assert!(matches!(root.kind, NodeKind::FlowCollection(_)));
    });
}

#[test]
fn test_missing_separator() {
    flow_root("['a' 'b']\n", |root, errors| {
        assert_eq!(errors, [ErrorKind::MissingFlowSeparator]);
        assert_eq!(root.as_flow().unwrap().items.len(), 2);
    });
}

#[test]
fn test_flow_key_in_block_mapping() {
    flow_root("[a, b]: c\n", |root, errors| {
        let pair = &root.as_mapping().unwrap().pairs[0];
        assert!(pair.key.as_ref().unwrap().as_flow().is_some());
        assert_eq!(pair.value.as_ref().unwrap().raw, "c");
        assert!(errors.is_empty());
    });
}
