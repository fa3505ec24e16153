use std::env;
use std::fs::File;
use std::io::prelude::*;

use yaml_cst::{parse, Node, NodeKind, Pair, Trivia};

fn print_trivia(depth: usize, trivia: &[Trivia<'_>]) {
    for trivia in trivia {
        eprintln!(
            "{:width$}\x1B[;90m{:?} {:?}\x1B[;m",
            "",
            trivia.kind,
            trivia.token.text,
            width = depth * 2
        );
    }
}

fn print_pair(depth: usize, pair: &Pair<'_>) {
    let indent = depth * 2;
    print_trivia(depth, &pair.leading);
    for error in &pair.errors {
        eprintln!("{:indent$}\x1B[;31m! {error}\x1B[;m", "");
    }
    let key = if pair.explicit { "? key" } else { "key" };
    match &pair.key {
        Some(node) => {
            eprintln!("{:indent$}{key}", "");
            print_node(depth + 1, node);
        }
        None => eprintln!("{:indent$}{key} (empty)", ""),
    }
    match (&pair.value_token, &pair.value) {
        (Some(_), Some(node)) => {
            eprintln!("{:indent$}: value", "");
            print_node(depth + 1, node);
        }
        (Some(_), None) => eprintln!("{:indent$}: value (empty)", ""),
        (None, _) => {}
    }
}

fn print_node(depth: usize, node: &Node<'_>) {
    let indent = depth * 2;
    print_trivia(depth, &node.leading);
    let props = [node.props.anchor, node.props.tag]
        .iter()
        .flatten()
        .map(|token| token.text)
        .collect::<Vec<_>>()
        .join(" ");
    let range = node.range;
    match &node.kind {
        NodeKind::Scalar(scalar) => eprintln!(
            "{:indent$}\x1B[;34m{:?}\x1B[;m {props} {:?} -> {:?} [{}..{}]",
            "",
            scalar.style,
            node.raw,
            scalar.value.as_str(),
            range.start,
            range.end
        ),
        NodeKind::Alias(name) => {
            eprintln!("{:indent$}\x1B[;34mAlias\x1B[;m *{name} [{}..{}]", "", range.start, range.end);
        }
        NodeKind::Sequence(sequence) => {
            eprintln!(
                "{:indent$}\x1B[;34mSequence\x1B[;m {props} column {} [{}..{}]",
                "", sequence.indent, range.start, range.end
            );
            for item in &sequence.items {
                print_trivia(depth + 1, &item.leading);
                for error in &item.errors {
                    eprintln!("{:indent$}  \x1B[;31m! {error}\x1B[;m", "");
                }
                match &item.node {
                    Some(child) => print_node(depth + 1, child),
                    None => eprintln!("{:indent$}  - (empty)", ""),
                }
            }
        }
        NodeKind::Mapping(mapping) => {
            eprintln!(
                "{:indent$}\x1B[;34mMapping\x1B[;m {props} column {} [{}..{}]",
                "", mapping.indent, range.start, range.end
            );
            for pair in &mapping.pairs {
                print_pair(depth + 1, pair);
            }
        }
        NodeKind::Pair(pair) => {
            eprintln!("{:indent$}\x1B[;34mPair\x1B[;m [{}..{}]", "", range.start, range.end);
            print_pair(depth + 1, pair);
        }
        NodeKind::FlowCollection(flow) => {
            eprintln!(
                "{:indent$}\x1B[;34mFlow {:?}\x1B[;m {props} [{}..{}]",
                "", flow.kind, range.start, range.end
            );
            for item in &flow.items {
                print_node(depth + 1, item);
            }
        }
    }
    for error in &node.errors {
        eprintln!("{:indent$}\x1B[;31m! {error}\x1B[;m", "");
    }
    if let Some(value) = node.str_value() {
        for error in value.errors() {
            eprintln!("{:indent$}\x1B[;33m~ {error}\x1B[;m", "");
        }
    }
    if let Some(trailing) = &node.trailing {
        print_trivia(depth, std::slice::from_ref(trailing));
    }
}

fn main() {
    let args: Vec<_> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("Usage: dump_cst <file.yaml>");
        std::process::exit(1);
    };
    let mut s = String::new();
    if let Err(e) = File::open(path).and_then(|mut f| f.read_to_string(&mut s)) {
        eprintln!("{path}: {e}");
        std::process::exit(1);
    }

    for (i, document) in parse(&s).iter().enumerate() {
        eprintln!(
            "\x1B[;32mDocument {i}\x1B[;m [{}..{}]{}{}",
            document.range.start,
            document.range.end,
            if document.explicit_start() { " ---" } else { "" },
            if document.explicit_end() { " ..." } else { "" },
        );
        for directive in &document.directives {
            eprintln!("  %{} {:?}", directive.name, directive.token.text);
        }
        for node in document.root.iter().chain(&document.stray) {
            print_node(1, node);
        }
        print_trivia(1, &document.trivia);
        for error in &document.errors {
            eprintln!("  \x1B[;31m! {error}\x1B[;m");
        }
    }
}
