#[macro_use]
extern crate quickcheck;

use quickcheck::{Arbitrary, Gen, TestResult};

use yaml_cst::{parse, Document, Node};

/// Input stitched together from YAML indicators, scalars, indentation and line breaks.
///
/// Random strings rarely hit the interesting paths of the parser; these do.
#[derive(Clone, Debug)]
struct Yamlish(String);

const FRAGMENTS: &[&str] = &[
    "- ", "? ", ": ", "-", ":", "?", "key", "value", "a b", "'q'", "'multi\n line'", "\"e\\t\"",
    "\"bad\\q\"", "\"", "'", "[", "]", "{", "}", ", ", "&anchor ", "*alias", "!tag ", "!!str ",
    "|", "|-", ">+", ">2", "# comment", "#", "\n", "\n", "\n", "\r\n", "\t", " ", "  ", "    ",
    "---", "...", "--- ", "%YAML 1.2", "\u{feff}", "@", "`", "é",
];

impl Arbitrary for Yamlish {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % (g.size() + 1);
        let mut out = String::new();
        for _ in 0..len {
            out.push_str(g.choose(FRAGMENTS).copied().unwrap_or_default());
        }
        Yamlish(out)
    }
}

/// Check that every node lies within its parent and matches its source text.
fn check_node(source: &str, node: &Node<'_>) -> Result<(), String> {
    if node.raw != node.range.slice(source) {
        return Err(format!("raw text of {:?} does not match its range", node.raw));
    }
    for child in node.children() {
        if !node.range.contains(child.range) {
            return Err(format!(
                "{:?} at {:?} escapes its parent {:?} at {:?}",
                child.raw, child.range, node.raw, node.range
            ));
        }
        check_node(source, child)?;
    }
    Ok(())
}

fn check_stream(source: &str, documents: &[Document<'_>]) -> Result<(), String> {
    if documents.is_empty() {
        return Err("no document".into());
    }
    let rebuilt: String = documents.iter().map(|document| document.raw).collect();
    if rebuilt != source {
        return Err(format!("documents rebuild {rebuilt:?}"));
    }
    for document in documents {
        for node in document.root.iter().chain(&document.stray) {
            if !document.range.contains(node.range) {
                return Err(format!("{:?} escapes its document", node.raw));
            }
            check_node(source, node)?;
        }
        let errors = document.errors();
        if errors
            .windows(2)
            .any(|pair| pair[0].range().start > pair[1].range().start)
        {
            return Err("errors are not sorted".into());
        }
    }
    Ok(())
}

fn to_result(source: &str) -> TestResult {
    match check_stream(source, &parse(source)) {
        Ok(()) => TestResult::passed(),
        Err(e) => TestResult::error(format!("{e} in {source:?}")),
    }
}

quickcheck! {
    fn test_arbitrary_text_is_lossless(source: String) -> TestResult {
        to_result(&source)
    }

    fn test_yamlish_text_is_lossless(source: Yamlish) -> TestResult {
        to_result(&source.0)
    }

    fn test_reparsing_document_is_stable(source: Yamlish) -> TestResult {
        let documents = parse(&source.0);
        for document in &documents {
            let Some(first) = parse(document.raw).into_iter().next() else {
                return TestResult::error("no document");
            };
            if first.raw != document.raw {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }
}
