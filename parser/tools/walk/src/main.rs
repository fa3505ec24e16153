use miette::{bail, Diagnostic, LabeledSpan, NamedSource, Result, SourceSpan};
use rustyline::{error::ReadlineError, DefaultEditor};
use thiserror::Error;
use yaml_cst::{parse, Node};

/// A REPL to navigate the syntax tree of a YAML document.
///
/// See [`read_action`] for commands.
fn main() {
    let args: Vec<_> = std::env::args().collect();
    let (filename, index) = match args.as_slice() {
        [_, filename] => (filename, 0),
        [_, filename, index] => match index.parse::<usize>() {
            Ok(index) => (filename, index),
            Err(e) => {
                eprintln!("Invalid document index {index}: {e}");
                return;
            }
        },
        _ => {
            eprintln!("Usage: walk <file.yaml> [document index]");
            return;
        }
    };
    let contents = match std::fs::read_to_string(filename) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("{filename}: {e}");
            return;
        }
    };
    let documents = parse(&contents);
    let Some(document) = documents.get(index) else {
        eprintln!("{filename} holds {} documents", documents.len());
        return;
    };
    match &document.root {
        Some(root) => walk(&contents, root),
        None => eprintln!("Document {index} is empty"),
    }
}

fn walk(contents: &str, root: &Node<'_>) {
    let mut stack = vec![root];
    let mut io = match DefaultEditor::new() {
        Ok(io) => io,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    print(contents, root);

    loop {
        let err = match read_action(&mut io) {
            Action::StepIn => step_in(&mut stack),
            Action::StepInKey => step_in_pair(&mut stack, true),
            Action::StepInValue => step_in_pair(&mut stack, false),
            Action::Next => sibling(&mut stack, 1),
            Action::Prev => sibling(&mut stack, -1),
            Action::Fin => fin(&mut stack),
            Action::Stop => break,
        };

        match err {
            Ok(()) => {
                let _ = io.clear_screen();
                print(contents, current(&stack));
            }
            Err(e) => eprintln!("{e}"),
        }
    }
}

type Stack<'a, 'input> = Vec<&'a Node<'input>>;

fn current<'a, 'input>(stack: &Stack<'a, 'input>) -> &'a Node<'input> {
    stack[stack.len() - 1]
}

fn print(contents: &str, node: &Node<'_>) {
    let errors = node
        .errors
        .iter()
        .chain(node.str_value().into_iter().flat_map(|value| value.errors()))
        .map(|error| {
            let range = error.range();
            LabeledSpan::new_with_span(Some(error.info()), (range.start, range.len()))
        })
        .collect();
    eprintln!(
        "{:?}",
        miette::Error::new(FakeErr {
            src: NamedSource::new("<input>", contents.to_string()),
            span: (node.range.start, node.range.len()).into(),
            errors,
        })
    );
    if let Some(value) = node.str_value() {
        eprintln!("value: {:?}", value.as_str());
    }
}

fn step_in(stack: &mut Stack<'_, '_>) -> Result<()> {
    let Some(child) = current(stack).children().first().copied() else {
        bail!("Node has no children");
    };
    stack.push(child);
    Ok(())
}

fn step_in_pair(stack: &mut Stack<'_, '_>, key: bool) -> Result<()> {
    let node = current(stack);
    let pair = if let Some(mapping) = node.as_mapping() {
        mapping.pairs.first()
    } else if let Some(pair) = node.as_pair() {
        Some(pair)
    } else {
        bail!("Not in a mapping");
    };
    let Some(pair) = pair else {
        bail!("Mapping is empty");
    };
    let child = if key { &pair.key } else { &pair.value };
    match child {
        Some(child) => {
            stack.push(child);
            Ok(())
        }
        None if key => bail!("Key is empty"),
        None => bail!("Value is empty"),
    }
}

fn sibling(stack: &mut Stack<'_, '_>, step: isize) -> Result<()> {
    if stack.len() == 1 {
        bail!("Can't move from top-level");
    }
    let node = current(stack);
    let siblings = stack[stack.len() - 2].children();
    let Some(idx) = siblings.iter().position(|sibling| std::ptr::eq(*sibling, node)) else {
        bail!("Node not found in its parent");
    };
    let Some(target) = idx
        .checked_add_signed(step)
        .and_then(|idx| siblings.get(idx))
    else {
        bail!("Reached the end of the collection");
    };
    let last = stack.len() - 1;
    stack[last] = *target;
    Ok(())
}

fn fin(stack: &mut Stack<'_, '_>) -> Result<()> {
    if stack.len() > 1 {
        stack.pop();
        Ok(())
    } else {
        bail!("Already at the top-level");
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("")]
#[diagnostic()]
pub struct FakeErr {
    #[source_code]
    src: NamedSource<String>,
    #[label("Current node")]
    span: SourceSpan,
    #[label(collection)]
    errors: Vec<LabeledSpan>,
}

enum Action {
    StepIn,
    StepInKey,
    StepInValue,
    Next,
    Prev,
    Fin,
    Stop,
}

fn read_action(io: &mut DefaultEditor) -> Action {
    loop {
        match io.readline(">> ") {
            Ok(line) => match line.as_str() {
                "q" | "quit" => return Action::Stop,
                "n" | "next" => return Action::Next,
                "p" | "prev" => return Action::Prev,
                "s" | "si" | "i" => return Action::StepIn,
                "sk" => return Action::StepInKey,
                "sv" => return Action::StepInValue,
                "fin" | "out" | "up" => return Action::Fin,
                _ => {}
            },
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Action::Stop,
            Err(e) => {
                eprintln!("{e:?}");
                return Action::Stop;
            }
        }
    }
}
