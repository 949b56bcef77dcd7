mod error;

use async_trait::async_trait;
use error::Error;
use futures::executor::block_on;
use reduct_core::{
    markup,
    number,
    session::{ReferenceResolver, SessionOptionsBuilder},
    NodeId,
    Registry,
    Session,
};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs::File, io::{self, BufReader, IsTerminal, Read}};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Resolves references by reading the document stored in the file they name.
#[derive(Debug)]
struct FileResolver;

#[async_trait(?Send)]
impl ReferenceResolver for FileResolver {
    async fn resolve(&self, source: &str) -> Result<String, String> {
        std::fs::read_to_string(source).map_err(|err| err.to_string())
    }
}

/// Parses the given document and evaluates the expression it describes, returning the result.
async fn parse_eval(input: &str, session: &mut Session) -> Result<NodeId, Error> {
    let element = reduct_markup::parse(input)?;
    let expr = markup::build(session, None, &element).await?;
    Ok(session.evaluate(expr).await?)
}

/// Evaluates the given document, printing the result in textual and in markup form, or the
/// failure.
fn read_eval(input: &str, session: &mut Session) {
    match block_on(parse_eval(input, session)) {
        Ok(result) => {
            println!("{}", session.display(result));

            let tree = session.tree_mut();
            let copy = tree.clone_subtree(result);
            let copy = number::externalize(tree, copy);
            match markup::serialize(tree, copy) {
                Ok(document) => println!("{}", document),
                Err(err) => eprintln!("{}", reduct_error::ErrorKind::message(&err)),
            }
            tree.free(copy);
            tree.free(result);
            debug!(live = tree.live_count(), "document evaluated");
        },
        Err(err) => {
            err.report_to_stderr(input, session);
            if let Error::Eval(failure) = err {
                session.tree_mut().free(failure.root);
            }
        },
    }
}

/// Evaluates every non-empty line of the input as its own document.
fn execute(input: &str, session: &mut Session) {
    for line in input.lines().filter(|line| !line.trim().is_empty()) {
        read_eval(line, session);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args();
    args.next();

    let options = SessionOptionsBuilder::new().build();
    let mut session = Session::new(Registry::default(), options);
    session.set_resolver(FileResolver);

    if let Some(filename) = args.next() {
        // run source file
        let mut input = String::new();
        let read = File::open(&filename)
            .and_then(|file| BufReader::new(file).read_to_string(&mut input));
        if let Err(err) = read {
            eprintln!("cannot read `{}`: {}", filename, err);
            std::process::exit(1);
        }

        execute(&input, &mut session);
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            eprintln!("cannot read the standard input: {}", err);
            std::process::exit(1);
        }

        execute(&input, &mut session);
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            },
        };

        fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            read_eval(&input, session);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &mut session) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}
