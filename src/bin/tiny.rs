//! Driver for the tiny example language.
//!
//! Parses a script (from a file or `--eval`), reports every recovered
//! syntax error as a full diagnostic, and prints the resulting AST as JSON.
//! Exits non-zero when the parse was fatal or reported any syntax error.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use miette::Report;

use yantra::errors::{ErrorReporting, SourceContext};
use yantra::tiny;

/// The command-line arguments for the tiny driver.
#[derive(Debug, Parser)]
#[command(
    name = "tiny",
    version,
    about = "Parse a tiny-language script and print its AST."
)]
struct TinyArgs {
    /// The path to the script file to parse.
    file: Option<PathBuf>,

    /// Inline source text, used instead of a file.
    #[arg(short, long)]
    eval: Option<String>,
}

fn main() {
    let args = TinyArgs::parse();

    let (name, text) = match read_source(&args) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("tiny: {message}");
            process::exit(2);
        }
    };
    let source = SourceContext::from_input(name, text.clone());

    let run = tiny::engine().parse(&text);

    for error in &run.errors {
        let report = Report::new(source.syntax_error(&error.label, source.span_at(error.position)));
        eprintln!("{report:?}");
    }
    let error_count = run.errors.len();

    match run.into_result(&source) {
        Ok(run) => {
            match serde_json::to_string_pretty(&run.captures) {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    eprintln!("tiny: cannot serialize AST: {err}");
                    process::exit(2);
                }
            }
            if error_count > 0 {
                eprintln!("tiny: {error_count} syntax error(s) recovered");
                process::exit(1);
            }
        }
        Err(fatal) => {
            let report = Report::new(fatal);
            eprintln!("{report:?}");
            process::exit(1);
        }
    }
}

fn read_source(args: &TinyArgs) -> Result<(String, String), String> {
    match (&args.file, &args.eval) {
        (_, Some(text)) => Ok(("eval".to_string(), text.clone())),
        (Some(path), None) => {
            let text = std::fs::read_to_string(path)
                .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
            Ok((path.display().to_string(), text))
        }
        (None, None) => Err("expected a script file or --eval".to_string()),
    }
}
