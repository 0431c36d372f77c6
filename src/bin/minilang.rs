use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use minilang::config::{Config, IntpMode, ScopePolicy};
use minilang::{parser, Interpreter};

/// Interpreter for MiniLang, a small imperative language with Lisp-style
/// lists over a mark-and-sweep cons-cell heap.
#[derive(Parser)]
#[command(name = "minilang")]
#[command(about = "Interpreter for MiniLang", long_about = None)]
struct Cli {
    /// Source file to run. Reads from stdin if omitted.
    file: Option<PathBuf>,

    /// Maximum number of cons cells the heap may hold at once.
    #[arg(long, default_value_t = 1024)]
    heap_capacity: usize,

    /// Run called procedures with dynamic scoping instead of the default
    /// static scoping.
    #[arg(long)]
    dynamic_scope: bool,

    /// Make `intp` true only for a literal NUMBER token instead of
    /// evaluating its argument.
    #[arg(long)]
    syntactic_intp: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let source = read_source(cli.file.as_deref())?;

    let mut config = Config::new(cli.heap_capacity);
    if cli.dynamic_scope {
        config = config.with_scope_policy(ScopePolicy::Dynamic);
    }
    if cli.syntactic_intp {
        config = config.with_intp_mode(IntpMode::SyntacticNumberLiteral);
    }

    let program = parser::parse(&source)?;
    let mut interpreter = Interpreter::new(config);
    interpreter.run(&program)?;
    print!("{}", interpreter.dump());
    Ok(())
}

fn read_source(file: Option<&std::path::Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
