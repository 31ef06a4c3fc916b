use std::{
    io::{stdin, stdout, BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;

use interpreter::{InterpretError, RuntimeError};

/// Evaluates integer arithmetic expressions, one line at a time.
#[derive(clap::Parser)]
struct Args {
    /// Evaluate every line of this file instead of prompting
    file: Option<PathBuf>,

    /// Evaluate a single expression and exit
    #[arg(short, long, conflicts_with = "file", allow_hyphen_values = true)]
    expr: Option<String>,

    /// Print the parsed tree before the result
    #[arg(long)]
    ast: bool,

    /// Stop the process with status 1 on division by zero instead of moving on to the next line
    #[arg(long)]
    exit_on_division_by_zero: bool,
}

fn run_file(path: PathBuf, args: &Args) -> anyhow::Result<()> {
    let source = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    for line in source.split(|b| *b == b'\n') {
        run_bytes(line, args);
    }
    Ok(())
}

fn run_prompt(args: &Args) -> anyhow::Result<()> {
    loop {
        print!("calculator> ");
        stdout().flush()?;
        let mut line = Vec::new();
        if stdin().lock().read_until(b'\n', &mut line)? == 0 {
            println!();
            return Ok(());
        }
        run_bytes(&line, args);
    }
}

/// A line that is not valid UTF-8 is reported like any other bad line.
fn run_bytes(line: &[u8], args: &Args) {
    match std::str::from_utf8(line) {
        Ok(line) => run_line(line, args),
        Err(e) => {
            let offset = String::from_utf8_lossy(&line[..e.valid_up_to()]).chars().count();
            println!("error at offset {}: Input is not valid UTF-8", offset);
        }
    }
}

fn run_line(line: &str, args: &Args) {
    if line.trim().is_empty() {
        log::trace!("Skipping empty line");
        return;
    }

    if let Err(e) = run(line, args) {
        report(&e, args);
    }
}

fn run(source: &str, args: &Args) -> Result<i64, InterpretError> {
    let expr = interpreter::parse_source(source)?;
    if args.ast {
        println!("ast is: {}", expr);
    }
    let value = interpreter::evaluate(&expr)?;
    println!("result is: {}", value);
    Ok(value)
}

fn report(error: &InterpretError, args: &Args) {
    println!("{}", error);
    if args.exit_on_division_by_zero
        && matches!(error, InterpretError::RuntimeError(RuntimeError::DivisionByZero))
    {
        std::process::exit(1);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(expr) = &args.expr {
        if let Err(e) = run(expr, &args) {
            report(&e, &args);
            std::process::exit(1);
        }
        return Ok(());
    }

    match args.file.clone() {
        Some(file) => run_file(file, &args),
        None => run_prompt(&args),
    }
}
