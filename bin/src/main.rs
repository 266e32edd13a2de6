use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;

/// Evaluates arithmetic expressions such as `-1.4 * (+2.6 ** 7)`.
#[derive(clap::Parser)]
#[command(version, about)]
struct Args {
    /// Expression to evaluate. Starts an interactive prompt if neither this nor --file is given.
    expression: Option<String>,

    /// Evaluate every non-empty line of this file.
    #[arg(short, long, conflicts_with = "expression")]
    file: Option<PathBuf>,
}

fn run(source: &str) -> Result<(), errors::CalcError> {
    let value = interpreter::evaluate(source)?;
    println!("{}", value);
    Ok(())
}

fn run_file(path: PathBuf) -> anyhow::Result<bool> {
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("could not read {}", path.display()))?;

    let mut all_ok = true;
    for (i, line) in contents.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
        if let Err(e) = run(line) {
            log::debug!("{}:{} failed with {:?}", path.display(), i + 1, e.kind);
            eprintln!("{}:{}: {}", path.display(), i + 1, e);
            all_ok = false;
        }
    }
    Ok(all_ok)
}

fn run_prompt() -> anyhow::Result<()> {
    loop {
        print!("> ");
        stdout().flush()?;
        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = run(&line) {
            println!("{}", e);
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let ok = match (args.file, args.expression) {
        (Some(file), _) => run_file(file)?,
        (None, Some(expression)) => match run(&expression) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("{}", e);
                false
            }
        },
        (None, None) => {
            run_prompt()?;
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
