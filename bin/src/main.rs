use std::{
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;

use diagnostics::Diagnostics;

// Exit codes from sysexits.h
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;

#[derive(clap::Parser)]
#[command(name = "lox", override_usage = "lox [script]")]
struct Args {
    /// Script to run. Starts an interactive prompt if omitted.
    scripts: Vec<PathBuf>,

    /// Print the scanned tokens before the parsed expression
    #[arg(long)]
    tokens: bool,
}

fn run_file(path: &Path, args: &Args) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(path)?;
    let mut diagnostics = Diagnostics::stderr();

    lox::run(&source, &mut diagnostics, args.tokens, &mut stdout())?;

    if diagnostics.has_error() {
        Ok(ExitCode::from(EX_DATAERR))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_prompt(args: &Args) -> anyhow::Result<ExitCode> {
    let mut diagnostics = Diagnostics::stderr();
    loop {
        print!("> ");
        stdout().flush()?;

        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            return Ok(ExitCode::SUCCESS);
        }

        let line = line.trim_end_matches(['\n', '\r']);
        lox::run(line, &mut diagnostics, args.tokens, &mut stdout())?;
        diagnostics.reset();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    match args.scripts.as_slice() {
        [] => run_prompt(&args),
        [script] => run_file(script, &args),
        _ => {
            println!("Usage: lox [script]");
            Ok(ExitCode::from(EX_USAGE))
        }
    }
}
