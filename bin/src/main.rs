use std::{
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
};

use clap::Parser as _;
use itertools::Itertools;
use parser::{ExpressionTerminator, Parser};
use scanner::Token;

/// Parses Lox source and prints the syntax tree of every statement.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    /// Source file to parse. Starts a prompt when omitted.
    file: Option<PathBuf>,

    /// Also print the token stream.
    #[arg(long)]
    tokens: bool,

    /// Require `;` after expression statements, not just after `print`.
    #[arg(long)]
    require_semicolons: bool,
}

impl Args {
    fn terminator(&self) -> ExpressionTerminator {
        if self.require_semicolons {
            ExpressionTerminator::Required
        } else {
            ExpressionTerminator::Optional
        }
    }
}

fn run_file(path: &Path, args: &Args) -> anyhow::Result<()> {
    run(&std::fs::read_to_string(path)?, args, &mut stdout())
}

fn run_prompt(args: &Args) -> anyhow::Result<()> {
    loop {
        print!("> ");
        stdout().flush()?;
        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            return Ok(());
        }
        if let Err(e) = run(&line, args, &mut stdout()) {
            println!("{}", e);
        }
    }
}

fn dump_tokens(tokens: &[Token], out: &mut impl Write) -> anyhow::Result<()> {
    let dump = tokens
        .iter()
        .map(|t| format!("{}:{} {} '{}'", t.line, t.col, t.kind, t.lexeme))
        .join("\n");
    writeln!(out, "{}", dump)?;
    Ok(())
}

fn run(source: &str, args: &Args, out: &mut impl Write) -> anyhow::Result<()> {
    let tokens = scanner::scan(source)?;
    if args.tokens {
        dump_tokens(&tokens, out)?;
    }

    let stmts = Parser::with_terminator(&tokens, args.terminator())?.parse()?;
    log::info!("parsed {} statements", stmts.len());

    for stmt in stmts {
        writeln!(out, "{}", stmt)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match &args.file {
        Some(file) => run_file(file, &args),
        None => run_prompt(&args),
    }
}
