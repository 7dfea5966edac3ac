// https://www.sigbus.info/compilerbook

use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{ArgAction, Parser as _};
use clap_stdin::MaybeStdin;
use stackcc::{codegen, lexer, parser};
use tracing::{info, Level};

/// Compile a tiny expression language to x86-64 assembly.
#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Program source, or "-" to read it from stdin
    input: MaybeStdin<String>,

    /// Write assembly to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the token stream to stderr
    #[arg(long)]
    dump_tokens: bool,

    /// Print the parsed program to stderr
    #[arg(long)]
    dump_ast: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let input = cli.input.to_string();

    let tokens = lexer::tokenize(&input)?;
    if cli.dump_tokens {
        let token_kinds = tokens.iter().map(|t| &t.kind).collect::<Vec<_>>();
        eprintln!("{:#?}", token_kinds);
    }

    let program = parser::parse(tokens, &input)?;
    if cli.dump_ast {
        eprintln!("{:#?}", program);
    }

    let asm = codegen::generate(&program, &input)?;
    match cli.output {
        Some(path) => {
            fs::write(&path, asm).with_context(|| format!("writing {:?}", path))?;
            info!(path = %path.display(), "wrote assembly");
        }
        None => print!("{}", asm),
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
