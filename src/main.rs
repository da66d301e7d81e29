use std::env;
use std::fs;
use std::path::PathBuf;

use log::{error, info};

use mal::devtools;
use mal::error::Diagnostic;
use mal::printer;
use mal::reader;
use mal::repl::{ReplConfig, REPL};
use mal::runtime::{run_with_large_stack, Runtime};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq)]
enum ArgCmd {
    Repl(ReplConfig),
    File { path: String, print_ast: bool },
    Eval { expr: String, print_ast: bool },
    Help,
}

fn print_usage() {
    println!("mal v{}\n", VERSION);
    println!("Usage:");
    println!("  mal                       Start the REPL");
    println!("  mal --file <path>         Evaluate every form of a file, print the last value");
    println!("  mal --eval <expr>         Evaluate a single expression and print it");
    println!("  mal --history <path>      REPL history file (default: $TMPDIR/.mal_history)");
    println!("  mal --print-ast           Pretty-print the AST before evaluating");
    println!("  mal -h                    Show this help message");
}

fn parse_args(args: Vec<String>) -> Result<ArgCmd, String> {
    let mut config = ReplConfig::default();
    let mut file_path: Option<String> = None;
    let mut expr: Option<String> = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(ArgCmd::Help),
            "--print-ast" => config.print_ast = true,
            "--file" | "--eval" | "--history" => {
                let flag = args[i].clone();
                let operand = args
                    .get(i + 1)
                    .cloned()
                    .ok_or_else(|| format!("Error: {} requires an argument", flag))?;
                match flag.as_str() {
                    "--file" => file_path = Some(operand),
                    "--eval" => expr = Some(operand),
                    _ => config.history_path = PathBuf::from(operand),
                }
                i += 1;
            }
            arg => return Err(format!("Error: Unknown argument '{}'", arg)),
        }
        i += 1;
    }

    match (file_path, expr) {
        (Some(_), Some(_)) => Err("Error: --file and --eval are exclusive".to_string()),
        (Some(path), None) => Ok(ArgCmd::File { path, print_ast: config.print_ast }),
        (None, Some(expr)) => Ok(ArgCmd::Eval { expr, print_ast: config.print_ast }),
        (None, None) => Ok(ArgCmd::Repl(config)),
    }
}

fn run_source(source: &str, print_ast: bool) -> Result<String, Diagnostic> {
    let forms = reader::read_all(source).map_err(|e| Diagnostic::from_spanned(e, source))?;
    if print_ast {
        for form in &forms {
            println!("{}", devtools::pretty_print_ast(form));
        }
    }
    let value = Runtime::new().eval_all(&forms, source)?;
    Ok(printer::pr_str(&value, true))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let command = match parse_args(env::args().collect()) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("{}\n", e);
            print_usage();
            std::process::exit(1);
        }
    };

    let source = match &command {
        ArgCmd::Help => {
            print_usage();
            return;
        }
        ArgCmd::Repl(config) => {
            info!("starting REPL, history at {}", config.history_path.display());
            let config = config.clone();
            match run_with_large_stack(move || REPL::new(config).run()) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    error!("REPL failed: {}", err);
                    std::process::exit(1);
                }
                Err(err) => {
                    error!("{}", err);
                    std::process::exit(1);
                }
            }
            return;
        }
        ArgCmd::File { path, print_ast } => match fs::read_to_string(path) {
            Ok(text) => (text, *print_ast),
            Err(err) => {
                eprintln!("Error: cannot read {}: {}", path, err);
                std::process::exit(1);
            }
        },
        ArgCmd::Eval { expr, print_ast } => (expr.clone(), *print_ast),
    };

    let (text, print_ast) = source;
    match run_with_large_stack(move || run_source(&text, print_ast)) {
        Ok(Ok(out)) => println!("{}", out),
        Ok(Err(e)) => {
            eprintln!("{}", e.format_error());
            std::process::exit(1);
        }
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    }
}
