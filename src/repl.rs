use std::path::PathBuf;

use colored::Colorize;
use log::{debug, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::devtools;
use crate::error::Diagnostic;
use crate::printer;
use crate::reader;
use crate::runtime::Runtime;

const HISTORY_FILE: &str = ".mal_history";

#[derive(Debug, Clone, PartialEq)]
pub struct ReplConfig {
    pub prompt: String,
    pub history_path: PathBuf,
    pub print_ast: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "user> ".to_string(),
            history_path: std::env::temp_dir().join(HISTORY_FILE),
            print_ast: false,
        }
    }
}

pub struct REPL {
    pub config: ReplConfig,
    runtime: Runtime,
}

impl REPL {
    pub fn new(config: ReplConfig) -> Self {
        REPL { config, runtime: Runtime::new() }
    }

    /// Reads, evaluates and prints one line of input.
    pub fn rep(&self, input: &str) -> Result<String, Diagnostic> {
        let ast = reader::read(input).map_err(|e| Diagnostic::from_spanned(e, input))?;
        if self.config.print_ast {
            println!("{}", devtools::pretty_print_ast(&ast));
        }
        let value = self.runtime.eval(&ast, input)?;
        Ok(printer::pr_str(&value, true))
    }

    pub fn run(&self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;
        if let Err(err) = rl.load_history(&self.config.history_path) {
            debug!("no history loaded from {}: {}", self.config.history_path.display(), err);
        }

        'repl_loop: loop {
            match rl.readline(&self.config.prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue 'repl_loop;
                    }
                    if let Err(err) = rl.add_history_entry(line.as_str()) {
                        warn!("error adding to history: {}", err);
                    }

                    match self.rep(&line) {
                        Ok(out) => println!("{}", out),
                        Err(e) => println!("{}", e.format_error().red()),
                    }
                }
                Err(ReadlineError::Interrupted) => continue 'repl_loop,
                Err(ReadlineError::Eof) => break 'repl_loop,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break 'repl_loop;
                }
            }
        }

        if let Err(err) = rl.save_history(&self.config.history_path) {
            warn!("error saving history to {}: {}", self.config.history_path.display(), err);
        }
        Ok(())
    }
}
