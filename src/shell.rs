//! Interactive shell for the virtual filesystem
//!
//! A rustyline REPL over the [`VirtualFs`] operations: command history, a
//! cwd-aware prompt, and tab completion for command names and the entries of
//! the current directory. The shell only consumes the public operation
//! surface; it holds no filesystem state of its own.

use crate::exec;
use crate::vfs::{DirEntry, VirtualFs};
use anyhow::{Context, Result};
use comfy_table::presets::NOTHING;
use comfy_table::Table;
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Editor, Helper, Highlighter, Hinter, Validator};
use std::cell::RefCell;
use std::fmt::Display;
use std::path::PathBuf;
use std::rc::Rc;

const COMMANDS: &[&str] = &[
    "cat", "cd", "exec", "exit", "help", "ls", "mkdir", "pwd", "rm", "touch", "write",
];

const HELP_TEXT: &str = "Supported commands:
  ls [path]               - List directory contents
  cd <path>               - Change directory
  mkdir <dir>             - Create a new directory
  touch <file>            - Create an empty file
  cat <file>              - Display file contents
  write <file> <content>  - Write content to a file (creates it if missing)
  rm <file|dir>           - Remove a file or an empty directory
  exec <file>             - Run a file's content as a host shell script
  pwd                     - Print current working directory
  help                    - Show this help message
  exit                    - Exit the shell";

/// Completes command names on the first token and current-directory entry
/// names on later tokens.
#[derive(Helper, Highlighter, Hinter, Validator)]
struct ShellHelper {
    fs: Rc<RefCell<VirtualFs>>,
}

impl rustyline::completion::Completer for ShellHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let head = &line[..pos];
        if head.trim().is_empty() {
            return Ok((pos, Vec::new()));
        }

        let (start, prefix) = match head.rfind(char::is_whitespace) {
            Some(i) => (i + 1, &head[i + 1..]),
            None => (0, head),
        };

        let candidates = if start == 0 {
            COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(prefix))
                .map(|cmd| cmd.to_string())
                .collect()
        } else {
            match self.fs.borrow().list_dir(".") {
                Ok(entries) => entries
                    .into_iter()
                    .filter(|entry| entry.name.starts_with(prefix))
                    .map(|entry| entry.name)
                    .collect(),
                Err(_) => Vec::new(),
            }
        };

        Ok((start, candidates))
    }
}

enum Outcome {
    Output(String),
    Silent,
    Exit,
}

/// Run the interactive shell until the user exits.
pub fn run(fs: VirtualFs) -> Result<()> {
    println!("In-memory virtual filesystem. Type 'help' for commands.");

    let fs = Rc::new(RefCell::new(fs));
    let mut rl: Editor<ShellHelper, DefaultHistory> =
        Editor::new().context("failed to create line editor")?;
    rl.set_helper(Some(ShellHelper { fs: Rc::clone(&fs) }));

    let history_path = directories::BaseDirs::new()
        .map(|dirs| dirs.data_dir().join("ledgerfs").join("history.txt"));
    if let Some(ref path) = history_path {
        if let Err(e) = rl.load_history(path) {
            let not_found = matches!(&e, ReadlineError::Io(io) if io.kind() == std::io::ErrorKind::NotFound);
            if !not_found {
                tracing::warn!("failed to load history: {e}");
            }
        }
    }

    loop {
        let prompt = format!("vfs:{}> ", fs.borrow().working_dir());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Err(e) = rl.add_history_entry(line) {
                    tracing::warn!("failed to add history entry: {e}");
                }
                match process_line(&fs, line) {
                    Outcome::Output(text) => println!("{text}"),
                    Outcome::Silent => {}
                    Outcome::Exit => break,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {e}");
                break;
            }
        }
    }

    save_history(&mut rl, &history_path);
    Ok(())
}

fn process_line(fs: &Rc<RefCell<VirtualFs>>, line: &str) -> Outcome {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&cmd, args)) = tokens.split_first() else {
        return Outcome::Silent;
    };

    match cmd {
        "help" => Outcome::Output(HELP_TEXT.to_string()),
        "pwd" => Outcome::Output(fs.borrow().working_dir()),
        "exit" => Outcome::Exit,
        "ls" => {
            let path = args.first().copied().unwrap_or(".");
            match fs.borrow().list_dir(path) {
                Ok(entries) if entries.is_empty() => Outcome::Silent,
                Ok(entries) => Outcome::Output(render_listing(entries)),
                Err(e) => error_line(e),
            }
        }
        "cd" => match args {
            [path] => match fs.borrow_mut().change_dir(path) {
                Ok(()) => Outcome::Silent,
                Err(e) => error_line(e),
            },
            _ => Outcome::Output("Usage: cd <path>".to_string()),
        },
        "mkdir" => match args {
            [path] => match fs.borrow_mut().mkdir(path) {
                Ok(()) => Outcome::Silent,
                Err(e) => error_line(e),
            },
            _ => Outcome::Output("Usage: mkdir <directory>".to_string()),
        },
        "touch" => match args {
            [path] => match fs.borrow_mut().create_file(path) {
                Ok(()) => Outcome::Silent,
                Err(e) => error_line(e),
            },
            _ => Outcome::Output("Usage: touch <file>".to_string()),
        },
        "cat" => match args {
            [path] => match fs.borrow().read_file(path) {
                Ok(content) => Outcome::Output(content),
                Err(e) => error_line(e),
            },
            _ => Outcome::Output("Usage: cat <file>".to_string()),
        },
        "write" => match args {
            [path, rest @ ..] if !rest.is_empty() => {
                let content = rest.join(" ");
                match fs.borrow_mut().write_file(path, &content) {
                    Ok(()) => Outcome::Silent,
                    Err(e) => error_line(e),
                }
            }
            _ => Outcome::Output("Usage: write <file> <content>".to_string()),
        },
        "rm" => match args {
            [path] => match fs.borrow_mut().remove(path) {
                Ok(()) => Outcome::Silent,
                Err(e) => error_line(e),
            },
            _ => Outcome::Output("Usage: rm <file|directory>".to_string()),
        },
        "exec" => match args {
            [path] => {
                let content = match fs.borrow().read_file(path) {
                    Ok(content) => content,
                    Err(e) => return error_line(e),
                };
                let name = path.rsplit('/').next().unwrap_or(path);
                match exec::run_script(name, &content) {
                    Ok(status) if status.success() => Outcome::Silent,
                    Ok(status) => Outcome::Output(format!("exit status: {status}")),
                    Err(e) => error_line(e),
                }
            }
            _ => Outcome::Output("Usage: exec <file>".to_string()),
        },
        other => Outcome::Output(format!("Unknown command: {other}")),
    }
}

fn error_line(err: impl Display) -> Outcome {
    Outcome::Output(format!("{} {err}", "Error:".red()))
}

fn render_listing(mut entries: Vec<DirEntry>) -> String {
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(["Type", "Name", "Created", "Modified"]);
    for entry in entries {
        table.add_row([
            if entry.is_dir { "d" } else { "f" }.to_string(),
            entry.name,
            entry.created.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.modified.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    table.to_string()
}

fn save_history(rl: &mut Editor<ShellHelper, DefaultHistory>, path: &Option<PathBuf>) {
    let Some(path) = path else { return };
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("failed to create history directory: {e}");
            return;
        }
    }
    if let Err(e) = rl.save_history(path) {
        tracing::warn!("failed to save history: {e}");
    }
}
