//! Command-line interface, REPL and script replay
//!
//! Both the REPL and `--script` files use the same line syntax:
//!
//! ```text
//! press j
//! release right shift
//! tap space
//! # comment
//! ```

use anyhow::{Context, Result};
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::bindings::KeyBindingTable;
use crate::input::{KeyEvent, Transition};
use crate::pad::{ControllerSink, PadSnapshot};
use crate::queue::{EngineQueue, QueueError};
use crate::vkey::Vkey;

/// A parsed REPL or script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Press(String),
    Release(String),
    /// Press then release
    Tap(String),
    /// Print the last committed pad state
    State,
    /// Print the active vkeys
    Held,
    Bindings,
    Help,
    Exit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{0}' needs a key, e.g. '{0} j'")]
    MissingKey(String),
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let key = || {
        if rest.is_empty() {
            Err(CommandError::MissingKey(word.to_string()))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_lowercase().as_str() {
        "press" | "p" => Command::Press(key()?),
        "release" | "r" => Command::Release(key()?),
        "tap" | "t" => Command::Tap(key()?),
        "state" | "s" => Command::State,
        "held" => Command::Held,
        "bindings" => Command::Bindings,
        "help" | "?" => Command::Help,
        "exit" | "quit" | "q" => Command::Exit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

/// Key events produced by a command
pub fn command_events(command: &Command) -> Vec<KeyEvent> {
    match command {
        Command::Press(key) => vec![KeyEvent::new(key.as_str(), Transition::Press)],
        Command::Release(key) => vec![KeyEvent::new(key.as_str(), Transition::Release)],
        Command::Tap(key) => vec![
            KeyEvent::new(key.as_str(), Transition::Press),
            KeyEvent::new(key.as_str(), Transition::Release),
        ],
        _ => Vec::new(),
    }
}

/// Interactive loop feeding the engine queue
pub async fn run_repl<S: ControllerSink + 'static>(
    queue: &EngineQueue<S>,
    pad_rx: &watch::Receiver<PadSnapshot>,
    bindings: &KeyBindingTable,
) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("{}", "=== keypad-gw ===".bold().cyan());
    println!("Type 'help' for commands, 'exit' to quit.\n");

    loop {
        let line = match rl.readline("keypad> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let _ = rl.add_history_entry(line.as_str());

        match parse_command(&line) {
            Ok(Some(Command::Exit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = execute(&command, queue, pad_rx, bindings) {
                    println!("{} {:#}", "error:".red().bold(), e);
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => println!("{} {}", "error:".red().bold(), e),
        }
    }

    Ok(())
}

/// Replay a script file through the engine queue.
///
/// Returns the number of events sent. If the engine stops mid-script the
/// replay ends early without error; [`EngineQueue::shutdown`] reports why.
pub async fn run_script<S: ControllerSink + 'static>(
    path: &Path,
    queue: &EngineQueue<S>,
) -> Result<usize> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read script: {}", path.display()))?;

    let mut sent = 0;
    for (idx, line) in text.lines().enumerate() {
        let command = parse_command(line)
            .with_context(|| format!("{}:{}", path.display(), idx + 1))?;

        match command {
            Some(Command::Exit) => break,
            Some(command @ (Command::Press(_) | Command::Release(_) | Command::Tap(_))) => {
                for event in command_events(&command) {
                    match queue.send(event) {
                        Ok(()) => sent += 1,
                        Err(QueueError::Closed) => {
                            warn!(
                                "{}:{}: engine stopped, skipping the rest of the script",
                                path.display(),
                                idx + 1
                            );
                            return Ok(sent);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
            Some(other) => {
                warn!("{}:{}: '{:?}' has no effect in a script", path.display(), idx + 1, other);
            }
            None => {}
        }
    }

    debug!("Replayed {} events from {}", sent, path.display());
    Ok(sent)
}

fn execute<S: ControllerSink + 'static>(
    command: &Command,
    queue: &EngineQueue<S>,
    pad_rx: &watch::Receiver<PadSnapshot>,
    bindings: &KeyBindingTable,
) -> Result<()> {
    match command {
        Command::Press(_) | Command::Release(_) | Command::Tap(_) => {
            for event in command_events(command) {
                queue.send(event)?;
            }
        }
        Command::State => println!("{}", *pad_rx.borrow()),
        Command::Held => println!("{}", queue.held()),
        Command::Bindings => print_bindings(bindings),
        Command::Help => print_help(),
        Command::Exit => {}
    }
    Ok(())
}

/// Print the binding table grouped by vkey, in catalog order
pub fn print_bindings(bindings: &KeyBindingTable) {
    println!("{}", "=== Key Bindings ===".bold().cyan());

    for vkey in Vkey::ALL {
        let labels = bindings.labels_for(vkey);
        if labels.is_empty() {
            println!("  {:<10} {}", vkey.name().dimmed(), "(unbound)".dimmed());
        } else {
            println!("  {:<10} {}", vkey.name().green(), labels.join("  "));
        }
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  press <key>     press a key (e.g. 'press j', 'press right shift')");
    println!("  release <key>   release a key");
    println!("  tap <key>       press and release");
    println!("  state           last committed pad state");
    println!("  held            active vkeys");
    println!("  bindings        key binding table");
    println!("  exit            quit");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{KeyMapper, MapperError};
    use crate::pad::snapshot::SnapshotSink;
    use crate::tuning::AnalogTuning;

    #[test]
    fn test_parse_key_commands() {
        assert_eq!(
            parse_command("press j").unwrap(),
            Some(Command::Press("j".to_string()))
        );
        assert_eq!(
            parse_command("  release   right shift ").unwrap(),
            Some(Command::Release("right shift".to_string()))
        );
        assert_eq!(
            parse_command("TAP space").unwrap(),
            Some(Command::Tap("space".to_string()))
        );
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(parse_command("state").unwrap(), Some(Command::State));
        assert_eq!(parse_command("held").unwrap(), Some(Command::Held));
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Exit));
        assert_eq!(parse_command("# comment").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_command("press").unwrap_err(),
            CommandError::MissingKey("press".to_string())
        );
        assert_eq!(
            parse_command("jump j").unwrap_err(),
            CommandError::Unknown("jump".to_string())
        );
    }

    #[test]
    fn test_tap_expands_to_press_release() {
        let events = command_events(&Command::Tap("j".to_string()));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].transition, Transition::Press);
        assert_eq!(events[1].transition, Transition::Release);
        assert!(events.iter().all(|e| e.key == "j"));
        assert!(command_events(&Command::State).is_empty());
    }

    #[tokio::test]
    async fn test_script_replays_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moves.txt");
        std::fs::write(&path, "# dash\npress w\ntap space\nstate\nrelease w\n").unwrap();

        let queue = EngineQueue::spawn(KeyMapper::default(), SnapshotSink::new());
        let sent = run_script(&path, &queue).await.unwrap();
        assert_eq!(sent, 4);

        let sink = queue.shutdown().await.unwrap();
        assert_eq!(sink.commit_count(), 4);
        assert!(sink.committed().buttons.is_empty());
    }

    #[tokio::test]
    async fn test_script_stops_quietly_when_engine_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("after_error.txt");
        std::fs::write(&path, "press q\nrelease q\n").unwrap();

        let bindings = KeyBindingTable::parse("j B\nk B\nq StickU\nctrl Mod1\n").unwrap();
        let mapper = KeyMapper::new(bindings, AnalogTuning::default());
        let queue = EngineQueue::spawn(mapper, SnapshotSink::new());

        for key in ["ctrl", "j", "k"] {
            queue.send(KeyEvent::press(key)).unwrap();
        }
        // Wait for the engine task to stop on the swap violation
        queue.sender().closed().await;

        let sent = run_script(&path, &queue).await.unwrap();
        assert_eq!(sent, 0);

        let err = queue.shutdown().await.unwrap_err();
        assert!(matches!(
            err,
            QueueError::Engine(MapperError::SwapInvariantViolation {
                original: Vkey::B,
                existing: Vkey::A,
            })
        ));
    }
}
