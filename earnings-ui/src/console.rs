//! Line-oriented command parser for the terminal front end.

use earnings_core::FormField;
use thiserror::Error;

use crate::runner::Command;

pub const HELP: &str = "\
Form fields (normalized as you type):
  name <first name>     title <job title>     salary <amount>
  hours <work hours>    state <state name>
Commands:
  start | calc          validate the form and start earning
  stop                  stop the counter and record the end time
  clear                 reset the form and the counter
  cancel                dismiss the current notice
  show                  print the form and session
  help                  print this help
  quit                  exit";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),
}

/// Parses one input line.
///
/// A line starting with a field name edits that field with the rest of the
/// line; anything else must be a bare command word (case-insensitive).
pub fn parse_command(line: &str) -> Result<Command, ParseCommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseCommandError::Empty);
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (line, ""),
    };

    if let Some(field) = FormField::parse(head) {
        return Ok(Command::Edit(field, rest.to_string()));
    }
    if !rest.is_empty() {
        return Err(ParseCommandError::Unknown(line.to_string()));
    }

    match head.to_ascii_lowercase().as_str() {
        "start" | "calc" | "calculate" | "submit" => Ok(Command::Submit),
        "stop" => Ok(Command::Stop),
        "clear" | "reset" => Ok(Command::Clear),
        "cancel" | "dismiss" => Ok(Command::Cancel),
        "show" | "status" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(ParseCommandError::Unknown(head.to_string())),
    }
}
