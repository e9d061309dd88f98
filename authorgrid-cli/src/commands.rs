//! Line commands typed at the prompt.
//!
//! Row and column numbers are 1-based, as rendered. A position of `0`
//! means "at the head" for insert and paste.

use std::str::FromStr;

use authorgrid_lib::focus::Direction;
use authorgrid_lib::focus::FieldKind;

use crate::error::CliError;

/// One parsed prompt command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Json,
    Help,
    Quit,
    Insert { after: Option<usize> },
    Cut { row: usize },
    Copy { row: usize },
    Paste { after: Option<usize> },
    Author { row: usize, text: String },
    Affiliations { row: usize, text: String },
    Check { row: usize, column: String, checked: bool },
    Click { row: usize, col: usize, checked: bool, shift: bool },
    Range { from: (usize, usize), to: (usize, usize), checked: bool },
    Fold { column: String },
    Unfold { column: String },
    NextPage,
    PrevPage,
    PageSize { size: usize },
    Focus { row: usize, kind: FieldKind },
    Type { text: String },
    Blur,
    Move { direction: Direction },
    Suggest { text: String },
    Accept { choice: usize },
    Warnings,
    Submit,
}

/// Help text listing every command.
pub const HELP: &str = "\
show | json                      render the page / dump it as JSON
insert N | paste N               add a row after row N (0 = head)
cut N | copy N                   move / copy row N to the buffer
author N TEXT                    set row N's author
affils N TEXT                    set row N's affiliations (`;`-separated, numbers = columns)
check N NAME | uncheck N NAME    set one affiliation checkbox
click N C on|off                 click column C on row N
shift N C                        shift-click column C on row N
range N1 C1 N2 C2 on|off         set a block of checkboxes
fold NAME | unfold NAME          hide / show a column
next | prev | pagesize N         pagination
focus N author|affils            focus a text field
type TEXT | blur | up | down     edit the focused field
suggest TEXT | accept K          look up completions / take one
warnings | submit | quit";

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match name {
            "show" | "" => Self::Show,
            "json" => Self::Json,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "insert" => Self::Insert {
                after: position(name, &args)?,
            },
            "paste" => Self::Paste {
                after: position(name, &args)?,
            },
            "cut" => Self::Cut {
                row: row(name, args.first())?,
            },
            "copy" => Self::Copy {
                row: row(name, args.first())?,
            },
            "author" => {
                let (row, text) = row_and_text(name, rest)?;
                Self::Author { row, text }
            }
            "affils" => {
                let (row, text) = row_and_text(name, rest)?;
                Self::Affiliations { row, text }
            }
            "check" | "uncheck" => {
                let (row, column) = row_and_text(name, rest)?;
                if column.is_empty() {
                    return Err(CliError::usage(name, "expected a column name"));
                }
                Self::Check {
                    row,
                    column,
                    checked: name == "check",
                }
            }
            "click" => Self::Click {
                row: row(name, args.first())?,
                col: row(name, args.get(1))?,
                checked: switch(name, args.get(2))?,
                shift: false,
            },
            "shift" => Self::Click {
                row: row(name, args.first())?,
                col: row(name, args.get(1))?,
                checked: true,
                shift: true,
            },
            "range" => Self::Range {
                from: (row(name, args.first())?, row(name, args.get(1))?),
                to: (row(name, args.get(2))?, row(name, args.get(3))?),
                checked: switch(name, args.get(4))?,
            },
            "fold" | "unfold" => {
                if rest.is_empty() {
                    return Err(CliError::usage(name, "expected a column name"));
                }
                let column = rest.to_string();
                if name == "fold" {
                    Self::Fold { column }
                } else {
                    Self::Unfold { column }
                }
            }
            "next" => Self::NextPage,
            "prev" => Self::PrevPage,
            "pagesize" => Self::PageSize {
                size: number(name, args.first())?,
            },
            "focus" => Self::Focus {
                row: row(name, args.first())?,
                kind: match args.get(1).copied() {
                    Some("author") => FieldKind::Author,
                    Some("affils") | Some("affiliations") => FieldKind::Affiliations,
                    _ => return Err(CliError::usage(name, "expected 'author' or 'affils'")),
                },
            },
            "type" => Self::Type {
                text: rest.to_string(),
            },
            "blur" => Self::Blur,
            "up" => Self::Move {
                direction: Direction::Up,
            },
            "down" => Self::Move {
                direction: Direction::Down,
            },
            "suggest" => Self::Suggest {
                text: rest.to_string(),
            },
            "accept" => Self::Accept {
                choice: row(name, args.first())?,
            },
            "warnings" => Self::Warnings,
            "submit" => Self::Submit,
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

fn number(command: &str, arg: Option<&&str>) -> Result<usize, CliError> {
    let arg = arg.ok_or_else(|| CliError::usage(command, "missing number"))?;
    arg.parse()
        .map_err(|_| CliError::usage(command, format!("'{arg}' is not a number")))
}

/// A 1-based number converted to a 0-based index.
fn row(command: &str, arg: Option<&&str>) -> Result<usize, CliError> {
    match number(command, arg)? {
        0 => Err(CliError::usage(command, "numbers start at 1")),
        n => Ok(n - 1),
    }
}

/// `0` or nothing means the head; `N` means after row N.
fn position(command: &str, args: &[&str]) -> Result<Option<usize>, CliError> {
    if args.is_empty() {
        return Ok(None);
    }
    Ok(number(command, args.first())?.checked_sub(1))
}

fn switch(command: &str, arg: Option<&&str>) -> Result<bool, CliError> {
    match arg.copied() {
        Some("on") | None => Ok(true),
        Some("off") => Ok(false),
        Some(other) => Err(CliError::usage(
            command,
            format!("expected 'on' or 'off', got '{other}'"),
        )),
    }
}

fn row_and_text(command: &str, rest: &str) -> Result<(usize, String), CliError> {
    let (first, text) = match rest.split_once(char::is_whitespace) {
        Some((first, text)) => (first, text.trim()),
        None => (rest, ""),
    };
    let row = row(command, Some(&first))?;
    Ok((row, text.to_string()))
}
