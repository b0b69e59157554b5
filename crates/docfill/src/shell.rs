//! Line-oriented front end driving an [`App`].

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use docfill_core::FieldValues;

use crate::app::{App, FillOutcome, FILL_COMPLETED, NO_TEMPLATE_SELECTED};

const HELP: &str = "\
Commands:
  open <path>         add a template to the session and select it
  list                show templates picked so far
  select <n>          select template number n
  fields              show the form of the selected template
  set <tag> <value>   enter a value for a field
                      (quote tags holding spaces: set \"First Name\" Ann)
  fill                write a filled copy of the selected template
  help                show this text
  quit                leave (the session snapshot is written now)";

const SET_USAGE: &str = "usage: set <tag> <value>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Open(PathBuf),
    List,
    Select(usize),
    Fields,
    /// Raw arguments; the tag is split off against the current form.
    Set(String),
    Fill,
    Help,
    Quit,
    Empty,
}

/// Parse one input line.
pub fn parse_command(line: &str) -> std::result::Result<ShellCommand, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    match word {
        "" => Ok(ShellCommand::Empty),
        "open" => {
            let path = rest.trim();
            if path.is_empty() {
                return Err("usage: open <path>".to_string());
            }
            Ok(ShellCommand::Open(PathBuf::from(path)))
        }
        "list" => Ok(ShellCommand::List),
        "select" => rest
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(ShellCommand::Select)
            .ok_or_else(|| "usage: select <n>, n starting at 1".to_string()),
        "fields" => Ok(ShellCommand::Fields),
        "set" => {
            if rest.trim().is_empty() {
                return Err(SET_USAGE.to_string());
            }
            Ok(ShellCommand::Set(rest.to_string()))
        }
        "fill" => Ok(ShellCommand::Fill),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

/// Split `set` arguments into a tag and its value.
///
/// A quoted tag is taken as written. Otherwise the longest tag of `form`
/// that starts `args` and ends at whitespace or end of line wins, so
/// multi-word tags work unquoted; with no such tag the first word is
/// used. One separating whitespace character is dropped, the rest of the
/// line is the value, verbatim.
pub fn split_assignment<'a>(args: &'a str, form: &FieldValues) -> Option<(&'a str, &'a str)> {
    let args = args.trim_start();
    if let Some(quoted) = args.strip_prefix('"') {
        let (tag, rest) = quoted.split_once('"')?;
        return (!tag.is_empty()).then(|| (tag, skip_separator(rest)));
    }

    let known = form
        .tags()
        .filter(|tag| {
            !tag.is_empty()
                && args
                    .strip_prefix(*tag)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        })
        .map(str::len)
        .max();
    let tag_len = match known {
        Some(len) => len,
        None => args.find(char::is_whitespace).unwrap_or(args.len()),
    };
    if tag_len == 0 {
        return None;
    }
    Some((&args[..tag_len], skip_separator(&args[tag_len..])))
}

fn skip_separator(rest: &str) -> &str {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str(),
        _ => rest,
    }
}

pub struct Shell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read commands until `quit` or end of input.
    ///
    /// Errors from individual commands are printed and the loop goes on;
    /// only I/O failures on the shell streams end it early.
    pub fn run(&mut self, app: &mut App) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(());
            }

            match parse_command(&line) {
                Ok(ShellCommand::Quit) => return Ok(()),
                Ok(command) => {
                    debug!("Shell command {:?}", command);
                    if let Err(e) = self.dispatch(app, command) {
                        writeln!(self.output, "error: {:#}", e)?;
                    }
                }
                Err(usage) => writeln!(self.output, "{}", usage)?,
            }
        }
    }

    fn dispatch(&mut self, app: &mut App, command: ShellCommand) -> Result<()> {
        match command {
            ShellCommand::Open(path) => {
                app.select_file(&path)?;
                self.print_form(app)?;
            }
            ShellCommand::List => {
                if app.session().is_empty() {
                    writeln!(self.output, "no documents yet, use 'open <path>'")?;
                }
                for (i, record) in app.session().documents().iter().enumerate() {
                    let marker = if app.selected_index() == Some(i) { '*' } else { ' ' };
                    writeln!(
                        self.output,
                        "{}{:>3}. {}  ({})",
                        marker,
                        i + 1,
                        record.name,
                        record.template_path
                    )?;
                }
            }
            ShellCommand::Select(n) => {
                app.select_document(n - 1)?;
                self.print_form(app)?;
            }
            ShellCommand::Fields => self.print_form(app)?,
            ShellCommand::Set(args) => match split_assignment(&args, app.form()) {
                Some((tag, value)) => {
                    let (tag, value) = (tag.to_string(), value.to_string());
                    if !app.set_field(&tag, &value) {
                        writeln!(self.output, "no field '{}' in the current form", tag)?;
                    }
                }
                None => writeln!(self.output, "{}", SET_USAGE)?,
            },
            ShellCommand::Fill => match app.fill(None)? {
                FillOutcome::NoTemplateSelected => writeln!(self.output, "{}", NO_TEMPLATE_SELECTED)?,
                FillOutcome::Filled { output, report } => {
                    writeln!(self.output, "wrote {}", output.display())?;
                    if !report.skipped.is_empty() {
                        writeln!(self.output, "skipped: {}", report.skipped.join(", "))?;
                    }
                    writeln!(self.output, "{}", FILL_COMPLETED)?;
                }
            },
            ShellCommand::Help => writeln!(self.output, "{}", HELP)?,
            ShellCommand::Quit | ShellCommand::Empty => {}
        }
        Ok(())
    }

    fn print_form(&mut self, app: &App) -> Result<()> {
        let Some(record) = app.selected() else {
            writeln!(self.output, "{}", NO_TEMPLATE_SELECTED)?;
            return Ok(());
        };
        if app.form().is_empty() {
            writeln!(self.output, "{}: no fields", record.name)?;
            return Ok(());
        }
        writeln!(self.output, "{}:", record.name)?;
        for (tag, value) in app.form().iter() {
            writeln!(self.output, "  {} = {}", tag, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_command("list\n"), Ok(ShellCommand::List));
        assert_eq!(parse_command("  fill  "), Ok(ShellCommand::Fill));
        assert_eq!(parse_command(""), Ok(ShellCommand::Empty));
        assert_eq!(parse_command("exit"), Ok(ShellCommand::Quit));
        assert_eq!(parse_command("select 2"), Ok(ShellCommand::Select(2)));
        assert!(parse_command("select 0").is_err());
        assert!(parse_command("select x").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_parse_open_keeps_spaces_in_path() {
        assert_eq!(
            parse_command("open /home/me/My Templates/letter.docx\n"),
            Ok(ShellCommand::Open(PathBuf::from("/home/me/My Templates/letter.docx")))
        );
        assert!(parse_command("open   ").is_err());
    }

    #[test]
    fn test_parse_set_keeps_arguments() {
        assert_eq!(
            parse_command("set Address  Main St 1 \r\n"),
            Ok(ShellCommand::Set("Address  Main St 1 ".to_string()))
        );
        assert!(parse_command("set").is_err());
        assert!(parse_command("set   ").is_err());
    }

    #[test]
    fn test_split_assignment_value_verbatim() {
        let form = FieldValues::new();
        assert_eq!(
            split_assignment("Address  Main St 1 ", &form),
            Some(("Address", " Main St 1 "))
        );
        assert_eq!(split_assignment("Name", &form), Some(("Name", "")));
    }

    #[test]
    fn test_split_assignment_multi_word_tags() {
        let form = FieldValues::from_fields(["First", "First Name", "Last Name"]);
        assert_eq!(
            split_assignment("First Name Alice", &form),
            Some(("First Name", "Alice"))
        );
        assert_eq!(split_assignment("First Alice", &form), Some(("First", "Alice")));
        assert_eq!(split_assignment("Last Name", &form), Some(("Last Name", "")));
        // a known tag must end at a word boundary
        assert_eq!(split_assignment("Firstly x", &form), Some(("Firstly", "x")));
    }

    #[test]
    fn test_split_assignment_quoted_tag() {
        let form = FieldValues::new();
        assert_eq!(
            split_assignment(r#""First Name" Alice Smith"#, &form),
            Some(("First Name", "Alice Smith"))
        );
        assert_eq!(split_assignment(r#""Note""#, &form), Some(("Note", "")));
        assert_eq!(split_assignment(r#""unterminated x"#, &form), None);
        assert_eq!(split_assignment(r#""" x"#, &form), None);
    }
}
