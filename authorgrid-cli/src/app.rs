//! Prompt state: a session plus the collaborators the commands reach.

use authorgrid_lib::Session;
use authorgrid_lib::focus::FieldKind;
use authorgrid_lib::submit::SubmitSink;
use authorgrid_lib::suggest::SuggestionRequest;
use authorgrid_lib::suggest::SuggestionSource;

use crate::commands::Command;
use crate::commands::HELP;
use crate::error::CliError;
use crate::render::render;

/// What the prompt loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text and read the next command.
    Continue(String),
    Quit,
}

/// The interactive editor.
pub struct App {
    session: Session,
    source: Option<Box<dyn SuggestionSource>>,
    sink: Box<dyn SubmitSink>,
    record_id: Option<u64>,
    /// Last lookup and its candidates, for `accept`.
    pending: Option<(SuggestionRequest, Vec<String>)>,
}

impl App {
    pub fn new(
        session: Session,
        source: Option<Box<dyn SuggestionSource>>,
        sink: Box<dyn SubmitSink>,
        record_id: Option<u64>,
    ) -> Self {
        Self {
            session,
            source,
            sink,
            record_id,
            pending: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Renders the current page.
    pub fn render(&self) -> String {
        render(&self.session.snapshot(), self.session.focused())
    }

    /// Renders the page followed by any warnings the last action raised.
    fn render_with_warnings(&mut self) -> String {
        let mut out = self.render();
        for warning in self.session.take_warnings() {
            out.push_str(&format!("warning: {warning}\n"));
        }
        out
    }

    fn changed(&mut self, changed: bool, command: &str) -> Result<Outcome, CliError> {
        if !changed {
            return Err(CliError::usage(command, "nothing changed"));
        }
        Ok(Outcome::Continue(self.render_with_warnings()))
    }

    /// Runs one command.
    pub async fn execute(&mut self, command: Command) -> Result<Outcome, CliError> {
        log::debug!("Command: {:?}", command);
        match command {
            Command::Show => Ok(Outcome::Continue(self.render())),
            Command::Json => Ok(Outcome::Continue(format!(
                "{}\n",
                serde_json::to_string_pretty(&self.session.snapshot())?
            ))),
            Command::Help => Ok(Outcome::Continue(format!("{HELP}\n"))),
            Command::Quit => Ok(Outcome::Quit),

            Command::Insert { after } => {
                let inserted = self.session.insert_row_after(after).is_some();
                self.changed(inserted, "insert")
            }
            Command::Cut { row } => {
                let cut = self.session.delete_row(row).is_some();
                self.changed(cut, "cut")
            }
            Command::Copy { row } => {
                if !self.session.copy_row(row) {
                    return Err(CliError::usage("copy", "no such row"));
                }
                Ok(Outcome::Continue(format!("Copied row {}\n", row + 1)))
            }
            Command::Paste { after } => {
                let pasted = self.session.paste_after(after).is_some();
                self.changed(pasted, "paste")
            }
            Command::Author { row, text } => {
                let changed = self.session.set_author_name(row, &text);
                self.changed(changed, "author")
            }
            Command::Affiliations { row, text } => {
                let changed = self.session.set_affiliations_from_text(row, &text);
                self.changed(changed, "affils")
            }
            Command::Check {
                row,
                column,
                checked,
            } => {
                let changed = self.session.toggle_checkbox(row, &column, checked);
                self.changed(changed, if checked { "check" } else { "uncheck" })
            }
            Command::Click {
                row,
                col,
                checked,
                shift,
            } => {
                let count = self.session.click_checkbox(row, col, checked, shift);
                self.changed(count > 0, if shift { "shift" } else { "click" })
            }
            Command::Range { from, to, checked } => {
                let count = self
                    .session
                    .toggle_checkbox_range(from.0, from.1, to.0, to.1, checked);
                self.changed(count > 0, "range")
            }
            Command::Fold { column } => {
                let folded = self.session.fold_column(&column);
                self.changed(folded, "fold")
            }
            Command::Unfold { column } => {
                let unfolded = self.session.unfold_column(&column);
                self.changed(unfolded, "unfold")
            }

            Command::NextPage => {
                let moved = self.session.page_forward();
                self.changed(moved, "next")
            }
            Command::PrevPage => {
                let moved = self.session.page_back();
                self.changed(moved, "prev")
            }
            Command::PageSize { size } => {
                self.session.set_page_size(size);
                Ok(Outcome::Continue(self.render()))
            }

            Command::Focus { row, kind } => {
                if !self.session.focus(row, kind) {
                    return Err(CliError::usage("focus", "no such row"));
                }
                self.pending = None;
                Ok(Outcome::Continue(self.focus_line()))
            }
            Command::Type { text } => {
                if self.session.focused().is_none() {
                    return Err(CliError::usage("type", "no field has focus"));
                }
                if !self.session.commit(&text) {
                    return Ok(Outcome::Continue("No change\n".to_string()));
                }
                Ok(Outcome::Continue(self.render_with_warnings()))
            }
            Command::Blur => {
                self.session.blur();
                self.pending = None;
                Ok(Outcome::Continue(self.render()))
            }
            Command::Move { direction } => {
                if !self.session.move_focus(direction) {
                    return Err(CliError::usage("move", "no row in that direction on this page"));
                }
                Ok(Outcome::Continue(self.focus_line()))
            }

            Command::Suggest { text } => self.suggest(&text).await,
            Command::Accept { choice } => self.accept(choice),

            Command::Warnings => {
                let warnings = self.session.take_warnings();
                if warnings.is_empty() {
                    return Ok(Outcome::Continue("No warnings\n".to_string()));
                }
                let lines: String = warnings.iter().map(|w| format!("warning: {w}\n")).collect();
                Ok(Outcome::Continue(lines))
            }
            Command::Submit => {
                let payload = self
                    .session
                    .submit(self.sink.as_ref(), self.record_id)
                    .await?;
                let mut out = String::new();
                for warning in self.session.take_warnings() {
                    out.push_str(&format!("warning: {warning}\n"));
                }
                out.push_str(&format!("Submitted {} authors\n", payload.authors.len()));
                Ok(Outcome::Continue(out))
            }
        }
    }

    fn focus_line(&self) -> String {
        let Some(field) = self.session.focused() else {
            return "No focus\n".to_string();
        };
        let index = self.session.grid().position(field.row).map_or(0, |i| i + 1);
        let label = match field.kind {
            FieldKind::Author => "author",
            FieldKind::Affiliations => "affiliations",
        };
        format!(
            "Editing {} of row {}: '{}'\n",
            label,
            index,
            self.session.captured_text().unwrap_or_default()
        )
    }

    async fn suggest(&mut self, text: &str) -> Result<Outcome, CliError> {
        let Some(source) = self.source.as_deref() else {
            return Err(CliError::usage("suggest", "no institution list loaded"));
        };
        let Some(request) = self.session.request_suggestions(text) else {
            return Err(CliError::usage(
                "suggest",
                "focus a field and type at least the minimum query length",
            ));
        };
        let candidates = self.session.suggestions(source, &request).await;
        if candidates.is_empty() {
            self.pending = None;
            return Ok(Outcome::Continue("No suggestions\n".to_string()));
        }
        let listing: String = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:>3}. {}\n", i + 1, c))
            .collect();
        self.pending = Some((request, candidates));
        Ok(Outcome::Continue(listing))
    }

    fn accept(&mut self, choice: usize) -> Result<Outcome, CliError> {
        let Some((request, candidates)) = self.pending.take() else {
            return Err(CliError::usage("accept", "no suggestions pending"));
        };
        let Some(value) = candidates.get(choice) else {
            let count = candidates.len();
            self.pending = Some((request, candidates));
            return Err(CliError::usage("accept", format!("choose 1 to {count}")));
        };
        if !self.session.apply_suggestion(&request, value) {
            return Err(CliError::usage("accept", "suggestion is out of date"));
        }
        Ok(Outcome::Continue(self.render_with_warnings()))
    }
}
