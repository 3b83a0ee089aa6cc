use super::{FormEnv, confirm_hint};
use crate::{components::dialog::Dialog, keymap::Keymaps, theme::Theme};
use gantry_core::{
    config::{Command, KeyContext},
    model::{FileChange, Repository},
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Padding,
};

/// Beyond this many files the dialog stops listing them.
pub const MAX_FILES_TO_LIST: usize = 10;

pub struct DiscardChangesForm {
    repository: Repository,
    files: Vec<FileChange>,
}

impl DiscardChangesForm {
    pub fn new(repository: Repository, files: Vec<FileChange>) -> Self {
        Self { repository, files }
    }

    pub fn handle_command(&mut self, command: Command, env: &FormEnv<'_>) {
        match command {
            Command::Confirm => {
                env.dispatcher
                    .discard_changes(&self.repository, self.files.clone());
                env.dispatcher.close_popup();
            }
            Command::Cancel => env.dispatcher.close_popup(),
            _ => {}
        }
    }

    fn message_lines(&self, theme: &Theme) -> Vec<Line<'_>> {
        if self.files.len() > MAX_FILES_TO_LIST {
            return vec![Line::raw("Are you sure you want to discard all changes?")];
        }
        let mut lines = vec![Line::raw("Are you sure you want to discard all changes to:")];
        lines.extend(self.files.iter().map(|file| {
            Line::from(vec![
                Span::styled(
                    format!("  {} ", file.status.symbol()),
                    Style::default().fg(theme.warning),
                ),
                Span::raw(file.path.display().to_string()),
            ])
        }));
        lines
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, keymaps: &Keymaps, theme: &Theme) {
        let mut lines = self.message_lines(theme);
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "This cannot be undone.",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ));
        lines.push(confirm_hint(keymaps, KeyContext::Confirm, "discard"));

        Dialog::new(lines)
            .title(format!("Discard changes in {}", self.repository.name))
            .border_color(theme.error)
            .padding(Padding::horizontal(1))
            .render(f, area);
    }
}
