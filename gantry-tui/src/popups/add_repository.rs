use super::{FormEnv, InputDialog, confirm_hint, draw_input_dialog, edit_text};
use crate::{components::path_input, keymap::Keymaps, theme::Theme};
use gantry_core::{
    config::{Command, KeyContext},
    git::{is_clone_url, repository_name_from_url},
    input::TextInput,
    paths::expand_tilde,
};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
};

/// Adds a local directory, or clones when the input looks like a URL.
#[derive(Default)]
pub struct AddRepositoryForm {
    input: TextInput,
    error: Option<String>,
}

impl AddRepositoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert_char(c);
        self.error = None;
    }

    pub fn handle_command(&mut self, command: Command, env: &FormEnv<'_>) {
        if edit_text(&mut self.input, command) {
            self.error = None;
            return;
        }
        match command {
            Command::Complete => {
                if !is_clone_url(&self.input.text)
                    && let Some(completed) = path_input::complete_input(&self.input.text)
                {
                    self.input.set_text(completed);
                }
            }
            Command::Confirm => self.submit(env),
            Command::Cancel => env.dispatcher.close_popup(),
            _ => {}
        }
    }

    fn submit(&mut self, env: &FormEnv<'_>) {
        let text = self.input.text.trim();
        if text.is_empty() {
            self.error = Some("Enter a directory or a URL to clone".to_string());
            return;
        }

        if is_clone_url(text) {
            let Some(name) = repository_name_from_url(text) else {
                self.error = Some(format!("Cannot tell the repository name from {text}"));
                return;
            };
            let destination = env.clone_dir.join(&name);
            if destination.exists() {
                self.error = Some(format!("{} already exists", destination.display()));
                return;
            }
            env.dispatcher.clone_repository(text, destination);
        } else {
            let path = expand_tilde(text);
            if !path.is_dir() {
                self.error = Some(format!("{} is not a directory", path.display()));
                return;
            }
            env.dispatcher.add_repositories(vec![path]);
        }
        env.dispatcher.close_popup();
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, keymaps: &Keymaps, theme: &Theme) {
        let complete_key = keymaps.label(KeyContext::TextInput, Command::Complete, "tab");
        draw_input_dialog(
            f,
            area,
            InputDialog {
                title: "Add repository",
                description: vec![
                    Line::raw("A local directory, or a URL to clone."),
                    Line::from(vec![
                        Span::styled(complete_key, Style::default().fg(theme.accent)),
                        Span::styled(" completes paths", Style::default().fg(theme.muted)),
                    ]),
                ],
                input_title: "Path or URL",
                placeholder: "~/src/project or https://github.com/owner/repo.git",
                input: &self.input,
                error: self.error.as_deref(),
                hint: confirm_hint(keymaps, KeyContext::TextInput, "add"),
            },
            theme,
        );
    }
}
