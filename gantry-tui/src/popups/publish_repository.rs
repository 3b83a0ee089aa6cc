use super::{FormEnv, InputDialog, confirm_hint, draw_input_dialog, edit_text};
use crate::{keymap::Keymaps, theme::Theme};
use gantry_core::{
    config::{Command, KeyContext},
    git::is_clone_url,
    input::TextInput,
    model::{Repository, User},
    state::AppState,
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};

pub struct PublishRepositoryForm {
    repository: Repository,
    account: Option<User>,
    input: TextInput,
    error: Option<String>,
}

impl PublishRepositoryForm {
    /// Suggests `https://github.com/<login>/<name>.git` for the first signed-in account.
    pub fn new(repository: Repository, state: &AppState) -> Self {
        let account = state.users.first().cloned();
        let input = match &account {
            Some(user) => TextInput::with_text(format!(
                "https://github.com/{}/{}.git",
                user.login, repository.name
            )),
            None => TextInput::new(),
        };
        Self {
            repository,
            account,
            input,
            error: None,
        }
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
            Command::Confirm => {
                let url = self.input.text.trim();
                if !is_clone_url(url) {
                    self.error =
                        Some("Enter a remote URL, e.g. git@github.com:owner/repo.git".to_string());
                    return;
                }
                env.dispatcher.publish_repository(&self.repository, url);
                env.dispatcher.close_popup();
            }
            Command::Cancel => env.dispatcher.close_popup(),
            _ => {}
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, keymaps: &Keymaps, theme: &Theme) {
        let account = match &self.account {
            Some(user) => Line::from(vec![
                Span::raw("Account: "),
                Span::styled(
                    user.login.as_str(),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" ({})", user.endpoint),
                    Style::default().fg(theme.muted),
                ),
            ]),
            None => Line::styled("Not signed in", Style::default().fg(theme.warning)),
        };
        draw_input_dialog(
            f,
            area,
            InputDialog {
                title: "Publish repository",
                description: vec![
                    Line::raw(format!(
                        "Add an origin remote to {} and push the current branch.",
                        self.repository.name
                    )),
                    account,
                ],
                input_title: "Remote URL",
                placeholder: "git@github.com:owner/repo.git",
                input: &self.input,
                error: self.error.as_deref(),
                hint: confirm_hint(keymaps, KeyContext::TextInput, "publish"),
            },
            theme,
        );
    }
}
