use super::{FormEnv, InputDialog, confirm_hint, draw_input_dialog, edit_text, validate_branch_name};
use crate::{keymap::Keymaps, theme::Theme};
use gantry_core::{
    config::{Command, KeyContext},
    input::TextInput,
    model::{Branch, Repository},
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Renames the branch captured when the popup opened, whatever is checked out now.
pub struct RenameBranchForm {
    repository: Repository,
    branch: Branch,
    input: TextInput,
    error: Option<String>,
}

impl RenameBranchForm {
    pub fn new(repository: Repository, branch: Branch) -> Self {
        let input = TextInput::with_text(branch.name.clone());
        Self {
            repository,
            branch,
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
            Command::Confirm => self.submit(env),
            Command::Cancel => env.dispatcher.close_popup(),
            _ => {}
        }
    }

    fn submit(&mut self, env: &FormEnv<'_>) {
        let new_name = self.input.text.trim();
        if new_name == self.branch.name {
            self.error = Some("Enter a different name".to_string());
            return;
        }
        let branches = env
            .state
            .repository_state(self.repository.id)
            .map(|s| &s.branches_state);
        if let Err(message) = validate_branch_name(new_name, branches) {
            self.error = Some(message);
            return;
        }

        env.dispatcher
            .rename_branch(&self.repository, &self.branch, new_name);
        env.dispatcher.close_popup();
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, keymaps: &Keymaps, theme: &Theme) {
        draw_input_dialog(
            f,
            area,
            InputDialog {
                title: "Rename branch",
                description: vec![Line::from(vec![
                    Span::raw("Rename "),
                    Span::styled(
                        format!("\"{}\"", self.branch.name),
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" to:"),
                ])],
                input_title: "New name",
                placeholder: "branch name",
                input: &self.input,
                error: self.error.as_deref(),
                hint: confirm_hint(keymaps, KeyContext::TextInput, "rename"),
            },
            theme,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::{
        Intent,
        dispatch::mock::RecordingDispatcher,
        model::RepositoryId,
        state::AppState,
    };
    use std::path::{Path, PathBuf};

    fn form() -> RenameBranchForm {
        RenameBranchForm::new(
            Repository {
                id: RepositoryId(3),
                name: "alpha".into(),
                path: PathBuf::from("/tmp/alpha"),
                remote: None,
            },
            Branch::new("feature"),
        )
    }

    #[test]
    fn test_prefilled_and_rejects_unchanged_name() {
        let dispatcher = RecordingDispatcher::default();
        let state = AppState::default();
        let env = FormEnv {
            dispatcher: &dispatcher,
            state: &state,
            clone_dir: Path::new("/clones"),
        };
        let mut form = form();
        assert_eq!(form.input.text, "feature");

        form.handle_command(Command::Confirm, &env);
        assert_eq!(form.error.as_deref(), Some("Enter a different name"));

        form.handle_command(Command::DeleteToStart, &env);
        form.handle_command(Command::Confirm, &env);
        assert_eq!(form.error.as_deref(), Some("Branch name cannot be empty"));
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_renames_captured_branch() {
        let dispatcher = RecordingDispatcher::default();
        let state = AppState::default();
        let env = FormEnv {
            dispatcher: &dispatcher,
            state: &state,
            clone_dir: Path::new("/clones"),
        };
        let mut form = form();
        for c in "-two".chars() {
            form.insert_char(c);
        }
        form.handle_command(Command::Confirm, &env);
        assert_eq!(
            dispatcher.take(),
            vec![
                Intent::RenameBranch {
                    id: RepositoryId(3),
                    branch: "feature".into(),
                    new_name: "feature-two".into(),
                },
                Intent::ClosePopup,
            ]
        );
    }
}
