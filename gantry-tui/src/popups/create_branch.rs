use super::{FormEnv, InputDialog, confirm_hint, draw_input_dialog, edit_text, validate_branch_name};
use crate::{keymap::Keymaps, theme::Theme};
use gantry_core::{
    config::{Command, KeyContext},
    input::TextInput,
    model::Repository,
};
use ratatui::{Frame, layout::Rect, text::Line};

pub struct CreateBranchForm {
    repository: Repository,
    input: TextInput,
    error: Option<String>,
}

impl CreateBranchForm {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            input: TextInput::new(),
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
        let name = self.input.text.trim();
        let branches = env
            .state
            .repository_state(self.repository.id)
            .map(|s| &s.branches_state);
        if let Err(message) = validate_branch_name(name, branches) {
            self.error = Some(message);
            return;
        }

        let start_point = branches.and_then(|b| b.current_branch.as_ref());
        env.dispatcher
            .create_branch(&self.repository, name, start_point);
        env.dispatcher.close_popup();
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, keymaps: &Keymaps, theme: &Theme) {
        draw_input_dialog(
            f,
            area,
            InputDialog {
                title: "New branch",
                description: vec![Line::raw(format!(
                    "Create a branch in {} from the current branch.",
                    self.repository.name
                ))],
                input_title: "Name",
                placeholder: "branch name",
                input: &self.input,
                error: self.error.as_deref(),
                hint: confirm_hint(keymaps, KeyContext::TextInput, "create"),
            },
            theme,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_util::render;
    use gantry_core::{
        Intent,
        dispatch::mock::RecordingDispatcher,
        model::{Branch, RepositoryId},
        state::{AppState, BranchesState, RepositoryState},
    };
    use std::path::{Path, PathBuf};

    fn repository() -> Repository {
        Repository {
            id: RepositoryId(1),
            name: "alpha".into(),
            path: PathBuf::from("/tmp/alpha"),
            remote: None,
        }
    }

    fn state() -> AppState {
        let mut state = AppState::default();
        state.repository_states.insert(
            RepositoryId(1),
            RepositoryState {
                branches_state: BranchesState {
                    current_branch: Some(Branch::new("main")),
                    default_branch: Some(Branch::new("main")),
                    all_branches: vec![Branch::new("main"), Branch::new("dev")],
                    recent_branches: Vec::new(),
                },
                ..RepositoryState::default()
            },
        );
        state
    }

    fn type_text(form: &mut CreateBranchForm, text: &str) {
        for c in text.chars() {
            form.insert_char(c);
        }
    }

    #[test]
    fn test_creates_from_current_branch_then_closes() {
        let dispatcher = RecordingDispatcher::default();
        let state = state();
        let env = FormEnv {
            dispatcher: &dispatcher,
            state: &state,
            clone_dir: Path::new("/clones"),
        };
        let mut form = CreateBranchForm::new(repository());
        type_text(&mut form, "feature");
        form.handle_command(Command::Confirm, &env);

        assert_eq!(
            dispatcher.take(),
            vec![
                Intent::CreateBranch {
                    id: RepositoryId(1),
                    name: "feature".into(),
                    start_point: Some("main".into()),
                },
                Intent::ClosePopup,
            ]
        );
    }

    #[test]
    fn test_rejects_existing_and_empty_names() {
        let dispatcher = RecordingDispatcher::default();
        let state = state();
        let env = FormEnv {
            dispatcher: &dispatcher,
            state: &state,
            clone_dir: Path::new("/clones"),
        };
        let mut form = CreateBranchForm::new(repository());
        form.handle_command(Command::Confirm, &env);
        assert_eq!(form.error.as_deref(), Some("Branch name cannot be empty"));

        type_text(&mut form, "dev");
        assert!(form.error.is_none());
        form.handle_command(Command::Confirm, &env);
        assert!(form.error.as_deref().is_some_and(|e| e.contains("already exists")));
        assert!(dispatcher.is_empty());

        let output = render(80, 20, |f| {
            form.draw(f, f.area(), &Keymaps::default(), &Theme::default());
        });
        assert!(output.contains("already exists"));
        assert!(output.contains("New branch"));
    }

    #[test]
    fn test_cancel_closes() {
        let dispatcher = RecordingDispatcher::default();
        let state = AppState::default();
        let env = FormEnv {
            dispatcher: &dispatcher,
            state: &state,
            clone_dir: Path::new("/clones"),
        };
        let mut form = CreateBranchForm::new(repository());
        form.handle_command(Command::Cancel, &env);
        assert_eq!(dispatcher.take(), vec![Intent::ClosePopup]);
    }
}
