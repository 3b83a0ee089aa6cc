//! One form per [`Popup`] variant.
//!
//! Forms keep only local edit state (text, list cursor, validation message). Everything they
//! do to the application goes through the [`Dispatcher`], usually followed by `close_popup`.

mod add_repository;
mod branches;
mod create_branch;
mod delete_branch;
mod discard_changes;
mod publish_repository;
mod rename_branch;

pub use add_repository::AddRepositoryForm;
pub use branches::BranchesForm;
pub use create_branch::CreateBranchForm;
pub use delete_branch::DeleteBranchForm;
pub use discard_changes::{DiscardChangesForm, MAX_FILES_TO_LIST};
pub use publish_repository::PublishRepositoryForm;
pub use rename_branch::RenameBranchForm;

use crate::{
    components::{
        dialog::{Dialog, word_wrapped_line_count},
        dialog_width,
        text_input::{self, TextInputStyle},
    },
    keymap::Keymaps,
    theme::Theme,
};
use gantry_core::{
    Dispatcher,
    config::{Command, KeyContext},
    input::TextInput,
    state::{AppState, BranchesState, Popup},
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Padding, Paragraph, Wrap},
};
use std::path::Path;

/// What a form may touch while handling a command.
pub struct FormEnv<'a> {
    pub dispatcher: &'a dyn Dispatcher,
    pub state: &'a AppState,
    pub clone_dir: &'a Path,
}

pub enum PopupForm {
    CreateBranch(CreateBranchForm),
    ShowBranches(BranchesForm),
    AddRepository(AddRepositoryForm),
    RenameBranch(RenameBranchForm),
    DeleteBranch(DeleteBranchForm),
    PublishRepository(PublishRepositoryForm),
    DiscardChanges(DiscardChangesForm),
}

impl PopupForm {
    pub fn open(popup: &Popup, state: &AppState) -> Self {
        match popup {
            Popup::CreateBranch { repository } => {
                Self::CreateBranch(CreateBranchForm::new(repository.clone()))
            }
            Popup::ShowBranches { repository } => {
                Self::ShowBranches(BranchesForm::new(repository.clone(), state))
            }
            Popup::AddRepository => Self::AddRepository(AddRepositoryForm::new()),
            Popup::RenameBranch { repository, branch } => {
                Self::RenameBranch(RenameBranchForm::new(repository.clone(), branch.clone()))
            }
            Popup::DeleteBranch { repository, branch } => {
                Self::DeleteBranch(DeleteBranchForm::new(repository.clone(), branch.clone()))
            }
            Popup::PublishRepository { repository } => Self::PublishRepository(
                PublishRepositoryForm::new(repository.clone(), state),
            ),
            Popup::DiscardChanges { repository, files } => Self::DiscardChanges(
                DiscardChangesForm::new(repository.clone(), files.clone()),
            ),
        }
    }

    pub fn context(&self) -> KeyContext {
        match self {
            Self::ShowBranches(_) => KeyContext::ListPicker,
            Self::CreateBranch(_)
            | Self::AddRepository(_)
            | Self::RenameBranch(_)
            | Self::PublishRepository(_) => KeyContext::TextInput,
            Self::DeleteBranch(_) | Self::DiscardChanges(_) => KeyContext::Confirm,
        }
    }

    /// Pick up changes from a newer snapshot without losing what the user typed.
    pub fn sync(&mut self, state: &AppState) {
        if let Self::ShowBranches(form) = self {
            form.sync(state);
        }
    }

    pub fn handle_command(&mut self, command: Command, env: &FormEnv<'_>) {
        match self {
            Self::CreateBranch(form) => form.handle_command(command, env),
            Self::ShowBranches(form) => form.handle_command(command, env),
            Self::AddRepository(form) => form.handle_command(command, env),
            Self::RenameBranch(form) => form.handle_command(command, env),
            Self::DeleteBranch(form) => form.handle_command(command, env),
            Self::PublishRepository(form) => form.handle_command(command, env),
            Self::DiscardChanges(form) => form.handle_command(command, env),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        match self {
            Self::CreateBranch(form) => form.insert_char(c),
            Self::ShowBranches(form) => form.insert_char(c),
            Self::AddRepository(form) => form.insert_char(c),
            Self::RenameBranch(form) => form.insert_char(c),
            Self::PublishRepository(form) => form.insert_char(c),
            Self::DeleteBranch(_) | Self::DiscardChanges(_) => {}
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, keymaps: &Keymaps, theme: &Theme) {
        match self {
            Self::CreateBranch(form) => form.draw(f, area, keymaps, theme),
            Self::ShowBranches(form) => form.draw(f, area, keymaps, theme),
            Self::AddRepository(form) => form.draw(f, area, keymaps, theme),
            Self::RenameBranch(form) => form.draw(f, area, keymaps, theme),
            Self::DeleteBranch(form) => form.draw(f, area, keymaps, theme),
            Self::PublishRepository(form) => form.draw(f, area, keymaps, theme),
            Self::DiscardChanges(form) => form.draw(f, area, keymaps, theme),
        }
    }
}

/// Apply a text-edit command. Returns false if `command` is not an edit.
pub(crate) fn edit_text(input: &mut TextInput, command: Command) -> bool {
    match command {
        Command::DeleteBackwardChar => {
            input.backspace();
        }
        Command::DeleteBackwardWord => input.delete_word(),
        Command::DeleteToStart => input.delete_to_start(),
        Command::MoveCursorLeft => input.cursor_left(),
        Command::MoveCursorRight => input.cursor_right(),
        Command::MoveCursorStart => input.cursor_start(),
        Command::MoveCursorEnd => input.cursor_end(),
        _ => return false,
    }
    true
}

/// Check a proposed branch name against the repository's branches.
fn validate_branch_name(name: &str, branches: Option<&BranchesState>) -> Result<(), String> {
    if name.is_empty() {
        return Err("Branch name cannot be empty".to_string());
    }
    if name.chars().any(char::is_whitespace) {
        return Err("Branch names cannot contain spaces".to_string());
    }
    if branches.is_some_and(|b| b.contains(name)) {
        return Err(format!("A branch named \"{name}\" already exists"));
    }
    Ok(())
}

fn confirm_hint(keymaps: &Keymaps, context: KeyContext, verb: &str) -> Line<'static> {
    let confirm_key = keymaps.label(context, Command::Confirm, "enter");
    let cancel_key = keymaps.label(context, Command::Cancel, "esc");
    Line::from(vec![
        Span::raw(format!("{verb} (")),
        Span::styled(confirm_key, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(") / cancel ("),
        Span::styled(cancel_key, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(")"),
    ])
}

struct InputDialog<'a> {
    title: &'a str,
    description: Vec<Line<'a>>,
    input_title: &'a str,
    placeholder: &'a str,
    input: &'a TextInput,
    error: Option<&'a str>,
    hint: Line<'a>,
}

/// Dialog with a description, one text field, a validation line and a key hint.
fn draw_input_dialog(f: &mut Frame, area: Rect, dialog: InputDialog<'_>, theme: &Theme) {
    let padding = Padding::horizontal(1);
    let text_width = dialog_width(area.width)
        .saturating_sub(2 + padding.left + padding.right)
        .max(1);
    let description_rows: u16 = dialog
        .description
        .iter()
        .map(|line| word_wrapped_line_count(line, text_width))
        .sum();

    let inner = Dialog::new(Vec::new())
        .title(dialog.title)
        .border_color(theme.accent)
        .padding(padding)
        .min_height(description_rows + 5)
        .render(f, area);

    let chunks = Layout::vertical([
        Constraint::Length(description_rows),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(inner);

    f.render_widget(
        Paragraph::new(dialog.description).wrap(Wrap { trim: false }),
        chunks[0],
    );
    text_input::draw(
        f,
        chunks[1],
        &TextInputStyle {
            title: dialog.input_title,
            placeholder: dialog.placeholder,
            border_color: theme.secondary,
            muted_color: theme.muted,
        },
        dialog.input,
    );
    if let Some(error) = dialog.error {
        f.render_widget(
            Paragraph::new(Line::styled(error, Style::default().fg(theme.error))),
            chunks[2],
        );
    }
    f.render_widget(
        Paragraph::new(dialog.hint.style(Style::default().fg(theme.muted))),
        chunks[3],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::model::{Branch, FileChange, FileStatus, Repository, RepositoryId};
    use std::path::PathBuf;

    fn repository() -> Repository {
        Repository {
            id: RepositoryId(1),
            name: "alpha".into(),
            path: PathBuf::from("/tmp/alpha"),
            remote: None,
        }
    }

    fn every_popup() -> Vec<Popup> {
        let repository = repository();
        vec![
            Popup::CreateBranch {
                repository: repository.clone(),
            },
            Popup::ShowBranches {
                repository: repository.clone(),
            },
            Popup::AddRepository,
            Popup::RenameBranch {
                repository: repository.clone(),
                branch: Branch::new("feature"),
            },
            Popup::DeleteBranch {
                repository: repository.clone(),
                branch: Branch::new("feature"),
            },
            Popup::PublishRepository {
                repository: repository.clone(),
            },
            Popup::DiscardChanges {
                repository,
                files: vec![FileChange::new("a.txt", FileStatus::Modified)],
            },
        ]
    }

    #[test]
    fn test_every_popup_maps_to_its_own_form() {
        let state = AppState::default();
        let forms: Vec<_> = every_popup()
            .iter()
            .map(|popup| match PopupForm::open(popup, &state) {
                PopupForm::CreateBranch(_) => "create-branch",
                PopupForm::ShowBranches(_) => "show-branches",
                PopupForm::AddRepository(_) => "add-repository",
                PopupForm::RenameBranch(_) => "rename-branch",
                PopupForm::DeleteBranch(_) => "delete-branch",
                PopupForm::PublishRepository(_) => "publish-repository",
                PopupForm::DiscardChanges(_) => "discard-changes",
            })
            .collect();
        let kinds: Vec<_> = every_popup().iter().map(Popup::kind).collect();
        assert_eq!(forms, kinds);
    }

    #[test]
    fn test_form_contexts() {
        let state = AppState::default();
        let contexts: Vec<_> = every_popup()
            .iter()
            .map(|popup| PopupForm::open(popup, &state).context())
            .collect();
        assert_eq!(
            contexts,
            vec![
                KeyContext::TextInput,
                KeyContext::ListPicker,
                KeyContext::TextInput,
                KeyContext::TextInput,
                KeyContext::Confirm,
                KeyContext::TextInput,
                KeyContext::Confirm,
            ]
        );
    }

    #[test]
    fn test_validate_branch_name() {
        let branches = BranchesState {
            all_branches: vec![Branch::new("main")],
            ..BranchesState::default()
        };
        assert!(validate_branch_name("", Some(&branches)).is_err());
        assert!(validate_branch_name("two words", Some(&branches)).is_err());
        assert_eq!(
            validate_branch_name("main", Some(&branches)),
            Err("A branch named \"main\" already exists".to_string())
        );
        assert!(validate_branch_name("feature/login", Some(&branches)).is_ok());
        assert!(validate_branch_name("feature/login", None).is_ok());
    }

    #[test]
    fn test_edit_text_ignores_other_commands() {
        let mut input = TextInput::with_text("abc");
        assert!(edit_text(&mut input, Command::DeleteBackwardChar));
        assert_eq!(input.text, "ab");
        assert!(!edit_text(&mut input, Command::Confirm));
        assert_eq!(input.text, "ab");
    }
}
