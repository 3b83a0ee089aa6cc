use super::{FormEnv, confirm_hint};
use crate::{components::dialog::Dialog, keymap::Keymaps, theme::Theme};
use gantry_core::{
    config::{Command, KeyContext},
    model::{Branch, Repository},
};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Padding,
};

pub struct DeleteBranchForm {
    repository: Repository,
    branch: Branch,
}

impl DeleteBranchForm {
    pub fn new(repository: Repository, branch: Branch) -> Self {
        Self { repository, branch }
    }

    pub fn handle_command(&mut self, command: Command, env: &FormEnv<'_>) {
        match command {
            Command::Confirm => {
                env.dispatcher.delete_branch(&self.repository, &self.branch);
                env.dispatcher.close_popup();
            }
            Command::Cancel => env.dispatcher.close_popup(),
            _ => {}
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, keymaps: &Keymaps, theme: &Theme) {
        let mut lines = vec![Line::from(vec![
            Span::raw("Delete branch "),
            Span::styled(
                format!("\"{}\"", self.branch.name),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" from {}?", self.repository.name)),
        ])];
        if let Some(upstream) = &self.branch.upstream {
            lines.push(Line::styled(
                format!("The remote branch {upstream} is kept."),
                Style::default().fg(theme.muted),
            ));
        }
        lines.push(Line::raw(""));
        lines.push(confirm_hint(keymaps, KeyContext::Confirm, "delete"));

        Dialog::new(lines)
            .title("Delete branch")
            .border_color(theme.error)
            .padding(Padding::horizontal(1))
            .alignment(Alignment::Center)
            .render(f, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_util::render;
    use gantry_core::{
        Intent, dispatch::mock::RecordingDispatcher, model::RepositoryId, state::AppState,
    };
    use std::path::{Path, PathBuf};

    fn form() -> DeleteBranchForm {
        let mut branch = Branch::new("feature");
        branch.upstream = Some("origin/feature".into());
        DeleteBranchForm::new(
            Repository {
                id: RepositoryId(2),
                name: "alpha".into(),
                path: PathBuf::from("/tmp/alpha"),
                remote: None,
            },
            branch,
        )
    }

    #[test]
    fn test_confirm_deletes_then_closes() {
        let dispatcher = RecordingDispatcher::default();
        let state = AppState::default();
        let env = FormEnv {
            dispatcher: &dispatcher,
            state: &state,
            clone_dir: Path::new("/clones"),
        };
        let mut form = form();
        form.handle_command(Command::MoveDown, &env);
        assert!(dispatcher.is_empty());
        form.handle_command(Command::Confirm, &env);
        assert_eq!(
            dispatcher.take(),
            vec![
                Intent::DeleteBranch {
                    id: RepositoryId(2),
                    branch: "feature".into(),
                },
                Intent::ClosePopup,
            ]
        );
    }

    #[test]
    fn test_draw_mentions_branch_and_upstream() {
        let form = form();
        let output = render(80, 12, |f| {
            form.draw(f, f.area(), &Keymaps::default(), &Theme::default());
        });
        assert!(output.contains("\"feature\""));
        assert!(output.contains("origin/feature"));
        assert!(output.contains("delete (enter)"));
    }
}
