use gantry_core::{
    model::{AppError, CloningRepository, Repository, RepositoryId, RepositoryListItem},
    state::{AppState, CloneProgress, Popup, RepositoryState, SelectionState},
};

/// What the screen shows for a snapshot, before any drawing.
#[derive(Debug)]
pub enum Screen<'a> {
    /// Nobody is signed in; nothing else is shown.
    NotLoggedIn,
    App(AppView<'a>),
}

#[derive(Debug)]
pub struct AppView<'a> {
    pub sidebar: SidebarModel<'a>,
    pub main: MainView<'a>,
    pub popup: Option<&'a Popup>,
    /// `Some` only when there is at least one error
    pub errors: Option<&'a [AppError]>,
}

#[derive(Debug)]
pub struct SidebarModel<'a> {
    pub repositories: &'a [RepositoryListItem],
    pub selected_id: Option<RepositoryId>,
    pub loading: bool,
}

#[derive(Debug)]
pub enum MainView<'a> {
    NoRepositorySelected,
    Repository {
        repository: &'a Repository,
        state: &'a RepositoryState,
    },
    Cloning {
        repository: &'a CloningRepository,
        progress: &'a CloneProgress,
    },
}

pub fn compose(state: &AppState) -> Screen<'_> {
    if !state.is_logged_in() {
        return Screen::NotLoggedIn;
    }

    let main = match &state.selected_state {
        SelectionState::None => MainView::NoRepositorySelected,
        SelectionState::Repository { repository, state } => {
            MainView::Repository { repository, state }
        }
        SelectionState::Cloning {
            repository,
            progress,
        } => MainView::Cloning {
            repository,
            progress,
        },
    };

    Screen::App(AppView {
        sidebar: SidebarModel {
            repositories: &state.repositories,
            selected_id: state.selected_state.selected_id(),
            loading: state.loading,
        },
        main,
        popup: state.current_popup.as_ref(),
        errors: (!state.errors.is_empty()).then_some(state.errors.as_slice()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::model::{Branch, User};
    use std::path::PathBuf;

    fn repository(id: u64) -> Repository {
        Repository {
            id: RepositoryId(id),
            name: format!("repo{id}"),
            path: PathBuf::from(format!("/tmp/repo{id}")),
            remote: None,
        }
    }

    fn busy_state() -> AppState {
        let repository = repository(1);
        AppState {
            repositories: vec![RepositoryListItem::Repository(repository.clone())],
            selected_state: SelectionState::Repository {
                repository: repository.clone(),
                state: RepositoryState::default(),
            },
            current_popup: Some(Popup::RenameBranch {
                repository,
                branch: Branch::new("feature"),
            }),
            errors: vec![AppError {
                id: 1,
                message: "boom".into(),
            }],
            ..AppState::default()
        }
    }

    #[test]
    fn test_no_users_shows_only_sign_in() {
        assert!(matches!(compose(&busy_state()), Screen::NotLoggedIn));
    }

    #[test]
    fn test_app_view_carries_everything() {
        let mut state = busy_state();
        state.users.push(User::new("octocat"));
        state.loading = true;

        let Screen::App(view) = compose(&state) else {
            panic!("expected the app screen");
        };
        assert_eq!(view.sidebar.repositories.len(), 1);
        assert_eq!(view.sidebar.selected_id, Some(RepositoryId(1)));
        assert!(view.sidebar.loading);
        assert!(matches!(
            view.main,
            MainView::Repository { repository, .. } if repository.id == RepositoryId(1)
        ));
        assert!(matches!(view.popup, Some(Popup::RenameBranch { .. })));
        assert_eq!(view.errors.map(<[AppError]>::len), Some(1));
    }

    #[test]
    fn test_main_view_follows_selection_variant() {
        let mut state = AppState {
            users: vec![User::new("octocat")],
            ..AppState::default()
        };
        let Screen::App(view) = compose(&state) else {
            panic!("expected the app screen");
        };
        assert!(matches!(view.main, MainView::NoRepositorySelected));
        assert!(view.popup.is_none());
        assert!(view.errors.is_none());

        state.selected_state = SelectionState::Cloning {
            repository: CloningRepository {
                id: RepositoryId(2),
                name: "hello".into(),
                url: "https://example.com/hello.git".into(),
                path: PathBuf::from("/tmp/hello"),
            },
            progress: CloneProgress::starting("https://example.com/hello.git"),
        };
        let Screen::App(view) = compose(&state) else {
            panic!("expected the app screen");
        };
        assert!(matches!(
            view.main,
            MainView::Cloning { repository, .. } if repository.name == "hello"
        ));
    }
}
