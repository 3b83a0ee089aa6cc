//! The application shell: applies store snapshots, routes menu commands and key presses,
//! and owns the only view-local state (list cursors, focus, the open form).

mod draw;
pub mod view;

use crate::{
    components::{menu_bar::MenuBar, repository_view},
    keymap::{KeyInput, Keymaps},
    popups::{self, FormEnv, PopupForm},
    theme::Theme,
};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
};
use gantry_core::{
    Config, Dispatcher, MenuEnablement, StoreHandle, fatal_error,
    config::{Command, KeyContext},
    input::{SelectableList, TextInput},
    keyboard::KeyEvent,
    menu::{MenuEvent, MenuReceiver, MenuSender, MenuSignal, menu_channel},
    model::{RepositoryListItem, User},
    paths::parse_dropped_paths,
    picker::DirectoryPicker,
    state::{AppState, Popup, RepositorySection, SelectionState},
};
use ratatui::DefaultTerminal;
use std::{io, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Repository,
}

pub struct Shell<D: Dispatcher, P: DirectoryPicker> {
    dispatcher: D,
    picker: P,
    state: Arc<AppState>,
    keymaps: Keymaps,
    theme: Theme,
    clone_dir: PathBuf,
    focus: Focus,
    sidebar: SelectableList,
    details: SelectableList,
    /// Rows visible in each list at the last draw, for paging
    sidebar_rows: usize,
    details_rows: usize,
    popup: Option<(Popup, PopupForm)>,
    sign_in: TextInput,
    menu_bar: MenuBar,
    menu_tx: MenuSender,
    menu_rx: MenuReceiver,
    needs_full_redraw: bool,
    should_quit: bool,
}

impl<D: Dispatcher, P: DirectoryPicker> Shell<D, P> {
    pub fn new(dispatcher: D, picker: P, initial: Arc<AppState>, config: &Config) -> Self {
        let (menu_tx, menu_rx) = menu_channel();
        let mut shell = Self {
            dispatcher,
            picker,
            state: Arc::new(AppState::default()),
            keymaps: Keymaps::new(&config.keys),
            theme: Theme::from_config(&config.theme),
            clone_dir: config.repositories.resolved_clone_dir(),
            focus: Focus::Sidebar,
            sidebar: SelectableList::default(),
            details: SelectableList::default(),
            sidebar_rows: 1,
            details_rows: 1,
            popup: None,
            sign_in: TextInput::new(),
            menu_bar: MenuBar::default(),
            menu_tx,
            menu_rx,
            needs_full_redraw: false,
            should_quit: false,
        };
        shell.apply_snapshot(initial);
        shell
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn menu_bar(&self) -> &MenuBar {
        &self.menu_bar
    }

    /// Sender for menu commands from outside the key handler.
    pub fn menu_sender(&self) -> MenuSender {
        self.menu_tx.clone()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// True once after something else has drawn over the terminal.
    pub fn take_full_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_full_redraw)
    }

    /// Replace the current snapshot wholesale and bring view-local state in line with it.
    pub fn apply_snapshot(&mut self, snapshot: Arc<AppState>) {
        let previous = std::mem::replace(&mut self.state, snapshot);
        let state = Arc::clone(&self.state);

        self.sidebar.set_len(state.repositories.len());
        let selected_id = state.selected_state.selected_id();
        if selected_id != previous.selected_state.selected_id()
            && let Some(idx) = selected_id
                .and_then(|id| state.repositories.iter().position(|item| item.id() == id))
        {
            self.sidebar.select(Some(idx));
        }
        self.sidebar
            .update_scroll_offset_for_selection(self.sidebar_rows);

        self.sync_details(&previous.selected_state, &state.selected_state);

        self.popup = match (&state.current_popup, self.popup.take()) {
            (None, _) => None,
            (Some(popup), Some((open, mut form))) if *popup == open => {
                form.sync(&state);
                Some((open, form))
            }
            (Some(popup), _) => Some((popup.clone(), PopupForm::open(popup, &state))),
        };

        MenuEnablement::derive(&state.selected_state).apply(&mut self.menu_bar);
    }

    fn sync_details(&mut self, previous: &SelectionState, current: &SelectionState) {
        let SelectionState::Repository { repository, state } = current else {
            self.details = SelectableList::default();
            if self.focus == Focus::Repository {
                self.focus = Focus::Sidebar;
            }
            return;
        };
        let len = repository_view::section_len(state);
        let same_view = matches!(
            previous,
            SelectionState::Repository { repository: prev, state: prev_state }
                if prev.id == repository.id
                    && prev_state.selected_section == state.selected_section
        );
        if same_view {
            self.details.set_len(len);
        } else {
            self.details = SelectableList::new(len);
        }
        self.details
            .update_scroll_offset_for_selection(self.details_rows);
    }

    pub fn handle_menu_event(&mut self, event: MenuEvent) {
        let state = Arc::clone(&self.state);
        let selection = &state.selected_state;
        let repository = selection.repository();
        log::debug!("menu event {event}");

        match event {
            MenuEvent::Push => {
                if let Some(repository) = repository {
                    self.dispatcher.push(repository);
                }
            }
            MenuEvent::Pull => {
                if let Some(repository) = repository {
                    self.dispatcher.pull(repository);
                }
            }
            MenuEvent::SelectChanges => {
                if let Some(repository) = repository {
                    self.dispatcher
                        .change_repository_section(repository, RepositorySection::Changes);
                }
            }
            MenuEvent::SelectHistory => {
                if let Some(repository) = repository {
                    self.dispatcher
                        .change_repository_section(repository, RepositorySection::History);
                }
            }
            MenuEvent::AddLocalRepository => {
                let picked = self.picker.pick_directories();
                self.needs_full_redraw = true;
                match picked {
                    Some(paths) if !paths.is_empty() => self.dispatcher.add_repositories(paths),
                    _ => log::debug!("no directories picked"),
                }
            }
            MenuEvent::CreateBranch => {
                if let Some(repository) = repository {
                    self.dispatcher.show_popup(Popup::CreateBranch {
                        repository: repository.clone(),
                    });
                }
            }
            MenuEvent::ShowBranches => {
                if let Some(repository) = repository {
                    self.dispatcher.show_popup(Popup::ShowBranches {
                        repository: repository.clone(),
                    });
                }
            }
            MenuEvent::RemoveRepository => {
                // A clone in progress can be removed too; it only needs to be in the list.
                if let Some(item) = selection.selected_id().and_then(|id| state.find_item(id)) {
                    self.dispatcher.remove_repositories(&[item.clone()]);
                }
            }
            MenuEvent::AddRepository => self.dispatcher.show_popup(Popup::AddRepository),
            MenuEvent::RenameBranch => {
                if !MenuEnablement::derive(selection).rename_branch {
                    return;
                }
                if let Some(repository) = repository
                    && let Some(branch) = selection.current_branch()
                {
                    self.dispatcher.show_popup(Popup::RenameBranch {
                        repository: repository.clone(),
                        branch: branch.clone(),
                    });
                }
            }
            MenuEvent::DeleteBranch => {
                if !MenuEnablement::derive(selection).delete_branch {
                    return;
                }
                if let Some(repository) = repository
                    && let Some(branch) = selection.current_branch()
                {
                    self.dispatcher.show_popup(Popup::DeleteBranch {
                        repository: repository.clone(),
                        branch: branch.clone(),
                    });
                }
            }
        }
    }

    /// Entry point for commands that arrive by name. Unknown names are a fatal error.
    pub fn handle_menu_signal(&mut self, signal: &MenuSignal) {
        match MenuEvent::from_str(&signal.name) {
            Ok(event) => self.handle_menu_event(event),
            Err(_) => fatal_error(&format!("unknown menu command: {:?}", signal.name)),
        }
    }

    /// Handle every menu signal queued so far, in order.
    pub fn process_menu_signals(&mut self) {
        for signal in self.menu_rx.drain() {
            self.handle_menu_signal(&signal);
        }
    }

    pub fn on_selection_changed(&self, item: &RepositoryListItem) {
        self.dispatcher.select_repository(item);
        if let RepositoryListItem::Repository(repository) = item {
            self.dispatcher.refresh_remote_info(repository);
        }
    }

    /// Acknowledge the error banner: one `clear_error` per error, oldest first.
    pub fn dismiss_errors(&self) {
        for error in &self.state.errors {
            self.dispatcher.clear_error(error);
        }
    }

    fn key_context(&self) -> KeyContext {
        if !self.state.is_logged_in() {
            KeyContext::TextInput
        } else if !self.state.errors.is_empty() {
            KeyContext::Confirm
        } else if let Some((_, form)) = &self.popup {
            form.context()
        } else {
            match self.focus {
                Focus::Sidebar => KeyContext::Sidebar,
                Focus::Repository => KeyContext::Repository,
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let context = self.key_context();
        match self.keymaps.resolve(context, key) {
            KeyInput::Command(Command::Quit) => self.should_quit = true,
            KeyInput::Command(command) => self.handle_command(command),
            KeyInput::Text(c) => self.insert_char(c),
            KeyInput::Unbound => {}
        }
        self.process_menu_signals();
    }

    /// Text pasted into the terminal, which is also how files dropped on the window arrive.
    /// With no input focused the text is read as paths to add.
    pub fn handle_paste(&mut self, text: &str) {
        let typed = text.chars().filter(|c| !c.is_control());
        if !self.state.is_logged_in() {
            typed.for_each(|c| self.sign_in.insert_char(c));
            return;
        }
        if !self.state.errors.is_empty() {
            return;
        }
        if let Some((_, form)) = &mut self.popup {
            typed.for_each(|c| form.insert_char(c));
            return;
        }

        let paths = parse_dropped_paths(text);
        if paths.is_empty() {
            log::debug!("paste contained no paths");
            return;
        }
        self.dispatcher.add_repositories(paths);
    }

    fn insert_char(&mut self, c: char) {
        if !self.state.is_logged_in() {
            self.sign_in.insert_char(c);
        } else if let Some((_, form)) = &mut self.popup {
            form.insert_char(c);
        }
    }

    fn handle_command(&mut self, command: Command) {
        if !self.state.is_logged_in() {
            self.handle_sign_in_command(command);
            return;
        }
        if !self.state.errors.is_empty() {
            if matches!(command, Command::Confirm | Command::Cancel) {
                self.dismiss_errors();
            }
            return;
        }
        if let Some((_, form)) = &mut self.popup {
            let env = FormEnv {
                dispatcher: &self.dispatcher,
                state: &self.state,
                clone_dir: &self.clone_dir,
            };
            form.handle_command(command, &env);
            return;
        }

        if let Command::Menu(event) = command {
            // Keys bound to disabled menu items do nothing.
            if self.menu_bar.is_enabled(event.name()) {
                self.menu_tx.send_event(event);
            }
            return;
        }
        match self.focus {
            Focus::Sidebar => self.handle_sidebar_command(command),
            Focus::Repository => self.handle_repository_command(command),
        }
    }

    fn handle_sign_in_command(&mut self, command: Command) {
        if popups::edit_text(&mut self.sign_in, command) {
            return;
        }
        match command {
            Command::Confirm => {
                let login = self.sign_in.text.trim();
                if !login.is_empty() {
                    self.dispatcher.sign_in(User::new(login));
                    self.sign_in.clear();
                }
            }
            Command::Cancel => self.sign_in.clear(),
            _ => {}
        }
    }

    fn handle_sidebar_command(&mut self, command: Command) {
        if move_in_list(&mut self.sidebar, command, self.sidebar_rows) {
            self.sidebar
                .update_scroll_offset_for_selection(self.sidebar_rows);
            return;
        }
        match command {
            Command::SelectRepository => {
                let state = Arc::clone(&self.state);
                if let Some(item) = self.sidebar.selected.and_then(|i| state.repositories.get(i)) {
                    self.on_selection_changed(item);
                    if matches!(item, RepositoryListItem::Repository(_)) {
                        self.focus = Focus::Repository;
                    }
                }
            }
            Command::FocusNext => {
                if self.state.selected_state.repository().is_some() {
                    self.focus = Focus::Repository;
                }
            }
            _ => {}
        }
    }

    fn handle_repository_command(&mut self, command: Command) {
        if move_in_list(&mut self.details, command, self.details_rows) {
            self.details
                .update_scroll_offset_for_selection(self.details_rows);
            return;
        }
        let SelectionState::Repository { repository, state } = &self.state.selected_state else {
            return;
        };
        match command {
            Command::FocusNext => self.focus = Focus::Sidebar,
            Command::RefreshRepository => self.dispatcher.refresh_repository(repository),
            Command::DiscardFile => {
                if state.selected_section == RepositorySection::Changes
                    && let Some(change) = self.details.selected.and_then(|i| state.changes.get(i))
                {
                    self.dispatcher.show_popup(Popup::DiscardChanges {
                        repository: repository.clone(),
                        files: vec![change.clone()],
                    });
                }
            }
            Command::DiscardAll => {
                if !state.changes.is_empty() {
                    self.dispatcher.show_popup(Popup::DiscardChanges {
                        repository: repository.clone(),
                        files: state.changes.clone(),
                    });
                }
            }
            Command::PublishRepository => {
                if repository.remote.is_none() {
                    self.dispatcher.show_popup(Popup::PublishRepository {
                        repository: repository.clone(),
                    });
                } else {
                    log::debug!("{} already has a remote", repository.name);
                }
            }
            _ => {}
        }
    }
}

/// Apply a list movement command. Returns false if `command` is not one.
fn move_in_list(list: &mut SelectableList, command: Command, page_rows: usize) -> bool {
    let page: i32 = page_rows.max(1).try_into().unwrap_or(i32::MAX);
    let half_page = (page / 2).max(1);
    match command {
        Command::MoveUp => list.move_selection(-1),
        Command::MoveDown => list.move_selection(1),
        Command::HalfPageUp => list.move_selection(-half_page),
        Command::HalfPageDown => list.move_selection(half_page),
        Command::PageUp => list.move_selection(-page),
        Command::PageDown => list.move_selection(page),
        Command::MoveTop => list.move_to_top(),
        Command::MoveBottom => list.move_to_bottom(),
        _ => return false,
    }
    true
}

/// Drive the shell until the user quits. Snapshots are applied in the order the store sent them.
pub fn run<P: DirectoryPicker>(
    terminal: &mut DefaultTerminal,
    store: &StoreHandle,
    picker: P,
    config: &Config,
) -> anyhow::Result<()> {
    execute!(io::stdout(), EnableBracketedPaste)?;
    let result = event_loop(terminal, store, picker, config);
    if let Err(e) = execute!(io::stdout(), DisableBracketedPaste) {
        log::warn!("failed to disable bracketed paste: {e}");
    }
    result
}

fn event_loop<P: DirectoryPicker>(
    terminal: &mut DefaultTerminal,
    store: &StoreHandle,
    picker: P,
    config: &Config,
) -> anyhow::Result<()> {
    let subscription = store.subscribe();
    let mut shell = Shell::new(store.dispatcher(), picker, store.get_state(), config);

    loop {
        if shell.take_full_redraw() {
            terminal.clear()?;
        }
        terminal.draw(|f| shell.draw(f))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => shell.handle_key(key.into()),
                Event::Paste(text) => shell.handle_paste(&text),
                _ => {}
            }
        }

        while let Some(snapshot) = subscription.try_next() {
            shell.apply_snapshot(snapshot);
        }

        if shell.should_quit() {
            break;
        }
    }

    subscription.unsubscribe();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_util::render;
    use gantry_core::{
        Intent,
        dispatch::mock::RecordingDispatcher,
        keyboard::{KeyCode, KeyModifiers},
        model::{
            AppError, Branch, CloningRepository, FileChange, FileStatus, Repository, RepositoryId,
        },
        picker::FixedDirectoryPicker,
        state::{BranchesState, CloneProgress, RepositoryState},
    };

    type TestShell = Shell<RecordingDispatcher, FixedDirectoryPicker>;

    fn repository(id: u64, name: &str) -> Repository {
        Repository {
            id: RepositoryId(id),
            name: name.to_string(),
            path: PathBuf::from(format!("/tmp/{name}")),
            remote: None,
        }
    }

    fn cloning(id: u64) -> CloningRepository {
        CloningRepository {
            id: RepositoryId(id),
            name: "incoming".into(),
            url: "https://example.com/incoming.git".into(),
            path: PathBuf::from("/tmp/incoming"),
        }
    }

    fn repository_state(current: Option<&str>, default: Option<&str>) -> RepositoryState {
        RepositoryState {
            branches_state: BranchesState {
                current_branch: current.map(Branch::new),
                default_branch: default.map(Branch::new),
                all_branches: ["main", "feature"].into_iter().map(Branch::new).collect(),
                recent_branches: Vec::new(),
            },
            changes: vec![
                FileChange::new("a.txt", FileStatus::Modified),
                FileChange::new("b.txt", FileStatus::New),
            ],
            ..RepositoryState::default()
        }
    }

    fn logged_in() -> AppState {
        AppState {
            users: vec![User::new("octocat")],
            ..AppState::default()
        }
    }

    fn with_repository(current: Option<&str>, default: Option<&str>) -> AppState {
        let repository = repository(1, "alpha");
        let state = repository_state(current, default);
        let mut app = logged_in();
        app.repositories = vec![RepositoryListItem::Repository(repository.clone())];
        app.repository_states.insert(repository.id, state.clone());
        app.selected_state = SelectionState::Repository { repository, state };
        app
    }

    fn with_cloning() -> AppState {
        let repository = cloning(2);
        let mut app = logged_in();
        app.repositories = vec![RepositoryListItem::Cloning(repository.clone())];
        app.selected_state = SelectionState::Cloning {
            progress: CloneProgress::starting(&repository.url),
            repository,
        };
        app
    }

    fn shell_with_picker(state: AppState, picker: FixedDirectoryPicker) -> TestShell {
        Shell::new(
            RecordingDispatcher::default(),
            picker,
            Arc::new(state),
            &Config::default(),
        )
    }

    fn shell(state: AppState) -> TestShell {
        shell_with_picker(state, FixedDirectoryPicker(None))
    }

    fn press(shell: &mut TestShell, code: KeyCode) {
        shell.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(shell: &mut TestShell, text: &str) {
        for c in text.chars() {
            press(shell, KeyCode::Char(c));
        }
    }

    fn selection_commands() -> impl Iterator<Item = MenuEvent> {
        MenuEvent::ALL
            .into_iter()
            .filter(|event| event.requires_repository())
    }

    #[test]
    fn test_selection_commands_are_noops_without_selection() {
        let mut shell = shell(logged_in());
        for event in selection_commands() {
            shell.handle_menu_event(event);
        }
        assert!(shell.dispatcher().is_empty());
    }

    #[test]
    fn test_selection_commands_are_noops_while_cloning() {
        let mut shell = shell(with_cloning());
        for event in selection_commands().filter(|e| *e != MenuEvent::RemoveRepository) {
            shell.handle_menu_event(event);
        }
        assert!(shell.dispatcher().is_empty());
    }

    #[test]
    fn test_remove_repository_also_removes_clone_in_progress() {
        let mut shell = shell(with_cloning());
        shell.handle_menu_event(MenuEvent::RemoveRepository);
        assert_eq!(
            shell.dispatcher().take(),
            vec![Intent::RemoveRepositories(vec![RepositoryId(2)])]
        );
    }

    #[test]
    fn test_enablement_follows_current_and_default_branch() {
        let cases = [
            (Some("feature"), Some("main"), true),
            (Some("main"), Some("main"), false),
            (None, Some("main"), false),
            (Some("feature"), None, false),
            (None, None, false),
        ];
        for (current, default, expected) in cases {
            let shell = shell(with_repository(current, default));
            assert_eq!(
                shell.menu_bar().is_enabled("rename-branch"),
                expected,
                "{current:?} / {default:?}"
            );
            assert_eq!(
                shell.menu_bar().is_enabled("delete-branch"),
                expected,
                "{current:?} / {default:?}"
            );
        }

        let shell = shell(with_cloning());
        assert!(!shell.menu_bar().is_enabled("rename-branch"));
        assert!(!shell.menu_bar().is_enabled("delete-branch"));
    }

    #[test]
    fn test_enablement_recomputed_on_every_snapshot() {
        let mut shell = shell(with_repository(Some("feature"), Some("main")));
        assert!(shell.menu_bar().is_enabled("rename-branch"));
        shell.apply_snapshot(Arc::new(with_repository(Some("main"), Some("main"))));
        assert!(!shell.menu_bar().is_enabled("rename-branch"));
        shell.apply_snapshot(Arc::new(logged_in()));
        assert!(!shell.menu_bar().is_enabled("delete-branch"));
    }

    #[test]
    fn test_rename_on_default_branch_is_noop() {
        let mut shell = shell(with_repository(Some("main"), Some("main")));
        shell.handle_menu_event(MenuEvent::RenameBranch);
        shell.handle_menu_event(MenuEvent::DeleteBranch);
        assert!(shell.dispatcher().is_empty());
    }

    #[test]
    fn test_rename_on_feature_branch_opens_popup_with_branch() {
        let mut shell = shell(with_repository(Some("feature"), Some("main")));
        shell.handle_menu_event(MenuEvent::RenameBranch);
        assert_eq!(
            shell.dispatcher().take(),
            vec![Intent::ShowPopup(Popup::RenameBranch {
                repository: repository(1, "alpha"),
                branch: Branch::new("feature"),
            })]
        );

        shell.handle_menu_event(MenuEvent::DeleteBranch);
        assert!(matches!(
            shell.dispatcher().take().as_slice(),
            [Intent::ShowPopup(Popup::DeleteBranch { branch, .. })] if branch.name == "feature"
        ));
    }

    #[test]
    fn test_repository_commands_dispatch_for_selection() {
        let mut shell = shell(with_repository(Some("main"), Some("main")));
        shell.handle_menu_event(MenuEvent::Push);
        shell.handle_menu_event(MenuEvent::Pull);
        shell.handle_menu_event(MenuEvent::SelectHistory);
        shell.handle_menu_event(MenuEvent::SelectChanges);
        shell.handle_menu_event(MenuEvent::CreateBranch);
        shell.handle_menu_event(MenuEvent::AddRepository);
        let repository = repository(1, "alpha");
        assert_eq!(
            shell.dispatcher().take(),
            vec![
                Intent::Push(RepositoryId(1)),
                Intent::Pull(RepositoryId(1)),
                Intent::ChangeRepositorySection {
                    id: RepositoryId(1),
                    section: RepositorySection::History,
                },
                Intent::ChangeRepositorySection {
                    id: RepositoryId(1),
                    section: RepositorySection::Changes,
                },
                Intent::ShowPopup(Popup::CreateBranch { repository }),
                Intent::ShowPopup(Popup::AddRepository),
            ]
        );
    }

    #[test]
    fn test_add_local_repository_uses_picker() {
        let picked = vec![PathBuf::from("/src/one"), PathBuf::from("/src/two")];
        let mut shell = shell_with_picker(logged_in(), FixedDirectoryPicker(Some(picked.clone())));
        shell.handle_menu_event(MenuEvent::AddLocalRepository);
        assert_eq!(shell.dispatcher().take(), vec![Intent::AddRepositories(picked)]);
        assert!(shell.take_full_redraw());
        assert!(!shell.take_full_redraw());

        for answer in [None, Some(Vec::new())] {
            let mut shell = shell_with_picker(logged_in(), FixedDirectoryPicker(answer));
            shell.handle_menu_event(MenuEvent::AddLocalRepository);
            assert!(shell.dispatcher().is_empty());
        }
    }

    #[test]
    fn test_dropped_paths_add_repositories() {
        let mut shell = shell(logged_in());
        shell.handle_paste("/src/one\n'/src/two words'\n");
        assert_eq!(
            shell.dispatcher().take(),
            vec![Intent::AddRepositories(vec![
                PathBuf::from("/src/one"),
                PathBuf::from("/src/two words"),
            ])]
        );

        shell.handle_paste(" \n ");
        assert!(shell.dispatcher().is_empty());
    }

    #[test]
    fn test_paste_goes_to_open_form() {
        let mut state = with_repository(Some("main"), Some("main"));
        let mut shell = shell(state.clone());
        state.current_popup = Some(Popup::CreateBranch {
            repository: repository(1, "alpha"),
        });
        shell.apply_snapshot(Arc::new(state));

        shell.handle_paste("topic\n");
        press(&mut shell, KeyCode::Enter);
        assert_eq!(
            shell.dispatcher().take(),
            vec![
                Intent::CreateBranch {
                    id: RepositoryId(1),
                    name: "topic".into(),
                    start_point: Some("main".into()),
                },
                Intent::ClosePopup,
            ]
        );
    }

    #[test]
    fn test_paste_goes_to_sign_in_form() {
        let mut shell = shell(AppState::default());
        shell.handle_paste("octocat");
        press(&mut shell, KeyCode::Enter);
        assert_eq!(
            shell.dispatcher().take(),
            vec![Intent::SignIn(User::new("octocat"))]
        );
    }

    #[test]
    fn test_menu_signals_route_by_name_in_order() {
        let mut shell = shell(with_repository(Some("main"), Some("main")));
        let sender = shell.menu_sender();
        sender.send(MenuSignal::new("pull"));
        sender.send_event(MenuEvent::Push);
        shell.process_menu_signals();
        assert_eq!(
            shell.dispatcher().take(),
            vec![Intent::Pull(RepositoryId(1)), Intent::Push(RepositoryId(1))]
        );
    }

    #[test]
    #[should_panic(expected = "unknown menu command")]
    fn test_unknown_menu_signal_is_fatal() {
        let mut shell = shell(logged_in());
        shell.menu_sender().send(MenuSignal::new("frobnicate"));
        shell.process_menu_signals();
    }

    #[test]
    fn test_keys_for_disabled_menu_items_are_swallowed() {
        let mut shell = shell(with_repository(Some("main"), Some("main")));
        press(&mut shell, KeyCode::Char('r'));
        press(&mut shell, KeyCode::Char('D'));
        assert!(shell.dispatcher().is_empty());

        let mut shell = self::shell(with_repository(Some("feature"), Some("main")));
        press(&mut shell, KeyCode::Char('r'));
        assert_eq!(shell.dispatcher().take().len(), 1);
    }

    #[test]
    fn test_ok_clears_each_error_in_order() {
        let mut state = with_repository(Some("main"), Some("main"));
        state.errors = vec![
            AppError {
                id: 1,
                message: "E1".into(),
            },
            AppError {
                id: 2,
                message: "E2".into(),
            },
        ];
        let mut shell = shell(state.clone());
        let output = render(80, 24, |f| shell.draw(f));
        assert!(output.contains("E1"));
        assert!(output.contains("E2"));
        assert_eq!(output.matches("[ OK ]").count(), 1);

        // Menu keys are inert while the banner is up.
        press(&mut shell, KeyCode::Char('P'));
        assert!(shell.dispatcher().is_empty());

        press(&mut shell, KeyCode::Enter);
        assert_eq!(
            shell.dispatcher().take(),
            vec![Intent::ClearError(1), Intent::ClearError(2)]
        );

        state.errors.clear();
        shell.apply_snapshot(Arc::new(state));
        let output = render(80, 24, |f| shell.draw(f));
        assert!(!output.contains("[ OK ]"));
    }

    #[test]
    fn test_not_logged_in_renders_exclusively() {
        let mut state = with_repository(Some("feature"), Some("main"));
        state.users.clear();
        state.current_popup = Some(Popup::AddRepository);
        state.errors.push(AppError {
            id: 1,
            message: "E1".into(),
        });
        let mut shell = shell(state);
        let output = render(80, 24, |f| shell.draw(f));
        assert!(output.contains("Sign in"));
        assert!(!output.contains("Add repository"));
        assert!(!output.contains("alpha"));
        assert!(!output.contains("E1"));
    }

    #[test]
    fn test_sign_in_form_dispatches_user() {
        let mut shell = shell(AppState::default());
        type_text(&mut shell, "octocat");
        press(&mut shell, KeyCode::Enter);
        assert_eq!(
            shell.dispatcher().take(),
            vec![Intent::SignIn(User::new("octocat"))]
        );
    }

    #[test]
    fn test_selecting_sidebar_entry_selects_then_refreshes_remote() {
        let mut state = logged_in();
        state.repositories = vec![
            RepositoryListItem::Repository(repository(1, "alpha")),
            RepositoryListItem::Cloning(cloning(2)),
        ];
        let mut shell = shell(state);

        press(&mut shell, KeyCode::Enter);
        assert_eq!(
            shell.dispatcher().take(),
            vec![
                Intent::SelectRepository(RepositoryId(1)),
                Intent::RefreshRemoteInfo(RepositoryId(1)),
            ]
        );
        assert_eq!(shell.focus(), Focus::Repository);

        // Selection never arrived from the store, so focus falls back to the sidebar.
        shell.apply_snapshot(Arc::new(shell.state().clone()));
        assert_eq!(shell.focus(), Focus::Sidebar);
        press(&mut shell, KeyCode::Char('j'));
        press(&mut shell, KeyCode::Enter);
        assert_eq!(
            shell.dispatcher().take(),
            vec![Intent::SelectRepository(RepositoryId(2))]
        );
    }

    #[test]
    fn test_popup_form_follows_snapshots() {
        let mut state = with_repository(Some("main"), Some("main"));
        let mut shell = shell(state.clone());

        state.current_popup = Some(Popup::CreateBranch {
            repository: repository(1, "alpha"),
        });
        shell.apply_snapshot(Arc::new(state.clone()));
        type_text(&mut shell, "topic");

        // An unrelated snapshot keeps what was typed.
        state.loading = true;
        shell.apply_snapshot(Arc::new(state.clone()));
        press(&mut shell, KeyCode::Enter);
        assert_eq!(
            shell.dispatcher().take(),
            vec![
                Intent::CreateBranch {
                    id: RepositoryId(1),
                    name: "topic".into(),
                    start_point: Some("main".into()),
                },
                Intent::ClosePopup,
            ]
        );

        state.current_popup = None;
        shell.apply_snapshot(Arc::new(state));
        let output = render(80, 24, |f| shell.draw(f));
        assert!(!output.contains("from the current branch"));
    }

    #[test]
    fn test_discard_keys_open_confirmation() {
        let mut shell = shell(with_repository(Some("main"), Some("main")));
        shell.focus = Focus::Repository;
        press(&mut shell, KeyCode::Char('j'));
        press(&mut shell, KeyCode::Char('d'));
        press(&mut shell, KeyCode::Char('X'));
        let repository = repository(1, "alpha");
        assert_eq!(
            shell.dispatcher().take(),
            vec![
                Intent::ShowPopup(Popup::DiscardChanges {
                    repository: repository.clone(),
                    files: vec![FileChange::new("b.txt", FileStatus::New)],
                }),
                Intent::ShowPopup(Popup::DiscardChanges {
                    repository,
                    files: vec![
                        FileChange::new("a.txt", FileStatus::Modified),
                        FileChange::new("b.txt", FileStatus::New),
                    ],
                }),
            ]
        );
    }

    #[test]
    fn test_draws_each_main_view() {
        let mut shell = shell(logged_in());
        let output = render(100, 24, |f| shell.draw(f));
        assert!(output.contains("No repository selected"));

        shell.apply_snapshot(Arc::new(with_repository(Some("feature"), Some("main"))));
        let output = render(100, 24, |f| shell.draw(f));
        assert!(output.contains("a.txt"));
        assert!(output.contains("feature"));

        shell.apply_snapshot(Arc::new(with_cloning()));
        let output = render(100, 24, |f| shell.draw(f));
        assert!(output.contains("Cloning https://example.com/incoming.git"));
    }

    #[test]
    fn test_quit_key() {
        let mut shell = shell(logged_in());
        shell.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(shell.should_quit());
    }
}
