use super::{
    Focus, Shell,
    view::{self, MainView, Screen},
};
use crate::components::{
    cloning_view, error_banner, list_rows, menu_bar, not_logged_in, repository_view,
    sidebar::{self, SidebarView},
};
use gantry_core::{
    Dispatcher,
    config::{Command, KeyContext},
    menu::MenuEvent,
    picker::DirectoryPicker,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use std::sync::Arc;

/// Rows the repository view spends on borders, header and tabs.
const DETAILS_CHROME_ROWS: u16 = 4;

impl<D: Dispatcher, P: DirectoryPicker> Shell<D, P> {
    pub fn draw(&mut self, f: &mut Frame) {
        let state = Arc::clone(&self.state);
        let app = match view::compose(&state) {
            Screen::NotLoggedIn => {
                let confirm_key = self
                    .keymaps
                    .label(KeyContext::TextInput, Command::Confirm, "enter");
                not_logged_in::draw(f, f.area(), &self.sign_in, &confirm_key, &self.theme);
                return;
            }
            Screen::App(app) => app,
        };

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(f.area());
        menu_bar::draw(f, rows[0], &self.menu_bar, &self.keymaps, &self.theme);

        let columns =
            Layout::horizontal([Constraint::Percentage(30), Constraint::Min(1)]).split(rows[1]);
        let (sidebar_area, main_area) = (columns[0], columns[1]);

        self.sidebar_rows = list_rows(sidebar_area);
        self.details_rows =
            usize::from(main_area.height.saturating_sub(DETAILS_CHROME_ROWS)).max(1);
        self.sidebar
            .update_scroll_offset_for_selection(self.sidebar_rows);
        self.details
            .update_scroll_offset_for_selection(self.details_rows);

        sidebar::draw(
            f,
            sidebar_area,
            &SidebarView {
                repositories: app.sidebar.repositories,
                selected_id: app.sidebar.selected_id,
                loading: app.sidebar.loading,
                focused: self.focus == Focus::Sidebar,
            },
            &self.sidebar,
            &self.theme,
        );

        match app.main {
            MainView::NoRepositorySelected => {
                let add_key = self.keymaps.label(
                    KeyContext::Sidebar,
                    Command::Menu(MenuEvent::AddRepository),
                    "a",
                );
                repository_view::draw_no_repository(f, main_area, &add_key, &self.theme);
            }
            MainView::Repository { repository, state } => repository_view::draw(
                f,
                main_area,
                &repository_view::RepositoryView {
                    repository,
                    state,
                    focused: self.focus == Focus::Repository,
                },
                &self.details,
                &self.theme,
            ),
            MainView::Cloning {
                repository,
                progress,
            } => cloning_view::draw(f, main_area, repository, progress, &self.theme),
        }

        if app.popup.is_some()
            && let Some((_, form)) = &self.popup
        {
            form.draw(f, f.area(), &self.keymaps, &self.theme);
        }

        if let Some(errors) = app.errors {
            let ok_key = self
                .keymaps
                .label(KeyContext::Confirm, Command::Confirm, "enter");
            error_banner::draw(f, f.area(), errors, &ok_key, &self.theme);
        }
    }
}
