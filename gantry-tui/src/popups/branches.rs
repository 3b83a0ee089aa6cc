use super::{FormEnv, confirm_hint, edit_text};
use crate::{
    components::{
        dialog::Dialog,
        text_input::{self, TextInputStyle},
    },
    keymap::Keymaps,
    theme::Theme,
};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use gantry_core::{
    config::{Command, KeyContext},
    input::{SelectableList, TextInput},
    model::{Branch, Repository},
    state::{AppState, BranchesState},
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Padding, Paragraph},
};

const LIST_ROWS: u16 = 10;

/// Fuzzy branch switcher. Recent branches come first when the search is empty.
pub struct BranchesForm {
    repository: Repository,
    branches: BranchesState,
    ordered: Vec<Branch>,
    search: TextInput,
    /// Indices into `ordered`, best match first
    filtered: Vec<usize>,
    list: SelectableList,
    matcher: SkimMatcherV2,
}

impl BranchesForm {
    pub fn new(repository: Repository, state: &AppState) -> Self {
        let mut form = Self {
            repository,
            branches: BranchesState::default(),
            ordered: Vec::new(),
            search: TextInput::new(),
            filtered: Vec::new(),
            list: SelectableList::default(),
            matcher: SkimMatcherV2::default(),
        };
        form.sync(state);
        form
    }

    pub(super) fn sync(&mut self, state: &AppState) {
        let Some(repository_state) = state.repository_state(self.repository.id) else {
            return;
        };
        if repository_state.branches_state == self.branches {
            return;
        }
        self.branches = repository_state.branches_state.clone();
        self.ordered = self
            .branches
            .ordered_for_picker()
            .into_iter()
            .cloned()
            .collect();
        self.refilter();
    }

    fn refilter(&mut self) {
        let query = self.search.text.trim();
        self.filtered = if query.is_empty() {
            (0..self.ordered.len()).collect()
        } else {
            let mut scored: Vec<(usize, i64)> = self
                .ordered
                .iter()
                .enumerate()
                .filter_map(|(i, branch)| {
                    self.matcher
                        .fuzzy_match(&branch.name, query)
                        .map(|score| (i, score))
                })
                .collect();
            scored.sort_by(|a, b| b.1.cmp(&a.1));
            scored.into_iter().map(|(i, _)| i).collect()
        };
        self.list = SelectableList::new(self.filtered.len());
    }

    fn selected_branch(&self) -> Option<&Branch> {
        let idx = *self.filtered.get(self.list.selected?)?;
        self.ordered.get(idx)
    }

    pub fn insert_char(&mut self, c: char) {
        self.search.insert_char(c);
        self.refilter();
    }

    pub fn handle_command(&mut self, command: Command, env: &FormEnv<'_>) {
        let before = self.search.text.len();
        if edit_text(&mut self.search, command) {
            if self.search.text.len() != before {
                self.refilter();
            }
            return;
        }

        let page = i32::from(LIST_ROWS);
        match command {
            Command::MoveUp => self.list.move_selection(-1),
            Command::MoveDown => self.list.move_selection(1),
            Command::HalfPageUp => self.list.move_selection(-page / 2),
            Command::HalfPageDown => self.list.move_selection(page / 2),
            Command::PageUp => self.list.move_selection(-page),
            Command::PageDown => self.list.move_selection(page),
            Command::MoveTop => self.list.move_to_top(),
            Command::MoveBottom => self.list.move_to_bottom(),
            Command::Confirm => {
                let Some(branch) = self.selected_branch() else {
                    return;
                };
                let is_current = self
                    .branches
                    .current_branch
                    .as_ref()
                    .is_some_and(|current| current.same_branch(branch));
                if !is_current {
                    env.dispatcher.checkout_branch(&self.repository, branch);
                }
                env.dispatcher.close_popup();
            }
            Command::Cancel => env.dispatcher.close_popup(),
            _ => {}
        }
        self.list
            .update_scroll_offset_for_selection(usize::from(LIST_ROWS));
    }

    fn branch_item(&self, branch: &Branch, theme: &Theme) -> ListItem<'_> {
        let mut spans = vec![Span::raw(branch.name.clone())];
        let is = |other: &Option<Branch>| other.as_ref().is_some_and(|b| b.same_branch(branch));
        if is(&self.branches.current_branch) {
            spans.push(Span::styled(" *", Style::default().fg(theme.accent)));
        }
        if is(&self.branches.default_branch) {
            spans.push(Span::styled(" (default)", Style::default().fg(theme.muted)));
        }
        if let Some(upstream) = &branch.upstream {
            spans.push(Span::styled(
                format!("  {upstream}"),
                Style::default().fg(theme.muted),
            ));
        }
        ListItem::new(Line::from(spans))
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, keymaps: &Keymaps, theme: &Theme) {
        let inner = Dialog::new(Vec::new())
            .title(format!("{}: branches", self.repository.name))
            .border_color(theme.accent)
            .padding(Padding::horizontal(1))
            .min_height(3 + LIST_ROWS + 1)
            .render(f, area);

        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(LIST_ROWS),
            Constraint::Length(1),
        ])
        .split(inner);

        text_input::draw(
            f,
            chunks[0],
            &TextInputStyle {
                title: "Search",
                placeholder: "Type to filter branches...",
                border_color: theme.secondary,
                muted_color: theme.muted,
            },
            &self.search,
        );

        if self.filtered.is_empty() {
            let message = if self.ordered.is_empty() {
                "Loading branches…"
            } else {
                "No matching branches"
            };
            f.render_widget(
                Paragraph::new(Line::styled(message, Style::default().fg(theme.muted))),
                chunks[1],
            );
        } else {
            let items: Vec<ListItem> = self
                .filtered
                .iter()
                .map(|&i| self.branch_item(&self.ordered[i], theme))
                .collect();
            let list = List::new(items)
                .highlight_style(
                    Style::default()
                        .bg(theme.secondary)
                        .fg(theme.highlight_fg)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▸ ");
            let mut list_state = ListState::default();
            list_state.select(self.list.selected);
            *list_state.offset_mut() = self.list.scroll_offset;
            f.render_stateful_widget(list, chunks[1], &mut list_state);
        }

        f.render_widget(
            Paragraph::new(
                confirm_hint(keymaps, KeyContext::ListPicker, "checkout")
                    .style(Style::default().fg(theme.muted)),
            ),
            chunks[2],
        );
    }
}
