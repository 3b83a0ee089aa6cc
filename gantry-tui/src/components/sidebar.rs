use crate::theme::Theme;
use gantry_core::{
    input::SelectableList,
    model::{RepositoryId, RepositoryListItem},
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

pub struct SidebarView<'a> {
    pub repositories: &'a [RepositoryListItem],
    pub selected_id: Option<RepositoryId>,
    pub loading: bool,
    pub focused: bool,
}

pub fn draw(
    f: &mut Frame,
    area: Rect,
    view: &SidebarView<'_>,
    list: &SelectableList,
    theme: &Theme,
) {
    let items: Vec<ListItem> = view
        .repositories
        .iter()
        .map(|item| {
            let marker = if Some(item.id()) == view.selected_id {
                Span::styled("● ", Style::default().fg(theme.accent))
            } else {
                Span::raw("  ")
            };
            let mut spans = vec![marker, Span::raw(item.name())];
            if matches!(item, RepositoryListItem::Cloning(_)) {
                spans.push(Span::styled(
                    " (cloning)",
                    Style::default().fg(theme.warning),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if view.loading {
        " Repositories (loading…) ".to_string()
    } else {
        format!(" Repositories ({}) ", view.repositories.len())
    };
    let border = if view.focused { theme.accent } else { theme.border };

    let list_widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border)),
        )
        .highlight_style(
            Style::default()
                .bg(theme.accent)
                .fg(theme.highlight_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    if view.focused {
        list_state.select(list.selected);
    }
    *list_state.offset_mut() = list.scroll_offset;
    f.render_stateful_widget(list_widget, area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_util::render;
    use gantry_core::model::{CloningRepository, Repository};
    use std::path::PathBuf;

    fn items() -> Vec<RepositoryListItem> {
        vec![
            RepositoryListItem::Repository(Repository {
                id: RepositoryId(1),
                name: "gantry".into(),
                path: PathBuf::from("/src/gantry"),
                remote: None,
            }),
            RepositoryListItem::Cloning(CloningRepository {
                id: RepositoryId(2),
                name: "ratatui".into(),
                url: "https://github.com/ratatui/ratatui".into(),
                path: PathBuf::from("/src/ratatui"),
            }),
        ]
    }

    #[test]
    fn test_sidebar_lists_repositories_and_marks_cloning() {
        let items = items();
        let view = SidebarView {
            repositories: &items,
            selected_id: Some(RepositoryId(1)),
            loading: false,
            focused: true,
        };
        let output = render(40, 8, |f| {
            draw(f, f.area(), &view, &SelectableList::new(2), &Theme::default());
        });
        assert!(output.contains("Repositories (2)"));
        assert!(output.contains("gantry"));
        assert!(output.contains("ratatui (cloning)"));
        assert!(output.contains('●'));
    }

    #[test]
    fn test_sidebar_shows_loading_flag() {
        let view = SidebarView {
            repositories: &[],
            selected_id: None,
            loading: true,
            focused: false,
        };
        let output = render(40, 5, |f| {
            draw(f, f.area(), &view, &SelectableList::new(0), &Theme::default());
        });
        assert!(output.contains("loading"));
    }
}
