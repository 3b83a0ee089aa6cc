use crate::theme::Theme;
use gantry_core::{
    input::SelectableList,
    model::Repository,
    state::{RepositorySection, RepositoryState},
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
};

pub struct RepositoryView<'a> {
    pub repository: &'a Repository,
    pub state: &'a RepositoryState,
    pub focused: bool,
}

/// Rows in the active section, which is what the list cursor moves over.
pub fn section_len(state: &RepositoryState) -> usize {
    match state.selected_section {
        RepositorySection::Changes => state.changes.len(),
        RepositorySection::History => state.commits.len(),
    }
}

fn header_line<'a>(view: &'a RepositoryView<'_>, theme: &Theme) -> Line<'a> {
    let branches = &view.state.branches_state;
    let mut spans = vec![Span::styled(
        view.repository.name.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    let branch = branches
        .current_branch
        .as_ref()
        .map_or("(no branch)", |b| b.name.as_str());
    spans.push(Span::raw("  on "));
    spans.push(Span::styled(branch, Style::default().fg(theme.secondary)));

    if let Some(upstream) = branches
        .current_branch
        .as_ref()
        .and_then(|b| b.upstream.as_deref())
    {
        spans.push(Span::styled(
            format!(" → {upstream}"),
            Style::default().fg(theme.muted),
        ));
    }

    match &view.repository.remote {
        Some(remote) => spans.push(Span::styled(
            format!("  {}:{}", remote.host, remote.full_name()),
            Style::default().fg(theme.muted),
        )),
        None => spans.push(Span::styled(
            "  not published",
            Style::default().fg(theme.warning),
        )),
    }

    if view.state.is_push_pull_in_progress {
        spans.push(Span::styled(
            "  syncing…",
            Style::default().fg(theme.accent),
        ));
    }
    Line::from(spans)
}

pub fn draw(
    f: &mut Frame,
    area: Rect,
    view: &RepositoryView<'_>,
    list: &SelectableList,
    theme: &Theme,
) {
    let border = if view.focused { theme.accent } else { theme.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .split(inner);

    f.render_widget(Paragraph::new(header_line(view, theme)), chunks[0]);

    let state = view.state;
    let selected_tab = match state.selected_section {
        RepositorySection::Changes => 0,
        RepositorySection::History => 1,
    };
    let tabs = Tabs::new(vec![
        format!("Changes ({})", state.changes.len()),
        "History".to_string(),
    ])
    .select(selected_tab)
    .highlight_style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(tabs, chunks[1]);

    let items: Vec<ListItem> = match state.selected_section {
        RepositorySection::Changes => state
            .changes
            .iter()
            .map(|change| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", change.status.symbol()),
                        Style::default().fg(theme.warning),
                    ),
                    Span::raw(change.path.display().to_string()),
                ]))
            })
            .collect(),
        RepositorySection::History => state
            .commits
            .iter()
            .map(|commit| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", commit.short_sha()),
                        Style::default().fg(theme.secondary),
                    ),
                    Span::raw(commit.summary.as_str()),
                    Span::styled(
                        format!("  {}", commit.author),
                        Style::default().fg(theme.muted),
                    ),
                ]))
            })
            .collect(),
    };

    if items.is_empty() {
        let message = match state.selected_section {
            RepositorySection::Changes => "No local changes",
            RepositorySection::History => "No commits yet",
        };
        f.render_widget(
            Paragraph::new(Line::styled(message, Style::default().fg(theme.muted)))
                .alignment(Alignment::Center),
            chunks[2],
        );
        return;
    }

    let list_widget = List::new(items)
        .highlight_style(
            Style::default()
                .bg(theme.secondary)
                .fg(theme.highlight_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    let mut list_state = ListState::default();
    if view.focused {
        list_state.select(list.selected);
    }
    *list_state.offset_mut() = list.scroll_offset;
    f.render_stateful_widget(list_widget, chunks[2], &mut list_state);
}

/// Placeholder shown when nothing is selected.
pub fn draw_no_repository(f: &mut Frame, area: Rect, add_key: &str, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let lines = vec![
        Line::raw(""),
        Line::styled("No repository selected", Style::default().add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Pick one from the list, or press "),
            Span::styled(add_key, Style::default().fg(theme.accent)),
            Span::raw(" to add one."),
        ]),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}
