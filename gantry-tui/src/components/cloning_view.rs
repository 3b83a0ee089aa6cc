use crate::theme::Theme;
use gantry_core::{model::CloningRepository, state::CloneProgress};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};

pub fn draw(
    f: &mut Frame,
    area: Rect,
    repository: &CloningRepository,
    progress: &CloneProgress,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", repository.name))
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    f.render_widget(Paragraph::new(Line::raw(progress.title.as_str())), chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(theme.accent))
        .ratio(progress.value.clamp(0.0, 1.0));
    f.render_widget(gauge, chunks[2]);

    let description = progress
        .description
        .clone()
        .unwrap_or_else(|| format!("into {}", repository.path.display()));
    f.render_widget(
        Paragraph::new(Line::styled(description, Style::default().fg(theme.muted))),
        chunks[3],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_util::render;
    use gantry_core::model::RepositoryId;
    use std::path::PathBuf;

    #[test]
    fn test_cloning_view_shows_title_and_percentage() {
        let repository = CloningRepository {
            id: RepositoryId(1),
            name: "gantry".into(),
            url: "https://github.com/octocat/gantry".into(),
            path: PathBuf::from("/src/gantry"),
        };
        let progress = CloneProgress {
            title: "Receiving objects".into(),
            value: 0.42,
            description: None,
        };
        let output = render(60, 10, |f| {
            draw(f, f.area(), &repository, &progress, &Theme::default());
        });
        assert!(output.contains("Receiving objects"));
        assert!(output.contains("42%"));
        assert!(output.contains("into /src/gantry"));
    }
}
