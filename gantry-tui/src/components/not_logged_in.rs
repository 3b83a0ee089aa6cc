use crate::{
    components::{
        centered_rect,
        text_input::{self, TextInputStyle},
    },
    theme::Theme,
};
use gantry_core::input::TextInput;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};

/// Full-screen sign-in form, shown instead of everything else until a user exists.
pub fn draw(f: &mut Frame, area: Rect, login: &TextInput, confirm_key: &str, theme: &Theme) {
    let area = centered_rect(60, 60, area);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Sign in ")
        .border_style(Style::default().fg(theme.accent))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Min(4),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .split(inner);

    let intro = vec![
        Line::raw(""),
        Line::styled(
            "Welcome to gantry",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::raw("Enter the account you publish repositories with."),
    ];
    f.render_widget(
        Paragraph::new(intro)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    text_input::draw(
        f,
        chunks[1],
        &TextInputStyle {
            title: "Login",
            placeholder: "github username",
            border_color: theme.secondary,
            muted_color: theme.muted,
        },
        login,
    );

    let hint = Line::from(vec![
        Span::raw("Press "),
        Span::styled(
            confirm_key,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" to sign in"),
    ]);
    f.render_widget(
        Paragraph::new(hint).alignment(Alignment::Center),
        chunks[2],
    );
}
