use ratatui::layout::{Constraint, Layout, Rect};

pub mod cloning_view;
pub mod dialog;
pub mod error_banner;
pub mod menu_bar;
pub mod not_logged_in;
pub mod path_input;
pub mod repository_view;
pub mod sidebar;
pub mod text_input;

const MAX_DIALOG_WIDTH: u16 = 80;

/// Dialogs take 80% of the terminal width, up to a fixed maximum.
pub fn dialog_width(terminal_width: u16) -> u16 {
    let scaled = u32::from(terminal_width) * 4 / 5;
    u16::try_from(scaled)
        .unwrap_or(u16::MAX)
        .min(MAX_DIALOG_WIDTH)
        .max(1)
}

/// Helper function to center a rect within another rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Percentage(percent_y.min(100)),
        Constraint::Fill(1),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Percentage(percent_x.min(100)),
        Constraint::Fill(1),
    ])
    .split(popup_layout[1])[1]
}

/// Center a rect of exactly `width` x `height` (clamped to `r`).
pub fn centered_fixed_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

/// Rows available inside a bordered list.
pub fn list_rows(area: Rect) -> usize {
    usize::from(area.height.saturating_sub(2)).max(1)
}
