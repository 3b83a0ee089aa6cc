use crate::{keymap::Keymaps, theme::Theme};
use gantry_core::{
    config::{Command, KeyContext},
    enablement::MenuEnablementSink,
    menu::MenuEvent,
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::collections::HashMap;

/// One-line menu of every [`MenuEvent`]. Items are enabled unless told otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuBar {
    enabled: HashMap<String, bool>,
}

impl MenuBar {
    pub fn is_enabled(&self, command_id: &str) -> bool {
        self.enabled.get(command_id).copied().unwrap_or(true)
    }
}

impl MenuEnablementSink for MenuBar {
    fn set_enabled(&mut self, command_id: &str, enabled: bool) {
        if self.enabled.get(command_id) != Some(&enabled) {
            log::debug!("menu item {command_id} enabled={enabled}");
            self.enabled.insert(command_id.to_string(), enabled);
        }
    }
}

pub fn draw(f: &mut Frame, area: Rect, menu_bar: &MenuBar, keymaps: &Keymaps, theme: &Theme) {
    let mut spans = Vec::new();
    for event in MenuEvent::ALL {
        let key = keymaps.label(KeyContext::Sidebar, Command::Menu(event), "");
        let (key_style, label_style) = if menu_bar.is_enabled(event.name()) {
            (
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
                Style::default(),
            )
        } else {
            let muted = Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::DIM);
            (muted, muted)
        };
        if !key.is_empty() {
            spans.push(Span::styled(key, key_style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(event.label(), label_style));
        spans.push(Span::raw("  "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_util::render;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_items_default_to_enabled() {
        let bar = MenuBar::default();
        assert!(bar.is_enabled("rename-branch"));
        assert!(bar.is_enabled("push"));
    }

    #[test]
    fn test_set_enabled_is_idempotent() {
        let mut once = MenuBar::default();
        once.set_enabled("delete-branch", false);

        let mut twice = MenuBar::default();
        twice.set_enabled("delete-branch", false);
        twice.set_enabled("delete-branch", false);

        assert_eq!(once, twice);
        assert!(!twice.is_enabled("delete-branch"));
    }

    #[test]
    fn test_draw_lists_labels() {
        let output = render(200, 1, |f| {
            draw(
                f,
                f.area(),
                &MenuBar::default(),
                &Keymaps::default(),
                &Theme::default(),
            );
        });
        for event in MenuEvent::ALL {
            assert!(output.contains(event.label()), "missing {}", event.label());
        }
    }

    #[test]
    fn test_disabled_items_are_greyed() {
        let mut bar = MenuBar::default();
        bar.set_enabled("rename-branch", false);
        let theme = Theme::default();

        let mut terminal = Terminal::new(TestBackend::new(200, 1)).unwrap();
        terminal
            .draw(|f| draw(f, f.area(), &bar, &Keymaps::default(), &theme))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let line: String = (0..200).map(|x| buffer[(x, 0)].symbol().to_string()).collect();
        let label = MenuEvent::RenameBranch.label();
        let col = u16::try_from(line.find(label).unwrap()).unwrap();

        assert_eq!(buffer[(col, 0)].fg, theme.muted);
        let push_col = u16::try_from(line.find(MenuEvent::Push.label()).unwrap()).unwrap();
        assert_ne!(buffer[(push_col, 0)].fg, theme.muted);
    }
}
