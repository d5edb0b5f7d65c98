use crossterm::event::KeyCode;
use ratatui::{
    prelude::{Alignment, Buffer, Constraint, Layout, Rect, Widget},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{hotkey::Hotkey, hotkey_view::HotkeyView};

pub const FILTER_HOTKEYS: [Hotkey; 9] = [
    Hotkey {
        keycode: KeyCode::Char('a'),
        description: "Add Row",
    },
    Hotkey {
        keycode: KeyCode::Char('x'),
        description: "Remove Row",
    },
    Hotkey {
        keycode: KeyCode::Tab,
        description: "Next Column",
    },
    Hotkey {
        keycode: KeyCode::Enter,
        description: "Edit",
    },
    Hotkey {
        keycode: KeyCode::Char(' '),
        description: "Toggle",
    },
    Hotkey {
        keycode: KeyCode::Char('r'),
        description: "Run",
    },
    Hotkey {
        keycode: KeyCode::Char('c'),
        description: "Cancel",
    },
    Hotkey {
        keycode: KeyCode::BackTab,
        description: "Results",
    },
    Hotkey {
        keycode: KeyCode::Char('q'),
        description: "Quit",
    },
];

pub const RESULTS_HOTKEYS: [Hotkey; 8] = [
    Hotkey {
        keycode: KeyCode::Char('n'),
        description: "Next Page",
    },
    Hotkey {
        keycode: KeyCode::Char('p'),
        description: "Prev Page",
    },
    Hotkey {
        keycode: KeyCode::Char('f'),
        description: "First Page",
    },
    Hotkey {
        keycode: KeyCode::Char('l'),
        description: "Last Page",
    },
    Hotkey {
        keycode: KeyCode::Char('s'),
        description: "Page Size",
    },
    Hotkey {
        keycode: KeyCode::Char(' '),
        description: "Select",
    },
    Hotkey {
        keycode: KeyCode::BackTab,
        description: "Filters",
    },
    Hotkey {
        keycode: KeyCode::Char('q'),
        description: "Quit",
    },
];

pub struct TopBarView<'a> {
    pub object_type: &'a str,
    pub primary_field: &'a str,
    pub busy: bool,
    pub hotkeys: &'a [Hotkey<'a>],
    pub app_name: &'a str,
}

impl Widget for TopBarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [info, hotkeys, name] = Layout::horizontal([
            Constraint::Percentage(25),
            Constraint::Percentage(55),
            Constraint::Percentage(20),
        ])
        .spacing(1)
        .areas(area);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Object: ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.object_type),
            ]),
            Line::from(vec![
                Span::styled("Primary: ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.primary_field),
            ]),
        ];
        if self.busy {
            lines.push(Line::from(Span::styled(
                "Loading…",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        Paragraph::new(lines).render(info, buf);

        HotkeyView {
            hotkeys: self.hotkeys,
        }
        .render(hotkeys, buf);

        Paragraph::new(self.app_name.trim_start())
            .alignment(Alignment::Right)
            .render(name, buf);
    }
}
