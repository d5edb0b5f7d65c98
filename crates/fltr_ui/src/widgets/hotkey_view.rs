use ratatui::{
    prelude::{Buffer, Rect, Widget},
    style::{Color, Style},
    text::{Line, Span},
};

use super::hotkey::Hotkey;

/// Hotkeys laid out in columns, top to bottom
pub struct HotkeyView<'a> {
    pub hotkeys: &'a [Hotkey<'a>],
}

const COLUMN_WIDTH: u16 = 22;

impl Widget for HotkeyView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut y = area.y;
        let mut x = area.x;
        let max_y = area.y + area.height;
        let max_x = area.x + area.width;

        for hotkey in self.hotkeys {
            if y >= max_y {
                x += COLUMN_WIDTH;
                y = area.y;
            }
            if x >= max_x {
                break;
            }

            let width = COLUMN_WIDTH.min(max_x - x);
            Line::from(vec![
                Span::styled(
                    format!("<{hotkey}> "),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(hotkey.description),
            ])
            .render(Rect::new(x, y, width, 1), buf);

            y += 1;
        }
    }
}
