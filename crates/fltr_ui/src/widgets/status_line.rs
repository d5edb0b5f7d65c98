use fltr_filters::{Toast, ToastVariant};
use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Paragraph, Widget},
};

/// Bottom line showing the latest toast
#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    toast: Option<Toast>,
}

impl StatusLine {
    #[must_use]
    pub const fn new() -> Self {
        Self { toast: None }
    }

    pub fn set_toast(&mut self, toast: Toast) {
        self.toast = Some(toast);
    }

    #[must_use]
    pub const fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        self.toast.as_ref().map_or("", |toast| toast.message.as_str())
    }

    pub fn clear(&mut self) {
        self.toast = None;
    }
}

const fn variant_color(variant: ToastVariant) -> Color {
    match variant {
        ToastVariant::Info => Color::Cyan,
        ToastVariant::Success => Color::Green,
        ToastVariant::Warning => Color::Yellow,
        ToastVariant::Error => Color::Red,
    }
}

impl Widget for &StatusLine {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let line = self.toast.as_ref().map_or_else(
            || Line::from(" "),
            |toast| {
                let color = variant_color(toast.variant);
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", toast.title),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(toast.message.as_str(), Style::default().fg(color)),
                ])
            },
        );

        Paragraph::new(line)
            .wrap(ratatui::widgets::Wrap { trim: true })
            .render(area, buf);
    }
}
