use fltr_filters::Pagination;
use ratatui::{
    prelude::{Buffer, Rect, Widget},
    style::{Color, Style},
    text::{Line, Span},
};

/// `« ‹ Page 2 of 3 › »` with the page size and record count
pub struct PaginationBar<'a> {
    pub pagination: &'a Pagination,
}

fn control(label: &'static str, disabled: bool) -> Span<'static> {
    let style = if disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Span::styled(label, style)
}

impl PaginationBar<'_> {
    fn line(&self) -> Line<'static> {
        let p = self.pagination;
        let first_disabled = p.is_first_disabled();
        let last_disabled = p.is_last_disabled();
        Line::from(vec![
            control("« ", first_disabled),
            control("‹ ", first_disabled),
            Span::raw(format!(
                "Page {} of {}",
                p.page_number(),
                p.total_pages()
            )),
            control(" ›", last_disabled),
            control(" »", last_disabled),
            Span::styled(
                format!(
                    "   {} per page   {} records",
                    p.page_size(),
                    p.total_records()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }
}

impl Widget for PaginationBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.line().centered().render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_label() {
        let mut pagination = Pagination::new(23, 10);
        pagination.next();
        let line = PaginationBar {
            pagination: &pagination,
        }
        .line();
        assert_eq!(
            text(&line),
            "« ‹ Page 2 of 3 › »   10 per page   23 records"
        );
    }

    #[test]
    fn test_empty_disables_both_ends() {
        let pagination = Pagination::default();
        let line = PaginationBar {
            pagination: &pagination,
        }
        .line();
        assert_eq!(line.spans[0].style.fg, Some(Color::DarkGray));
        assert_eq!(line.spans[4].style.fg, Some(Color::DarkGray));
        assert!(text(&line).contains("Page 1 of 0"));
    }
}
