//! Navigation chrome drawn around the active page.

use super::table::RouteTable;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Tabs};
use ratatui::Frame;

/// Render a tab bar with one tab per route and, when the last navigation
/// failed, a status line naming the unmatched path.
///
/// Returns the area left for the page.
pub fn render_nav<V: PartialEq>(
    frame: &mut Frame,
    area: Rect,
    table: &RouteTable<V>,
    current: &V,
    not_found: Option<&str>,
) -> Rect {
    let status_height = if not_found.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(status_height),
        ])
        .split(area);

    let titles: Vec<Line> = table
        .iter()
        .map(|entry| Line::from(format!(" {} ", entry.name)))
        .collect();
    let selected = table.iter().position(|entry| &entry.view == current).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD))
        .divider("│");
    frame.render_widget(tabs, chunks[0]);

    if let Some(path) = not_found {
        let status = Paragraph::new(format!(" 404: no route matches '{}'", path))
            .style(Style::default().fg(Color::Red));
        frame.render_widget(status, chunks[2]);
    }

    chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RouteEntry;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum View {
        Home,
        Detail,
    }

    fn table() -> RouteTable<View> {
        RouteTable::new(vec![
            RouteEntry::new("", "home", View::Home),
            RouteEntry::new("/detail", "detail", View::Detail),
        ])
        .unwrap()
    }

    fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_tabs_list_routes_in_order() {
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        let mut body = Rect::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                body = render_nav(frame, area, &table(), &View::Detail, None);
            })
            .unwrap();

        let top = row(&terminal, 0);
        let home = top.find("home").unwrap();
        let detail = top.find("detail").unwrap();
        assert!(home < detail);
        assert_eq!(body, Rect::new(0, 1, 40, 4));
    }

    #[test]
    fn test_not_found_status_line() {
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        let mut body = Rect::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                body = render_nav(frame, area, &table(), &View::Home, Some("/nope"));
            })
            .unwrap();

        assert!(row(&terminal, 4).contains("404: no route matches '/nope'"));
        assert_eq!(body, Rect::new(0, 1, 40, 3));
    }
}
