pub mod home;
pub mod detail;
pub mod cloud_edit;

pub use home::HomePage;
pub use detail::DetailPage;
pub use cloud_edit::CloudEditPage;

use cumulus::Action;
use crossterm::event::KeyCode;
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

/// Keys shared by every page: route shortcuts, back and quit.
pub fn nav_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('h') => Some(Action::navigate("/")),
        KeyCode::Char('d') => Some(Action::navigate("/detail")),
        KeyCode::Char('e') => Some(Action::navigate("/cloudEdit")),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

pub fn is_increment_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('+') | KeyCode::Char(' ') | KeyCode::Enter)
}

/// Shown in place of a page whose store could not be read.
pub fn store_error(err: &cumulus::Error) -> Paragraph<'static> {
    Paragraph::new(format!("cloud store unavailable: {err}"))
        .style(Style::default().fg(Color::Red))
}
