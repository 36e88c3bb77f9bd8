use cumulus::{Component, Context, Event, Action, Entity, AppContext, Page};
use crate::model::CloudStore;
use crate::pages::{is_increment_key, nav_action, store_error};
use ratatui::{
    layout::{Layout, Constraint, Direction, Alignment, Position, Rect},
    widgets::{Block, Borders, BorderType, Paragraph},
    style::{Style, Color, Modifier},
    text::Line,
};
use crossterm::event::{MouseButton, MouseEventKind};

pub struct CloudEditPage {
    store: Entity<CloudStore>,
    /// Where the increment button was last drawn, for mouse hits.
    button: Rect,
}

impl Page for CloudEditPage {
    fn build(cx: &AppContext) -> cumulus::Result<Self> {
        Ok(Self {
            store: cx.use_store::<CloudStore>()?,
            button: Rect::default(),
        })
    }
}

impl CloudEditPage {
    fn increment(&self) {
        if let Err(e) = self.store.update(CloudStore::increment) {
            tracing::error!(error = %e, "increment failed");
        }
    }
}

impl Component for CloudEditPage {
    fn on_exit(&mut self, _cx: &mut Context<Self>) {
        self.button = Rect::default();
    }

    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        cx.subscribe(&self.store);
        let cloud = match self.store.read(CloudStore::clone) {
            Ok(cloud) => cloud,
            Err(e) => {
                frame.render_widget(store_error(&e), cx.area);
                return;
            }
        };

        let block = Block::default()
            .title(format!(" Edit {} ", cloud.cloud_name()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(cx.area);
        frame.render_widget(block, cx.area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2), // Values
                Constraint::Length(3), // Button
                Constraint::Min(0),
            ])
            .split(inner);

        let values = Paragraph::new(vec![
            Line::from(format!("cloudCount: {}", cloud.cloud_count())),
            Line::from(format!("doubleCloudCount: {}", cloud.double_cloud_count())),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(values, chunks[0]);

        let button_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(16), Constraint::Min(0)])
            .split(chunks[1]);
        self.button = button_row[1];

        let button = Paragraph::new("increment")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Thick));
        frame.render_widget(button, self.button);
    }

    fn handle_event(&mut self, event: Event, _cx: &mut Context<Self>) -> Option<Action> {
        match event {
            Event::Key(key) if is_increment_key(key.code) => {
                self.increment();
                None
            }
            Event::Key(key) => nav_action(key.code),
            Event::Mouse(mouse) => {
                if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                    && self.button.contains(Position::new(mouse.column, mouse.row))
                {
                    self.increment();
                }
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_support::{app, cx, key, render_text};
    use crossterm::event::{KeyCode, KeyModifiers, MouseEvent};

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn count(app: &AppContext) -> i64 {
        app.use_store::<CloudStore>().unwrap().read(CloudStore::cloud_count).unwrap()
    }

    #[test]
    fn test_renders_counts() {
        let app = app();
        let mut page = CloudEditPage::build(&app).unwrap();
        let text = render_text(&mut page, &app);
        assert!(text.contains("cloudCount: 5"), "{text}");
        assert!(text.contains("doubleCloudCount: 10"), "{text}");
        assert!(text.contains("increment"), "{text}");
    }

    #[test]
    fn test_keyboard_increment() {
        let app = app();
        let mut page = CloudEditPage::build(&app).unwrap();
        let mut cx = cx::<CloudEditPage>(&app);
        page.handle_event(key(KeyCode::Enter), &mut cx);
        page.handle_event(key(KeyCode::Char(' ')), &mut cx);
        assert_eq!(count(&app), 7);
    }

    #[test]
    fn test_click_on_button_increments() {
        let app = app();
        let mut page = CloudEditPage::build(&app).unwrap();
        render_text(&mut page, &app);
        let mut cx = cx::<CloudEditPage>(&app);

        let button = page.button;
        assert!(button.width > 0);
        page.handle_event(click(button.x + 1, button.y + 1), &mut cx);
        assert_eq!(count(&app), 6);

        // Outside the button
        page.handle_event(click(0, 0), &mut cx);
        assert_eq!(count(&app), 6);
    }

    #[test]
    fn test_click_before_render_is_ignored() {
        let app = app();
        let mut page = CloudEditPage::build(&app).unwrap();
        let mut cx = cx::<CloudEditPage>(&app);
        page.handle_event(click(0, 0), &mut cx);
        assert_eq!(count(&app), 5);
    }
}
