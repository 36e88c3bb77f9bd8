use cumulus::{Component, Context, Event, Action, Entity, AppContext, Page};
use crate::model::CloudStore;
use crate::pages::{is_increment_key, nav_action, store_error};
use ratatui::{
    layout::{Layout, Constraint, Direction, Alignment},
    widgets::{Block, Borders, BorderType, Paragraph},
    style::{Style, Color, Modifier},
    text::{Line, Span},
};

pub struct HomePage {
    store: Entity<CloudStore>,
    visits: u32,
}

impl Page for HomePage {
    fn build(cx: &AppContext) -> cumulus::Result<Self> {
        Ok(Self {
            store: cx.use_store::<CloudStore>()?,
            visits: 0,
        })
    }
}

impl Component for HomePage {
    fn on_enter(&mut self, _cx: &mut Context<Self>) {
        self.visits += 1;
        tracing::debug!(visits = self.visits, "entered home");
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

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // Counter
                Constraint::Length(1), // Help
            ])
            .split(cx.area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("Home", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  visit #{}", self.visits), Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(title, chunks[0]);

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("cloud  ", Style::default().fg(Color::DarkGray)),
                Span::raw(cloud.cloud_name().to_string()),
            ]),
            Line::from(vec![
                Span::styled("count  ", Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{}", cloud.cloud_count()), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("double ", Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{}", cloud.double_cloud_count()), Style::default().fg(Color::Magenta)),
            ]),
        ];
        let counter = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default()
                .title(" Cloud ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded));
        frame.render_widget(counter, chunks[1]);

        let help = Paragraph::new(" + increment │ d detail │ e edit │ Esc back │ q quit ")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[2]);
    }

    fn handle_event(&mut self, event: Event, _cx: &mut Context<Self>) -> Option<Action> {
        match event {
            Event::Key(key) if is_increment_key(key.code) => {
                if let Err(e) = self.store.update(CloudStore::increment) {
                    tracing::error!(error = %e, "increment failed");
                }
                None
            }
            Event::Key(key) => nav_action(key.code),
            _ => None,
        }
    }
}
