//! Detail view: the store's values plus a log of every change observed
//! while the app runs.

use cumulus::{Component, Context, Event, Action, Entity, AppContext, Page, Subscription};
use crate::model::CloudStore;
use crate::pages::{is_increment_key, nav_action, store_error};
use ratatui::{
    layout::{Layout, Constraint, Direction},
    widgets::{Block, Borders, BorderType, List, ListItem, Row, Table},
    style::{Style, Color, Modifier},
};
use std::collections::VecDeque;

const MAX_CHANGES: usize = 8;

#[derive(Clone, Default)]
pub struct DetailState {
    /// `(count, double)` after each change, newest last.
    pub changes: VecDeque<(i64, i64)>,
}

pub struct DetailPage {
    store: Entity<CloudStore>,
    local: Entity<DetailState>,
    observer: Option<Subscription>,
}

impl Page for DetailPage {
    fn build(cx: &AppContext) -> cumulus::Result<Self> {
        Ok(Self {
            store: cx.use_store::<CloudStore>()?,
            local: cx.new_entity(DetailState::default()),
            observer: None,
        })
    }
}

impl Component for DetailPage {
    fn on_mount(&mut self, _cx: &mut Context<Self>) {
        let local = self.local.clone();
        let observer = self.store.observe(move |cloud| {
            let change = (cloud.cloud_count(), cloud.double_cloud_count());
            let logged = local.update(|s| {
                s.changes.push_back(change);
                if s.changes.len() > MAX_CHANGES {
                    s.changes.pop_front();
                }
            });
            if let Err(e) = logged {
                tracing::error!(error = %e, "failed to record cloud change");
            }
        });
        match observer {
            Ok(sub) => self.observer = Some(sub),
            Err(e) => tracing::error!(error = %e, "failed to observe cloud store"),
        }
    }

    fn on_shutdown(&mut self, _cx: &mut Context<Self>) {
        self.observer = None;
    }

    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        cx.subscribe(&self.store);
        cx.subscribe(&self.local);
        let cloud = match self.store.read(CloudStore::clone) {
            Ok(cloud) => cloud,
            Err(e) => {
                frame.render_widget(store_error(&e), cx.area);
                return;
            }
        };
        let local = match self.local.read(DetailState::clone) {
            Ok(local) => local,
            Err(e) => {
                tracing::error!(error = %e, "failed to read change log");
                DetailState::default()
            }
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(cx.area);

        let rows = vec![
            Row::new(vec!["name".to_string(), cloud.cloud_name().to_string()]),
            Row::new(vec!["count".to_string(), cloud.cloud_count().to_string()]),
            Row::new(vec!["double".to_string(), cloud.double_cloud_count().to_string()]),
        ];
        let table = Table::new(rows, [Constraint::Length(8), Constraint::Min(0)])
            .header(Row::new(vec!["field", "value"]).style(Style::default().add_modifier(Modifier::BOLD)))
            .block(Block::default()
                .title(" Detail ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)));
        frame.render_widget(table, chunks[0]);

        let items: Vec<ListItem> = local.changes.iter()
            .rev()
            .map(|(count, double)| ListItem::new(format!("{count} → {double}")))
            .collect();
        let list = List::new(items)
            .block(Block::default()
                .title(" Changes ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded));
        frame.render_widget(list, chunks[1]);
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
