use crate::application::{AppContext, Context};
use std::any::Any;

/// Input delivered to the active view.
#[derive(Debug, Clone)]
pub enum Event {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize(u16, u16),
    FocusGained,
    FocusLost,
    Paste(String),
    Custom(String),
}

/// What a view asks the application to do after handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Go to the route matching this path.
    Navigate(String),
    /// Return to the previously active route.
    Back,
    Quit,
    Noop,
}

impl Action {
    pub fn navigate(path: impl Into<String>) -> Self {
        Action::Navigate(path.into())
    }
}

/// A view: draws itself and reacts to input.
///
/// Hooks run in this order over a session: `on_mount` once for every view,
/// then `on_enter`/`on_exit` each time routing makes the view active or
/// inactive, and `on_shutdown` once before the application exits.
pub trait Component: Send + Sync + 'static {
    fn on_mount(&mut self, cx: &mut Context<Self>) {
        let _ = cx;
    }

    fn on_enter(&mut self, cx: &mut Context<Self>) {
        let _ = cx;
    }

    fn on_exit(&mut self, cx: &mut Context<Self>) {
        let _ = cx;
    }

    fn on_shutdown(&mut self, cx: &mut Context<Self>) {
        let _ = cx;
    }

    /// Draw into `cx.area`.
    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>);

    fn handle_event(&mut self, event: Event, cx: &mut Context<Self>) -> Option<Action> {
        let _ = (event, cx);
        None
    }
}

/// A component that can be bound to a route.
///
/// Pages are built once per session, with access to the application's
/// shared stores.
pub trait Page: Component + Sized {
    fn build(cx: &AppContext) -> crate::Result<Self>;
}

/// Object-safe form of [`Component`], used for the application root.
pub trait AnyComponent: Any + Send + Sync + 'static {
    fn on_mount_any(&mut self, cx: &mut Context<dyn AnyComponent>);
    fn on_enter_any(&mut self, cx: &mut Context<dyn AnyComponent>);
    fn on_shutdown_any(&mut self, cx: &mut Context<dyn AnyComponent>);
    fn render_any(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<dyn AnyComponent>);
    fn handle_event_any(&mut self, event: Event, cx: &mut Context<dyn AnyComponent>) -> Option<Action>;
}

impl<T: Component> AnyComponent for T {
    fn on_mount_any(&mut self, cx: &mut Context<dyn AnyComponent>) {
        let mut cx = cx.cast::<Self>();
        self.on_mount(&mut cx);
    }

    fn on_enter_any(&mut self, cx: &mut Context<dyn AnyComponent>) {
        let mut cx = cx.cast::<Self>();
        self.on_enter(&mut cx);
    }

    fn on_shutdown_any(&mut self, cx: &mut Context<dyn AnyComponent>) {
        let mut cx = cx.cast::<Self>();
        self.on_shutdown(&mut cx);
    }

    fn render_any(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<dyn AnyComponent>) {
        let mut cx = cx.cast::<Self>();
        self.render(frame, &mut cx);
    }

    fn handle_event_any(&mut self, event: Event, cx: &mut Context<dyn AnyComponent>) -> Option<Action> {
        let mut cx = cx.cast::<Self>();
        self.handle_event(event, &mut cx)
    }
}
