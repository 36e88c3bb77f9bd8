//! High‑level Application abstraction inspired by GPUI.

use crate::component::traits::{Action, AnyComponent, Component, Event};
use crate::config::AppConfig;
use crate::error::{Error, TerminalSnafu};
use crate::state::{Entity, EntityId};
use crate::store::Store;
use ratatui::prelude::*;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use snafu::ResultExt;
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::io::{self, stdout, Write};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

type Globals = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Application context providing access to global services.
#[derive(Clone)]
pub struct AppContext {
    /// The root component to render, if set by the user.
    root: Arc<Mutex<Option<Arc<Mutex<dyn AnyComponent>>>>>,
    /// Internal: Channel to trigger a re-render.
    re_render_tx: mpsc::UnboundedSender<()>,
    /// Session-wide values keyed by type (stores live here).
    globals: Arc<Mutex<Globals>>,
    /// Entities already forwarding their changes to the render loop.
    subscribed: Arc<Mutex<HashSet<EntityId>>>,
    config: Arc<AppConfig>,
}

impl AppContext {
    /// Create a detached context and the receiving end of its re-render channel.
    ///
    /// [`Application::run`] builds one per session; tests can build their own.
    pub fn new(config: AppConfig) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (re_render_tx, re_render_rx) = mpsc::unbounded_channel();
        let cx = Self {
            root: Arc::new(Mutex::new(None)),
            re_render_tx,
            globals: Arc::new(Mutex::new(HashMap::new())),
            subscribed: Arc::new(Mutex::new(HashSet::new())),
            config: Arc::new(config),
        };
        (cx, re_render_rx)
    }

    /// The configuration this session was started with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Create a new entity with the given value.
    pub fn new_entity<T>(&self, value: T) -> Entity<T>
    where
        T: Send + Sync + 'static,
    {
        Entity::new(value)
    }

    /// Return the session's value of type `T`, inserting `f()` on first access.
    ///
    /// `f` runs without the registry lock held, so it may itself use the registry.
    pub fn get_or_insert_with<T, F>(&self, f: F) -> crate::Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        let key = TypeId::of::<T>();
        {
            let globals = self.globals.lock().map_err(|_| Error::LockPoisoned)?;
            if let Some(value) = globals.get(&key).and_then(|v| v.downcast_ref::<T>()) {
                return Ok(value.clone());
            }
        }

        let value = f();
        let mut globals = self.globals.lock().map_err(|_| Error::LockPoisoned)?;
        let stored = globals.entry(key).or_insert_with(|| Box::new(value));
        // Keyed by TypeId::of::<T>(), the downcast always succeeds.
        Ok(stored
            .downcast_ref::<T>()
            .cloned()
            .unwrap_or_else(|| unreachable!("global registered under a foreign TypeId")))
    }

    /// Return the session's instance of store `S`, creating it on first access.
    pub fn use_store<S: Store>(&self) -> crate::Result<Entity<S>> {
        self.get_or_insert_with(|| {
            tracing::debug!(store = S::ID, "creating store");
            Entity::new(S::init())
        })
    }

    /// Set the root component of the application.
    pub fn set_root<C: Component>(&self, root: C) -> crate::Result<()> {
        let root: Arc<Mutex<dyn AnyComponent>> = Arc::new(Mutex::new(root));
        let mut guard = self.root.lock().map_err(|_| Error::LockPoisoned)?;
        *guard = Some(root);
        self.refresh();
        Ok(())
    }

    /// Trigger a re-render.
    pub fn refresh(&self) {
        let _ = self.re_render_tx.send(());
    }
}

/// A specialized context passed to component methods.
pub struct Context<V: ?Sized + Send + Sync> {
    pub app: AppContext,
    pub area: Rect,
    view: PhantomData<fn(&V)>,
}

impl<V: ?Sized + Send + Sync> Context<V> {
    pub fn new(app: AppContext, area: Rect) -> Self {
        Self {
            app,
            area,
            view: PhantomData,
        }
    }

    /// Access the underlying AppContext.
    pub fn app(&self) -> &AppContext {
        &self.app
    }

    /// Re-render whenever `entity` changes.
    ///
    /// Safe to call on every render: each entity is forwarded at most once per
    /// session. Outside a tokio runtime this is a no-op.
    pub fn subscribe<T>(&mut self, entity: &Entity<T>)
    where
        T: Send + Sync + 'static,
    {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let Ok(mut subscribed) = self.app.subscribed.lock() else {
            return;
        };
        if !subscribed.insert(entity.entity_id()) {
            return;
        }
        drop(subscribed);

        let mut rx = entity.subscribe();
        let tx = self.app.re_render_tx.clone();
        runtime.spawn(async move {
            while rx.changed().await.is_ok() {
                if tx.send(()).is_err() {
                    break;
                }
            }
        });
    }

    /// Cast this context to another view type.
    pub fn cast<U: ?Sized + Send + Sync + 'static>(&self) -> Context<U> {
        Context::new(self.app.clone(), self.area)
    }

    /// Explicitly trigger a re-render.
    pub fn notify(&self) {
        self.app.refresh();
    }
}

/// Main application handle.
pub struct Application {
    config: AppConfig,
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl Application {
    /// Create a new application instance with default settings.
    pub fn new() -> Self {
        Self { config: AppConfig::default() }
    }

    /// Use the given configuration instead of the defaults.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the application with the given closure that receives a context.
    pub fn run<F>(self, setup: F) -> anyhow::Result<()>
    where
        F: FnOnce(&AppContext) -> anyhow::Result<()>,
    {
        let rt = Runtime::new().map_err(|e| anyhow::anyhow!("Failed to start tokio: {}", e))?;

        let (app_context, re_render_rx) = AppContext::new(self.config.clone());

        let guard = rt.enter();
        setup(&app_context)?;
        drop(guard);

        let actual_root = {
            let guard = app_context.root.lock().map_err(|_| Error::LockPoisoned)?;
            guard.clone().unwrap_or_else(|| Arc::new(Mutex::new(DummyView)))
        };

        rt.block_on(async move {
            self.run_loop(app_context, actual_root, re_render_rx).await
        })
    }

    async fn run_loop(&self, app: AppContext, root: Arc<Mutex<dyn AnyComponent>>, re_render_rx: mpsc::UnboundedReceiver<()>) -> anyhow::Result<()> {
        let mouse_capture = self.config.mouse_capture;
        enable_raw_mode().context(TerminalSnafu)?;
        let mut terminal = match enter_terminal(mouse_capture) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = restore_terminal(&mut stdout(), mouse_capture);
                return Err(e.into());
            }
        };

        let result = self.run_app_loop(app, &mut terminal, root, re_render_rx).await;

        let restored = restore_terminal(terminal.backend_mut(), mouse_capture)
            .and(terminal.show_cursor().context(TerminalSnafu));

        if let Err(e) = &result {
            tracing::error!(error = %e, "application loop failed");
        }
        result?;
        restored?;
        Ok(())
    }

    async fn run_app_loop(
        &self,
        app: AppContext,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        root: Arc<Mutex<dyn AnyComponent>>,
        mut re_render_rx: mpsc::UnboundedReceiver<()>,
    ) -> anyhow::Result<()> {
        let tick_rate = self.config.tick_rate();

        // Lifecycle: mount everything, then enter the initial view
        {
            let size = terminal.size()?;
            let area = Rect::new(0, 0, size.width, size.height);
            let mut guard = root.lock().map_err(|_| Error::LockPoisoned)?;
            let mut cx = Context::<dyn AnyComponent>::new(app.clone(), area);
            guard.on_mount_any(&mut cx);
            guard.on_enter_any(&mut cx);
        }
        tracing::info!("application started");

        // Initial render
        app.refresh();

        loop {
            tokio::select! {
                Some(()) = re_render_rx.recv() => {
                    // Coalesce queued requests into one frame
                    while re_render_rx.try_recv().is_ok() {}

                    let mut guard = root.lock().map_err(|_| Error::LockPoisoned)?;
                    terminal.draw(|frame| {
                        let area = frame.area();
                        let mut cx = Context::<dyn AnyComponent>::new(app.clone(), area);
                        guard.render_any(frame, &mut cx);
                    })?;
                }
                event_ready = async { event::poll(tick_rate) } => {
                    if let Ok(true) = event_ready {
                        let crossterm_event = event::read()?;
                        let internal_event = match crossterm_event {
                            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
                            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
                            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                            CrosstermEvent::FocusGained => Some(Event::FocusGained),
                            CrosstermEvent::FocusLost => Some(Event::FocusLost),
                            CrosstermEvent::Paste(s) => Some(Event::Paste(s)),
                            _ => None,
                        };

                        if let Some(event) = internal_event {
                            let size = terminal.size()?;
                            let area = Rect::new(0, 0, size.width, size.height);
                            let mut cx = Context::<dyn AnyComponent>::new(app.clone(), area);

                            let mut guard = root.lock().map_err(|_| Error::LockPoisoned)?;
                            let action = guard.handle_event_any(event, &mut cx);
                            app.refresh(); // Trigger refresh after any event handling

                            if let Some(Action::Quit) = action {
                                // Lifecycle: Call on_shutdown
                                guard.on_shutdown_any(&mut cx);
                                tracing::info!("application shutting down");
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
    }
}

fn enter_terminal(mouse_capture: bool) -> crate::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, event::EnableFocusChange).context(TerminalSnafu)?;
    if mouse_capture {
        execute!(stdout, EnableMouseCapture).context(TerminalSnafu)?;
    }
    Terminal::new(CrosstermBackend::new(stdout)).context(TerminalSnafu)
}

/// Undo raw mode, the alternate screen and mouse capture.
///
/// Every step runs even if an earlier one fails; the first error is returned.
fn restore_terminal<W: Write>(out: &mut W, mouse_capture: bool) -> crate::Result<()> {
    let mut steps = vec![
        disable_raw_mode(),
        execute!(out, LeaveAlternateScreen, event::DisableFocusChange),
    ];
    if mouse_capture {
        steps.push(execute!(out, DisableMouseCapture));
    }
    steps.into_iter().collect::<io::Result<Vec<()>>>().context(TerminalSnafu)?;
    Ok(())
}

struct DummyView;

impl Component for DummyView {
    fn render(&mut self, frame: &mut ratatui::Frame, cx: &mut Context<Self>) {
        let paragraph = ratatui::widgets::Paragraph::new("No component set")
            .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(paragraph, cx.area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default, PartialEq, Debug)]
    struct Settings {
        theme: &'static str,
    }

    struct Tally {
        hits: u32,
    }

    impl Store for Tally {
        const ID: &'static str = "tally";

        fn init() -> Self {
            Self { hits: 3 }
        }
    }

    fn app() -> AppContext {
        AppContext::new(AppConfig::default()).0
    }

    #[test]
    fn test_get_or_insert_with_inserts_once() {
        let cx = app();
        let first = cx.get_or_insert_with(|| Settings { theme: "dark" }).unwrap();
        let second = cx.get_or_insert_with(|| Settings { theme: "light" }).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.theme, "dark");
    }

    #[test]
    fn test_get_or_insert_with_is_reentrant() {
        let cx = app();
        let inner = cx.clone();
        let outer = cx
            .get_or_insert_with(|| {
                let settings = inner.get_or_insert_with(Settings::default).unwrap();
                (settings.theme.len(), 1u8)
            })
            .unwrap();
        assert_eq!(outer, (0, 1));
    }

    #[test]
    fn test_use_store_returns_same_instance() {
        let cx = app();
        let a = cx.use_store::<Tally>().unwrap();
        let b = cx.clone().use_store::<Tally>().unwrap();
        assert_eq!(a.entity_id(), b.entity_id());

        a.update(|t| t.hits += 1).unwrap();
        assert_eq!(b.read(|t| t.hits).unwrap(), 4);
    }

    #[test]
    fn test_sessions_do_not_share_stores() {
        let a = app().use_store::<Tally>().unwrap();
        let b = app().use_store::<Tally>().unwrap();
        assert_ne!(a.entity_id(), b.entity_id());
    }

    #[test]
    fn test_context_carries_config() {
        let config = AppConfig { initial_path: "/detail".into(), ..AppConfig::default() };
        let (cx, _rx) = AppContext::new(config);
        assert_eq!(cx.config().initial_path, "/detail");
    }

    #[tokio::test]
    async fn test_subscribe_forwards_changes_once() {
        let (cx, mut rx) = AppContext::new(AppConfig::default());
        let entity = cx.new_entity(0u32);
        let mut ctx = Context::<DummyView>::new(cx.clone(), Rect::default());

        // Subscribing repeatedly (as render does) must not multiply re-renders
        ctx.subscribe(&entity);
        ctx.subscribe(&entity);

        entity.update(|n| *n += 1).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .expect("re-render requested")
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }

    /// Fails the first `failures` writes, then accepts everything.
    struct FlakyWriter {
        failures: usize,
        written: Vec<u8>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(io::Error::other("terminal gone"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_restore_terminal_writes_every_step() {
        let mut out = FlakyWriter { failures: 0, written: Vec::new() };
        restore_terminal(&mut out, true).unwrap();

        let written = String::from_utf8(out.written).unwrap();
        assert!(written.contains("\x1b[?1049l"), "{written:?}");
        assert!(written.contains("\x1b[?1000l"), "{written:?}");
    }

    #[test]
    fn test_restore_terminal_continues_after_failure() {
        let mut out = FlakyWriter { failures: 1, written: Vec::new() };
        let err = restore_terminal(&mut out, true).unwrap_err();
        assert!(matches!(err, Error::TerminalError { .. }));

        // Mouse capture is still released after the screen step failed
        let written = String::from_utf8(out.written).unwrap();
        assert!(written.contains("\x1b[?1000l"), "{written:?}");
    }

    #[test]
    fn test_refresh_requests_render() {
        let (cx, mut rx) = AppContext::new(AppConfig::default());
        cx.refresh();
        assert!(rx.try_recv().is_ok());
        cx.set_root(DummyView).unwrap();
        assert!(rx.try_recv().is_ok());
    }
}
