//! Routing utilities for component navigation.
//!
//! Provides `Router` for managing navigation history, the `define_routes!`
//! macro for route enums backed by a [`RouteTable`](super::RouteTable), and
//! `define_app!`, which wires pages to those routes.

/// A router that manages navigation history.
///
/// # Example
/// ```ignore
/// use cumulus::Router;
///
/// enum Route { Home, Detail }
///
/// let mut router = Router::new(Route::Home);
/// router.navigate(Route::Detail);
/// assert_eq!(router.current(), &Route::Detail);
/// router.go_back();
/// assert_eq!(router.current(), &Route::Home);
/// ```
#[derive(Debug, Clone)]
pub struct Router<R: Clone + PartialEq> {
    current: R,
    history: Vec<R>,
}

impl<R: Clone + PartialEq> Router<R> {
    /// Create a new router with the initial route.
    pub fn new(initial: R) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    /// Get the current route.
    pub fn current(&self) -> &R {
        &self.current
    }

    /// Navigate to a new route. The current route is pushed to history.
    pub fn navigate(&mut self, route: R) {
        if self.current != route {
            self.history.push(self.current.clone());
            self.current = route;
        }
    }

    /// Go back to the previous route. Returns true if successful.
    pub fn go_back(&mut self) -> bool {
        if let Some(prev) = self.history.pop() {
            self.current = prev;
            true
        } else {
            false
        }
    }

    /// Check if there's history to go back to.
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Get the history length.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Clear the navigation history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// Define a route enum together with its path/name table.
///
/// The first route is the default.
///
/// # Example
/// ```ignore
/// use cumulus::define_routes;
///
/// define_routes! {
///     pub enum Route {
///         Home => "" as "home",
///         Detail => "/detail" as "detail",
///     }
/// }
///
/// let table = Route::table()?;
/// assert_eq!(table.resolve("/detail")?.view, Route::Detail);
/// assert_eq!(Route::Detail.to_string(), "detail");
/// ```
#[macro_export]
macro_rules! define_routes {
    // Helper to get the first variant
    (@first $name:ident; $first:ident $(, $rest:ident)*) => {
        $name::$first
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $path:literal as $route_name:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        #[allow(dead_code)]
        impl $name {
            /// Every route, in table order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn path(&self) -> &'static str {
                match self {
                    $($name::$variant => $path),+
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $route_name),+
                }
            }

            /// Build the validated route table.
            pub fn table() -> $crate::Result<$crate::RouteTable<$name>> {
                $crate::RouteTable::new(vec![
                    $($crate::RouteEntry::new($path, $route_name, $name::$variant)),+
                ])
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $crate::define_routes!(@first $name; $($variant),+)
            }
        }
    };
}

/// Define an application with automatic routing and component dispatch.
///
/// This macro generates a Root component that handles:
/// - RootRoute enum and its validated route table
/// - Root struct with router and all page fields
/// - Root::new(cx), building every page through `Page::build`
/// - Complete Component implementation with routing and lifecycle dispatch
/// - Navigation action handling, including unmatched paths
///
/// Each line reads `Variant => "path" as "name" => field: PageType`. The
/// first route is the default; `AppConfig::initial_path` picks the route
/// shown at startup.
///
/// # Example
/// ```ignore
/// use cumulus::define_app;
/// use crate::pages::{HomePage, DetailPage};
///
/// define_app! {
///     Home => "" as "home" => home: HomePage,
///     Detail => "/detail" as "detail" => detail: DetailPage,
/// }
///
/// // In main.rs:
/// // cx.set_root(Root::new(cx)?)?;
/// ```
#[macro_export]
macro_rules! define_app {
    (
        $(
            $route:ident => $path:literal as $route_name:literal => $field:ident : $page:ty
        ),+ $(,)?
    ) => {
        $crate::define_routes! {
            /// Routes of the application.
            pub enum RootRoute {
                $($route => $path as $route_name),+
            }
        }

        pub struct Root {
            router: $crate::Router<RootRoute>,
            table: $crate::RouteTable<RootRoute>,
            not_found: Option<String>,
            $($field: $page),+
        }

        #[allow(dead_code)]
        impl Root {
            /// Create a new Root instance.
            /// Builds every page and validates the route table.
            pub fn new(cx: &$crate::AppContext) -> $crate::Result<Self> {
                let table = RootRoute::table()?;
                let initial_path = cx.config().initial_path.as_str();
                let (initial, not_found) = match table.resolve(initial_path) {
                    Ok(entry) => (entry.view, None),
                    Err(e) => {
                        $crate::__private::tracing::warn!(error = %e, "initial path not found, using default route");
                        (RootRoute::default(), Some(initial_path.to_string()))
                    }
                };

                Ok(Self {
                    router: $crate::Router::new(initial),
                    table,
                    not_found,
                    $($field: <$page as $crate::Page>::build(cx)?),+
                })
            }

            /// Get the current route
            pub fn current_route(&self) -> &RootRoute {
                self.router.current()
            }

            /// The validated route table.
            pub fn table(&self) -> &$crate::RouteTable<RootRoute> {
                &self.table
            }

            /// The path of the last navigation that matched no route, if it
            /// has not been followed by a successful one.
            pub fn not_found(&self) -> Option<&str> {
                self.not_found.as_deref()
            }

            /// Navigate to `path`, running exit/enter hooks.
            ///
            /// An unmatched path leaves the current route active and is
            /// remembered for the status line.
            pub fn navigate(&mut self, path: &str, cx: &mut $crate::Context<Self>) -> $crate::Result<RootRoute> {
                let target = match self.table.resolve(path) {
                    Ok(entry) => entry.view,
                    Err(e) => {
                        $crate::__private::tracing::warn!(path, "navigation failed: route not found");
                        self.not_found = Some(path.to_string());
                        return Err(e);
                    }
                };
                self.not_found = None;

                let current = *self.router.current();
                if target != current {
                    self.call_on_exit(current, cx);
                    self.router.navigate(target);
                    self.call_on_enter(target, cx);
                }
                $crate::__private::tracing::info!(path, route = %target, "navigated");
                Ok(target)
            }

            /// Go back to previous route
            pub fn go_back(&mut self, cx: &mut $crate::Context<Self>) -> bool {
                if !self.router.can_go_back() {
                    return false;
                }
                let current = *self.router.current();
                self.call_on_exit(current, cx);
                self.router.go_back();
                self.not_found = None;
                self.call_on_enter(*self.router.current(), cx);
                true
            }

            /// Helper: Call on_enter for the given route
            fn call_on_enter(&mut self, route: RootRoute, cx: &mut $crate::Context<Self>) {
                match route {
                    $(RootRoute::$route => $crate::Component::on_enter(&mut self.$field, &mut cx.cast())),+
                }
            }

            /// Helper: Call on_exit for the given route
            fn call_on_exit(&mut self, route: RootRoute, cx: &mut $crate::Context<Self>) {
                match route {
                    $(RootRoute::$route => $crate::Component::on_exit(&mut self.$field, &mut cx.cast())),+
                }
            }
        }

        impl $crate::Component for Root {
            fn on_mount(&mut self, cx: &mut $crate::Context<Self>) {
                $($crate::Component::on_mount(&mut self.$field, &mut cx.cast());)+
            }

            fn on_enter(&mut self, cx: &mut $crate::Context<Self>) {
                self.call_on_enter(*self.router.current(), cx);
            }

            fn on_exit(&mut self, cx: &mut $crate::Context<Self>) {
                self.call_on_exit(*self.router.current(), cx);
            }

            fn on_shutdown(&mut self, cx: &mut $crate::Context<Self>) {
                $($crate::Component::on_shutdown(&mut self.$field, &mut cx.cast());)+
            }

            fn render(&mut self, frame: &mut $crate::__private::ratatui::Frame, cx: &mut $crate::Context<Self>) {
                let body = $crate::router::render_nav(
                    frame,
                    cx.area,
                    &self.table,
                    self.router.current(),
                    self.not_found.as_deref(),
                );
                let current = *self.router.current();
                match current {
                    $(RootRoute::$route => {
                        let mut page_cx = cx.cast::<$page>();
                        page_cx.area = body;
                        $crate::Component::render(&mut self.$field, frame, &mut page_cx)
                    }),+
                }
            }

            fn handle_event(&mut self, event: $crate::Event, cx: &mut $crate::Context<Self>) -> Option<$crate::Action> {
                let current = *self.router.current();
                let action = match current {
                    $(RootRoute::$route => $crate::Component::handle_event(&mut self.$field, event, &mut cx.cast())),+
                };

                match action? {
                    $crate::Action::Navigate(path) => {
                        // Failures are logged and shown in the status line
                        let _ = self.navigate(&path, cx);
                        None
                    }
                    $crate::Action::Back => {
                        self.go_back(cx);
                        None
                    }
                    $crate::Action::Quit => Some($crate::Action::Quit),
                    $crate::Action::Noop => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestRoute {
        Home,
        Settings,
        Profile,
    }

    #[test]
    fn test_router_navigation() {
        let mut router = Router::new(TestRoute::Home);

        assert_eq!(router.current(), &TestRoute::Home);
        assert!(!router.can_go_back());

        router.navigate(TestRoute::Settings);
        assert_eq!(router.current(), &TestRoute::Settings);
        assert!(router.can_go_back());

        router.navigate(TestRoute::Profile);
        assert_eq!(router.current(), &TestRoute::Profile);
        assert_eq!(router.history_len(), 2);

        assert!(router.go_back());
        assert_eq!(router.current(), &TestRoute::Settings);

        assert!(router.go_back());
        assert_eq!(router.current(), &TestRoute::Home);

        assert!(!router.go_back());
        assert_eq!(router.current(), &TestRoute::Home);
    }

    #[test]
    fn test_router_no_duplicate_navigation() {
        let mut router = Router::new(TestRoute::Home);
        router.navigate(TestRoute::Home); // Same route
        assert_eq!(router.history_len(), 0); // No history added
    }

    #[test]
    fn test_router_clear_history() {
        let mut router = Router::new(TestRoute::Home);
        router.navigate(TestRoute::Settings);
        router.clear_history();
        assert!(!router.can_go_back());
        assert_eq!(router.current(), &TestRoute::Settings);
    }

    crate::define_routes! {
        enum CloudRoute {
            Home => "" as "home",
            Detail => "/detail" as "detail",
            CloudEdit => "/cloudEdit" as "cloudEdit",
        }
    }

    #[test]
    fn test_define_routes_table() {
        let table = CloudRoute::table().unwrap();
        assert_eq!(table.len(), CloudRoute::ALL.len());
        assert_eq!(table.resolve("/").unwrap().view, CloudRoute::Home);
        assert_eq!(table.resolve("/detail").unwrap().view, CloudRoute::Detail);
        assert_eq!(table.by_name("cloudEdit").unwrap().view, CloudRoute::CloudEdit);
    }

    #[test]
    fn test_define_routes_accessors() {
        assert_eq!(CloudRoute::default(), CloudRoute::Home);
        assert_eq!(CloudRoute::CloudEdit.path(), "/cloudEdit");
        assert_eq!(CloudRoute::Detail.name(), "detail");
        assert_eq!(CloudRoute::Detail.to_string(), "detail");
    }
}
