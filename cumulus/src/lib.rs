//! Reactive terminal UI framework: components, shared entities and stores,
//! and table-driven routing on top of ratatui.

pub mod application;
pub mod component;
pub mod config;
pub mod error;
pub mod logging;
pub mod router;
pub mod state;
pub mod store;

pub use error::{Error, Result};

// Re-export common types for convenience
pub use application::{Application, AppContext, Context};
pub use component::{Component, Page, traits::{Event, Action, AnyComponent}};
pub use config::AppConfig;
pub use state::{Entity, EntityId, Subscription, WeakEntity};
pub use store::Store;
pub use router::{RouteEntry, RouteTable, Router};

#[doc(hidden)]
pub mod __private {
    pub use ratatui;
    pub use tracing;
}
