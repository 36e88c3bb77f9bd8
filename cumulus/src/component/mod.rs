//! Component module.
//!
//! Defines the `Component` and `Page` traits and the events and actions they exchange.

pub mod traits;

pub use traits::{Action, AnyComponent, Component, Event, Page};
