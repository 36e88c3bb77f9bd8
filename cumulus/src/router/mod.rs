//! Router module.
//!
//! Provides the validated `RouteTable`, navigation history with `Router`,
//! and the `define_routes!` / `define_app!` macros.

pub mod nav;
pub mod table;
pub mod traits;

pub use nav::render_nav;
pub use table::{RouteEntry, RouteTable};
pub use traits::Router;
