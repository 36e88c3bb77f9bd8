//! Named, session-scoped stores.
//!
//! A store is a plain struct holding shared state plus the methods that read
//! and mutate it. [`AppContext::use_store`](crate::AppContext::use_store)
//! creates it on first access and hands every caller a handle to the same
//! [`Entity`](crate::Entity).

/// A store definition: an ID for diagnostics and a factory for its initial state.
pub trait Store: Send + Sync + 'static {
    /// Identifier used in logs.
    const ID: &'static str;

    /// Initial state, called once per session.
    fn init() -> Self;
}
