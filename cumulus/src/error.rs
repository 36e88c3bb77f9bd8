use snafu::prelude::*;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to lock mutex: poisoned"))]
    LockPoisoned,

    #[snafu(display("Terminal error: {source}"))]
    TerminalError { source: std::io::Error },

    #[snafu(display("Failed to read config file '{}': {source}", path.display()))]
    ConfigRead { path: PathBuf, source: std::io::Error },

    #[snafu(display("Failed to parse config file '{}': {source}", path.display()))]
    ConfigParse { path: PathBuf, source: toml::de::Error },

    #[snafu(display("Config validation failed: {message}"))]
    ConfigInvalid { message: String },

    #[snafu(display("Route table is empty"))]
    EmptyRouteTable,

    #[snafu(display("Invalid route '{name}': {reason}"))]
    InvalidRoute { name: String, reason: String },

    #[snafu(display("Duplicate route path: '{path}'"))]
    DuplicatePath { path: String },

    #[snafu(display("Duplicate route name: '{name}'"))]
    DuplicateName { name: String },

    #[snafu(display("View of route '{name}' is already bound to another route"))]
    DuplicateView { name: String },

    #[snafu(display("No route matches path '{path}'"))]
    RouteNotFound { path: String },

    #[snafu(display("Unknown route name: '{name}'. Available routes: {available}"))]
    UnknownRouteName { name: String, available: String },
}

pub type Result<T> = std::result::Result<T, Error>;
