//! The `lcats` command-line tool.
//!
//! Commands are parsed by [`cli`], dispatched by [`app::App`], and gather
//! corpora through the source [`gatherers`] registry.

pub mod app;
pub mod cli;
pub mod gatherers;

pub use app::{App, Outcome};
pub use cli::{Cli, Command};
