//! Terminal front end for docfill.

pub mod app;
pub mod config;
pub mod launcher;
pub mod shell;

pub use app::{App, FillOutcome};
pub use config::{Cli, Command, Config};
