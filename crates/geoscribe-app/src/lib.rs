//! Geoscribe application shell.
//!
//! Replays scripted map sessions against a [`geoscribe_core::MapStore`],
//! standing in for the interactive map front end.

mod app;
pub mod script;

pub use app::{App, AppConfig, AppError, DATA_DIR_ENV, describe};
pub use script::{ScriptCommand, parse_line};
