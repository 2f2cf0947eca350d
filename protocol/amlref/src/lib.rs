//! Library side of the `amlref` command: configuration, the interactive
//! assessment form, and text/JSON rendering of results and tables.

pub mod config;
pub mod form;
pub mod render;

pub use config::{Config, ConfigError, OutputFormat};
pub use form::FormSession;
