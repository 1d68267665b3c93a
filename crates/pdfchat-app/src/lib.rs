//! pdfchat: a terminal chat over the text of PDF documents

pub mod app;
pub mod cli;
pub mod config;

pub use cli::Cli;
pub use config::{ConfigFile, EnvSettings};
