//! Sinks that turn tables into text

pub mod delimited;
pub mod json;
pub mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;
