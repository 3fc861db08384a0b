mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
