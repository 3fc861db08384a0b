use std::path::PathBuf;

use clap::Parser;

use crate::output::ReportFormat;

#[derive(Parser, Debug)]
#[command(name = "style-guard")]
#[command(author, version, about = "C++ style checker - enforce coding conventions")]
#[command(long_about = "Checks C++ sources against the project coding conventions and \
    optionally applies safe auto-fixes.\n\n\
    Exit codes:\n  \
    0  - No diagnostics\n  \
    1  - Style diagnostics reported\n  \
    2  - Fatal file errors (unreadable or unlexable files)\n  \
    64 - Usage error")]
pub struct Cli {
    /// Files or directories to check
    #[arg(value_name = "PATH", required_unless_present = "stdin_filename")]
    pub paths: Vec<PathBuf>,

    /// Apply auto-fixes in place (atomic temp-file-and-rename)
    #[arg(long)]
    pub fix: bool,

    /// Enable only these rules (comma-separated ids)
    #[arg(long, value_delimiter = ',', value_name = "ID,...")]
    pub rules: Option<Vec<String>>,

    /// Disable these rules (comma-separated ids)
    #[arg(long, value_delimiter = ',', value_name = "ID,...")]
    pub disable: Vec<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of parallel jobs (default: available CPUs)
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Process files one at a time, in command-line order
    #[arg(long)]
    pub sequential: bool,

    /// File extensions checked when walking directories
    #[arg(
        long,
        value_delimiter = ',',
        default_value = ".h,.hh,.hpp,.c,.cc,.cpp,.cxx",
        value_name = "EXT,..."
    )]
    pub ext: Vec<String>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub report: ReportFormat,

    /// Read one file from standard input, reported under this name
    #[arg(long, value_name = "PATH")]
    pub stdin_filename: Option<PathBuf>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
