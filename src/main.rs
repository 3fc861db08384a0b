use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use clap::error::ErrorKind;
use rayon::prelude::*;

use style_guard::checker::{FileChecker, FileOutcome};
use style_guard::cli::Cli;
use style_guard::config::Config;
use style_guard::output::{JsonFormatter, ReportFormat, TextFormatter};
use style_guard::rules;
use style_guard::scanner::{DirectoryScanner, ExtensionFilter};
use style_guard::sink::DiagnosticsSink;
use style_guard::source::SourceFile;
use style_guard::{
    EXIT_FILE_ERROR, EXIT_STYLE_ISSUES, EXIT_SUCCESS, EXIT_USAGE_ERROR, Result, StyleGuardError,
};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                EXIT_SUCCESS
            } else {
                EXIT_USAGE_ERROR
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    match run_impl(cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_USAGE_ERROR
        }
    }
}

fn run_impl(cli: &Cli) -> Result<i32> {
    // 1. Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    for warning in &config.warnings {
        eprintln!("config: {warning}");
    }
    for id in config.rules.keys() {
        if !rules::is_known_rule(id) {
            eprintln!("config: unknown rule: {id}");
        }
    }

    // 2. Validate rule selections
    validate_rule_ids(cli)?;

    // 3. Build the enabled rule set
    let all_rules = rules::all_rules();
    let checker = FileChecker::new(&config, &all_rules, cli.rules.as_deref(), &cli.disable);

    // 4. Single-file stdin mode
    if let Some(name) = &cli.stdin_filename {
        return run_stdin(cli, &checker, name.clone());
    }

    // 5. Discover files
    let files = discover_files(cli)?;

    // 6. Install the interrupt flag: stop dispatching, let workers finish
    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&cancelled);
        let _ = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst));
    }

    // 7. Process files
    let outcomes = process_files(cli, &checker, &files, &cancelled)?;

    // 8. Aggregated report formats
    if cli.report == ReportFormat::Json {
        let output = JsonFormatter.format(&outcomes)?;
        print!("{output}");
    }

    Ok(exit_code(&outcomes))
}

fn validate_rule_ids(cli: &Cli) -> Result<()> {
    let selected = cli.rules.iter().flatten().chain(cli.disable.iter());
    for id in selected {
        if !rules::is_known_rule(id) {
            return Err(StyleGuardError::Config(format!("unknown rule: {id}")));
        }
    }
    Ok(())
}

fn discover_files(cli: &Cli) -> Result<Vec<PathBuf>> {
    let scanner = DirectoryScanner::new(ExtensionFilter::new(&cli.ext));

    let mut files = Vec::new();
    for path in &cli.paths {
        if !path.exists() {
            return Err(StyleGuardError::Config(format!(
                "path does not exist: {}",
                path.display()
            )));
        }
        if path.is_dir() {
            files.extend(scanner.scan(path));
        } else {
            // Explicitly named files bypass the extension filter.
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn process_files(
    cli: &Cli,
    checker: &FileChecker<'_>,
    files: &[PathBuf],
    cancelled: &AtomicBool,
) -> Result<Vec<FileOutcome>> {
    let text_sink = (cli.report == ReportFormat::Text)
        .then(|| DiagnosticsSink::new(std::io::stdout()));
    let formatter = TextFormatter::new();

    let handle = |path: &PathBuf| -> Option<FileOutcome> {
        if cancelled.load(Ordering::SeqCst) {
            return None;
        }
        let outcome = if cli.fix {
            checker.fix_path(path)
        } else {
            checker.check_path(path)
        };
        if let Some(sink) = &text_sink {
            sink.write_block(&formatter.format_file(&outcome));
        }
        Some(outcome)
    };

    if cli.sequential || cli.jobs == Some(1) {
        return Ok(files.iter().filter_map(handle).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.jobs.unwrap_or(0))
        .build()
        .map_err(|e| StyleGuardError::Config(format!("failed to build worker pool: {e}")))?;
    Ok(pool.install(|| files.par_iter().filter_map(handle).collect()))
}

fn run_stdin(cli: &Cli, checker: &FileChecker<'_>, name: PathBuf) -> Result<i32> {
    let mut buffer = Vec::new();
    std::io::stdin().read_to_end(&mut buffer)?;

    let file = match SourceFile::from_bytes(name.clone(), buffer) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(EXIT_FILE_ERROR);
        }
    };

    let outcome = if cli.fix {
        let (fixed, _, diagnostics, fatal) = checker.fix_source(&file);
        // Fixed content goes to stdout; diagnostics go to stderr.
        match &fixed {
            Some(text) => print!("{text}"),
            None => print!("{}", file.text()),
        }
        let outcome = FileOutcome {
            path: name,
            diagnostics,
            fatal,
            fixed: fixed.is_some(),
        };
        eprint!("{}", TextFormatter::with_colors(false).format_file(&outcome));
        outcome
    } else {
        let (diagnostics, fatal) = checker.check_source(&file);
        let outcome = FileOutcome {
            path: name,
            diagnostics,
            fatal,
            fixed: false,
        };
        match cli.report {
            ReportFormat::Text => {
                print!("{}", TextFormatter::new().format_file(&outcome));
            }
            ReportFormat::Json => {
                let output = JsonFormatter.format(std::slice::from_ref(&outcome))?;
                print!("{output}");
            }
        }
        outcome
    };

    Ok(exit_code(std::slice::from_ref(&outcome)))
}

fn exit_code(outcomes: &[FileOutcome]) -> i32 {
    if outcomes.iter().any(|o| o.fatal) {
        EXIT_FILE_ERROR
    } else if outcomes.iter().any(FileOutcome::has_diagnostics) {
        EXIT_STYLE_ISSUES
    } else {
        EXIT_SUCCESS
    }
}
