mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use ember_sema::{check, ErrorPolicy, Options, Report, SemanticError, DEFAULT_MAX_DEPTH};
use ember_syntax::Program;
use log::LevelFilter;
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "ember", version, about = "Check an Ember program for semantic errors")]
struct Cli {
    /// JSON-encoded program to check
    file: PathBuf,

    /// Stop at the first error (same as --policy fail-fast)
    #[arg(long = "fail-fast", default_value_t = false)]
    fail_fast: bool,

    /// Error policy: collect or fail-fast
    #[arg(long = "policy", env = "EMBER_POLICY", default_value_t = ErrorPolicy::Collect)]
    policy: ErrorPolicy,

    /// Deepest node nesting to analyze
    #[arg(long = "max-depth", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum number of symbols in the table
    #[arg(long = "capacity")]
    capacity: Option<usize>,

    /// Print the symbol table after analysis
    #[arg(long = "dump-symbols", default_value_t = false)]
    dump_symbols: bool,

    /// Diagnostic output format
    #[arg(long = "format", value_enum, default_value_t = Format::Human)]
    format: Format,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Human,
    Json,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            policy: if self.fail_fast { ErrorPolicy::FailFast } else { self.policy },
            max_depth: self.max_depth,
            capacity: self.capacity,
        }
    }
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    code: &'static str,
    message: String,
    within: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    ok: bool,
    status: i32,
    diagnostics: Vec<JsonDiagnostic<'a>>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = simple_logger::SimpleLogger::new().with_level(level).init() {
        eprintln!("{}: {}", "warning".yellow().bold(), format!("Logging disabled: {}", e).yellow());
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("{}: {}", "error".red().bold(), msg.red());
    process::exit(1);
}

fn load_program(path: &Path) -> Result<Program, String> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()));
    }
    let src = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&src).map_err(|e| format!("Invalid program in {}: {}", path.display(), e))
}

fn render_error(err: &SemanticError) {
    let header = format!("error[{}]", err.kind.code());
    eprintln!("{}: {}", header.red().bold(), err.kind.to_string().red());
    if let Some(item) = &err.within {
        eprintln!("  {} in {}", "-->".bright_black(), item);
    }
    common::provide_error_suggestions(&err.kind);
}

fn render_human(report: &Report) {
    for err in &report.diagnostics {
        render_error(err);
    }
    if report.is_ok() {
        println!("{}", "Analysis completed successfully.".green());
    } else {
        let summary = format!("Analysis failed with {} error(s).", report.diagnostics.len());
        eprintln!("{}", summary.red().bold());
    }
}

fn render_json(report: &Report) {
    let doc = JsonReport {
        ok: report.is_ok(),
        status: report.status(),
        diagnostics: report
            .diagnostics
            .iter()
            .map(|d| JsonDiagnostic {
                code: d.kind.code(),
                message: d.kind.to_string(),
                within: d.within.as_deref(),
            })
            .collect(),
    };
    match serde_json::to_string_pretty(&doc) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(&format!("Failed to encode report: {}", e)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let program = match load_program(&cli.file) {
        Ok(p) => p,
        Err(msg) => fail(&msg),
    };
    let options = cli.options();
    log::debug!("checking {} with {:?}", cli.file.display(), options);

    let report = check(&program, options);

    match cli.format {
        Format::Human => {
            if cli.dump_symbols {
                println!("{}", report.table.dump());
            }
            render_human(&report);
        }
        Format::Json => {
            // keep stdout a single JSON document
            if cli.dump_symbols {
                eprintln!("{}", report.table.dump());
            }
            render_json(&report);
        }
    }

    if !report.is_ok() {
        process::exit(1);
    }
}
