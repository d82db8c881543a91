//! bindcheck CLI entry point.

use bindcheck_foundation::{AnalysisConfig, Diagnostic};
use bindcheck_runtime::{Driver, load_from_file};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    snapshots: Vec<PathBuf>,
    show_help: bool,
    show_version: bool,
    json: bool,
    analysis: AnalysisConfig,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    for arg in args.into_iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--json" => config.json = true,
            "--debug" => config.analysis.debug = true,
            "--report-unresolved" => config.analysis.report_unresolved = true,
            "--strict-pointer-match" => config.analysis.strict_pointer_match = true,
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option: {flag}").into());
            }
            _ => config.snapshots.push(PathBuf::from(arg)),
        }
    }

    Ok(config)
}

/// Returns `Ok(true)` when no findings were reported.
fn run(args: Vec<String>) -> Result<bool, Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(true);
    }

    if config.show_version {
        println!("bindcheck {}", env!("CARGO_PKG_VERSION"));
        return Ok(true);
    }

    if config.snapshots.is_empty() {
        return Err("no snapshot given (see --help)".into());
    }

    let driver = Driver::new(config.analysis.clone());
    let mut clean = true;
    for path in &config.snapshots {
        let snapshot = load_from_file(path)?;
        let report = driver.run(&snapshot)?;
        for diagnostic in &report.diagnostics {
            print_diagnostic(diagnostic, config.json)?;
        }
        clean &= !report.has_findings();
    }

    Ok(clean)
}

fn print_diagnostic(diagnostic: &Diagnostic, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(diagnostic)?);
    } else {
        println!("{diagnostic}");
    }
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mbindcheck\x1b[0m - Workflow/activity binding checker

\x1b[1mUSAGE:\x1b[0m
    bindcheck [OPTIONS] SNAPSHOT...

\x1b[1mARGUMENTS:\x1b[0m
    SNAPSHOT...    Program snapshots to check (.json, or MessagePack otherwise)

\x1b[1mOPTIONS:\x1b[0m
    -h, --help                Print help information
    -V, --version             Print version information
    --json                    Print diagnostics as JSON lines

\x1b[1mANALYSIS OPTIONS:\x1b[0m
    --debug                   Emit trace output about registrations and calls
    --report-unresolved       Report calls whose target cannot be resolved
    --strict-pointer-match    Require exact pointer/value argument matches

\x1b[1mEXIT STATUS:\x1b[0m
    0    No findings
    1    Findings were reported, or an error occurred

\x1b[1mEXAMPLES:\x1b[0m
    bindcheck program.msgpack              Check one snapshot
    bindcheck --report-unresolved app.json Also report unresolvable callees
    bindcheck --json a.json b.json         Machine-readable output"
    );
}
