use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::cli::OutputFormat;
use header_auditor::checker::HeaderChecker;
use header_auditor::config::load_config;
use header_auditor::output::format_table_output;
use header_auditor::walk::collect_files;

pub struct CheckArgs {
    pub paths: Vec<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub exit_zero: bool,
    pub fail_fast: bool,
}

pub fn handle_check(args: CheckArgs, config_path: Option<&Path>, quiet: bool, verbose: bool) -> Result<()> {
    let config = load_config(config_path)?;

    // Malformed templates or patterns stop the run before any file is read
    config.validate()?;
    let registry = Arc::new(config.build_registry()?);
    let options = config.check_options(args.fail_fast)?;

    let paths = if args.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.paths
    };
    let files = collect_files(&paths, &config.exclude_patterns()?)?;

    let checker = HeaderChecker::new(registry, options);
    let report = checker.check_files(&files);

    if report.has_failures() && !quiet {
        eprintln!(
            "Header violations found: {} of {} files",
            report.summary.failures, report.summary.total_files
        );
    }

    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from_config(config.format.as_deref()));

    let output_content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Table => format_table_output(&report, verbose),
    };

    match args.output {
        Some(path) => fs::write(path, output_content)?,
        None => {
            if !quiet {
                println!("{}", output_content);
            }
        }
    }

    if report.has_failures() && !args.exit_zero && config.fail_on_violations.unwrap_or(true) {
        if !quiet {
            eprintln!("Exiting with error due to header violations");
        }
        std::process::exit(1);
    }

    Ok(())
}
