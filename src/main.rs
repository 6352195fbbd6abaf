use clap::Parser;
use renotax::certificate;
use renotax::cli::{self, Commands, ReportFormat};
use renotax::config;
use renotax::error::RenotaxError;
use renotax::exit_code;
use renotax::logging;
use renotax::report::{self, OutputFormat};
use renotax::types::report::{BatchFailure, BatchReport, BatchRow, CertificateReport};
use renotax::types::rules::DeductionRules;
use std::path::Path;

fn output_format(format: &ReportFormat) -> OutputFormat {
    match format {
        ReportFormat::Json => OutputFormat::Json,
        ReportFormat::Md => OutputFormat::Md,
    }
}

fn evaluate_file(path: &Path, rules: &DeductionRules) -> Result<CertificateReport, RenotaxError> {
    let loaded = certificate::load_certificate(path)?;
    loaded.input.validate()?;
    let summary = certificate::evaluate(&loaded.input, rules);
    Ok(CertificateReport::new(path, &loaded, summary))
}

fn run() -> Result<i32, RenotaxError> {
    let cli = cli::Cli::parse();
    let config_root = cli.command.config_root();
    let loaded = config::load_config(&config_root)?;

    let level = logging::resolve_level(
        cli.verbose,
        cli.quiet,
        loaded.as_ref().and_then(|cfg| cfg.log_level()),
    );
    if let Err(err) = logging::init(&level) {
        eprintln!("warning: {err}");
    }
    if loaded.is_none() {
        tracing::info!(
            path = %config_root.display(),
            "no {} found; using statutory rules",
            config::DEFAULT_CONFIG_FILE
        );
    }
    let rules = loaded
        .as_ref()
        .map(|cfg| cfg.rules())
        .unwrap_or_default();

    match cli.command {
        Commands::Calc(cmd) => {
            let report = evaluate_file(&cmd.file, &rules)?;
            let rendered = report::render(&report, output_format(&cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        Commands::Batch(cmd) => {
            if !cmd.dir.is_dir() {
                return Err(RenotaxError::PathNotFound(cmd.dir.display().to_string()));
            }

            let mut batch = BatchReport::new(&cmd.dir);
            for discovered in certificate::discover_certificates(&cmd.dir) {
                let path = match discovered {
                    Ok(path) => path,
                    Err(err) => {
                        let source = err.path().unwrap_or(cmd.dir.as_path()).display().to_string();
                        tracing::warn!(path = %source, error = %err, "directory entry unreadable");
                        batch.failures.push(BatchFailure {
                            source,
                            error: err.to_string(),
                        });
                        continue;
                    }
                };
                match evaluate_file(&path, &rules) {
                    Ok(report) => batch.rows.push(BatchRow {
                        id: report.summary.id,
                        source: report.source,
                        max_control_amount: report.summary.result.max_control_amount,
                        five_percent_deductible: report.summary.result.five_percent_deductible,
                        input_sha256: report.input_sha256,
                    }),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "certificate skipped");
                        batch.failures.push(BatchFailure {
                            source: path.display().to_string(),
                            error: err.to_string(),
                        });
                    }
                }
            }

            let rendered = report::render_batch(&batch, output_format(&cmd.format))?;
            println!("{rendered}");

            if batch.failures.is_empty() {
                Ok(exit_code::SUCCESS)
            } else {
                Ok(exit_code::PARTIAL_FAILURE)
            }
        }
        Commands::Rules(_) => {
            print!("{}", report::md::rules_to_markdown(&rules));
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = match e {
                RenotaxError::InvalidCertificate(_) => exit_code::INVALID_INPUT,
                _ => exit_code::RUNTIME_FAILURE,
            };
            std::process::exit(code);
        }
    }
}
