//! Schema Cast CLI
//!
//! Command-line interface for normalizing records and linting schemas.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use schema_cast::{
    lint, load_json, load_json_auto, read_text, FileStatus, LoadError, TransformConfig,
    TypeTransformer,
};

#[derive(Parser)]
#[command(name = "schema-cast")]
#[command(about = "Normalize JSON records against their schema's declared types")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a record file against a schema
    Normalize {
        /// Record file (a single JSON document, or JSON Lines with --jsonl)
        record: PathBuf,

        /// Schema source: file path or URL (http:// or https://)
        #[arg(long, short)]
        schema: String,

        /// Treat the input as newline-delimited JSON records
        #[arg(long)]
        jsonl: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "jsonl")]
        pretty: bool,
    },

    /// Lint schema files for constructs normalization will skip
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Normalize {
            record,
            schema,
            jsonl,
            output,
            pretty,
        } => run_normalize(&record, &schema, jsonl, output, pretty),

        Commands::Lint {
            path,
            format,
            strict,
            quiet,
        } => run_lint(&path, &format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Route diagnostics to stderr so stdout stays clean JSON.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_normalize(
    record_path: &Path,
    schema_source: &str,
    jsonl: bool,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let schema = load_json_auto(schema_source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let transformer = TypeTransformer::new(TransformConfig::DEFAULT_SCHEMA_NORMALIZATION)
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

    let rendered = if jsonl {
        normalize_stream(record_path, &transformer, &schema).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?
    } else {
        let mut record = load_json(record_path).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;
        transformer.transform(&mut record, &schema);

        if pretty {
            serde_json::to_string_pretty(&record)
        } else {
            serde_json::to_string(&record)
        }
        .map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &rendered).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", rendered);
        }
    }

    Ok(())
}

/// Normalize a JSON Lines stream, one record per line.
///
/// Blank lines are kept so the stream's framing survives the pass.
fn normalize_stream(
    record_path: &Path,
    transformer: &TypeTransformer,
    schema: &serde_json::Value,
) -> Result<String, LoadError> {
    let content = read_text(record_path)?;

    let mut lines = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            lines.push(line.to_string());
            continue;
        }
        let mut record: serde_json::Value = serde_json::from_str(line)
            .map_err(|source| LoadError::InvalidJsonLine {
                line: index + 1,
                source,
            })?;
        transformer.transform(&mut record, schema);
        lines.push(record.to_string());
    }

    Ok(lines.join("\n"))
}

fn run_lint(path: &Path, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    use schema_cast::Severity;

    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let result = lint(path, strict);

    if format == "json" {
        match serde_json::to_string_pretty(&result) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                return Err(2);
            }
        }
    } else {
        // Text output
        if !quiet {
            println!("Linting {} ...\n", path.display());
        }

        for file_result in &result.results {
            let status_icon = match file_result.status {
                FileStatus::Ok => "\x1b[32m✓\x1b[0m",
                FileStatus::Warning => "\x1b[33m⚠\x1b[0m",
                FileStatus::Error => "\x1b[31m✗\x1b[0m",
            };

            if !quiet || file_result.status != FileStatus::Ok {
                println!("  {} {}", status_icon, file_result.file.display());
            }

            for diag in &file_result.diagnostics {
                let color = match diag.severity {
                    Severity::Error => "\x1b[31m",
                    Severity::Warning => "\x1b[33m",
                };
                if !quiet || diag.severity == Severity::Error {
                    println!(
                        "    {}{}[{}]\x1b[0m: {} - {}",
                        color,
                        match diag.severity {
                            Severity::Error => "error",
                            Severity::Warning => "warning",
                        },
                        diag.code,
                        diag.path,
                        diag.message
                    );
                }
            }
        }

        println!();
        if result.is_ok() && (!strict || result.warnings == 0) {
            println!(
                "\x1b[32m✓ {} files checked, all passed\x1b[0m",
                result.files_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} files checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
                result.files_checked, result.passed, result.failed, result.errors, result.warnings
            );
        }
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}
