//! CLI for `openapi-sheet`.
//!
//! # Subcommands
//!
//! ```text
//! # Normalized document (groups, operations, flattened fields)
//! openapi-sheet convert --input openapi.yaml
//!
//! # Sheet rows, read from stdin, written as YAML
//! cat openapi.json | openapi-sheet sheet --input - --format yaml \
//!   --config openapi-sheet.yaml --output sheet.yaml
//! ```

#![forbid(unsafe_code)]

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use openapi_sheet::{ConvertConfig, ProjectConfig};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Flatten `OpenAPI` 3 documents into leveled parameter tables.
#[derive(Parser)]
#[command(name = "openapi-sheet", version, about)]
enum Cli {
    /// Print the normalized document: tag groups, operations, and fields.
    Convert(CommonArgs),

    /// Print the spreadsheet projection of the normalized document.
    Sheet(CommonArgs),
}

#[derive(Parser)]
struct CommonArgs {
    /// Path to the `OpenAPI` JSON or YAML file, or `-` for stdin.
    #[arg(short, long)]
    input: PathBuf,

    /// Path to a project config YAML file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write output to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Log progress and cycle-guard decisions.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli {
        Cli::Convert(args) => {
            initialise_logging(args.verbose);
            let (document, _) = load(&args)?;
            write_output(&args, &document)
        }
        Cli::Sheet(args) => {
            initialise_logging(args.verbose);
            let (document, project) = load(&args)?;
            let sheet = openapi_sheet::build_sheet(&document, &project.sheet);
            write_output(&args, &sheet)
        }
    }
}

/// Install a stderr subscriber; `RUST_LOG` wins over `--verbose`.
fn initialise_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .finish(),
    )
    .is_err()
    {
        // Subscriber already set; keep it.
    }
}

fn load(args: &CommonArgs) -> anyhow::Result<(openapi_sheet::Document, ProjectConfig)> {
    let project = match &args.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            ProjectConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?
        }
        None => ProjectConfig::default(),
    };

    let input = read_input(&args.input)?;
    let config = ConvertConfig::new().with_project_config(&project);
    let document = openapi_sheet::convert(&input, &config)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;
    tracing::info!(
        groups = document.groups.len(),
        operations = document.operations().count(),
        "converted document"
    );

    Ok((document, project))
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read input: {}", path.display()))
}

fn render<T: Serialize>(value: &T, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => {
            let mut text =
                serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
            text.push('\n');
            Ok(text)
        }
        Format::Yaml => serde_yaml_ng::to_string(value).context("Failed to serialize YAML"),
    }
}

fn write_output<T: Serialize>(args: &CommonArgs, value: &T) -> anyhow::Result<()> {
    let text = render(value, args.format)?;
    match &args.output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => print!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_stdin_and_yaml_format() {
        let cli = Cli::try_parse_from(["openapi-sheet", "sheet", "--input", "-", "-f", "yaml"])
            .unwrap();
        let Cli::Sheet(args) = cli else {
            panic!("expected sheet subcommand");
        };
        assert_eq!(args.input, PathBuf::from("-"));
        assert!(matches!(args.format, Format::Yaml));
        assert!(args.config.is_none());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(
            Cli::try_parse_from(["openapi-sheet", "convert", "-i", "a.yaml", "-f", "xml"])
                .is_err()
        );
    }

    #[test]
    fn renders_json_with_trailing_newline() {
        let text = render(&serde_json::json!({"a": 1}), Format::Json).unwrap();
        assert_eq!(text, "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn renders_yaml() {
        let text = render(&serde_json::json!({"a": 1}), Format::Yaml).unwrap();
        assert_eq!(text, "a: 1\n");
    }

    #[test]
    fn missing_input_file_has_context() {
        let err = read_input(Path::new("/nonexistent/openapi.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read input"));
    }
}
