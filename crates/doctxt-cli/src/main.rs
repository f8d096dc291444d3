//! doctxt command-line interface.
//!
//! Converts attachments to plain text. Each input's text is written to a
//! sibling `<stem>.txt` file (or into `--output-dir`), or printed with `--stdout`.

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use doctxt::{ConversionConfig, ConversionPipeline, ConversionResult, Format};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "doctxt",
    version,
    about = "Convert document attachments to plain text",
    after_help = "EXAMPLES:\n  \
                  doctxt convert report.pdf\n  \
                  doctxt convert --output-dir out/ *.hwp *.docx\n  \
                  doctxt convert --stdout --json memo.txt\n  \
                  doctxt formats"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert files to plain text
    Convert {
        /// Files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory for the `.txt` files. Defaults to each input's own directory
        #[arg(short, long, conflicts_with = "stdout")]
        output_dir: Option<PathBuf>,

        /// Print the text instead of writing `.txt` files
        #[arg(long)]
        stdout: bool,

        /// Configuration file (.toml, .yaml, .yml or .json). Defaults to a discovered doctxt.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Replace existing output files
        #[arg(long)]
        overwrite: bool,
    },

    /// List supported extensions and whether each converter is usable
    Formats {
        /// Configuration file used to probe converter backends
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(flatten)]
    result: &'a ConversionResult,
}

#[derive(Serialize)]
struct FormatReport {
    format: Format,
    extensions: Vec<&'static str>,
    capability: doctxt::Capability,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ConversionConfig> {
    match path {
        Some(path) => ConversionConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(ConversionConfig::discover()
            .context("Failed to discover configuration")?
            .unwrap_or_default()),
    }
}

fn build_pipeline(config_path: Option<&Path>) -> Result<ConversionPipeline> {
    let config = load_config(config_path)?;
    ConversionPipeline::new(config).context("Invalid configuration")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads every input. Unreadable files become failed results so one bad path
/// does not stop the rest of the batch.
fn read_inputs(files: &[PathBuf]) -> (Vec<(Vec<u8>, String)>, Vec<Option<String>>) {
    let mut inputs = Vec::with_capacity(files.len());
    let mut read_errors = Vec::with_capacity(files.len());

    for path in files {
        let name = display_name(path);
        match std::fs::read(path) {
            Ok(bytes) => {
                inputs.push((bytes, name));
                read_errors.push(None);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read input");
                inputs.push((Vec::new(), name));
                read_errors.push(Some(format!("failed to read {}: {}", path.display(), e)));
            }
        }
    }

    (inputs, read_errors)
}

/// Where the text of `input` goes: `<stem>.txt` in `output_dir`, or beside the input.
fn output_path(pipeline: &ConversionPipeline, input: &Path, name: &str, output_dir: Option<&Path>) -> PathBuf {
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(pipeline.convert_to_txt_filename(name))
}

fn write_output(input: &Path, target: &Path, text: &str, overwrite: bool) -> Result<()> {
    if target.exists() {
        if let (Ok(a), Ok(b)) = (input.canonicalize(), target.canonicalize())
            && a == b
        {
            bail!("output {} would replace the input", target.display());
        }
        if !overwrite {
            bail!("{} already exists (use --overwrite to replace it)", target.display());
        }
    }
    std::fs::write(target, text).with_context(|| format!("Failed to write {}", target.display()))
}

/// Identity of an output path, resolved through the filesystem once it exists.
fn output_key(target: &Path) -> PathBuf {
    target.canonicalize().unwrap_or_else(|_| target.to_path_buf())
}

struct ConvertOptions<'a> {
    output_dir: Option<&'a Path>,
    config: Option<&'a Path>,
    json: bool,
    overwrite: bool,
    stdout: bool,
}

fn run_convert(files: &[PathBuf], options: &ConvertOptions<'_>) -> Result<bool> {
    let pipeline = build_pipeline(options.config)?;

    if let Some(dir) = options.output_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let (inputs, read_errors) = read_inputs(files);
    let results: Vec<ConversionResult> = pipeline
        .convert_batch(&inputs)
        .into_iter()
        .zip(read_errors)
        .map(|(result, read_error)| match read_error {
            Some(message) => ConversionResult {
                text: None,
                error: Some(message),
                error_kind: Some(doctxt::ErrorKind::Io),
                format: result.format,
                encoding: None,
                diagnostics: Vec::new(),
            },
            None => result,
        })
        .collect();

    let mut all_ok = true;
    let mut written: HashSet<PathBuf> = HashSet::new();
    let mut reports = Vec::with_capacity(files.len());

    for ((path, (_, name)), result) in files.iter().zip(&inputs).zip(&results) {
        let mut output = None;

        match (&result.text, &result.error) {
            (Some(text), _) if options.stdout => {
                if !options.json {
                    if files.len() > 1 {
                        println!("==> {} <==", path.display());
                    }
                    println!("{}", text);
                }
            }
            (Some(text), _) => {
                let target = output_path(&pipeline, path, name, options.output_dir);
                let outcome = if written.contains(&output_key(&target)) {
                    Err(anyhow::anyhow!(
                        "{} was already written by an earlier input in this run",
                        target.display()
                    ))
                } else {
                    write_output(path, &target, text, options.overwrite)
                };
                match outcome {
                    Ok(()) => {
                        written.insert(output_key(&target));
                        if !options.json {
                            println!("{} -> {}", path.display(), target.display());
                        }
                        output = Some(target.display().to_string());
                    }
                    Err(e) => {
                        all_ok = false;
                        eprintln!("{}: {:#}", path.display(), e);
                    }
                }
            }
            (None, error) => {
                all_ok = false;
                eprintln!("{}: {}", path.display(), error.as_deref().unwrap_or("conversion failed"));
            }
        }

        reports.push(FileReport {
            file: path.display().to_string(),
            output,
            result,
        });
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(all_ok)
}

fn run_formats(config: Option<&Path>, json: bool) -> Result<()> {
    let pipeline = build_pipeline(config)?;

    let reports: Vec<FormatReport> = Format::ALL
        .into_iter()
        .map(|format| FormatReport {
            format,
            extensions: pipeline.converter_for(format).supported_extensions().to_vec(),
            capability: pipeline.capability(format),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in reports {
        println!(
            "{:<12} {:<40} {}",
            report.format.name(),
            report.extensions.join(" "),
            report.capability
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Commands::Convert {
            files,
            output_dir,
            config,
            json,
            overwrite,
            stdout,
        } => run_convert(
            &files,
            &ConvertOptions {
                output_dir: output_dir.as_deref(),
                config: config.as_deref(),
                json,
                overwrite,
                stdout,
            },
        ),
        Commands::Formats { config, json } => run_formats(config.as_deref(), json).map(|()| true),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
