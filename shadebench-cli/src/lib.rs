#![warn(missing_docs)]
//! Shadebench CLI Library
//!
//! The `shadebench` binary: applies a grayscale filter to one image
//! through a chosen execution backend, or benchmarks all three backends
//! over a corpus of images and reports per-image and mean timings.
//!
//! The same binary doubles as the sandbox worker: the supervisor
//! re-executes it with the hidden `--shade-worker` flag, and worker mode
//! takes over before any CLI initialization touches stdout (stdout is
//! the worker's protocol channel).

mod backend;
mod config;
mod corpus;
mod executor;
mod supervisor;

pub use backend::{Backend, BackendError, LocalBackend, RemoteBackend, SandboxedBackend};
pub use config::ShadeConfig;
pub use corpus::{CorpusImage, load_corpus};
pub use executor::{
    BackendResult, DispatchError, build_report_meta, format_human_output, run_batch, run_one,
};
pub use supervisor::{SupervisorError, WorkerHandle};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use regex::Regex;
use shadebench_core::{Timer, WorkerMain};
use shadebench_report::{OutputFormat, Report, aggregate, generate_csv_report, generate_json_report};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Input files above this size are rejected before decoding.
const MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;

/// Shadebench CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "shadebench")]
#[command(author, version, about = "Shadebench - grayscale filter benchmark across execution backends")]
pub struct Cli {
    /// Optional subcommand (Bench, Apply, List); defaults to Bench.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter corpus images by regex on file name.
    #[arg(long, default_value = ".*")]
    pub filter: String,

    /// Corpus directory (overrides shade.toml).
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Remote filter endpoint URL (overrides shade.toml).
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Output format: human, json, csv.
    #[arg(long, default_value = "human")]
    pub format: String,

    /// Report output file (stdout if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sandbox worker reply timeout in seconds.
    #[arg(long, default_value = "60")]
    pub worker_timeout: u64,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Internal: run as sandbox worker process (used by the supervisor).
    #[arg(long, hide = true)]
    pub shade_worker: bool,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Benchmark all three backends over the corpus (default).
    Bench,
    /// Apply the filter to one image with a chosen backend.
    Apply {
        /// Source image path.
        image: PathBuf,
        /// Backend to run: local, sandboxed, remote.
        #[arg(long, default_value = "local")]
        backend: String,
        /// Output PNG path (defaults to `<stem>_gray.png` beside the source).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List corpus images.
    List,
}

/// Run the shadebench CLI. Main entry point for the binary.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the shadebench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Worker mode takes over before any other initialization: stdout
    // belongs to the frame protocol from here on.
    if cli.shade_worker {
        return run_worker_mode();
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("shadebench=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("shadebench=info")
            .with_writer(std::io::stderr)
            .init();
    }

    // Discover shade.toml configuration (CLI flags override).
    let config = ShadeConfig::discover().unwrap_or_default();
    let format = resolve_format(&cli, &config);

    match cli.command {
        Some(Commands::List) => list_corpus(&cli, &config),
        Some(Commands::Apply {
            ref image,
            ref backend,
            ref out,
        }) => run_apply(&cli, &config, image, backend, out.clone()),
        Some(Commands::Bench) | None => run_bench(&cli, &config, format),
    }
}

/// Run as the sandbox worker process.
fn run_worker_mode() -> anyhow::Result<()> {
    let mut worker = WorkerMain::new();
    worker
        .run()
        .map_err(|e| anyhow::anyhow!("worker error: {}", e))
}

/// Resolve the output format by layering shade.toml under the CLI flag.
///
/// The clap default is "human", so a differing CLI value means the user
/// set it explicitly and it wins; otherwise the config file value is
/// used. Unknown names fall back to human with a warning.
fn resolve_format(cli: &Cli, config: &ShadeConfig) -> OutputFormat {
    let name = if cli.format != "human" {
        cli.format.clone()
    } else {
        config.output.format.clone()
    };
    name.parse().unwrap_or_else(|_| {
        eprintln!("Warning: unknown output format '{}', using human", name);
        OutputFormat::Human
    })
}

/// Resolve the sandbox worker timeout: CLI wins if explicitly set (not
/// the clap default of 60), else shade.toml, else 60s.
fn resolve_worker_timeout(cli: &Cli, config: &ShadeConfig) -> Duration {
    if cli.worker_timeout != 60 {
        Duration::from_secs(cli.worker_timeout)
    } else {
        ShadeConfig::parse_duration(&config.sandbox.timeout)
            .unwrap_or_else(|_| Duration::from_secs(60))
    }
}

fn resolve_endpoint(cli: &Cli, config: &ShadeConfig) -> String {
    cli.endpoint
        .clone()
        .unwrap_or_else(|| config.remote.endpoint.clone())
}

fn resolve_corpus_dir(cli: &Cli, config: &ShadeConfig) -> PathBuf {
    cli.corpus
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.corpus.directory))
}

fn list_corpus(cli: &Cli, config: &ShadeConfig) -> anyhow::Result<()> {
    let dir = resolve_corpus_dir(cli, config);
    let filter_re = Regex::new(&cli.filter).ok();
    let corpus = load_corpus(&dir, filter_re.as_ref())?;

    println!("Corpus: {}", dir.display());
    for entry in &corpus {
        println!("├── {} ({} bytes)", entry.name, entry.bytes.len());
    }
    println!("{} images found.", corpus.len());

    Ok(())
}

fn run_apply(
    cli: &Cli,
    config: &ShadeConfig,
    image: &Path,
    backend_name: &str,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Ok(meta) = std::fs::metadata(image) {
        if meta.len() > MAX_INPUT_BYTES {
            anyhow::bail!(
                "input image is {} bytes; the limit is {} bytes (50 MB)",
                meta.len(),
                MAX_INPUT_BYTES
            );
        }
    }

    let output = out.unwrap_or_else(|| default_output_path(image));

    let result = match backend_name {
        "local" => run_one(image, &mut LocalBackend::new(), &output)?,
        "sandboxed" | "sandbox" => {
            let mut backend = SandboxedBackend::new(resolve_worker_timeout(cli, config));
            backend
                .initialize()
                .context("failed to initialize sandbox worker")?;
            let result = run_one(image, &mut backend, &output)?;
            backend.shutdown();
            result
        }
        "remote" => run_one(
            image,
            &mut RemoteBackend::new(resolve_endpoint(cli, config)),
            &output,
        )?,
        other => anyhow::bail!(
            "unknown backend '{}' (expected local, sandboxed, or remote)",
            other
        ),
    };

    println!(
        "{} grayscale filter took {:.2} ms",
        result.backend, result.elapsed_ms
    );
    println!("Filtered image written to: {}", output.display());

    Ok(())
}

/// `photo.jpg` → `photo_gray.png` in the same directory.
fn default_output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("filtered");
    source.with_file_name(format!("{stem}_gray.png"))
}

fn run_bench(cli: &Cli, config: &ShadeConfig, format: OutputFormat) -> anyhow::Result<()> {
    let dir = resolve_corpus_dir(cli, config);
    let filter_re = Regex::new(&cli.filter).ok();
    let corpus = load_corpus(&dir, filter_re.as_ref())?;

    if corpus.is_empty() {
        println!("No corpus images found in {}.", dir.display());
        return Ok(());
    }

    let endpoint = resolve_endpoint(cli, config);
    println!(
        "Benchmarking {} images (local, sandboxed, remote via {})...\n",
        corpus.len(),
        endpoint
    );

    let mut local = LocalBackend::new();

    // Worker spawn failure here is an environment failure: the batch has
    // not started, and every sandboxed call would fail identically.
    let mut sandboxed = SandboxedBackend::new(resolve_worker_timeout(cli, config));
    sandboxed
        .initialize()
        .context("failed to initialize sandbox worker")?;

    let mut remote = RemoteBackend::new(endpoint);

    let batch_timer = Timer::start();
    let rows = run_batch(&corpus, &mut local, &mut sandboxed, &mut remote);
    let total_duration_ms = batch_timer.elapsed_ms();

    sandboxed.shutdown();

    let summary = aggregate(&rows);
    let report = Report {
        meta: build_report_meta(corpus.len(), total_duration_ms),
        rows,
        summary,
    };

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report),
        OutputFormat::Human => format_human_output(&report),
    };

    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create report file {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli::parse_from(["shadebench"])
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/photo.jpg")),
            PathBuf::from("/tmp/photo_gray.png")
        );
        assert_eq!(
            default_output_path(Path::new("cat.png")),
            PathBuf::from("cat_gray.png")
        );
    }

    #[test]
    fn test_cli_format_wins_over_config() {
        let mut cli = base_cli();
        cli.format = "csv".to_string();
        let mut config = ShadeConfig::default();
        config.output.format = "json".to_string();
        assert_eq!(resolve_format(&cli, &config), OutputFormat::Csv);
    }

    #[test]
    fn test_config_format_used_when_cli_default() {
        let cli = base_cli();
        let mut config = ShadeConfig::default();
        config.output.format = "json".to_string();
        assert_eq!(resolve_format(&cli, &config), OutputFormat::Json);
    }

    #[test]
    fn test_unknown_format_falls_back_to_human() {
        let mut cli = base_cli();
        cli.format = "yaml".to_string();
        assert_eq!(resolve_format(&cli, &ShadeConfig::default()), OutputFormat::Human);
    }

    #[test]
    fn test_worker_timeout_layering() {
        let mut config = ShadeConfig::default();
        config.sandbox.timeout = "5s".to_string();

        let cli = base_cli();
        assert_eq!(resolve_worker_timeout(&cli, &config), Duration::from_secs(5));

        let mut cli = base_cli();
        cli.worker_timeout = 90;
        assert_eq!(resolve_worker_timeout(&cli, &config), Duration::from_secs(90));
    }
}
