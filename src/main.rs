//! Command-line interface for the build matrix generator.
//!
//! The default invocation generates the GitHub Actions matrix, the Docker
//! Bake targets and the build summary. The `health` subcommand runs the
//! installation probe used by the images themselves.

use std::{io, path::PathBuf, process};

use clap::{ArgAction, Args, Parser, Subcommand};
use shopware_matrix::{
    DEFAULT_INSTALL_MARKER, Error, FileSink, GithubMatrix, GithubReleaseSource, MatrixConfig,
    StaticReleaseSource, check_installation, generate, load_config,
};
use tracing_subscriber::EnvFilter;

/// Command line interface for generating Shopware image build matrices.
#[derive(Debug, Parser,)]
#[command(name = "shopware-matrix", version, about = "Generate Shopware image build matrices")]
struct Cli
{
    #[command(subcommand)]
    command: Option<Command,>,

    /// Arguments of the default `generate` command.
    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Debug, Subcommand,)]
enum Command
{
    /// Generate matrix documents (default).
    Generate(GenerateArgs,),
    /// Report whether the Shopware installation is complete.
    Health(HealthArgs,),
}

#[derive(Debug, Args, Default,)]
struct GenerateArgs
{
    /// Path to a YAML configuration overriding the built-in tables.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// Directory receiving the generated documents.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "build-config")]
    output_dir: PathBuf,

    /// Version that receives the `latest` tags.
    #[arg(long = "latest", value_name = "VERSION", env = "SHOPWARE_LATEST_VERSION")]
    latest: Option<String,>,

    /// File the `matrix=<json>` line is appended to.
    #[arg(long = "github-output", value_name = "PATH", env = "GITHUB_OUTPUT")]
    github_output: Option<PathBuf,>,

    /// Token used to authenticate against the GitHub API.
    #[arg(long = "github-token", value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String,>,

    /// Skip the registry and use the fallback catalog.
    #[arg(long = "offline", action = ArgAction::SetTrue)]
    offline: bool,

    /// Also print the GitHub matrix to stdout.
    #[arg(long = "print", action = ArgAction::SetTrue)]
    print: bool,

    /// Pretty-print the matrix written to stdout.
    #[arg(long = "pretty", action = ArgAction::SetTrue, requires = "print")]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct HealthArgs
{
    /// Installation marker whose presence signals a complete install.
    #[arg(long = "marker", value_name = "PATH", default_value = DEFAULT_INSTALL_MARKER)]
    marker: PathBuf,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main(flavor = "current_thread")]
async fn main()
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),),)
        .with_writer(io::stderr,)
        .init();

    match run().await {
        Ok(true,) => {}
        Ok(false,) => process::exit(1,),
        Err(error,) => {
            tracing::error!("Error generating matrix");
            eprintln!("{}", error.to_display_string());
            process::exit(1,);
        }
    }
}

/// Executes the CLI using parsed arguments.
///
/// Returns `Ok(false)` when the command completed but reports failure, as
/// the health probe does for an incomplete installation.
///
/// # Errors
///
/// Propagates configuration and sink errors.
async fn run() -> Result<bool, Error,>
{
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Generate(args,),) => run_generate(&args,).await.map(|()| true,),
        Some(Command::Health(args,),) => run_health(&args,),
        None => run_generate(&cli.generate,).await.map(|()| true,),
    }
}

fn resolve_config(args: &GenerateArgs,) -> Result<MatrixConfig, Error,>
{
    let mut config = match args.config.as_deref() {
        Some(path,) => load_config(path,)?,
        None => MatrixConfig::default(),
    };

    if let Some(latest,) = args.latest.as_deref().map(str::trim,).filter(|value| !value.is_empty(),) {
        config.latest_version = Some(latest.to_owned(),);
    }

    Ok(config,)
}

async fn run_generate(args: &GenerateArgs,) -> Result<(), Error,>
{
    let config = resolve_config(args,)?;
    let github_output = args.github_output.clone().filter(|path| !path.as_os_str().is_empty(),);
    let sink = FileSink::new(&args.output_dir,).with_github_output(github_output,);

    let artifacts = if args.offline {
        let source = StaticReleaseSource::new(config.fallback_releases.clone(),);
        generate(&source, &sink, &config,).await?
    } else {
        let mut source = GithubReleaseSource::new(config.source.clone(),);
        if let Some(token,) = args.github_token.as_deref().filter(|value| !value.is_empty(),) {
            source = source.with_token(token,);
        }
        generate(&source, &sink, &config,).await?
    };

    if args.print {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_matrix(&mut handle, &artifacts.matrix, args.pretty,)?;
    }

    Ok((),)
}

fn write_matrix<W: io::Write,>(writer: &mut W, matrix: &GithubMatrix, pretty: bool,) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, matrix,)?;
    } else {
        serde_json::to_writer(writer, matrix,)?;
    }

    Ok((),)
}

fn run_health(args: &HealthArgs,) -> Result<bool, Error,>
{
    let report = check_installation(&args.marker,);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer(&mut handle, &report,)?;

    Ok(report.is_healthy(),)
}
