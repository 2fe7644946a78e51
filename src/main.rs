use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use xbind_compiler::{Compilation, CompileError};
use xbind_resolver::{ConfigError, LocalScoping, ResolverConfig};

#[derive(Parser)]
#[command(name = "xbind")]
#[command(about = "Resolve schema components to generated classes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Resolver configuration (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Put every generated class in this package
    #[arg(long, global = true)]
    package: Option<String>,

    /// Place classes for local declarations at package level
    #[arg(long, global = true)]
    toplevel: bool,

    /// Schema documents to register for diagnostic labels
    #[arg(long = "source", global = true)]
    sources: Vec<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve manifests and report diagnostics
    Check {
        /// Schema manifests to check
        manifests: Vec<PathBuf>,

        /// Show the generated model
        #[arg(long)]
        tree: bool,
    },
    /// Resolve a manifest and print the generated model
    Bind {
        /// Schema manifest
        manifest: PathBuf,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl CliError {
    /// 2 for unusable inputs or configuration, 1 for a failed resolution
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Io { .. } | CliError::Config(_) => 2,
            CliError::Compile(_) => 1,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "xbind=debug" } else { "xbind=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<ResolverConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => ResolverConfig::load(path)?,
        None => ResolverConfig::default(),
    };
    if let Some(package) = &cli.package {
        config = config.with_package(package.clone());
    }
    if cli.toplevel {
        config = config.with_local_scoping(LocalScoping::Toplevel);
    }
    Ok(config)
}

fn compile(cli: &Cli, manifest: &Path, config: ResolverConfig) -> Result<Compilation, CliError> {
    let name = manifest.display().to_string();
    let text = fs::read_to_string(manifest).map_err(|source| CliError::Io {
        path: name.clone(),
        source,
    })?;

    let mut builder = Compilation::builder().config(config).manifest(name, text);
    for source in &cli.sources {
        builder = builder.add_file(source).map_err(|e| CliError::Io {
            path: source.display().to_string(),
            source: e,
        })?;
    }

    Ok(builder.build()?)
}

/// Compile one manifest, emit its diagnostics and report whether it was clean
fn run_one(
    cli: &Cli,
    manifest: &Path,
    config: ResolverConfig,
    show_tree: bool,
) -> Result<bool, CliError> {
    info!(manifest = %manifest.display(), "resolving");

    let compilation = compile(cli, manifest, config)?;

    if show_tree {
        xbind_model::debug::print_model(compilation.model());
    }

    if !compilation.diagnostics().is_empty() {
        compilation.diagnostics().emit().ok();
    }

    debug!(
        classes = compilation.model().class_count(),
        diagnostics = compilation.diagnostics().len(),
        "resolved"
    );
    Ok(!compilation.has_errors())
}

/// Exit code for the outcome of one manifest
fn outcome_code(outcome: Result<bool, CliError>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("error: {}", e);
            e.exit_code()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    let code = match &cli.command {
        Commands::Check { manifests, tree } => {
            if manifests.is_empty() {
                eprintln!("error: no input files");
                return ExitCode::from(2);
            }
            manifests
                .iter()
                .map(|manifest| outcome_code(run_one(&cli, manifest, config.clone(), *tree)))
                .fold(0, u8::max)
        }
        Commands::Bind { manifest } => outcome_code(run_one(&cli, manifest, config, true)),
    };

    ExitCode::from(code)
}
