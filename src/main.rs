use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::{error, info};

use api_stubgen::{CatalogLoader, GeneratorConfig, StubGenerator};

#[derive(Parser, Debug)]
#[command(name = "api-stubgen", version, about = "Generate API stub listings from a type catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write one stub file per exported class
    Generate(CommonArgs),

    /// Print the classes that would be exported
    List(CommonArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Configuration file (defaults to api-stubgen.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog file or directory of catalog files
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output root directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Module to export types from
    #[arg(short, long)]
    module: Option<String>,

    /// Namespace to export; repeat to export several
    #[arg(short, long = "namespace")]
    namespaces: Vec<String>,

    /// Number of rendering threads
    #[arg(short, long)]
    threads: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Keep stubs left over from the previous run
    #[arg(long)]
    no_prune: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl CommonArgs {
    /// Load the configuration file and apply command-line overrides
    fn into_config(self) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::load_or_default(self.config.as_deref())?;

        if let Some(catalog) = self.catalog {
            config.catalog_path = catalog;
        }
        if let Some(output) = self.output {
            config.output_root = output;
        }
        if let Some(module) = self.module {
            config.module = module;
        }
        if !self.namespaces.is_empty() {
            config.namespaces = self.namespaces;
        }
        if self.threads.is_some() {
            config.parallel_threads = self.threads;
        }
        if self.no_progress {
            config.show_progress = false;
        }
        if self.no_prune {
            config.prune_stale = false;
        }

        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn generate(args: CommonArgs) -> Result<bool> {
    let generator = StubGenerator::new(args.into_config()?)?;
    let report = generator.run()?;

    for failure in &report.failures {
        error!("{}.{}: {}", failure.namespace, failure.class_name, failure.error);
    }
    Ok(report.is_success())
}

fn list(args: CommonArgs) -> Result<bool> {
    let generator = StubGenerator::new(args.into_config()?)?;
    let config = generator.config();

    let document = CatalogLoader::new().load(&config.catalog_path)?;
    let module = document.require_module(&config.module)?;

    let selected = generator.select(module);
    for selection in &selected {
        println!("{}.{}", selection.namespace, selection.descriptor.name);
    }
    info!("{} classes selected", selected.len());
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (verbose, result) = match cli.command {
        Commands::Generate(args) => {
            init_logging(args.verbose);
            (args.verbose, generate(args))
        }
        Commands::List(args) => {
            init_logging(args.verbose);
            (args.verbose, list(args))
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            if verbose {
                error!("{:?}", e);
            } else {
                error!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}
