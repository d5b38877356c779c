use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;

use dep_tree::config::{Config, log_path};
use dep_tree::logging::init_logging;
use dep_tree::tree::TreeResolver;
use dep_tree::version::registries::NpmRegistry;

#[derive(Parser)]
#[command(name = "dep-tree")]
#[command(version, about = "Resolve an npm package into its full dependency tree")]
struct Cli {
    /// Package name, e.g. "express" or "@types/node"
    name: String,

    /// Version constraint, e.g. "1.0.0", "^1.1.0", "~1.3.0", "latest"
    #[arg(default_value = "latest")]
    constraint: String,

    /// Config file (defaults to $XDG_CONFIG_HOME/dep-tree/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Registry base URL
    #[arg(long)]
    registry: Option<String>,

    /// Maximum registry requests in flight, 0 for no limit
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Pretty-print the JSON tree
    #[arg(long)]
    pretty: bool,

    /// Exit with an error if any dependency failed to resolve
    #[arg(long)]
    strict: bool,

    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Write logs to the data directory instead of stderr
    #[arg(long)]
    log_file: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.registry {
            config.registry.url = url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.registry.timeout_ms = timeout_ms;
        }
        if let Some(max_concurrent) = self.max_concurrent {
            config.resolver.max_concurrent_requests = max_concurrent;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli.log_file.then(log_path);
    let _guard = init_logging(&cli.log_level, cli.log_json, log_file.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let registry = NpmRegistry::new(&config.registry).context("Failed to create registry client")?;
    let resolver = TreeResolver::new(Arc::new(registry), &config.resolver);

    let tree = resolver.resolve(&cli.name, &cli.constraint).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&tree)?
    } else {
        serde_json::to_string(&tree)?
    };
    println!("{}", output);

    let failures = tree.failures();
    if cli.strict && !failures.is_empty() {
        bail!("{} dependencies failed to resolve", failures.len());
    }

    Ok(())
}
