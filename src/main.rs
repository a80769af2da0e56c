use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stream_resolver::{
    config::Config,
    fetcher::{HttpPageFetcher, MirrorProbe, PageFetcher},
    models::ResolutionRequest,
    resolver::{ContextHandle, ResolutionPipeline, ResolverContext},
    services::ResolverService,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "stream-resolver")]
#[command(version)]
#[command(about = "Resolve movie and episode ids into playable stream URLs")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "stream-resolver.toml")]
    config: PathBuf,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Use this mirror instead of the configured list
    #[arg(short, long, value_name = "URL")]
    mirror: Option<String>,

    /// Use the first configured mirror without probing
    #[arg(long)]
    skip_mirror_probe: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Content kind: movie, series
    #[arg(required_unless_present = "print_config")]
    kind: Option<String>,

    /// Stream ids, e.g. tt0111161 or tt0903747:1:2
    ids: Vec<String>,
}

fn init_logging(level: &str, format: LogFormat) {
    let log_filter = format!("stream_resolver={level}");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays clean JSON
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    info!("Starting stream resolver v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(Some(cli.config.as_path()))?;
    info!("Configuration loaded from: {}", cli.config.display());

    if cli.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let kind = cli.kind.as_deref().unwrap_or("movie");
    let requests = cli
        .ids
        .iter()
        .map(|id| ResolutionRequest::from_stream_id(kind, id))
        .collect::<Result<Vec<_>, _>>()?;
    if requests.is_empty() {
        anyhow::bail!("no ids given");
    }

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(&config.fetcher)?);

    let mirror = match cli.mirror {
        Some(mirror) => mirror,
        None if cli.skip_mirror_probe => config
            .source
            .mirrors
            .first()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no mirrors configured"))?,
        None => MirrorProbe::discover(
            fetcher.as_ref(),
            &config.source.mirrors,
            config.fetcher.bypass_mode,
            config.source.mirror_probe_timeout,
        )
        .await
        .ok_or_else(|| anyhow::anyhow!("no mirrors configured"))?,
    };
    info!("Using mirror: {}", mirror);

    let context = ContextHandle::new(ResolverContext::new(mirror, config.fetcher.bypass_mode));
    let pipeline = Arc::new(ResolutionPipeline::new(&config, fetcher, context));
    let service = ResolverService::new(pipeline, &config.resolver);

    let results = service.resolve_batch(&requests).await;
    if results.len() == 1 {
        println!("{}", serde_json::to_string_pretty(&results[0])?);
    } else {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}
