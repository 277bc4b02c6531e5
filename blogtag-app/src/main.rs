use anyhow::{Context, Result};
use blogtag_common::observability::{init_logging, LogConfig};
use blogtag_common::{BlogtagError, OutputFormat};
use blogtag_config::{load_url_list, BlogtagConfig, BlogtagConfigLoader, DEFAULT_CONFIG_FILE};
use blogtag_http::HttpClient;
use blogtag_roster::{load_rosters, RosterSource};
use blogtag_tagger::{TagExtractor, TagPolicy};
use blogtag_web::{ArticleCache, ArticleFetcher, ContentExtractor};
use clap::Parser;
use report::ReportWriter;
use runner::Runner;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

mod report;
mod runner;

/// Tag conference blog articles with the speakers they mention.
#[derive(Debug, Parser)]
#[command(name = "blogtag", version)]
struct Cli {
    /// Scope to process, usually the conference year (reads `<articles_dir>/<SCOPE>/urls.yaml`).
    scope: String,

    /// Configuration file. Defaults to `blogtag.yaml` when present.
    #[arg(short, long, env = "BLOGTAG_CONFIG")]
    config: Option<PathBuf>,

    /// Report format: text or json.
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Only download uncached articles; print no report.
    #[arg(long)]
    download_only: bool,

    /// Report each speaker at most once per article.
    #[arg(long)]
    dedup: bool,
}

fn load_config(cli: &Cli) -> Result<BlogtagConfig> {
    let loader = BlogtagConfigLoader::new();
    let loader = match &cli.config {
        Some(path) => loader.with_file(path),
        None => loader.with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().context("failed to load configuration")
}

fn scope_urls(cfg: &BlogtagConfig, scope: &str) -> blogtag_common::Result<Vec<String>> {
    Ok(load_url_list(&cfg.url_list_path(scope))?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1) Config (env wins over file)
    let cfg = load_config(&cli)?;

    init_logging(LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.emit_stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    })?;

    // 2) URL list for the scope; its absence ends the run before any network I/O.
    let urls = match scope_urls(&cfg, &cli.scope) {
        Ok(urls) => urls,
        Err(missing @ BlogtagError::ConfigurationMissing(_)) => {
            tracing::error!(error = %missing, "url_list.missing");
            println!("{missing}");
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(scope = %cli.scope, urls = urls.len(), "run.start");

    // 3) Rosters, loaded once and shared read-only
    let mut http = HttpClient::new()?;
    if let Some(secs) = cfg.http.timeout_secs {
        http = http.with_timeout(Duration::from_secs(secs));
    }
    if let Some(ua) = &cfg.http.user_agent {
        http = http.with_user_agent(ua.clone());
    }
    let rosters = load_rosters(
        &RosterSource::for_scope(&cfg.rosters.speakers, &cli.scope),
        &RosterSource::for_scope(&cfg.rosters.presentations, &cli.scope),
        &http,
    )
    .await
    .context("failed to load rosters")?;

    let policy = TagPolicy {
        dedup: cli.dedup || cfg.tagging.dedup,
    };
    let extractor = TagExtractor::new(&rosters.presentations, &rosters.speakers, policy)?;
    if extractor.is_empty() {
        tracing::warn!(scope = %cli.scope, "tagger.no_presentations");
    }
    tracing::info!(
        presentations = extractor.len(),
        speakers = rosters.speakers.len(),
        dedup = policy.dedup,
        "tagger.ready"
    );

    // 4) Fetch + tag, one URL at a time
    let fetcher = ArticleFetcher::new(
        http,
        ArticleCache::new(cfg.scope_dir(&cli.scope)),
        ContentExtractor::new(cfg.extract.selectors.as_slice())?,
    );
    let stdout = std::io::stdout();
    let mut runner = Runner::new(
        &fetcher,
        &extractor,
        ReportWriter::new(stdout.lock(), cli.format),
    );

    runner.download_all(&urls).await?;
    if cli.download_only {
        return Ok(ExitCode::SUCCESS);
    }
    runner.run(&urls).await?;

    Ok(ExitCode::SUCCESS)
}
