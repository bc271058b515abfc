// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod prompt;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::content::{ContentFetcher, FetchConfig, OcrConfig, TextExtractors};
use crate::crawl::{CrawlConfig, CrawlPermissionGate};
use crate::pipeline::{write_results, AcquisitionPipeline, PipelineConfig, DEFAULT_OUTPUT_FILE};
use crate::scoring::{OnnxZeroShotClassifier, RelevanceScorer, ScoringConfig};
use crate::search::{DuckDuckGoProvider, SearchConfig, SearchProvider};

/// Search the web, extract full text from every hit and score its relevance
#[derive(Parser, Debug)]
#[command(name = "search-harvest")]
#[command(version)]
#[command(about = "Search, fetch and extract web content, scored against two labels", long_about = None)]
pub struct Cli {
    /// Search query (prompted for when omitted)
    #[arg(long, short)]
    pub query: Option<String>,

    /// Two labels, space or comma separated; the first is scored
    #[arg(long, short)]
    pub labels: Option<String>,

    /// Maximum number of search results (prompted for when omitted)
    #[arg(long, short = 'n')]
    pub max_results: Option<usize>,

    /// Output file for the JSON results
    #[arg(long, short, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Hits fetched concurrently
    #[arg(long, env = "PIPELINE_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Skip robots.txt checks
    #[arg(long)]
    pub no_robots: bool,

    /// Deny hits whose robots.txt cannot be retrieved
    #[arg(long, conflicts_with = "no_robots")]
    pub fail_closed: bool,

    /// Local ONNX NLI model (downloaded from the Hub when omitted)
    #[arg(long, env = "NLI_MODEL_PATH", requires = "tokenizer_path")]
    pub model_path: Option<PathBuf>,

    /// tokenizer.json matching --model-path
    #[arg(long, env = "NLI_TOKENIZER_PATH", requires = "model_path")]
    pub tokenizer_path: Option<PathBuf>,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        let mut config = CrawlConfig::from_env();
        if self.no_robots {
            config.enabled = false;
        }
        if self.fail_closed {
            config.fail_closed = true;
        }
        config
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        let mut config = ScoringConfig::from_env();
        if self.model_path.is_some() {
            config.model_path = self.model_path.clone();
            config.tokenizer_path = self.tokenizer_path.clone();
        }
        config
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::from_env();
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config
    }
}

/// Execute a search-harvest run
pub async fn execute(cli: Cli) -> Result<()> {
    let search_config = SearchConfig::from_env();
    search_config.validate().map_err(anyhow::Error::msg)?;

    let (query, labels, max_results) = {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        (
            prompt::resolve_query(cli.query.clone(), &mut input, &mut output)?,
            prompt::resolve_labels(cli.labels.clone(), &mut input, &mut output)?,
            prompt::resolve_max_results(
                cli.max_results,
                search_config.default_max_results,
                &mut input,
                &mut output,
            )?,
        )
    };

    let scoring_config = cli.scoring_config();
    scoring_config.validate().map_err(anyhow::Error::msg)?;
    let pipeline_config = cli.pipeline_config();
    pipeline_config.validate().map_err(anyhow::Error::msg)?;

    println!("🔍 Searching: {} ({} results)", query, max_results);
    println!("🏷️  Labels: {}", labels);

    info!("Loading classifier...");
    let max_concurrent = scoring_config.max_concurrent;
    let classifier = OnnxZeroShotClassifier::load(scoring_config).await?;
    let scorer = RelevanceScorer::new(Arc::new(classifier), max_concurrent);

    let policy = CrawlPermissionGate::from_config(cli.crawl_config())?;
    let fetcher = ContentFetcher::new(
        FetchConfig::from_env(),
        TextExtractors::with_system_tools(OcrConfig::from_env()),
    )?;

    let provider = DuckDuckGoProvider::new(search_config)?;
    let hits = provider.search(&query, max_results).await?;
    if hits.is_empty() {
        println!("No search results.");
        return Ok(());
    }

    let progress = ProgressBar::new(hits.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    progress.set_message("Processing search results");

    let pipeline = AcquisitionPipeline::new(policy, Arc::new(fetcher), scorer, pipeline_config)?
        .with_progress(progress.clone());
    let report = pipeline.run_with_report(&hits, &labels).await;
    progress.finish_and_clear();

    for skipped in &report.skipped {
        println!("   ⏭️  Skipped ({:?}): {}", skipped.reason, skipped.url);
    }

    if report.records.is_empty() {
        println!("No results with extractable content.");
        return Ok(());
    }

    write_results(&cli.output, &report.records)?;
    println!(
        "✅ Done! Saved {} of {} results to {} in {:.1}s",
        report.records.len(),
        report.total_hits(),
        cli.output.display(),
        report.elapsed_ms() as f64 / 1000.0
    );
    Ok(())
}
