//! Local companion to the HTTP service: extract (and optionally summarize) a PDF on disk.
//!
//! Uses the same validator, extractor, and summarization engine as the server.
use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use clap::Parser;
use notes_summarizer::{
    config::{DEFAULT_GEMINI_BASE_URL, DEFAULT_SUMMARY_MODELS},
    ingestion::{UploadedDocument, extract_text, validate},
    logging::{self, LogTarget},
    summarization::{
        GeminiClient, LengthClass, ModelCandidates, SummarizationEngine, SummaryRequest,
        SummaryStyle,
    },
};

#[derive(Parser)]
#[command(
    name = "summarize-pdf",
    about = "Extract text from a PDF and optionally summarize it"
)]
struct Cli {
    /// PDF to read.
    path: PathBuf,
    /// Summarize the extracted text instead of printing it.
    #[arg(long)]
    summarize: bool,
    /// comprehensive | bullet-points | executive | brief
    #[arg(long, default_value = "comprehensive")]
    style: SummaryStyle,
    /// short | medium | long (anything else means medium)
    #[arg(long, default_value = "medium")]
    length: String,
    /// Candidate model, repeatable; tried in the order given.
    #[arg(long = "model")]
    models: Vec<String>,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    base_url: String,
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init_tracing(&LogTarget::StdoutOnly);
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let data = tokio::fs::read(&cli.path)
        .await
        .with_context(|| format!("failed to read {}", cli.path.display()))?;
    let filename = cli
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = UploadedDocument::new(filename, None, data);
    validate(&document).context("document rejected")?;

    let extraction = tokio::task::spawn_blocking(move || extract_text(&document.data))
        .await
        .context("extraction task panicked")?
        .context("failed to extract text")?;

    if !cli.summarize {
        println!("{}", extraction.text);
        return Ok(());
    }

    let Some(api_key) = cli.api_key else {
        bail!("--api-key or GEMINI_API_KEY is required to summarize");
    };
    let timeout = Duration::from_secs(cli.timeout_secs.max(1));
    let client = GeminiClient::new(cli.base_url, api_key, timeout)?;
    let candidates = if cli.models.is_empty() {
        DEFAULT_SUMMARY_MODELS.into_iter().collect()
    } else {
        ModelCandidates::new(cli.models)
    };
    let engine = SummarizationEngine::new(Arc::new(client), candidates, timeout);

    let result = engine
        .summarize(&SummaryRequest {
            text: extraction.text,
            style: cli.style,
            length: LengthClass::parse_lenient(&cli.length),
        })
        .await?;

    println!("{}", result.summary);
    eprintln!(
        "model: {} | words: {} -> {}",
        result.used_model, result.original_word_count, result.summary_word_count
    );
    Ok(())
}
