use std::path::PathBuf;

use clap::Parser;
use url_digest::{
    tracing::init_tracing_subscriber, AnalysisRequest, Analyzer, Config, OpenAiClient,
    TextExtractor, DEFAULT_MODEL,
};

#[derive(Parser)]
#[command(name = "url-digest", about = "Summarise and sentiment-analyse the text behind a URL")]
struct Cli {
    /// The URL to process
    url: String,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: String,

    /// Chat completion model
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// The maximum number of OpenAI tokens in a request (accepted for
    /// compatibility, not applied)
    #[arg(long = "max_tokens", default_value = "3000")]
    max_tokens: u32,

    /// Don't log anything, just print the response
    #[arg(long)]
    quiet: bool,

    /// Do not generate a summary
    #[arg(long = "no-summary")]
    no_summary: bool,

    /// Do not generate a sentiment analysis
    #[arg(long = "no-sentiment")]
    no_sentiment: bool,

    /// Output the result as json (implies --quiet)
    #[arg(long)]
    json: bool,

    /// Set the summary prompt inline
    #[arg(long = "summary-prompt")]
    summary_prompt: Option<String>,

    /// Set the sentiment prompt inline
    #[arg(long = "sentiment-prompt")]
    sentiment_prompt: Option<String>,

    /// Lower the summary temperature for a more literal summary
    #[arg(long)]
    strict: bool,

    /// Fall back to audio transcription when a YouTube video has no transcript
    #[arg(long = "allow-audio")]
    allow_audio: bool,

    /// Working directory for temporary audio files
    #[arg(long, default_value = "/var/tmp/url-digest")]
    workdir: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let quiet = cli.quiet || cli.json;
    if !quiet {
        init_tracing_subscriber()?;
    }
    tracing::debug!(max_tokens = cli.max_tokens, "max_tokens is accepted but not applied");

    let config = Config::new(&cli.openai_key, &cli.model);
    let llm = OpenAiClient::new(config.clone());
    let extractor = TextExtractor::new(OpenAiClient::new(config), &cli.workdir);
    let analyzer = Analyzer::new(extractor, llm);

    let request = AnalysisRequest {
        url: cli.url,
        summary_prompt: cli.summary_prompt,
        sentiment_prompt: cli.sentiment_prompt,
        strict: cli.strict,
        skip_summary: cli.no_summary,
        skip_sentiment: cli.no_sentiment,
        allow_audio_fallback: cli.allow_audio,
    };

    let result = analyzer.analyze(&request).await?;

    if cli.json {
        println!("{}", result.to_json());
        return Ok(());
    }

    if let Some(summary) = &result.summary {
        println!("Summary:");
        println!("{summary}");
    }
    if let Some(sentiment) = &result.sentiment {
        println!("Sentiment:");
        println!("Score: {} || Analysis: {}", sentiment.score, sentiment.summary);
    }

    Ok(())
}
