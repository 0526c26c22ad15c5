use std::path::PathBuf;

use clap::Parser;
use url_digest::{
    server::run_server, tracing::init_tracing_subscriber, Analyzer, Config, OpenAiClient,
    TextExtractor, DEFAULT_MODEL,
};

#[derive(Parser)]
#[command(name = "url-digest-server", about = "HTTP endpoint for url-digest")]
struct Cli {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: String,

    /// Chat completion model
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Working directory for temporary audio files
    #[arg(long, default_value = "/var/tmp/url-digest")]
    workdir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let config = Config::new(&cli.openai_key, &cli.model);
    let llm = OpenAiClient::new(config.clone());
    let extractor = TextExtractor::new(OpenAiClient::new(config), &cli.workdir);
    let analyzer = Analyzer::new(extractor, llm);

    run_server(analyzer, cli.port).await
}
