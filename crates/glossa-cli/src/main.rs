use anyhow::{Context, Result};
use clap::Parser;
use glossa_core::{ChatSession, Settings};
use glossa_cli::{app, Theme};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glossa")]
#[command(about = "Glossa - translate and polish text with Gemini")]
#[command(version)]
struct Cli {
    /// Run a single prompt, print the reply and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Conversation history file
    #[arg(long)]
    history: Option<PathBuf>,

    /// Color theme (dark, light, amber)
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.prompt.is_none());

    let mut settings = Settings::load();
    if let Some(ref model) = cli.model {
        settings.model = model.clone();
    }
    if let Some(ref history) = cli.history {
        settings.history_path = history.clone();
    }

    // A missing API key is the one fatal startup error.
    let client = settings
        .build_client()
        .context("cannot start without a Gemini API key")?;
    let session = ChatSession::open(
        settings.build_store(),
        Arc::new(client),
        settings.system_instruction.clone(),
    );

    if let Some(prompt) = cli.prompt {
        app::run_single_prompt(session, &prompt).await?;
    } else {
        let theme_name = cli.theme.as_deref().unwrap_or(&settings.theme);
        app::run_tui(session, Theme::by_name(theme_name)).await?;
    }

    Ok(())
}

/// Logs go to stderr for single prompts. The chat window owns the terminal,
/// so there they go to a file in the cache directory instead.
fn init_logging(to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if !to_file {
        builder.with_writer(std::io::stderr).init();
        return;
    }

    match open_log_file() {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(std::io::sink).init(),
    }
}

fn open_log_file() -> Option<std::fs::File> {
    let dir = dirs::cache_dir()?.join("glossa");
    std::fs::create_dir_all(&dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("glossa.log"))
        .ok()
}
