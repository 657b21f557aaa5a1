use anyhow::Context;
use clap::{Parser, Subcommand};
use mathmark_chat::{
    ChatConfig, ChatSession, HttpBackend, MessageView, PollOutcome, ReplyPoller,
};
use mathmark_render::{DelimitedRenderer, MathRenderer, markdown, render_document};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "mathmark")]
#[command(about = "Markdown with $math$ delimiters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file to HTML
    Render {
        /// Path to the markdown file
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Typeset math server-side with KaTeX
        #[arg(long)]
        katex: bool,
    },
    /// List the math tokens of a markdown file as JSON
    Tokens {
        /// Path to the markdown file
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Send one message to a chat backend and print the transcript
    Chat {
        /// Config file (defaults to the user config dir)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Backend base URL, overriding the config
        #[arg(long)]
        url: Option<String>,
        /// The message to send
        message: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { path, katex } => {
            let content = read(&path)?;
            let md = markdown(renderer(katex));
            print!("{}", render_document(&md, &content));
        }
        Commands::Tokens { path } => {
            let content = read(&path)?;
            let tokens = mathmark_syntax::tokenize(&content);
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }
        Commands::Chat {
            config,
            url,
            message,
        } => chat(config.as_deref(), url, &message).await?,
    }
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(feature = "katex")]
fn renderer(katex: bool) -> Arc<dyn MathRenderer> {
    if katex {
        Arc::new(mathmark_render::KatexRenderer::new())
    } else {
        Arc::new(DelimitedRenderer)
    }
}

#[cfg(not(feature = "katex"))]
fn renderer(katex: bool) -> Arc<dyn MathRenderer> {
    if katex {
        log::warn!("Built without the `katex` feature, leaving math for client-side typesetting");
    }
    Arc::new(DelimitedRenderer)
}

async fn chat(config: Option<&Path>, url: Option<String>, message: &str) -> anyhow::Result<()> {
    let mut config = match config {
        Some(path) => ChatConfig::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ChatConfig::load(),
    };
    if let Some(url) = url {
        config.base_url = url;
    }

    let backend = HttpBackend::new(config.base_url.clone())?;
    let poller = ReplyPoller::new(config.poll_settings());
    let view = MessageView::new(renderer(false), config.assistant_name.clone());
    let mut session = ChatSession::new(view).with_typing_dots(config.typing_dots);

    let (cancel_tx, mut cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let outcome = session
        .send(&backend, &poller, message, &mut cancel_rx)
        .await?;
    if outcome == PollOutcome::Cancelled {
        log::info!("Interrupted before the reply was complete");
    }
    println!("{}", session.transcript().to_html());
    Ok(())
}
