use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{HttpTriviaClient, QuizController, QuizMachine};
use shared::domain::{CategoryId, Difficulty};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod renderer;

use commands::{dispatch, CommandError, QuizCommand};
use config::load_settings;
use renderer::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(name = "trivia", about = "Play trivia quizzes in the terminal")]
struct Args {
    /// Base URL of the trivia server.
    #[arg(long)]
    server_url: Option<String>,
    /// Initial difficulty: all, easy, medium or hard.
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Initial category id (0 for all).
    #[arg(long)]
    category: Option<i64>,
    /// Settings file; defaults to ./trivia.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    info!(server_url = %settings.server_url, batch_size = settings.batch_size, "starting trivia client");

    let client = Arc::new(HttpTriviaClient::new(&settings.server_url)?);
    let mut quiz = QuizController::with_machine(
        QuizMachine::new(settings.batch_size),
        client.clone(),
        client,
        TerminalRenderer::new(std::io::stdout()),
    );

    quiz.reset();
    quiz.load_categories().await;
    if let Some(difficulty) = args.difficulty {
        quiz.set_difficulty(difficulty);
    }
    if let Some(category) = args.category {
        quiz.set_category(CategoryId(category));
    }
    quiz.renderer_mut().help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.parse::<QuizCommand>() {
            Ok(command) => {
                if dispatch(&mut quiz, command).await.is_break() {
                    break;
                }
            }
            Err(CommandError::Empty) => {}
            Err(error) => quiz
                .renderer_mut()
                .notice(&format!("{error} (type 'help' for commands)")),
        }
    }

    Ok(())
}
