//! Interactive PDF Q&A from the terminal
//!
//! Run with: cargo run -p pdf-rag --features cli --bin pdf-rag-chat -- doc.pdf

use anyhow::Context;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_rag::config::RagConfig;
use pdf_rag::feedback::{FeedbackStore, Rating};
use pdf_rag::generation::ChatSession;
use pdf_rag::ingestion::IngestionCoordinator;
use pdf_rag::providers::{EmbeddingProvider, OllamaProvider};
use pdf_rag::types::DocumentInput;

#[derive(Parser)]
#[command(name = "pdf-rag-chat", about = "Chat with your PDF documents")]
struct Args {
    /// PDF files to ingest
    #[arg(required = true)]
    pdfs: Vec<PathBuf>,

    /// Optional TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of retrieved chunks per question
    #[arg(long)]
    top_k: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_rag=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RagConfig::from_file(path)?,
        None => RagConfig::default(),
    };
    if let Some(top_k) = args.top_k {
        config.retrieval.top_k = top_k;
    }

    let provider = OllamaProvider::new(&config.llm, config.embeddings.dimensions);
    if !provider.embedder().health_check().await.unwrap_or(false) {
        eprintln!(
            "{} Ollama not reachable at {} - start it with `ollama serve`",
            style("warning:").yellow().bold(),
            config.llm.base_url
        );
    }

    let mut documents = Vec::with_capacity(args.pdfs.len());
    for path in &args.pdfs {
        let data = std::fs::read(path)
            .with_context(|| format!("cannot read '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(DocumentInput::new(name, data));
    }
    let pdf_names = documents
        .iter()
        .map(|d| d.name.clone())
        .collect::<Vec<_>>()
        .join(", ");

    let coordinator = IngestionCoordinator::new(
        provider.embedder(),
        provider.generator(),
        config.clone(),
    );

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{spinner} processing [{bar:40}] {percent}%")
            .expect("valid progress template"),
    );
    let (chain, chunk_counts) = coordinator
        .ingest(documents, |fraction| {
            bar.set_position((fraction * 100.0) as u64)
        })
        .await?;
    bar.finish_and_clear();

    println!(
        "{} {} chunks from {} document(s): {}",
        style("Indexed").green().bold(),
        chunk_counts.iter().sum::<usize>(),
        chunk_counts.len(),
        pdf_names
    );
    println!("Ask a question, or :like / :dislike [comment], :stats, :export, :quit");

    let feedback = FeedbackStore::new(&config.feedback);
    let mut session = ChatSession::new(chain);
    let mut last_turn: Option<(String, String)> = None;

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{} ", style("?").cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let input = line?;
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            ":quit" | ":q" => break,
            ":stats" => {
                let stats = feedback.stats();
                println!(
                    "{} total, {} likes, {} dislikes, {}% liked",
                    stats.total, stats.likes, stats.dislikes, stats.like_rate_percent
                );
            }
            ":export" => match feedback.export()? {
                Some(path) => println!("exported to {}", path.display()),
                None => println!("nothing to export"),
            },
            _ if input.starts_with(":like") || input.starts_with(":dislike") => {
                let Some((question, answer)) = &last_turn else {
                    println!("no answer to rate yet");
                    continue;
                };
                let (rating, comment) = match input.strip_prefix(":like") {
                    Some(rest) => (Rating::Like, rest),
                    None => (
                        Rating::Dislike,
                        input.strip_prefix(":dislike").unwrap_or(""),
                    ),
                };
                let id = feedback.add(question, answer, rating, comment.trim(), &pdf_names);
                println!("feedback recorded (id {})", id);
            }
            question => match session.ask(question).await {
                Ok(answer) => {
                    println!("{}", answer);
                    last_turn = Some((question.to_string(), answer));
                }
                Err(e) => {
                    eprintln!("{} {}", style("error:").red().bold(), e);
                }
            },
        }
    }

    Ok(())
}
