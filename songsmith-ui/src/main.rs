//! songsmith - command-line driver for the song creation wizard
//!
//! Runs the four wizard stages against a songsmith-studio server:
//! describe → (optionally replace) lyrics → upload reference → result.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songsmith_common::api::{Genre, Mood};
use songsmith_ui::{HttpStudioClient, ReferenceFile, Stage, WizardSession, DEFAULT_SERVER_URL};

/// Command-line arguments for songsmith
#[derive(Parser, Debug)]
#[command(name = "songsmith")]
#[command(about = "Generate lyrics, then music in the style of a reference track")]
#[command(version)]
struct Args {
    /// songsmith-studio base URL
    #[arg(short, long, default_value = DEFAULT_SERVER_URL, env = "SONGSMITH_SERVER")]
    server: String,

    /// What the song should be about
    #[arg(short, long)]
    description: String,

    #[arg(short, long, default_value = "neutral")]
    mood: Mood,

    #[arg(short, long, default_value = "any")]
    genre: Genre,

    /// Reference track (.mp3 or .wav)
    #[arg(short, long)]
    reference: PathBuf,

    /// Use these lyrics instead of the generated ones
    #[arg(short, long)]
    lyrics_file: Option<PathBuf>,

    /// Stop after printing the generated lyrics
    #[arg(long)]
    lyrics_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songsmith_ui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let backend = HttpStudioClient::new(&args.server).context("Failed to build HTTP client")?;
    info!("Server: {}", backend.base_url());

    let mut session = WizardSession::new();
    session.set_description(args.description);
    session.set_mood(args.mood);
    session.set_genre(args.genre);

    // DescribeIntent → EditLyrics
    report_stage(&session);
    session
        .advance(&backend)
        .await
        .context("Lyrics generation failed")?;
    println!("{}\n", session.lyrics_text());

    if args.lyrics_only {
        return Ok(());
    }

    // EditLyrics → UploadReference
    report_stage(&session);
    if let Some(path) = &args.lyrics_file {
        let edited = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        session.edit_lyrics(edited);
    }
    session.advance(&backend).await?;

    // UploadReference → Result
    report_stage(&session);
    let reference = ReferenceFile::from_path(&args.reference).await?;
    session.select_reference(reference);
    session
        .advance(&backend)
        .await
        .context("Music generation failed")?;

    if let Some(track) = session.result_reference() {
        println!("{}", track);
    }

    Ok(())
}

fn report_stage(session: &WizardSession) {
    let index = Stage::ALL
        .iter()
        .position(|s| *s == session.stage())
        .unwrap_or_default();
    info!("Step {}/{}: {}", index + 1, Stage::ALL.len(), session.stage());
}
