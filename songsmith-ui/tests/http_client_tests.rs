//! HttpStudioClient against a live songsmith-studio router on a loopback port

use async_trait::async_trait;
use songsmith_common::api::{Genre, LyricsRequest, Mood};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use songsmith_studio::error::UpstreamError;
use songsmith_studio::models::{GenerationJob, JobStatus, MusicInput};
use songsmith_studio::services::{
    CompletionProvider, JobPoller, LyricsGenerator, MediaJobProvider, MusicOrchestrator,
    TransientAssetStore,
};
use songsmith_studio::{build_router, AppState};
use songsmith_ui::{BackendError, HttpStudioClient, ReferenceFile, Stage, StudioBackend, WizardSession};

struct EchoCompletion;

#[async_trait]
impl CompletionProvider for EchoCompletion {
    fn provider_id(&self) -> &'static str {
        "Echo"
    }

    async fn complete(&self, _model: &str, prompt: &str) -> Result<String, UpstreamError> {
        Ok(format!("[Verse]\n{}", prompt.lines().next().unwrap_or_default()))
    }
}

struct InstantJobs;

#[async_trait]
impl MediaJobProvider for InstantJobs {
    fn provider_id(&self) -> &'static str {
        "Instant"
    }

    async fn submit(&self, _model: &str, _input: &MusicInput) -> Result<GenerationJob, UpstreamError> {
        Ok(GenerationJob::new("pred-1", JobStatus::Queued))
    }

    async fn fetch(&self, job_id: &str) -> Result<GenerationJob, UpstreamError> {
        Ok(GenerationJob::new(job_id, JobStatus::Succeeded).with_result("https://cdn.example/live.mp3"))
    }
}

/// Serve the studio router; returns its base URL
async fn spawn_studio(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn full_state(temp_dir: &TempDir) -> AppState {
    AppState::new(TransientAssetStore::new(temp_dir.path().join("uploads")))
        .with_lyrics(LyricsGenerator::new(Arc::new(EchoCompletion)))
        .with_music(
            MusicOrchestrator::new(Arc::new(InstantJobs))
                .with_poller(JobPoller::new(Duration::from_millis(5), 3)),
        )
}

#[tokio::test]
async fn test_wizard_round_trip_over_http() {
    let temp_dir = TempDir::new().unwrap();
    let base_url = spawn_studio(full_state(&temp_dir)).await;
    let client = HttpStudioClient::new(base_url).unwrap();

    let mut session = WizardSession::new();
    session.set_description("a song about rainy Sunday mornings");
    session.set_mood(Mood::Calm);
    session.set_genre(Genre::HipHop);

    session.advance(&client).await.unwrap();
    assert!(session.lyrics_text().contains("rainy Sunday mornings"));
    assert!(session.lyrics_text().contains("hip hop genre"));

    session.advance(&client).await.unwrap();
    session.select_reference(
        ReferenceFile::new("reference.mp3", "audio/mpeg", b"ID3\x03\x00".to_vec()).unwrap(),
    );
    session.advance(&client).await.unwrap();

    assert_eq!(session.stage(), Stage::Result);
    assert_eq!(session.result_reference(), Some("https://cdn.example/live.mp3"));
    assert_eq!(
        std::fs::read_dir(temp_dir.path().join("uploads")).unwrap().count(),
        0
    );
}

#[tokio::test]
async fn test_server_error_message_reaches_client() {
    let temp_dir = TempDir::new().unwrap();
    let state = AppState::new(TransientAssetStore::new(temp_dir.path().join("uploads")));
    let client = HttpStudioClient::new(spawn_studio(state).await).unwrap();

    let err = client
        .generate_lyrics(&LyricsRequest {
            description: "anything".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    match err {
        BackendError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "OPENAI_API_KEY is not set in environment variables");
        }
        other => panic!("expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpStudioClient::new(format!("http://{}", addr)).unwrap();
    let err = client
        .generate_lyrics(&LyricsRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Network(_)));
}
