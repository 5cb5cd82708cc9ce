//! End-to-end tests for the streaming backends against a local mock
//! speech server.

use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use voxsub::{Config, create_subtitle, synthesize};

fn audio_frame(payload: &[u8]) -> Message {
    let header = b"Path:audio\r\n";
    let mut data = Vec::new();
    data.extend_from_slice(&(header.len() as u16).to_be_bytes());
    data.extend_from_slice(header);
    data.extend_from_slice(payload);
    Message::Binary(data.into())
}

fn word_boundary_frame(text: &str, offset: serde_json::Value, duration: serde_json::Value) -> Message {
    let body = serde_json::json!({
        "Metadata": [{
            "Type": "WordBoundary",
            "Data": {"Offset": offset, "Duration": duration, "text": {"Text": text}}
        }]
    });
    Message::Text(format!("Path:audio.metadata\r\n\r\n{}", body).into())
}

fn turn_end_frame() -> Message {
    Message::Text("Path:turn.end\r\n\r\n{}".to_string().into())
}

/// Serve the canned response frames to every connection, counting
/// connections. The client is expected to send its speech.config and SSML
/// messages first; they are read and discarded.
async fn spawn_mock_speech_server(responses: Vec<Message>) -> (String, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&connections);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let responses = responses.clone();
            tokio::spawn(async move {
                let ws = accept_async(stream).await.unwrap();
                let (mut write, mut read) = ws.split();
                let _ = read.next().await; // speech.config
                let _ = read.next().await; // ssml
                for message in responses {
                    if write.send(message).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    (format!("ws://{}", addr), connections)
}

#[tokio::test]
async fn edge_streams_audio_and_aligns_subtitles() {
    let (endpoint, _connections) = spawn_mock_speech_server(vec![
        audio_frame(&[0x01, 0x02]),
        word_boundary_frame("hello", 0u64.into(), 9_000_000u64.into()),
        audio_frame(&[0x03]),
        word_boundary_frame(" world", 10_000_000u64.into(), 8_000_000u64.into()),
        turn_end_frame(),
    ])
    .await;

    let mut config = Config::default();
    config.edge.endpoint = Some(endpoint);

    let dir = TempDir::new().unwrap();
    let audio_path = dir.path().join("edge.mp3");

    let stream = synthesize(
        &config,
        "hello world.",
        "vi-VN-HoaiMyNeural-Female",
        1.0,
        1.0,
        &audio_path,
    )
    .await
    .expect("synthesis should succeed");

    assert_eq!(stream.len(), 2);
    assert_eq!(std::fs::read(&audio_path).unwrap(), vec![0x01, 0x02, 0x03]);
    assert_eq!(stream.duration_secs(), 1.8);

    let srt_path = dir.path().join("edge.srt");
    create_subtitle(&stream, "hello world.", &srt_path).unwrap();
    let content = std::fs::read_to_string(&srt_path).unwrap();
    assert!(content.starts_with("1\n00:00:00,000 --> 00:00:01,800\nhello world\n"));
}

#[tokio::test]
async fn edge_retries_empty_streams_then_gives_up() {
    // The server completes every turn without a single word boundary;
    // each attempt must be treated as a failure.
    let (endpoint, connections) =
        spawn_mock_speech_server(vec![audio_frame(&[0xFF]), turn_end_frame()]).await;

    let mut config = Config::default();
    config.edge.endpoint = Some(endpoint);

    let dir = TempDir::new().unwrap();
    let audio_path = dir.path().join("empty.mp3");

    let result = synthesize(
        &config,
        "hello.",
        "vi-VN-NamMinhNeural-Male",
        1.0,
        1.0,
        &audio_path,
    )
    .await;

    assert!(result.is_none());
    assert_eq!(connections.load(Ordering::SeqCst), 3);
    assert!(!audio_path.exists());
}

#[tokio::test]
async fn azure_converts_string_durations_from_push_events() {
    let (endpoint, _connections) = spawn_mock_speech_server(vec![
        audio_frame(&[0xAB; 32]),
        word_boundary_frame("静夜思", 0u64.into(), "00:00:00.500000".into()),
        word_boundary_frame("唐诗", 5_000_000u64.into(), "00:00:01.250000".into()),
        turn_end_frame(),
    ])
    .await;

    let mut config = Config::default();
    config.azure.speech_key = "test-key".to_string();
    config.azure.speech_region = "eastus".to_string();
    config.azure.endpoint = Some(endpoint);

    let dir = TempDir::new().unwrap();
    let audio_path = dir.path().join("azure.mp3");

    let stream = synthesize(
        &config,
        "静夜思唐诗",
        "zh-CN-XiaoxiaoMultilingualNeural-V2-Female",
        1.0,
        1.0,
        &audio_path,
    )
    .await
    .expect("synthesis should succeed");

    assert_eq!(stream.len(), 2);
    let last = stream.last().unwrap();
    assert_eq!(last.start, 5_000_000);
    // 1.25s duration arrives as a formatted string
    assert_eq!(last.end, 5_000_000 + 12_500_000);
    assert!(audio_path.exists());
}

#[tokio::test]
async fn azure_without_credentials_never_connects() {
    let (endpoint, connections) = spawn_mock_speech_server(vec![turn_end_frame()]).await;

    let mut config = Config::default();
    config.azure.endpoint = Some(endpoint);

    let dir = TempDir::new().unwrap();
    let audio_path = dir.path().join("nocreds.mp3");

    let result = synthesize(
        &config,
        "text",
        "zh-CN-XiaoxiaoMultilingualNeural-V2-Female",
        1.0,
        1.0,
        &audio_path,
    )
    .await;

    assert!(result.is_none());
    assert_eq!(connections.load(Ordering::SeqCst), 0);
}
