//! Wire protocol shared by the streaming speech backends.
//!
//! The Edge read-aloud endpoint and the Azure Cognitive Services endpoint
//! speak the same websocket framing: a `speech.config` text message and an
//! SSML text message go out; `audio.metadata` / `turn.end` text messages
//! and length-prefixed binary audio messages come back. Word-boundary
//! offsets arrive in 100-ns ticks, except that the cloud service may
//! deliver durations as `HH:MM:SS.ffffff` strings.

use crate::error::{Result, TtsError};
use crate::fragment::FragmentStream;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;

/// One event pushed by a streaming synthesis session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A chunk of encoded audio, in arrival order.
    Audio(Vec<u8>),
    /// A word-boundary marker; offsets in ticks.
    WordBoundary {
        text: String,
        offset: u64,
        duration: u64,
    },
    /// The service finished the synthesis turn.
    TurnEnd,
}

/// Transport seam for a streaming synthesis session.
///
/// The production implementation is [`WsSpeechStream`]; tests substitute
/// mock transports that push canned events.
#[async_trait]
pub trait SpeechStream: Send + Sync {
    /// Run one synthesis session, pushing events as they arrive. Returns
    /// once the session ends or the receiver is dropped.
    async fn run(&self, ssml: String, events: mpsc::Sender<SpeechEvent>) -> Result<()>;
}

/// Websocket transport for the Edge and Azure speech endpoints.
pub struct WsSpeechStream {
    endpoint: String,
    subscription_key: Option<String>,
}

impl WsSpeechStream {
    pub fn new(endpoint: String, subscription_key: Option<String>) -> Self {
        Self {
            endpoint,
            subscription_key,
        }
    }
}

#[async_trait]
impl SpeechStream for WsSpeechStream {
    async fn run(&self, ssml: String, events: mpsc::Sender<SpeechEvent>) -> Result<()> {
        let mut request =
            self.endpoint
                .as_str()
                .into_client_request()
                .map_err(|e| TtsError::Synthesis {
                    message: format!("invalid speech endpoint: {}", e),
                })?;
        if let Some(key) = &self.subscription_key {
            let value = HeaderValue::from_str(key).map_err(|e| TtsError::Synthesis {
                message: format!("invalid subscription key: {}", e),
            })?;
            request
                .headers_mut()
                .insert("Ocp-Apim-Subscription-Key", value);
        }

        let (ws, _) = connect_async(request)
            .await
            .map_err(|e| TtsError::Synthesis {
                message: format!("websocket connect failed: {}", e),
            })?;
        let (mut write, mut read) = ws.split();

        write
            .send(Message::Text(speech_config_message().into()))
            .await
            .map_err(|e| TtsError::Synthesis {
                message: format!("failed to send speech config: {}", e),
            })?;
        write
            .send(Message::Text(ssml_message(&request_id(), &ssml).into()))
            .await
            .map_err(|e| TtsError::Synthesis {
                message: format!("failed to send ssml: {}", e),
            })?;

        while let Some(message) = read.next().await {
            let message = message.map_err(|e| TtsError::Synthesis {
                message: format!("websocket read failed: {}", e),
            })?;
            for event in parse_message(&message)? {
                let turn_end = event == SpeechEvent::TurnEnd;
                if events.send(event).await.is_err() {
                    debug!("speech event receiver dropped, ending session");
                    return Ok(());
                }
                if turn_end {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

/// Drive one session over `transport`: audio chunks are streamed to
/// `audio_path` as they arrive while word boundaries accumulate into the
/// returned fragment stream. Blocks until the session ends. On failure the
/// partially written audio file is removed.
pub async fn collect_session(
    transport: Arc<dyn SpeechStream>,
    ssml: String,
    audio_path: &Path,
) -> Result<FragmentStream> {
    let (tx, mut rx) = mpsc::channel(64);
    let session = tokio::spawn(async move { transport.run(ssml, tx).await });

    let mut stream = FragmentStream::new();
    let write_result: Result<()> = async {
        let mut file = tokio::fs::File::create(audio_path).await?;
        while let Some(event) = rx.recv().await {
            match event {
                SpeechEvent::Audio(bytes) => file.write_all(&bytes).await?,
                SpeechEvent::WordBoundary {
                    text,
                    offset,
                    duration,
                } => stream.push(text, offset, offset + duration),
                SpeechEvent::TurnEnd => break,
            }
        }
        file.flush().await?;
        Ok(())
    }
    .await;
    drop(rx);

    let session_result = match session.await {
        Ok(result) => result,
        Err(e) => Err(TtsError::Synthesis {
            message: format!("session task failed: {}", e),
        }),
    };

    if let Err(e) = write_result.and(session_result) {
        let _ = tokio::fs::remove_file(audio_path).await;
        return Err(e);
    }
    Ok(stream)
}

/// Build the SSML document for one synthesis request.
pub fn build_ssml(text: &str, voice: &str, rate: &str) -> String {
    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='en-US'>\
         <voice name='{}'><prosody rate='{}'>{}</prosody></voice></speak>",
        voice,
        rate,
        escape_text(text)
    )
}

/// Escape characters that would break the SSML document.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn speech_config_message() -> String {
    concat!(
        "Content-Type:application/json; charset=utf-8\r\nPath:speech.config\r\n\r\n",
        "{\"context\":{\"synthesis\":{\"audio\":{\"metadataoptions\":",
        "{\"sentenceBoundaryEnabled\":\"false\",\"wordBoundaryEnabled\":\"true\"},",
        "\"outputFormat\":\"audio-24khz-48kbitrate-mono-mp3\"}}}}"
    )
    .to_string()
}

fn ssml_message(request_id: &str, ssml: &str) -> String {
    format!(
        "X-RequestId:{}\r\nContent-Type:application/ssml+xml\r\nPath:ssml\r\n\r\n{}",
        request_id, ssml
    )
}

/// Request ids only need to be unique per connection.
fn request_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{:032x}", nanos)
}

/// Parse one websocket message into zero or more speech events.
pub fn parse_message(message: &Message) -> Result<Vec<SpeechEvent>> {
    match message {
        Message::Text(text) => parse_text_message(text.as_str()),
        Message::Binary(data) => Ok(parse_binary_message(data).into_iter().collect()),
        _ => Ok(Vec::new()),
    }
}

fn message_path(headers: &str) -> &str {
    headers
        .lines()
        .find_map(|line| line.strip_prefix("Path:"))
        .map(str::trim)
        .unwrap_or("")
}

fn parse_text_message(payload: &str) -> Result<Vec<SpeechEvent>> {
    let (headers, body) = payload.split_once("\r\n\r\n").unwrap_or((payload, ""));
    match message_path(headers) {
        "turn.end" => Ok(vec![SpeechEvent::TurnEnd]),
        "audio.metadata" => parse_metadata(body),
        _ => Ok(Vec::new()),
    }
}

fn parse_metadata(body: &str) -> Result<Vec<SpeechEvent>> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| TtsError::Synthesis {
            message: format!("malformed audio metadata: {}", e),
        })?;

    let mut events = Vec::new();
    let entries = value
        .get("Metadata")
        .and_then(|m| m.as_array())
        .cloned()
        .unwrap_or_default();
    for entry in &entries {
        if entry.get("Type").and_then(|t| t.as_str()) != Some("WordBoundary") {
            continue;
        }
        let data = match entry.get("Data") {
            Some(d) => d,
            None => continue,
        };
        let text = data
            .get("text")
            .and_then(|t| t.get("Text"))
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();
        let offset = data.get("Offset").map(duration_to_ticks).unwrap_or(0);
        let duration = data.get("Duration").map(duration_to_ticks).unwrap_or(0);
        events.push(SpeechEvent::WordBoundary {
            text,
            offset,
            duration,
        });
    }
    Ok(events)
}

/// Convert a metadata duration value to ticks.
///
/// Integers are already tick counts; the cloud service may send
/// `HH:MM:SS.ffffff` strings instead, which are truncated to millisecond
/// precision before conversion.
pub fn duration_to_ticks(value: &serde_json::Value) -> u64 {
    if let Some(ticks) = value.as_u64() {
        return ticks;
    }
    if let Some(text) = value.as_str() {
        return formatted_duration_to_ticks(text).unwrap_or(0);
    }
    0
}

fn formatted_duration_to_ticks(text: &str) -> Option<u64> {
    let mut parts = text.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds_part = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let (seconds, micros): (u64, u64) = match seconds_part.split_once('.') {
        Some((s, frac)) => {
            let micros: u64 = format!("{:0<6}", frac).get(..6)?.parse().ok()?;
            (s.parse().ok()?, micros)
        }
        None => (seconds_part.parse().ok()?, 0),
    };
    let millis = hours * 3_600_000 + minutes * 60_000 + seconds * 1000 + micros / 1000;
    Some(millis * 10_000)
}

fn parse_binary_message(data: &[u8]) -> Option<SpeechEvent> {
    if data.len() < 2 {
        return None;
    }
    let header_len = u16::from_be_bytes([data[0], data[1]]) as usize;
    let payload_start = 2 + header_len;
    if payload_start > data.len() {
        return None;
    }
    let headers = String::from_utf8_lossy(&data[2..payload_start]);
    if !headers.contains("Path:audio") {
        return None;
    }
    let payload = &data[payload_start..];
    if payload.is_empty() {
        return None;
    }
    Some(SpeechEvent::Audio(payload.to_vec()))
}
