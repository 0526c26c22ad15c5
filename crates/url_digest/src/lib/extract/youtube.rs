//! YouTube transcript retrieval, with an optional audio-transcription
//! fallback for videos that carry no caption track.
//!
//! The transcript path scrapes the `captionTracks` JSON out of the watch
//! page's player-response script and fetches the referenced timedtext track.
//! The fallback path downloads the audio via `yt-dlp`, splits it into
//! chunks with `ffmpeg` and feeds each chunk to the speech-to-text service.

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
    time::{SystemTime, UNIX_EPOCH},
};

use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::{error::ExtractionError, llm::Transcriber};

/// 10 minutes per chunk, the largest slice Whisper handles comfortably.
const CHUNK_SECONDS: u32 = 600;

static CAPTION_TRACKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""captionTracks":(\[.*?\])"#).unwrap());

static CUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<text[^>]*>(.*?)</text>").unwrap());

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

pub(super) async fn extract<T: Transcriber + Send + Sync>(
    client: &reqwest::Client,
    transcriber: &T,
    workdir: &Path,
    url: &Url,
    fallback_to_audio: bool,
) -> Result<String, ExtractionError> {
    match fetch_transcript(client, url).await {
        Ok(text) => Ok(text),
        Err(e) if fallback_to_audio => {
            tracing::warn!(error = %e, "No transcript, falling back to audio transcription");
            transcribe_audio(transcriber, workdir, url).await
        }
        Err(e) => Err(e),
    }
}

#[tracing::instrument(skip(client))]
async fn fetch_transcript(client: &reqwest::Client, url: &Url) -> Result<String, ExtractionError> {
    let page = client
        .get(url.clone())
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await?
        .text()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to download watch page"))?;

    let track_url = english_track_url(&page)
        .ok_or_else(|| ExtractionError::TranscriptUnavailable(url.to_string()))?;

    let xml = client
        .get(&track_url)
        .send()
        .await?
        .text()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to download transcript track"))?;

    let text = transcript_text(&xml);
    if text.is_empty() {
        return Err(ExtractionError::TranscriptUnavailable(url.to_string()));
    }
    Ok(text)
}

/// Pulls the `captionTracks` array out of the watch page and returns the
/// URL of the English track, if one exists.
fn english_track_url(page: &str) -> Option<String> {
    let tracks_json = CAPTION_TRACKS_RE.captures(page)?.get(1)?.as_str();
    let tracks: Vec<CaptionTrack> = serde_json::from_str(tracks_json).ok()?;

    tracks
        .into_iter()
        .find(|t| t.language_code == "en" || t.language_code.starts_with("en-"))
        .map(|t| t.base_url.replace("\\u0026", "&"))
}

/// Joins the cue texts of a timedtext XML document with single spaces.
fn transcript_text(xml: &str) -> String {
    let cues: Vec<String> = CUE_RE
        .captures_iter(xml)
        .filter_map(|cap| cap.get(1))
        .map(|m| unescape(m.as_str()))
        .map(|cue| cue.trim().to_string())
        .filter(|cue| !cue.is_empty())
        .collect();

    cues.join(" ")
}

fn unescape(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[tracing::instrument(skip(transcriber, workdir))]
async fn transcribe_audio<T: Transcriber + Send + Sync>(
    transcriber: &T,
    workdir: &Path,
    url: &Url,
) -> Result<String, ExtractionError> {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let job_dir = workdir.join(format!("audio-{nonce}"));
    std::fs::create_dir_all(&job_dir)?;

    let result = download_and_transcribe(transcriber, &job_dir, url).await;

    // temp audio and chunk files never outlive the request
    if let Err(e) = std::fs::remove_dir_all(&job_dir) {
        tracing::warn!(error = ?e, path = ?job_dir, "Failed to clean up audio directory");
    }

    result
}

async fn download_and_transcribe<T: Transcriber + Send + Sync>(
    transcriber: &T,
    job_dir: &Path,
    url: &Url,
) -> Result<String, ExtractionError> {
    let audio_path = job_dir.join("audio.mp3");
    let output_template = job_dir.join("audio.%(ext)s").to_string_lossy().into_owned();
    run_tool(
        "yt-dlp",
        &[
            "-x",
            "--audio-format",
            "mp3",
            "--output",
            &output_template,
            url.as_str(),
        ],
    )
    .await?;
    if !audio_path.exists() {
        return Err(ExtractionError::AudioTool(format!(
            "yt-dlp did not produce expected file: {}",
            audio_path.display()
        )));
    }

    let chunks_dir = job_dir.join("chunks");
    std::fs::create_dir_all(&chunks_dir)?;
    let input = audio_path.to_string_lossy().into_owned();
    let chunk_template = chunks_dir.join("chunk_%03d.mp3").to_string_lossy().into_owned();
    let segment_time = CHUNK_SECONDS.to_string();
    run_tool(
        "ffmpeg",
        &[
            "-i",
            &input,
            "-f",
            "segment",
            "-segment_time",
            &segment_time,
            "-c",
            "copy",
            &chunk_template,
        ],
    )
    .await?;

    let mut chunks: Vec<PathBuf> = std::fs::read_dir(&chunks_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    chunks.sort();

    let mut text = String::new();
    for chunk in &chunks {
        let chunk_text = transcriber
            .transcribe(chunk)
            .await
            .map_err(|e| ExtractionError::Transcription(format!("{e:?}")))?;
        text.push_str(&chunk_text);
        text.push(' ');
    }

    Ok(text.trim().to_string())
}

async fn run_tool(program: &str, args: &[&str]) -> Result<(), ExtractionError> {
    tracing::debug!(program, ?args, "Running external tool");
    let output = tokio::process::Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| ExtractionError::AudioTool(format!("{program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractionError::AudioTool(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}
