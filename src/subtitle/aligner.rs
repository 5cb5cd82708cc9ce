//! Reconciles a backend fragment stream against the sentence-segmented
//! input text.
//!
//! Fragment boundaries rarely coincide with sentence boundaries: word-level
//! backends emit many fragments per sentence, whole-text backends emit one
//! fragment for everything. The aligner accumulates fragment text until it
//! matches the current script line, absorbing the punctuation drift TTS
//! engines introduce, and only then emits a cue.

use super::{SubtitleCue, srt};
use crate::error::{Result, TtsError};
use crate::fragment::{FragmentStream, TimedFragment};
use crate::split;
use log::{info, warn};
use std::path::Path;

/// Replace the common XML/HTML entities backends leave in fragment text.
fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn strip_punctuation(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}

fn strip_non_word(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Three-tier comparison between accumulated text and a script line:
/// exact, punctuation-insensitive, then whitespace-and-punctuation
/// insensitive. First match wins.
fn matches_line(pending: &str, line: &str) -> bool {
    if pending == line {
        return true;
    }
    if strip_punctuation(pending) == strip_punctuation(line) {
        return true;
    }
    strip_non_word(pending) == strip_non_word(line)
}

/// Accumulator that turns timed fragments into cues, one script line at a
/// time.
///
/// Between cues the aligner is accumulating: it latches the start offset of
/// the first fragment of the pending cue and appends each fragment's text.
/// A match against the current script line emits the cue and resets the
/// accumulator; no match just keeps accumulating, and the script line
/// pointer never advances on a miss.
#[derive(Debug)]
pub struct Aligner {
    script_lines: Vec<String>,
    next_line: usize,
    emitted: usize,
    pending: String,
    cue_start: Option<u64>,
}

impl Aligner {
    pub fn new(script_lines: Vec<String>) -> Self {
        Self {
            script_lines,
            next_line: 0,
            emitted: 0,
            pending: String::new(),
            cue_start: None,
        }
    }

    /// Number of script lines the stream must account for.
    pub fn expected(&self) -> usize {
        self.script_lines.len()
    }

    /// Number of cues emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Feed one fragment; returns a finalized cue when the accumulated
    /// text matches the current script line.
    pub fn push(&mut self, fragment: &TimedFragment) -> Option<SubtitleCue> {
        if self.cue_start.is_none() {
            self.cue_start = Some(fragment.start);
        }
        self.pending.push_str(&unescape_entities(&fragment.text));

        let line = self.script_lines.get(self.next_line)?;
        if !matches_line(&self.pending, line) {
            return None;
        }

        let cue = SubtitleCue {
            index: self.emitted + 1,
            start: self.cue_start.take().unwrap_or(fragment.start),
            end: fragment.end,
            text: line.trim().to_string(),
        };
        self.emitted += 1;
        self.next_line += 1;
        self.pending.clear();
        Some(cue)
    }
}

/// Align a fragment stream against the original text and write an SRT
/// file.
///
/// The original text is bracket-normalized and punctuation-split exactly
/// as the splitter would segment it; that segmentation is the target the
/// cue sequence must fully cover. On any mismatch between emitted cues and
/// script lines the failure is logged with both counts and **no** subtitle
/// file is produced.
pub fn create_subtitle(
    stream: &FragmentStream,
    original_text: &str,
    subtitle_path: &Path,
) -> Result<()> {
    let normalized = split::normalize(original_text);
    let script_lines = split::split_by_punctuation(&normalized);

    let mut aligner = Aligner::new(script_lines);
    let mut cues = Vec::new();
    for fragment in stream {
        if let Some(cue) = aligner.push(fragment) {
            cues.push(cue);
        }
    }

    if cues.len() != aligner.expected() {
        warn!(
            "subtitle alignment failed: {} cues for {} script lines, not writing {}",
            cues.len(),
            aligner.expected(),
            subtitle_path.display()
        );
        return Err(TtsError::AlignmentMismatch {
            cues: cues.len(),
            lines: aligner.expected(),
        });
    }

    srt::write_cues(subtitle_path, &cues)?;

    let duration = cues
        .last()
        .map(|c| c.end as f64 / crate::defaults::TICKS_PER_SECOND as f64)
        .unwrap_or(0.0);
    info!(
        "subtitle file created: {} ({} cues, {:.2}s)",
        subtitle_path.display(),
        cues.len(),
        duration
    );
    Ok(())
}
