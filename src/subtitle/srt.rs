//! SRT cue formatting and file writing.

use super::SubtitleCue;
use crate::defaults::TICKS_PER_SECOND;
use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Format a tick offset as an SRT timestamp: `HH:MM:SS,mmm`.
///
/// SRT uses a comma as the decimal separator.
pub fn format_timestamp(ticks: u64) -> String {
    let total_millis = ticks / (TICKS_PER_SECOND / 1000);
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let seconds = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Serialize one cue block (without the trailing blank separator line).
fn format_cue(cue: &SubtitleCue) -> String {
    format!(
        "{}\n{} --> {}\n{}\n",
        cue.index,
        format_timestamp(cue.start),
        format_timestamp(cue.end),
        cue.text
    )
}

/// Write cues to an SRT file, blocks separated by a blank line.
///
/// The file handle is released on every exit path; if writing fails after
/// the file was created, the partial file is removed so a truncated
/// subtitle never survives on disk.
pub fn write_cues(path: &Path, cues: &[SubtitleCue]) -> Result<()> {
    let body = cues.iter().map(format_cue).collect::<Vec<_>>().join("\n") + "\n";

    let result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(body.as_bytes())?;
        file.flush()
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(path);
        return Err(e.into());
    }
    Ok(())
}

/// Count the cue blocks in SRT file content (used to verify the alignment
/// count invariant).
pub fn count_cues(content: &str) -> usize {
    content
        .split("\n\n")
        .filter(|block| block.contains("-->"))
        .count()
}
