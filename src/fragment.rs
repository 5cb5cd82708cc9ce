//! Timed text fragments emitted by speech backends.

use crate::defaults::TICKS_PER_SECOND;
use log::warn;

/// One unit of synthesized speech with its time range.
///
/// Granularity is backend-specific: a word, a sub-word token, or the whole
/// input text. Offsets are in 100-nanosecond ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedFragment {
    pub text: String,
    pub start: u64,
    pub end: u64,
}

/// Ordered sequence of [`TimedFragment`]s produced by one synthesis call.
///
/// Owned exclusively by the caller that receives it; immutable once the
/// backend adapter returns it. Fragments are non-decreasing in start
/// offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentStream {
    fragments: Vec<TimedFragment>,
}

impl FragmentStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment covering `[start, end)` ticks.
    pub fn push(&mut self, text: impl Into<String>, start: u64, end: u64) {
        self.fragments.push(TimedFragment {
            text: text.into(),
            start,
            end,
        });
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedFragment> {
        self.fragments.iter()
    }

    pub fn last(&self) -> Option<&TimedFragment> {
        self.fragments.last()
    }

    /// Total audio duration in seconds, taken from the last fragment's end
    /// offset. An empty stream yields 0.0 with a warning rather than an
    /// error.
    pub fn duration_secs(&self) -> f64 {
        match self.fragments.last() {
            Some(last) => last.end as f64 / TICKS_PER_SECOND as f64,
            None => {
                warn!("duration requested for an empty fragment stream");
                0.0
            }
        }
    }
}

impl<'a> IntoIterator for &'a FragmentStream {
    type Item = &'a TimedFragment;
    type IntoIter = std::slice::Iter<'a, TimedFragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}
