//! Audio container helpers.

pub mod wav;

pub use wav::{pcm_duration_ticks, wav_duration_ticks, write_pcm_wav};
