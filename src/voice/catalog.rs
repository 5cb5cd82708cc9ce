//! Static voice catalogs per backend.
//!
//! Voice lists are fixed per build: immutable tables aggregated by
//! [`list_voices`] into display names whose format encodes the backend
//! (see [`super::VoiceSelection::parse`]).

/// A neural voice served by the Edge/Azure speech endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeuralVoice {
    pub name: &'static str,
    pub gender: &'static str,
}

/// Neural voices available through the Edge and Azure backends.
///
/// Display name format: `name-Gender`.
pub const NEURAL_VOICES: &[NeuralVoice] = &[
    NeuralVoice {
        name: "vi-VN-HoaiMyNeural",
        gender: "Female",
    },
    NeuralVoice {
        name: "vi-VN-NamMinhNeural",
        gender: "Male",
    },
];

/// A Gemini prebuilt voice with its style annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiVoice {
    pub name: &'static str,
    pub style: &'static str,
}

/// Gemini prebuilt voices. Display name format: `gemini:name`.
pub const GEMINI_VOICES: &[GeminiVoice] = &[
    GeminiVoice { name: "Zephyr", style: "Bright" },
    GeminiVoice { name: "Puck", style: "Upbeat" },
    GeminiVoice { name: "Charon", style: "Informative" },
    GeminiVoice { name: "Kore", style: "Firm" },
    GeminiVoice { name: "Fenrir", style: "Excitable" },
    GeminiVoice { name: "Leda", style: "Youthful" },
    GeminiVoice { name: "Orus", style: "Firm" },
    GeminiVoice { name: "Aoede", style: "Breezy" },
    GeminiVoice { name: "Callirrhoe", style: "Easy-going" },
    GeminiVoice { name: "Autonoe", style: "Bright" },
    GeminiVoice { name: "Enceladus", style: "Breathy" },
    GeminiVoice { name: "Iapetus", style: "Clear" },
    GeminiVoice { name: "Umbriel", style: "Easy-going" },
    GeminiVoice { name: "Algieba", style: "Smooth" },
    GeminiVoice { name: "Despina", style: "Smooth" },
    GeminiVoice { name: "Erinome", style: "Clear" },
    GeminiVoice { name: "Algenib", style: "Gravelly" },
    GeminiVoice { name: "Rasalgethi", style: "Informative" },
    GeminiVoice { name: "Laomedeia", style: "Upbeat" },
    GeminiVoice { name: "Achernar", style: "Soft" },
    GeminiVoice { name: "Alnilam", style: "Firm" },
    GeminiVoice { name: "Schedar", style: "Even" },
    GeminiVoice { name: "Gacrux", style: "Mature" },
    GeminiVoice { name: "Pulcherrima", style: "Forward" },
    GeminiVoice { name: "Achird", style: "Friendly" },
    GeminiVoice { name: "Zubenelgenubi", style: "Casual" },
    GeminiVoice { name: "Vindemiatrix", style: "Gentle" },
    GeminiVoice { name: "Sadachbia", style: "Lively" },
    GeminiVoice { name: "Sadaltager", style: "Knowledgeable" },
    GeminiVoice { name: "Sulafat", style: "Warm" },
];

/// A SiliconFlow hosted-model voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiliconFlowVoice {
    pub model: &'static str,
    pub voice: &'static str,
    pub gender: &'static str,
}

/// SiliconFlow CosyVoice voices.
///
/// Display name format: `siliconflow:model:voice-Gender`.
pub const SILICONFLOW_VOICES: &[SiliconFlowVoice] = &[
    SiliconFlowVoice { model: "FunAudioLLM/CosyVoice2-0.5B", voice: "alex", gender: "Male" },
    SiliconFlowVoice { model: "FunAudioLLM/CosyVoice2-0.5B", voice: "anna", gender: "Female" },
    SiliconFlowVoice { model: "FunAudioLLM/CosyVoice2-0.5B", voice: "bella", gender: "Female" },
    SiliconFlowVoice { model: "FunAudioLLM/CosyVoice2-0.5B", voice: "benjamin", gender: "Male" },
    SiliconFlowVoice { model: "FunAudioLLM/CosyVoice2-0.5B", voice: "charles", gender: "Male" },
    SiliconFlowVoice { model: "FunAudioLLM/CosyVoice2-0.5B", voice: "claire", gender: "Female" },
    SiliconFlowVoice { model: "FunAudioLLM/CosyVoice2-0.5B", voice: "david", gender: "Male" },
    SiliconFlowVoice { model: "FunAudioLLM/CosyVoice2-0.5B", voice: "diana", gender: "Female" },
];

/// Aggregate all backend voice lists into sorted, deduplicated display
/// names.
///
/// `filter_locales` is a case-insensitive locale-prefix filter (e.g.
/// `["vi-VN"]`) applied only to the Edge/Azure neural voice list; the
/// Gemini and SiliconFlow catalogs are not locale-scoped.
pub fn list_voices(filter_locales: Option<&[&str]>) -> Vec<String> {
    let mut voices = Vec::new();

    for v in NEURAL_VOICES {
        let keep = match filter_locales {
            Some(filters) => filters
                .iter()
                .any(|f| v.name.to_lowercase().starts_with(&f.to_lowercase())),
            None => true,
        };
        if keep {
            voices.push(format!("{}-{}", v.name, v.gender));
        }
    }

    for v in GEMINI_VOICES {
        voices.push(format!("gemini:{}", v.name));
    }

    for v in SILICONFLOW_VOICES {
        voices.push(format!("siliconflow:{}:{}-{}", v.model, v.voice, v.gender));
    }

    voices.sort();
    voices.dedup();
    voices
}
