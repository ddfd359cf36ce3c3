//! Speech synthesis collaborators

use crate::{MemeError, Result};
use serde::{Deserialize, Serialize};

/// A synthesizer voice as enumerated by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub lang: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Voice {
    pub fn new(name: &str, lang: &str, is_default: bool) -> Self {
        Self {
            name: name.to_string(),
            lang: lang.to_string(),
            is_default,
        }
    }

    /// Label shown in the voice picker, e.g. "Alex(en-US) -- default"
    pub fn label(&self) -> String {
        let mut label = format!("{}({})", self.name, self.lang);
        if self.is_default {
            label.push_str(" -- default");
        }
        label
    }
}

/// Text queued for speaking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    pub text: String,
    /// Volume in the range 0.0 - 1.0
    pub volume: f32,
    /// Index into the synthesizer's voice list, `None` for the platform default
    pub voice: Option<usize>,
}

/// Platform speech synthesizer
pub trait SpeechSynth {
    /// Voices available for speaking
    fn voices(&self) -> Vec<Voice>;

    /// Queue an utterance
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;
}

/// Synthesizer with no voices that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeech;

impl SpeechSynth for SilentSpeech {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        log::debug!("Discarding utterance: {}", utterance.text);
        Ok(())
    }
}

/// Voice picker state
///
/// An empty voice list leaves the picker disabled; speaking then falls back to
/// the platform default voice.
#[derive(Debug, Clone, Default)]
pub struct VoiceSelector {
    voices: Vec<Voice>,
    selected: Option<usize>,
}

impl VoiceSelector {
    /// Build a selector, preselecting the default voice or the first one
    pub fn new(voices: Vec<Voice>) -> Self {
        let selected = if voices.is_empty() {
            None
        } else {
            Some(voices.iter().position(|v| v.is_default).unwrap_or(0))
        };
        Self { voices, selected }
    }

    pub fn is_enabled(&self) -> bool {
        !self.voices.is_empty()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Picker labels in voice order
    pub fn labels(&self) -> Vec<String> {
        self.voices.iter().map(Voice::label).collect()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_voice(&self) -> Option<&Voice> {
        self.selected.and_then(|i| self.voices.get(i))
    }

    /// Select a voice by index
    pub fn select(&mut self, index: usize) -> Result<()> {
        if self.voices.is_empty() {
            return Err(MemeError::NoVoicesAvailable);
        }
        if index >= self.voices.len() {
            return Err(MemeError::InvalidVoice(index, self.voices.len()));
        }
        self.selected = Some(index);
        Ok(())
    }

    /// Build an utterance for the selected voice
    pub fn utterance(&self, text: String, volume: f32) -> Utterance {
        Utterance {
            text,
            volume: volume.clamp(0.0, 1.0),
            voice: self.selected,
        }
    }
}
