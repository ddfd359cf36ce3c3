//! Session controller dispatching UI events

use crate::config::MemeConfig;
use crate::fit::fit;
use crate::source::{ImageHandle, ImageSource, SelectedFile};
use crate::speech::{SpeechSynth, VoiceSelector};
use crate::state::{Buttons, Transition, UiState};
use crate::surface::DrawingSurface;
use crate::text::{caption_position, CaptionPlacement};
use crate::volume::{VolumeLevel, VolumeSlider};
use crate::{MemeError, Result};

/// A user action delivered to the controller
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// A new file was chosen in the image picker
    ImageSelected(SelectedFile),
    /// The generate button was pressed with the current caption fields
    GenerateClicked { top: String, bottom: String },
    /// The clear button was pressed
    ClearClicked,
    /// The read-text button was pressed with the current caption fields
    ReadClicked { top: String, bottom: String },
    /// The volume slider moved
    VolumeChanged(u8),
    /// A voice was picked
    VoiceSelected(usize),
}

/// Owns everything one generator session needs
///
/// Holds at most one image handle at a time; a new selection releases the
/// previous handle before acquiring the next, and dropping the controller
/// releases whatever is still held.
pub struct MemeController<S: DrawingSurface, I: ImageSource, P: SpeechSynth> {
    config: MemeConfig,
    state: UiState,
    surface: S,
    images: I,
    current: Option<ImageHandle>,
    speech: P,
    voices: VoiceSelector,
    volume: VolumeSlider,
}

impl<S: DrawingSurface, I: ImageSource, P: SpeechSynth> MemeController<S, I, P> {
    /// Start a session, enumerating the synthesizer's voices
    pub fn new(config: MemeConfig, surface: S, images: I, speech: P) -> Self {
        let voices = VoiceSelector::new(speech.voices());
        if !voices.is_enabled() {
            log::warn!("No speech voices available, voice selection disabled");
        }
        let volume = VolumeSlider::new(config.speech.slider_max);

        Self {
            config,
            state: UiState::Empty,
            surface,
            images,
            current: None,
            speech,
            voices,
            volume,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn buttons(&self) -> Buttons {
        self.state.buttons()
    }

    pub fn config(&self) -> &MemeConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn images(&self) -> &I {
        &self.images
    }

    pub fn speech(&self) -> &P {
        &self.speech
    }

    pub fn voices(&self) -> &VoiceSelector {
        &self.voices
    }

    pub fn volume(&self) -> &VolumeSlider {
        &self.volume
    }

    pub fn volume_level(&self) -> VolumeLevel {
        self.volume.level()
    }

    /// Whether an image handle is currently held
    pub fn has_image(&self) -> bool {
        self.current.is_some()
    }

    /// Re-enumerate voices, e.g. after the platform reports a voice change
    pub fn refresh_voices(&mut self) {
        self.voices = VoiceSelector::new(self.speech.voices());
    }

    /// Handle a user action
    pub fn dispatch(&mut self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::ImageSelected(file) => self.select_image(file),
            UiEvent::GenerateClicked { top, bottom } => self.generate(&top, &bottom),
            UiEvent::ClearClicked => {
                self.clear();
                Ok(())
            }
            UiEvent::ReadClicked { top, bottom } => self.read_text(&top, &bottom),
            UiEvent::VolumeChanged(value) => {
                self.volume.set_value(value);
                log::debug!(
                    "Volume set to {} ({})",
                    self.volume.value(),
                    self.volume.level().icon_path()
                );
                Ok(())
            }
            UiEvent::VoiceSelected(index) => self.voices.select(index),
        }
    }

    fn transition(&mut self, transition: Transition) {
        let next = self.state.next(transition);
        log::debug!("{:?}: {:?} -> {:?}", transition, self.state, next);
        self.state = next;
    }

    fn release_current(&mut self) {
        if let Some(handle) = self.current.take() {
            self.images.release(handle);
        }
    }

    fn select_image(&mut self, file: SelectedFile) -> Result<()> {
        log::info!("Image selected: {}", file.name);
        self.release_current();

        let name = file.name.clone();
        let handle = match self.images.acquire(file) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("Failed to open '{}': {}", name, e);
                self.surface.clear();
                self.state = UiState::Empty;
                return Err(e);
            }
        };
        let decoded = match self.images.decode(&handle) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("Failed to decode '{}': {}", name, e);
                self.images.release(handle);
                self.surface.clear();
                self.state = UiState::Empty;
                return Err(e);
            }
        };
        self.current = Some(handle);

        let (width, height) = (self.surface.width(), self.surface.height());
        let rect = fit(width, height, decoded.width as f64, decoded.height as f64)?;

        self.surface.set_alt(&name);
        self.surface
            .fill_rect(0.0, 0.0, width, height, self.config.canvas.background);
        self.surface.draw_image(&decoded, &rect);
        log::debug!(
            "Drew {}x{} image at ({:.1}, {:.1}) size {:.1}x{:.1}",
            decoded.width,
            decoded.height,
            rect.start_x,
            rect.start_y,
            rect.width,
            rect.height
        );

        self.transition(Transition::ImageSelected);
        Ok(())
    }

    fn generate(&mut self, top: &str, bottom: &str) -> Result<()> {
        if self.current.is_none() {
            log::warn!("Generate rejected: no image loaded");
            return Err(MemeError::MissingImage);
        }
        if !self.buttons().generate {
            log::debug!("Generate ignored: captions already drawn");
            return Ok(());
        }

        self.draw_caption(top, CaptionPlacement::Top)?;
        self.draw_caption(bottom, CaptionPlacement::Bottom)?;

        self.transition(Transition::GenerateClicked);
        Ok(())
    }

    fn draw_caption(&mut self, text: &str, placement: CaptionPlacement) -> Result<()> {
        let caption = &self.config.caption;
        let style = caption.text_style();
        let metrics = self.surface.measure_text(text, &style)?;
        let (x, y) = caption_position(
            &metrics,
            self.surface.width(),
            self.surface.height(),
            caption.pad,
            caption.align,
            placement,
        );
        self.surface.fill_text(text, x, y, &style)
    }

    fn clear(&mut self) {
        log::info!("Clearing surface");
        self.surface.clear();
        self.release_current();
        self.transition(Transition::ClearClicked);
    }

    fn read_text(&mut self, top: &str, bottom: &str) -> Result<()> {
        if !self.buttons().read {
            log::warn!("Read rejected: captions not generated");
            return Err(MemeError::ControlDisabled("read"));
        }

        let volume = self.volume.volume();
        let prefixes = [
            (&self.config.speech.top_prefix, top),
            (&self.config.speech.bottom_prefix, bottom),
        ];
        for (prefix, text) in prefixes {
            let utterance = self.voices.utterance(format!("{prefix}{text}"), volume);
            self.speech.speak(&utterance)?;
        }
        Ok(())
    }
}

impl<S: DrawingSurface, I: ImageSource, P: SpeechSynth> Drop for MemeController<S, I, P> {
    fn drop(&mut self) {
        self.release_current();
    }
}
