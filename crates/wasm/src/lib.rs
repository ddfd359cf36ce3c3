//! WASM bindings for memegen
//!
//! This crate provides JavaScript-friendly API for:
//! - Fitting a selected image onto the drawing surface
//! - Drawing top/bottom captions
//! - Reading captions aloud with the browser's speech synthesis
//! - Tracking which form buttons are enabled
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { MemeGenerator, volumeIconFor } from 'memegen-wasm';
//!
//! await init();
//!
//! const meme = new MemeGenerator();
//! meme.loadFont('sans-serif', fontBytes);
//!
//! imageInput.addEventListener('change', async () => {
//!   const file = imageInput.files[0];
//!   meme.selectImage(file.name, new Uint8Array(await file.arrayBuffer()));
//!   meme.drawTo(canvas.getContext('2d'));
//! });
//!
//! generateButton.onclick = () => {
//!   meme.generate(topText.value, bottomText.value);
//!   meme.drawTo(canvas.getContext('2d'));
//!   const buttons = meme.buttons();
//!   generateButton.disabled = !buttons.generate;
//! };
//!
//! volumeSlider.oninput = () => { volumeIcon.src = meme.setVolume(volumeSlider.value); };
//! ```

use meme_core::{
    MemeConfig, MemeController, MemeError, MemoryImageSource, RasterSurface, SelectedFile,
    SpeechSynth, UiEvent, Utterance, Voice, VolumeLevel,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{
    CanvasRenderingContext2d, ImageData, SpeechSynthesis, SpeechSynthesisUtterance,
    SpeechSynthesisVoice,
};

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js(err: MemeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Speech synthesis backed by `window.speechSynthesis`
///
/// Voices are enumerated live because browsers populate the list
/// asynchronously after page load.
pub struct WebSpeech {
    synth: Option<SpeechSynthesis>,
}

impl WebSpeech {
    pub fn from_window() -> Self {
        let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        if synth.is_none() {
            log::warn!("speechSynthesis is not available");
        }
        Self { synth }
    }

    fn platform_voices(&self) -> Vec<SpeechSynthesisVoice> {
        self.synth
            .as_ref()
            .map(|synth| {
                synth
                    .get_voices()
                    .iter()
                    .map(|v| v.unchecked_into::<SpeechSynthesisVoice>())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl SpeechSynth for WebSpeech {
    fn voices(&self) -> Vec<Voice> {
        self.platform_voices()
            .iter()
            .map(|v| Voice::new(&v.name(), &v.lang(), v.default()))
            .collect()
    }

    fn speak(&mut self, utterance: &Utterance) -> meme_core::Result<()> {
        let synth = self
            .synth
            .as_ref()
            .ok_or_else(|| MemeError::SpeechError("speechSynthesis unavailable".to_string()))?;

        let speech = SpeechSynthesisUtterance::new_with_text(&utterance.text)
            .map_err(|e| MemeError::SpeechError(format!("{e:?}")))?;
        speech.set_volume(utterance.volume);

        let voice = utterance
            .voice
            .and_then(|index| self.platform_voices().into_iter().nth(index));
        speech.set_voice(voice.as_ref());

        synth.speak(&speech);
        Ok(())
    }
}

/// Meme generator session
#[wasm_bindgen]
pub struct MemeGenerator {
    inner: MemeController<RasterSurface, MemoryImageSource, WebSpeech>,
}

#[wasm_bindgen]
impl MemeGenerator {
    /// Create a generator
    ///
    /// @param configJson - Optional JSON configuration (canvas size, caption style)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<MemeGenerator, JsValue> {
        let config = match config_json {
            Some(json) => MemeConfig::from_json(&json).map_err(to_js)?,
            None => MemeConfig::default(),
        };
        let surface = RasterSurface::new(config.canvas.width, config.canvas.height);
        let inner = MemeController::new(
            config,
            surface,
            MemoryImageSource::new(),
            WebSpeech::from_window(),
        );
        Ok(MemeGenerator { inner })
    }

    /// Load a caption font
    ///
    /// @param name - Font family name, matching the configured caption family
    /// @param data - TTF file bytes (Uint8Array)
    #[wasm_bindgen(js_name = loadFont)]
    pub fn load_font(&mut self, name: &str, data: &[u8]) -> Result<(), JsValue> {
        self.inner
            .surface_mut()
            .add_font(name, data.to_vec())
            .map_err(to_js)
    }

    /// Select an image and draw it letterboxed onto the surface
    ///
    /// @param name - File name
    /// @param data - Image file bytes (Uint8Array)
    #[wasm_bindgen(js_name = selectImage)]
    pub fn select_image(&mut self, name: &str, data: &[u8]) -> Result<(), JsValue> {
        self.inner
            .dispatch(UiEvent::ImageSelected(SelectedFile::new(name, data.to_vec())))
            .map_err(to_js)
    }

    /// Draw the captions onto the loaded image
    pub fn generate(&mut self, top: &str, bottom: &str) -> Result<(), JsValue> {
        self.inner
            .dispatch(UiEvent::GenerateClicked {
                top: top.to_string(),
                bottom: bottom.to_string(),
            })
            .map_err(to_js)
    }

    /// Clear the surface and release the selected image
    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.inner.dispatch(UiEvent::ClearClicked).map_err(to_js)
    }

    /// Speak both captions
    #[wasm_bindgen(js_name = readText)]
    pub fn read_text(&mut self, top: &str, bottom: &str) -> Result<(), JsValue> {
        self.inner
            .dispatch(UiEvent::ReadClicked {
                top: top.to_string(),
                bottom: bottom.to_string(),
            })
            .map_err(to_js)
    }

    /// Move the volume slider
    ///
    /// @param value - Slider value (0-100)
    /// @returns Icon path for the new level
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, value: u8) -> Result<String, JsValue> {
        self.inner
            .dispatch(UiEvent::VolumeChanged(value))
            .map_err(to_js)?;
        Ok(self.inner.volume_level().icon_path())
    }

    /// Pick a voice by its index in `voiceLabels()`
    #[wasm_bindgen(js_name = selectVoice)]
    pub fn select_voice(&mut self, index: usize) -> Result<(), JsValue> {
        self.inner
            .dispatch(UiEvent::VoiceSelected(index))
            .map_err(to_js)
    }

    /// Re-enumerate voices, call from `speechSynthesis.onvoiceschanged`
    #[wasm_bindgen(js_name = refreshVoices)]
    pub fn refresh_voices(&mut self) {
        self.inner.refresh_voices();
    }

    /// Voice picker labels, e.g. "Alex(en-US) -- default"
    #[wasm_bindgen(js_name = voiceLabels)]
    pub fn voice_labels(&self) -> Vec<JsValue> {
        self.inner
            .voices()
            .labels()
            .into_iter()
            .map(|s| JsValue::from_str(&s))
            .collect()
    }

    /// Whether the voice picker should be enabled
    #[wasm_bindgen(getter, js_name = voiceSelectEnabled)]
    pub fn voice_select_enabled(&self) -> bool {
        self.inner.voices().is_enabled()
    }

    /// Index of the selected voice, if any
    #[wasm_bindgen(getter, js_name = selectedVoice)]
    pub fn selected_voice(&self) -> Option<usize> {
        self.inner.voices().selected()
    }

    /// Current state: "Empty", "ImageLoaded" or "Generated"
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        format!("{:?}", self.inner.state())
    }

    /// Button flags as `{ clear, read, generate }`
    pub fn buttons(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.buttons())?)
    }

    /// Icon path for the current volume
    #[wasm_bindgen(getter, js_name = volumeIcon)]
    pub fn volume_icon(&self) -> String {
        self.inner.volume_level().icon_path()
    }

    /// Alt text for the canvas (selected file name)
    #[wasm_bindgen(getter)]
    pub fn alt(&self) -> String {
        self.inner.surface().alt().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.surface().canvas().width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.surface().canvas().height()
    }

    /// Raw RGBA pixels of the surface
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.surface().pixels().to_vec()
    }

    /// Surface encoded as PNG
    #[wasm_bindgen(js_name = toPng)]
    pub fn to_png(&self) -> Result<Vec<u8>, JsValue> {
        self.inner.surface().to_png().map_err(to_js)
    }

    /// Copy the surface onto a canvas context at (0, 0)
    #[wasm_bindgen(js_name = drawTo)]
    pub fn draw_to(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let surface = self.inner.surface();
        let canvas = surface.canvas();
        let data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(surface.pixels()),
            canvas.width(),
            canvas.height(),
        )?;
        ctx.put_image_data(&data, 0.0, 0.0)
    }
}

/// Compute where an image lands on the surface
///
/// @returns `{ width, height, startX, startY }`
#[wasm_bindgen(js_name = fitImage)]
pub fn fit_image(
    container_width: f64,
    container_height: f64,
    source_width: f64,
    source_height: f64,
) -> Result<JsValue, JsValue> {
    let fit = meme_core::fit(container_width, container_height, source_width, source_height)
        .map_err(to_js)?;
    Ok(serde_wasm_bindgen::to_value(&fit)?)
}

/// Icon path for a volume slider value
#[wasm_bindgen(js_name = volumeIconFor)]
pub fn volume_icon_for(value: u8) -> String {
    VolumeLevel::from_value(value).icon_path()
}
