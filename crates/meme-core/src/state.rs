//! UI state machine and button availability

use serde::Serialize;

/// Session state of the generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum UiState {
    /// No image on the surface
    #[default]
    Empty,
    /// Image drawn, no caption yet
    ImageLoaded,
    /// Captions drawn onto the image
    Generated,
}

/// User actions that move the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ImageSelected,
    GenerateClicked,
    ClearClicked,
}

/// Enabled flags for the three form buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Buttons {
    pub clear: bool,
    pub read: bool,
    pub generate: bool,
}

impl UiState {
    /// Apply a transition and return the next state
    ///
    /// Generating without an image leaves the state untouched, as does
    /// generating twice. Clearing always returns to `Empty`.
    pub fn next(self, transition: Transition) -> UiState {
        match (self, transition) {
            (_, Transition::ImageSelected) => UiState::ImageLoaded,
            (UiState::ImageLoaded, Transition::GenerateClicked) => UiState::Generated,
            (state, Transition::GenerateClicked) => state,
            (_, Transition::ClearClicked) => UiState::Empty,
        }
    }

    /// Button availability for this state
    ///
    /// Generate is mutually exclusive with clear/read.
    pub fn buttons(self) -> Buttons {
        let generated = self == UiState::Generated;
        Buttons {
            clear: generated,
            read: generated,
            generate: !generated,
        }
    }
}
