//! Volume slider and icon selection

/// Default slider maximum
pub const DEFAULT_SLIDER_MAX: u8 = 100;

/// Icon level shown next to the volume slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VolumeLevel {
    Muted,
    Low,
    Medium,
    High,
}

impl VolumeLevel {
    /// Pick the icon level for a slider value
    ///
    /// Thresholds: 67 and up is high, 34 and up medium, 1 and up low.
    pub fn from_value(value: u8) -> Self {
        match value {
            67..=u8::MAX => VolumeLevel::High,
            34..=66 => VolumeLevel::Medium,
            1..=33 => VolumeLevel::Low,
            0 => VolumeLevel::Muted,
        }
    }

    /// Numeric level 0-3
    pub fn level(self) -> u8 {
        match self {
            VolumeLevel::Muted => 0,
            VolumeLevel::Low => 1,
            VolumeLevel::Medium => 2,
            VolumeLevel::High => 3,
        }
    }

    /// Icon asset path for this level
    pub fn icon_path(self) -> String {
        format!("icons/volume-level-{}.svg", self.level())
    }
}

/// Range input controlling speech volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeSlider {
    value: u8,
    max: u8,
}

impl Default for VolumeSlider {
    fn default() -> Self {
        Self::new(DEFAULT_SLIDER_MAX)
    }
}

impl VolumeSlider {
    /// Create a slider at full volume
    pub fn new(max: u8) -> Self {
        let max = max.max(1);
        Self { value: max, max }
    }

    /// Move the slider, clamping to its maximum
    pub fn set_value(&mut self, value: u8) {
        self.value = value.min(self.max);
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    /// Speech volume in the range 0.0 - 1.0
    pub fn volume(&self) -> f32 {
        self.value as f32 / self.max as f32
    }

    /// Icon level for the current position
    pub fn level(&self) -> VolumeLevel {
        VolumeLevel::from_value(self.value)
    }
}
