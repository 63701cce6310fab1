// config.rs - Scene configuration coming from the control layer
//
// The UI owns the controls; the scene only sees these values.

pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 10;
pub const BASE_DROP_COUNT: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    pub rain_enabled: bool,
    pub lightning_enabled: bool,
    /// Rain intensity level, always within `MIN_INTENSITY..=MAX_INTENSITY`.
    intensity: u8,
    pub base_drop_count: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            rain_enabled: true,
            lightning_enabled: true,
            intensity: 5,
            base_drop_count: BASE_DROP_COUNT,
        }
    }
}

impl SceneConfig {
    pub fn with_intensity(mut self, level: u8) -> Self {
        self.set_intensity(level);
        self
    }

    pub fn with_rain(mut self, enabled: bool) -> Self {
        self.rain_enabled = enabled;
        self
    }

    pub fn with_lightning(mut self, enabled: bool) -> Self {
        self.lightning_enabled = enabled;
        self
    }

    pub fn with_base_drop_count(mut self, count: usize) -> Self {
        self.base_drop_count = count;
        self
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    /// Out-of-range levels are clamped, not rejected.
    pub fn set_intensity(&mut self, level: u8) {
        self.intensity = level.clamp(MIN_INTENSITY, MAX_INTENSITY);
    }

    /// Raindrop population for the current level.
    pub fn drop_count(&self) -> usize {
        self.base_drop_count * self.intensity as usize
    }

    /// Volume handed to the audio layer: level / 10, silent when rain is off.
    pub fn rain_volume(&self) -> f32 {
        if self.rain_enabled {
            self.intensity as f32 / MAX_INTENSITY as f32
        } else {
            0.0
        }
    }
}
