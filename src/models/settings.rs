use serde::{Deserialize, Serialize};

/// Interface language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsQuality {
    Low,
    Medium,
    #[default]
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions must be positive to be usable.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicsSettings {
    pub quality: GraphicsQuality,
    pub enable_particles: bool,
    pub enable_animations: bool,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            quality: GraphicsQuality::High,
            enable_particles: true,
            enable_animations: true,
        }
    }
}

/// User-adjustable game settings held in memory by [`crate::models::AppState`].
///
/// Volumes are conventionally in `[0, 1]`. The store does not clamp them;
/// input clamping belongs to the settings screen. Equality compares volumes
/// with `total_cmp`, so a stored NaN still equals itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub language: Language,
    pub sound_volume: f32,
    pub music_volume: f32,
    pub fullscreen: bool,
    pub resolution: Resolution,
    pub graphics: GraphicsSettings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            language: Language::Es,
            sound_volume: 0.7,
            music_volume: 0.5,
            fullscreen: false,
            resolution: Resolution::default(),
            graphics: GraphicsSettings::default(),
        }
    }
}

impl PartialEq for GameSettings {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language
            && self.sound_volume.total_cmp(&other.sound_volume).is_eq()
            && self.music_volume.total_cmp(&other.music_volume).is_eq()
            && self.fullscreen == other.fullscreen
            && self.resolution == other.resolution
            && self.graphics == other.graphics
    }
}

impl GameSettings {
    /// Merge a partial update field by field. Absent fields keep their value.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(volume) = patch.sound_volume {
            self.sound_volume = volume;
        }
        if let Some(volume) = patch.music_volume {
            self.music_volume = volume;
        }
        if let Some(fullscreen) = patch.fullscreen {
            self.fullscreen = fullscreen;
        }
        if let Some(resolution) = patch.resolution {
            self.resolution = resolution;
        }
        if let Some(ref graphics) = patch.graphics {
            self.graphics.apply(graphics);
        }
    }
}

impl GraphicsSettings {
    pub fn apply(&mut self, patch: &GraphicsPatch) {
        if let Some(quality) = patch.quality {
            self.quality = quality;
        }
        if let Some(enabled) = patch.enable_particles {
            self.enable_particles = enabled;
        }
        if let Some(enabled) = patch.enable_animations {
            self.enable_animations = enabled;
        }
    }
}

/// Partial [`GameSettings`] update.
///
/// # Example
/// ```ignore
/// let patch = SettingsPatch {
///     sound_volume: Some(0.4),
///     ..Default::default()
/// };
/// state_manager.update_settings(patch);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub language: Option<Language>,
    pub sound_volume: Option<f32>,
    pub music_volume: Option<f32>,
    pub fullscreen: Option<bool>,
    pub resolution: Option<Resolution>,
    pub graphics: Option<GraphicsPatch>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphicsPatch {
    pub quality: Option<GraphicsQuality>,
    pub enable_particles: Option<bool>,
    pub enable_animations: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}
