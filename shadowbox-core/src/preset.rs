/// Named animation presets
pub type PresetId = u8;

/// Preset selected at startup and after a full reset.
pub const DEFAULT_PRESET: PresetId = 1;

/// An immutable bundle of channel settings applied in one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub id: PresetId,
    pub name: &'static str,
    pub model_speed: f32,
    pub model_paused: bool,
    pub orbit_enabled: bool,
    pub orbit_speed: f32,
    pub bobbing_enabled: bool,
    pub bobbing_speed: f32,
    pub path_enabled: bool,
    pub global_speed: f32,
}

pub const PRESETS: [Preset; 5] = [
    Preset {
        id: 1,
        name: "Showcase",
        model_speed: 20.0,
        model_paused: false,
        orbit_enabled: true,
        orbit_speed: 30.0,
        bobbing_enabled: false,
        bobbing_speed: 2.0,
        path_enabled: false,
        global_speed: 1.0,
    },
    Preset {
        id: 2,
        name: "Dynamic",
        model_speed: 60.0,
        model_paused: false,
        orbit_enabled: false,
        orbit_speed: 45.0,
        bobbing_enabled: true,
        bobbing_speed: 3.0,
        path_enabled: false,
        global_speed: 1.5,
    },
    Preset {
        id: 3,
        name: "Cinematic",
        model_speed: 0.0,
        model_paused: true,
        orbit_enabled: true,
        orbit_speed: 20.0,
        bobbing_enabled: true,
        bobbing_speed: 1.5,
        path_enabled: false,
        global_speed: 0.8,
    },
    Preset {
        id: 4,
        name: "Hyperdrive",
        model_speed: 120.0,
        model_paused: false,
        orbit_enabled: true,
        orbit_speed: 90.0,
        bobbing_enabled: false,
        bobbing_speed: 2.0,
        path_enabled: true,
        global_speed: 2.5,
    },
    Preset {
        id: 5,
        name: "Zen",
        model_speed: 10.0,
        model_paused: false,
        orbit_enabled: true,
        orbit_speed: 15.0,
        bobbing_enabled: true,
        bobbing_speed: 0.5,
        path_enabled: false,
        global_speed: 0.3,
    },
];

impl Preset {
    pub fn all() -> &'static [Preset] {
        &PRESETS
    }

    pub fn by_id(id: PresetId) -> Option<&'static Preset> {
        PRESETS.iter().find(|preset| preset.id == id)
    }

    /// Case-insensitive lookup by display name.
    pub fn by_name(name: &str) -> Option<&'static Preset> {
        PRESETS
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
    }
}
