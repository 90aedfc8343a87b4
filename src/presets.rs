//! Named parameter bundles the user can apply with one click.
//!
//! Presets are immutable and defined at load time. Applying one overwrites
//! exactly the fields it defines; nothing else is merged or reset.

use serde::Serialize;

/// A named bundle of form values. Layer fields are optional per preset;
/// `None` means the preset leaves that field alone.
#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub key: &'static str,
    pub width: u32,
    pub height: u32,
    pub dpr: f32,
    pub format: &'static str,
    pub bg_scale: Option<i32>,
    pub bg_offset_x: Option<i32>,
    pub bg_offset_y: Option<i32>,
    pub main_scale: Option<i32>,
    pub main_offset_x: Option<i32>,
    pub main_offset_y: Option<i32>,
}

/// The fixed preset table exposed by the form chips.
pub const PRESETS: &[Preset] = &[
    Preset {
        key: "mini",
        width: 300,
        height: 420,
        dpr: 2.0,
        format: "png",
        bg_scale: Some(100),
        bg_offset_x: Some(0),
        bg_offset_y: Some(0),
        main_scale: Some(92),
        main_offset_x: Some(0),
        main_offset_y: Some(0),
    },
    Preset {
        key: "standard",
        width: 384,
        height: 576,
        dpr: 3.0,
        format: "png",
        bg_scale: Some(100),
        bg_offset_x: Some(0),
        bg_offset_y: Some(0),
        main_scale: Some(92),
        main_offset_x: Some(0),
        main_offset_y: Some(0),
    },
    // Landscape-ish variant; shifts both layers vertically to keep the
    // subject centered in the wider frame.
    Preset {
        key: "wide",
        width: 768,
        height: 1024,
        dpr: 2.0,
        format: "jpeg",
        bg_scale: Some(110),
        bg_offset_x: Some(0),
        bg_offset_y: Some(-60),
        main_scale: Some(92),
        main_offset_x: Some(0),
        main_offset_y: Some(32),
    },
];

/// Look up a preset by key. Unknown keys yield `None` and callers treat
/// that as a no-op.
pub fn preset(key: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.key == key)
}
