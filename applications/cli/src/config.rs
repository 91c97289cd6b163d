//! Settings loading for the command-line front end

use crossfeed_core::{CrossfeedError, Result};
use crossfeed_dsp::{CrossfeedPreset, CrossfeedSettings};
use std::path::Path;

/// Environment variable prefix for overrides (`CROSSFEED_HF_CUTOFF=900`)
pub const ENV_PREFIX: &str = "CROSSFEED";

/// Load crossfeed settings from an optional file and the environment
///
/// Sources, later ones winning:
/// 1. Built-in defaults
/// 2. `path` (TOML, JSON, ... by extension), which must exist if given
/// 3. Environment variables prefixed with `CROSSFEED_`
///
/// The preset is `preset` if given, else the loaded `preset` key. A named
/// preset supplies the tone values; `custom` keeps the loaded ones. Without
/// any preset, tone values that differ from the defaults count as custom.
/// `enabled` is always kept as loaded. The result is validated.
pub fn load_settings(
    path: Option<&Path>,
    preset: Option<CrossfeedPreset>,
) -> Result<CrossfeedSettings> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path.to_path_buf()));
    }

    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

    let config = builder
        .build()
        .map_err(|e| CrossfeedError::config(e.to_string()))?;
    let named = config.get_string("preset").is_ok();

    let loaded: CrossfeedSettings = config
        .try_deserialize()
        .map_err(|e| CrossfeedError::config(e.to_string()))?;

    let settings = match preset {
        Some(preset) => loaded.with_preset(preset),
        None if named => {
            let preset = loaded.preset;
            loaded.with_preset(preset)
        }
        None => infer_preset(loaded),
    };

    settings.validate()?;
    Ok(settings)
}

/// Label unnamed settings `custom` unless they match the defaults
fn infer_preset(loaded: CrossfeedSettings) -> CrossfeedSettings {
    let defaults = CrossfeedSettings {
        enabled: loaded.enabled,
        ..CrossfeedSettings::default()
    };
    if loaded == defaults {
        loaded
    } else {
        loaded.with_preset(CrossfeedPreset::Custom)
    }
}
