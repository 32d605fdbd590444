//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use tapewarm_config::{RangeIssue, TapePreset, resolve_preset, set_param_by_name, split_override};
use tapewarm_tape::TapeParams;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    split_override(s)
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .map_err(|e| e.to_string())
}

/// Load a preset by file path, user preset name or factory preset name,
/// warning about values that will be clamped.
pub fn load_preset(name: &str) -> anyhow::Result<TapePreset> {
    let preset = resolve_preset(name).with_context(|| {
        format!("cannot load preset '{name}' (see 'tapewarm presets' for the list)")
    })?;
    tracing::info!(preset = %preset.name, "loaded preset");
    for issue in preset.validate() {
        warn_clamped(&issue);
    }
    Ok(preset)
}

/// Apply `key=value` overrides in order.
pub fn apply_overrides(
    params: &mut TapeParams,
    overrides: &[(String, String)],
) -> anyhow::Result<()> {
    for (key, value) in overrides {
        let issue = set_param_by_name(params, key, value)
            .with_context(|| format!("bad override {key}={value}"))?;
        if let Some(issue) = issue {
            warn_clamped(&issue);
        }
    }
    Ok(())
}

/// Log a value that falls outside its range.
pub fn warn_clamped(issue: &RangeIssue) {
    tracing::warn!("{issue}");
}

/// Convert linear amplitude to dB, floored at -120.
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 1e-6 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}
