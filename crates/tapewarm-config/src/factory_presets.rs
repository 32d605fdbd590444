//! Factory presets bundled with tapewarm.
//!
//! These are embedded TOML documents, always available without files on disk.
//! They are written in the same format as user presets so they double as
//! examples of it.

use crate::TapePreset;

/// Identifiers of the factory presets, in listing order.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "default",
    "studio_30",
    "warm_ferric",
    "chrome_sheen",
    "worn_cassette",
    "clean_modern",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("studio_30", STUDIO_30_PRESET),
    ("warm_ferric", WARM_FERRIC_PRESET),
    ("chrome_sheen", CHROME_SHEEN_PRESET),
    ("worn_cassette", WORN_CASSETTE_PRESET),
    ("clean_modern", CLEAN_MODERN_PRESET),
];

const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "Power-on state: 15 ips ferric tape at moderate drive"
sample_rate = 48000

[params]
"#;

const STUDIO_30_PRESET: &str = r#"
name = "Studio 30"
description = "Mastering deck at 30 ips on modern tape, gentle glue"
sample_rate = 48000

[params]
input_drive = 1.5
saturation = 35.0
warmth = 35.0
head_bump = 40.0
bump_freq = 75.0
wow = 2.0
flutter = 3.0
hiss = 2.0
bias = 50.0
speed = "30ips"
formulation = "modern"
"#;

const WARM_FERRIC_PRESET: &str = r#"
name = "Warm Ferric"
description = "Slow ferric tape pushed into saturation with a fat low end"
sample_rate = 48000

[params]
input_drive = 3.0
saturation = 75.0
warmth = 70.0
head_bump = 65.0
bump_freq = 70.0
wow = 8.0
flutter = 10.0
hiss = 10.0
output = -2.0
speed = "7.5ips"
formulation = "ferric"
"#;

const CHROME_SHEEN_PRESET: &str = r#"
name = "Chrome Sheen"
description = "Chrome tape at 15 ips: open top, tight bump"
sample_rate = 48000

[params]
saturation = 40.0
warmth = 30.0
head_bump = 45.0
bump_freq = 90.0
flutter = 5.0
hiss = 4.0
bias = 60.0
speed = "15ips"
formulation = "chrome"
"#;

const WORN_CASSETTE_PRESET: &str = r#"
name = "Worn Cassette"
description = "Aged, underbiased tape with heavy wow, flutter and hiss"
sample_rate = 48000

[params]
saturation = 60.0
warmth = 80.0
head_bump = 30.0
bump_freq = 60.0
wow = 45.0
flutter = 35.0
hiss = 35.0
output = -2.0
age = 70.0
bias = 35.0
speed = "7.5ips"
formulation = "ferric"
"#;

const CLEAN_MODERN_PRESET: &str = r#"
name = "Clean Modern"
description = "Barely-there coloration from a well-aligned 30 ips machine"
sample_rate = 48000

[params]
saturation = 10.0
warmth = 20.0
head_bump = 25.0
bump_freq = 80.0
speed = "30ips"
formulation = "modern"
"#;

/// All factory presets, parsed.
pub fn factory_presets() -> Vec<TapePreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| TapePreset::from_toml(toml).ok())
        .collect()
}

/// Looks a factory preset up by identifier (`"warm_ferric"`) or display
/// name (`"Warm Ferric"`), ignoring case.
///
/// # Example
///
/// ```rust
/// use tapewarm_config::find_factory_preset;
///
/// let preset = find_factory_preset("studio 30").expect("bundled");
/// assert_eq!(preset.name, "Studio 30");
/// ```
pub fn find_factory_preset(name: &str) -> Option<TapePreset> {
    let name = name.trim();

    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(name))
    {
        return TapePreset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

/// Whether `name` matches a factory preset identifier or display name.
pub fn is_factory_preset(name: &str) -> bool {
    find_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_params;
    use tapewarm_tape::{MachineSpeed, TapeFormulation, TapeParams};

    #[test]
    fn test_all_factory_presets_parse() {
        for (id, toml) in FACTORY_PRESETS_TOML {
            let preset = TapePreset::from_toml(toml)
                .unwrap_or_else(|e| panic!("factory preset '{id}' should parse: {e}"));
            assert!(!preset.name.is_empty(), "'{id}' needs a name");
            assert!(preset.description.is_some(), "'{id}' needs a description");
            assert!(
                validate_params(&preset.params).is_empty(),
                "'{id}' has out-of-range values"
            );
        }
    }

    #[test]
    fn test_names_table_matches_presets() {
        let ids: Vec<_> = FACTORY_PRESETS_TOML.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, FACTORY_PRESET_NAMES);
        assert_eq!(factory_presets().len(), FACTORY_PRESET_NAMES.len());
    }

    #[test]
    fn test_expected_display_names() {
        let names: Vec<_> = factory_presets().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            [
                "Default",
                "Studio 30",
                "Warm Ferric",
                "Chrome Sheen",
                "Worn Cassette",
                "Clean Modern"
            ]
        );
    }

    #[test]
    fn test_default_preset_matches_power_on_state() {
        let preset = find_factory_preset("default").unwrap();
        assert_eq!(preset.params, TapeParams::default());
    }

    #[test]
    fn test_find_by_id_and_display_name() {
        let by_id = find_factory_preset("worn_cassette").unwrap();
        let by_name = find_factory_preset("WORN CASSETTE").unwrap();
        assert_eq!(by_id, by_name);
        assert_eq!(by_id.params.speed, MachineSpeed::Ips7_5);
        assert_eq!(by_id.params.age, 70.0);

        let chrome = find_factory_preset("Chrome Sheen").unwrap();
        assert_eq!(chrome.params.formulation, TapeFormulation::Chrome);

        assert!(find_factory_preset("reel_to_reel").is_none());
        assert!(is_factory_preset("clean_modern"));
        assert!(!is_factory_preset("my_custom_preset"));
    }
}
