//! Presets and parameter handling for the tapewarm tape machine.
//!
//! # Features
//!
//! - **Presets**: [`TapePreset`] loads and saves TOML files
//! - **Factory presets**: six bundled starting points
//! - **Validation**: range reports and `key=value` parsing for controls
//! - **Paths**: the user presets directory (`std` feature)
//!
//! # Example
//!
//! ```rust,no_run
//! use tapewarm_config::{TapePreset, find_factory_preset, set_param_by_name};
//!
//! let mut preset = find_factory_preset("Warm Ferric").expect("bundled preset");
//! set_param_by_name(&mut preset.params, "wow", "20").unwrap();
//! preset.name = "Warmer Ferric".to_string();
//! preset.save("warmer_ferric.toml").unwrap();
//!
//! let loaded = TapePreset::load("warmer_ferric.toml").unwrap();
//! assert_eq!(loaded.params.wow, 20.0);
//! ```

mod error;
mod preset;

/// Factory presets bundled with the library.
pub mod factory_presets;

/// Platform-specific preset locations.
#[cfg(feature = "std")]
pub mod paths;

/// Control validation and string parsing.
pub mod validation;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_presets, find_factory_preset, is_factory_preset,
};
#[cfg(feature = "std")]
pub use paths::{
    PRESET_DIR_ENV, ensure_user_presets_dir, find_preset, list_user_presets, resolve_preset,
    user_presets_dir,
};
pub use preset::TapePreset;
pub use validation::{
    RangeIssue, parse_param_value, set_param_by_name, split_override, validate_params,
};
