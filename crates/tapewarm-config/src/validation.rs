//! Range checks and string parsing for tape controls.
//!
//! Out-of-range values are never rejected: the machine clamps them. The
//! functions here report what will be clamped so a front end can warn.
//!
//! # Example
//!
//! ```rust
//! use tapewarm_config::{set_param_by_name, validate_params};
//! use tapewarm_tape::{MachineSpeed, TapeParams};
//!
//! let mut params = TapeParams::default();
//! set_param_by_name(&mut params, "speed", "30ips").unwrap();
//! assert_eq!(params.speed, MachineSpeed::Ips30);
//!
//! params.wow = 140.0;
//! let issues = validate_params(&params);
//! assert_eq!(issues[0].clamped_to, 100.0);
//! ```

use std::fmt;

use tapewarm_tape::{MachineSpeed, ParamId, ParamUnit, TapeFormulation, TapeParams};

use crate::ConfigError;

/// A control whose value lies outside its range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeIssue {
    /// The control.
    pub id: ParamId,
    /// Value as supplied.
    pub value: f32,
    /// Value the machine will use.
    pub clamped_to: f32,
}

impl fmt::Display for RangeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = self.id.descriptor();
        write!(
            f,
            "'{}' value {} outside [{}, {}], using {}",
            desc.id, self.value, desc.min, desc.max, self.clamped_to
        )
    }
}

/// Reports every continuous control outside its range, in [`ParamId`] order.
///
/// Non-finite values are reported with the default they fall back to.
pub fn validate_params(params: &TapeParams) -> Vec<RangeIssue> {
    ParamId::ALL
        .into_iter()
        .filter(|id| !id.is_choice())
        .filter_map(|id| {
            let desc = id.descriptor();
            let value = params.get(id);
            (!desc.contains(value)).then(|| RangeIssue {
                id,
                value,
                clamped_to: desc.clamp(value),
            })
        })
        .collect()
}

/// Parses `text` as a value for `id`.
///
/// Continuous controls take a plain number with an optional unit suffix
/// matching the control (`"-3dB"`, `"90 Hz"`, `"40%"`). Variant controls take
/// anything their `FromStr` accepts (`"7.5ips"`, `"chrome"`) and return the
/// variant index.
pub fn parse_param_value(id: ParamId, text: &str) -> Result<f32, ConfigError> {
    let text = text.trim();
    let invalid = |reason: String| ConfigError::invalid_value(id.name(), text, reason);

    match id {
        ParamId::Speed => text
            .parse::<MachineSpeed>()
            .map(|speed| speed.index() as f32)
            .map_err(|e| invalid(e.to_string())),
        ParamId::Formulation => text
            .parse::<TapeFormulation>()
            .map(|formulation| formulation.index() as f32)
            .map_err(|e| invalid(e.to_string())),
        _ => {
            let number = strip_unit(text, id.descriptor().unit);
            let value: f32 = number
                .parse()
                .map_err(|_| invalid(format!("cannot parse '{number}' as a number")))?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(invalid("expected a finite number".to_string()))
            }
        }
    }
}

fn strip_unit(text: &str, unit: ParamUnit) -> &str {
    let suffix = unit.suffix().trim_start();
    if suffix.is_empty() || text.len() < suffix.len() {
        return text;
    }
    let split = text.len() - suffix.len();
    if !text.is_char_boundary(split) {
        return text;
    }
    let (number, tail) = text.split_at(split);
    if tail.eq_ignore_ascii_case(suffix) {
        number.trim_end()
    } else {
        text
    }
}

/// Sets the control named `name` from the string `value`.
///
/// The stored value is clamped to range; when clamping changed it, the
/// returned issue says so.
///
/// # Errors
///
/// [`ConfigError::UnknownParameter`] when no control has that id, or
/// [`ConfigError::InvalidValue`] when `value` cannot be read.
pub fn set_param_by_name(
    params: &mut TapeParams,
    name: &str,
    value: &str,
) -> Result<Option<RangeIssue>, ConfigError> {
    let id = ParamId::from_name(name)
        .ok_or_else(|| ConfigError::UnknownParameter(name.trim().to_string()))?;
    let value = parse_param_value(id, value)?;
    params.set(id, value);

    let stored = params.get(id);
    Ok((stored != value).then_some(RangeIssue {
        id,
        value,
        clamped_to: stored,
    }))
}

/// Splits a `key=value` override.
pub fn split_override(text: &str) -> Result<(&str, &str), ConfigError> {
    text.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| {
            ConfigError::invalid_value("override", text, "expected key=value".to_string())
        })
}
