//! Lock-free parameter cells and parameter metadata.
//!
//! [`AtomicParam`] lets a control thread publish an `f32` that the audio
//! thread picks up once per block without locking. The value is bit-cast into
//! an [`AtomicU32`]; stores use `Release` and loads use `Acquire`.
//!
//! [`ParamDescriptor`] carries the range, default and unit of a control so
//! front ends can list, validate and format parameters without knowing the
//! processor.
//!
//! ```rust
//! use tapewarm_core::AtomicParam;
//!
//! let drive = AtomicParam::new(0.0, -12.0, 12.0);
//! drive.set(30.0);
//! assert_eq!(drive.get(), 12.0);
//! drive.set(f32::NAN);
//! assert_eq!(drive.get(), 0.0);
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

/// Atomic `f32` with a fixed range and default.
#[derive(Debug)]
pub struct AtomicParam {
    value: AtomicU32,
    min: f32,
    max: f32,
    default: f32,
}

impl AtomicParam {
    /// Create a new atomic parameter with range and default.
    pub const fn new(default: f32, min: f32, max: f32) -> Self {
        Self {
            value: AtomicU32::new(default.to_bits()),
            min,
            max,
            default,
        }
    }

    /// Create a cell from a descriptor's default and range.
    pub const fn from_descriptor(desc: &ParamDescriptor) -> Self {
        Self::new(desc.default, desc.min, desc.max)
    }

    /// Set the value (control thread). Clamped to range; non-finite input
    /// stores the default.
    #[inline]
    pub fn set(&self, v: f32) {
        let stored = if v.is_finite() {
            v.clamp(self.min, self.max)
        } else {
            self.default
        };
        self.value.store(stored.to_bits(), Ordering::Release);
    }

    /// Get the value (audio thread).
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Acquire))
    }

    /// Minimum value.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Maximum value.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Default value.
    pub fn default(&self) -> f32 {
        self.default
    }

    /// Reset to default value.
    pub fn reset(&self) {
        self.set(self.default);
    }
}

impl Clone for AtomicParam {
    fn clone(&self) -> Self {
        Self {
            value: AtomicU32::new(self.value.load(Ordering::Acquire)),
            min: self.min,
            max: self.max,
            default: self.default,
        }
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB) - gain and level controls.
    Decibels,
    /// Hertz (Hz) - frequencies.
    Hertz,
    /// Milliseconds (ms) - times.
    Milliseconds,
    /// Percentage (%) - amounts and mix.
    Percent,
    /// Inches per second - tape speed.
    InchesPerSecond,
    /// Enumerated choice; the value is a variant index.
    Choice,
    /// No unit.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use tapewarm_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::Percent.suffix(), "%");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::InchesPerSecond => " ips",
            ParamUnit::Choice | ParamUnit::None => "",
        }
    }
}

/// Static description of one control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full name for display (e.g. "Head Bump Frequency").
    pub name: &'static str,
    /// Stable identifier used in presets and `key=value` overrides.
    pub id: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Value on construction and reset.
    pub default: f32,
    /// Suggested step for coarse control.
    pub step: f32,
}

impl ParamDescriptor {
    /// Percentage control over `[0, 100]`.
    pub const fn percent(name: &'static str, id: &'static str, default: f32) -> Self {
        Self {
            name,
            id,
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 100.0,
            default,
            step: 1.0,
        }
    }

    /// Gain control in decibels.
    pub const fn gain_db(
        name: &'static str,
        id: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            id,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.5,
        }
    }

    /// Frequency control in Hz.
    pub const fn hertz(
        name: &'static str,
        id: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            id,
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            step: 1.0,
        }
    }

    /// Enumerated control with `count` variants, stored as an index.
    pub const fn choice(name: &'static str, id: &'static str, count: u8, default: u8) -> Self {
        Self {
            name,
            id,
            unit: ParamUnit::Choice,
            min: 0.0,
            max: (count - 1) as f32,
            default: default as f32,
            step: 1.0,
        }
    }

    /// Clamps `value` to range; non-finite input gives the default.
    ///
    /// ```rust
    /// use tapewarm_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("Drive", "drive", -12.0, 12.0, 0.0);
    /// assert_eq!(desc.clamp(-100.0), -12.0);
    /// assert_eq!(desc.clamp(f32::INFINITY), 0.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.default
        }
    }

    /// Whether `value` lies inside the range.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Maps a plain value to `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (self.clamp(value) - self.min) / range
    }
}
