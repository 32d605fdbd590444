//! Tape machine controls.
//!
//! [`TapeParams`] is the plain parameter set: one field per control, in user
//! units (dB, %, Hz) plus the two variant selectors. [`ParamId`] indexes the
//! same controls for generic access, and [`SharedTapeParams`] mirrors them in
//! lock-free cells for a control thread.
//!
//! ## Controls
//!
//! | Id | Name | Range | Default |
//! |----|------|-------|---------|
//! | `input_drive` | Input Drive | -12–12 dB | 0 |
//! | `saturation` | Saturation | 0–100% | 50 |
//! | `warmth` | Warmth | 0–100% | 50 |
//! | `head_bump` | Head Bump | 0–100% | 50 |
//! | `bump_freq` | Bump Frequency | 40–150 Hz | 80 |
//! | `wow` | Wow | 0–100% | 0 |
//! | `flutter` | Flutter | 0–100% | 0 |
//! | `hiss` | Hiss | 0–100% | 0 |
//! | `output` | Output | -12–12 dB | 0 |
//! | `mix` | Mix | 0–100% | 100 |
//! | `age` | Age | 0–100% | 0 |
//! | `bias` | Bias | 0–100% | 50 |
//! | `speed` | Machine Speed | 7.5 / 15 / 30 ips | 15 ips |
//! | `formulation` | Tape Formulation | ferric / chrome / modern | ferric |

use core::fmt;
use core::str::FromStr;

use tapewarm_core::{AtomicParam, ParamDescriptor, ParamUnit};

/// Transport speed of the emulated machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MachineSpeed {
    /// 7.5 inches per second: darkest, lowest head bump.
    #[cfg_attr(feature = "serde", serde(rename = "7.5ips"))]
    Ips7_5,
    /// 15 inches per second: reference speed.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "15ips"))]
    Ips15,
    /// 30 inches per second: brightest, highest head bump.
    #[cfg_attr(feature = "serde", serde(rename = "30ips"))]
    Ips30,
}

impl MachineSpeed {
    /// All speeds, slowest first.
    pub const ALL: [Self; 3] = [Self::Ips7_5, Self::Ips15, Self::Ips30];

    /// Variant from index, clamped to the last variant.
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Ips7_5,
            1 => Self::Ips15,
            _ => Self::Ips30,
        }
    }

    /// Position in [`Self::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Tape speed in inches per second.
    pub const fn ips(self) -> f32 {
        match self {
            Self::Ips7_5 => 7.5,
            Self::Ips15 => 15.0,
            Self::Ips30 => 30.0,
        }
    }

    /// Scale applied to the head-bump base frequency.
    pub const fn head_bump_multiplier(self) -> f32 {
        match self {
            Self::Ips7_5 => 0.7,
            Self::Ips15 => 1.0,
            Self::Ips30 => 1.5,
        }
    }

    /// HF rolloff cutoff before formulation, warmth and age scaling.
    pub const fn base_cutoff_hz(self) -> f32 {
        match self {
            Self::Ips7_5 => 10_000.0,
            Self::Ips15 => 15_000.0,
            Self::Ips30 => 18_000.0,
        }
    }

    /// Stable name used in presets.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ips7_5 => "7.5ips",
            Self::Ips15 => "15ips",
            Self::Ips30 => "30ips",
        }
    }
}

impl fmt::Display for MachineSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ips", self.ips())
    }
}

impl FromStr for MachineSpeed {
    type Err = ParseChoiceError;

    /// Accepts `7.5`, `15`, `30` with an optional `ips` suffix, or
    /// `slow`/`medium`/`fast`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = strip_suffix_ignore_case(s, "ips").trim();
        if matches_any(s, &["7.5", "slow"]) {
            Ok(Self::Ips7_5)
        } else if matches_any(s, &["15", "medium"]) {
            Ok(Self::Ips15)
        } else if matches_any(s, &["30", "fast"]) {
            Ok(Self::Ips30)
        } else {
            Err(ParseChoiceError {
                expected: "machine speed (7.5ips, 15ips, 30ips)",
            })
        }
    }
}

/// Magnetic formulation of the emulated tape stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TapeFormulation {
    /// Type I ferric oxide: warm, hysteresis-driven saturation.
    #[default]
    Ferric,
    /// Type II chrome: brighter, plain tanh saturation.
    Chrome,
    /// Modern high-output stock: linear until a soft knee.
    Modern,
}

impl TapeFormulation {
    /// All formulations, warmest first.
    pub const ALL: [Self; 3] = [Self::Ferric, Self::Chrome, Self::Modern];

    /// Variant from index, clamped to the last variant.
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Ferric,
            1 => Self::Chrome,
            _ => Self::Modern,
        }
    }

    /// Position in [`Self::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Scale applied to the head-bump gain.
    pub const fn head_bump_gain_factor(self) -> f32 {
        match self {
            Self::Ferric => 1.2,
            Self::Chrome => 0.9,
            Self::Modern => 0.7,
        }
    }

    /// Scale applied to the speed's base HF cutoff.
    pub const fn cutoff_multiplier(self) -> f32 {
        match self {
            Self::Ferric => 0.85,
            Self::Chrome => 1.0,
            Self::Modern => 1.1,
        }
    }

    /// Scale applied to the saturation drive.
    pub const fn drive_factor(self) -> f32 {
        match self {
            Self::Ferric => 1.3,
            Self::Chrome => 0.9,
            Self::Modern => 0.7,
        }
    }

    /// Stable name used in presets.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ferric => "ferric",
            Self::Chrome => "chrome",
            Self::Modern => "modern",
        }
    }
}

impl fmt::Display for TapeFormulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TapeFormulation {
    type Err = ParseChoiceError;

    /// Accepts the preset names plus `I`/`II` and `A`/`B` aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if matches_any(s, &["ferric", "type1", "i", "a"]) {
            Ok(Self::Ferric)
        } else if matches_any(s, &["chrome", "type2", "ii", "b"]) {
            Ok(Self::Chrome)
        } else if matches_any(s, &["modern"]) {
            Ok(Self::Modern)
        } else {
            Err(ParseChoiceError {
                expected: "tape formulation (ferric, chrome, modern)",
            })
        }
    }
}

/// A string did not name a known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseChoiceError {
    expected: &'static str,
}

impl fmt::Display for ParseChoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a {}", self.expected)
    }
}

impl core::error::Error for ParseChoiceError {}

fn matches_any(s: &str, candidates: &[&str]) -> bool {
    candidates.iter().any(|c| s.eq_ignore_ascii_case(c))
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> &'a str {
    if s.len() >= suffix.len() && s.is_char_boundary(s.len() - suffix.len()) {
        let (head, tail) = s.split_at(s.len() - suffix.len());
        if tail.eq_ignore_ascii_case(suffix) {
            return head;
        }
    }
    s
}

/// Index of a control in [`PARAM_DESCRIPTORS`] and [`SharedTapeParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Input drive (dB).
    InputDrive,
    /// Saturation amount (%).
    Saturation,
    /// Warmth (%).
    Warmth,
    /// Head-bump amount (%).
    HeadBump,
    /// Head-bump base frequency (Hz).
    BumpFreq,
    /// Wow depth (%).
    Wow,
    /// Flutter depth (%).
    Flutter,
    /// Hiss level (%).
    Hiss,
    /// Output gain (dB).
    Output,
    /// Dry/wet mix (%).
    Mix,
    /// Age (%).
    Age,
    /// Bias (%).
    Bias,
    /// Machine speed (variant index).
    Speed,
    /// Tape formulation (variant index).
    Formulation,
}

/// Number of controls.
pub const PARAM_COUNT: usize = 14;

/// Descriptors in [`ParamId`] order.
pub static PARAM_DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::gain_db("Input Drive", "input_drive", -12.0, 12.0, 0.0),
    ParamDescriptor::percent("Saturation", "saturation", 50.0),
    ParamDescriptor::percent("Warmth", "warmth", 50.0),
    ParamDescriptor::percent("Head Bump", "head_bump", 50.0),
    ParamDescriptor::hertz("Bump Frequency", "bump_freq", 40.0, 150.0, 80.0),
    ParamDescriptor::percent("Wow", "wow", 0.0),
    ParamDescriptor::percent("Flutter", "flutter", 0.0),
    ParamDescriptor::percent("Hiss", "hiss", 0.0),
    ParamDescriptor::gain_db("Output", "output", -12.0, 12.0, 0.0),
    ParamDescriptor::percent("Mix", "mix", 100.0),
    ParamDescriptor::percent("Age", "age", 0.0),
    ParamDescriptor::percent("Bias", "bias", 50.0),
    ParamDescriptor::choice("Machine Speed", "speed", 3, 1),
    ParamDescriptor::choice("Tape Formulation", "formulation", 3, 0),
];

impl ParamId {
    /// Every control, in descriptor order.
    pub const ALL: [Self; PARAM_COUNT] = [
        Self::InputDrive,
        Self::Saturation,
        Self::Warmth,
        Self::HeadBump,
        Self::BumpFreq,
        Self::Wow,
        Self::Flutter,
        Self::Hiss,
        Self::Output,
        Self::Mix,
        Self::Age,
        Self::Bias,
        Self::Speed,
        Self::Formulation,
    ];

    /// Position in [`PARAM_DESCRIPTORS`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Range and display metadata.
    pub fn descriptor(self) -> &'static ParamDescriptor {
        &PARAM_DESCRIPTORS[self.index()]
    }

    /// Stable string id (`"bump_freq"`, `"speed"`, ...).
    pub fn name(self) -> &'static str {
        self.descriptor().id
    }

    /// Looks a control up by string id, ignoring ASCII case and treating
    /// `-` as `_`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|id| {
            let target = id.name();
            target.len() == name.len()
                && target
                    .bytes()
                    .zip(name.bytes())
                    .all(|(t, n)| t == if n == b'-' { b'_' } else { n.to_ascii_lowercase() })
        })
    }

    /// Whether changing this control recomputes filter coefficients.
    pub const fn affects_coefficients(self) -> bool {
        matches!(
            self,
            Self::Warmth
                | Self::HeadBump
                | Self::BumpFreq
                | Self::Age
                | Self::Speed
                | Self::Formulation
        )
    }

    /// Whether the value is a variant index rather than a continuous amount.
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Speed | Self::Formulation)
    }
}

/// The complete control set in user units.
///
/// Values are expected to lie inside their [`ParamDescriptor`] ranges; use
/// [`TapeParams::clamped`] or [`TapeParams::set`] to enforce that.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TapeParams {
    /// Input drive in dB.
    pub input_drive: f32,
    /// Saturation amount in percent.
    pub saturation: f32,
    /// Warmth in percent.
    pub warmth: f32,
    /// Head-bump amount in percent.
    pub head_bump: f32,
    /// Head-bump base frequency in Hz.
    pub bump_freq: f32,
    /// Wow depth in percent.
    pub wow: f32,
    /// Flutter depth in percent.
    pub flutter: f32,
    /// Hiss level in percent.
    pub hiss: f32,
    /// Output gain in dB.
    pub output: f32,
    /// Dry/wet mix in percent.
    pub mix: f32,
    /// Age in percent.
    pub age: f32,
    /// Bias in percent.
    pub bias: f32,
    /// Machine speed.
    pub speed: MachineSpeed,
    /// Tape formulation.
    pub formulation: TapeFormulation,
}

impl Default for TapeParams {
    fn default() -> Self {
        Self {
            input_drive: 0.0,
            saturation: 50.0,
            warmth: 50.0,
            head_bump: 50.0,
            bump_freq: 80.0,
            wow: 0.0,
            flutter: 0.0,
            hiss: 0.0,
            output: 0.0,
            mix: 100.0,
            age: 0.0,
            bias: 50.0,
            speed: MachineSpeed::default(),
            formulation: TapeFormulation::default(),
        }
    }
}

impl TapeParams {
    /// Value of a control; variants are reported as their index.
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::InputDrive => self.input_drive,
            ParamId::Saturation => self.saturation,
            ParamId::Warmth => self.warmth,
            ParamId::HeadBump => self.head_bump,
            ParamId::BumpFreq => self.bump_freq,
            ParamId::Wow => self.wow,
            ParamId::Flutter => self.flutter,
            ParamId::Hiss => self.hiss,
            ParamId::Output => self.output,
            ParamId::Mix => self.mix,
            ParamId::Age => self.age,
            ParamId::Bias => self.bias,
            ParamId::Speed => self.speed.index() as f32,
            ParamId::Formulation => self.formulation.index() as f32,
        }
    }

    /// Sets a control, clamping to its range. Variant controls round to the
    /// nearest index. Non-finite input stores the default.
    pub fn set(&mut self, id: ParamId, value: f32) {
        let value = id.descriptor().clamp(value);
        match id {
            ParamId::InputDrive => self.input_drive = value,
            ParamId::Saturation => self.saturation = value,
            ParamId::Warmth => self.warmth = value,
            ParamId::HeadBump => self.head_bump = value,
            ParamId::BumpFreq => self.bump_freq = value,
            ParamId::Wow => self.wow = value,
            ParamId::Flutter => self.flutter = value,
            ParamId::Hiss => self.hiss = value,
            ParamId::Output => self.output = value,
            ParamId::Mix => self.mix = value,
            ParamId::Age => self.age = value,
            ParamId::Bias => self.bias = value,
            ParamId::Speed => self.speed = MachineSpeed::from_index(libm::roundf(value) as usize),
            ParamId::Formulation => {
                self.formulation = TapeFormulation::from_index(libm::roundf(value) as usize);
            }
        }
    }

    /// Copy with every continuous control clamped to its range.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for id in ParamId::ALL {
            if !id.is_choice() {
                out.set(id, self.get(id));
            }
        }
        out
    }

    /// Controls whose value differs between `self` and `other`.
    pub fn changed<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = ParamId> + 'a {
        ParamId::ALL
            .into_iter()
            .filter(move |&id| self.get(id) != other.get(id))
    }
}

/// Lock-free mirror of [`TapeParams`] for a control thread.
///
/// The control side calls [`SharedTapeParams::set`] at any time; the audio
/// side reads a consistent-per-cell [`snapshot`](SharedTapeParams::snapshot)
/// once per block.
#[derive(Debug, Clone)]
pub struct SharedTapeParams {
    cells: [AtomicParam; PARAM_COUNT],
}

impl SharedTapeParams {
    /// Cells initialised to the defaults.
    pub fn new() -> Self {
        Self {
            cells: core::array::from_fn(|i| AtomicParam::from_descriptor(&PARAM_DESCRIPTORS[i])),
        }
    }

    /// Cells initialised from `params`.
    pub fn from_params(params: &TapeParams) -> Self {
        let shared = Self::new();
        shared.store(params);
        shared
    }

    /// Publishes one control (clamped by the cell).
    pub fn set(&self, id: ParamId, value: f32) {
        self.cells[id.index()].set(value);
    }

    /// Reads one control.
    pub fn get(&self, id: ParamId) -> f32 {
        self.cells[id.index()].get()
    }

    /// Publishes every control.
    pub fn store(&self, params: &TapeParams) {
        for id in ParamId::ALL {
            self.set(id, params.get(id));
        }
    }

    /// Reads every control once.
    pub fn snapshot(&self) -> TapeParams {
        let mut params = TapeParams::default();
        for id in ParamId::ALL {
            params.set(id, self.get(id));
        }
        params
    }
}

impl Default for SharedTapeParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Unit suffix helper for front ends listing [`PARAM_DESCRIPTORS`].
pub fn unit_label(unit: ParamUnit) -> &'static str {
    match unit {
        ParamUnit::Choice => "choice",
        other => other.suffix().trim_start(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_descriptors() {
        let params = TapeParams::default();
        for id in ParamId::ALL {
            assert_eq!(params.get(id), id.descriptor().default, "{}", id.name());
        }
    }

    #[test]
    fn descriptor_order_matches_ids() {
        for (i, id) in ParamId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(ParamId::from_name(id.name()), Some(id));
        }
    }

    #[test]
    fn set_clamps_and_rejects_non_finite() {
        let mut params = TapeParams::default();
        params.set(ParamId::BumpFreq, 500.0);
        assert_eq!(params.bump_freq, 150.0);
        params.set(ParamId::InputDrive, -40.0);
        assert_eq!(params.input_drive, -12.0);
        params.set(ParamId::Mix, f32::NAN);
        assert_eq!(params.mix, 100.0);
        params.set(ParamId::Speed, 7.0);
        assert_eq!(params.speed, MachineSpeed::Ips30);
        params.set(ParamId::Formulation, 0.6);
        assert_eq!(params.formulation, TapeFormulation::Chrome);
    }

    #[test]
    fn clamped_fixes_raw_fields() {
        let raw = TapeParams {
            saturation: 180.0,
            output: 30.0,
            hiss: -5.0,
            ..TapeParams::default()
        };
        let clamped = raw.clamped();
        assert_eq!(clamped.saturation, 100.0);
        assert_eq!(clamped.output, 12.0);
        assert_eq!(clamped.hiss, 0.0);
        assert_eq!(clamped.warmth, raw.warmth);
    }

    #[test]
    fn name_lookup_is_forgiving() {
        assert_eq!(ParamId::from_name("Bump-Freq"), Some(ParamId::BumpFreq));
        assert_eq!(ParamId::from_name(" wow "), Some(ParamId::Wow));
        assert_eq!(ParamId::from_name("tape"), None);
    }

    #[test]
    fn parse_variants() {
        assert_eq!("7.5ips".parse::<MachineSpeed>(), Ok(MachineSpeed::Ips7_5));
        assert_eq!("30 IPS".parse::<MachineSpeed>(), Ok(MachineSpeed::Ips30));
        assert_eq!("medium".parse::<MachineSpeed>(), Ok(MachineSpeed::Ips15));
        assert!("45".parse::<MachineSpeed>().is_err());

        assert_eq!("Chrome".parse::<TapeFormulation>(), Ok(TapeFormulation::Chrome));
        assert_eq!("I".parse::<TapeFormulation>(), Ok(TapeFormulation::Ferric));
        assert!("metal".parse::<TapeFormulation>().is_err());
    }

    #[test]
    fn shared_snapshot_roundtrip() {
        let params = TapeParams {
            wow: 35.0,
            speed: MachineSpeed::Ips7_5,
            formulation: TapeFormulation::Modern,
            ..TapeParams::default()
        };
        let shared = SharedTapeParams::from_params(&params);
        assert_eq!(shared.snapshot(), params);

        shared.set(ParamId::Hiss, 250.0);
        assert_eq!(shared.snapshot().hiss, 100.0);
    }

    #[test]
    fn changed_lists_differences() {
        let a = TapeParams::default();
        let b = TapeParams {
            warmth: 10.0,
            speed: MachineSpeed::Ips30,
            ..a
        };
        let diff: Vec<ParamId> = a.changed(&b).collect();
        assert_eq!(diff, vec![ParamId::Warmth, ParamId::Speed]);
    }
}
