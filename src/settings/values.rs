//! Option value mapping
//!
//! Each option has a symbolic index (its position in a picker) and a stored
//! representation in the override file. Reads are lenient and accept the
//! legacy spellings older files used.

use std::fmt;

/// Graphics backend choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Renderer {
    #[default]
    Auto,
    Vulkan,
    OpenGl,
    Software,
}

impl Renderer {
    pub const ALL: [Renderer; 4] = [
        Renderer::Auto,
        Renderer::Vulkan,
        Renderer::OpenGl,
        Renderer::Software,
    ];

    pub fn index(self) -> usize {
        match self {
            Renderer::Auto => 0,
            Renderer::Vulkan => 1,
            Renderer::OpenGl => 2,
            Renderer::Software => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Name written to the override file
    pub fn name(self) -> &'static str {
        match self {
            Renderer::Auto => "Auto",
            Renderer::Vulkan => "Vulkan",
            Renderer::OpenGl => "OpenGL",
            Renderer::Software => "Software",
        }
    }

    /// Numeric code understood by the emulation core
    pub fn legacy_code(self) -> i32 {
        match self {
            Renderer::Auto => -1,
            Renderer::Vulkan => 14,
            Renderer::OpenGl => 12,
            Renderer::Software => 13,
        }
    }

    /// Unknown codes select `Auto`
    pub fn from_legacy_code(code: i64) -> Self {
        match code {
            14 => Renderer::Vulkan,
            12 => Renderer::OpenGl,
            13 => Renderer::Software,
            _ => Renderer::Auto,
        }
    }

    /// Accepts names case-insensitively or the exact text of a legacy code
    /// (`"14"`, not `"014"`); anything else selects `Auto`.
    pub fn from_ini_value(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.legacy_code().to_string() == value || r.name().eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Internal resolution multiplier, 1x to 8x
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UpscaleMultiplier(u8);

impl UpscaleMultiplier {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    pub fn new(multiplier: u8) -> Self {
        Self(multiplier.clamp(Self::MIN, Self::MAX))
    }

    /// Picker index `i` selects multiplier `i + 1`
    pub fn from_index(index: usize) -> Self {
        Self::new(index.min((Self::MAX - 1) as usize) as u8 + 1)
    }

    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Clamp into [1, 8] and round to the nearest whole multiplier
    pub fn from_float(multiplier: f64) -> Self {
        if !multiplier.is_finite() {
            return Self(Self::MIN);
        }
        let clamped = multiplier.clamp(Self::MIN as f64, Self::MAX as f64);
        Self(clamped.round() as u8)
    }

    /// Plain decimal (`4`, `2.0`); anything else is rejected.
    pub fn from_ini_value(value: &str) -> Option<Self> {
        let value = value.trim();
        if !is_plain_decimal(value) {
            return None;
        }
        value.parse::<f64>().ok().map(Self::from_float)
    }
}

impl Default for UpscaleMultiplier {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

fn is_plain_decimal(value: &str) -> bool {
    let (whole, fraction) = match value.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (value, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && fraction.is_none_or(digits)
}

/// Display aspect ratio mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    Stretch,
    #[default]
    Auto,
    Standard,
    Widescreen,
    Ratio10x7,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Stretch,
        AspectRatio::Auto,
        AspectRatio::Standard,
        AspectRatio::Widescreen,
        AspectRatio::Ratio10x7,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Legacy spelling accepted on read
    pub fn legacy_name(self) -> &'static str {
        match self {
            AspectRatio::Stretch => "Stretch",
            AspectRatio::Auto => "Auto",
            AspectRatio::Standard => "4:3",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Ratio10x7 => "10:7",
        }
    }

    /// Bare index 0..4 or a legacy name; anything else is `Auto`.
    pub fn from_ini_value(value: &str) -> Self {
        let value = value.trim();
        if let Ok(index) = value.parse::<i64>() {
            return usize::try_from(index)
                .ok()
                .and_then(Self::from_index)
                .unwrap_or_default();
        }
        Self::ALL
            .into_iter()
            .find(|a| a.legacy_name().eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }
}

/// Blending unit accuracy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendingAccuracy {
    Minimum,
    #[default]
    Basic,
    Medium,
    High,
    Full,
    Maximum,
}

impl BlendingAccuracy {
    pub const ALL: [BlendingAccuracy; 6] = [
        BlendingAccuracy::Minimum,
        BlendingAccuracy::Basic,
        BlendingAccuracy::Medium,
        BlendingAccuracy::High,
        BlendingAccuracy::Full,
        BlendingAccuracy::Maximum,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            BlendingAccuracy::Minimum => "Minimum",
            BlendingAccuracy::Basic => "Basic",
            BlendingAccuracy::Medium => "Medium",
            BlendingAccuracy::High => "High",
            BlendingAccuracy::Full => "Full",
            BlendingAccuracy::Maximum => "Maximum",
        }
    }

    /// Bare index 0..5 or a level name; anything else is `Basic`.
    pub fn from_ini_value(value: &str) -> Self {
        let value = value.trim();
        if let Ok(index) = value.parse::<i64>() {
            return usize::try_from(index)
                .ok()
                .and_then(Self::from_index)
                .unwrap_or_default();
        }
        Self::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }
}

/// Strict boolean: only the literals `true` and `false`
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
