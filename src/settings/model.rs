//! Typed settings record and its partial (on-disk / patch) form

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    constants::{MAX_FONT_SIZE, MAX_OPACITY, MIN_FONT_SIZE, MIN_OPACITY},
    error::SettingsError,
};

/// Overlay appearance and geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub font_family: String,
    pub font_size: u32,
    pub text_color: String,
    pub bg_color: String,
    pub opacity: f64,
    pub auto_size: bool,
    pub overlay_position: (i32, i32),
    pub overlay_size: (u32, u32),
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 12,
            text_color: "#FFFFFF".to_string(),
            bg_color: "#000000".to_string(),
            opacity: 0.9,
            auto_size: true,
            overlay_position: (0, 0),
            overlay_size: (400, 200),
        }
    }
}

impl DisplaySettings {
    /// Clamp numeric fields into their documented ranges
    pub fn normalized(mut self) -> Self {
        self.font_size = clamp_font_size(self.font_size);
        self.opacity = clamp_opacity(self.opacity);
        self
    }
}

pub fn clamp_font_size(size: u32) -> u32 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

pub fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        return MAX_OPACITY;
    }
    opacity.clamp(MIN_OPACITY, MAX_OPACITY)
}

/// Accepts `#RRGGBB` hex colors
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// The four countdown input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerField {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimerField {
    pub fn max(self) -> u32 {
        match self {
            TimerField::Days => 365,
            TimerField::Hours => 23,
            TimerField::Minutes => 59,
            TimerField::Seconds => 59,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TimerField::Days => "days",
            TimerField::Hours => "hours",
            TimerField::Minutes => "minutes",
            TimerField::Seconds => "seconds",
        }
    }
}

/// Last countdown entered by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastTimerInput {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl LastTimerInput {
    pub fn new(days: u32, hours: u32, minutes: u32, seconds: u32) -> Self {
        Self { days, hours, minutes, seconds }.clamped()
    }

    /// Clamp each field to its own maximum
    pub fn clamped(self) -> Self {
        Self {
            days: self.days.min(TimerField::Days.max()),
            hours: self.hours.min(TimerField::Hours.max()),
            minutes: self.minutes.min(TimerField::Minutes.max()),
            seconds: self.seconds.min(TimerField::Seconds.max()),
        }
    }

    pub fn get(&self, field: TimerField) -> u32 {
        match field {
            TimerField::Days => self.days,
            TimerField::Hours => self.hours,
            TimerField::Minutes => self.minutes,
            TimerField::Seconds => self.seconds,
        }
    }

    /// Apply the raw text of one input field.
    ///
    /// Empty input reads as 0, anything but digits is rejected and leaves the
    /// field unchanged, and values over the field maximum clamp to it.
    pub fn apply_keystroke(&mut self, field: TimerField, raw: &str) -> Result<u32, SettingsError> {
        let raw = raw.trim();
        let value = if raw.is_empty() {
            0
        } else if raw.chars().all(|c| c.is_ascii_digit()) {
            // Overlong digit strings are necessarily above the maximum
            raw.parse::<u64>()
                .map(|v| v.min(field.max() as u64) as u32)
                .unwrap_or(field.max())
        } else {
            return Err(SettingsError::InvalidTimerInput {
                field: field.name(),
                value: raw.to_string(),
            });
        };

        match field {
            TimerField::Days => self.days = value,
            TimerField::Hours => self.hours = value,
            TimerField::Minutes => self.minutes = value,
            TimerField::Seconds => self.seconds = value,
        }
        Ok(value)
    }

    pub fn total_seconds(&self) -> u64 {
        self.days as u64 * 86_400
            + self.hours as u64 * 3_600
            + self.minutes as u64 * 60
            + self.seconds as u64
    }
}

/// Complete settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub display: DisplaySettings,
    pub last_timer: LastTimerInput,
}

/// Display settings with every key optional.
///
/// Used both for partially populated config files and for live edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayPatch {
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub text_color: Option<String>,
    pub bg_color: Option<String>,
    pub opacity: Option<f64>,
    pub auto_size: Option<bool>,
    pub overlay_position: Option<(i32, i32)>,
    pub overlay_size: Option<(u32, u32)>,
}

impl DisplayPatch {
    /// Apply a live edit. Colors are validated before anything is changed.
    pub fn apply_to(&self, target: &mut DisplaySettings) -> Result<(), SettingsError> {
        for color in [&self.text_color, &self.bg_color].into_iter().flatten() {
            if !is_hex_color(color) {
                return Err(SettingsError::InvalidColor(color.clone()));
            }
        }
        self.merge_into(target);
        Ok(())
    }

    /// Lay present keys over `target`, skipping unusable colors
    fn merge_into(&self, target: &mut DisplaySettings) {
        if let Some(family) = &self.font_family {
            target.font_family = family.clone();
        }
        if let Some(size) = self.font_size {
            target.font_size = clamp_font_size(size);
        }
        if let Some(color) = &self.text_color {
            if is_hex_color(color) {
                target.text_color = color.clone();
            } else {
                warn!("Ignoring invalid text_color '{}'", color);
            }
        }
        if let Some(color) = &self.bg_color {
            if is_hex_color(color) {
                target.bg_color = color.clone();
            } else {
                warn!("Ignoring invalid bg_color '{}'", color);
            }
        }
        if let Some(opacity) = self.opacity {
            target.opacity = clamp_opacity(opacity);
        }
        if let Some(auto_size) = self.auto_size {
            target.auto_size = auto_size;
        }
        if let Some(position) = self.overlay_position {
            target.overlay_position = position;
        }
        if let Some(size) = self.overlay_size {
            target.overlay_size = size;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerInputPatch {
    pub days: Option<u32>,
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
    pub seconds: Option<u32>,
}

/// Settings document as read from disk, any key may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSettings {
    #[serde(flatten)]
    pub display: DisplayPatch,
    pub last_timer: Option<TimerInputPatch>,
}

impl PartialSettings {
    /// Fill every missing key from the defaults
    pub fn merge_over_defaults(self) -> Settings {
        let mut settings = Settings::default();
        self.display.merge_into(&mut settings.display);

        if let Some(timer) = self.last_timer {
            let defaults = LastTimerInput::default();
            settings.last_timer = LastTimerInput::new(
                timer.days.unwrap_or(defaults.days),
                timer.hours.unwrap_or(defaults.hours),
                timer.minutes.unwrap_or(defaults.minutes),
                timer.seconds.unwrap_or(defaults.seconds),
            );
        }
        settings
    }
}
