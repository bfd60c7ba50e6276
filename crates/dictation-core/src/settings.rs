//! Playback settings types and validation.
//!
//! These are pure domain types with no infrastructure dependencies. The
//! playback controller reads them through [`crate::store::SettingsStore`] at
//! the start of every repetition.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of times each word is spoken.
pub const DEFAULT_REPETITIONS: u32 = 3;

/// Default pause between repetitions and between words, in seconds.
pub const DEFAULT_INTERVAL_SECS: f32 = 2.0;

/// Default playback-rate multiplier.
pub const DEFAULT_SPEED: f32 = 1.0;

/// Upper bound accepted for [`PlaybackSettings::repetitions`].
pub const MAX_REPETITIONS: u32 = 20;

/// Upper bound accepted for [`PlaybackSettings::interval`], in seconds.
pub const MAX_INTERVAL_SECS: f32 = 60.0;

/// Accepted range for [`PlaybackSettings::speed`].
pub const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.1..=10.0;

/// Language used for synthesised speech.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pronunciation {
    #[default]
    English,
    Cantonese,
    Mandarin,
}

impl Pronunciation {
    /// All supported pronunciations, in display order.
    pub const ALL: [Self; 3] = [Self::English, Self::Cantonese, Self::Mandarin];

    /// BCP-47 language tag handed to the speech engine.
    pub const fn language_tag(self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Cantonese => "zh-HK",
            Self::Mandarin => "zh-CN",
        }
    }

    /// Default pronunciation for a UI locale such as `zh-CN` or `en`.
    pub fn from_locale(locale: &str) -> Self {
        match locale.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "zh-cn" | "zh-sg" | "zh-hans" => Self::Mandarin,
            "zh-tw" | "zh-hk" | "zh-mo" | "zh-hant" | "yue" => Self::Cantonese,
            _ => Self::English,
        }
    }
}

impl fmt::Display for Pronunciation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::English => "English",
            Self::Cantonese => "Cantonese",
            Self::Mandarin => "Mandarin",
        };
        f.write_str(name)
    }
}

impl FromStr for Pronunciation {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "cantonese" | "yue" => Ok(Self::Cantonese),
            "mandarin" | "cmn" | "zh" => Ok(Self::Mandarin),
            _ => Err(SettingsError::UnknownPronunciation(s.to_string())),
        }
    }
}

/// Settings that shape a dictation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How many times each word is played before moving on (>= 1).
    pub repetitions: u32,

    /// Pause between repetitions and between words, in seconds (>= 0).
    pub interval: f32,

    /// Playback-rate multiplier for synthesised speech (> 0).
    pub speed: f32,

    /// Language for synthesised speech.
    pub pronunciation: Pronunciation,
}

impl PlaybackSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            repetitions: DEFAULT_REPETITIONS,
            interval: DEFAULT_INTERVAL_SECS,
            speed: DEFAULT_SPEED,
            pronunciation: Pronunciation::English,
        }
    }

    /// The interval as a [`Duration`]. Negative or non-finite values yield
    /// zero and anything above [`MAX_INTERVAL_SECS`] is capped.
    pub fn interval_duration(&self) -> Duration {
        if self.interval.is_finite() && self.interval > 0.0 {
            Duration::from_secs_f32(self.interval.min(MAX_INTERVAL_SECS))
        } else {
            Duration::ZERO
        }
    }

    /// Pull every field into its accepted range.
    ///
    /// Out-of-range numbers are clamped to the nearest bound and non-finite
    /// ones are replaced by their default, so the result always passes
    /// [`validate_settings`].
    #[must_use]
    pub fn clamped(self) -> Self {
        let interval = if self.interval.is_finite() {
            self.interval.clamp(0.0, MAX_INTERVAL_SECS)
        } else {
            DEFAULT_INTERVAL_SECS
        };
        let speed = if self.speed.is_finite() {
            self.speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end())
        } else {
            DEFAULT_SPEED
        };
        Self {
            repetitions: self.repetitions.clamp(1, MAX_REPETITIONS),
            interval,
            speed,
            pronunciation: self.pronunciation,
        }
    }

    /// Repetition count with the `>= 1` floor applied.
    pub fn effective_repetitions(&self) -> u32 {
        self.repetitions.max(1)
    }

    /// Merge an update into these settings, only touching fields that are `Some`.
    pub fn merge(&mut self, update: &SettingsUpdate) {
        if let Some(repetitions) = update.repetitions {
            self.repetitions = repetitions;
        }
        if let Some(interval) = update.interval {
            self.interval = interval;
        }
        if let Some(speed) = update.speed {
            self.speed = speed;
        }
        if let Some(pronunciation) = update.pronunciation {
            self.pronunciation = pronunciation;
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Partial settings update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub repetitions: Option<u32>,
    pub interval: Option<f32>,
    pub speed: Option<f32>,
    pub pronunciation: Option<Pronunciation>,
}

impl SettingsUpdate {
    /// Whether the update changes nothing.
    pub const fn is_empty(&self) -> bool {
        self.repetitions.is_none()
            && self.interval.is_none()
            && self.speed.is_none()
            && self.pronunciation.is_none()
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Repetitions must be between 1 and 20, got {0}")]
    InvalidRepetitions(u32),

    #[error("Interval must be between 0 and 60 seconds, got {0}")]
    InvalidInterval(f32),

    #[error("Speed must be between 0.1 and 10.0, got {0}")]
    InvalidSpeed(f32),

    #[error("Unknown pronunciation '{0}' (expected English, Cantonese or Mandarin)")]
    UnknownPronunciation(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &PlaybackSettings) -> Result<(), SettingsError> {
    if !(1..=MAX_REPETITIONS).contains(&settings.repetitions) {
        return Err(SettingsError::InvalidRepetitions(settings.repetitions));
    }

    if !settings.interval.is_finite() || !(0.0..=MAX_INTERVAL_SECS).contains(&settings.interval) {
        return Err(SettingsError::InvalidInterval(settings.interval));
    }

    if !settings.speed.is_finite() || !SPEED_RANGE.contains(&settings.speed) {
        return Err(SettingsError::InvalidSpeed(settings.speed));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PlaybackSettings::with_defaults();
        assert_eq!(settings.repetitions, 3);
        assert_eq!(settings.interval_duration(), Duration::from_secs(2));
        assert!((settings.speed - 1.0).abs() < f32::EPSILON);
        assert_eq!(settings.pronunciation, Pronunciation::English);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_validate_repetitions() {
        let settings = PlaybackSettings {
            repetitions: 0,
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidRepetitions(0))
        ));
    }

    #[test]
    fn test_validate_interval_and_speed() {
        let negative = PlaybackSettings {
            interval: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&negative),
            Err(SettingsError::InvalidInterval(_))
        ));

        let zero_speed = PlaybackSettings {
            speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&zero_speed),
            Err(SettingsError::InvalidSpeed(_))
        ));

        let nan_speed = PlaybackSettings {
            speed: f32::NAN,
            ..Default::default()
        };
        assert!(validate_settings(&nan_speed).is_err());
    }

    #[test]
    fn test_interval_duration_clamps_negative() {
        let settings = PlaybackSettings {
            interval: -3.0,
            ..Default::default()
        };
        assert_eq!(settings.interval_duration(), Duration::ZERO);
    }

    #[test]
    fn test_interval_duration_caps_huge_values() {
        let settings: PlaybackSettings = serde_json::from_str(
            r#"{"repetitions":2,"interval":1e20,"speed":1.0,"pronunciation":"English"}"#,
        )
        .unwrap();
        assert_eq!(
            settings.interval_duration(),
            Duration::from_secs_f32(MAX_INTERVAL_SECS)
        );

        let infinite = PlaybackSettings {
            interval: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(infinite.interval_duration(), Duration::ZERO);
    }

    #[test]
    fn test_clamped_brings_settings_into_range() {
        let wild = PlaybackSettings {
            repetitions: 500,
            interval: 1e20,
            speed: f32::NAN,
            pronunciation: Pronunciation::Mandarin,
        };
        let clamped = wild.clamped();

        assert!(validate_settings(&clamped).is_ok());
        assert_eq!(clamped.repetitions, MAX_REPETITIONS);
        assert!((clamped.interval - MAX_INTERVAL_SECS).abs() < f32::EPSILON);
        assert!((clamped.speed - DEFAULT_SPEED).abs() < f32::EPSILON);
        assert_eq!(clamped.pronunciation, Pronunciation::Mandarin);

        let low = PlaybackSettings {
            repetitions: 0,
            interval: -4.0,
            speed: 0.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(low.repetitions, 1);
        assert!(low.interval.abs() < f32::EPSILON);
        assert!((low.speed - 0.1).abs() < f32::EPSILON);

        let valid = PlaybackSettings::with_defaults();
        assert_eq!(valid.clamped(), valid);
    }

    #[test]
    fn test_merge_settings() {
        let mut settings = PlaybackSettings::with_defaults();
        let update = SettingsUpdate {
            repetitions: Some(1),
            pronunciation: Some(Pronunciation::Cantonese),
            ..Default::default()
        };
        settings.merge(&update);

        assert_eq!(settings.repetitions, 1);
        assert_eq!(settings.pronunciation, Pronunciation::Cantonese);
        assert_eq!(settings.interval_duration(), Duration::from_secs(2)); // Unchanged
    }

    #[test]
    fn test_language_tags() {
        assert_eq!(Pronunciation::English.language_tag(), "en-US");
        assert_eq!(Pronunciation::Cantonese.language_tag(), "zh-HK");
        assert_eq!(Pronunciation::Mandarin.language_tag(), "zh-CN");
    }

    #[test]
    fn test_pronunciation_from_locale() {
        assert_eq!(Pronunciation::from_locale("zh-CN"), Pronunciation::Mandarin);
        assert_eq!(Pronunciation::from_locale("zh_TW"), Pronunciation::Cantonese);
        assert_eq!(Pronunciation::from_locale("en"), Pronunciation::English);
        assert_eq!(Pronunciation::from_locale("fr-FR"), Pronunciation::English);
    }

    #[test]
    fn test_pronunciation_parse() {
        assert_eq!("mandarin".parse::<Pronunciation>().unwrap(), Pronunciation::Mandarin);
        assert_eq!("English".parse::<Pronunciation>().unwrap(), Pronunciation::English);
        assert!("klingon".parse::<Pronunciation>().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: PlaybackSettings = serde_json::from_str(r#"{"repetitions":5}"#).unwrap();
        assert_eq!(settings.repetitions, 5);
        assert_eq!(settings.pronunciation, Pronunciation::English);
    }
}
