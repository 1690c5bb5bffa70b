use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-question ceiling applied to recorded answer times.
pub const DEFAULT_ANSWER_TIME_CAP_MS: u64 = 9_900;

/// Pause after a correct answer before the next question is shown.
pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 100;

pub const MAX_FEEDBACK_DELAY_MS: u64 = 5_000;

/// Policy for clamping outlier answer times before they are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeCap {
    Uncapped,
    Capped(u64),
}

impl TimeCap {
    #[must_use]
    pub fn apply(self, elapsed_ms: u64) -> u64 {
        match self {
            TimeCap::Uncapped => elapsed_ms,
            TimeCap::Capped(cap) => elapsed_ms.min(cap),
        }
    }
}

impl Default for TimeCap {
    fn default() -> Self {
        TimeCap::Capped(DEFAULT_ANSWER_TIME_CAP_MS)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("answer time cap must be positive")]
    ZeroTimeCap,
    #[error("feedback delay {provided}ms exceeds {MAX_FEEDBACK_DELAY_MS}ms")]
    FeedbackDelayTooLong { provided: u64 },
}

/// Validated user settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SettingsDraft", into = "SettingsDraft")]
pub struct Settings {
    show_progress_bar: bool,
    answer_time_cap_ms: Option<u64>,
    feedback_delay_ms: u64,
}

/// Unvalidated settings as edited by the user or read from a payload.
///
/// Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsDraft {
    pub show_progress_bar: bool,
    pub answer_time_cap_ms: Option<u64>,
    pub feedback_delay_ms: u64,
}

impl Default for SettingsDraft {
    fn default() -> Self {
        Self {
            show_progress_bar: false,
            answer_time_cap_ms: Some(DEFAULT_ANSWER_TIME_CAP_MS),
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY_MS,
        }
    }
}

impl SettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft into settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` for a zero time cap or an overlong feedback delay.
    pub fn validate(self) -> Result<Settings, SettingsError> {
        if self.answer_time_cap_ms == Some(0) {
            return Err(SettingsError::ZeroTimeCap);
        }
        if self.feedback_delay_ms > MAX_FEEDBACK_DELAY_MS {
            return Err(SettingsError::FeedbackDelayTooLong {
                provided: self.feedback_delay_ms,
            });
        }

        Ok(Settings {
            show_progress_bar: self.show_progress_bar,
            answer_time_cap_ms: self.answer_time_cap_ms,
            feedback_delay_ms: self.feedback_delay_ms,
        })
    }
}

impl TryFrom<SettingsDraft> for Settings {
    type Error = SettingsError;

    fn try_from(draft: SettingsDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<Settings> for SettingsDraft {
    fn from(settings: Settings) -> Self {
        settings.to_draft()
    }
}

impl Settings {
    #[must_use]
    pub fn show_progress_bar(&self) -> bool {
        self.show_progress_bar
    }

    #[must_use]
    pub fn answer_time_cap_ms(&self) -> Option<u64> {
        self.answer_time_cap_ms
    }

    #[must_use]
    pub fn feedback_delay_ms(&self) -> u64 {
        self.feedback_delay_ms
    }

    #[must_use]
    pub fn time_cap(&self) -> TimeCap {
        self.answer_time_cap_ms
            .map_or(TimeCap::Uncapped, TimeCap::Capped)
    }

    /// Editable copy of these settings.
    #[must_use]
    pub fn to_draft(&self) -> SettingsDraft {
        SettingsDraft {
            show_progress_bar: self.show_progress_bar,
            answer_time_cap_ms: self.answer_time_cap_ms,
            feedback_delay_ms: self.feedback_delay_ms,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_progress_bar: false,
            answer_time_cap_ms: Some(DEFAULT_ANSWER_TIME_CAP_MS),
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_policy_clamps_only_when_capped() {
        assert_eq!(TimeCap::Capped(9_900).apply(12_000), 9_900);
        assert_eq!(TimeCap::Capped(9_900).apply(1_500), 1_500);
        assert_eq!(TimeCap::Uncapped.apply(12_000), 12_000);
    }

    #[test]
    fn default_settings_cap_answers() {
        let settings = Settings::default();
        assert_eq!(settings.time_cap(), TimeCap::Capped(DEFAULT_ANSWER_TIME_CAP_MS));
        assert!(!settings.show_progress_bar());
        assert_eq!(SettingsDraft::new().validate().unwrap(), settings);
    }

    #[test]
    fn validation_rejects_zero_cap_and_long_delay() {
        let mut draft = SettingsDraft::new();
        draft.answer_time_cap_ms = Some(0);
        assert_eq!(draft.clone().validate(), Err(SettingsError::ZeroTimeCap));

        draft.answer_time_cap_ms = None;
        draft.feedback_delay_ms = MAX_FEEDBACK_DELAY_MS + 1;
        assert!(matches!(
            draft.validate(),
            Err(SettingsError::FeedbackDelayTooLong { .. })
        ));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "show_progress_bar": true }"#).unwrap();
        assert!(settings.show_progress_bar());
        assert_eq!(settings.answer_time_cap_ms(), Some(DEFAULT_ANSWER_TIME_CAP_MS));
    }

    #[test]
    fn uncapped_setting_maps_to_uncapped_policy() {
        let mut draft = SettingsDraft::new();
        draft.answer_time_cap_ms = None;
        assert_eq!(draft.validate().unwrap().time_cap(), TimeCap::Uncapped);
    }
}
