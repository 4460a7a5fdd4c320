//! Record schemas and their create/update payloads.
//!
//! Payload structs double as the validation layer: required fields have no
//! serde default, so a missing or mistyped field fails deserialization
//! before any store call; optional fields are filled with their default
//! when the record is built. Enum-like strings (`flow`, `intensity`) and
//! date strings are stored as given.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_FLOW: &str = "medium";
pub const DEFAULT_CYCLE_LENGTH: i64 = 28;
pub const DEFAULT_INTENSITY: &str = "mild";
pub const DEFAULT_THEME: &str = "neutral";
pub const DEFAULT_LANGUAGE: &str = "en";

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_flow() -> String {
    DEFAULT_FLOW.to_owned()
}

fn default_intensity() -> String {
    DEFAULT_INTENSITY.to_owned()
}

// ---------------------------------------------------------------------------
// Status checks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

impl From<StatusCheckCreate> for StatusCheck {
    fn from(input: StatusCheckCreate) -> Self {
        Self {
            id: new_id(),
            client_name: input.client_name,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub flow: String,
    pub length: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleCreate {
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default = "default_flow")]
    pub flow: String,
    /// `null` is accepted and treated like an absent length.
    #[serde(default)]
    pub length: Option<i64>,
}

impl From<CycleCreate> for Cycle {
    fn from(input: CycleCreate) -> Self {
        Self {
            id: new_id(),
            start_date: input.start_date,
            end_date: input.end_date,
            flow: input.flow,
            length: input.length.unwrap_or(DEFAULT_CYCLE_LENGTH),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
}

// ---------------------------------------------------------------------------
// Symptoms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    pub id: String,
    pub date: String,
    pub symptoms: Vec<String>,
    pub intensity: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SymptomCreate {
    pub date: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default = "default_intensity")]
    pub intensity: String,
}

impl From<SymptomCreate> for Symptom {
    fn from(input: SymptomCreate) -> Self {
        Self {
            id: new_id(),
            date: input.date,
            symptoms: input.symptoms,
            intensity: input.intensity,
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub date: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NoteCreate {
    pub date: String,
    pub content: String,
}

impl From<NoteCreate> for Note {
    fn from(input: NoteCreate) -> Self {
        Self {
            id: new_id(),
            date: input.date,
            content: input.content,
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// User preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub period_reminders: bool,
    pub ovulation_reminders: bool,
    pub fertile_window: bool,
    pub daily_check: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            period_reminders: true,
            ovulation_reminders: true,
            fertile_window: false,
            daily_check: false,
        }
    }
}

/// The single preferences record of a deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub id: String,
    pub theme: String,
    pub language: String,
    pub notifications: NotificationSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserPreferences {
    pub fn with_defaults(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            theme: DEFAULT_THEME.to_owned(),
            language: DEFAULT_LANGUAGE.to_owned(),
            notifications: NotificationSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Flags left out of an update keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsUpdate {
    #[serde(default)]
    pub period_reminders: Option<bool>,
    #[serde(default)]
    pub ovulation_reminders: Option<bool>,
    #[serde(default)]
    pub fertile_window: Option<bool>,
    #[serde(default)]
    pub daily_check: Option<bool>,
}

impl NotificationSettingsUpdate {
    pub fn merged_onto(&self, current: NotificationSettings) -> NotificationSettings {
        NotificationSettings {
            period_reminders: self.period_reminders.unwrap_or(current.period_reminders),
            ovulation_reminders: self.ovulation_reminders.unwrap_or(current.ovulation_reminders),
            fertile_window: self.fertile_window.unwrap_or(current.fertile_window),
            daily_check: self.daily_check.unwrap_or(current.daily_check),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserPreferencesUpdate {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub notifications: Option<NotificationSettingsUpdate>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
