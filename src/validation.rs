//! Partial-update payloads.
//!
//! An update payload names only the fields it changes; `null` counts as
//! absent. A [`Patch`] turns such a payload into the set of top-level fields
//! to merge onto the stored document, leaving every other field untouched.

use serde_json::Value;

use crate::error::AppError;
use crate::models::{Cycle, CycleUpdate, UserPreferences, UserPreferencesUpdate};
use crate::store::{to_document, Document};

pub trait Patch {
    type Target;

    /// True when the payload carries no field to change.
    fn is_empty(&self) -> bool;

    /// Fields to merge onto `current`. Nested values are resolved against
    /// `current`, so the result can be written with a top-level merge.
    fn changes(&self, current: &Self::Target) -> Result<Document, serde_json::Error>;
}

/// Reject a payload with nothing to update before the store is touched.
pub fn require_changes<P: Patch>(patch: &P) -> Result<(), AppError> {
    if patch.is_empty() {
        return Err(AppError::BadRequest("No data provided for update".into()));
    }
    Ok(())
}

impl Patch for CycleUpdate {
    type Target = Cycle;

    fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.flow.is_none()
            && self.length.is_none()
    }

    fn changes(&self, _current: &Cycle) -> Result<Document, serde_json::Error> {
        to_document(self)
    }
}

impl Patch for UserPreferencesUpdate {
    type Target = UserPreferences;

    fn is_empty(&self) -> bool {
        self.theme.is_none() && self.language.is_none() && self.notifications.is_none()
    }

    fn changes(&self, current: &UserPreferences) -> Result<Document, serde_json::Error> {
        let mut set = Document::new();
        if let Some(theme) = &self.theme {
            set.insert("theme".into(), Value::String(theme.clone()));
        }
        if let Some(language) = &self.language {
            set.insert("language".into(), Value::String(language.clone()));
        }
        if let Some(notifications) = &self.notifications {
            let merged = notifications.merged_onto(current.notifications);
            set.insert("notifications".into(), serde_json::to_value(merged)?);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CycleCreate, NotificationSettingsUpdate};
    use serde_json::json;

    fn stored_cycle() -> Cycle {
        Cycle::from(CycleCreate {
            start_date: "2024-12-15".into(),
            end_date: Some("2024-12-19".into()),
            flow: "medium".into(),
            length: None,
        })
    }

    #[test]
    fn null_fields_count_as_absent() {
        let update: CycleUpdate =
            serde_json::from_value(json!({"endDate": null, "flow": null})).unwrap();
        assert!(update.is_empty());
        assert!(require_changes(&update).is_err());
    }

    #[test]
    fn cycle_changes_hold_only_present_fields() {
        let update: CycleUpdate =
            serde_json::from_value(json!({"flow": "heavy", "length": 30})).unwrap();
        let set = update.changes(&stored_cycle()).unwrap();

        assert_eq!(Value::Object(set), json!({"flow": "heavy", "length": 30}));
    }

    #[test]
    fn preference_notifications_merge_flag_by_flag() {
        let current = UserPreferences::with_defaults("prefs");
        let update = UserPreferencesUpdate {
            notifications: Some(NotificationSettingsUpdate {
                daily_check: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };

        let set = update.changes(&current).unwrap();
        assert!(!set.contains_key("theme"));
        assert_eq!(
            set["notifications"],
            json!({
                "periodReminders": true,
                "ovulationReminders": true,
                "fertileWindow": false,
                "dailyCheck": true,
            })
        );
    }

    #[test]
    fn empty_notification_object_is_still_a_change() {
        let update: UserPreferencesUpdate =
            serde_json::from_value(json!({"notifications": {}})).unwrap();
        assert!(!update.is_empty());
    }

    #[test]
    fn client_timestamps_are_not_part_of_an_update() {
        let update: UserPreferencesUpdate = serde_json::from_value(
            json!({"theme": "dark", "updatedAt": "1999-01-01T00:00:00Z", "id": "x"}),
        )
        .unwrap();
        let set = update.changes(&UserPreferences::with_defaults("prefs")).unwrap();

        assert_eq!(Value::Object(set), json!({"theme": "dark"}));
    }
}
