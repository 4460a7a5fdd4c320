//! Persistence adapters: typed records in, typed records out.

use std::marker::PhantomData;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::models::{Cycle, Note, StatusCheck, Symptom, UserPreferences};
use crate::store::{to_document, Document, DocumentStore, Filter, Sort, StoreError, MAX_LIST_LEN};
use crate::validation::Patch;

/// A record type with its own collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
    /// Listing order; `None` keeps insertion order.
    const SORT: Option<Sort>;
}

impl Record for StatusCheck {
    const COLLECTION: &'static str = "status_checks";
    const SORT: Option<Sort> = None;
}

impl Record for Cycle {
    const COLLECTION: &'static str = "cycles";
    const SORT: Option<Sort> = Some(Sort::newest_first("createdAt"));
}

impl Record for Symptom {
    const COLLECTION: &'static str = "symptoms";
    const SORT: Option<Sort> = Some(Sort::newest_first("createdAt"));
}

impl Record for Note {
    const COLLECTION: &'static str = "notes";
    const SORT: Option<Sort> = Some(Sort::newest_first("createdAt"));
}

impl Record for UserPreferences {
    const COLLECTION: &'static str = "preferences";
    const SORT: Option<Sort> = None;
}

fn from_document<R: Record>(doc: Document) -> Result<R, StoreError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Insert / find / list / update / delete for one record type, keyed by `id`.
pub struct Records<R>(PhantomData<R>);

pub type StatusCheckRepo = Records<StatusCheck>;
pub type CycleRepo = Records<Cycle>;
pub type SymptomRepo = Records<Symptom>;
pub type NoteRepo = Records<Note>;

impl<R: Record> Records<R> {
    pub async fn insert(store: &dyn DocumentStore, record: &R) -> Result<(), StoreError> {
        store.insert_one(R::COLLECTION, to_document(record)?).await
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<R>, StoreError> {
        store
            .find_one(R::COLLECTION, &Filter::by_id(id))
            .await?
            .map(from_document)
            .transpose()
    }

    /// At most [`MAX_LIST_LEN`] records; anything beyond is silently dropped.
    pub async fn list(store: &dyn DocumentStore) -> Result<Vec<R>, StoreError> {
        store
            .find_many(R::COLLECTION, &Filter::any(), R::SORT, MAX_LIST_LEN)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Merge the fields present in `patch` onto the stored record and return
    /// the record as re-read from the store. `None` when `id` does not exist.
    pub async fn update_by_id<P>(
        store: &dyn DocumentStore,
        id: &str,
        patch: &P,
    ) -> Result<Option<R>, StoreError>
    where
        P: Patch<Target = R> + Sync,
    {
        let Some(current) = Self::find_by_id(store, id).await? else {
            return Ok(None);
        };

        let set = patch.changes(&current)?;
        let matched = store.update_one(R::COLLECTION, &Filter::by_id(id), set).await?;
        if matched == 0 {
            return Ok(None);
        }

        Self::find_by_id(store, id).await
    }

    /// `false` when nothing had that `id`.
    pub async fn delete_by_id(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
        let deleted = store.delete_one(R::COLLECTION, &Filter::by_id(id)).await?;
        Ok(deleted > 0)
    }
}

/// Well-known id of the single preferences record.
///
/// Creating the record under a fixed id lets the store's unique-id check
/// settle concurrent first reads: the loser of the race gets
/// `DuplicateKey` and reads the winner's record.
pub const PREFERENCES_ID: &str = "default";

pub struct PreferencesRepo;

impl PreferencesRepo {
    pub async fn get_or_create(store: &dyn DocumentStore) -> Result<UserPreferences, StoreError> {
        if let Some(prefs) = Records::<UserPreferences>::find_by_id(store, PREFERENCES_ID).await? {
            return Ok(prefs);
        }

        let prefs = UserPreferences::with_defaults(PREFERENCES_ID);
        match Records::insert(store, &prefs).await {
            Ok(()) => {
                tracing::info!("Created default preferences");
                Ok(prefs)
            }
            Err(StoreError::DuplicateKey { .. }) => {
                Records::<UserPreferences>::find_by_id(store, PREFERENCES_ID)
                    .await?
                    .ok_or_else(vanished)
            }
            Err(e) => Err(e),
        }
    }

    /// Apply `patch` to the preferences (creating them first if needed) and
    /// refresh `updatedAt`.
    pub async fn update<P>(store: &dyn DocumentStore, patch: &P) -> Result<UserPreferences, StoreError>
    where
        P: Patch<Target = UserPreferences> + Sync,
    {
        let current = Self::get_or_create(store).await?;

        let mut set = patch.changes(&current)?;
        set.insert("updatedAt".into(), serde_json::to_value(Utc::now())?);

        store
            .update_one(UserPreferences::COLLECTION, &Filter::by_id(&current.id), set)
            .await?;

        Records::<UserPreferences>::find_by_id(store, &current.id)
            .await?
            .ok_or_else(vanished)
    }
}

fn vanished() -> StoreError {
    StoreError::Vanished {
        collection: UserPreferences::COLLECTION.to_owned(),
        id: PREFERENCES_ID.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CycleCreate, CycleUpdate, UserPreferencesUpdate};
    use crate::store::MemoryStore;

    fn cycle(start: &str) -> Cycle {
        Cycle::from(CycleCreate {
            start_date: start.into(),
            end_date: None,
            flow: "light".into(),
            length: Some(27),
        })
    }

    #[tokio::test]
    async fn update_of_missing_record_touches_nothing() {
        let store = MemoryStore::new();
        let update = CycleUpdate {
            flow: Some("heavy".into()),
            ..Default::default()
        };

        let result = CycleRepo::update_by_id(&store, "missing", &update).await.unwrap();
        assert!(result.is_none());
        assert!(CycleRepo::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_returns_stored_state() {
        let store = MemoryStore::new();
        let original = cycle("2024-01-01");
        CycleRepo::insert(&store, &original).await.unwrap();

        let update = CycleUpdate {
            length: Some(31),
            ..Default::default()
        };
        let updated = CycleRepo::update_by_id(&store, &original.id, &update)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.length, 31);
        assert_eq!(updated.flow, "light");
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(
            CycleRepo::find_by_id(&store, &original.id).await.unwrap(),
            Some(updated)
        );
    }

    #[tokio::test]
    async fn concurrent_first_reads_create_one_preferences_record() {
        let store = MemoryStore::new();

        let (a, b) = tokio::join!(
            PreferencesRepo::get_or_create(&store),
            PreferencesRepo::get_or_create(&store)
        );
        assert_eq!(a.unwrap().id, b.unwrap().id);

        let stored = Records::<UserPreferences>::list(&store).await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn preferences_update_refreshes_updated_at_only() {
        let store = MemoryStore::new();
        let created = PreferencesRepo::get_or_create(&store).await.unwrap();

        let update = UserPreferencesUpdate {
            language: Some("fr".into()),
            ..Default::default()
        };
        let updated = PreferencesRepo::update(&store, &update).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.language, "fr");
        assert_eq!(updated.theme, "neutral");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }
}
