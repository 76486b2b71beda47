use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::resource::{Record, Resource};
use crate::database::store::{DocumentStore, Filter, StoreError};

/// Domain outcome of a service call. Everything except `Store` is an
/// expected result the HTTP layer maps to a client or availability status.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Missing required field.")]
    MissingField,

    #[error("Invalid field format.")]
    InvalidField,

    #[error("No changes to make.")]
    NoChanges,

    #[error("{0}")]
    Duplicate(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    NotSaved(&'static str),

    #[error("Something went wrong.")]
    UpdateFailed,

    #[error("Something went wrong. Try again later.")]
    RemoveFailed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Sparse set of recognised fields a client wants to change.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// JSON truthiness: `null`, `false`, `0`, and `""` count as absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Validation, lookups and persistence for one resource kind.
pub struct ResourceService<R> {
    store: Arc<dyn DocumentStore>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    /// Recognised, present fields of `candidate`
    fn present_fields(candidate: &Map<String, Value>) -> Map<String, Value> {
        let descriptor = R::DESCRIPTOR;
        candidate
            .iter()
            .filter(|(key, value)| descriptor.recognizes(key) && is_present(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Check a creation candidate. Returns the fields to persist.
    pub fn verify_fields(candidate: &Map<String, Value>) -> ServiceResult<Map<String, Value>> {
        let fields = Self::present_fields(candidate);

        if R::DESCRIPTOR.required.iter().any(|required| !fields.contains_key(*required)) {
            return Err(ServiceError::MissingField);
        }

        R::from_fields(&fields).map_err(|e| {
            tracing::debug!("Rejected {} fields: {}", R::DESCRIPTOR.collection.name, e);
            ServiceError::InvalidField
        })?;

        Ok(fields)
    }

    /// Build a patch from the recognised, present fields of `candidate`.
    pub fn verify_update(candidate: &Map<String, Value>) -> ServiceResult<Patch> {
        let fields = Self::present_fields(candidate);
        if fields.is_empty() {
            return Err(ServiceError::NoChanges);
        }
        Ok(Patch(fields))
    }

    /// Lookup by the resource's unique key (name, title, room code)
    pub async fn find_one_by_key(&self, value: &str) -> ServiceResult<Record<R>> {
        let descriptor = R::DESCRIPTOR;
        let filter = Filter::Field(descriptor.unique_key(), value);
        self.find_one(filter).await
    }

    pub async fn find_one_by_id(&self, id: Uuid) -> ServiceResult<Record<R>> {
        self.find_one(Filter::Id(id)).await
    }

    async fn find_one(&self, filter: Filter<'_>) -> ServiceResult<Record<R>> {
        let descriptor = R::DESCRIPTOR;
        match self.store.find_one(&descriptor.collection, filter).await? {
            Some(document) => Ok(Record::from_document(document)?),
            None => Err(ServiceError::NotFound(descriptor.not_found_message)),
        }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Record<R>>> {
        let descriptor = R::DESCRIPTOR;
        let documents = self.store.find_all(&descriptor.collection).await?;
        let records = documents
            .into_iter()
            .map(Record::from_document)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub async fn create(&self, fields: Map<String, Value>) -> ServiceResult<Record<R>> {
        let descriptor = R::DESCRIPTOR;
        match self.store.insert(&descriptor.collection, fields).await {
            Ok(Some(document)) => Ok(Record::from_document(document)?),
            Ok(None) => Err(ServiceError::NotSaved(descriptor.not_saved_message)),
            Err(StoreError::Conflict(_)) => Err(ServiceError::Duplicate(descriptor.duplicate_message)),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply `patch` to `existing` and return the refreshed record.
    pub async fn update_one_by_id(&self, existing: &Record<R>, patch: Patch) -> ServiceResult<Record<R>> {
        let descriptor = R::DESCRIPTOR;

        // The merged body must still be a valid resource
        let mut merged = match serde_json::to_value(&existing.fields) {
            Ok(Value::Object(map)) => map,
            _ => return Err(ServiceError::UpdateFailed),
        };
        merged.extend(patch.fields().clone());
        if let Err(e) = R::from_fields(&merged) {
            tracing::debug!("Rejected {} patch: {}", descriptor.collection.name, e);
            return Err(ServiceError::InvalidField);
        }

        match self.store.update(&descriptor.collection, existing.id, patch.into_inner()).await {
            Ok(Some(document)) => Ok(Record::from_document(document)?),
            Ok(None) => Err(ServiceError::UpdateFailed),
            Err(StoreError::Conflict(_)) => Err(ServiceError::Duplicate(descriptor.duplicate_message)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove(&self, id: Uuid) -> ServiceResult<()> {
        let descriptor = R::DESCRIPTOR;
        if self.store.delete(&descriptor.collection, id).await? {
            Ok(())
        } else {
            Err(ServiceError::RemoveFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{EducationArea, ExhibitionRoom, Recommendation};
    use crate::database::InMemoryStore;
    use crate::testing::{object, RejectingStore, UnavailableStore};
    use serde_json::json;

    fn areas() -> ResourceService<EducationArea> {
        ResourceService::new(Arc::new(InMemoryStore::new()))
    }

    fn physics() -> Map<String, Value> {
        object(json!({"name": "Physics", "description": "Forces and motion"}))
    }

    #[test]
    fn truthiness_follows_json_semantics() {
        assert!(!is_present(&Value::Null));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!(false)));
        assert!(is_present(&json!([])));
        assert!(is_present(&json!({})));
        assert!(is_present(&json!(-1)));
        assert!(is_present(&json!("x")));
    }

    #[test]
    fn verify_fields_requires_every_required_field() {
        assert!(ResourceService::<EducationArea>::verify_fields(&physics()).is_ok());

        let missing = object(json!({"name": "Physics"}));
        assert!(matches!(
            ResourceService::<EducationArea>::verify_fields(&missing),
            Err(ServiceError::MissingField)
        ));

        let blank = object(json!({"name": "", "description": "x"}));
        assert!(matches!(
            ResourceService::<EducationArea>::verify_fields(&blank),
            Err(ServiceError::MissingField)
        ));
    }

    #[test]
    fn verify_fields_drops_unrecognised_fields() {
        let mut candidate = physics();
        candidate.insert("_id".to_string(), json!("forged"));
        candidate.insert("color".to_string(), json!("red"));

        let fields = ResourceService::<EducationArea>::verify_fields(&candidate).unwrap();
        assert_eq!(fields, physics());
    }

    #[test]
    fn verify_fields_rejects_wrong_types() {
        let candidate = object(json!({
            "title": "Build a kite",
            "description": "not a list",
            "steps": ["cut", "glue"],
            "source": "museum",
            "image": "kite.png"
        }));
        assert!(matches!(
            ResourceService::<Recommendation>::verify_fields(&candidate),
            Err(ServiceError::InvalidField)
        ));
    }

    #[test]
    fn verify_update_keeps_exactly_the_truthy_recognised_fields() {
        let candidate = object(json!({
            "title": "",
            "steps": ["one"],
            "source": null,
            "image": "new.png",
            "unknown": "x"
        }));
        let patch = ResourceService::<Recommendation>::verify_update(&candidate).unwrap();
        assert_eq!(patch.fields(), &object(json!({"steps": ["one"], "image": "new.png"})));
    }

    #[test]
    fn verify_update_fails_without_changes() {
        let candidate = object(json!({"title": "", "other": "x"}));
        assert!(matches!(
            ResourceService::<Recommendation>::verify_update(&candidate),
            Err(ServiceError::NoChanges)
        ));
        assert!(matches!(
            ResourceService::<ExhibitionRoom>::verify_update(&Map::new()),
            Err(ServiceError::NoChanges)
        ));
    }

    #[tokio::test]
    async fn create_then_find_by_key_and_id() {
        let service = areas();
        let created = service.create(physics()).await.unwrap();
        assert_eq!(created.fields.name, "Physics");

        let by_name = service.find_one_by_key("Physics").await.unwrap();
        assert_eq!(by_name.id, created.id);

        let by_id = service.find_one_by_id(created.id).await.unwrap();
        assert_eq!(by_id.fields, created.fields);
    }

    #[tokio::test]
    async fn lookups_report_not_found() {
        let service = areas();
        let err = service.find_one_by_key("Chemistry").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("Education area not found.")));

        let err = service.find_one_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_translates_unique_conflicts() {
        let service = areas();
        service.create(physics()).await.unwrap();
        let err = service.create(physics()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate("Education area already exists.")));
    }

    #[tokio::test]
    async fn update_changes_only_patched_fields() {
        let service = areas();
        let created = service.create(physics()).await.unwrap();
        let patch = ResourceService::<EducationArea>::verify_update(&object(json!({"image": "atom.png"}))).unwrap();

        let updated = service.update_one_by_id(&created, patch).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.fields.name, "Physics");
        assert_eq!(updated.fields.description, "Forces and motion");
        assert_eq!(updated.fields.image.as_deref(), Some("atom.png"));
    }

    #[tokio::test]
    async fn update_rejects_patch_that_breaks_types() {
        let rooms = ResourceService::<ExhibitionRoom>::new(Arc::new(InMemoryStore::new()));
        let created = rooms
            .create(object(json!({"roomCode": "A1", "name": "Fossils", "description": "Bones"})))
            .await
            .unwrap();
        let patch = ResourceService::<ExhibitionRoom>::verify_update(&object(json!({"floor": "two"}))).unwrap();

        let err = rooms.update_one_by_id(&created, patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidField));
    }

    #[tokio::test]
    async fn remove_deletes_the_record() {
        let service = areas();
        let created = service.create(physics()).await.unwrap();

        service.remove(created.id).await.unwrap();
        assert!(service.find_one_by_id(created.id).await.is_err());
        assert!(matches!(service.remove(created.id).await, Err(ServiceError::RemoveFailed)));
    }

    #[tokio::test]
    async fn find_all_returns_records_in_insertion_order() {
        let service = areas();
        assert!(service.find_all().await.unwrap().is_empty());

        service.create(physics()).await.unwrap();
        service
            .create(object(json!({"name": "Biology", "description": "Life"})))
            .await
            .unwrap();

        let names: Vec<_> = service.find_all().await.unwrap().into_iter().map(|r| r.fields.name).collect();
        assert_eq!(names, vec!["Physics", "Biology"]);
    }

    #[tokio::test]
    async fn store_rejections_become_envelope_failures() {
        let service = ResourceService::<EducationArea>::new(Arc::new(RejectingStore::default()));
        let err = service.create(physics()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotSaved("Education area could not be saved.")));

        let err = service.remove(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::RemoveFailed));
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let service = ResourceService::<EducationArea>::new(Arc::new(UnavailableStore));
        let err = service.find_one_by_key("Physics").await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Unavailable(_))));

        let err = service.create(physics()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
    }
}
