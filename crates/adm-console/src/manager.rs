//! Generic CRUD manager shared by the user and product consoles.
//!
//! A [`RecordManager`] owns the loaded collection of one record type, the
//! create/edit form and the notifications those produce. Every write goes
//! through the store and is followed by a full reload; the local collection is
//! only ever replaced by what the store returned.
//!
//! Operations take `&mut self`, so one manager never runs two requests at once.
//! Dropping an in-flight future abandons it before anything is committed: the
//! collection is untouched and the `Loading`/`Saving` phase set for the request
//! is rolled back to the phase before it.

use std::{collections::HashMap, fmt};

use adm_store::{Record, RecordId, StoreClient, repository};
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::{
    error::{ConsoleError, WriteAction},
    notification::Notifier,
    validation::FieldErrors,
};

/// Per-type behaviour plugged into [`RecordManager`]
pub trait Managed: Record + fmt::Debug {
    /// Capitalised noun used in success messages ("User saved successfully.")
    const TITLE: &'static str;
    /// Lower-case noun used in failure messages
    const NOUN: &'static str;

    /// Raw form state, as typed by the operator
    type Form: Clone + Default + fmt::Debug + Send + Sync;

    fn to_form(&self) -> Self::Form;

    /// Check every field; `loaded` is the collection currently shown.
    fn validate(form: &Self::Form, mode: &FormMode, loaded: &[Self]) -> FieldErrors;

    /// Fields the form owns, ready to be sent or merged over a stored record.
    fn payload(form: &Self::Form) -> Map<String, Value>;

    /// Extra fields for records created from the form.
    fn stamp_new(_payload: &mut Map<String, Value>) {}

    /// Display order of the collection after de-duplication.
    fn arrange(_records: &mut [Self]) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalPhase {
    Editing,
    Validating,
    Saving,
    SaveError(String),
}

/// The open create/edit form
#[derive(Debug, Clone)]
pub struct Modal<F> {
    pub mode: FormMode,
    pub form: F,
    pub errors: FieldErrors,
    pub phase: ModalPhase,
}

impl<F> Modal<F> {
    fn new(mode: FormMode, form: F) -> Self {
        Self {
            mode,
            form,
            errors: FieldErrors::default(),
            phase: ModalPhase::Editing,
        }
    }
}

/// Holds a transient phase in `slot` for the duration of a request.
///
/// Dropped without [`PhaseGuard::keep`], for instance when the future running
/// the request is cancelled, it puts `restore` back.
struct PhaseGuard<'a, S> {
    slot: &'a mut S,
    restore: Option<S>,
}

impl<'a, S> PhaseGuard<'a, S> {
    fn set(slot: &'a mut S, transient: S, restore: S) -> Self {
        *slot = transient;
        Self {
            slot,
            restore: Some(restore),
        }
    }

    fn keep(mut self) {
        self.restore = None;
    }
}

impl<S> Drop for PhaseGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            *self.slot = restore;
        }
    }
}

/// Collapse duplicate ids: the last occurrence wins but keeps the slot of the
/// first one.
pub fn dedupe_by_id<T: Record>(records: Vec<T>) -> Vec<T> {
    let mut slots: HashMap<RecordId, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<T> = Vec::with_capacity(records.len());

    for record in records {
        match slots.get(record.id()) {
            Some(&slot) => unique[slot] = record,
            None => {
                slots.insert(record.id().clone(), unique.len());
                unique.push(record);
            }
        }
    }

    unique
}

#[derive(Debug)]
pub struct RecordManager<T: Managed> {
    client: StoreClient,
    notifier: Notifier,
    records: Vec<T>,
    load_state: LoadState,
    modal: Option<Modal<T::Form>>,
    published: watch::Sender<Vec<T>>,
}

impl<T: Managed> RecordManager<T> {
    /// Empty, idle manager; nothing is fetched until [`Self::reload`].
    pub fn new(client: StoreClient, notifier: Notifier) -> Self {
        let (published, _) = watch::channel(Vec::new());

        Self {
            client,
            notifier,
            records: Vec::new(),
            load_state: LoadState::Idle,
            modal: None,
            published,
        }
    }

    /// The committed collection, de-duplicated and in display order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Loaded record with exactly this id; `1` and `"1"` are different ids.
    pub fn find(&self, id: &RecordId) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn modal(&self) -> Option<&Modal<T::Form>> {
        self.modal.as_ref()
    }

    pub(crate) fn modal_mut(&mut self) -> Option<&mut Modal<T::Form>> {
        self.modal.as_mut()
    }

    pub(crate) fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Observe every committed collection, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.published.subscribe()
    }

    fn commit(&mut self, records: Vec<T>) {
        self.published.send_replace(records.clone());
        self.records = records;
    }

    /// Fetch the whole collection and replace the local copy.
    ///
    /// On failure the collection is emptied and an error notification sent.
    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn reload(&mut self) -> Result<(), ConsoleError> {
        let previous = self.load_state.clone();
        let loading = PhaseGuard::set(&mut self.load_state, LoadState::Loading, previous);
        let fetched = repository::list::<T>(&self.client).await;
        loading.keep();

        match fetched {
            Ok(fetched) => {
                let fetched_len = fetched.len();
                let mut unique = dedupe_by_id(fetched);
                T::arrange(&mut unique);

                tracing::debug!(
                    fetched = fetched_len,
                    unique = unique.len(),
                    "Collection loaded"
                );

                self.commit(unique);
                self.load_state = LoadState::Loaded;
                Ok(())
            }
            Err(source) => {
                let err = ConsoleError::Load {
                    collection: T::COLLECTION,
                    source,
                };
                tracing::error!("Failed to load {}: {err}", T::COLLECTION);

                self.notifier.error(format!(
                    "Failed to load {}: {err}. Please check if the server is running.",
                    T::COLLECTION
                ));
                self.commit(Vec::new());
                self.load_state = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub fn open_create(&mut self) {
        self.modal = Some(Modal::new(FormMode::Create, T::Form::default()));
    }

    /// Open the edit form, pre-filled from the loaded record when there is one.
    pub fn open_edit(&mut self, id: &RecordId) {
        let form = self.find(id).map(T::to_form).unwrap_or_default();
        self.modal = Some(Modal::new(FormMode::Edit(id.clone()), form));
    }

    pub fn form_mut(&mut self) -> Option<&mut T::Form> {
        self.modal.as_mut().map(|modal| &mut modal.form)
    }

    pub fn close(&mut self) {
        self.modal = None;
    }

    /// Validate and save the open form.
    ///
    /// Creates are a plain POST. Edits look the record up first: a found
    /// record is replaced by itself with the form merged over it, a missing
    /// one is created instead. Success reloads, notifies and closes the form;
    /// a failed write keeps the form open.
    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn submit(&mut self) -> Result<(), ConsoleError> {
        let Some(modal) = self.modal.as_mut() else {
            return Err(ConsoleError::NoOpenForm);
        };

        modal.phase = ModalPhase::Validating;
        let errors = T::validate(&modal.form, &modal.mode, &self.records);
        if !errors.is_empty() {
            tracing::debug!(fields = errors.len(), "Form rejected");
            modal.errors = errors.clone();
            modal.phase = ModalPhase::Editing;
            return Err(ConsoleError::Validation(errors));
        }

        modal.errors = FieldErrors::default();
        let mode = modal.mode.clone();
        let payload = T::payload(&modal.form);

        let saving = PhaseGuard::set(&mut modal.phase, ModalPhase::Saving, ModalPhase::Editing);
        let saved = Self::save(&self.client, &mode, payload).await;
        saving.keep();

        match saved {
            Ok(()) => {
                tracing::info!(?mode, "{} saved", T::TITLE);
                // The write is done; the form closes even if the reload is abandoned
                self.modal = None;
                if let Err(e) = self.reload().await {
                    tracing::warn!("Saved, but reload failed: {e}");
                }
                self.notifier
                    .success(format!("{} saved successfully.", T::TITLE));
                Ok(())
            }
            Err(err) => {
                tracing::error!("Failed to save {}: {err}", T::NOUN);
                self.notifier
                    .error(format!("Failed to save {}: {err}. Please try again.", T::NOUN));
                if let Some(modal) = self.modal.as_mut() {
                    modal.phase = ModalPhase::SaveError(err.to_string());
                }
                Err(err)
            }
        }
    }

    async fn save(
        client: &StoreClient,
        mode: &FormMode,
        payload: Map<String, Value>,
    ) -> Result<(), ConsoleError> {
        match mode {
            FormMode::Create => Self::create(client, payload, WriteAction::Create).await,
            FormMode::Edit(id) => Self::upsert(client, id, payload).await,
        }
    }

    async fn create(
        client: &StoreClient,
        mut payload: Map<String, Value>,
        action: WriteAction,
    ) -> Result<(), ConsoleError> {
        T::stamp_new(&mut payload);

        repository::create::<T>(client, &Value::Object(payload))
            .await
            .map_err(|source| ConsoleError::Write { action, source })
    }

    /// Replace the stored record with the form fields merged over it, exactly
    /// as the store returned it. Fields the form does not own are written back
    /// byte for byte.
    async fn upsert(
        client: &StoreClient,
        id: &RecordId,
        payload: Map<String, Value>,
    ) -> Result<(), ConsoleError> {
        let found = repository::find_raw_by_id::<T>(client, id)
            .await
            .map_err(ConsoleError::Lookup)?;

        let Some(mut merged) = found else {
            tracing::info!(%id, "Edited record is gone from the store, creating it");
            return Self::create(client, payload, WriteAction::UpsertCreate).await;
        };

        let actual_id = merged
            .get("id")
            .cloned()
            .and_then(|raw| serde_json::from_value::<RecordId>(raw).ok())
            .unwrap_or_else(|| id.clone());

        merged.extend(payload);
        merged.insert("id".to_string(), serde_json::to_value(&actual_id)?);

        repository::replace::<T>(client, &actual_id, &Value::Object(merged))
            .await
            .map_err(|source| ConsoleError::Write {
                action: WriteAction::Update,
                source,
            })
    }

    /// Delete a record by id and reload.
    ///
    /// A record that is already gone, either before the lookup or between the
    /// lookup and the DELETE, counts as deleted.
    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn delete(&mut self, id: &RecordId) -> Result<(), ConsoleError> {
        match self.remove(id).await {
            Ok(()) => {
                tracing::info!(%id, "{} deleted", T::TITLE);
                if let Err(e) = self.reload().await {
                    tracing::warn!("Deleted, but reload failed: {e}");
                }
                self.notifier
                    .success(format!("{} deleted successfully.", T::TITLE));
                Ok(())
            }
            Err(err) => {
                tracing::error!("Failed to delete {}: {err}", T::NOUN);
                self.notifier.error(format!(
                    "Failed to delete {}: {err}. Please try again.",
                    T::NOUN
                ));
                Err(err)
            }
        }
    }

    async fn remove(&self, id: &RecordId) -> Result<(), ConsoleError> {
        let found = repository::find_by_id::<T>(&self.client, id)
            .await
            .map_err(ConsoleError::Lookup)?;

        let Some(existing) = found else {
            tracing::info!(%id, "Record already absent");
            return Ok(());
        };

        match repository::remove::<T>(&self.client, existing.id()).await {
            Ok(()) => Ok(()),
            Err(source) if source.is_not_found() => {
                tracing::info!(%id, "Record vanished before DELETE");
                Ok(())
            }
            Err(source) => Err(ConsoleError::Write {
                action: WriteAction::Delete,
                source,
            }),
        }
    }
}
