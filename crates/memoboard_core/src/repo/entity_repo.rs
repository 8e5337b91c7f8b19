//! Typed repository facades over the generic record store.
//!
//! # Responsibility
//! - Bind each entity type to its stored collection.
//! - Encode drafts/patches into record documents and decode stored
//!   documents back into typed records.
//!
//! # Invariants
//! - Facades add no behavior beyond (de)serialization and the entity's
//!   validation hooks; all persistence semantics live in the store.
//! - Custom block items are validated against the block type on create
//!   and on whole-sequence replace.

use crate::model::block::{
    validate_items, CustomBlock, CustomBlockPatch, NewCustomBlock, ValidationError,
};
use crate::model::laundry::{LaundryLoad, LaundryLoadPatch, NewLaundryLoad};
use crate::model::note::{NewNote, Note, NotePatch};
use crate::model::reminder::{NewReminder, Reminder, ReminderPatch};
use crate::model::spending::{NewSpending, Spending, SpendingPatch};
use crate::repo::record_store::{Collection, RecordData, RecordStore, RepoError, RepoResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

/// Binding between one typed entity and its stored collection.
pub trait Entity: Serialize + DeserializeOwned {
    const COLLECTION: Collection;
    /// Creation fields, without the envelope.
    type Draft: Serialize;
    /// Partial update; absent fields are preserved.
    type Patch: Serialize;

    fn validate_draft(_draft: &Self::Draft) -> Result<(), ValidationError> {
        Ok(())
    }

    fn validate_patch(_patch: &Self::Patch, _current: &Self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl Entity for LaundryLoad {
    const COLLECTION: Collection = Collection::LaundryLoads;
    type Draft = NewLaundryLoad;
    type Patch = LaundryLoadPatch;
}

impl Entity for Spending {
    const COLLECTION: Collection = Collection::Spendings;
    type Draft = NewSpending;
    type Patch = SpendingPatch;
}

impl Entity for Note {
    const COLLECTION: Collection = Collection::Notes;
    type Draft = NewNote;
    type Patch = NotePatch;
}

impl Entity for Reminder {
    const COLLECTION: Collection = Collection::Reminders;
    type Draft = NewReminder;
    type Patch = ReminderPatch;
}

impl Entity for CustomBlock {
    const COLLECTION: Collection = Collection::CustomBlocks;
    type Draft = NewCustomBlock;
    type Patch = CustomBlockPatch;

    fn validate_draft(draft: &Self::Draft) -> Result<(), ValidationError> {
        validate_items(draft.block_type, &draft.items)
    }

    fn validate_patch(patch: &Self::Patch, current: &Self) -> Result<(), ValidationError> {
        match &patch.items {
            Some(items) => validate_items(current.block_type, items),
            None => Ok(()),
        }
    }
}

/// Thin typed wrapper over one collection of the record store.
pub struct EntityRepository<'s, S: RecordStore, E: Entity> {
    store: &'s S,
    _entity: PhantomData<E>,
}

impl<'s, S: RecordStore, E: Entity> EntityRepository<'s, S, E> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Lists every record of this entity, newest first.
    pub fn list(&self) -> RepoResult<Vec<E>> {
        let records = self.store.list_all(E::COLLECTION)?;
        records.into_iter().map(decode_entity::<E>).collect()
    }

    /// Gets one record by stable id.
    pub fn get(&self, id: &str) -> RepoResult<Option<E>> {
        match self.store.get(E::COLLECTION, id)? {
            Some(doc) => Ok(Some(decode_entity::<E>(doc)?)),
            None => Ok(None),
        }
    }

    /// Creates one record from creation fields and returns the stored
    /// record with its generated envelope.
    pub fn create(&self, draft: &E::Draft) -> RepoResult<E> {
        E::validate_draft(draft)?;
        let fields = encode_fields(draft)?;
        let doc = self.store.create(E::COLLECTION, fields)?;
        decode_entity::<E>(doc)
    }

    /// Shallow-merges a patch into one record and returns the result.
    ///
    /// Fails `NotFound` when the id is absent.
    pub fn update(&self, id: &str, patch: &E::Patch) -> RepoResult<E> {
        let current = self.get(id)?.ok_or_else(|| RepoError::NotFound {
            collection: E::COLLECTION,
            id: id.to_string(),
        })?;
        E::validate_patch(patch, &current)?;

        let fields = encode_fields(patch)?;
        let doc = self.store.update(E::COLLECTION, id, fields)?;
        decode_entity::<E>(doc)
    }

    /// Removes one record; removing a missing id succeeds.
    pub fn delete(&self, id: &str) -> RepoResult<()> {
        self.store.delete(E::COLLECTION, id)
    }
}

pub type LaundryRepository<'s, S> = EntityRepository<'s, S, LaundryLoad>;
pub type SpendingRepository<'s, S> = EntityRepository<'s, S, Spending>;
pub type NoteRepository<'s, S> = EntityRepository<'s, S, Note>;
pub type ReminderRepository<'s, S> = EntityRepository<'s, S, Reminder>;
pub type CustomBlockRepository<'s, S> = EntityRepository<'s, S, CustomBlock>;

fn encode_fields<T: Serialize>(value: &T) -> RepoResult<RecordData> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RepoError::InvalidData(
            "entity fields must serialize to an object".into(),
        )),
        Err(err) => Err(RepoError::InvalidData(format!(
            "entity fields failed to serialize: {err}"
        ))),
    }
}

fn decode_entity<E: Entity>(doc: RecordData) -> RepoResult<E> {
    serde_json::from_value(Value::Object(doc)).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid persisted record in `{}`: {err}",
            E::COLLECTION
        ))
    })
}
