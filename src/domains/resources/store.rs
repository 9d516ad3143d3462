//! In-memory resource store.
//!
//! The store exclusively owns every [`Resource`] and is the only way to read or
//! change them. Records live in an ordered map keyed by an insertion sequence,
//! so listing follows creation order and deleting never reorders survivors.
//!
//! All access goes through one `RwLock` over the whole collection: mutations
//! take the write lock, reads share the read lock. Nothing awaits while the
//! lock is held.

use chrono::Utc;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use super::error::{ResourceError, ResourceResult};
use super::id::{IdGenerator, UuidGenerator};
use super::model::{NewResource, Resource, Status};
use super::patch::ResourcePatch;

/// How many times create asks the generator for an unused id before giving up.
const MAX_ID_ATTEMPTS: usize = 16;

/// Thread-safe in-memory collection of resources.
pub struct ResourceStore {
    inner: RwLock<Inner>,
    ids: Box<dyn IdGenerator>,
    default_status: Option<Status>,
}

#[derive(Default)]
struct Inner {
    // sequence -> record, in creation order
    records: BTreeMap<u64, Resource>,
    // id -> sequence
    index: HashMap<String, u64>,
    // every id ever handed out, live or deleted
    issued: HashSet<String>,
    next_seq: u64,
}

impl ResourceStore {
    /// Create an empty store with UUID ids that defaults omitted statuses to `active`.
    pub fn new() -> Self {
        Self::with_generator(Box::new(UuidGenerator))
    }

    /// Create an empty store using the given id generator.
    pub fn with_generator(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            ids,
            default_status: Some(Status::Active),
        }
    }

    /// Status applied when create omits one. `None` makes status mandatory.
    pub fn with_default_status(mut self, default_status: Option<Status>) -> Self {
        self.default_status = default_status;
        self
    }

    /// Status applied when create omits one, if any.
    pub fn default_status(&self) -> Option<Status> {
        self.default_status
    }

    // Mutations validate before writing, so a poisoned lock never guards a
    // half-applied change.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a resource and append it to the collection.
    pub fn create(&self, new: NewResource) -> ResourceResult<Resource> {
        let status = match new.status.as_deref() {
            Some(status) => status.parse()?,
            None => self
                .default_status
                .ok_or_else(|| ResourceError::invalid_argument("status is required"))?,
        };

        let mut inner = self.write();
        let id = self.fresh_id(&inner)?;

        let resource = Resource {
            id: id.clone(),
            name: new.name,
            description: new.description,
            status,
            created_at: Utc::now(),
        };

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.issued.insert(id.clone());
        inner.index.insert(id, seq);
        inner.records.insert(seq, resource.clone());

        info!(id = %resource.id, status = %resource.status, "Created resource");
        Ok(resource)
    }

    fn fresh_id(&self, inner: &Inner) -> ResourceResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !inner.issued.contains(&id) {
                return Ok(id);
            }
            warn!(%id, "Id generator returned an id that was already issued");
        }
        Err(ResourceError::internal(format!(
            "no unused id after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }

    /// All resources in creation order, optionally only those with `filter` status.
    pub fn list(&self, filter: Option<Status>) -> Vec<Resource> {
        let inner = self.read();
        let resources: Vec<Resource> = inner
            .records
            .values()
            .filter(|r| filter.is_none_or(|status| r.status == status))
            .cloned()
            .collect();

        debug!(?filter, count = resources.len(), "Listed resources");
        resources
    }

    /// Look up a resource by id.
    pub fn get(&self, id: &str) -> ResourceResult<Resource> {
        let inner = self.read();
        inner
            .index
            .get(id)
            .and_then(|seq| inner.records.get(seq))
            .cloned()
            .ok_or_else(|| ResourceError::not_found(id))
    }

    /// Apply a patch to an existing resource and return the updated record.
    ///
    /// The patch is applied entirely or not at all.
    pub fn update(&self, id: &str, patch: ResourcePatch) -> ResourceResult<Resource> {
        let mut inner = self.write();
        let seq = *inner
            .index
            .get(id)
            .ok_or_else(|| ResourceError::not_found(id))?;

        let valid = patch.validate()?;

        let resource = inner
            .records
            .get_mut(&seq)
            .ok_or_else(|| ResourceError::internal(format!("index points at missing record {}", id)))?;
        valid.apply(resource);

        info!(%id, status = %resource.status, "Updated resource");
        Ok(resource.clone())
    }

    /// Remove a resource. Returns whether anything was removed; deleting an
    /// unknown id is not an error.
    pub fn delete(&self, id: &str) -> bool {
        let mut inner = self.write();
        let removed = match inner.index.remove(id) {
            Some(seq) => inner.records.remove(&seq).is_some(),
            None => false,
        };

        if removed {
            info!(%id, "Deleted resource");
        } else {
            debug!(%id, "Delete of unknown resource ignored");
        }
        removed
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}
