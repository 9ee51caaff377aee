//! Business identifier → resource id resolution with a per-run cache.

use std::collections::BTreeMap;

use bus_model::{ResourceStore, StoreError};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lookup {
    Found(String),
    Missing,
    /// Only the index lookup has been tried, and it missed.
    FastMissed,
}

/// Cache keyed by (graph id, business id). Lives as long as the uploader.
#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    entries: BTreeMap<(String, String), Lookup>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Resolves business identifiers against a store through an
/// [`IdentityCache`].
pub struct ResourceResolver<'a> {
    store: &'a dyn ResourceStore,
    cache: &'a mut IdentityCache,
}

impl<'a> ResourceResolver<'a> {
    pub fn new(store: &'a dyn ResourceStore, cache: &'a mut IdentityCache) -> Self {
        Self { store, cache }
    }

    /// Resource id for `business_id` in `graph_id`.
    ///
    /// The index lookup runs first. Unless `quick` is set, a miss falls back
    /// to the slow scan, whose candidate is accepted only when one of its
    /// text values equals `business_id` exactly.
    pub fn resolve(
        &mut self,
        graph_id: &str,
        business_id: &str,
        quick: bool,
    ) -> Result<Option<String>, StoreError> {
        let key = (graph_id.to_string(), business_id.to_string());
        let fast_missed = match self.cache.entries.get(&key) {
            Some(Lookup::Found(id)) => return Ok(Some(id.clone())),
            Some(Lookup::Missing) => return Ok(None),
            Some(Lookup::FastMissed) => true,
            None => false,
        };
        if !fast_missed {
            if let Some(hit) = self.store.find_by_business_id(graph_id, business_id)? {
                trace!(graph_id, resource = %hit.resourceinstanceid, "index hit");
                self.cache
                    .entries
                    .insert(key, Lookup::Found(hit.resourceinstanceid.clone()));
                return Ok(Some(hit.resourceinstanceid));
            }
        }
        if quick {
            self.cache.entries.insert(key, Lookup::FastMissed);
            return Ok(None);
        }
        let found = self
            .store
            .scan_by_business_id(graph_id, business_id)?
            .filter(|hit| hit.string_values.iter().any(|value| value == business_id))
            .map(|hit| hit.resourceinstanceid);
        let entry = found.clone().map_or(Lookup::Missing, Lookup::Found);
        self.cache.entries.insert(key, entry);
        Ok(found)
    }
}
