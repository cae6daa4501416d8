//! Optimistic writes against the prayer API.
//!
//! Every write follows the same sequence, implemented once in
//! [`MutationController::mutate`]:
//!
//! 1. cancel any in-flight refresh of the list
//! 2. snapshot the cache
//! 3. apply the local change immediately
//! 4. send the request
//! 5. on error, restore the snapshot
//! 6. always invalidate, so the next read fetches server state
//!
//! Optimistically created entries get negative placeholder ids, which the
//! post-settle refresh replaces with server ids.

use chrono::Utc;
use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use super::api::PrayerApi;
use super::cache::EntryCache;
use super::error::ClientError;
use super::views::{ConfirmDialog, PrayerForm};
use crate::models::{NewPrayerEntry, PrayerEntry};

/// Owner id carried by entries that exist only locally.
pub const PLACEHOLDER_OWNER: i64 = 0;

pub struct MutationController<A> {
    api: A,
    cache: Arc<EntryCache>,
    next_temp_id: AtomicI64,
}

impl<A: PrayerApi> MutationController<A> {
    pub fn new(api: A, cache: Arc<EntryCache>) -> Self {
        Self {
            api,
            cache,
            next_temp_id: AtomicI64::new(-1),
        }
    }

    pub fn cache(&self) -> &Arc<EntryCache> {
        &self.cache
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches the list from the server into the cache.
    ///
    /// If a mutation cancels this refresh while it is in flight, the fetched
    /// data is discarded and the cache (with the newer optimistic change)
    /// is returned instead.
    pub async fn refresh(&self) -> Result<Vec<PrayerEntry>, ClientError> {
        let ticket = self.cache.begin_refresh();
        let entries = self.api.list().await?;

        if self.cache.complete_refresh(ticket, entries.clone()) {
            Ok(entries)
        } else {
            tracing::debug!("Discarded refresh superseded by a newer write");
            Ok(self.cache.read().unwrap_or_default())
        }
    }

    /// Cached entries, fetching first if the cache is stale.
    pub async fn entries(&self) -> Result<Vec<PrayerEntry>, ClientError> {
        match self.cache.read() {
            Some(entries) if !self.cache.is_stale() => Ok(entries),
            _ => self.refresh().await,
        }
    }

    /// Runs one optimistic write: `apply` edits the cache before `request`
    /// is awaited, and is undone if `request` fails.
    pub async fn mutate<T, F>(
        &self,
        apply: impl FnOnce(&mut Vec<PrayerEntry>),
        request: F,
    ) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        self.cache.cancel_refresh();
        let snapshot = self.cache.snapshot();
        self.cache.write(apply);

        let result = request.await;

        if let Err(e) = &result {
            tracing::warn!("Mutation failed, rolling back: {}", e);
            self.cache.restore(snapshot);
        }
        self.cache.invalidate();

        result
    }

    /// Submits the add form. The form is reset and closed once the request
    /// settles, whatever the outcome. Invalid input fails before any cache
    /// change or request and leaves the form open.
    pub async fn create(&self, form: &mut PrayerForm) -> Result<PrayerEntry, ClientError> {
        let new_entry = form.to_new_entry()?;
        let placeholder = self.placeholder(&new_entry);

        let result = self
            .mutate(
                |entries| entries.push(placeholder),
                self.api.create(&new_entry),
            )
            .await;

        form.reset();
        result
    }

    /// Flips the resolved flag of a cached entry.
    pub async fn toggle(&self, id: i64) -> Result<PrayerEntry, ClientError> {
        let current = self
            .cache
            .read()
            .and_then(|entries| entries.into_iter().find(|e| e.id == id))
            .ok_or(ClientError::UnknownEntry(id))?;
        let is_resolved = !current.is_resolved;

        self.mutate(
            |entries| {
                if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
                    entry.is_resolved = is_resolved;
                }
            },
            self.api.set_resolved(id, is_resolved),
        )
        .await
    }

    /// Deletes the entry targeted by the confirmation dialog, closing the
    /// dialog once the request settles. Does nothing if the dialog is closed.
    pub async fn delete(&self, dialog: &mut ConfirmDialog) -> Result<(), ClientError> {
        let Some(id) = dialog.target() else {
            return Ok(());
        };

        let result = self
            .mutate(|entries| entries.retain(|e| e.id != id), self.api.delete(id))
            .await;

        dialog.close();
        result
    }

    fn placeholder(&self, new_entry: &NewPrayerEntry) -> PrayerEntry {
        PrayerEntry {
            id: self.next_temp_id.fetch_sub(1, Ordering::Relaxed),
            user_id: PLACEHOLDER_OWNER,
            name: new_entry.name.clone(),
            description: new_entry.description.clone(),
            category: new_entry.category,
            is_resolved: false,
            created_at: Utc::now(),
        }
    }
}
