//! Client-side mirror of the caller's prayer list.
//!
//! The cache may run ahead of the server while an optimistic mutation is in
//! flight. Refreshes carry a [`RefreshTicket`]; bumping the generation via
//! [`EntryCache::cancel_refresh`] or [`EntryCache::invalidate`] makes any
//! older ticket unable to commit, so a slow fetch cannot overwrite a newer
//! optimistic write.

use std::sync::Mutex;

use crate::models::PrayerEntry;

#[derive(Debug, Default)]
struct CacheState {
    entries: Option<Vec<PrayerEntry>>,
    stale: bool,
    generation: u64,
}

/// Saved cache contents used for rollback.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Option<Vec<PrayerEntry>>);

/// Token for one in-flight refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

#[derive(Debug, Default)]
pub struct EntryCache {
    state: Mutex<CacheState>,
}

impl EntryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, or `None` if never loaded.
    pub fn read(&self) -> Option<Vec<PrayerEntry>> {
        self.state.lock().unwrap().entries.clone()
    }

    /// Applies `f` to the cached list, starting from empty if never loaded.
    pub fn write(&self, f: impl FnOnce(&mut Vec<PrayerEntry>)) {
        let mut state = self.state.lock().unwrap();
        f(state.entries.get_or_insert_with(Vec::new));
    }

    /// Marks contents stale and cancels any in-flight refresh.
    pub fn invalidate(&self) {
        let mut state = self.state.lock().unwrap();
        state.stale = true;
        state.generation += 1;
    }

    /// True when the next read should go to the server.
    pub fn is_stale(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.stale || state.entries.is_none()
    }

    /// Prevents any refresh already in flight from committing.
    pub fn cancel_refresh(&self) {
        self.state.lock().unwrap().generation += 1;
    }

    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.state.lock().unwrap().generation)
    }

    /// Stores fetched entries if `ticket` is still current.
    ///
    /// Returns false when the refresh was cancelled in the meantime.
    pub fn complete_refresh(&self, ticket: RefreshTicket, entries: Vec<PrayerEntry>) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.generation != ticket.0 {
            return false;
        }
        state.entries = Some(entries);
        state.stale = false;
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.read())
    }

    /// Puts back exactly what [`EntryCache::snapshot`] captured.
    pub fn restore(&self, snapshot: Snapshot) {
        self.state.lock().unwrap().entries = snapshot.0;
    }
}
