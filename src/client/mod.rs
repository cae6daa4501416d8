//! Client side of the prayer tracker: an HTTP API client, a local cache of
//! the caller's entries, and the controller that applies writes to the cache
//! optimistically before the server confirms them.

pub mod api;
pub mod cache;
pub mod error;
pub mod mutation;
pub mod views;

pub use api::{HttpApi, PrayerApi, Session};
pub use cache::{EntryCache, RefreshTicket, Snapshot};
pub use error::ClientError;
pub use mutation::{MutationController, PLACEHOLDER_OWNER};
pub use views::{render_list, ConfirmDialog, PrayerForm, StatusFilter};
