//! Mutation lifecycle for thin CRUD front ends over a hosted table store:
//! one controller per form drives validate -> pending -> remote call ->
//! list reconciliation -> transient notification.

pub mod controller;
pub mod list;
pub mod notify;
pub mod prefs;
pub mod session;
pub mod stats;

pub use controller::{MessageSet, MutationController, RefreshOutcome, RemoveOutcome, SubmitOutcome};
pub use list::ListStore;
pub use notify::{Notification, NotificationChannel, NotificationEvent, NotificationKind};
pub use prefs::{MemoryPreferenceStore, PreferenceStore, Preferences, TomlPreferenceStore};
pub use session::SessionContext;
pub use stats::{load_stats, StatsSnapshot};

#[cfg(test)]
mod tests;
