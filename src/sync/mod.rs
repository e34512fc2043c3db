//! Background sync: replays locally-held writes once connectivity
//! returns.

mod service;

pub use service::{SyncReport, SyncService};
