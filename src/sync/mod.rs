//! Push unsynced logs to the spreadsheet webhook.

pub mod connectivity;
pub mod manager;
pub mod payload;
pub mod status;
pub mod transport;

pub use manager::{RequestOutcome, SyncManager, SyncOutcome};
pub use status::{StatusHandle, SyncStatus};
pub use transport::{Delivery, Transport};
