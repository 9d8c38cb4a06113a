//! # Rigscan Core
//!
//! Scan and sync engines, plus everything they need to drive a rig.
//!
//! ## Modules
//! * **[`rig`]**: the [`RigControl`] seam and its error type.
//! * **[`network`]**: the TCP line-protocol client implementing [`RigControl`].
//! * **[`task`]**: validated scan configuration.
//! * **[`scanner`]**: the scan engine (bookmark walk and frequency sweep).
//! * **[`sync`]**: the frequency/mode mirror between two rigs.
//! * **[`messenger`]**: bounded controller/engine queues.
//! * **[`worker`]**: worker threads with cooperative cancellation.
//! * **[`activity`]**: sinks for activity records.

pub mod activity;
pub mod messenger;
pub mod network;
pub mod rig;
pub mod scanner;
pub mod sync;
pub mod task;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use activity::{ActivityLog, ActivityRecord, RecordKind, TracingActivityLog};
pub use messenger::{InterThreadMessenger, MessengerError, ParamUpdate, UpdateValue};
pub use network::tcp::RigClient;
pub use rig::{RigControl, RigError};
pub use scanner::{Detection, ScanEngine, ScanParams, ScanTimings, StopReason};
pub use sync::{SyncEngine, SyncTask};
pub use task::{NewBookmarks, ScanConfig, ScanMode, ScanTask};
pub use worker::{StopFlag, Worker};
