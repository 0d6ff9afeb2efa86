//! Steal orchestration for the olstap proximity exchange
//!
//! Consumes the decoded announcements published by the reader loop and
//! invokes the remote steal operation at most once per qualifying
//! detection: a cooldown window collapses the burst of duplicate reads a
//! single physical tap produces, and an explicit single-flight state
//! machine keeps concurrent detections from stacking ledger calls.
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod ledger;
pub mod notice;
pub mod orchestrator;

pub use ledger::{LedgerClient, LedgerError, StealReceipt};
pub use notice::{NoticeSender, NoticeStream, StealNotice, notice_channel};
pub use orchestrator::{DEFAULT_COOLDOWN, StealOrchestrator};
