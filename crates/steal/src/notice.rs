//! User-facing steal notices
//!
//! One-shot notifications produced by completed steal attempts. Only
//! remote/business outcomes appear here; payload and transport failures
//! are recovered silently upstream.

use tokio::sync::mpsc;

/// Buffered notices between the orchestrator and the UI layer
const NOTICE_CHANNEL_CAPACITY: usize = 8;

/// Outcome of a completed steal attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StealNotice {
    /// The steal went through; content is server-provided
    Success {
        /// Optional notification title
        title: Option<String>,
        /// Notification body
        message: String,
    },
    /// The ledger rejected the steal; shown until the next tap is processed
    Failure {
        /// Server-provided error message, verbatim
        message: String,
    },
}

/// Sending end of the notice stream
pub type NoticeSender = mpsc::Sender<StealNotice>;
/// Receiving end of the notice stream
pub type NoticeStream = mpsc::Receiver<StealNotice>;

/// Create a bounded notice channel
pub fn notice_channel() -> (NoticeSender, NoticeStream) {
    mpsc::channel(NOTICE_CHANNEL_CAPACITY)
}
