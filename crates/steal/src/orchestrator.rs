//! Steal orchestrator
//!
//! Turns raw decoded payload text into at most one remote steal per
//! physical tap. The reader loop re-attempts exchanges rapidly, so a
//! single tap produces a burst of identical announcements; the cooldown
//! window collapses the burst into one ledger call.

use std::sync::Arc;
use std::time::Duration;

use olstap_wire::TapAnnounce;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::ledger::LedgerClient;
use crate::notice::{NoticeSender, NoticeStream, StealNotice, notice_channel};

/// Detections closer together than this are duplicate reads of the same
/// physical tap.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1500);

/// Single-flight state of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flight {
    /// Ready to accept the next detection
    Idle,
    /// A steal call is in progress; new detections are rejected
    Processing,
}

/// Orchestrator consuming decoded payloads and gating ledger calls
pub struct StealOrchestrator<L: ?Sized> {
    ledger: Arc<L>,
    cooldown: Duration,
    last_processed: Option<Instant>,
    flight: Flight,
    notices: NoticeSender,
}

impl<L: ?Sized> std::fmt::Debug for StealOrchestrator<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StealOrchestrator")
            .field("cooldown", &self.cooldown)
            .field("last_processed", &self.last_processed)
            .field("flight", &self.flight)
            .finish_non_exhaustive()
    }
}

impl<L: LedgerClient + ?Sized> StealOrchestrator<L> {
    /// Create an orchestrator with the default cooldown window; returns
    /// the stream of user-facing notices.
    pub fn new(ledger: Arc<L>) -> (Self, NoticeStream) {
        let (notices, stream) = notice_channel();
        let orchestrator = Self {
            ledger,
            cooldown: DEFAULT_COOLDOWN,
            last_processed: None,
            flight: Flight::Idle,
            notices,
        };
        (orchestrator, stream)
    }

    /// Override the cooldown window
    pub const fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Process one decoded payload text.
    ///
    /// Every discard path is silent at the user level; only a completed
    /// ledger call produces a notice.
    pub async fn handle_payload(&mut self, text: &str) {
        let announce = match TapAnnounce::from_payload(text) {
            Ok(announce) => announce,
            Err(e) => {
                debug!(error = %e, "discarding undecodable payload");
                return;
            }
        };

        // Unknown message types are ignored, not processed.
        if !announce.is_announce() {
            debug!(kind = %announce.kind, "ignoring unknown message type");
            return;
        }

        if announce.account_id.is_empty() {
            trace!("announcement carries no account id");
            return;
        }

        let now = Instant::now();
        if let Some(last) = self.last_processed {
            if now.duration_since(last) < self.cooldown {
                trace!("within cooldown window, duplicate read of the same tap");
                return;
            }
        }

        if self.flight == Flight::Processing {
            debug!("steal already in flight, dropping detection");
            return;
        }

        self.flight = Flight::Processing;
        self.last_processed = Some(now);

        debug!(account_id = %announce.account_id, "invoking steal");
        let notice = match self.ledger.steal_token(&announce.account_id).await {
            Ok(receipt) => StealNotice::Success {
                title: receipt.title,
                message: receipt.message,
            },
            Err(e) => {
                warn!(error = %e, "steal rejected");
                // No automatic retry; the next physical tap starts fresh.
                StealNotice::Failure { message: e.message }
            }
        };
        let _ = self.notices.send(notice).await;

        self.flight = Flight::Idle;
    }

    /// Drain a reader's tap stream until it closes
    pub async fn run(mut self, mut taps: mpsc::Receiver<String>) {
        while let Some(payload) = taps.recv().await {
            self.handle_payload(&payload).await;
        }
        debug!("tap stream closed, orchestrator exiting");
    }
}
