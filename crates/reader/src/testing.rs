//! Scripted transport used by the unit tests

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use olstap_apdu::{NfcTransport, TransportError};
use parking_lot::Mutex;
use tokio::time::Instant;

enum Step {
    Respond(Bytes),
    FailTransceive(TransportError),
    FailAcquire,
}

#[derive(Default)]
struct Inner {
    steps: VecDeque<Step>,
    sent: Vec<Vec<u8>>,
    acquires: Vec<Instant>,
    releases: usize,
}

/// Transport that replays a scripted sequence of outcomes and records
/// everything the session did to it. Clones share the same script.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_response(&mut self, response: impl Into<Bytes>) {
        self.inner.lock().steps.push_back(Step::Respond(response.into()));
    }

    pub(crate) fn fail_next_transceive(&mut self, error: TransportError) {
        self.inner.lock().steps.push_back(Step::FailTransceive(error));
    }

    pub(crate) fn fail_next_acquire(&mut self) {
        self.inner.lock().steps.push_back(Step::FailAcquire);
    }

    pub(crate) fn sent(&self) -> Vec<Vec<u8>> {
        self.inner.lock().sent.clone()
    }

    pub(crate) fn acquire_times(&self) -> Vec<Instant> {
        self.inner.lock().acquires.clone()
    }

    pub(crate) fn releases(&self) -> usize {
        self.inner.lock().releases
    }
}

impl fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ScriptedTransport")
            .field("pending_steps", &inner.steps.len())
            .field("sent", &inner.sent.len())
            .field("releases", &inner.releases)
            .finish()
    }
}

#[async_trait]
impl NfcTransport for ScriptedTransport {
    async fn acquire(&mut self) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.acquires.push(Instant::now());
        if matches!(inner.steps.front(), Some(Step::FailAcquire)) {
            inner.steps.pop_front();
            return Err(TransportError::Acquisition);
        }
        Ok(())
    }

    async fn do_transceive(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        let mut inner = self.inner.lock();
        inner.sent.push(command.to_vec());
        match inner.steps.pop_front() {
            Some(Step::Respond(bytes)) => Ok(bytes),
            Some(Step::FailTransceive(e)) => Err(e),
            Some(Step::FailAcquire) | None => Err(TransportError::Timeout),
        }
    }

    async fn release(&mut self) {
        self.inner.lock().releases += 1;
    }
}
