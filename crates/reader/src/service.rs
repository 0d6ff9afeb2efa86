//! Continuously-retrying reader service
//!
//! Drives [`read_once`] in a loop while listening is enabled, publishing
//! every decoded payload over a channel. Failures never propagate out of
//! the loop; each one is converted into a fixed backoff followed by the
//! next attempt.
//!
//! The listening flag is an atomic cancellation token shared with
//! [`StopHandle`], checked at the top of every iteration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use olstap_apdu::NfcTransport;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::ReaderConfig;
use crate::session::read_once;

/// Buffered taps between the loop and its consumer
const TAP_CHANNEL_CAPACITY: usize = 16;

/// Receiving end of the decoded-payload stream
pub type TapStream = mpsc::Receiver<String>;

/// Handle for stopping a running reader loop
#[derive(Debug, Clone)]
pub struct StopHandle {
    listening: Arc<AtomicBool>,
}

impl StopHandle {
    /// Clear the listening flag.
    ///
    /// The loop observes the flag and exits after its current iteration.
    /// An in-flight blocking acquisition is not interrupted synchronously,
    /// so worst-case stop latency is one attempt's platform timeout.
    pub fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    /// Whether the loop is (still) listening
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}

/// Reader service owning the transport and the retry loop
#[derive(Debug)]
pub struct ReaderService<T: NfcTransport + 'static> {
    transport: Option<T>,
    config: ReaderConfig,
    listening: Arc<AtomicBool>,
    taps: mpsc::Sender<String>,
    task: Option<JoinHandle<T>>,
}

impl<T: NfcTransport + 'static> ReaderService<T> {
    /// Create a service around a transport; returns the stream of decoded
    /// payload texts the loop will publish to.
    pub fn new(transport: T, config: ReaderConfig) -> (Self, TapStream) {
        let (taps, stream) = mpsc::channel(TAP_CHANNEL_CAPACITY);
        let service = Self {
            transport: Some(transport),
            config,
            listening: Arc::new(AtomicBool::new(false)),
            taps,
            task: None,
        };
        (service, stream)
    }

    /// Start the reader loop on a background task.
    ///
    /// Idempotent: calling it while already listening is a no-op.
    pub fn start(&mut self) {
        if self.listening.swap(true, Ordering::SeqCst) {
            debug!("reader already listening");
            return;
        }

        let Some(transport) = self.transport.take() else {
            // Loop exited but was never joined; nothing to restart with.
            warn!("reader transport not available, join() the previous run first");
            self.listening.store(false, Ordering::SeqCst);
            return;
        };

        self.task = Some(tokio::spawn(read_loop(
            transport,
            self.config.clone(),
            Arc::clone(&self.listening),
            self.taps.clone(),
        )));
    }

    /// Stop listening; see [`StopHandle::stop`]
    pub fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    /// Whether the loop is currently listening
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Handle that can stop the loop from elsewhere
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            listening: Arc::clone(&self.listening),
        }
    }

    /// Wait for a stopped loop to wind down and take the transport back
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            match task.await {
                Ok(transport) => self.transport = Some(transport),
                Err(e) => warn!(error = %e, "reader loop task failed"),
            }
        }
    }
}

impl<T: NfcTransport + 'static> Drop for ReaderService<T> {
    fn drop(&mut self) {
        // Guaranteed-cleanup teardown: the detached loop observes the flag
        // and exits after its current iteration.
        self.listening.store(false, Ordering::SeqCst);
    }
}

async fn read_loop<T: NfcTransport>(
    mut transport: T,
    config: ReaderConfig,
    listening: Arc<AtomicBool>,
    taps: mpsc::Sender<String>,
) -> T {
    debug!(aid = ?config.aid, "reader loop started");

    while listening.load(Ordering::SeqCst) {
        match read_once(&mut transport, &config.aid).await {
            Ok(payload) => {
                debug!(len = payload.len(), "tap decoded");
                if taps.send(payload).await.is_err() {
                    // Consumer is gone, nobody left to steal for.
                    break;
                }
            }
            Err(e) => {
                debug!(error = %e, backoff = ?config.retry_backoff, "read attempt failed");
                tokio::time::sleep(config.retry_backoff).await;
            }
        }
    }

    listening.store(false, Ordering::SeqCst);
    debug!("reader loop stopped");
    transport
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::ScriptedTransport;

    fn config() -> ReaderConfig {
        ReaderConfig::default()
    }

    #[tokio::test]
    async fn publishes_decoded_payloads() {
        let mut transport = ScriptedTransport::new();
        transport.push_response(b"first\x90\x00".as_slice());
        transport.push_response(b"second\x90\x00".as_slice());
        let probe = transport.clone();

        let (mut service, mut taps) = ReaderService::new(transport, config());
        service.start();

        assert_eq!(taps.recv().await.unwrap(), "first");
        assert_eq!(taps.recv().await.unwrap(), "second");

        service.stop();
        service.join().await;
        assert!(!service.is_listening());
        // One release per attempt, success or failure
        assert!(probe.releases() >= 2);
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let transport = ScriptedTransport::new();
        let (mut service, _taps) = ReaderService::new(transport, config());

        service.start();
        assert!(service.is_listening());
        // Second start while listening must be a no-op, not a restart
        service.start();
        assert!(service.is_listening());

        service.stop();
        service.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_attempts_back_off() {
        // Empty script: every transceive times out
        let transport = ScriptedTransport::new();
        let probe = transport.clone();

        let (mut service, _taps) = ReaderService::new(transport, config());
        service.start();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        service.stop();
        service.join().await;

        let times = probe.acquire_times();
        assert!(times.len() >= 3, "expected several attempts, got {}", times.len());
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(800));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn no_attempts_after_stop() {
        let transport = ScriptedTransport::new();
        let probe = transport.clone();

        let (mut service, _taps) = ReaderService::new(transport, config());
        let handle = service.stop_handle();
        service.start();

        tokio::time::sleep(Duration::from_millis(1000)).await;
        handle.stop();
        service.join().await;

        let attempts = probe.sent().len();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(probe.sent().len(), attempts);
        assert!(!handle.is_listening());
    }

    #[tokio::test]
    async fn loop_exits_when_consumer_drops() {
        let mut transport = ScriptedTransport::new();
        for _ in 0..32 {
            transport.push_response(b"x\x90\x00".as_slice());
        }

        let (mut service, taps) = ReaderService::new(transport, config());
        service.start();
        drop(taps);

        service.join().await;
        assert!(!service.is_listening());
    }
}
