//! Transport trait for driving an NFC exchange from the reader side
//!
//! Unlike a wired card reader, an NFC radio has an explicit acquisition
//! phase: the transport suspends until a peer device is physically
//! presented, performs exchanges while the link holds, and must give the
//! exclusive radio grant back when done.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, trace};

/// Transport error type
///
/// Every variant is transport-transient from the reader loop's point of
/// view: the loop backs off and retries, none of these reach the user.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to acquire the radio or no peer was presented in time
    #[error("failed to acquire NFC technology")]
    Acquisition,

    /// Failed to transmit data over an acquired link
    #[error("failed to transmit data")]
    Transmission,

    /// The peer moved out of range mid-exchange
    #[error("NFC link lost")]
    LinkLost,

    /// Platform-level timeout
    #[error("operation timed out")]
    Timeout,

    /// The operation was cancelled
    #[error("operation cancelled")]
    Cancelled,

    /// Other error with message
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Create a general other error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other(message.into())
    }
}

/// Trait for NFC reader-mode transports
///
/// A transport owns the platform's exclusive radio grant between
/// [`acquire`](Self::acquire) and [`release`](Self::release). It has no
/// knowledge of command structure; framing lives in the codec.
#[async_trait]
pub trait NfcTransport: Send + fmt::Debug {
    /// Acquire the NFC technology handle.
    ///
    /// Suspends until a compatible peer is presented or the platform times
    /// out. While acquired, the caller is the sole owner of the radio.
    async fn acquire(&mut self) -> Result<(), TransportError>;

    /// Send raw command bytes and return the raw response bytes.
    ///
    /// Logs frames at trace level and delegates to
    /// [`do_transceive`](Self::do_transceive).
    async fn transceive(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = %hex::encode(command), "transceiving command");
        let result = self.do_transceive(command).await;
        match &result {
            Ok(response) => {
                trace!(response = %hex::encode(response), "received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "transport error during exchange");
            }
        }
        result
    }

    /// Internal implementation of transceive.
    /// This is the method that concrete transports should override.
    async fn do_transceive(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Release the technology handle.
    ///
    /// Infallible by contract: must be safe to call on every exit path,
    /// including when nothing is currently acquired.
    async fn release(&mut self);
}
