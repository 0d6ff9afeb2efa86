//! Reader error taxonomy
//!
//! Every variant is recovered locally by the retry loop; none of them
//! reach the caller of the reader service or the user.

use olstap_apdu::TransportError;

/// Errors raised by a single read attempt
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// Transport-transient failure (no peer, timeout, lost link)
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Protocol failure (malformed or too-short response frame)
    #[error("protocol error: {0}")]
    Apdu(#[from] olstap_apdu::Error),

    /// The response payload was not valid UTF-8
    #[error("payload is not valid UTF-8: {0}")]
    Payload(#[from] std::str::Utf8Error),
}
