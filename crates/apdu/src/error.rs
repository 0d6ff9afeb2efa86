//! Codec error type

/// Errors raised when framing or parsing APDUs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Response shorter than the mandatory 2-byte status word
    #[error("malformed response: {0} byte(s), need at least a status word")]
    MalformedResponse(usize),

    /// Command frame too short or inconsistent with its Lc field
    #[error("invalid command length: {0}")]
    InvalidCommandLength(usize),
}
